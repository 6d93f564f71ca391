use super::types::{
    FieldDescriptor, RawField, StructAnalysis, StructBody, StructDecl, StructShape, UNKNOWN_TYPE,
    UNNAMED_FIELD,
};

/// Classify a struct declaration and derive its candidate constructor parameters.
///
/// Tuple fields get synthetic names (`field0`, `field1`, ...). Missing types and
/// identifiers degrade to [`UNKNOWN_TYPE`] and [`UNNAMED_FIELD`] instead of failing.
/// A declaration whose field list is absent or empty is reported as
/// [`StructShape::Unit`].
pub fn analyze(decl: &StructDecl) -> StructAnalysis {
    let (shape, fields) = match &decl.body {
        StructBody::Unit => (StructShape::Unit, Vec::new()),
        StructBody::Tuple(fields) if fields.is_empty() => (StructShape::Unit, Vec::new()),
        StructBody::Named(fields) if fields.is_empty() => (StructShape::Unit, Vec::new()),
        StructBody::Tuple(fields) => (StructShape::Tuple, from_tuple_fields(fields)),
        StructBody::Named(fields) => (StructShape::Named, from_named_fields(fields)),
    };

    StructAnalysis {
        name: decl.name.clone(),
        shape,
        fields,
        generics: decl.generics.clone(),
    }
}

fn from_tuple_fields(fields: &[RawField]) -> Vec<FieldDescriptor> {
    fields
        .iter()
        .enumerate()
        .map(|(position, field)| {
            let name = format!("field{position}");
            FieldDescriptor {
                position,
                accessor_name: name.clone(),
                binding_name: name,
                type_text: type_text_or_unknown(field.type_text.as_deref()),
            }
        })
        .collect()
}

fn from_named_fields(fields: &[RawField]) -> Vec<FieldDescriptor> {
    fields
        .iter()
        .enumerate()
        .map(|(position, field)| {
            let name = field
                .ident
                .as_deref()
                .map(str::trim)
                .filter(|ident| !ident.is_empty())
                .unwrap_or(UNNAMED_FIELD)
                .to_string();
            FieldDescriptor {
                position,
                accessor_name: name.clone(),
                binding_name: name,
                type_text: type_text_or_unknown(field.type_text.as_deref()),
            }
        })
        .collect()
}

/// Collapse whitespace runs so multi-line types render on a single line.
fn type_text_or_unknown(type_text: Option<&str>) -> String {
    let normalized = type_text
        .map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
        .unwrap_or_default();

    if normalized.is_empty() {
        UNKNOWN_TYPE.to_string()
    } else {
        normalized
    }
}
