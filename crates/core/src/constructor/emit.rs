use super::types::{FieldDescriptor, StructShape};

/// Value written for a field that is not a constructor parameter.
const PLACEHOLDER: &str = "()";

/// Render `pub fn new(..) -> Self` for a struct.
///
/// Only the `selected` fields become parameters, in declaration order. Every
/// field still appears in the struct literal: selected ones by their binding,
/// the rest as the `()` placeholder.
///
/// # Panics
///
/// Panics if `selected` contains a descriptor that is not part of
/// `all_fields`. Selections must come from negotiating over the same list.
pub fn emit(
    struct_name: &str,
    shape: StructShape,
    all_fields: &[FieldDescriptor],
    selected: &[FieldDescriptor],
) -> String {
    assert!(
        selected.iter().all(|s| all_fields.contains(s)),
        "selected fields must be taken from the analyzed field list"
    );

    let is_selected = |field: &FieldDescriptor| selected.contains(field);

    let parameters = all_fields
        .iter()
        .filter(|field| is_selected(*field))
        .map(|field| format!("{}: {}", field.binding_name, field.type_text))
        .collect::<Vec<_>>()
        .join(", ");

    let literal = match shape {
        StructShape::Unit => format!("{struct_name} {{}}"),
        StructShape::Tuple => {
            let values = all_fields
                .iter()
                .map(|field| {
                    if is_selected(field) {
                        field.binding_name.clone()
                    } else {
                        PLACEHOLDER.to_string()
                    }
                })
                .collect::<Vec<_>>()
                .join(", ");
            format!("{struct_name}({values})")
        }
        StructShape::Named => {
            let entries = all_fields
                .iter()
                .map(|field| named_entry(field, is_selected(field)))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{struct_name} {{ {entries} }}")
        }
    };

    format!("pub fn new({parameters}) -> Self {{\n    {literal}\n}}")
}

fn named_entry(field: &FieldDescriptor, selected: bool) -> String {
    if !selected {
        format!("{}: {PLACEHOLDER}", field.accessor_name)
    } else if field.binding_name == field.accessor_name {
        field.binding_name.clone()
    } else {
        format!("{}: {}", field.accessor_name, field.binding_name)
    }
}
