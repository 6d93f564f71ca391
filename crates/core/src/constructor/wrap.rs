use super::types::Generics;

const INDENT: &str = "    ";

/// Wrap an emitted constructor in an inherent `impl` block for `struct_name`.
///
/// Generic parameters are repeated on the `impl` and their bound-free names
/// applied to the self type, so `struct W<T: Clone>` yields
/// `impl<T: Clone> W<T> { .. }`.
pub fn wrap_in_impl(struct_name: &str, generics: Option<&Generics>, function: &str) -> String {
    let header = match generics {
        Some(generics) => {
            let mut header = format!("impl{} {}{}", generics.params, struct_name, generics.args);
            if let Some(where_clause) = &generics.where_clause {
                header.push(' ');
                header.push_str(where_clause);
            }
            header
        }
        None => format!("impl {struct_name}"),
    };

    let body = function
        .lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{INDENT}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!("{header} {{\n{body}\n}}")
}
