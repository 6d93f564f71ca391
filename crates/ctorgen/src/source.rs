use crate::error::Error;
use crate::prelude::*;
use ctorgen_core::constructor::{Generics, RawField, StructBody, StructDecl};
use std::path::{Path, PathBuf};
use tree_sitter::{Node, Parser, Point, Tree};

/// Which struct of a file to work on.
#[derive(Debug, Clone, clap::Args)]
pub struct TargetArgs {
    /// Rust source file containing the struct
    pub file: PathBuf,

    /// Name of the struct (defaults to the only struct in the file)
    #[arg(long, conflicts_with = "line")]
    pub name: Option<String>,

    /// Cursor line (1-based); picks the struct under or just above the cursor
    #[arg(long)]
    pub line: Option<usize>,

    /// Cursor column (1-based)
    #[arg(long, requires = "line", default_value = "1")]
    pub column: usize,
}

impl TargetArgs {
    pub fn locator(&self) -> Locator {
        match (&self.name, self.line) {
            (Some(name), _) => Locator::Name(name.clone()),
            (None, Some(line)) => Locator::Cursor {
                line,
                column: self.column,
            },
            (None, None) => Locator::Only,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    Name(String),
    /// 1-based line and column.
    Cursor { line: usize, column: usize },
    /// The single struct of the file.
    Only,
}

/// A struct declaration found in a source file.
#[derive(Debug, Clone)]
pub struct LocatedStruct {
    pub decl: StructDecl,
    pub start: Point,
    pub end: Point,
    pub start_byte: usize,
    pub end_byte: usize,
    /// Leading whitespace of the line the declaration starts on.
    pub indent: String,
}

impl LocatedStruct {
    /// 1-based line of the `struct` keyword (or its visibility).
    pub fn line(&self) -> usize {
        self.start.row + 1
    }

    fn contains(&self, point: Point) -> bool {
        self.start <= point && point <= self.end
    }
}

/// A parsed Rust file.
pub struct SourceFile {
    text: String,
    tree: Tree,
}

impl SourceFile {
    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let source = Self::parse(text).map_err(|e| eyre!("{}: {}", path.display(), e))?;
        log::debug!(
            "parsed {} ({} bytes, errors: {})",
            path.display(),
            source.text.len(),
            source.tree.root_node().has_error()
        );
        Ok(source)
    }

    pub fn parse(text: String) -> std::result::Result<Self, Error> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_rust::LANGUAGE.into())
            .map_err(|e| Error::Parse(e.to_string()))?;
        let tree = parser
            .parse(&text, None)
            .ok_or_else(|| Error::Parse("parser produced no syntax tree".to_string()))?;
        Ok(Self { text, tree })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Every named struct declaration in the file, in source order.
    pub fn structs(&self) -> Vec<LocatedStruct> {
        let mut nodes = Vec::new();
        collect_struct_items(self.tree.root_node(), &mut nodes);

        nodes
            .into_iter()
            .filter_map(|node| self.snapshot(node))
            .collect()
    }

    pub fn locate(&self, locator: &Locator) -> std::result::Result<LocatedStruct, Error> {
        let structs = self.structs();

        match locator {
            Locator::Name(name) => structs
                .into_iter()
                .find(|s| s.decl.name == *name)
                .ok_or_else(|| Error::StructNotFound(name.clone())),
            Locator::Only => {
                let mut structs = structs;
                if structs.len() > 1 {
                    return Err(Error::AmbiguousStruct(
                        structs.into_iter().map(|s| s.decl.name).collect(),
                    ));
                }
                structs
                    .pop()
                    .ok_or_else(|| Error::StructNotFound("any struct".to_string()))
            }
            Locator::Cursor { line, column } => {
                // a trailing newline opens one more line for the caret
                let line_count = (self.text.lines().count()
                    + usize::from(self.text.ends_with('\n')))
                .max(1);
                if *line == 0 || *column == 0 || *line > line_count {
                    return Err(Error::InvalidPosition {
                        line: *line,
                        column: *column,
                    });
                }
                let point = Point::new(line - 1, column - 1);

                let innermost = structs
                    .iter()
                    .filter(|s| s.contains(point))
                    .min_by_key(|s| s.end_byte - s.start_byte)
                    .cloned();

                innermost
                    .or_else(|| {
                        structs
                            .iter()
                            .filter(|s| s.start.row <= point.row)
                            .max_by_key(|s| s.start_byte)
                            .cloned()
                    })
                    .ok_or_else(|| Error::StructNotFound(format!("at or above line {line}")))
            }
        }
    }

    fn snapshot(&self, node: Node<'_>) -> Option<LocatedStruct> {
        let name = node
            .child_by_field_name("name")
            .filter(|n| !n.is_missing())
            .map(|n| self.node_text(n).to_string())
            .filter(|n| !n.is_empty())?;

        let body = match node.child_by_field_name("body") {
            None => StructBody::Unit,
            Some(body) if body.kind() == "ordered_field_declaration_list" => {
                StructBody::Tuple(self.tuple_fields(body))
            }
            Some(body) => StructBody::Named(self.named_fields(body)),
        };

        Some(LocatedStruct {
            decl: StructDecl {
                name,
                generics: self.generics(node),
                body,
            },
            start: node.start_position(),
            end: node.end_position(),
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
            indent: self.indent_at(node.start_byte()),
        })
    }

    fn tuple_fields(&self, body: Node<'_>) -> Vec<RawField> {
        let mut cursor = body.walk();
        let fields = body
            .children_by_field_name("type", &mut cursor)
            .map(|ty| RawField {
                ident: None,
                type_text: self.type_text(Some(ty)),
            })
            .collect();
        fields
    }

    fn named_fields(&self, body: Node<'_>) -> Vec<RawField> {
        let mut cursor = body.walk();
        let mut fields = Vec::new();

        for child in body.named_children(&mut cursor) {
            match child.kind() {
                "field_declaration" => fields.push(RawField {
                    ident: child
                        .child_by_field_name("name")
                        .filter(|n| !n.is_missing())
                        .map(|n| self.node_text(n).to_string()),
                    type_text: self.type_text(child.child_by_field_name("type")),
                }),
                // `name :` or `: Type` parse as an error node
                "ERROR" => match first_descendant(child, &["field_identifier", "identifier"]) {
                    Some(ident) => fields.push(RawField {
                        ident: Some(self.node_text(ident).to_string()),
                        type_text: None,
                    }),
                    None => {
                        let type_text = self
                            .node_text(child)
                            .trim()
                            .trim_start_matches(':')
                            .trim_end_matches(',')
                            .trim();
                        // stray punctuation alone is not a field
                        if !type_text.is_empty() {
                            fields.push(RawField {
                                ident: None,
                                type_text: Some(type_text.to_string()),
                            });
                        }
                    }
                },
                _ => {}
            }
        }

        fields
    }

    fn generics(&self, node: Node<'_>) -> Option<Generics> {
        let params = node.child_by_field_name("type_parameters")?;

        let mut cursor = params.walk();
        let (declared, args): (Vec<_>, Vec<_>) = params
            .named_children(&mut cursor)
            .filter_map(|param| {
                let name = generic_arg_name(param)?;
                Some((self.param_without_default(param), self.node_text(name).to_string()))
            })
            .unzip();

        let mut cursor = node.walk();
        let where_clause = node
            .named_children(&mut cursor)
            .find(|child| child.kind() == "where_clause")
            .map(|clause| collapse_whitespace(self.node_text(clause)));

        Some(Generics {
            params: format!("<{}>", declared.join(", ")),
            args: format!("<{}>", args.join(", ")),
            where_clause,
        })
    }

    /// Parameter text with any `= default` cut off, as an impl header needs it.
    fn param_without_default(&self, param: Node<'_>) -> String {
        let mut cursor = param.walk();
        let default_start = param
            .children(&mut cursor)
            .find(|child| child.kind() == "=")
            .map(|eq| eq.start_byte());

        let end = default_start.unwrap_or(param.end_byte());
        collapse_whitespace(&self.text[param.start_byte()..end])
    }

    fn type_text(&self, ty: Option<Node<'_>>) -> Option<String> {
        ty.filter(|t| !t.is_missing())
            .map(|t| self.node_text(t).to_string())
            .filter(|t| !t.trim().is_empty())
    }

    fn indent_at(&self, byte: usize) -> String {
        let line_start = self.text[..byte].rfind('\n').map_or(0, |i| i + 1);
        self.text[line_start..byte]
            .chars()
            .take_while(|c| c.is_whitespace())
            .collect()
    }

    fn node_text(&self, node: Node<'_>) -> &str {
        &self.text[node.byte_range()]
    }
}

fn collect_struct_items<'tree>(node: Node<'tree>, out: &mut Vec<Node<'tree>>) {
    if node.kind() == "struct_item" {
        out.push(node);
    }
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        collect_struct_items(child, out);
    }
}

fn first_descendant<'tree>(node: Node<'tree>, kinds: &[&str]) -> Option<Node<'tree>> {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if kinds.contains(&child.kind()) {
            return Some(child);
        }
        if let Some(found) = first_descendant(child, kinds) {
            return Some(found);
        }
    }
    None
}

/// Node naming a generic parameter, without bounds or defaults.
fn generic_arg_name(param: Node<'_>) -> Option<Node<'_>> {
    match param.kind() {
        "lifetime" | "type_identifier" => Some(param),
        "constrained_type_parameter" => param.child_by_field_name("left"),
        "lifetime_parameter" => param.child_by_field_name("name").or_else(|| {
            let mut cursor = param.walk();
            let lifetime = param
                .named_children(&mut cursor)
                .find(|c| c.kind() == "lifetime");
            lifetime
        }),
        "optional_type_parameter" | "const_parameter" | "type_parameter" => {
            param.child_by_field_name("name")
        }
        _ => None,
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
