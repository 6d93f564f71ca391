#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to parse source: {0}")]
    Parse(String),

    #[error("No struct found: {0}")]
    StructNotFound(String),

    #[error("Several structs found ({}); pick one with --name or --line", .0.join(", "))]
    AmbiguousStruct(Vec<String>),

    #[error("Position {line}:{column} is outside the file")]
    InvalidPosition { line: usize, column: usize },

    #[error("{0} changed while the constructor was being generated")]
    SourceChanged(String),
}
