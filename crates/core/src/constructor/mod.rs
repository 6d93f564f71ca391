pub mod analyze;
pub mod emit;
pub mod negotiate;
pub mod pipeline;
pub mod types;
pub mod wrap;

pub use analyze::analyze;
pub use emit::emit;
pub use negotiate::{
    negotiate, NegotiationError, PresenterResponse, Script, ScriptedPresenter, SelectionPresenter,
};
pub use pipeline::{generate_constructor, GeneratedConstructor, Generation, Pipeline, PipelineError, Stage};
pub use types::{
    ConstructorArgument, FieldDescriptor, Generics, RawField, SelectionResult, StructAnalysis,
    StructBody, StructDecl, StructShape, UNKNOWN_TYPE, UNNAMED_FIELD,
};
