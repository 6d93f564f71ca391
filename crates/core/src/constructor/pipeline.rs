use serde::Serialize;
use std::fmt;

use super::analyze::analyze;
use super::emit::emit;
use super::negotiate::{negotiate, NegotiationError, SelectionPresenter};
use super::types::{FieldDescriptor, SelectionResult, StructAnalysis, StructDecl, StructShape};
use super::wrap::wrap_in_impl;

/// Where a generation run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Idle,
    Analyzed,
    AwaitingSelection,
    Cancelled,
    /// Negotiation failed; the run cannot continue.
    Failed,
    Selected,
    Emitted,
    Inserted,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Analyzed => "analyzed",
            Stage::AwaitingSelection => "awaiting selection",
            Stage::Cancelled => "cancelled",
            Stage::Failed => "failed",
            Stage::Selected => "selected",
            Stage::Emitted => "emitted",
            Stage::Inserted => "inserted",
        };
        write!(f, "{name}")
    }
}

/// Error type for pipeline operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error("Cannot {step} while the pipeline is {stage}")]
    OutOfOrder { stage: Stage, step: &'static str },

    #[error(transparent)]
    Negotiation(#[from] NegotiationError),
}

/// A constructor ready to be handed to an inserter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedConstructor {
    pub struct_name: String,
    pub shape: StructShape,
    /// Fields that became parameters, in declaration order.
    pub parameters: Vec<FieldDescriptor>,
    /// The bare `pub fn new` definition.
    pub function: String,
    /// `function` wrapped in an `impl` block for the struct.
    pub impl_block: String,
}

/// Final result of the core chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generation {
    Cancelled,
    Emitted(GeneratedConstructor),
}

/// One constructor-generation run over a struct snapshot.
///
/// Steps must be called in order: [`Pipeline::negotiate`], then
/// [`Pipeline::emit`], then optionally [`Pipeline::mark_inserted`] once the
/// caller has applied the text. A step called out of order returns
/// [`PipelineError::OutOfOrder`] and leaves the run untouched.
#[derive(Debug)]
pub struct Pipeline {
    stage: Stage,
    analysis: StructAnalysis,
    selection: Vec<FieldDescriptor>,
}

impl Pipeline {
    /// Analyze `decl` and start a run in [`Stage::Analyzed`].
    pub fn new(decl: &StructDecl) -> Self {
        Self {
            stage: Stage::Analyzed,
            analysis: analyze(decl),
            selection: Vec::new(),
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn analysis(&self) -> &StructAnalysis {
        &self.analysis
    }

    /// Obtain the parameter selection from `presenter`.
    ///
    /// Structs without fields go straight to [`Stage::Selected`] without
    /// asking. Returns the stage reached: `Selected` or `Cancelled`. A
    /// presenter error leaves the run in [`Stage::Failed`].
    pub fn negotiate(
        &mut self,
        presenter: &mut dyn SelectionPresenter,
    ) -> Result<Stage, PipelineError> {
        self.expect(Stage::Analyzed, "negotiate")?;

        if !self.analysis.fields.is_empty() {
            self.stage = Stage::AwaitingSelection;
        }

        let result = negotiate(&self.analysis.fields, presenter).inspect_err(|_| {
            self.stage = Stage::Failed;
        })?;

        match result {
            SelectionResult::Cancelled => {
                self.stage = Stage::Cancelled;
            }
            SelectionResult::Selected(fields) => {
                self.selection = fields;
                self.stage = Stage::Selected;
            }
        }

        Ok(self.stage)
    }

    /// Render the constructor for the negotiated selection.
    pub fn emit(&mut self) -> Result<GeneratedConstructor, PipelineError> {
        self.expect(Stage::Selected, "emit")?;

        let analysis = &self.analysis;
        let function = emit(
            &analysis.name,
            analysis.shape,
            &analysis.fields,
            &self.selection,
        );
        let impl_block = wrap_in_impl(&analysis.name, analysis.generics.as_ref(), &function);

        self.stage = Stage::Emitted;

        Ok(GeneratedConstructor {
            struct_name: analysis.name.clone(),
            shape: analysis.shape,
            parameters: self.selection.clone(),
            function,
            impl_block,
        })
    }

    /// Record that the emitted text was applied by the caller.
    pub fn mark_inserted(&mut self) -> Result<(), PipelineError> {
        self.expect(Stage::Emitted, "mark as inserted")?;
        self.stage = Stage::Inserted;
        Ok(())
    }

    fn expect(&self, stage: Stage, step: &'static str) -> Result<(), PipelineError> {
        if self.stage == stage {
            Ok(())
        } else {
            Err(PipelineError::OutOfOrder {
                stage: self.stage,
                step,
            })
        }
    }
}

/// Analyze, negotiate and emit in one go.
pub fn generate_constructor(
    decl: &StructDecl,
    presenter: &mut dyn SelectionPresenter,
) -> Result<Generation, PipelineError> {
    let mut pipeline = Pipeline::new(decl);

    match pipeline.negotiate(presenter)? {
        Stage::Cancelled => Ok(Generation::Cancelled),
        _ => pipeline.emit().map(Generation::Emitted),
    }
}
