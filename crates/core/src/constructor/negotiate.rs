use super::types::{FieldDescriptor, SelectionResult};

/// Error type for negotiation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NegotiationError {
    #[error("Presenter chose candidate #{index} but only {count} were offered")]
    UnknownCandidate { index: usize, count: usize },

    #[error("No candidate named '{0}'")]
    UnknownName(String),

    #[error("Scripted selection was already consumed")]
    PresenterReused,

    #[error("Scripted selection was never consumed")]
    PresenterNotCalled,

    #[error("Presenter failed: {0}")]
    Presenter(String),
}

/// Answer of a presenter: which of the offered candidates were chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenterResponse {
    /// Indices into the candidate slice that was presented.
    Chosen(Vec<usize>),
    Cancelled,
}

/// The party that picks constructor parameters.
///
/// Implementations receive the full ordered candidate list and answer by
/// index, so the negotiator can map the answer back to the original
/// descriptors. Presenting blocks until an answer is available.
pub trait SelectionPresenter {
    fn present(
        &mut self,
        candidates: &[FieldDescriptor],
    ) -> Result<PresenterResponse, NegotiationError>;
}

impl<F> SelectionPresenter for F
where
    F: FnMut(&[FieldDescriptor]) -> PresenterResponse,
{
    fn present(
        &mut self,
        candidates: &[FieldDescriptor],
    ) -> Result<PresenterResponse, NegotiationError> {
        Ok(self(candidates))
    }
}

/// Ask `presenter` to choose among `candidates`.
///
/// An empty candidate list is never presented and yields an empty selection.
/// The returned selection keeps declaration order and contains no duplicates,
/// whatever order the presenter answered in.
pub fn negotiate(
    candidates: &[FieldDescriptor],
    presenter: &mut dyn SelectionPresenter,
) -> Result<SelectionResult, NegotiationError> {
    if candidates.is_empty() {
        return Ok(SelectionResult::Selected(Vec::new()));
    }

    let indices = match presenter.present(candidates)? {
        PresenterResponse::Cancelled => return Ok(SelectionResult::Cancelled),
        PresenterResponse::Chosen(indices) => indices,
    };

    let mut chosen = vec![false; candidates.len()];
    for index in indices {
        match chosen.get_mut(index) {
            Some(slot) => *slot = true,
            None => {
                return Err(NegotiationError::UnknownCandidate {
                    index,
                    count: candidates.len(),
                })
            }
        }
    }

    let selected = candidates
        .iter()
        .zip(chosen)
        .filter_map(|(candidate, is_chosen)| is_chosen.then(|| candidate.clone()))
        .collect();

    Ok(SelectionResult::Selected(selected))
}

/// Canned answer for a [`ScriptedPresenter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Script {
    All,
    None,
    /// Choose candidates by binding name.
    Names(Vec<String>),
    Cancel,
}

/// Non-interactive presenter that answers exactly once with a fixed script.
///
/// Used by automation and tests. It records the labels it was shown, refuses
/// to answer twice, and [`ScriptedPresenter::finish`] reports a script that
/// was never asked for.
#[derive(Debug)]
pub struct ScriptedPresenter {
    script: Option<Script>,
    seen: Option<Vec<String>>,
}

impl ScriptedPresenter {
    pub fn new(script: Script) -> Self {
        Self {
            script: Some(script),
            seen: None,
        }
    }

    pub fn was_called(&self) -> bool {
        self.seen.is_some()
    }

    /// Labels of the candidates this presenter was shown, if it was called.
    pub fn seen_labels(&self) -> Option<&[String]> {
        self.seen.as_deref()
    }

    /// Check the script was consumed.
    pub fn finish(self) -> Result<(), NegotiationError> {
        if self.was_called() {
            Ok(())
        } else {
            Err(NegotiationError::PresenterNotCalled)
        }
    }
}

impl SelectionPresenter for ScriptedPresenter {
    fn present(
        &mut self,
        candidates: &[FieldDescriptor],
    ) -> Result<PresenterResponse, NegotiationError> {
        let script = self
            .script
            .take()
            .ok_or(NegotiationError::PresenterReused)?;
        self.seen = Some(candidates.iter().map(FieldDescriptor::label).collect());

        match script {
            Script::All => Ok(PresenterResponse::Chosen((0..candidates.len()).collect())),
            Script::None => Ok(PresenterResponse::Chosen(Vec::new())),
            Script::Cancel => Ok(PresenterResponse::Cancelled),
            Script::Names(names) => names
                .iter()
                .map(|name| {
                    candidates
                        .iter()
                        .position(|c| c.binding_name == *name)
                        .ok_or_else(|| NegotiationError::UnknownName(name.clone()))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(PresenterResponse::Chosen),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<FieldDescriptor> {
        ["n", "m", "k"]
            .iter()
            .enumerate()
            .map(|(position, name)| FieldDescriptor {
                position,
                accessor_name: name.to_string(),
                binding_name: name.to_string(),
                type_text: "i32".to_string(),
            })
            .collect()
    }

    fn names(result: &SelectionResult) -> Vec<String> {
        match result {
            SelectionResult::Selected(fields) => {
                fields.iter().map(|f| f.binding_name.clone()).collect()
            }
            SelectionResult::Cancelled => panic!("expected a selection"),
        }
    }

    // ============================================================================
    // negotiate tests
    // ============================================================================

    #[test]
    fn test_negotiate_skips_presenter_without_candidates() {
        let mut presenter = ScriptedPresenter::new(Script::Cancel);

        let result = negotiate(&[], &mut presenter).unwrap();

        assert_eq!(result, SelectionResult::Selected(vec![]));
        assert!(!presenter.was_called());
    }

    #[test]
    fn test_negotiate_restores_declaration_order() {
        let all = candidates();
        let mut presenter = |_: &[FieldDescriptor]| PresenterResponse::Chosen(vec![2, 0]);

        let result = negotiate(&all, &mut presenter).unwrap();
        assert_eq!(names(&result), vec!["n", "k"]);
    }

    #[test]
    fn test_negotiate_drops_duplicates() {
        let all = candidates();
        let mut presenter = |_: &[FieldDescriptor]| PresenterResponse::Chosen(vec![1, 1, 1]);

        let result = negotiate(&all, &mut presenter).unwrap();
        assert_eq!(names(&result), vec!["m"]);
    }

    #[test]
    fn test_negotiate_returns_original_descriptors() {
        let all = candidates();
        let mut presenter = |_: &[FieldDescriptor]| PresenterResponse::Chosen(vec![0, 1, 2]);

        let result = negotiate(&all, &mut presenter).unwrap();
        assert_eq!(result, SelectionResult::Selected(all.clone()));
    }

    #[test]
    fn test_negotiate_empty_selection_is_not_cancellation() {
        let all = candidates();
        let mut presenter = ScriptedPresenter::new(Script::None);

        let result = negotiate(&all, &mut presenter).unwrap();
        assert_eq!(result, SelectionResult::Selected(vec![]));
        assert!(!result.is_cancelled());
    }

    #[test]
    fn test_negotiate_cancellation() {
        let all = candidates();
        let mut presenter = ScriptedPresenter::new(Script::Cancel);

        let result = negotiate(&all, &mut presenter).unwrap();
        assert!(result.is_cancelled());
    }

    #[test]
    fn test_negotiate_rejects_out_of_range_index() {
        let all = candidates();
        let mut presenter = |_: &[FieldDescriptor]| PresenterResponse::Chosen(vec![3]);

        let err = negotiate(&all, &mut presenter).unwrap_err();
        assert_eq!(err, NegotiationError::UnknownCandidate { index: 3, count: 3 });
    }

    // ============================================================================
    // ScriptedPresenter tests
    // ============================================================================

    #[test]
    fn test_scripted_presenter_records_labels() {
        let all = candidates();
        let mut presenter = ScriptedPresenter::new(Script::All);

        negotiate(&all, &mut presenter).unwrap();

        assert_eq!(
            presenter.seen_labels().unwrap(),
            &["n : i32".to_string(), "m : i32".to_string(), "k : i32".to_string()]
        );
        assert!(presenter.finish().is_ok());
    }

    #[test]
    fn test_scripted_presenter_by_name() {
        let all = candidates();
        let mut presenter =
            ScriptedPresenter::new(Script::Names(vec!["k".to_string(), "n".to_string()]));

        let result = negotiate(&all, &mut presenter).unwrap();
        assert_eq!(names(&result), vec!["n", "k"]);
    }

    #[test]
    fn test_scripted_presenter_unknown_name() {
        let all = candidates();
        let mut presenter = ScriptedPresenter::new(Script::Names(vec!["x".to_string()]));

        let err = negotiate(&all, &mut presenter).unwrap_err();
        assert_eq!(err, NegotiationError::UnknownName("x".to_string()));
    }

    #[test]
    fn test_scripted_presenter_answers_once() {
        let all = candidates();
        let mut presenter = ScriptedPresenter::new(Script::All);

        negotiate(&all, &mut presenter).unwrap();
        let err = negotiate(&all, &mut presenter).unwrap_err();
        assert_eq!(err, NegotiationError::PresenterReused);
    }

    #[test]
    fn test_scripted_presenter_not_called() {
        let presenter = ScriptedPresenter::new(Script::All);
        assert_eq!(
            presenter.finish().unwrap_err(),
            NegotiationError::PresenterNotCalled
        );
    }
}
