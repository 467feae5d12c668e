//! Unit tests for engine error types

#[cfg(test)]
mod tests {
    use crate::engine::EngineError;
    use crate::history::HistoryError;
    use crate::provider::ProviderError;
    use crate::tags::TagError;
    use crate::tree::{Path, TreeError};

    #[test]
    fn test_structural_violation_message() {
        let error: EngineError = TagError::MultipleChecked.into();
        assert_eq!(error.to_string(), "Radio group must have at most one checked item");
        assert!(!error.is_silent());
    }

    #[test]
    fn test_tree_errors_map_to_out_of_range() {
        let error: EngineError = TreeError::OutOfRange { depth: 0, index: 3 }.into();
        assert!(matches!(error, EngineError::OutOfRange(_)));
        assert!(error.is_silent());
    }

    #[test]
    fn test_allocation_failure_is_not_silent() {
        let error: EngineError = TreeError::AllocationFailure.into();
        assert_eq!(error, EngineError::AllocationFailure);
        assert!(!error.is_silent());
    }

    #[test]
    fn test_unsupported_provider_is_silent() {
        let error: EngineError = ProviderError::Unsupported("delete").into();
        assert_eq!(error, EngineError::ProviderUnavailable("delete".to_string()));
        assert!(error.is_silent());

        let error: EngineError = ProviderError::NotFound("/x".to_string()).into();
        assert_eq!(error.to_string(), "Not found: /x");
        assert!(!error.is_silent());
    }

    #[test]
    fn test_history_messages() {
        let error: EngineError = HistoryError::NothingToRedo.into();
        assert_eq!(error.to_string(), "Nothing to redo");
    }

    #[test]
    fn test_stale_history_is_visible() {
        let error = EngineError::StaleHistory(Path::from([0, 1]));
        assert_eq!(error.to_string(), format!("History is out of date at [{}]", Path::from([0, 1])));
        assert!(!error.is_silent());
    }
}
