//! Unit tests for provider error types

#[cfg(test)]
mod tests {
    use crate::provider::ProviderError;
    use std::io;

    #[test]
    fn test_unsupported() {
        let error = ProviderError::Unsupported("commit");
        assert!(error.is_unsupported());
        assert_eq!(error.to_string(), "Operation not supported: commit");
    }

    #[test]
    fn test_io_error_from() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let error: ProviderError = io_error.into();
        assert!(!error.is_unsupported());
        assert!(error.to_string().contains("denied"));
    }

    #[test]
    fn test_script_display() {
        let error = ProviderError::Script {
            status: "exit status: 2".to_string(),
            stderr: "boom".to_string(),
        };
        assert_eq!(error.to_string(), "Script failed (exit status: 2): boom");
    }
}
