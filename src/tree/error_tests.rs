//! Unit tests for tree error types

#[cfg(test)]
mod tests {
    use crate::tree::TreeError;

    #[test]
    fn test_out_of_range_display() {
        let error = TreeError::OutOfRange { depth: 2, index: 7 };
        assert_eq!(error.to_string(), "Index 7 out of range at depth 2");
    }

    #[test]
    fn test_depth_exceeded_display() {
        let error = TreeError::DepthExceeded(32);
        assert!(error.to_string().contains("32"));
    }

    #[test]
    fn test_not_a_group_debug() {
        let debug = format!("{:?}", TreeError::NotAGroup { depth: 1 });
        assert!(debug.contains("NotAGroup"));
    }
}
