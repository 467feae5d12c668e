//! Unit tests for codec error types

#[cfg(test)]
mod tests {
    use crate::codec::CodecError;

    #[test]
    fn test_not_an_array_display() {
        assert_eq!(
            CodecError::NotAnArray.to_string(),
            "Top-level JSON value must be an array"
        );
    }

    #[test]
    fn test_layer_jump_display() {
        let error = CodecError::LayerJump { offset: 16, from: 0, to: 2 };
        assert_eq!(
            error.to_string(),
            "Record at byte 16 jumps from layer 0 to layer 2"
        );
    }

    #[test]
    fn test_json_error_from() {
        let json_error = serde_json::from_str::<serde_json::Value>("[").unwrap_err();
        let error: CodecError = json_error.into();
        assert!(error.to_string().starts_with("JSON error"));
    }
}
