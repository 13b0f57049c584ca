//! Parse raw model output into a JSON value
//!
//! Models sometimes wrap JSON in markdown code fences even when told not to;
//! the fences are stripped before parsing.

use crate::error::ExtractorError;
use serde_json::Value;

/// Parse model output text into a JSON value, stripping markdown fences.
pub fn parse_model_output(response: &str) -> Result<Value, ExtractorError> {
    let json_str = strip_fences(response)?;
    serde_json::from_str(&json_str)
        .map_err(|e| ExtractorError::InvalidFormat(format!("output is not valid JSON: {e}")))
}

/// Remove a surrounding markdown code block, if present.
fn strip_fences(response: &str) -> Result<String, ExtractorError> {
    let trimmed = response.trim();

    if trimmed.starts_with("```json") || trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() < 2 {
            return Err(ExtractorError::InvalidFormat("empty code block".to_string()));
        }
        // Skip the opening fence and the closing fence.
        let json_lines = &lines[1..lines.len().saturating_sub(1)];
        Ok(json_lines.join("\n"))
    } else {
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_json() {
        let value = parse_model_output(r#"{"trials": []}"#).unwrap();
        assert!(value["trials"].is_array());
    }

    #[test]
    fn test_parse_fenced_json() {
        let response = "```json\n{\"defendants\": []}\n```";
        let value = parse_model_output(response).unwrap();
        assert!(value["defendants"].is_array());
    }

    #[test]
    fn test_parse_fence_without_language() {
        let response = "```\n{\"key\": 1}\n```";
        let value = parse_model_output(response).unwrap();
        assert_eq!(value["key"], 1);
    }

    #[test]
    fn test_parse_surrounding_whitespace() {
        let value = parse_model_output("  \n {\"key\": true} \n").unwrap();
        assert_eq!(value["key"], true);
    }

    #[test]
    fn test_non_json_is_invalid_format() {
        let result = parse_model_output("I cannot extract that.");
        assert!(matches!(result, Err(ExtractorError::InvalidFormat(_))));
    }

    #[test]
    fn test_empty_code_block_rejected() {
        let result = parse_model_output("```");
        assert!(matches!(result, Err(ExtractorError::InvalidFormat(_))));
    }
}
