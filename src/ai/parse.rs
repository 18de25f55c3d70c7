//! Extraction of the prompt array from free-form model output.

use super::GenerationError;

/// Find the first `[...]` span in `text` and parse it as a JSON array.
///
/// The span ends at the first `]` after the first `[`, so models that wrap
/// the array in prose or code fences still parse. Non-string elements are
/// skipped.
pub fn extract_prompts(text: &str) -> Result<Vec<String>, GenerationError> {
    let start = text
        .find('[')
        .ok_or_else(|| GenerationError::Malformed("No JSON array found in response".to_string()))?;
    let end = text[start..]
        .find(']')
        .map(|offset| start + offset)
        .ok_or_else(|| GenerationError::Malformed("No JSON array found in response".to_string()))?;

    let value: serde_json::Value = serde_json::from_str(&text[start..=end])
        .map_err(|e| GenerationError::Malformed(e.to_string()))?;

    let items = value
        .as_array()
        .ok_or_else(|| GenerationError::Malformed("Response is not an array".to_string()))?;

    Ok(items
        .iter()
        .filter_map(|v| v.as_str())
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_plain_array() {
        let prompts = extract_prompts(r#"["gato", "cachorro", "peixe"]"#).unwrap();
        assert_eq!(prompts, vec!["gato", "cachorro", "peixe"]);
    }

    #[test]
    fn test_extract_from_code_fence() {
        let text = "Aqui está:\n```json\n[\n  \"praia\",\n  \"montanha\"\n]\n```\n";
        let prompts = extract_prompts(text).unwrap();
        assert_eq!(prompts, vec!["praia", "montanha"]);
    }

    #[test]
    fn test_no_array_is_malformed() {
        let err = extract_prompts("I cannot help with that.").unwrap_err();
        assert!(matches!(err, GenerationError::Malformed(_)));
    }

    #[test]
    fn test_unterminated_array_is_malformed() {
        assert!(matches!(
            extract_prompts(r#"["a", "b""#),
            Err(GenerationError::Malformed(_))
        ));
    }

    #[test]
    fn test_invalid_json_inside_brackets() {
        assert!(matches!(
            extract_prompts("[gato, cachorro]"),
            Err(GenerationError::Malformed(_))
        ));
    }

    #[test]
    fn test_non_string_items_skipped() {
        let prompts = extract_prompts(r#"["um", 2, null, "três"]"#).unwrap();
        assert_eq!(prompts, vec!["um", "três"]);
    }
}
