use serde::de::DeserializeOwned;

/// Tagged result of parsing a backend response against a fixed schema.
///
/// The backend is schema-less and unreliable; every response is either
/// `Parsed` structured payload or `Unparsed` raw text the caller recovers
/// from with a fallback value. Malformed output never raises past the
/// parsing boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome<T> {
    /// The response matched the expected schema.
    Parsed(T),
    /// The response did not; the raw text is kept for logging.
    Unparsed(String),
}

/// Parses a backend response as JSON of type `T`, stripping any
/// surrounding markdown code fence first.
pub fn parse_response<T: DeserializeOwned>(raw: &str) -> ParseOutcome<T> {
    let cleaned = strip_fences(raw);
    match serde_json::from_str(cleaned) {
        Ok(value) => ParseOutcome::Parsed(value),
        Err(_) => ParseOutcome::Unparsed(raw.to_string()),
    }
}

/// Removes a leading ```` ```json ```` / ```` ``` ```` fence and the
/// matching trailing fence, if present.
fn strip_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Payload {
        value: i32,
    }

    #[test]
    fn test_plain_json_parses() {
        let outcome: ParseOutcome<Payload> = parse_response(r#"{"value": 7}"#);
        assert_eq!(outcome, ParseOutcome::Parsed(Payload { value: 7 }));
    }

    #[test]
    fn test_fenced_json_parses() {
        let raw = "```json\n{\"value\": 3}\n```";
        let outcome: ParseOutcome<Payload> = parse_response(raw);
        assert_eq!(outcome, ParseOutcome::Parsed(Payload { value: 3 }));
    }

    #[test]
    fn test_bare_fence_parses() {
        let raw = "```\n{\"value\": 1}\n```";
        let outcome: ParseOutcome<Payload> = parse_response(raw);
        assert_eq!(outcome, ParseOutcome::Parsed(Payload { value: 1 }));
    }

    #[test]
    fn test_prose_is_unparsed() {
        let raw = "Sure! Here is my plan: first we should research the topic.";
        let outcome: ParseOutcome<Payload> = parse_response(raw);
        assert_eq!(outcome, ParseOutcome::Unparsed(raw.to_string()));
    }

    #[test]
    fn test_wrong_schema_is_unparsed() {
        let raw = r#"{"other_key": true}"#;
        let outcome: ParseOutcome<Payload> = parse_response(raw);
        assert!(matches!(outcome, ParseOutcome::Unparsed(_)));
    }

    #[test]
    fn test_array_payloads() {
        let raw = "```json\n[{\"value\": 1}, {\"value\": 2}]\n```";
        let outcome: ParseOutcome<Vec<Payload>> = parse_response(raw);
        match outcome {
            ParseOutcome::Parsed(items) => assert_eq!(items.len(), 2),
            other => panic!("expected parsed, got {other:?}"),
        }
    }
}
