use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

pub fn parse_datetime(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("failed to parse {field}"))
}

pub fn encode_answers(answers: &[String]) -> Result<String> {
    serde_json::to_string(answers).context("failed to serialize answers")
}

pub fn decode_answers(raw: &str) -> Result<Vec<String>> {
    serde_json::from_str(raw).context("failed to parse answers_json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answers_keep_question_order() {
        let answers = vec!["b".to_string(), "a".to_string(), "".to_string()];
        let encoded = encode_answers(&answers).unwrap();
        assert_eq!(decode_answers(&encoded).unwrap(), answers);
    }

    #[test]
    fn bad_datetime_names_the_field() {
        let err = parse_datetime("yesterday", "timestamp").unwrap_err();
        assert!(err.to_string().contains("timestamp"));
    }
}
