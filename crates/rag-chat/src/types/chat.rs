//! Request and response bodies for the chat endpoint

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Extract the question from a raw `/chat` body
///
/// Anything that is not a JSON object with a non-null `question` counts as a
/// missing question. A present but non-string question fails like any other
/// chain error.
pub fn question_from_body(body: &[u8]) -> Result<String> {
    let value: Value = serde_json::from_slice(body).map_err(|_| Error::MissingQuestion)?;

    match value.get("question") {
        None | Some(Value::Null) => Err(Error::MissingQuestion),
        Some(Value::String(question)) => Ok(question.clone()),
        Some(_) => Err(Error::InvalidQuestion),
    }
}

/// Successful chat response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Always "success"
    pub status: String,
    /// The question as received
    pub question: String,
    /// Raw completion text
    pub answer: String,
}

impl ChatResponse {
    pub fn new(question: String, answer: String) -> Self {
        Self {
            status: "success".to_string(),
            question,
            answer,
        }
    }
}

/// Error body shared by client and server failures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always "error"
    pub status: String,
    /// Human readable message
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_extracted() {
        let q = question_from_body(br#"{"question": "What is X?"}"#).unwrap();
        assert_eq!(q, "What is X?");
    }

    #[test]
    fn test_missing_question() {
        assert!(matches!(question_from_body(b"{}"), Err(Error::MissingQuestion)));
        assert!(matches!(
            question_from_body(br#"{"question": null}"#),
            Err(Error::MissingQuestion)
        ));
        assert!(matches!(question_from_body(b""), Err(Error::MissingQuestion)));
        assert!(matches!(question_from_body(b"not json"), Err(Error::MissingQuestion)));
        assert!(matches!(question_from_body(b"[1, 2]"), Err(Error::MissingQuestion)));
    }

    #[test]
    fn test_non_string_question() {
        assert!(matches!(
            question_from_body(br#"{"question": 42}"#),
            Err(Error::InvalidQuestion)
        ));
    }

    #[test]
    fn test_success_body_shape() {
        let body = serde_json::to_value(ChatResponse::new("q".into(), "a".into())).unwrap();
        assert_eq!(body["status"], "success");
        assert_eq!(body["question"], "q");
        assert_eq!(body["answer"], "a");
    }
}
