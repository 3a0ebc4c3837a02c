use serde::{Deserialize, Deserializer, Serialize};

/// Body of a chat request (streaming and buffered endpoints share it).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatRequest {
    pub user_input: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl ChatRequest {
    pub fn new(user_input: impl Into<String>) -> Self {
        Self {
            user_input: user_input.into(),
            problem_id: None,
            session_id: None,
        }
    }

    pub fn with_problem_id(mut self, problem_id: Option<String>) -> Self {
        self.problem_id = problem_id;
        self
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

/// Reply of the buffered chat endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatResponse {
    pub response: String,
    /// Set by the server when the question is unrelated to the active problem.
    #[serde(default, deserialize_with = "null_as_false")]
    pub out_of_scope: bool,
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_request_serializes_only_input() {
        let json = serde_json::to_value(ChatRequest::new("hi")).unwrap();
        assert_eq!(json, serde_json::json!({ "user_input": "hi" }));
    }

    #[test]
    fn test_request_with_ids() {
        let request = ChatRequest::new("hi")
            .with_problem_id(Some("two_sum".to_string()))
            .with_session_id("s-1");
        let json = serde_json::to_value(request).unwrap();
        assert_eq!(json["problem_id"], "two_sum");
        assert_eq!(json["session_id"], "s-1");
    }

    #[test]
    fn test_response_out_of_scope_defaults_false() {
        let response: ChatResponse = serde_json::from_str(r#"{"response":"ok"}"#).unwrap();
        assert!(!response.out_of_scope);
    }

    #[test]
    fn test_response_null_out_of_scope_is_false() {
        let response: ChatResponse =
            serde_json::from_str(r#"{"response":"ok","out_of_scope":null}"#).unwrap();
        assert_eq!(response.response, "ok");
        assert!(!response.out_of_scope);
    }
}
