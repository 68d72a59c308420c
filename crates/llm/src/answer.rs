use serde::Serialize;
use serde_json::Value;

/// Request body accepted by the assistant endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest<'a> {
    pub question: &'a str,
}

/// Answer extracted from a successful exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Text(String),
    /// The response parsed but carried no usable answer.
    Missing,
}

/// Pulls the answer out of a response body.
///
/// Servers either wrap the model output (`{"answer": {"content": ...}}`) or
/// return it directly (`{"answer": ...}`); the nested form wins when both apply.
pub fn extract_answer(body: &Value) -> Answer {
    let Some(answer) = body.get("answer") else {
        return Answer::Missing;
    };

    if let Some(text) = answer.get("content").and_then(render_scalar) {
        return Answer::Text(text);
    }

    render_scalar(answer).map_or(Answer::Missing, Answer::Text)
}

fn render_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::String(_) | Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
