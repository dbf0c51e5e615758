use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Schema definition for a tool, sent to the model in its
/// "available functions" list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl ToolSchema {
    /// Render this schema in the OpenAI function-calling format.
    pub fn to_openai_function(&self) -> Value {
        json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters,
            }
        })
    }
}

/// A chat-completion response, reduced to the fields needed to pull a
/// function call out of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletion {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Choice {
    pub message: CompletionMessage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Legacy single-function form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,
    /// Current tool-calls form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
}

/// A function call requested by the model. `arguments` is the raw JSON
/// string as produced by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    #[serde(default)]
    pub id: String,
    pub function: FunctionCall,
}

impl ChatCompletion {
    /// The function call carried by the first choice, whichever form the
    /// API returned it in.
    pub fn function_call(&self) -> Option<&FunctionCall> {
        let message = &self.choices.first()?.message;
        if let Some(call) = &message.function_call {
            return Some(call);
        }
        message
            .tool_calls
            .as_ref()
            .and_then(|calls| calls.first())
            .map(|call| &call.function)
    }
}
