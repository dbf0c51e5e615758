use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::client::ExecClient;
use crate::config::ExecConfig;
use crate::error::{ExecError, Result};
use crate::types::{ChatCompletion, ToolSchema};

/// Trait for actions a model can invoke through function calling.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (used in function calling).
    fn name(&self) -> &str;

    /// Human-readable description of what the tool does.
    fn description(&self) -> &str;

    /// JSON Schema describing the tool's parameters.
    fn parameters_schema(&self) -> Value;

    /// Execute the tool with the given arguments.
    async fn execute(&self, args: Value) -> Result<String>;
}

/// Remote code execution exposed as a function-calling tool.
///
/// Wraps an [`ExecClient`] and adapts it to the shape LLM tool-use APIs
/// expect: a static descriptor with a single required string parameter
/// `code`, and an accessor that pulls the code argument out of a model
/// completion, runs it, and hands the text back.
pub struct CodeExecTool {
    client: ExecClient,
}

/// Build a ready-to-use code-exec tool for the given endpoint and token.
pub fn build_code_exec(
    url: impl AsRef<str>,
    bearer_token: impl Into<String>,
) -> Result<CodeExecTool> {
    let config = ExecConfig::new(url, bearer_token)?;
    Ok(CodeExecTool::new(ExecClient::new(config)?))
}

impl CodeExecTool {
    pub fn new(client: ExecClient) -> Self {
        Self { client }
    }

    /// The static descriptor for the model's "available functions" list.
    pub fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }

    /// Extract the code argument from a model completion, run it remotely,
    /// and return the captured output.
    ///
    /// Fails with [`ExecError::MalformedArguments`] before any request is
    /// made if the completion carries no function call, the arguments are
    /// not valid JSON, or the `code` field is missing.
    pub async fn from_response(&self, completion: &ChatCompletion) -> Result<String> {
        let call = completion.function_call().ok_or_else(|| {
            ExecError::MalformedArguments("Completion contains no function call".into())
        })?;
        let args: Value = serde_json::from_str(&call.arguments).map_err(|e| {
            ExecError::MalformedArguments(format!("Arguments are not valid JSON: {}", e))
        })?;
        self.execute(args).await
    }
}

#[async_trait]
impl Tool for CodeExecTool {
    fn name(&self) -> &str {
        "code_exec"
    }

    fn description(&self) -> &str {
        "Evaluates an arbitrary snippet of Python code in a sandbox and returns \
         whatever it printed to standard output / standard error. Specify the code \
         as if it were the contents of a file called main.py, with no code fences, \
         run as `python3 main.py`. There are no other files in the working \
         directory, so open() on anything else will fail. Always call print() with \
         the final result so that it reaches standard output."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "code": {
                    "type": "string",
                    "description": "The snippet of Python code to evaluate"
                }
            },
            "required": ["code"]
        })
    }

    async fn execute(&self, args: Value) -> Result<String> {
        #[derive(Deserialize)]
        struct Args {
            code: String,
        }
        let args: Args = serde_json::from_value(args).map_err(|e| {
            ExecError::MalformedArguments(format!("Expected a single string field 'code': {}", e))
        })?;

        // Models sometimes wrap the snippet in fences despite being told
        // not to.
        let code = strip_code_fences(&args.code);
        let response = self.client.exec(&code).await?;
        debug!("code to evaluate {:?}, response {:?}", code, response);
        Ok(response)
    }
}

/// Strip a surrounding markdown code fence, with or without a language tag.
fn strip_code_fences(code: &str) -> String {
    let trimmed = code.trim();
    let lines: Vec<&str> = trimmed.lines().collect();
    if lines.len() >= 2 && trimmed.starts_with("```") && trimmed.ends_with("```") {
        lines[1..lines.len() - 1].join("\n")
    } else {
        trimmed.to_string()
    }
}
