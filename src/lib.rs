//! Thin client for a hosted code-execution sandbox.
//!
//! Posts an untrusted code snippet to a remote eval endpoint over HTTP,
//! authorized with a bearer token, and returns whatever the sandbox printed
//! to stdout/stderr. [`CodeExecTool`] additionally exposes the call as a
//! function-calling tool so an LLM agent can run code and read the result
//! back in conversation.
//!
//! ```no_run
//! use code_exec_client::build_code_exec;
//!
//! # async fn demo() -> code_exec_client::Result<()> {
//! let code_exec = build_code_exec("https://eval.example.repl.co", "EVAL_TOKEN_AUTH value")?;
//!
//! // Advertise to the model:
//! let functions = vec![code_exec.schema().to_openai_function()];
//!
//! // ...send a chat request, then run whatever the model asked for:
//! # let completion = todo!();
//! let output = code_exec.from_response(&completion).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod tool;
pub mod types;

pub use client::ExecClient;
pub use config::ExecConfig;
pub use error::{ExecError, Result};
pub use tool::{build_code_exec, CodeExecTool, Tool};
pub use types::{ChatCompletion, FunctionCall, ToolSchema};
