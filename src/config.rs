use std::collections::HashMap;
use std::time::Duration;

use url::Url;

use crate::error::{ExecError, Result};

/// Immutable configuration for the remote code-exec endpoint.
///
/// Holds the deployment URL and the bearer token (the `EVAL_TOKEN_AUTH`
/// deployment secret), plus the optional per-deployment request knobs.
/// Built once and reused for every call.
#[derive(Debug, Clone)]
pub struct ExecConfig {
    pub(crate) url: Url,
    pub(crate) bearer_token: String,
    /// Files written to the sandbox working directory before execution.
    pub(crate) files: Option<HashMap<String, String>>,
    /// Run the snippet under `strace` for debugging.
    pub(crate) strace: bool,
    /// Sandbox echoes evaluated expressions like the `python` REPL,
    /// instead of requiring an explicit `print()`.
    pub(crate) interpreter_mode: bool,
    /// HTTP timeout for the round-trip. No default is assumed; callers
    /// that need one set it here.
    pub(crate) timeout: Option<Duration>,
}

impl ExecConfig {
    /// Create a configuration for the given endpoint URL and bearer token.
    ///
    /// Fails if the URL is empty or unparseable, or the token is empty.
    pub fn new(url: impl AsRef<str>, bearer_token: impl Into<String>) -> Result<Self> {
        let raw = url.as_ref();
        if raw.trim().is_empty() {
            return Err(ExecError::Config("Endpoint URL must not be empty".into()));
        }
        let url =
            Url::parse(raw).map_err(|e| ExecError::Config(format!("Invalid endpoint URL: {}", e)))?;

        let bearer_token = bearer_token.into();
        if bearer_token.trim().is_empty() {
            return Err(ExecError::Config("Bearer token must not be empty".into()));
        }

        Ok(Self {
            url,
            bearer_token,
            files: None,
            strace: false,
            interpreter_mode: false,
            timeout: None,
        })
    }

    /// Files (name -> contents) to place in the sandbox working directory.
    pub fn with_files(mut self, files: HashMap<String, String>) -> Self {
        self.files = Some(files);
        self
    }

    /// Run the code under `strace` (debugging aid).
    pub fn with_strace(mut self, strace: bool) -> Self {
        self.strace = strace;
        self
    }

    /// Enable interpreter mode (expressions echo to stdout like the REPL).
    pub fn with_interpreter_mode(mut self, interpreter_mode: bool) -> Self {
        self.interpreter_mode = interpreter_mode;
        self
    }

    /// Timeout applied to the HTTP round-trip. Unset means no client-side
    /// timeout beyond what the transport imposes.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The configured endpoint URL.
    pub fn url(&self) -> &Url {
        &self.url
    }
}
