use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result envelope handed to the CLI: a status, a human line, and
/// machine-readable details for `--json` output. The test command also
/// records the runner's own exit status here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub status: CommandStatus,
    pub message: String,
    #[serde(default)]
    pub details: Value,
    /// Exit status of a spawned test runner. When set, this becomes the
    /// process exit code verbatim, so CI observes the runner's failure,
    /// not our own status mapping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
}

impl ExecutionOutcome {
    fn new(status: CommandStatus, message: impl Into<String>, details: Value) -> Self {
        Self {
            status,
            message: message.into(),
            details,
            exit_code: None,
        }
    }

    pub fn success(message: impl Into<String>, details: Value) -> Self {
        Self::new(CommandStatus::Ok, message, details)
    }

    pub fn user_error(message: impl Into<String>, details: Value) -> Self {
        Self::new(CommandStatus::UserError, message, details)
    }

    pub fn failure(message: impl Into<String>, details: Value) -> Self {
        Self::new(CommandStatus::Failure, message, details)
    }

    /// Record a runner's exit status for propagation.
    #[must_use]
    pub fn with_exit_code(mut self, code: i32) -> Self {
        self.exit_code = Some(code);
        self
    }

    /// The code the process should exit with: a recorded runner status
    /// wins, otherwise ok/user-error/failure map to 0/1/2.
    pub fn process_code(&self) -> i32 {
        if let Some(code) = self.exit_code {
            return code;
        }
        match self.status {
            CommandStatus::Ok => 0,
            CommandStatus::UserError => 1,
            CommandStatus::Failure => 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum CommandStatus {
    Ok,
    UserError,
    Failure,
}
