pub mod batch;
pub mod catalog;
pub mod quote;

use serde::Serialize;
use serde_json::Value;

/// What a subcommand hands back to `run`: the process exit code plus the
/// text already rendered for stdout.
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

/// Status envelope for commands that report about themselves rather than
/// printing a quotation document. `details` carries structured counters or
/// command-specific data; absent fields are omitted from the JSON.
#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: &'static str,
    status: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_class: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl CommandOutcome {
    fn render(self, exit_code: u8) -> CommandResult {
        let output = serde_json::to_string(&self).unwrap_or_else(|error| {
            format!(
                "{{\"command\":\"{}\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
                self.command,
                error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
            )
        });
        CommandResult { exit_code, output }
    }
}

impl CommandResult {
    pub fn success(command: &'static str, message: impl Into<String>) -> Self {
        CommandOutcome {
            command,
            status: "ok",
            message: message.into(),
            error_class: None,
            details: None,
        }
        .render(0)
    }

    pub fn success_with_details(
        command: &'static str,
        message: impl Into<String>,
        details: Value,
    ) -> Self {
        CommandOutcome {
            command,
            status: "ok",
            message: message.into(),
            error_class: None,
            details: Some(details),
        }
        .render(0)
    }

    pub fn failure(
        command: &'static str,
        error_class: &'static str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        CommandOutcome {
            command,
            status: "error",
            message: message.into(),
            error_class: Some(error_class),
            details: None,
        }
        .render(exit_code)
    }
}
