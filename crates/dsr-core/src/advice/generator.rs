use serde::{Deserialize, Serialize};
use std::io::Write;
use std::process::{Command, Stdio};

use super::prompt::AdvicePrompt;
use crate::dsr::engine::CalculationResult;
use crate::dsr::params::LoanParameters;
use crate::{DsrError, DsrResult};

/// Shown in place of advice when the generator fails.
pub const ADVICE_FALLBACK_MESSAGE: &str =
    "Advice is unavailable right now. The DSR calculation above is unaffected; try again later.";

/// Seam to any external text-generation service.
pub trait AdviceGenerator {
    fn generate(&self, prompt: &AdvicePrompt) -> DsrResult<String>;
}

/// Result of an advice request. Never an error: failures become a
/// user-facing message kept apart from the calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AdviceOutcome {
    Advice { text: String },
    Unavailable { message: String, reason: String },
}

impl AdviceOutcome {
    pub fn is_available(&self) -> bool {
        matches!(self, AdviceOutcome::Advice { .. })
    }
}

/// Request advice for a result that has already been computed.
pub fn request_advice(
    generator: &dyn AdviceGenerator,
    params: &LoanParameters,
    result: &CalculationResult,
) -> AdviceOutcome {
    let prompt = AdvicePrompt::build(params, result);
    match generator.generate(&prompt) {
        Ok(text) if !text.trim().is_empty() => AdviceOutcome::Advice {
            text: text.trim().to_string(),
        },
        Ok(_) => {
            tracing::warn!("advice generator returned empty text");
            AdviceOutcome::Unavailable {
                message: ADVICE_FALLBACK_MESSAGE.to_string(),
                reason: "empty response".into(),
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "advice generation failed");
            AdviceOutcome::Unavailable {
                message: ADVICE_FALLBACK_MESSAGE.to_string(),
                reason: e.to_string(),
            }
        }
    }
}

/// Runs an external program, writes the prompt to its stdin and reads the
/// advice from its stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandAdviceGenerator {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandAdviceGenerator {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl AdviceGenerator for CommandAdviceGenerator {
    fn generate(&self, prompt: &AdvicePrompt) -> DsrResult<String> {
        tracing::debug!(program = %self.program, "spawning advice command");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                DsrError::AdviceUnavailable(format!("failed to start '{}': {e}", self.program))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(prompt.to_text().as_bytes())
                .map_err(|e| DsrError::AdviceUnavailable(format!("failed to send prompt: {e}")))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| DsrError::AdviceUnavailable(format!("advice command failed: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DsrError::AdviceUnavailable(format!(
                "'{}' exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if text.is_empty() {
            return Err(DsrError::AdviceUnavailable(format!(
                "'{}' produced no output",
                self.program
            )));
        }
        Ok(text)
    }
}
