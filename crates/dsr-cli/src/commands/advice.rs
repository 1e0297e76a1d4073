use clap::Args;
use colored::Colorize;
use serde_json::Value;

use dsr_core::advice::generator::{request_advice, AdviceOutcome, CommandAdviceGenerator};
use dsr_core::advice::prompt::AdvicePrompt;
use dsr_core::dsr::engine;

use super::dsr::LoanArgs;

/// Arguments for calculation plus generated advice
#[derive(Args)]
pub struct AdviseArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Program that reads the prompt on stdin and writes advice to stdout
    #[arg(long, env = "DSR_ADVICE_COMMAND")]
    pub command: String,

    /// Argument passed to the advice program (repeatable)
    #[arg(long = "arg", allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Arguments for printing the advice prompt
#[derive(Args)]
pub struct PromptArgs {
    #[command(flatten)]
    pub loan: LoanArgs,
}

pub fn run_advise(args: AdviseArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let params = args.loan.resolve()?;
    let calculation = engine::calculate_dsr(&params)?;

    let generator = CommandAdviceGenerator::new(args.command, args.args);
    let outcome = request_advice(&generator, &params, &calculation.result);

    if let AdviceOutcome::Unavailable { message, reason } = &outcome {
        eprintln!("{}: {} ({})", "warning".yellow().bold(), message, reason);
    }

    let mut value = serde_json::to_value(calculation)?;
    if let Value::Object(ref mut map) = value {
        map.insert("advice".into(), serde_json::to_value(outcome)?);
    }
    Ok(value)
}

/// Build the prompt text an advice service would receive.
pub fn run_prompt(args: PromptArgs) -> Result<String, Box<dyn std::error::Error>> {
    let params = args.loan.resolve()?;
    let result = engine::compute_dsr(&params);
    Ok(AdvicePrompt::build(&params, &result).to_text())
}
