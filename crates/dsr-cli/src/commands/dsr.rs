use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use dsr_core::dsr::engine;
use dsr_core::dsr::params::LoanParameters;
use dsr_core::dsr::{ratio, schedule, summary};
use dsr_core::{CollateralType, RepaymentMethod};

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RepaymentArg {
    EqualInstallment,
    EqualPrincipal,
}

impl From<RepaymentArg> for RepaymentMethod {
    fn from(arg: RepaymentArg) -> Self {
        match arg {
            RepaymentArg::EqualInstallment => RepaymentMethod::EqualInstallment,
            RepaymentArg::EqualPrincipal => RepaymentMethod::EqualPrincipal,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CollateralArg {
    Housing,
    Other,
}

impl From<CollateralArg> for CollateralType {
    fn from(arg: CollateralArg) -> Self {
        match arg {
            CollateralArg::Housing => CollateralType::Housing,
            CollateralArg::Other => CollateralType::Other,
        }
    }
}

/// Loan scenario, from flags or a JSON/YAML document
#[derive(Args, Debug, Clone)]
pub struct LoanArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Annual income
    #[arg(long, alias = "income")]
    pub annual_income: Option<Decimal>,

    /// Loan principal
    #[arg(long, alias = "amount")]
    pub loan_amount: Option<Decimal>,

    /// Nominal annual interest rate in percent (4.5 = 4.5%)
    #[arg(long, alias = "rate")]
    pub interest_rate: Option<Decimal>,

    /// Loan term in years
    #[arg(long, alias = "term")]
    pub loan_term_year: Option<u32>,

    /// Interest-only years at the start of the term
    #[arg(long, alias = "grace", default_value_t = 0)]
    pub grace_period_year: u32,

    /// Repayment method after the grace period
    #[arg(long, value_enum, default_value = "equal-installment")]
    pub repayment_method: RepaymentArg,

    /// Collateral type
    #[arg(long, value_enum, default_value = "housing")]
    pub collateral_type: CollateralArg,

    /// Apply the stress-rate add-on to the interest burden
    #[arg(long, alias = "stress")]
    pub apply_stress_dsr: bool,
}

impl LoanArgs {
    /// Resolve the scenario (file, then stdin, then flags) and validate it.
    pub fn resolve(&self) -> Result<LoanParameters, Box<dyn std::error::Error>> {
        let params: LoanParameters = if let Some(ref path) = self.input {
            input::file::read_document(path)?
        } else if let Some(data) = input::stdin::read_stdin()? {
            data
        } else {
            self.params_from_flags()?
        };
        params.validate()?;
        Ok(params)
    }

    fn params_from_flags(&self) -> Result<LoanParameters, Box<dyn std::error::Error>> {
        Ok(LoanParameters {
            annual_income: self
                .annual_income
                .ok_or("--annual-income is required (or provide --input)")?,
            loan_amount: self
                .loan_amount
                .ok_or("--loan-amount is required (or provide --input)")?,
            interest_rate: self
                .interest_rate
                .ok_or("--interest-rate is required (or provide --input)")?,
            loan_term_year: self
                .loan_term_year
                .ok_or("--loan-term-year is required (or provide --input)")?,
            grace_period_year: self.grace_period_year,
            repayment_method: self.repayment_method.into(),
            collateral_type: self.collateral_type.into(),
            apply_stress_dsr: self.apply_stress_dsr,
        })
    }
}

/// Arguments for the full DSR calculation
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct CalculateArgs {
    #[command(flatten)]
    pub loan: LoanArgs,
}

/// Arguments for the monthly schedule
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Roll the schedule up into loan years
    #[arg(long)]
    pub yearly: bool,
}

/// Arguments for the stress pass
#[derive(Args)]
pub struct StressArgs {
    #[command(flatten)]
    pub loan: LoanArgs,
}

pub fn run_calculate(args: CalculateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let params = args.loan.resolve()?;
    let result = engine::calculate_dsr(&params)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let params = args.loan.resolve()?;
    let actual = schedule::generate_actual_schedule(&params);
    if args.yearly {
        Ok(serde_json::to_value(summary::summarize_by_year(
            &actual.monthly_payments,
        ))?)
    } else {
        Ok(serde_json::to_value(actual.monthly_payments)?)
    }
}

pub fn run_stress(args: StressArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let params = args.loan.resolve()?;
    let stress = schedule::generate_stress_schedule(&params);
    let breakdown = ratio::aggregate(&params, stress.total_stress_interest);
    let add_on = if params.apply_stress_dsr {
        schedule::STRESS_RATE_ADD_ON
    } else {
        Decimal::ZERO
    };
    Ok(serde_json::json!({
        "nominal_rate": params.interest_rate,
        "stress_rate_used": stress.stress_rate_used,
        "stress_add_on": add_on,
        "total_stress_interest": stress.total_stress_interest,
        "annual_interest_burden": breakdown.annual_interest_burden,
        "annual_principal_burden": breakdown.annual_principal_burden,
        "dsr_ratio": breakdown.dsr_ratio,
    }))
}
