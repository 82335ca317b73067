use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use buffered_note_core::params::NoteParameters;
use buffered_note_core::payment::{self, PaymentInput};
use buffered_note_core::table::{self, TableInput};

use crate::input;

/// Note parameter overrides shared by all subcommands. Any flag left unset
/// keeps the reference term.
#[derive(Args)]
pub struct ParamOverrides {
    /// Note principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual contingent interest rate (e.g. 0.122 for 12.2%)
    #[arg(long)]
    pub contingent_interest_rate: Option<Decimal>,

    /// Monthly contingent interest rate (informational)
    #[arg(long)]
    pub monthly_interest_rate: Option<Decimal>,

    /// Buffer threshold as a final-value ratio (e.g. 0.90)
    #[arg(long)]
    pub buffer_threshold: Option<Decimal>,

    /// Downside buffer amount (typically 1 - buffer_threshold)
    #[arg(long)]
    pub buffer_amount: Option<Decimal>,

    /// Fixed contingent coupon paid in the protected region
    #[arg(long)]
    pub contingent_interest_payment: Option<Decimal>,
}

impl ParamOverrides {
    fn apply(&self) -> NoteParameters {
        let mut params = NoteParameters::default();
        if let Some(v) = self.principal {
            params.principal = v;
        }
        if let Some(v) = self.contingent_interest_rate {
            params.contingent_interest_rate = v;
        }
        if let Some(v) = self.monthly_interest_rate {
            params.monthly_interest_rate = v;
        }
        if let Some(v) = self.buffer_threshold {
            params.buffer_threshold = v;
        }
        if let Some(v) = self.buffer_amount {
            params.buffer_amount = v;
        }
        if let Some(v) = self.contingent_interest_payment {
            params.contingent_interest_payment = v;
        }
        params
    }
}

/// Arguments for a single payment calculation
#[derive(Args)]
pub struct PaymentArgs {
    /// Underlying return as a fraction (e.g. -0.10 for -10%)
    #[arg(long, alias = "return", allow_hyphen_values = true)]
    pub underlying_return: Option<Decimal>,

    #[command(flatten)]
    pub params: ParamOverrides,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the hypothetical payment table
#[derive(Args)]
pub struct TableArgs {
    /// Comma-separated scenario returns, each a fraction or percentage
    /// (e.g. "0.10,-10%,-0.1001"). Defaults to the reference list.
    #[arg(long, allow_hyphen_values = true)]
    pub returns: Option<String>,

    #[command(flatten)]
    pub params: ParamOverrides,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for parameter validation
#[derive(Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub params: ParamOverrides,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_payment(args: PaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let payment_input: PaymentInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let underlying_return = args
            .underlying_return
            .ok_or("--underlying-return is required (or provide --input)")?;
        PaymentInput {
            underlying_return,
            params: Some(args.params.apply()),
        }
    };

    let result = payment::compute_payment(&payment_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_table(args: TableArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let table_input: TableInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let scenarios = args.returns.as_deref().map(|list| {
            list.split(',')
                .map(|entry| Value::String(entry.trim().to_string()))
                .collect()
        });
        TableInput {
            params: Some(args.params.apply()),
            scenarios,
        }
    };

    let result = table::compute_payoff_table(&table_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_validate(args: ValidateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let params: NoteParameters = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        args.params.apply()
    };

    params.validate()?;
    Ok(serde_json::json!({
        "valid": true,
        "params": params,
    }))
}
