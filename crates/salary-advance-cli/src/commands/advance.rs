use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use salary_advance_core::{AdvancePolicy, AdvanceRequest, AdvanceService, InMemoryLoanStore, LoanStore};

use crate::input;

/// Arguments for a single advance request
#[derive(Args)]
pub struct AdvanceArgs {
    /// Path to JSON request file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Gross salary per pay period
    #[arg(long)]
    pub gross_salary: Option<Decimal>,

    /// Pay frequency: Weekly, Bi-Weekly, Monthly or Annually
    #[arg(long)]
    pub pay_frequency: Option<String>,

    /// Requested advance amount
    #[arg(long)]
    pub advance_amount: Option<Decimal>,

    /// Loan principal
    #[arg(long)]
    pub loan_amount: Option<Decimal>,

    /// Annual interest rate in percent (5 = 5%)
    #[arg(long)]
    pub interest_rate: Option<Decimal>,

    /// Loan term in months
    #[arg(long, allow_negative_numbers = true)]
    pub loan_term: Option<i64>,

    /// Include the month-by-month amortization schedule
    #[arg(long)]
    pub include_amortization: bool,
}

/// Arguments for processing many requests against one store
#[derive(Args)]
pub struct BatchArgs {
    /// Path to a JSON array of requests
    #[arg(long)]
    pub input: Option<String>,
}

fn request_from_flags(args: AdvanceArgs) -> Result<AdvanceRequest, Box<dyn std::error::Error>> {
    Ok(AdvanceRequest {
        gross_salary: args
            .gross_salary
            .ok_or("--gross-salary is required (or provide --input)")?,
        pay_frequency: args
            .pay_frequency
            .ok_or("--pay-frequency is required (or provide --input)")?,
        advance_amount: args
            .advance_amount
            .ok_or("--advance-amount is required (or provide --input)")?,
        loan_amount: args.loan_amount,
        interest_rate_percent: args.interest_rate,
        loan_term_months: args.loan_term,
        include_amortization: args.include_amortization,
    })
}

pub fn run_advance(
    args: AdvanceArgs,
    policy: AdvancePolicy,
) -> Result<Value, Box<dyn std::error::Error>> {
    let request: AdvanceRequest = if let Some(path) = args.input.clone() {
        input::file::read_json(&path)?
    } else if args.gross_salary.is_some() {
        request_from_flags(args)?
    } else if let Some(request) = input::stdin::read_stdin()? {
        request
    } else {
        request_from_flags(args)?
    };

    let service = AdvanceService::with_policy(InMemoryLoanStore::new(), policy)?;
    let outcome = service.process(&request)?;
    Ok(serde_json::to_value(outcome)?)
}

pub fn run_batch(args: BatchArgs, policy: AdvancePolicy) -> Result<Value, Box<dyn std::error::Error>> {
    let requests: Vec<AdvanceRequest> = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(requests) = input::stdin::read_stdin()? {
        requests
    } else {
        return Err("--input <file.json> or stdin required for batch processing".into());
    };

    let service = AdvanceService::with_policy(InMemoryLoanStore::new(), policy)?;

    let mut results = Vec::with_capacity(requests.len());
    let mut records = Vec::new();
    for (index, request) in requests.iter().enumerate() {
        match service.process(request) {
            Ok(outcome) => {
                records.push(service.get_record(&outcome.loan_id)?);
                results.push(serde_json::to_value(outcome)?);
            }
            Err(e) => {
                tracing::warn!(index, error = %e, "batch request failed");
                results.push(json!({ "index": index, "error": e.public_message() }));
            }
        }
    }

    Ok(json!({
        "results": results,
        "stored": service.store().len(),
        "records": records,
    }))
}
