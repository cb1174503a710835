use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use salary_advance_core::amortization::{self, LoanTerms};

use crate::input;

/// Arguments shared by the loan commands
#[derive(Args)]
pub struct LoanArgs {
    /// Path to JSON input file with principal, annualRatePercent, termMonths
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (5 = 5%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term in months
    #[arg(long, allow_negative_numbers = true)]
    pub term: Option<i64>,
}

fn loan_terms(args: LoanArgs) -> Result<LoanTerms, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return input::file::read_json(path);
    }
    if args.principal.is_none() {
        if let Some(terms) = input::stdin::read_stdin()? {
            return Ok(terms);
        }
    }

    Ok(LoanTerms {
        principal: args
            .principal
            .ok_or("--principal is required (or provide --input)")?,
        annual_rate_percent: args.rate.ok_or("--rate is required (or provide --input)")?,
        term_months: args.term.ok_or("--term is required (or provide --input)")?,
    })
}

pub fn run_repayable(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms = loan_terms(args)?;
    let result = amortization::analyze_loan(&terms, false)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_schedule(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms = loan_terms(args)?;
    let result = amortization::analyze_loan(&terms, true)?;
    Ok(serde_json::to_value(result)?)
}
