use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use salary_advance_core::salary::{normalize_salary, PayFrequency};
use salary_advance_core::types::round_money;

#[derive(Args)]
pub struct NormalizeArgs {
    /// Gross salary per pay period
    #[arg(long)]
    pub gross_salary: Decimal,

    /// Pay frequency: Weekly, Bi-Weekly, Monthly or Annually
    #[arg(long)]
    pub pay_frequency: String,
}

pub fn run_normalize(args: NormalizeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let frequency: PayFrequency = args.pay_frequency.parse()?;
    let monthly = normalize_salary(args.gross_salary, frequency)?;

    Ok(json!({
        "grossSalary": args.gross_salary,
        "payFrequency": frequency,
        "periodsPerYear": frequency.periods_per_year(),
        "monthlySalary": round_money(monthly),
    }))
}
