use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::AdvanceError;
use crate::types::*;
use crate::AdvanceResult;

/// Percent-per-year to rate-per-month divisor (100 * 12)
const PERCENT_MONTHS: Decimal = dec!(1200);

/// Longest schedule that will be materialised (100 years)
pub const MAX_SCHEDULE_MONTHS: i64 = 1200;

/// Principal, annual rate and term of an installment loan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanTerms {
    pub principal: Money,
    /// Annual nominal rate in percent (5 = 5%)
    #[serde(alias = "annual_rate_percent")]
    pub annual_rate_percent: Decimal,
    #[serde(alias = "term_months")]
    pub term_months: i64,
}

/// One month of a fixed-payment amortization schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmortizationRow {
    pub month: u32,
    pub payment: Money,
    pub principal_paid: Money,
    pub interest_paid: Money,
    pub remaining_balance: Money,
}

/// Column totals of a schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSummary {
    pub total_paid: Money,
    pub total_interest: Money,
    pub total_principal: Money,
}

/// Everything computed for a loan in one pass
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanAnalysis {
    pub total_repayable: Money,
    pub monthly_payment: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Vec<AmortizationRow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<ScheduleSummary>,
}

fn monthly_rate(annual_rate_percent: Decimal) -> Rate {
    annual_rate_percent / PERCENT_MONTHS
}

fn overflow(context: &str) -> AdvanceError {
    AdvanceError::loan_param(context, "value out of representable range")
}

/// (1 + r)^n
fn growth_factor(rate: Rate, periods: i64) -> AdvanceResult<Decimal> {
    (Decimal::ONE + rate)
        .checked_powu(periods as u64)
        .ok_or_else(|| overflow("interest_rate_percent"))
}

fn check_principal_and_rate(principal: Money, annual_rate_percent: Decimal) -> AdvanceResult<()> {
    if principal <= Decimal::ZERO {
        return Err(AdvanceError::loan_param(
            "loan_amount",
            "Loan principal must be positive",
        ));
    }
    if annual_rate_percent < Decimal::ZERO {
        return Err(AdvanceError::loan_param(
            "interest_rate_percent",
            "Interest rate must not be negative",
        ));
    }
    Ok(())
}

fn check_payment_inputs(
    principal: Money,
    annual_rate_percent: Decimal,
    term_months: i64,
) -> AdvanceResult<()> {
    if term_months <= 0 {
        return Err(AdvanceError::loan_param(
            "loan_term_months",
            format!("Term must be at least 1 month, got {term_months}"),
        ));
    }
    check_principal_and_rate(principal, annual_rate_percent)
}

/// Total repayable under monthly compounding, rounded to cents.
///
/// `principal * (1 + rate/1200)^term_months`; a zero rate returns the
/// principal unchanged.
pub fn total_repayable(
    principal: Money,
    annual_rate_percent: Decimal,
    term_months: i64,
) -> AdvanceResult<Money> {
    if term_months <= 0 {
        return Err(AdvanceError::InvalidTerm(term_months));
    }
    check_principal_and_rate(principal, annual_rate_percent)?;

    if annual_rate_percent.is_zero() {
        return Ok(round_money(principal));
    }

    let factor = growth_factor(monthly_rate(annual_rate_percent), term_months)?;
    let total = principal
        .checked_mul(factor)
        .ok_or_else(|| overflow("loan_amount"))?;
    Ok(round_money(total))
}

/// Level monthly payment that retires `principal` over `term_months`,
/// rounded to cents.
pub fn monthly_payment(
    principal: Money,
    annual_rate_percent: Decimal,
    term_months: i64,
) -> AdvanceResult<Money> {
    check_payment_inputs(principal, annual_rate_percent, term_months)?;

    let r = monthly_rate(annual_rate_percent);
    if r.is_zero() {
        return Ok(round_money(principal / Decimal::from(term_months)));
    }

    let factor = growth_factor(r, term_months)?;
    let annuity = factor - Decimal::ONE;
    if annuity.is_zero() {
        return Err(AdvanceError::loan_param(
            "interest_rate_percent",
            "Rate too small to amortize over this term",
        ));
    }

    let payment = principal
        .checked_mul(r)
        .and_then(|v| v.checked_mul(factor))
        .and_then(|v| v.checked_div(annuity))
        .ok_or_else(|| overflow("loan_amount"))?;
    Ok(round_money(payment))
}

/// Month-by-month fixed-payment amortization.
///
/// Interest accrues on the opening balance. Principal paid never exceeds
/// the opening balance, and the final month retires whatever remains, so
/// the last row always closes at zero. The running balance is carried at
/// full precision; each row is rounded to cents.
///
/// A principal so small that the level payment rounds to 0.00 yields
/// zero-payment rows and a final month that repays the whole balance.
/// Terms longer than [`MAX_SCHEDULE_MONTHS`] are rejected.
pub fn schedule(
    principal: Money,
    annual_rate_percent: Decimal,
    term_months: i64,
) -> AdvanceResult<Vec<AmortizationRow>> {
    if term_months > MAX_SCHEDULE_MONTHS {
        return Err(AdvanceError::loan_param(
            "loan_term_months",
            format!("Term must not exceed {MAX_SCHEDULE_MONTHS} months"),
        ));
    }
    let payment = monthly_payment(principal, annual_rate_percent, term_months)?;
    let r = monthly_rate(annual_rate_percent);

    let mut rows = Vec::with_capacity(term_months as usize);
    let mut balance = principal;

    for month in 1..=term_months {
        let interest = balance * r;
        let scheduled_principal = payment - interest;

        let (principal_paid, row_payment) =
            if month == term_months || scheduled_principal >= balance {
                (balance, balance + interest)
            } else {
                (scheduled_principal, payment)
            };

        balance = (balance - principal_paid).max(Decimal::ZERO);

        rows.push(AmortizationRow {
            month: month as u32,
            payment: round_money(row_payment),
            principal_paid: round_money(principal_paid),
            interest_paid: round_money(interest),
            remaining_balance: round_money(balance),
        });
    }

    Ok(rows)
}

pub fn summarize_schedule(rows: &[AmortizationRow]) -> ScheduleSummary {
    rows.iter().fold(
        ScheduleSummary {
            total_paid: Decimal::ZERO,
            total_interest: Decimal::ZERO,
            total_principal: Decimal::ZERO,
        },
        |mut acc, row| {
            acc.total_paid += row.payment;
            acc.total_interest += row.interest_paid;
            acc.total_principal += row.principal_paid;
            acc
        },
    )
}

impl LoanTerms {
    pub fn total_repayable(&self) -> AdvanceResult<Money> {
        total_repayable(self.principal, self.annual_rate_percent, self.term_months)
    }

    pub fn schedule(&self) -> AdvanceResult<Vec<AmortizationRow>> {
        schedule(self.principal, self.annual_rate_percent, self.term_months)
    }
}

/// Compounded total, level payment and (optionally) the full schedule
/// for one loan.
pub fn analyze_loan(
    terms: &LoanTerms,
    include_schedule: bool,
) -> AdvanceResult<ComputationOutput<LoanAnalysis>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let total = terms.total_repayable()?;
    let payment = monthly_payment(terms.principal, terms.annual_rate_percent, terms.term_months)?;

    if terms.annual_rate_percent.is_zero() {
        warnings.push("Zero interest rate: payment is principal divided by term".into());
    }
    if payment.is_zero() {
        warnings.push(
            "Level payment rounds to 0.00: the final month repays the whole balance".into(),
        );
    }

    let (rows, summary) = if include_schedule {
        let rows = terms.schedule()?;
        let summary = summarize_schedule(&rows);
        (Some(rows), Some(summary))
    } else {
        (None, None)
    };

    let output = LoanAnalysis {
        total_repayable: total,
        monthly_payment: payment,
        schedule: rows,
        summary,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Monthly compounding; fixed-payment amortization",
        &serde_json::json!({
            "principal": terms.principal.to_string(),
            "annualRatePercent": terms.annual_rate_percent.to_string(),
            "termMonths": terms.term_months,
        }),
        warnings,
        elapsed,
        output,
    ))
}
