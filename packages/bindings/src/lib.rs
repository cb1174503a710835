use std::sync::OnceLock;

use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde_json::json;

use salary_advance_core::amortization::{self, LoanTerms};
use salary_advance_core::salary;
use salary_advance_core::types::round_money;
use salary_advance_core::{AdvanceRequest, AdvanceService, InMemoryLoanStore};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Process-wide service so records written by `calculateAdvance` can be read
/// back with `getLoan`.
static SERVICE: OnceLock<AdvanceService<InMemoryLoanStore>> = OnceLock::new();

fn service() -> &'static AdvanceService<InMemoryLoanStore> {
    SERVICE.get_or_init(|| AdvanceService::new(InMemoryLoanStore::new()))
}

// ---------------------------------------------------------------------------
// Salary advance
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_advance(input_json: String) -> NapiResult<String> {
    let request: AdvanceRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let outcome = service()
        .process(&request)
        .map_err(|e| to_napi_error(e.public_message()))?;
    serde_json::to_string(&outcome).map_err(to_napi_error)
}

#[napi]
pub fn get_loan(loan_id: String) -> NapiResult<String> {
    let record = service()
        .get_record_str(&loan_id)
        .map_err(|e| to_napi_error(e.public_message()))?;
    serde_json::to_string(&record).map_err(to_napi_error)
}

#[napi]
pub fn normalize_salary(gross_salary: String, pay_frequency: String) -> NapiResult<String> {
    let gross: Decimal = gross_salary.trim().parse().map_err(to_napi_error)?;
    let monthly = salary::normalize(gross, &pay_frequency).map_err(to_napi_error)?;
    serde_json::to_string(&json!({
        "grossSalary": gross,
        "payFrequency": pay_frequency,
        "monthlySalary": round_money(monthly),
    }))
    .map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Loans
// ---------------------------------------------------------------------------

#[napi]
pub fn total_repayable(input_json: String) -> NapiResult<String> {
    let terms: LoanTerms = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = amortization::analyze_loan(&terms, false).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let terms: LoanTerms = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = amortization::analyze_loan(&terms, true).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
