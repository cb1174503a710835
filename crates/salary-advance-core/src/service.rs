use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::advance::{evaluate_advance, AdvanceDecision, DecisionReason};
use crate::amortization::{AmortizationRow, LoanTerms};
use crate::config::AdvancePolicy;
use crate::error::AdvanceError;
use crate::salary::{normalize_salary, PayFrequency};
use crate::store::{LoanRecord, LoanStore};
use crate::types::{format_money, Money};
use crate::AdvanceResult;

/// A salary advance request, optionally carrying installment loan terms.
///
/// Field names follow the camelCase wire format; the snake_case names
/// used by earlier clients are accepted on input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceRequest {
    #[serde(alias = "gross_salary")]
    pub gross_salary: Money,
    /// Kept as text so unknown values surface as `InvalidFrequency`
    #[serde(alias = "pay_frequency")]
    pub pay_frequency: String,
    #[serde(alias = "advance_amount")]
    pub advance_amount: Money,
    #[serde(default, alias = "loan_amount", skip_serializing_if = "Option::is_none")]
    pub loan_amount: Option<Money>,
    #[serde(
        default,
        alias = "interest_rate",
        alias = "interestRate",
        skip_serializing_if = "Option::is_none"
    )]
    pub interest_rate_percent: Option<Decimal>,
    #[serde(
        default,
        alias = "loan_term",
        alias = "loanTerm",
        skip_serializing_if = "Option::is_none"
    )]
    pub loan_term_months: Option<i64>,
    #[serde(default, alias = "include_amortization")]
    pub include_amortization: bool,
}

impl AdvanceRequest {
    pub fn new(gross_salary: Money, pay_frequency: &str, advance_amount: Money) -> Self {
        Self {
            gross_salary,
            pay_frequency: pay_frequency.to_string(),
            advance_amount,
            loan_amount: None,
            interest_rate_percent: None,
            loan_term_months: None,
            include_amortization: false,
        }
    }

    pub fn with_loan(mut self, amount: Money, annual_rate_percent: Decimal, term_months: i64) -> Self {
        self.loan_amount = Some(amount);
        self.interest_rate_percent = Some(annual_rate_percent);
        self.loan_term_months = Some(term_months);
        self
    }

    pub fn with_amortization(mut self) -> Self {
        self.include_amortization = true;
        self
    }

    /// The loan triple, if supplied. Supplying only part of it is an error.
    pub fn loan_terms(&self) -> AdvanceResult<Option<LoanTerms>> {
        match (self.loan_amount, self.interest_rate_percent, self.loan_term_months) {
            (Some(principal), Some(annual_rate_percent), Some(term_months)) => Ok(Some(LoanTerms {
                principal,
                annual_rate_percent,
                term_months,
            })),
            (None, None, None) => Ok(None),
            (amount, rate, term) => {
                let missing: Vec<&str> = [
                    ("loan_amount", amount.is_none()),
                    ("interest_rate_percent", rate.is_none()),
                    ("loan_term_months", term.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, absent)| absent.then_some(name))
                .collect();
                Err(AdvanceError::InvalidLoanParameters {
                    field: missing.join(", "),
                    reason: "Loan amount, interest rate and term must be supplied together".into(),
                })
            }
        }
    }
}

/// Response to one processed request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceOutcome {
    pub eligible: bool,
    pub max_advance: Money,
    pub approved_amount: Money,
    pub fee: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_repayable: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Vec<AmortizationRow>>,
    /// Informational only; never branch on it
    pub message: String,
    pub loan_id: Uuid,
}

/// Sequences normalization, evaluation and loan calculations for a
/// request and records every processed request in `S`.
///
/// The service itself is immutable; the store is the only shared state.
#[derive(Debug)]
pub struct AdvanceService<S: LoanStore> {
    policy: AdvancePolicy,
    store: S,
}

impl<S: LoanStore> AdvanceService<S> {
    pub fn new(store: S) -> Self {
        Self {
            policy: AdvancePolicy::default(),
            store,
        }
    }

    pub fn with_policy(store: S, policy: AdvancePolicy) -> AdvanceResult<Self> {
        policy.validate()?;
        Ok(Self { policy, store })
    }

    pub fn policy(&self) -> &AdvancePolicy {
        &self.policy
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Evaluate `request` and persist a record of it.
    ///
    /// A record is stored for every request that computes successfully,
    /// including ineligible and over-cap ones. Nothing is stored when
    /// any step fails.
    pub fn process(&self, request: &AdvanceRequest) -> AdvanceResult<AdvanceOutcome> {
        if request.gross_salary <= Decimal::ZERO {
            warn!(gross_salary = %request.gross_salary, "rejected non-positive salary");
            return Err(AdvanceError::InvalidInput {
                field: "gross_salary".into(),
                reason: "Gross salary must be positive".into(),
            });
        }

        let frequency: PayFrequency = request.pay_frequency.parse().map_err(|e| {
            warn!(pay_frequency = %request.pay_frequency, "rejected unknown pay frequency");
            e
        })?;
        let monthly_salary = normalize_salary(request.gross_salary, frequency).map_err(|e| {
            warn!(gross_salary = %request.gross_salary, %frequency, "salary out of range");
            e
        })?;
        debug!(%frequency, %monthly_salary, "normalized salary");

        let decision = evaluate_advance(monthly_salary, request.advance_amount, &self.policy)?;

        let terms = request.loan_terms()?;
        let (total_repayable, schedule) = match &terms {
            Some(terms) => {
                let total = terms.total_repayable()?;
                let rows = if request.include_amortization {
                    Some(terms.schedule()?)
                } else {
                    None
                };
                (Some(total), rows)
            }
            None => (None, None),
        };

        let message = compose_message(
            &decision,
            &self.policy,
            request.advance_amount,
            total_repayable.zip(terms.as_ref().map(|t| t.term_months)),
        );

        let record = LoanRecord {
            loan_id: Uuid::new_v4(),
            created_at: Utc::now(),
            request: request.clone(),
            eligible: decision.eligible,
            max_advance: decision.max_advance,
            approved_amount: decision.approved_amount,
            fee: decision.fee,
            total_repayable,
            schedule: schedule.clone(),
        };
        let loan_id = record.loan_id;
        self.store.insert(record)?;

        info!(
            %loan_id,
            eligible = decision.eligible,
            reason = %decision.reason,
            approved = %decision.approved_amount,
            "loan record stored"
        );

        Ok(AdvanceOutcome {
            eligible: decision.eligible,
            max_advance: decision.max_advance,
            approved_amount: decision.approved_amount,
            fee: decision.fee,
            total_repayable,
            schedule,
            message,
            loan_id,
        })
    }

    pub fn get_record(&self, id: &Uuid) -> AdvanceResult<LoanRecord> {
        self.store.get(id)
    }

    /// Look up a record by its textual id. Text that is not a valid id
    /// cannot name a stored record and is reported as not found.
    pub fn get_record_str(&self, id: &str) -> AdvanceResult<LoanRecord> {
        let parsed = Uuid::parse_str(id.trim()).map_err(|_| AdvanceError::NotFound(id.to_string()))?;
        self.get_record(&parsed)
    }
}

fn compose_message(
    decision: &AdvanceDecision,
    policy: &AdvancePolicy,
    requested: Money,
    loan: Option<(Money, i64)>,
) -> String {
    let mut message = match decision.reason {
        DecisionReason::BelowMinimumSalary => format!(
            "Ineligible: Monthly salary is below the minimum threshold of {}.",
            format_money(policy.min_monthly_salary)
        ),
        DecisionReason::ExceedsMaximum => format!(
            "Requested advance ({}) exceeds maximum allowed ({}).",
            format_money(requested),
            format_money(decision.max_advance)
        ),
        DecisionReason::NothingRequested => "No advance requested.".to_string(),
        DecisionReason::Approved => format!(
            "Advance approved! Amount: {}, Fee: {}",
            format_money(decision.approved_amount),
            format_money(decision.fee)
        ),
    };

    if let Some((total, term_months)) = loan {
        message.push_str(if message.ends_with('.') { " " } else { ". " });
        message.push_str(&format!(
            "Loan repayable: {} over {term_months} months.",
            format_money(total)
        ));
    }

    message
}
