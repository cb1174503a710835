use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AdvancePolicy;
use crate::error::AdvanceError;
use crate::types::{round_money, Money};
use crate::AdvanceResult;

/// Why an evaluation ended where it did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    BelowMinimumSalary,
    ExceedsMaximum,
    NothingRequested,
    Approved,
}

impl fmt::Display for DecisionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DecisionReason::BelowMinimumSalary => "below minimum monthly salary threshold",
            DecisionReason::ExceedsMaximum => "requested advance exceeds maximum allowed",
            DecisionReason::NothingRequested => "no advance amount requested",
            DecisionReason::Approved => "approved",
        };
        f.write_str(text)
    }
}

/// Result of applying the advance policy to one request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceDecision {
    pub eligible: bool,
    pub max_advance: Money,
    pub approved_amount: Money,
    pub fee: Money,
    pub reason: DecisionReason,
}

impl AdvanceDecision {
    pub fn is_approved(&self) -> bool {
        self.reason == DecisionReason::Approved
    }

    fn rejected(eligible: bool, max_advance: Money, reason: DecisionReason) -> Self {
        Self {
            eligible,
            max_advance,
            approved_amount: Decimal::ZERO,
            fee: Decimal::ZERO,
            reason,
        }
    }
}

/// Apply eligibility, cap and fee rules in order, stopping at the first
/// rule that rejects the request.
///
/// The cap is compared against the unrounded maximum; the reported
/// `max_advance` is rounded to cents.
pub fn evaluate_advance(
    monthly_salary: Money,
    requested_advance: Money,
    policy: &AdvancePolicy,
) -> AdvanceResult<AdvanceDecision> {
    if requested_advance < Decimal::ZERO {
        return Err(AdvanceError::InvalidInput {
            field: "advance_amount".into(),
            reason: "Requested advance must not be negative".into(),
        });
    }

    if monthly_salary < policy.min_monthly_salary {
        debug!(%monthly_salary, "advance rejected: salary below threshold");
        return Ok(AdvanceDecision::rejected(
            false,
            Decimal::ZERO,
            DecisionReason::BelowMinimumSalary,
        ));
    }

    let max_advance = (monthly_salary * policy.max_advance_ratio).max(Decimal::ZERO);
    if requested_advance > max_advance {
        debug!(%requested_advance, %max_advance, "advance rejected: over cap");
        return Ok(AdvanceDecision::rejected(
            true,
            round_money(max_advance),
            DecisionReason::ExceedsMaximum,
        ));
    }

    if requested_advance.is_zero() {
        return Ok(AdvanceDecision::rejected(
            true,
            round_money(max_advance),
            DecisionReason::NothingRequested,
        ));
    }

    let fee = calculate_fee(requested_advance, policy);
    debug!(%requested_advance, %fee, "advance approved");

    Ok(AdvanceDecision {
        eligible: true,
        max_advance: round_money(max_advance),
        approved_amount: requested_advance,
        fee,
        reason: DecisionReason::Approved,
    })
}

/// Evaluate against the default policy
pub fn evaluate(monthly_salary: Money, requested_advance: Money) -> AdvanceResult<AdvanceDecision> {
    evaluate_advance(monthly_salary, requested_advance, &AdvancePolicy::default())
}

/// Percentage fee clamped to the policy's floor and ceiling
pub fn calculate_fee(advance: Money, policy: &AdvancePolicy) -> Money {
    let raw = advance * policy.fee_rate;
    round_money(raw.max(policy.min_fee).min(policy.max_fee))
}
