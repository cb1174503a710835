use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::AdvanceError;
use crate::types::{Money, Rate};
use crate::AdvanceResult;

pub const DEFAULT_MIN_MONTHLY_SALARY: Money = dec!(1000);
pub const DEFAULT_MAX_ADVANCE_RATIO: Rate = dec!(0.5);
pub const DEFAULT_FEE_RATE: Rate = dec!(0.05);
pub const DEFAULT_MIN_FEE: Money = dec!(10.0);
pub const DEFAULT_MAX_FEE: Money = dec!(50.0);

/// Policy constants for advance eligibility and pricing.
///
/// The defaults are the production policy. Any field omitted from a
/// serialized policy falls back to its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvancePolicy {
    /// Minimum normalized monthly salary to be eligible at all
    pub min_monthly_salary: Money,
    /// Share of monthly salary that may be advanced
    pub max_advance_ratio: Rate,
    /// Fee charged as a share of the approved advance
    pub fee_rate: Rate,
    /// Fee floor
    pub min_fee: Money,
    /// Fee ceiling
    pub max_fee: Money,
}

impl Default for AdvancePolicy {
    fn default() -> Self {
        Self {
            min_monthly_salary: DEFAULT_MIN_MONTHLY_SALARY,
            max_advance_ratio: DEFAULT_MAX_ADVANCE_RATIO,
            fee_rate: DEFAULT_FEE_RATE,
            min_fee: DEFAULT_MIN_FEE,
            max_fee: DEFAULT_MAX_FEE,
        }
    }
}

impl AdvancePolicy {
    pub fn from_json_str(json: &str) -> AdvanceResult<Self> {
        let policy: AdvancePolicy = serde_json::from_str(json)?;
        policy.validate()?;
        Ok(policy)
    }

    pub fn validate(&self) -> AdvanceResult<()> {
        if self.min_monthly_salary < Decimal::ZERO {
            return Err(invalid("min_monthly_salary", "must not be negative"));
        }
        if self.max_advance_ratio <= Decimal::ZERO || self.max_advance_ratio > Decimal::ONE {
            return Err(invalid("max_advance_ratio", "must be in (0, 1]"));
        }
        if self.fee_rate < Decimal::ZERO || self.fee_rate > Decimal::ONE {
            return Err(invalid("fee_rate", "must be in [0, 1]"));
        }
        if self.min_fee < Decimal::ZERO {
            return Err(invalid("min_fee", "must not be negative"));
        }
        if self.min_fee > self.max_fee {
            return Err(invalid("min_fee", "must not exceed max_fee"));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> AdvanceError {
    AdvanceError::PolicyInvalid {
        field: field.into(),
        reason: reason.into(),
    }
}
