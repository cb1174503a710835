use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::AdvanceError;
use crate::types::Money;
use crate::AdvanceResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Cadence at which a gross salary is paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PayFrequency {
    Weekly,
    #[serde(rename = "Bi-Weekly")]
    BiWeekly,
    Monthly,
    Annually,
}

impl PayFrequency {
    pub const ALL: [PayFrequency; 4] = [
        PayFrequency::Weekly,
        PayFrequency::BiWeekly,
        PayFrequency::Monthly,
        PayFrequency::Annually,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PayFrequency::Weekly => "Weekly",
            PayFrequency::BiWeekly => "Bi-Weekly",
            PayFrequency::Monthly => "Monthly",
            PayFrequency::Annually => "Annually",
        }
    }

    pub fn periods_per_year(&self) -> u32 {
        match self {
            PayFrequency::Weekly => 52,
            PayFrequency::BiWeekly => 26,
            PayFrequency::Monthly => 12,
            PayFrequency::Annually => 1,
        }
    }
}

impl fmt::Display for PayFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PayFrequency {
    type Err = AdvanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PayFrequency::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| AdvanceError::InvalidFrequency(s.to_string()))
    }
}

impl TryFrom<&str> for PayFrequency {
    type Error = AdvanceError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Convert a salary paid at `frequency` into its monthly equivalent.
///
/// The result is not rounded; callers round when they report it. A salary
/// too large to annualise fails with `InvalidInput`.
pub fn normalize_salary(gross_salary: Money, frequency: PayFrequency) -> AdvanceResult<Money> {
    let monthly = match frequency {
        PayFrequency::Monthly => Some(gross_salary),
        PayFrequency::Annually => gross_salary.checked_div(MONTHS_PER_YEAR),
        other => gross_salary
            .checked_mul(Decimal::from(other.periods_per_year()))
            .and_then(|annual| annual.checked_div(MONTHS_PER_YEAR)),
    };
    monthly.ok_or_else(|| AdvanceError::InvalidInput {
        field: "gross_salary".into(),
        reason: format!("Salary is out of range for {frequency} pay"),
    })
}

/// Parse `frequency` and normalize `gross_salary` to a monthly figure.
pub fn normalize(gross_salary: Money, frequency: &str) -> AdvanceResult<Money> {
    let frequency: PayFrequency = frequency.parse()?;
    normalize_salary(gross_salary, frequency)
}
