pub mod advance;
pub mod amortization;
pub mod config;
pub mod error;
pub mod salary;
pub mod service;
pub mod store;
pub mod types;

pub use advance::{AdvanceDecision, DecisionReason};
pub use amortization::{AmortizationRow, LoanTerms};
pub use config::AdvancePolicy;
pub use error::{AdvanceError, ErrorKind};
pub use salary::PayFrequency;
pub use service::{AdvanceOutcome, AdvanceRequest, AdvanceService};
pub use store::{InMemoryLoanStore, LoanRecord, LoanStore};
pub use types::*;

/// Standard result type for all salary-advance operations
pub type AdvanceResult<T> = Result<T, AdvanceError>;
