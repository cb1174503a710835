use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::amortization::AmortizationRow;
use crate::error::AdvanceError;
use crate::service::AdvanceRequest;
use crate::types::Money;
use crate::AdvanceResult;

/// Persisted outcome of one processed request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanRecord {
    pub loan_id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Snapshot of the request as received
    pub request: AdvanceRequest,
    pub eligible: bool,
    pub max_advance: Money,
    pub approved_amount: Money,
    pub fee: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_repayable: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Vec<AmortizationRow>>,
}

/// Keyed, write-once record storage.
///
/// Implementations must reject an insert whose id is already present;
/// stored records are never replaced.
pub trait LoanStore: Send + Sync {
    fn insert(&self, record: LoanRecord) -> AdvanceResult<()>;

    fn get(&self, id: &Uuid) -> AdvanceResult<LoanRecord>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<S: LoanStore + ?Sized> LoanStore for Arc<S> {
    fn insert(&self, record: LoanRecord) -> AdvanceResult<()> {
        (**self).insert(record)
    }

    fn get(&self, id: &Uuid) -> AdvanceResult<LoanRecord> {
        (**self).get(id)
    }

    fn len(&self) -> usize {
        (**self).len()
    }
}

/// Process-lifetime store backed by a locked map
#[derive(Debug, Default)]
pub struct InMemoryLoanStore {
    records: RwLock<HashMap<Uuid, LoanRecord>>,
}

impl InMemoryLoanStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> AdvanceError {
    AdvanceError::Internal("loan store lock poisoned".into())
}

impl LoanStore for InMemoryLoanStore {
    fn insert(&self, record: LoanRecord) -> AdvanceResult<()> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        if records.contains_key(&record.loan_id) {
            return Err(AdvanceError::DuplicateRecord(record.loan_id.to_string()));
        }
        records.insert(record.loan_id, record);
        Ok(())
    }

    fn get(&self, id: &Uuid) -> AdvanceResult<LoanRecord> {
        let records = self.records.read().map_err(|_| poisoned())?;
        records
            .get(id)
            .cloned()
            .ok_or_else(|| AdvanceError::NotFound(id.to_string()))
    }

    fn len(&self) -> usize {
        // A poisoned map still holds every record inserted before the panic.
        match self.records.read() {
            Ok(records) => records.len(),
            Err(poison) => poison.into_inner().len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn record(id: Uuid) -> LoanRecord {
        LoanRecord {
            loan_id: id,
            created_at: Utc::now(),
            request: AdvanceRequest::new(dec!(4000), "Monthly", dec!(100)),
            eligible: true,
            max_advance: dec!(2000),
            approved_amount: dec!(100),
            fee: dec!(10),
            total_repayable: None,
            schedule: None,
        }
    }

    #[test]
    fn test_insert_then_get() {
        let store = InMemoryLoanStore::new();
        let id = Uuid::new_v4();
        store.insert(record(id)).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&id).unwrap().fee, dec!(10));
    }

    #[test]
    fn test_unknown_id_not_found() {
        let store = InMemoryLoanStore::new();
        assert!(store.is_empty());
        assert!(matches!(
            store.get(&Uuid::new_v4()),
            Err(AdvanceError::NotFound(_))
        ));
    }

    #[test]
    fn test_duplicate_insert_keeps_original() {
        let store = InMemoryLoanStore::new();
        let id = Uuid::new_v4();
        store.insert(record(id)).unwrap();

        let mut replacement = record(id);
        replacement.fee = Decimal::ZERO;
        assert!(matches!(
            store.insert(replacement),
            Err(AdvanceError::DuplicateRecord(_))
        ));
        assert_eq!(store.get(&id).unwrap().fee, dec!(10));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_shared_through_arc() {
        let store = Arc::new(InMemoryLoanStore::new());
        let handle = Arc::clone(&store);
        let id = Uuid::new_v4();
        handle.insert(record(id)).unwrap();
        assert!(store.get(&id).is_ok());
    }
}
