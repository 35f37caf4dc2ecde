// In-memory store, used by tests and embedders that bring their own durability

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{get_record, insert_new, replace_versioned, IntakeStore, StoreDocument, StoreError};
use crate::models::{BusinessCase, SystemIntake};

#[derive(Debug, Default)]
pub struct MemoryStore {
    document: RwLock<StoreDocument>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IntakeStore for MemoryStore {
    async fn fetch_intake(&self, id: Uuid) -> Result<SystemIntake, StoreError> {
        get_record(&self.document.read().await.intakes, id)
    }

    async fn fetch_intakes_by_owner(
        &self,
        eua_user_id: &str,
    ) -> Result<Vec<SystemIntake>, StoreError> {
        Ok(self.document.read().await.intakes_for_owner(eua_user_id))
    }

    async fn create_intake(&self, intake: &SystemIntake) -> Result<SystemIntake, StoreError> {
        insert_new(&mut self.document.write().await.intakes, intake)
    }

    async fn save_intake(&self, intake: &SystemIntake) -> Result<SystemIntake, StoreError> {
        replace_versioned(&mut self.document.write().await.intakes, intake)
    }

    async fn fetch_business_case(&self, id: Uuid) -> Result<BusinessCase, StoreError> {
        get_record(&self.document.read().await.business_cases, id)
    }

    async fn fetch_business_cases_by_owner(
        &self,
        eua_user_id: &str,
    ) -> Result<Vec<BusinessCase>, StoreError> {
        Ok(self.document.read().await.business_cases_for_owner(eua_user_id))
    }

    async fn create_business_case(
        &self,
        business_case: &BusinessCase,
    ) -> Result<BusinessCase, StoreError> {
        insert_new(&mut self.document.write().await.business_cases, business_case)
    }

    async fn save_business_case(
        &self,
        business_case: &BusinessCase,
    ) -> Result<BusinessCase, StoreError> {
        replace_versioned(&mut self.document.write().await.business_cases, business_case)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        let intake = SystemIntake::new_draft("ABCD", "Jane");

        let created = store.create_intake(&intake).await.unwrap();
        let fetched = store.fetch_intake(intake.id).await.unwrap();
        assert_eq!(created, fetched);

        let mine = store.fetch_intakes_by_owner("ABCD").await.unwrap();
        assert_eq!(mine.len(), 1);
        assert!(store.fetch_intakes_by_owner("WXYZ").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_memory_store_lists_business_cases_by_owner() {
        let store = MemoryStore::new();
        for owner in ["ABCD", "ABCD", "WXYZ"] {
            let business_case = BusinessCase {
                id: Uuid::new_v4(),
                system_intake_id: Uuid::new_v4(),
                eua_user_id: owner.to_string(),
                ..BusinessCase::default()
            };
            store.create_business_case(&business_case).await.unwrap();
        }

        let mine = store.fetch_business_cases_by_owner("ABCD").await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|business_case| business_case.version == 1));
        assert!(store.fetch_business_cases_by_owner("NOPE").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_memory_store_missing_intake() {
        let store = MemoryStore::new();
        let err = store.fetch_intake(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }
}
