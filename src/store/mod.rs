//! Durable storage for intakes and business cases
//!
//! The workflow only needs fetch/create/save; every backend implements the
//! same conditional-write contract: a save is accepted only when the record's
//! `version` equals the stored one, and the stored version is bumped on
//! success. A record that was never created has version 0 and is written
//! with version 1.

pub mod file;
pub mod memory;
#[cfg(feature = "database")]
pub mod sqlite;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use uuid::Uuid;

#[cfg(any(test, feature = "testing"))]
use mockall::automock;

use crate::models::{BusinessCase, SystemIntake};

pub use file::FileStore;
pub use memory::MemoryStore;
#[cfg(feature = "database")]
pub use sqlite::SqliteStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record {id} not found")]
    NotFound { id: String },
    #[error("record {id} is stale: write carried version {expected}, store holds {found}")]
    Stale { id: String, expected: u64, found: u64 },
    #[error("record {id} already exists")]
    AlreadyExists { id: String },
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[cfg(feature = "database")]
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Storage collaborator consumed by the workflow
#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait IntakeStore: Send + Sync {
    async fn fetch_intake(&self, id: Uuid) -> Result<SystemIntake, StoreError>;

    async fn fetch_intakes_by_owner(&self, eua_user_id: &str)
        -> Result<Vec<SystemIntake>, StoreError>;

    async fn create_intake(&self, intake: &SystemIntake) -> Result<SystemIntake, StoreError>;

    /// Replace the stored intake wholesale; no field merging
    async fn save_intake(&self, intake: &SystemIntake) -> Result<SystemIntake, StoreError>;

    async fn fetch_business_case(&self, id: Uuid) -> Result<BusinessCase, StoreError>;

    async fn fetch_business_cases_by_owner(
        &self,
        eua_user_id: &str,
    ) -> Result<Vec<BusinessCase>, StoreError>;

    async fn create_business_case(
        &self,
        business_case: &BusinessCase,
    ) -> Result<BusinessCase, StoreError>;

    async fn save_business_case(
        &self,
        business_case: &BusinessCase,
    ) -> Result<BusinessCase, StoreError>;
}

/// Records that carry a storage key and concurrency token
pub(crate) trait Versioned: Clone {
    fn key(&self) -> Uuid;
    fn version(&self) -> u64;
    fn set_version(&mut self, version: u64);
}

impl Versioned for SystemIntake {
    fn key(&self) -> Uuid {
        self.id
    }
    fn version(&self) -> u64 {
        self.version
    }
    fn set_version(&mut self, version: u64) {
        self.version = version;
    }
}

impl Versioned for BusinessCase {
    fn key(&self) -> Uuid {
        self.id
    }
    fn version(&self) -> u64 {
        self.version
    }
    fn set_version(&mut self, version: u64) {
        self.version = version;
    }
}

/// In-process image of the whole store, shared by the memory and file backends
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct StoreDocument {
    pub intakes: BTreeMap<Uuid, SystemIntake>,
    pub business_cases: BTreeMap<Uuid, BusinessCase>,
}

impl StoreDocument {
    pub fn intakes_for_owner(&self, eua_user_id: &str) -> Vec<SystemIntake> {
        let mut intakes: Vec<SystemIntake> = self
            .intakes
            .values()
            .filter(|intake| intake.eua_user_id == eua_user_id)
            .cloned()
            .collect();
        intakes.sort_by_key(|intake| intake.created_at);
        intakes
    }

    pub fn business_cases_for_owner(&self, eua_user_id: &str) -> Vec<BusinessCase> {
        let mut business_cases: Vec<BusinessCase> = self
            .business_cases
            .values()
            .filter(|business_case| business_case.eua_user_id == eua_user_id)
            .cloned()
            .collect();
        business_cases.sort_by_key(|business_case| business_case.created_at);
        business_cases
    }
}

pub(crate) fn get_record<T: Versioned>(
    records: &BTreeMap<Uuid, T>,
    id: Uuid,
) -> Result<T, StoreError> {
    records
        .get(&id)
        .cloned()
        .ok_or_else(|| StoreError::NotFound { id: id.to_string() })
}

pub(crate) fn insert_new<T: Versioned>(
    records: &mut BTreeMap<Uuid, T>,
    record: &T,
) -> Result<T, StoreError> {
    if records.contains_key(&record.key()) {
        return Err(StoreError::AlreadyExists {
            id: record.key().to_string(),
        });
    }
    let mut stored = record.clone();
    stored.set_version(1);
    records.insert(stored.key(), stored.clone());
    Ok(stored)
}

pub(crate) fn replace_versioned<T: Versioned>(
    records: &mut BTreeMap<Uuid, T>,
    record: &T,
) -> Result<T, StoreError> {
    let current = records
        .get(&record.key())
        .ok_or_else(|| StoreError::NotFound {
            id: record.key().to_string(),
        })?;
    if current.version() != record.version() {
        return Err(StoreError::Stale {
            id: record.key().to_string(),
            expected: record.version(),
            found: current.version(),
        });
    }
    let mut stored = record.clone();
    stored.set_version(record.version() + 1);
    records.insert(stored.key(), stored.clone());
    Ok(stored)
}
