// JSON file store used by the CLI
//
// The whole store is one JSON document. Every operation takes an exclusive
// fd-lock on `<path>.lock`, reads the document, applies the change and writes
// it back through a temp file + rename so readers never see a partial write.

use async_trait::async_trait;
use fd_lock::RwLock;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

use super::{get_record, insert_new, replace_versioned, IntakeStore, StoreDocument, StoreError};
use crate::models::{BusinessCase, SystemIntake};

#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        F: FnOnce(&StoreDocument) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        self.locked(false, move |document| op(document)).await
    }

    async fn write<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut StoreDocument) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        self.locked(true, op).await
    }

    async fn locked<T, F>(&self, persist: bool, op: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut StoreDocument) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || -> Result<T, StoreError> {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            let lock_file = OpenOptions::new()
                .create(true)
                .truncate(false)
                .write(true)
                .open(lock_path(&path))?;
            let mut lock = RwLock::new(lock_file);
            let _guard = lock.write()?;

            let mut document = load_document(&path)?;
            let result = op(&mut document)?;
            if persist {
                store_document(&path, &document)?;
            }
            Ok(result)
        })
        .await
        .map_err(|join_err| StoreError::Io(std::io::Error::other(join_err)))?
    }
}

fn lock_path(path: &Path) -> PathBuf {
    let mut lock = path.as_os_str().to_owned();
    lock.push(".lock");
    PathBuf::from(lock)
}

fn load_document(path: &Path) -> Result<StoreDocument, StoreError> {
    if !path.exists() {
        debug!(file = ?path, "No store file yet, starting empty");
        return Ok(StoreDocument::default());
    }
    let contents = fs::read_to_string(path)?;
    if contents.trim().is_empty() {
        return Ok(StoreDocument::default());
    }
    Ok(serde_json::from_str(&contents)?)
}

fn store_document(path: &Path, document: &StoreDocument) -> Result<(), StoreError> {
    let serialized = serde_json::to_string_pretty(document)?;
    let mut temp = path.as_os_str().to_owned();
    temp.push(".tmp");
    let temp = PathBuf::from(temp);
    fs::write(&temp, serialized)?;
    fs::rename(&temp, path)?;
    Ok(())
}

#[async_trait]
impl IntakeStore for FileStore {
    async fn fetch_intake(&self, id: Uuid) -> Result<SystemIntake, StoreError> {
        self.read(move |document| get_record(&document.intakes, id)).await
    }

    async fn fetch_intakes_by_owner(
        &self,
        eua_user_id: &str,
    ) -> Result<Vec<SystemIntake>, StoreError> {
        let owner = eua_user_id.to_string();
        self.read(move |document| Ok(document.intakes_for_owner(&owner)))
            .await
    }

    async fn create_intake(&self, intake: &SystemIntake) -> Result<SystemIntake, StoreError> {
        let intake = intake.clone();
        self.write(move |document| insert_new(&mut document.intakes, &intake))
            .await
    }

    async fn save_intake(&self, intake: &SystemIntake) -> Result<SystemIntake, StoreError> {
        let intake = intake.clone();
        self.write(move |document| replace_versioned(&mut document.intakes, &intake))
            .await
    }

    async fn fetch_business_case(&self, id: Uuid) -> Result<BusinessCase, StoreError> {
        self.read(move |document| get_record(&document.business_cases, id))
            .await
    }

    async fn fetch_business_cases_by_owner(
        &self,
        eua_user_id: &str,
    ) -> Result<Vec<BusinessCase>, StoreError> {
        let owner = eua_user_id.to_string();
        self.read(move |document| Ok(document.business_cases_for_owner(&owner)))
            .await
    }

    async fn create_business_case(
        &self,
        business_case: &BusinessCase,
    ) -> Result<BusinessCase, StoreError> {
        let business_case = business_case.clone();
        self.write(move |document| insert_new(&mut document.business_cases, &business_case))
            .await
    }

    async fn save_business_case(
        &self,
        business_case: &BusinessCase,
    ) -> Result<BusinessCase, StoreError> {
        let business_case = business_case.clone();
        self.write(move |document| replace_versioned(&mut document.business_cases, &business_case))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_store_persists_between_instances() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("intakes.json");
        let intake = SystemIntake::new_draft("ABCD", "Jane");

        FileStore::new(&path).create_intake(&intake).await.unwrap();

        let reopened = FileStore::new(&path);
        let fetched = reopened.fetch_intake(intake.id).await.unwrap();
        assert_eq!(fetched.id, intake.id);
        assert_eq!(fetched.version, 1);
        assert!(!dir.path().join("data").join("intakes.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_file_store_rejects_stale_write() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("intakes.json"));
        let created = store
            .create_intake(&SystemIntake::new_draft("ABCD", "Jane"))
            .await
            .unwrap();

        store.save_intake(&created).await.unwrap();
        let err = store.save_intake(&created).await.unwrap_err();
        assert!(matches!(err, StoreError::Stale { .. }));
    }

    #[tokio::test]
    async fn test_file_store_lists_business_cases_by_owner() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("intakes.json");
        let business_case = BusinessCase {
            id: Uuid::new_v4(),
            system_intake_id: Uuid::new_v4(),
            eua_user_id: "ABCD".to_string(),
            ..BusinessCase::default()
        };
        FileStore::new(&path)
            .create_business_case(&business_case)
            .await
            .unwrap();

        let reopened = FileStore::new(&path);
        let mine = reopened.fetch_business_cases_by_owner("ABCD").await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, business_case.id);
        assert!(reopened.fetch_business_cases_by_owner("WXYZ").await.unwrap().is_empty());
    }
}
