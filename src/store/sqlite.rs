// SQLite-backed store (feature = "database")
//
// Records are kept as JSON bodies next to the columns needed for lookups.
// The conditional write is a single `UPDATE ... WHERE id = ? AND version = ?`.

use async_trait::async_trait;
use sqlx::{migrate::MigrateDatabase, Row, SqlitePool};
use tracing::info;
use uuid::Uuid;

use super::{IntakeStore, StoreError};
use crate::models::{BusinessCase, SystemIntake};

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (and create if missing) the database, optionally running migrations
    pub async fn connect(database_url: &str, auto_migrate: bool) -> Result<Self, StoreError> {
        if !sqlx::Sqlite::database_exists(database_url).await? {
            info!("Creating database at {}", database_url);
            sqlx::Sqlite::create_database(database_url).await?;
        }

        let pool = SqlitePool::connect(database_url).await?;

        if auto_migrate {
            info!("Running database migrations...");
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .map_err(sqlx::Error::from)?;
            info!("Database migrations completed");
        }

        Ok(Self { pool })
    }

    async fn stored_version(&self, table: &str, id: Uuid) -> Result<Option<u64>, StoreError> {
        let row = sqlx::query(&format!("SELECT version FROM {table} WHERE id = ?1"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|row| row.get::<i64, _>("version") as u64))
    }

    async fn fetch_body(&self, table: &str, id: Uuid) -> Result<String, StoreError> {
        let row = sqlx::query(&format!("SELECT body FROM {table} WHERE id = ?1"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.map(|row| row.get::<String, _>("body"))
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })
    }

    /// Shared conditional update; `body` must already carry `version + 1`
    async fn update_versioned(
        &self,
        table: &str,
        id: Uuid,
        version: u64,
        body: String,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(&format!(
            "UPDATE {table} SET body = ?1, version = ?2 WHERE id = ?3 AND version = ?4"
        ))
        .bind(body)
        .bind((version + 1) as i64)
        .bind(id.to_string())
        .bind(version as i64)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 1 {
            return Ok(());
        }
        match self.stored_version(table, id).await? {
            None => Err(StoreError::NotFound { id: id.to_string() }),
            Some(found) => Err(StoreError::Stale {
                id: id.to_string(),
                expected: version,
                found,
            }),
        }
    }
}

fn map_insert_error(id: Uuid, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            StoreError::AlreadyExists { id: id.to_string() }
        }
        other => StoreError::Database(other),
    }
}

#[async_trait]
impl IntakeStore for SqliteStore {
    async fn fetch_intake(&self, id: Uuid) -> Result<SystemIntake, StoreError> {
        let body = self.fetch_body("system_intakes", id).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn fetch_intakes_by_owner(
        &self,
        eua_user_id: &str,
    ) -> Result<Vec<SystemIntake>, StoreError> {
        let rows = sqlx::query(
            "SELECT body FROM system_intakes WHERE eua_user_id = ?1 ORDER BY created_at",
        )
        .bind(eua_user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                serde_json::from_str::<SystemIntake>(&row.get::<String, _>("body"))
                    .map_err(StoreError::from)
            })
            .collect()
    }

    async fn create_intake(&self, intake: &SystemIntake) -> Result<SystemIntake, StoreError> {
        let mut stored = intake.clone();
        stored.version = 1;
        sqlx::query(
            "INSERT INTO system_intakes (id, eua_user_id, created_at, version, body) VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(stored.id.to_string())
        .bind(&stored.eua_user_id)
        .bind(stored.created_at.map(|t| t.to_rfc3339()))
        .bind(stored.version as i64)
        .bind(serde_json::to_string(&stored)?)
        .execute(&self.pool)
        .await
        .map_err(|err| map_insert_error(stored.id, err))?;
        Ok(stored)
    }

    async fn save_intake(&self, intake: &SystemIntake) -> Result<SystemIntake, StoreError> {
        let mut stored = intake.clone();
        stored.version = intake.version + 1;
        self.update_versioned(
            "system_intakes",
            intake.id,
            intake.version,
            serde_json::to_string(&stored)?,
        )
        .await?;
        Ok(stored)
    }

    async fn fetch_business_case(&self, id: Uuid) -> Result<BusinessCase, StoreError> {
        let body = self.fetch_body("business_cases", id).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn fetch_business_cases_by_owner(
        &self,
        eua_user_id: &str,
    ) -> Result<Vec<BusinessCase>, StoreError> {
        let rows = sqlx::query(
            "SELECT body FROM business_cases WHERE eua_user_id = ?1 ORDER BY created_at",
        )
        .bind(eua_user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                serde_json::from_str::<BusinessCase>(&row.get::<String, _>("body"))
                    .map_err(StoreError::from)
            })
            .collect()
    }

    async fn create_business_case(
        &self,
        business_case: &BusinessCase,
    ) -> Result<BusinessCase, StoreError> {
        let mut stored = business_case.clone();
        stored.version = 1;
        sqlx::query(
            "INSERT INTO business_cases (id, system_intake_id, eua_user_id, created_at, version, body) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(stored.id.to_string())
        .bind(stored.system_intake_id.to_string())
        .bind(&stored.eua_user_id)
        .bind(stored.created_at.map(|t| t.to_rfc3339()))
        .bind(stored.version as i64)
        .bind(serde_json::to_string(&stored)?)
        .execute(&self.pool)
        .await
        .map_err(|err| map_insert_error(stored.id, err))?;
        Ok(stored)
    }

    async fn save_business_case(
        &self,
        business_case: &BusinessCase,
    ) -> Result<BusinessCase, StoreError> {
        let mut stored = business_case.clone();
        stored.version = business_case.version + 1;
        self.update_versioned(
            "business_cases",
            business_case.id,
            business_case.version,
            serde_json::to_string(&stored)?,
        )
        .await?;
        Ok(stored)
    }
}
