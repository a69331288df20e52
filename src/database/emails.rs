use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tracing::debug;

use crate::web::types::ValidEmail;

use super::{DbManager, Error, Result};

/// One row of the `emails` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct EmailRecord {
    pub id: i64,
    pub email_name: String,
}

/// Backend for the `emails` table.
/// Uniqueness of `email_name` is left to the table constraint,
/// so concurrent writers can't both win.
pub struct EmailBmc;

impl EmailBmc {
    pub async fn list(dm: &DbManager) -> Result<Vec<EmailRecord>> {
        let records = sqlx::query_as::<_, EmailRecord>(
            r#"SELECT id, email_name FROM emails ORDER BY id"#,
        )
        .fetch_all(dm.db())
        .await?;

        debug!("{:<20} - {} records", "EmailBmc::list", records.len());
        Ok(records)
    }

    pub async fn get(dm: &DbManager, id: i64) -> Result<EmailRecord> {
        sqlx::query_as::<_, EmailRecord>(r#"SELECT id, email_name FROM emails WHERE id = $1"#)
            .bind(id)
            .fetch_optional(dm.db())
            .await?
            .ok_or(Error::EmailNotFound { id })
    }

    pub async fn create(dm: &DbManager, email: &ValidEmail) -> Result<EmailRecord> {
        let record = sqlx::query_as::<_, EmailRecord>(
            r#"
            INSERT INTO emails (email_name)
            VALUES ($1)
            RETURNING id, email_name
        "#,
        )
        .bind(email.as_ref())
        .fetch_one(dm.db())
        .await
        .map_err(|er| Error::from_write(er, email.as_ref()))?;

        debug!("{:<20} - id: {}", "EmailBmc::create", record.id);
        Ok(record)
    }

    pub async fn update(dm: &DbManager, id: i64, email: &ValidEmail) -> Result<EmailRecord> {
        sqlx::query_as::<_, EmailRecord>(
            r#"
            UPDATE emails
            SET email_name = $1
            WHERE id = $2
            RETURNING id, email_name
        "#,
        )
        .bind(email.as_ref())
        .bind(id)
        .fetch_optional(dm.db())
        .await
        .map_err(|er| Error::from_write(er, email.as_ref()))?
        .ok_or(Error::EmailNotFound { id })
    }

    pub async fn delete(dm: &DbManager, id: i64) -> Result<()> {
        let rows_affected = sqlx::query(r#"DELETE FROM emails WHERE id = $1"#)
            .bind(id)
            .execute(dm.db())
            .await?
            .rows_affected();

        if rows_affected == 0 {
            return Err(Error::EmailNotFound { id });
        }

        Ok(())
    }

    pub async fn count(dm: &DbManager) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM emails"#)
            .fetch_one(dm.db())
            .await?;

        Ok(count)
    }

    /// Reads every record, in `id` order, from a single point in time.
    pub async fn snapshot(dm: &DbManager) -> Result<Vec<EmailRecord>> {
        // BEGIN sql transaction
        let mut transaction = dm.db().begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *transaction)
            .await?;

        let records = sqlx::query_as::<_, EmailRecord>(
            r#"SELECT id, email_name FROM emails ORDER BY id"#,
        )
        .fetch_all(&mut *transaction)
        .await?;

        transaction.commit().await?;
        // END sql transaction

        debug!("{:<20} - {} records", "EmailBmc::snapshot", records.len());
        Ok(records)
    }
}
