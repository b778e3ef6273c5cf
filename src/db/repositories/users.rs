use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};

use crate::db::{connection::Database, helpers::parse_datetime, models::UserAccount};

fn row_to_user(row: &Row) -> Result<UserAccount> {
    let created_at: String = row.get("created_at")?;

    Ok(UserAccount {
        id: row.get("id")?,
        email: row.get("email")?,
        created_at: parse_datetime(&created_at, "created_at")?,
    })
}

impl Database {
    /// Register an identity so tokens naming it resolve.
    pub async fn insert_user(&self, id: &str, email: Option<&str>) -> Result<UserAccount> {
        let account = UserAccount {
            id: id.to_string(),
            email: email.map(str::to_string),
            created_at: Utc::now(),
        };
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO users (id, email, created_at) VALUES (?1, ?2, ?3)",
                params![account.id, account.email, account.created_at.to_rfc3339()],
            )
            .with_context(|| format!("failed to insert user {}", account.id))?;
            Ok(account)
        })
        .await
    }

    pub async fn find_user(&self, id: &str) -> Result<Option<UserAccount>> {
        let id = id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, email, created_at
                 FROM users
                 WHERE id = ?1",
            )?;

            let user = stmt
                .query_row(params![id], |row| Ok(row_to_user(row)))
                .optional()?
                .transpose()?;

            Ok(user)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_and_find_user() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("users.sqlite3")).unwrap();

        db.insert_user("u1", Some("a@example.com")).await.unwrap();

        let found = db.find_user("u1").await.unwrap().unwrap();
        assert_eq!(found.email.as_deref(), Some("a@example.com"));
        assert!(db.find_user("u2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_id_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("users.sqlite3")).unwrap();

        db.insert_user("u1", None).await.unwrap();
        assert!(db.insert_user("u1", None).await.is_err());
    }
}
