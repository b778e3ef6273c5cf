use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Row};
use uuid::Uuid;

use crate::db::{
    connection::Database,
    helpers::{decode_answers, encode_answers, parse_datetime},
};
use crate::models::{NewInterview, PersistedInterview, UserId};

fn row_to_interview(row: &Row) -> Result<PersistedInterview> {
    let user_id: String = row.get("user_id")?;
    let answers_json: String = row.get("answers_json")?;
    let timestamp: String = row.get("timestamp")?;
    let created_at: String = row.get("created_at")?;

    Ok(PersistedInterview {
        id: row.get("id")?,
        user_id: UserId::new(user_id),
        job_role: row.get("job_role")?,
        interview_name: row.get("interview_name")?,
        level: row.get("level")?,
        confidence: row.get("confidence")?,
        answers: decode_answers(&answers_json)?,
        timestamp: parse_datetime(&timestamp, "timestamp")?,
        created_at: parse_datetime(&created_at, "created_at")?,
    })
}

impl Database {
    /// Append one interview row. The store assigns `id` and `created_at`.
    pub async fn insert_interview(&self, interview: &NewInterview) -> Result<PersistedInterview> {
        let record = interview.clone();
        self.execute(move |conn| {
            let stored = PersistedInterview {
                id: Uuid::new_v4().to_string(),
                user_id: record.user_id,
                job_role: record.job_role,
                interview_name: record.interview_name,
                level: record.level,
                confidence: record.confidence,
                answers: record.answers,
                timestamp: record.timestamp,
                created_at: Utc::now(),
            };

            conn.execute(
                "INSERT INTO interviews (id, user_id, job_role, interview_name, level, confidence, answers_json, timestamp, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    stored.id,
                    stored.user_id.as_str(),
                    stored.job_role,
                    stored.interview_name,
                    stored.level,
                    stored.confidence,
                    encode_answers(&stored.answers)?,
                    stored.timestamp.to_rfc3339(),
                    stored.created_at.to_rfc3339(),
                ],
            )
            .with_context(|| "failed to insert interview")?;

            Ok(stored)
        })
        .await
    }

    /// All interviews owned by `user_id`, oldest insert first.
    pub async fn list_interviews_for_user(&self, user_id: &UserId) -> Result<Vec<PersistedInterview>> {
        let user_id = user_id.as_str().to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, job_role, interview_name, level, confidence, answers_json, timestamp, created_at
                 FROM interviews
                 WHERE user_id = ?1
                 ORDER BY rowid ASC",
            )?;

            let mut rows = stmt.query(params![user_id])?;
            let mut interviews = Vec::new();
            while let Some(row) = rows.next()? {
                interviews.push(row_to_interview(row)?);
            }

            Ok(interviews)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};

    use super::*;

    fn open() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("interviews.sqlite3")).unwrap();
        (dir, db)
    }

    fn row(user: &str, job_role: &str, confidence: f64) -> NewInterview {
        NewInterview {
            user_id: UserId::new(user),
            job_role: job_role.into(),
            interview_name: None,
            level: Some("Junior".into()),
            confidence,
            answers: vec!["first answer".into(), "second answer".into()],
            timestamp: DateTime::parse_from_rfc3339("2024-01-01T12:00:00.123456Z")
                .unwrap()
                .with_timezone(&Utc),
        }
    }

    #[tokio::test]
    async fn insert_then_list_round_trips_fields() {
        let (_dir, db) = open();
        let inserted = db.insert_interview(&row("u1", "Engineer", 85.0)).await.unwrap();

        let listed = db.list_interviews_for_user(&UserId::new("u1")).await.unwrap();
        assert_eq!(listed, vec![inserted.clone()]);
        assert_eq!(listed[0].answers[1], "second answer");
        assert_eq!(listed[0].level.as_deref(), Some("Junior"));
        assert!(Uuid::parse_str(&inserted.id).is_ok());
    }

    #[tokio::test]
    async fn list_filters_by_owner_in_insert_order() {
        let (_dir, db) = open();
        db.insert_interview(&row("u1", "first", 10.0)).await.unwrap();
        db.insert_interview(&row("u2", "other", 20.0)).await.unwrap();
        db.insert_interview(&row("u1", "second", 30.0)).await.unwrap();

        let roles: Vec<String> = db
            .list_interviews_for_user(&UserId::new("u1"))
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.job_role)
            .collect();
        assert_eq!(roles, vec!["first".to_string(), "second".to_string()]);
    }

    #[tokio::test]
    async fn unknown_user_gets_empty_list() {
        let (_dir, db) = open();
        let listed = db.list_interviews_for_user(&UserId::new("nobody")).await.unwrap();
        assert!(listed.is_empty());
    }
}
