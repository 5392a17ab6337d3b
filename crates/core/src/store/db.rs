//! # Rehearsal Database
//!
//! SQLite persistence for interviews and feedback records. Vector-valued
//! fields are stored as JSON text columns; the one-record-per-
//! (interview, user) identity is enforced by a UNIQUE index, so a blind
//! double insert cannot duplicate a pair even under a racing re-run.

use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hasher};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use super::records::{FeedbackDraft, FeedbackRecord, InterviewRecord, NewInterview};
use super::{FeedbackKey, RecordStore, StoreError};

/// Schema version for migrations
const SCHEMA_VERSION: i32 = 1;

/// SQLite-backed record store.
pub struct RehearsalDb {
    conn: Arc<Mutex<Connection>>,
}

impl RehearsalDb {
    /// Open or create the database at `.rehearsal/rehearsal.db`
    pub fn open() -> Result<Self> {
        Self::open_at(".rehearsal/rehearsal.db")
    }

    /// Open the database at a specific path (useful for testing)
    pub fn open_at<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent).ok();
        }

        let conn = Connection::open(path.as_ref()).context("Failed to open rehearsal database")?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.run_migrations()?;

        Ok(db)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Backend(format!("lock error: {}", e)))
    }

    /// Run schema migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER PRIMARY KEY)",
            [],
        )?;

        let current_version: i32 = conn
            .query_row(
                "SELECT COALESCE(MAX(version), 0) FROM schema_version",
                [],
                |row| row.get(0),
            )
            .unwrap_or(0);

        if current_version < 1 {
            self.migrate_v1(&conn)?;
            conn.execute(
                "INSERT OR REPLACE INTO schema_version (version) VALUES (?1)",
                [1],
            )?;
        }

        Ok(())
    }

    /// Migration to version 1 - complete schema
    fn migrate_v1(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS interviews (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                role TEXT NOT NULL,
                techstack_json TEXT NOT NULL DEFAULT '[]',
                questions_json TEXT NOT NULL DEFAULT '[]',
                created_at TEXT NOT NULL
            )
            "#,
            [],
        )?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS feedback (
                id TEXT PRIMARY KEY,
                interview_id TEXT NOT NULL,
                user_id TEXT NOT NULL,
                total_score REAL NOT NULL,
                category_scores_json TEXT NOT NULL DEFAULT '[]',
                strengths_json TEXT NOT NULL DEFAULT '[]',
                areas_json TEXT NOT NULL DEFAULT '[]',
                final_assessment TEXT NOT NULL DEFAULT '',
                emotional_json TEXT NOT NULL DEFAULT '[]',
                tips_json TEXT NOT NULL DEFAULT '[]',
                learning_path_json TEXT NOT NULL DEFAULT '[]',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                UNIQUE(interview_id, user_id)
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_interviews_user ON interviews(user_id)",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_feedback_user ON feedback(user_id)",
            [],
        )?;

        tracing::info!(
            "RehearsalDb initialized with schema version {}",
            SCHEMA_VERSION
        );

        Ok(())
    }

    fn row_to_interview(row: &rusqlite::Row) -> rusqlite::Result<InterviewRecord> {
        let id: String = row.get(0)?;
        let user_id: String = row.get(1)?;
        let role: String = row.get(2)?;
        let techstack_json: String = row.get(3)?;
        let questions_json: String = row.get(4)?;
        let created_at: String = row.get(5)?;

        Ok(InterviewRecord {
            id,
            user_id,
            role,
            techstack: serde_json::from_str(&techstack_json).unwrap_or_default(),
            questions: serde_json::from_str(&questions_json).unwrap_or_default(),
            created_at: parse_timestamp(&created_at),
        })
    }

    fn row_to_feedback(row: &rusqlite::Row) -> rusqlite::Result<FeedbackRecord> {
        let id: String = row.get(0)?;
        let interview_id: String = row.get(1)?;
        let user_id: String = row.get(2)?;
        let total_score: f64 = row.get(3)?;
        let category_scores_json: String = row.get(4)?;
        let strengths_json: String = row.get(5)?;
        let areas_json: String = row.get(6)?;
        let final_assessment: String = row.get(7)?;
        let emotional_json: String = row.get(8)?;
        let tips_json: String = row.get(9)?;
        let learning_path_json: String = row.get(10)?;
        let created_at: String = row.get(11)?;
        let updated_at: String = row.get(12)?;

        Ok(FeedbackRecord {
            id,
            interview_id,
            user_id,
            total_score: total_score as f32,
            category_scores: serde_json::from_str(&category_scores_json).unwrap_or_default(),
            strengths: serde_json::from_str(&strengths_json).unwrap_or_default(),
            areas_for_improvement: serde_json::from_str(&areas_json).unwrap_or_default(),
            final_assessment,
            emotional_analysis: serde_json::from_str(&emotional_json).unwrap_or_default(),
            behavioral_tips: serde_json::from_str(&tips_json).unwrap_or_default(),
            learning_path: serde_json::from_str(&learning_path_json).unwrap_or_default(),
            created_at: parse_timestamp(&created_at),
            updated_at: parse_timestamp(&updated_at),
        })
    }
}

const FEEDBACK_COLUMNS: &str = "id, interview_id, user_id, total_score, category_scores_json, \
     strengths_json, areas_json, final_assessment, emotional_json, tips_json, \
     learning_path_json, created_at, updated_at";

impl RecordStore for RehearsalDb {
    fn get_interview(&self, id: &str) -> Result<Option<InterviewRecord>, StoreError> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            "SELECT id, user_id, role, techstack_json, questions_json, created_at
             FROM interviews WHERE id = ?1",
        )?;
        let mut rows = stmt.query_map(params![id], |row| Self::row_to_interview(row))?;

        rows.next().transpose().map_err(StoreError::from)
    }

    fn insert_interview(&self, new: &NewInterview) -> Result<InterviewRecord, StoreError> {
        let record = InterviewRecord {
            id: fresh_id("int"),
            user_id: new.user_id.clone(),
            role: new.role.clone(),
            techstack: new.techstack.clone(),
            questions: new.questions.clone(),
            created_at: Utc::now(),
        };

        let conn = self.lock()?;
        conn.execute(
            r#"
            INSERT INTO interviews (id, user_id, role, techstack_json, questions_json, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                record.id,
                record.user_id,
                record.role,
                encode_json(&record.techstack)?,
                encode_json(&record.questions)?,
                record.created_at.to_rfc3339(),
            ],
        )?;

        Ok(record)
    }

    fn get_feedback(&self, id: &str) -> Result<Option<FeedbackRecord>, StoreError> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM feedback WHERE id = ?1",
            FEEDBACK_COLUMNS
        ))?;
        let mut rows = stmt.query_map(params![id], |row| Self::row_to_feedback(row))?;

        rows.next().transpose().map_err(StoreError::from)
    }

    fn feedback_for_pair(
        &self,
        interview_id: &str,
        user_id: &str,
    ) -> Result<Option<FeedbackRecord>, StoreError> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM feedback WHERE interview_id = ?1 AND user_id = ?2",
            FEEDBACK_COLUMNS
        ))?;
        let mut rows =
            stmt.query_map(params![interview_id, user_id], |row| Self::row_to_feedback(row))?;

        rows.next().transpose().map_err(StoreError::from)
    }

    fn upsert_feedback(
        &self,
        key: FeedbackKey<'_>,
        draft: &FeedbackDraft,
    ) -> Result<String, StoreError> {
        let now = Utc::now().to_rfc3339();
        let category_scores = encode_json(&draft.category_scores)?;
        let strengths = encode_json(&draft.strengths)?;
        let areas = encode_json(&draft.areas_for_improvement)?;
        let emotional = encode_json(&draft.emotional_analysis)?;
        let tips = encode_json(&draft.behavioral_tips)?;
        let learning_path = encode_json(&draft.learning_path)?;

        let conn = self.lock()?;

        match key {
            FeedbackKey::Existing(id) => {
                let affected = conn.execute(
                    r#"
                    UPDATE feedback SET
                        total_score = ?1, category_scores_json = ?2, strengths_json = ?3,
                        areas_json = ?4, final_assessment = ?5, emotional_json = ?6,
                        tips_json = ?7, learning_path_json = ?8, updated_at = ?9
                    WHERE id = ?10
                    "#,
                    params![
                        draft.total_score as f64,
                        category_scores,
                        strengths,
                        areas,
                        draft.final_assessment,
                        emotional,
                        tips,
                        learning_path,
                        now,
                        id,
                    ],
                )?;

                if affected == 0 {
                    return Err(StoreError::MissingFeedback(id.to_string()));
                }
                Ok(id.to_string())
            }
            FeedbackKey::Pair {
                interview_id,
                user_id,
            } => {
                // The UNIQUE(interview_id, user_id) index turns a re-run
                // without an explicit id into an in-place update.
                conn.execute(
                    r#"
                    INSERT INTO feedback (
                        id, interview_id, user_id, total_score, category_scores_json,
                        strengths_json, areas_json, final_assessment, emotional_json,
                        tips_json, learning_path_json, created_at, updated_at
                    )
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)
                    ON CONFLICT(interview_id, user_id) DO UPDATE SET
                        total_score = ?4, category_scores_json = ?5, strengths_json = ?6,
                        areas_json = ?7, final_assessment = ?8, emotional_json = ?9,
                        tips_json = ?10, learning_path_json = ?11, updated_at = ?12
                    "#,
                    params![
                        fresh_id("fb"),
                        interview_id,
                        user_id,
                        draft.total_score as f64,
                        category_scores,
                        strengths,
                        areas,
                        draft.final_assessment,
                        emotional,
                        tips,
                        learning_path,
                        now,
                    ],
                )?;

                conn.query_row(
                    "SELECT id FROM feedback WHERE interview_id = ?1 AND user_id = ?2",
                    params![interview_id, user_id],
                    |row| row.get(0),
                )
                .map_err(StoreError::from)
            }
        }
    }
}

fn encode_json<T: serde::Serialize>(value: &T) -> Result<String, StoreError> {
    serde_json::to_string(value).map_err(|e| StoreError::Backend(format!("encode error: {}", e)))
}

fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// Generate a collision-resistant row id (timestamp + hash, not cryptographic)
fn fresh_id(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_nanos();
    let salt = RandomState::new().build_hasher().finish() as u32;
    format!("{}-{:x}-{:x}", prefix, nanos, salt)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> (tempfile::TempDir, RehearsalDb) {
        let dir = tempfile::tempdir().unwrap();
        let db = RehearsalDb::open_at(dir.path().join("test.db")).unwrap();
        (dir, db)
    }

    fn draft(interview_id: &str, user_id: &str, total_score: f32) -> FeedbackDraft {
        FeedbackDraft {
            interview_id: interview_id.to_string(),
            user_id: user_id.to_string(),
            total_score,
            category_scores: vec![],
            strengths: vec!["clear communication".to_string()],
            areas_for_improvement: vec![],
            final_assessment: "keep practicing".to_string(),
            emotional_analysis: vec![],
            behavioral_tips: vec![],
            learning_path: vec![],
        }
    }

    #[test]
    fn open_twice_does_not_remigrate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reopen.db");
        drop(RehearsalDb::open_at(&path).unwrap());
        let db = RehearsalDb::open_at(&path).unwrap();
        assert!(db.get_interview("missing").unwrap().is_none());
    }

    #[test]
    fn interview_round_trips() {
        let (_dir, db) = test_db();
        let created = db
            .insert_interview(&NewInterview {
                user_id: "user-1".to_string(),
                role: "Backend Engineer".to_string(),
                techstack: vec!["rust".to_string(), "postgres".to_string()],
                questions: vec!["Walk me through a system you built.".to_string()],
            })
            .unwrap();

        let loaded = db.get_interview(&created.id).unwrap().unwrap();
        assert_eq!(loaded.role, "Backend Engineer");
        assert_eq!(loaded.techstack.len(), 2);
    }

    #[test]
    fn pair_upsert_inserts_then_updates_same_row() {
        let (_dir, db) = test_db();
        let key = FeedbackKey::Pair {
            interview_id: "int-1",
            user_id: "user-1",
        };

        let first_id = db.upsert_feedback(key, &draft("int-1", "user-1", 60.0)).unwrap();
        let second_id = db.upsert_feedback(key, &draft("int-1", "user-1", 75.0)).unwrap();

        assert_eq!(first_id, second_id);
        let stored = db.feedback_for_pair("int-1", "user-1").unwrap().unwrap();
        assert_eq!(stored.total_score, 75.0);

        let count: i64 = {
            let conn = db.conn.lock().unwrap();
            conn.query_row("SELECT COUNT(*) FROM feedback", [], |row| row.get(0))
                .unwrap()
        };
        assert_eq!(count, 1);
    }

    #[test]
    fn explicit_id_update_hits_the_same_row() {
        let (_dir, db) = test_db();
        let id = db
            .upsert_feedback(
                FeedbackKey::Pair {
                    interview_id: "int-2",
                    user_id: "user-2",
                },
                &draft("int-2", "user-2", 50.0),
            )
            .unwrap();

        let updated_id = db
            .upsert_feedback(FeedbackKey::Existing(&id), &draft("int-2", "user-2", 88.0))
            .unwrap();

        assert_eq!(id, updated_id);
        assert_eq!(db.get_feedback(&id).unwrap().unwrap().total_score, 88.0);
    }

    #[test]
    fn updating_missing_id_is_an_error() {
        let (_dir, db) = test_db();
        let err = db
            .upsert_feedback(FeedbackKey::Existing("fb-missing"), &draft("i", "u", 10.0))
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingFeedback(_)));
    }

    #[test]
    fn fresh_ids_carry_prefix_and_differ() {
        let a = fresh_id("fb");
        let b = fresh_id("fb");
        assert!(a.starts_with("fb-"));
        assert_ne!(a, b);
    }
}
