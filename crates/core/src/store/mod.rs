//! # Record Store
//!
//! The persistence contract the pipeline consumes, plus the SQLite
//! implementation the server binary runs on. The driver only ever talks to
//! [`RecordStore`]; tests substitute in-memory implementations.

pub mod db;
pub mod records;

pub use db::RehearsalDb;
pub use records::{FeedbackDraft, FeedbackRecord, InterviewRecord, NewInterview};

use thiserror::Error;

/// Persistence failure. Fails the whole pipeline run like any other stage
/// error; nothing is retried here.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no feedback record with id {0}")]
    MissingFeedback(String),
    #[error("record store failure: {0}")]
    Backend(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

/// Which feedback row an upsert targets.
///
/// `Existing` updates a known row in place (the re-run path); `Pair`
/// resolves through the one-record-per-(interview, user) identity, updating
/// the pair's row when one already exists.
#[derive(Debug, Clone, Copy)]
pub enum FeedbackKey<'a> {
    Existing(&'a str),
    Pair {
        interview_id: &'a str,
        user_id: &'a str,
    },
}

/// The record-store collaborator contract.
///
/// Writes are whole-record: [`RecordStore::upsert_feedback`] is the only
/// mutation the pipeline performs, and it happens exactly once, at the
/// terminal stage of a successful run.
pub trait RecordStore: Send + Sync {
    fn get_interview(&self, id: &str) -> Result<Option<InterviewRecord>, StoreError>;

    fn insert_interview(&self, new: &NewInterview) -> Result<InterviewRecord, StoreError>;

    fn get_feedback(&self, id: &str) -> Result<Option<FeedbackRecord>, StoreError>;

    fn feedback_for_pair(
        &self,
        interview_id: &str,
        user_id: &str,
    ) -> Result<Option<FeedbackRecord>, StoreError>;

    /// Write one fully synthesized record. Returns the id of the row that
    /// now holds the data. Updating a nonexistent explicit id is a
    /// [`StoreError::MissingFeedback`].
    fn upsert_feedback(
        &self,
        key: FeedbackKey<'_>,
        draft: &FeedbackDraft,
    ) -> Result<String, StoreError>;
}
