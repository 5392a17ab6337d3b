//! # Rehearsal Core
//!
//! The engine behind Rehearsal's post-interview feedback: a fixed-topology,
//! schema-validated multi-agent pipeline that turns a finished call
//! transcript (plus behavioral telemetry) into one persisted feedback
//! record.
//!
//! ## Architecture
//!
//! - `schemas` - the registry of typed agent contracts and the validation gate
//! - `agents` - five generation calls: three concurrent specialists, two
//!   sequential synthesis stages
//! - `pipeline` - the driver state machine and its event stream
//! - `store` - the record-store contract plus the SQLite implementation
//! - `transcript` / `telemetry` - the two inputs handed over at call end
//! - `models` - LLM provider selection and per-agent overrides
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rehearsal_core::agents::RadkitLlm;
//! use rehearsal_core::models::LlmSettings;
//! use rehearsal_core::pipeline::{FeedbackPipeline, FeedbackRequest};
//! use rehearsal_core::store::RehearsalDb;
//!
//! let store = Arc::new(RehearsalDb::open()?);
//! let llm = Arc::new(RadkitLlm::new(LlmSettings::from_env()));
//! let mut pipeline = FeedbackPipeline::new(llm, store);
//! let outcome = pipeline.run(request).await;
//! ```

pub mod agents;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod schemas;
pub mod store;
pub mod telemetry;
pub mod transcript;
