//! # Feedback Pipeline
//!
//! Fixed-topology run over one finished interview call:
//!
//! ```text
//! FetchSource → FormatInput → FanOutSpecialists → SynthesizeGrowth
//!     → Orchestrate → Persist → Done     (Failed reachable from any stage)
//! ```
//!
//! The fan-out stage issues the three specialist calls concurrently and
//! joins them; the latency floor is the slowest specialist, not the sum.

pub mod driver;
pub mod events;
pub mod stage;

pub use driver::{FeedbackOutcome, FeedbackPipeline, FeedbackRequest};
pub use events::{PipelineEvent, PipelineEventKind};
pub use stage::Stage;
