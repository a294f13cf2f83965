//! Loader orchestration subsystem.
//!
//! # Data Flow
//! ```text
//! MatchResult
//!     → orchestrator.rs (TaskRunner, all segments concurrently)
//!     → segment.rs (Absent | Data | Failed per slot, head elements, mutation)
//!     → truncate (first failure wins, later slots dropped)
//!     → TruncatedChain for the assembler
//! ```

pub mod orchestrator;
pub mod segment;

pub use orchestrator::{outermost_error_index, truncate, LoaderOrchestrator, TruncatedChain};
pub use segment::{SegmentOutcome, SegmentResult};
