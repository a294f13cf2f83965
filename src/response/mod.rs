//! Response mutation subsystem.
//!
//! # Data Flow
//! ```text
//! each segment task
//!     → proxy.rs (records headers, cookies, head elements, redirect/error)
//!     → ResponseMutation per segment
//!     → merge.rs (one pass, outermost → innermost, first terminal signal wins)
//!     → MergedResponse applied before the JSON/HTML branch
//!
//! JSON mode only:
//!     cookie bytes + JSON body → etag.rs → ETag / 304
//! ```

pub mod etag;
pub mod merge;
pub mod proxy;

pub use etag::{should_return_304_conservative, to_quoted_sha256_etag};
pub use merge::{merge_mutations, MergedResponse, ResponseOutcome};
pub use proxy::{MutationStatus, ResponseMutation, ResponseProxy};
