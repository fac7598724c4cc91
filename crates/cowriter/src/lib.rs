//! StorySeed co-writer.
//!
//! [`CoWriter`] is the single entry point a front end talks to. It owns the
//! signed-in user, the cached seed list, and the [`pipeline::PipelineSession`],
//! and it sequences calls between the session state machine and the
//! collaborators (text completion, record stores, host capabilities).
//!
//! ## Architectural Layer
//!
//! **Orchestration layer.** Prompt text, parsing, and stage rules live in the
//! [`pipeline`] crate; HTTP and file I/O live in `llm` and `store`. This crate
//! only decides *when* to call what, applies the identity and credential
//! gates, and logs transient failures.
//!
//! ## Failure policy
//!
//! A failed collaborator call leaves the session where it was with an empty
//! result; the caller may simply retry the same action. There is no automatic
//! retry and no cancellation.

mod collaborators;
mod cowriter;
mod export;
mod library;

pub use collaborators::{Collaborators, SetupNotice};
pub use cowriter::CoWriter;
pub use export::draft_file_name;
