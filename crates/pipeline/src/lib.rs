//! Core authoring domain for StorySeed.
//!
//! This crate contains every domain concept, newtype identifier, record type,
//! prompt template, and error type used throughout the workspace, plus the
//! collaborator traits that infrastructure crates implement. It never talks to
//! the network or the file system.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate defines *what* is needed;
//! the `llm` and `store` crates define *how* to supply it, and `cowriter`
//! sequences the calls.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`UserId`, `SeedId`, `SessionId`, …) |
//! | [`types`] | Value types (`Pillar`, `SeedStatus`, `NoteKind`, `Timestamp`, `User`) |
//! | [`records`] | Stored records and their creation requests |
//! | [`errors`] | Domain and collaborator error types |
//! | [`ports`] | Collaborator traits |
//! | [`prompts`] | Prompt construction for the generation steps |
//! | [`parse`] | Best-effort parsing of completion responses |
//! | [`session`] | The pipeline session state machine |
//! | [`stats`] | Dashboard counters |

pub mod errors;
pub mod identifiers;
pub mod parse;
pub mod ports;
pub mod prompts;
pub mod records;
pub mod session;
pub mod stats;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use errors::{CompletionError, StoreError, StorySeedError};
pub use identifiers::{ArticleId, NoteId, SeedId, SessionId, UserId};
pub use ports::{
    ArticleRepository, Clipboard, FileExport, IdentityProvider, NoteRepository, SeedRepository,
    TextCompletion,
};
pub use records::{newest_first, Article, NewArticle, NewNote, NewSeed, Note, NoteUpdate, Seed};
pub use session::{PipelineSession, Stage};
pub use stats::DashboardStats;
pub use types::{NoteKind, Pillar, SeedStatus, Timestamp, UnknownPillar, User};
