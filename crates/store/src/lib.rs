//! StorySeed record storage adapters.
//!
//! Implements the repository traits defined in the [`pipeline`] crate:
//!
//! - [`SupabaseClient`] with the [`SupabaseSeeds`], [`SupabaseArticles`], and
//!   [`SupabaseNotes`] wrappers: the remote store.
//! - [`MemorySeedRepository`] / [`MemoryArticleRepository`]: process-lifetime
//!   storage, optionally pre-populated with the demo seeds.
//! - [`LocalNoteStore`]: durable on-device notes, one JSON file per user.
//! - [`Fallback`]: remote first, local when the remote is absent or unreachable.
//! - [`DirectoryExport`]: the file-export capability.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** HTTP, PostgREST query syntax, JSON files, and fallback
//! routing all live here; the [`pipeline`] crate sees only its traits.
//!
//! ## Fallback datasets
//!
//! | Records | Remote unavailable |
//! |---------|--------------------|
//! | Seeds | the two demo seeds, plus anything created this run |
//! | Articles | empty, plus anything created this run |
//! | Notes | the on-device file if present, else the two default templates |

mod demo;
mod export;
mod fallback;
mod local;
mod memory;
mod supabase;

pub use demo::{default_note_templates, demo_seeds};
pub use export::DirectoryExport;
pub use fallback::Fallback;
pub use local::LocalNoteStore;
pub use memory::{MemoryArticleRepository, MemorySeedRepository};
pub use supabase::{
    SupabaseArticles, SupabaseClient, SupabaseNotes, SupabaseSeeds, SupabaseSettings,
};
