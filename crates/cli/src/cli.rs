//! Command-line surface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use pipeline::{ArticleId, NoteId, NoteKind, Pillar, SeedId};

use crate::config::LogFormat;

/// Capture story seeds and develop them into drafts with an AI co-writer.
#[derive(Debug, Parser)]
#[command(name = "storyseed", version, about)]
pub struct Cli {
    /// Config file (defaults to .storyseed/config.toml when present).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log output format on stderr.
    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Story seeds.
    Seed {
        #[command(subcommand)]
        action: SeedCommands,
    },
    /// Notes library.
    Note {
        #[command(subcommand)]
        action: NoteCommands,
    },
    /// Saved articles.
    Article {
        #[command(subcommand)]
        action: ArticleCommands,
    },
    /// Dashboard counters.
    Stats,
    /// Develop a seed into a draft, interactively.
    Write(WriteArgs),
    /// Show configuration status and any setup notice.
    Status,
}

#[derive(Debug, Subcommand)]
pub enum SeedCommands {
    /// Capture a new seed.
    Add(SeedAddArgs),
    /// List seeds, newest first.
    List,
}

#[derive(Debug, Args)]
pub struct SeedAddArgs {
    #[arg(long)]
    pub title: String,
    /// Build Log, Leadership Lens, Meta-Skill, or Field Note.
    #[arg(long)]
    pub pillar: Pillar,
    /// The idea itself.
    pub content: String,
}

#[derive(Debug, Subcommand)]
pub enum NoteCommands {
    /// Add a note.
    Add(NoteAddArgs),
    /// List notes, newest first.
    List,
    /// Change fields of a note.
    Edit(NoteEditArgs),
    /// Delete a note.
    Rm { id: NoteId },
}

#[derive(Debug, Args)]
pub struct NoteAddArgs {
    #[arg(long)]
    pub title: String,
    /// template, prompt, or reference.
    #[arg(long = "type", default_value = "reference")]
    pub kind: NoteKind,
    /// Comma-separated tags.
    #[arg(long, value_delimiter = ',')]
    pub tags: Vec<String>,
    pub content: String,
}

#[derive(Debug, Args)]
pub struct NoteEditArgs {
    pub id: NoteId,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub content: Option<String>,
    #[arg(long = "type")]
    pub kind: Option<NoteKind>,
    /// Comma-separated tags; replaces the existing set.
    #[arg(long, value_delimiter = ',')]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Subcommand)]
pub enum ArticleCommands {
    /// List saved articles, newest first.
    List,
    /// Print one article with its interview.
    Show { id: ArticleId },
}

#[derive(Debug, Args)]
pub struct WriteArgs {
    /// Seed to develop; prompts for one when omitted.
    #[arg(long)]
    pub seed: Option<SeedId>,
}
