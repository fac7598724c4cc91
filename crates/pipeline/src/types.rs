//! Shared value types for the StorySeed domain.
//!
//! Unlike the newtype identifiers in [`crate::identifiers`], these types carry
//! meaning that drives behaviour: the [`Pillar`] selects a question template,
//! the [`SeedStatus`] feeds the dashboard, and [`Timestamp`] orders every
//! listing newest-first.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::UserId;

// ---------------------------------------------------------------------------
// Content pillars
// ---------------------------------------------------------------------------

/// One of the four fixed content categories.
///
/// Seeds and articles are tagged with a pillar, and the pillar chooses which
/// question template is sent to the completion collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Pillar {
    /// Hands-on accounts of building something with AI tools.
    #[serde(rename = "Build Log")]
    BuildLog,
    /// People, teams, and decisions around AI adoption.
    #[serde(rename = "Leadership Lens")]
    LeadershipLens,
    /// Learning how to learn: transferable skills and mental models.
    #[serde(rename = "Meta-Skill")]
    MetaSkill,
    /// Short observations from the field.
    #[serde(rename = "Field Note")]
    FieldNote,
}

impl Pillar {
    /// Every pillar, in display order.
    pub const ALL: [Pillar; 4] = [
        Pillar::BuildLog,
        Pillar::LeadershipLens,
        Pillar::MetaSkill,
        Pillar::FieldNote,
    ];

    /// Returns the display label (also the stored representation).
    pub fn label(self) -> &'static str {
        match self {
            Pillar::BuildLog => "Build Log",
            Pillar::LeadershipLens => "Leadership Lens",
            Pillar::MetaSkill => "Meta-Skill",
            Pillar::FieldNote => "Field Note",
        }
    }
}

impl std::fmt::Display for Pillar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a string names no known pillar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown pillar '{0}' (expected one of: Build Log, Leadership Lens, Meta-Skill, Field Note)")]
pub struct UnknownPillar(pub String);

impl std::str::FromStr for Pillar {
    type Err = UnknownPillar;

    /// Accepts the display label or a slug form, case-insensitively
    /// (`"Build Log"`, `"build-log"`, `"build_log"`, `"buildlog"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();
        match folded.as_str() {
            "buildlog" => Ok(Pillar::BuildLog),
            "leadershiplens" => Ok(Pillar::LeadershipLens),
            "metaskill" => Ok(Pillar::MetaSkill),
            "fieldnote" => Ok(Pillar::FieldNote),
            _ => Err(UnknownPillar(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Record status / kind enums
// ---------------------------------------------------------------------------

/// Lifecycle of a seed. The only field of a seed that changes after capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedStatus {
    /// Captured and waiting to be developed.
    #[default]
    Captured,
    /// An authoring attempt has started from this seed.
    Developing,
    /// An article developed from this seed has been saved.
    Written,
}

impl std::fmt::Display for SeedStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            SeedStatus::Captured => "captured",
            SeedStatus::Developing => "developing",
            SeedStatus::Written => "written",
        })
    }
}

/// Kind of a library note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteKind {
    /// A reusable article skeleton.
    Template,
    /// A saved prompt.
    Prompt,
    /// Reference material.
    Reference,
}

impl std::fmt::Display for NoteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            NoteKind::Template => "template",
            NoteKind::Prompt => "prompt",
            NoteKind::Reference => "reference",
        })
    }
}

impl std::str::FromStr for NoteKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "template" => Ok(NoteKind::Template),
            "prompt" => Ok(NoteKind::Prompt),
            "reference" => Ok(NoteKind::Reference),
            other => Err(format!(
                "unknown note type '{other}' (expected template, prompt, or reference)"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// The authenticated user, as supplied by the identity collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Owner key for every stored record.
    pub id: UserId,
    /// Name shown in greetings.
    pub display_name: String,
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly. Serialises as RFC 3339, which is also what the remote store
/// returns for `created_at` columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current UTC time as a [`Timestamp`].
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a [`Timestamp`] from a [`DateTime<Utc>`].
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the underlying [`DateTime<Utc>`].
    pub fn as_datetime(self) -> DateTime<Utc> {
        self.0
    }

    /// Returns `true` if `self` lies within `days` days before `now`
    /// (inclusive of `now`; future timestamps do not count).
    pub fn is_within_days_of(self, now: Timestamp, days: i64) -> bool {
        self.0 <= now.0 && now.0 - self.0 <= Duration::days(days)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pillar_serializes_as_label() {
        for pillar in Pillar::ALL {
            let json = serde_json::to_string(&pillar).unwrap();
            assert_eq!(json, format!("\"{}\"", pillar.label()));
        }
    }

    #[test]
    fn pillar_parses_labels_and_slugs() {
        assert_eq!("Build Log".parse::<Pillar>(), Ok(Pillar::BuildLog));
        assert_eq!("leadership-lens".parse::<Pillar>(), Ok(Pillar::LeadershipLens));
        assert_eq!("META_SKILL".parse::<Pillar>(), Ok(Pillar::MetaSkill));
        assert_eq!("fieldnote".parse::<Pillar>(), Ok(Pillar::FieldNote));
        assert!("Poetry".parse::<Pillar>().is_err());
    }

    #[test]
    fn note_kind_parses() {
        assert_eq!("Template".parse::<NoteKind>(), Ok(NoteKind::Template));
        assert!("draft".parse::<NoteKind>().is_err());
    }

    #[test]
    fn within_days_window() {
        let now = Timestamp::now();
        let three_days_ago = Timestamp::from_utc(now.as_datetime() - Duration::days(3));
        let ten_days_ago = Timestamp::from_utc(now.as_datetime() - Duration::days(10));
        let tomorrow = Timestamp::from_utc(now.as_datetime() + Duration::days(1));

        assert!(now.is_within_days_of(now, 7));
        assert!(three_days_ago.is_within_days_of(now, 7));
        assert!(!ten_days_ago.is_within_days_of(now, 7));
        assert!(!tomorrow.is_within_days_of(now, 7));
    }

    #[test]
    fn timestamp_reads_store_format() {
        let ts: Timestamp = serde_json::from_str("\"2024-05-01T12:30:00.123456+00:00\"").unwrap();
        assert_eq!(ts.as_datetime().timestamp(), 1_714_566_600);
    }
}
