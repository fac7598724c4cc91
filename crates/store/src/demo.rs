//! Built-in datasets used when no remote store is available.

use pipeline::{Note, NoteId, NoteKind, Pillar, Seed, SeedId, SeedStatus, Timestamp, UserId};
use uuid::Uuid;

/// The two demo seeds shown when seeds cannot be loaded from the remote store.
///
/// Ids are fixed so that a demo seed can be addressed across calls.
pub fn demo_seeds(user: &UserId) -> Vec<Seed> {
    let now = Timestamp::now();
    vec![
        Seed {
            id: SeedId::from_uuid(Uuid::from_u128(1)),
            user_id: user.clone(),
            title: "AI replaced my workflow".into(),
            content: "Discovered how ChatGPT automated my daily standup prep".into(),
            pillar: Pillar::BuildLog,
            status: SeedStatus::Captured,
            created_at: now,
        },
        Seed {
            id: SeedId::from_uuid(Uuid::from_u128(2)),
            user_id: user.clone(),
            title: "Leadership through AI adoption".into(),
            content: "Team was resistant to AI tools until I showed real results".into(),
            pillar: Pillar::LeadershipLens,
            status: SeedStatus::Captured,
            created_at: now,
        },
    ]
}

/// The two default templates shown when a user has no notes yet.
pub fn default_note_templates(user: &UserId) -> Vec<Note> {
    let now = Timestamp::now();
    vec![
        Note {
            id: NoteId::from_uuid(Uuid::from_u128(101)),
            user_id: user.clone(),
            title: "Story Arc Template".into(),
            content: "1. The moment: what happened?\n\
                      2. The tension: what was at stake or in the way?\n\
                      3. The turn: what did you try, and what changed?\n\
                      4. The takeaway: what should the reader do differently?"
                .into(),
            kind: NoteKind::Template,
            tags: vec!["structure".into(), "narrative".into()],
            created_at: now,
        },
        Note {
            id: NoteId::from_uuid(Uuid::from_u128(102)),
            user_id: user.clone(),
            title: "Hook Formula".into(),
            content: "Open with a specific number, a surprising admission, or a question the \
                      reader has asked themselves this week."
                .into(),
            kind: NoteKind::Prompt,
            tags: vec!["hooks".into(), "openers".into()],
            created_at: now,
        },
    ]
}
