//! End-to-end behaviour of the co-writer against scripted collaborators.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cowriter::{Collaborators, CoWriter};
use pipeline::prompts::question_template;
use pipeline::{
    CompletionError, NoteKind, Pillar, SeedStatus, Stage, StorySeedError, TextCompletion, User,
    UserId,
};
use pretty_assertions::assert_eq;
use store::{DirectoryExport, LocalNoteStore, MemoryArticleRepository, MemorySeedRepository};
use tempfile::TempDir;

/// Answers prompts from a queue and records every prompt it was sent.
struct ScriptedCompletion {
    configured: bool,
    replies: Mutex<VecDeque<Result<String, CompletionError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedCompletion {
    fn new(configured: bool) -> Self {
        Self {
            configured,
            replies: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn reply(&self, text: &str) {
        self.replies.lock().unwrap().push_back(Ok(text.to_string()));
    }

    fn fail(&self, err: CompletionError) {
        self.replies.lock().unwrap().push_back(Err(err));
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextCompletion for ScriptedCompletion {
    fn provider(&self) -> &str {
        "scripted"
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(CompletionError::Http("no scripted reply".into())))
    }
}

struct Harness {
    writer: CoWriter,
    completion: Arc<ScriptedCompletion>,
    dir: TempDir,
}

fn harness(configured: bool) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let completion = Arc::new(ScriptedCompletion::new(configured));
    let collaborators = Collaborators {
        completion: completion.clone(),
        seeds: Arc::new(MemorySeedRepository::new()),
        articles: Arc::new(MemoryArticleRepository::new()),
        notes: Arc::new(LocalNoteStore::new(dir.path().join("notes"))),
        storage_configured: false,
        clipboard: None,
        file_export: Some(Arc::new(DirectoryExport::new(dir.path().join("drafts")))),
    };
    let mut writer = CoWriter::new(collaborators);
    writer.sign_in(User {
        id: UserId::new("writer-1").unwrap(),
        display_name: "Writer".into(),
    });
    Harness {
        writer,
        completion,
        dir,
    }
}

/// Drives a harness from a fresh seed up to the Complete stage.
async fn write_to_completion(h: &mut Harness) {
    h.completion.reply("T1\nT2\nT3");
    h.completion.reply("Q1?\nQ2?\nQ3?\nQ4?\nQ5?");
    h.completion.reply("Draft body");

    let seed = h.writer.capture_seed("X", "Y", Pillar::BuildLog).await.unwrap();
    h.writer.begin(seed.id).await.unwrap();
    h.writer.generate_titles().await.unwrap();
    h.writer.choose_title(1).unwrap();
    h.writer.generate_questions().await.unwrap();
    h.writer.set_selected(3, false).unwrap();
    h.writer.set_selected(4, false).unwrap();
    for i in 0..3 {
        h.writer.answer(i, format!("answer {i}")).unwrap();
    }
    h.writer.submit_answers().unwrap();
    h.writer.generate_draft().await.unwrap();
}

#[tokio::test]
async fn seed_to_saved_article() {
    let mut h = harness(true);
    h.completion.reply("T1\nT2\nT3");
    h.completion.reply("Q1?\nQ2?\nQ3?\nQ4?\nQ5?");
    h.completion.reply("Draft body");

    let seed = h.writer.capture_seed("X", "Y", Pillar::BuildLog).await.unwrap();
    assert_eq!(seed.status, SeedStatus::Captured);

    h.writer.begin(seed.id).await.unwrap();
    assert_eq!(h.writer.stage(), Stage::TitleGeneration);
    assert_eq!(h.writer.seeds()[0].status, SeedStatus::Captured);

    let titles = h.writer.generate_titles().await.unwrap().to_vec();
    assert_eq!(titles, vec!["T1", "T2", "T3"]);
    assert_eq!(h.writer.seeds()[0].status, SeedStatus::Developing);

    h.writer.choose_title(1).unwrap();
    let questions = h.writer.generate_questions().await.unwrap().to_vec();
    assert_eq!(questions.len(), 5);

    h.writer.set_selected(3, false).unwrap();
    h.writer.set_selected(4, false).unwrap();
    for i in 0..3 {
        h.writer.answer(i, format!("answer {i}")).unwrap();
    }
    h.writer.submit_answers().unwrap();

    let draft = h.writer.generate_draft().await.unwrap().to_string();
    assert_eq!(draft, "Draft body");
    assert_eq!(h.writer.stage(), Stage::Complete);
    assert_eq!(h.writer.session().chosen_title(), Some("T2"));

    let draft_prompt = h.completion.prompts().pop().unwrap();
    assert!(draft_prompt.contains("Q: Q1?\nA: answer 0"));
    assert!(!draft_prompt.contains("Q4?"));

    let article = h.writer.save_article().await.unwrap();
    assert_eq!(article.title, "T2");
    assert_eq!(article.content, "Draft body");
    assert_eq!(article.seed_id, seed.id);
    assert_eq!(article.questions, vec!["Q1?", "Q2?", "Q3?"]);
    assert_eq!(article.answers.len(), 3);
    assert_eq!(h.writer.stage(), Stage::Idle);
    assert_eq!(h.writer.seeds()[0].status, SeedStatus::Written);

    let articles = h.writer.articles().await.unwrap();
    assert_eq!(articles, vec![article]);
}

#[tokio::test]
async fn missing_credential_blocks_generation_without_calling() {
    let mut h = harness(false);
    let notice = h.writer.setup_notice().unwrap();
    assert!(notice.completion_missing);

    let seed = h.writer.capture_seed("X", "Y", Pillar::FieldNote).await.unwrap();
    h.writer.begin(seed.id).await.unwrap();

    let err = h.writer.generate_titles().await.unwrap_err();
    assert!(matches!(err, StorySeedError::SetupRequired { .. }));
    assert_eq!(h.writer.stage(), Stage::TitleGeneration);
    assert!(h.writer.session().candidate_titles().is_empty());
    assert!(h.completion.prompts().is_empty());
    assert!(h.writer.setup_notice().is_some());

    h.writer.discard().await;
    let seeds = h.writer.refresh_seeds().await.unwrap();
    assert_eq!(seeds[0].status, SeedStatus::Captured);
    assert_eq!(h.writer.dashboard().ready_to_write, 1);
}

#[tokio::test]
async fn discarded_session_returns_seed_to_captured() {
    let mut h = harness(true);
    h.completion.reply("T1\nT2");
    let seed = h.writer.capture_seed("X", "Y", Pillar::BuildLog).await.unwrap();
    h.writer.begin(seed.id).await.unwrap();
    h.writer.generate_titles().await.unwrap();
    assert_eq!(h.writer.seeds()[0].status, SeedStatus::Developing);

    h.writer.discard().await;
    assert_eq!(h.writer.stage(), Stage::Idle);
    let seeds = h.writer.refresh_seeds().await.unwrap();
    assert_eq!(seeds[0].status, SeedStatus::Captured);
}

#[tokio::test]
async fn failed_completion_leaves_stage_for_retry() {
    let mut h = harness(true);
    h.completion.fail(CompletionError::Api {
        status: 503,
        message: "overloaded".into(),
    });
    h.completion.reply("Only title");

    let seed = h.writer.capture_seed("X", "Y", Pillar::MetaSkill).await.unwrap();
    h.writer.begin(seed.id).await.unwrap();

    let err = h.writer.generate_titles().await.unwrap_err();
    assert!(matches!(
        err,
        StorySeedError::Completion(CompletionError::Api { status: 503, .. })
    ));
    assert_eq!(h.writer.stage(), Stage::TitleGeneration);
    assert!(h.writer.session().candidate_titles().is_empty());

    let titles = h.writer.generate_titles().await.unwrap();
    assert_eq!(titles, ["Only title"]);
    assert_eq!(h.writer.stage(), Stage::TitleSelection);
}

#[tokio::test]
async fn response_without_questions_is_empty() {
    let mut h = harness(true);
    h.completion.reply("T1");
    h.completion.reply("Tell me about it.\nNo questions here.");

    let seed = h.writer.capture_seed("X", "Y", Pillar::BuildLog).await.unwrap();
    h.writer.begin(seed.id).await.unwrap();
    h.writer.generate_titles().await.unwrap();
    h.writer.choose_title(0).unwrap();

    let err = h.writer.generate_questions().await.unwrap_err();
    assert!(matches!(
        err,
        StorySeedError::Completion(CompletionError::EmptyResponse)
    ));
    assert_eq!(h.writer.stage(), Stage::QuestionGeneration);
}

#[tokio::test]
async fn question_prompt_follows_the_seed_pillar() {
    for pillar in Pillar::ALL {
        let mut h = harness(true);
        h.completion.reply("T1");
        h.completion.reply("Q1?");

        let seed = h.writer.capture_seed("X", "Y", pillar).await.unwrap();
        h.writer.begin(seed.id).await.unwrap();
        h.writer.generate_titles().await.unwrap();
        h.writer.choose_title(0).unwrap();
        h.writer.generate_questions().await.unwrap();

        let question_prompt = h.completion.prompts().pop().unwrap();
        for other in Pillar::ALL {
            assert_eq!(
                question_prompt.contains(question_template(other)),
                other == pillar,
                "{pillar} prompt vs {other} template"
            );
        }
    }
}

#[tokio::test]
async fn steps_out_of_order_change_nothing() {
    let mut h = harness(true);
    let err = h.writer.choose_title(0).unwrap_err();
    assert!(matches!(
        err,
        StorySeedError::InvalidTransition {
            stage: Stage::Idle,
            ..
        }
    ));
    assert!(h.writer.submit_answers().is_err());
    assert!(h.writer.save_article().await.is_err());
    assert_eq!(h.writer.stage(), Stage::Idle);
    assert!(h.completion.prompts().is_empty());
}

#[tokio::test]
async fn logout_clears_in_memory_state() {
    let mut h = harness(true);
    h.completion.reply("T1\nT2");
    let seed = h.writer.capture_seed("X", "Y", Pillar::LeadershipLens).await.unwrap();
    h.writer.begin(seed.id).await.unwrap();
    h.writer.generate_titles().await.unwrap();

    h.writer.logout();
    assert!(h.writer.user().is_none());
    assert!(h.writer.seeds().is_empty());
    assert_eq!(h.writer.stage(), Stage::Idle);
    assert!(h.writer.session().candidate_titles().is_empty());

    assert!(matches!(
        h.writer.refresh_seeds().await.unwrap_err(),
        StorySeedError::Unauthenticated
    ));
}

#[tokio::test]
async fn operations_require_a_user() {
    let mut h = harness(true);
    h.writer.logout();
    assert!(matches!(
        h.writer.capture_seed("X", "Y", Pillar::BuildLog).await,
        Err(StorySeedError::Unauthenticated)
    ));
    assert!(matches!(
        h.writer.notes().await,
        Err(StorySeedError::Unauthenticated)
    ));
    assert!(matches!(
        h.writer.articles().await,
        Err(StorySeedError::Unauthenticated)
    ));
}

#[tokio::test]
async fn blank_seed_fields_are_rejected_before_storage() {
    let mut h = harness(true);
    let err = h
        .writer
        .capture_seed("  ", "Y", Pillar::BuildLog)
        .await
        .unwrap_err();
    assert!(matches!(err, StorySeedError::Validation { .. }));
    assert!(h.writer.refresh_seeds().await.unwrap().is_empty());
}

#[tokio::test]
async fn notes_library_round_trip() {
    let h = harness(true);
    let defaults = h.writer.notes().await.unwrap().len();

    let note = h
        .writer
        .add_note("Hooks", "Open with tension", NoteKind::Prompt, vec!["hooks".into()])
        .await
        .unwrap();
    assert_eq!(h.writer.notes().await.unwrap().len(), defaults + 1);

    let updated = h
        .writer
        .update_note(
            note.id,
            pipeline::NoteUpdate {
                title: Some("Better hooks".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "Better hooks");
    assert_eq!(updated.content, "Open with tension");

    let empty = h.writer.update_note(note.id, Default::default()).await;
    assert!(matches!(empty, Err(StorySeedError::Validation { .. })));

    h.writer.delete_note(note.id).await.unwrap();
    let remaining = h.writer.notes().await.unwrap();
    assert_eq!(remaining.len(), defaults);
    assert!(remaining.iter().all(|n| n.id != note.id));
}

#[tokio::test]
async fn finished_draft_exports_to_a_file() {
    let mut h = harness(true);
    write_to_completion(&mut h).await;

    let location = h.writer.export_draft().await.unwrap();
    assert!(location.starts_with(&h.dir.path().display().to_string()));
    assert!(location.ends_with("t2.txt"));
    assert_eq!(
        std::fs::read_to_string(&location).unwrap(),
        "T2\n\nDraft body\n"
    );

    assert!(matches!(
        h.writer.copy_draft().await,
        Err(StorySeedError::CapabilityUnavailable("clipboard"))
    ));
    assert_eq!(h.writer.stage(), Stage::Complete);
}

#[tokio::test]
async fn regenerated_draft_replaces_the_previous_one() {
    let mut h = harness(true);
    write_to_completion(&mut h).await;
    let first_prompt = h.completion.prompts().pop().unwrap();

    h.completion.reply("Second draft");
    let draft = h.writer.generate_draft().await.unwrap();
    assert_eq!(draft, "Second draft");
    assert_eq!(h.completion.prompts().pop().unwrap(), first_prompt);
}
