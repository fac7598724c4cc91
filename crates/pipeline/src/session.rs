//! The pipeline session: ephemeral state of one seed-to-draft attempt.
//!
//! [`PipelineSession`] is a pure state machine. It builds the prompt for each
//! generation step and accepts the parsed result, but never calls a
//! collaborator itself; the `cowriter` crate sequences those calls.
//!
//! ```text
//! Idle ─begin─▶ TitleGeneration ─titles─▶ TitleSelection ─choose─▶ QuestionGeneration
//!                    ▲                          │                       ▲
//!                    └──────── regenerate ──────┘                       │ try different
//! QuestionGeneration ─questions─▶ QuestionAnswering ─submit─▶ DraftGeneration ─draft─▶ Complete
//!                                        │                          ▲                  │
//!                                        └──────────────────────────┼──── regenerate ──┘
//! ```
//!
//! Every transition checks the current stage first and leaves the session
//! untouched when it is not allowed.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{prompts, NewArticle, Seed, SessionId, StorySeedError, UserId};

/// Where a [`PipelineSession`] currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Idle,
    TitleGeneration,
    TitleSelection,
    QuestionGeneration,
    QuestionAnswering,
    DraftGeneration,
    Complete,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Stage::Idle => "idle",
            Stage::TitleGeneration => "title generation",
            Stage::TitleSelection => "title selection",
            Stage::QuestionGeneration => "question generation",
            Stage::QuestionAnswering => "question answering",
            Stage::DraftGeneration => "draft generation",
            Stage::Complete => "complete",
        })
    }
}

/// Working state of one authoring attempt. Never persisted mid-flight.
#[derive(Debug, Clone)]
pub struct PipelineSession {
    id: SessionId,
    stage: Stage,
    seed: Option<Seed>,
    candidate_titles: Vec<String>,
    chosen_title: Option<String>,
    candidate_questions: Vec<String>,
    selected: BTreeMap<String, bool>,
    answers: BTreeMap<String, String>,
    draft_content: String,
}

impl Default for PipelineSession {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineSession {
    /// Creates an idle session.
    pub fn new() -> Self {
        Self {
            id: SessionId::new_random(),
            stage: Stage::Idle,
            seed: None,
            candidate_titles: Vec::new(),
            chosen_title: None,
            candidate_questions: Vec::new(),
            selected: BTreeMap::new(),
            answers: BTreeMap::new(),
            draft_content: String::new(),
        }
    }

    // -- accessors ----------------------------------------------------------

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn seed(&self) -> Option<&Seed> {
        self.seed.as_ref()
    }

    pub fn candidate_titles(&self) -> &[String] {
        &self.candidate_titles
    }

    pub fn chosen_title(&self) -> Option<&str> {
        self.chosen_title.as_deref()
    }

    pub fn candidate_questions(&self) -> &[String] {
        &self.candidate_questions
    }

    /// Whether the question at `index` is currently selected.
    pub fn is_selected(&self, index: usize) -> bool {
        self.candidate_questions
            .get(index)
            .and_then(|q| self.selected.get(q))
            .copied()
            .unwrap_or(false)
    }

    /// Selected questions, in generation order.
    pub fn selected_questions(&self) -> Vec<&str> {
        self.candidate_questions
            .iter()
            .filter(|q| self.selected.get(*q).copied().unwrap_or(false))
            .map(String::as_str)
            .collect()
    }

    pub fn answers(&self) -> &BTreeMap<String, String> {
        &self.answers
    }

    pub fn draft_content(&self) -> &str {
        &self.draft_content
    }

    /// Selected question/answer pairs in generation order.
    pub fn answered_pairs(&self) -> Vec<(String, String)> {
        self.selected_questions()
            .into_iter()
            .map(|q| {
                let answer = self.answers.get(q).cloned().unwrap_or_default();
                (q.to_string(), answer)
            })
            .collect()
    }

    // -- transitions --------------------------------------------------------

    /// Idle → TitleGeneration. Starts a fresh attempt for `seed`.
    pub fn begin(&mut self, seed: Seed) -> Result<(), StorySeedError> {
        self.require("select a seed", &[Stage::Idle])?;
        *self = Self::new();
        self.seed = Some(seed);
        self.stage = Stage::TitleGeneration;
        Ok(())
    }

    /// Enters (or re-enters) TitleGeneration, clearing prior titles, and
    /// returns the title prompt.
    pub fn prepare_titles(&mut self) -> Result<String, StorySeedError> {
        self.require(
            "generate titles",
            &[Stage::TitleGeneration, Stage::TitleSelection],
        )?;
        let prompt = prompts::title_prompt(self.current_seed()?);
        self.candidate_titles.clear();
        self.chosen_title = None;
        self.stage = Stage::TitleGeneration;
        Ok(prompt)
    }

    /// TitleGeneration → TitleSelection. An empty list keeps the stage.
    pub fn accept_titles(&mut self, titles: Vec<String>) -> Result<(), StorySeedError> {
        self.require("accept titles", &[Stage::TitleGeneration])?;
        if !titles.is_empty() {
            self.candidate_titles = titles;
            self.stage = Stage::TitleSelection;
        }
        Ok(())
    }

    /// TitleSelection → QuestionGeneration.
    pub fn choose_title(&mut self, index: usize) -> Result<(), StorySeedError> {
        self.require("choose a title", &[Stage::TitleSelection])?;
        let title = self
            .candidate_titles
            .get(index)
            .cloned()
            .ok_or_else(|| out_of_range("title", index, self.candidate_titles.len()))?;
        self.chosen_title = Some(title);
        self.stage = Stage::QuestionGeneration;
        Ok(())
    }

    /// Enters (or re-enters) QuestionGeneration, clearing prior questions and
    /// answers, and returns the pillar-specific question prompt.
    pub fn prepare_questions(&mut self) -> Result<String, StorySeedError> {
        self.require(
            "generate questions",
            &[Stage::QuestionGeneration, Stage::QuestionAnswering],
        )?;
        let title = self.chosen_title.as_deref().unwrap_or_default();
        let prompt = prompts::question_prompt(self.current_seed()?, title);
        self.candidate_questions.clear();
        self.selected.clear();
        self.answers.clear();
        self.stage = Stage::QuestionGeneration;
        Ok(prompt)
    }

    /// QuestionGeneration → QuestionAnswering with every question selected.
    /// Repeated questions are kept once. An empty list keeps the stage.
    pub fn accept_questions(&mut self, mut questions: Vec<String>) -> Result<(), StorySeedError> {
        self.require("accept questions", &[Stage::QuestionGeneration])?;
        let mut seen = BTreeSet::new();
        questions.retain(|q| seen.insert(q.clone()));
        if !questions.is_empty() {
            self.selected = questions.iter().map(|q| (q.clone(), true)).collect();
            self.candidate_questions = questions;
            self.stage = Stage::QuestionAnswering;
        }
        Ok(())
    }

    /// Selects or deselects the question at `index`.
    pub fn set_selected(&mut self, index: usize, selected: bool) -> Result<(), StorySeedError> {
        self.require("select questions", &[Stage::QuestionAnswering])?;
        let question = self.question_at(index)?;
        self.selected.insert(question, selected);
        Ok(())
    }

    /// Records the answer to the selected question at `index`.
    pub fn set_answer(
        &mut self,
        index: usize,
        answer: impl Into<String>,
    ) -> Result<(), StorySeedError> {
        self.require("answer questions", &[Stage::QuestionAnswering])?;
        if !self.is_selected(index) {
            let question = self.question_at(index)?;
            return Err(StorySeedError::Validation {
                field: "answer",
                reason: format!("question '{question}' is not selected"),
            });
        }
        let question = self.question_at(index)?;
        self.answers.insert(question, answer.into());
        Ok(())
    }

    /// QuestionAnswering → DraftGeneration.
    ///
    /// Requires at least one selected question and a non-blank answer for
    /// every selected question. Answers to unselected questions are dropped.
    pub fn submit_answers(&mut self) -> Result<(), StorySeedError> {
        self.require("submit answers", &[Stage::QuestionAnswering])?;
        let selected: Vec<String> = self
            .selected_questions()
            .into_iter()
            .map(str::to_string)
            .collect();
        if selected.is_empty() {
            return Err(StorySeedError::Validation {
                field: "questions",
                reason: "select at least one question".into(),
            });
        }
        if let Some(missing) = selected.iter().find(|q| {
            self.answers
                .get(*q)
                .map_or(true, |a| a.trim().is_empty())
        }) {
            return Err(StorySeedError::Validation {
                field: "answer",
                reason: format!("question '{missing}' has no answer"),
            });
        }
        self.answers.retain(|q, _| selected.contains(q));
        self.stage = Stage::DraftGeneration;
        Ok(())
    }

    /// Enters (or re-enters) DraftGeneration with identical inputs, clearing
    /// the previous draft, and returns the draft prompt.
    pub fn prepare_draft(&mut self) -> Result<String, StorySeedError> {
        self.require("generate a draft", &[Stage::DraftGeneration, Stage::Complete])?;
        let title = self.chosen_title.as_deref().unwrap_or_default();
        let prompt = prompts::draft_prompt(self.current_seed()?, title, &self.answered_pairs());
        self.draft_content.clear();
        self.stage = Stage::DraftGeneration;
        Ok(prompt)
    }

    /// DraftGeneration → Complete. A blank draft keeps the stage.
    pub fn accept_draft(&mut self, draft: String) -> Result<(), StorySeedError> {
        self.require("accept a draft", &[Stage::DraftGeneration])?;
        if !draft.trim().is_empty() {
            self.draft_content = draft.trim().to_string();
            self.stage = Stage::Complete;
        }
        Ok(())
    }

    /// Builds the article to persist from a completed session.
    ///
    /// Copies the chosen title, the seed's pillar, the selected questions, and
    /// their answers by value.
    pub fn to_new_article(&self, user: &UserId) -> Result<NewArticle, StorySeedError> {
        self.require("save the article", &[Stage::Complete])?;
        let seed = self.current_seed()?;
        let questions: Vec<String> = self
            .selected_questions()
            .into_iter()
            .map(str::to_string)
            .collect();
        let answers = self
            .answers
            .iter()
            .filter(|(q, _)| questions.contains(*q))
            .map(|(q, a)| (q.clone(), a.clone()))
            .collect();
        Ok(NewArticle {
            user_id: user.clone(),
            seed_id: seed.id,
            title: self.chosen_title.clone().unwrap_or_else(|| seed.title.clone()),
            content: self.draft_content.clone(),
            pillar: seed.pillar,
            questions,
            answers,
        })
    }

    /// Any stage → Idle, dropping everything.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    // -- helpers ------------------------------------------------------------

    fn require(&self, action: &'static str, allowed: &[Stage]) -> Result<(), StorySeedError> {
        if allowed.contains(&self.stage) {
            Ok(())
        } else {
            Err(StorySeedError::InvalidTransition {
                action,
                stage: self.stage,
            })
        }
    }

    fn current_seed(&self) -> Result<&Seed, StorySeedError> {
        self.seed.as_ref().ok_or(StorySeedError::InvalidTransition {
            action: "continue without a seed",
            stage: self.stage,
        })
    }

    fn question_at(&self, index: usize) -> Result<String, StorySeedError> {
        self.candidate_questions
            .get(index)
            .cloned()
            .ok_or_else(|| out_of_range("question", index, self.candidate_questions.len()))
    }
}

fn out_of_range(field: &'static str, index: usize, len: usize) -> StorySeedError {
    StorySeedError::Validation {
        field,
        reason: format!("index {} is out of range (1-{len})", index + 1),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{NewSeed, Pillar, SeedId, Timestamp};

    fn seed() -> Seed {
        NewSeed::new(UserId::new("u").unwrap(), "X", "Y", Pillar::BuildLog)
            .unwrap()
            .into_seed(SeedId::new_random(), Timestamp::now())
    }

    fn questions() -> Vec<String> {
        ["Q1?", "Q2?", "Q3?", "Q4?", "Q5?"]
            .iter()
            .map(|q| q.to_string())
            .collect()
    }

    fn session_at_answering() -> PipelineSession {
        let mut s = PipelineSession::new();
        s.begin(seed()).unwrap();
        s.prepare_titles().unwrap();
        s.accept_titles(vec!["T1".into(), "T2".into(), "T3".into()]).unwrap();
        s.choose_title(1).unwrap();
        s.prepare_questions().unwrap();
        s.accept_questions(questions()).unwrap();
        s
    }

    #[test]
    fn walks_forward_to_complete() {
        let mut s = session_at_answering();
        assert_eq!(s.chosen_title(), Some("T2"));
        assert_eq!(s.stage(), Stage::QuestionAnswering);

        s.set_selected(1, false).unwrap();
        s.set_selected(3, false).unwrap();
        for i in [0, 2, 4] {
            s.set_answer(i, format!("answer {i}")).unwrap();
        }
        s.submit_answers().unwrap();
        assert_eq!(s.stage(), Stage::DraftGeneration);

        let prompt = s.prepare_draft().unwrap();
        assert!(prompt.contains("Q: Q1?\nA: answer 0"));
        assert!(!prompt.contains("Q2?"));

        s.accept_draft("Once upon a build.".into()).unwrap();
        assert_eq!(s.stage(), Stage::Complete);
        assert_eq!(s.draft_content(), "Once upon a build.");
    }

    #[test]
    fn invalid_stage_changes_nothing() {
        let mut s = PipelineSession::new();
        let err = s.choose_title(0).unwrap_err();
        assert!(matches!(
            err,
            StorySeedError::InvalidTransition { stage: Stage::Idle, .. }
        ));
        assert!(s.prepare_titles().is_err());
        assert_eq!(s.stage(), Stage::Idle);

        let mut s = session_at_answering();
        assert!(s.begin(seed()).is_err());
        assert_eq!(s.stage(), Stage::QuestionAnswering);
        assert_eq!(s.candidate_questions().len(), 5);
    }

    #[test]
    fn empty_results_keep_the_stage() {
        let mut s = PipelineSession::new();
        s.begin(seed()).unwrap();
        s.prepare_titles().unwrap();
        s.accept_titles(Vec::new()).unwrap();
        assert_eq!(s.stage(), Stage::TitleGeneration);
        assert!(s.candidate_titles().is_empty());
    }

    #[test]
    fn regenerating_titles_clears_previous_ones() {
        let mut s = PipelineSession::new();
        s.begin(seed()).unwrap();
        s.prepare_titles().unwrap();
        s.accept_titles(vec!["A".into()]).unwrap();
        s.prepare_titles().unwrap();
        assert!(s.candidate_titles().is_empty());
        assert_eq!(s.stage(), Stage::TitleGeneration);
    }

    #[test]
    fn repeated_questions_are_listed_once() {
        let mut s = PipelineSession::new();
        s.begin(seed()).unwrap();
        s.prepare_titles().unwrap();
        s.accept_titles(vec!["T".into()]).unwrap();
        s.choose_title(0).unwrap();
        s.prepare_questions().unwrap();
        s.accept_questions(vec!["Why?".into(), "How?".into(), "Why?".into()])
            .unwrap();
        assert_eq!(s.candidate_questions(), ["Why?", "How?"]);

        s.set_selected(0, false).unwrap();
        assert!(!s.is_selected(0));
        assert_eq!(s.selected_questions(), vec!["How?"]);
    }

    #[test]
    fn different_questions_clear_answers() {
        let mut s = session_at_answering();
        s.set_answer(0, "kept?").unwrap();
        s.prepare_questions().unwrap();
        assert!(s.answers().is_empty());
        assert!(s.candidate_questions().is_empty());
        assert_eq!(s.stage(), Stage::QuestionGeneration);
    }

    #[test]
    fn submit_requires_a_selection() {
        let mut s = session_at_answering();
        for i in 0..5 {
            s.set_selected(i, false).unwrap();
        }
        let err = s.submit_answers().unwrap_err();
        assert!(matches!(err, StorySeedError::Validation { field: "questions", .. }));
        assert_eq!(s.stage(), Stage::QuestionAnswering);
    }

    #[test]
    fn submit_requires_answers_for_selected_questions() {
        let mut s = session_at_answering();
        for i in 1..5 {
            s.set_selected(i, false).unwrap();
        }
        assert!(s.submit_answers().is_err());
        s.set_answer(0, "   ").unwrap();
        assert!(s.submit_answers().is_err());
        s.set_answer(0, "real").unwrap();
        s.submit_answers().unwrap();
    }

    #[test]
    fn unselected_answers_are_discarded_on_submit() {
        let mut s = session_at_answering();
        for i in 0..5 {
            s.set_answer(i, format!("a{i}")).unwrap();
        }
        s.set_selected(4, false).unwrap();
        s.submit_answers().unwrap();
        assert_eq!(s.answers().len(), 4);
        assert!(!s.answers().contains_key("Q5?"));
    }

    #[test]
    fn answering_an_unselected_question_is_rejected() {
        let mut s = session_at_answering();
        s.set_selected(2, false).unwrap();
        assert!(s.set_answer(2, "nope").is_err());
        assert!(s.set_answer(9, "nope").is_err());
    }

    #[test]
    fn new_article_copies_session_values() {
        let mut s = session_at_answering();
        s.set_selected(0, false).unwrap();
        s.set_selected(1, false).unwrap();
        for i in 2..5 {
            s.set_answer(i, format!("a{i}")).unwrap();
        }
        s.submit_answers().unwrap();
        s.prepare_draft().unwrap();
        s.accept_draft("Body".into()).unwrap();

        let user = UserId::new("u").unwrap();
        let article = s.to_new_article(&user).unwrap();
        assert_eq!(article.title, "T2");
        assert_eq!(article.pillar, Pillar::BuildLog);
        assert_eq!(article.questions, vec!["Q3?", "Q4?", "Q5?"]);
        assert_eq!(article.answers.len(), 3);
        assert_eq!(article.answers["Q4?"], "a3");
        assert_eq!(article.content, "Body");
    }

    #[test]
    fn regenerate_draft_from_complete() {
        let mut s = session_at_answering();
        for i in 0..5 {
            s.set_answer(i, "a").unwrap();
        }
        s.submit_answers().unwrap();
        let first = s.prepare_draft().unwrap();
        s.accept_draft("one".into()).unwrap();
        let second = s.prepare_draft().unwrap();
        assert_eq!(first, second);
        assert_eq!(s.draft_content(), "");
        assert_eq!(s.stage(), Stage::DraftGeneration);
    }
}
