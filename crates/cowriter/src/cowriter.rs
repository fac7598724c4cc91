//! The co-writer façade: identity gate, credential gate, and the pipeline
//! steps that need a collaborator.

use pipeline::{
    parse, Article, CompletionError, PipelineSession, Seed, SeedId, SeedStatus, Stage,
    StorySeedError, User, UserId,
};
use tracing::{info, instrument, warn};

use crate::{Collaborators, SetupNotice};

/// Drives one user's authoring session.
///
/// Every operation takes `&mut self`, so a second generation call cannot
/// start while one is outstanding.
#[derive(Debug)]
pub struct CoWriter {
    pub(crate) collaborators: Collaborators,
    pub(crate) user: Option<User>,
    pub(crate) seeds: Vec<Seed>,
    pub(crate) session: PipelineSession,
    // Seed this session moved from captured to developing.
    pub(crate) developing: Option<SeedId>,
}

impl CoWriter {
    pub fn new(collaborators: Collaborators) -> Self {
        Self {
            collaborators,
            user: None,
            seeds: Vec::new(),
            session: PipelineSession::new(),
            developing: None,
        }
    }

    // -- identity -----------------------------------------------------------

    pub fn sign_in(&mut self, user: User) {
        info!(user = %user.id, "signed in");
        self.user = Some(user);
    }

    /// Signs out and clears all in-memory state: the pipeline session and the
    /// cached seed list. Persisted records are not touched.
    pub fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            info!(user = %user.id, "signed out");
        }
        self.seeds.clear();
        self.session.reset();
        self.developing = None;
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub(crate) fn require_user(&self) -> Result<UserId, StorySeedError> {
        self.user
            .as_ref()
            .map(|u| u.id.clone())
            .ok_or(StorySeedError::Unauthenticated)
    }

    // -- setup --------------------------------------------------------------

    /// The setup banner, if any configuration is missing.
    pub fn setup_notice(&self) -> Option<SetupNotice> {
        SetupNotice::check(&self.collaborators)
    }

    fn require_completion(&self) -> Result<(), StorySeedError> {
        if self.collaborators.completion.is_configured() {
            Ok(())
        } else {
            Err(StorySeedError::SetupRequired {
                message: format!(
                    "no API credential configured for {}",
                    self.collaborators.completion.provider()
                ),
            })
        }
    }

    // -- session ------------------------------------------------------------

    pub fn session(&self) -> &PipelineSession {
        &self.session
    }

    pub fn stage(&self) -> Stage {
        self.session.stage()
    }

    /// Idle → TitleGeneration for a seed from the cached list.
    ///
    /// Nothing is persisted here; the seed is marked developing once the
    /// first titles come back.
    #[instrument(skip(self))]
    pub async fn begin(&mut self, seed_id: SeedId) -> Result<(), StorySeedError> {
        self.require_user()?;
        let seed = self
            .seeds
            .iter()
            .find(|s| s.id == seed_id)
            .cloned()
            .ok_or_else(|| StorySeedError::Validation {
                field: "seed",
                reason: format!("seed '{seed_id}' is not in your list"),
            })?;
        self.session.begin(seed)?;
        self.developing = None;
        info!(session = %self.session.id(), seed = %seed_id, "session started");
        Ok(())
    }

    /// Generates candidate titles (also used to regenerate them).
    ///
    /// On failure the session stays in TitleGeneration with no titles.
    #[instrument(skip(self), fields(session = %self.session.id()))]
    pub async fn generate_titles(&mut self) -> Result<&[String], StorySeedError> {
        let user = self.require_user()?;
        self.require_completion()?;
        let prompt = self.session.prepare_titles()?;
        let response = self.complete("titles", &prompt).await?;
        let titles = parse::parse_titles(&response);
        if titles.is_empty() {
            warn!("title response contained no titles");
            return Err(CompletionError::EmptyResponse.into());
        }
        self.session.accept_titles(titles)?;
        info!(count = self.session.candidate_titles().len(), "titles generated");
        self.mark_developing(&user).await;
        Ok(self.session.candidate_titles())
    }

    /// Picks the title at `index` (zero-based).
    pub fn choose_title(&mut self, index: usize) -> Result<(), StorySeedError> {
        self.session.choose_title(index)
    }

    /// Generates development questions (also used for "try different questions").
    ///
    /// On failure the session stays in QuestionGeneration with no questions.
    #[instrument(skip(self), fields(session = %self.session.id()))]
    pub async fn generate_questions(&mut self) -> Result<&[String], StorySeedError> {
        self.require_user()?;
        self.require_completion()?;
        let prompt = self.session.prepare_questions()?;
        let response = self.complete("questions", &prompt).await?;
        let questions = parse::parse_questions(&response);
        if questions.is_empty() {
            warn!("question response contained no questions");
            return Err(CompletionError::EmptyResponse.into());
        }
        self.session.accept_questions(questions)?;
        info!(count = self.session.candidate_questions().len(), "questions generated");
        Ok(self.session.candidate_questions())
    }

    pub fn set_selected(&mut self, index: usize, selected: bool) -> Result<(), StorySeedError> {
        self.session.set_selected(index, selected)
    }

    pub fn answer(&mut self, index: usize, text: impl Into<String>) -> Result<(), StorySeedError> {
        self.session.set_answer(index, text)
    }

    pub fn submit_answers(&mut self) -> Result<(), StorySeedError> {
        self.session.submit_answers()
    }

    /// Generates the draft (also used to regenerate it in place).
    ///
    /// On failure the session stays in DraftGeneration with an empty draft.
    #[instrument(skip(self), fields(session = %self.session.id()))]
    pub async fn generate_draft(&mut self) -> Result<&str, StorySeedError> {
        self.require_user()?;
        self.require_completion()?;
        let prompt = self.session.prepare_draft()?;
        let response = self.complete("draft", &prompt).await?;
        self.session.accept_draft(response)?;
        info!(chars = self.session.draft_content().len(), "draft generated");
        Ok(self.session.draft_content())
    }

    /// Persists the completed session as an article and resets to Idle.
    ///
    /// If the store fails nothing is saved and the session stays Complete.
    #[instrument(skip(self), fields(session = %self.session.id()))]
    pub async fn save_article(&mut self) -> Result<Article, StorySeedError> {
        let user = self.require_user()?;
        let new_article = self.session.to_new_article(&user)?;
        let seed_id = new_article.seed_id;

        let article = self
            .collaborators
            .articles
            .create(new_article)
            .await
            .inspect_err(|err| warn!(error = %err, "failed to save article"))?;
        info!(article = %article.id, "article saved");

        self.update_seed_status(&user, seed_id, SeedStatus::Written).await;
        self.developing = None;
        self.session.reset();
        Ok(article)
    }

    /// Drops the session from any stage.
    ///
    /// A seed this session marked developing goes back to captured.
    #[instrument(skip(self), fields(session = %self.session.id()))]
    pub async fn discard(&mut self) {
        if self.session.stage() != Stage::Idle {
            info!(stage = %self.session.stage(), "session discarded");
        }
        self.session.reset();
        if let (Some(seed_id), Some(user)) = (self.developing.take(), self.user.clone()) {
            self.update_seed_status(&user.id, seed_id, SeedStatus::Captured).await;
        }
    }

    // -- helpers ------------------------------------------------------------

    async fn complete(&self, step: &'static str, prompt: &str) -> Result<String, StorySeedError> {
        let completion = &self.collaborators.completion;
        match completion.complete(prompt).await {
            Ok(text) if text.trim().is_empty() => {
                warn!(step, provider = completion.provider(), "empty completion");
                Err(CompletionError::EmptyResponse.into())
            }
            Ok(text) => Ok(text),
            Err(err) => {
                warn!(step, provider = completion.provider(), error = %err, "completion failed");
                Err(err.into())
            }
        }
    }

    async fn mark_developing(&mut self, user: &UserId) {
        let Some(seed_id) = self.session.seed().map(|s| s.id) else {
            return;
        };
        if self.developing == Some(seed_id) {
            return;
        }
        let captured = self
            .seeds
            .iter()
            .any(|s| s.id == seed_id && s.status == SeedStatus::Captured);
        if captured && self.update_seed_status(user, seed_id, SeedStatus::Developing).await {
            self.developing = Some(seed_id);
        }
    }

    /// Best-effort status change; failures are logged and otherwise ignored.
    async fn update_seed_status(
        &mut self,
        user: &UserId,
        id: SeedId,
        status: SeedStatus,
    ) -> bool {
        match self.collaborators.seeds.set_status(user, id, status).await {
            Ok(updated) => {
                if let Some(cached) = self.seeds.iter_mut().find(|s| s.id == id) {
                    *cached = updated;
                }
                true
            }
            Err(err) => {
                warn!(seed = %id, %status, error = %err, "could not update seed status");
                false
            }
        }
    }
}
