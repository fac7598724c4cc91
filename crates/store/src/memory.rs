//! In-memory seed and article repositories.
//!
//! Used as the local side of the fallback: records live for the lifetime of
//! the process only. The seed repository can pre-populate each user's list
//! with the demo dataset on first access.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use pipeline::{
    newest_first, Article, ArticleId, ArticleRepository, NewArticle, NewSeed, Seed, SeedId,
    SeedRepository, SeedStatus, StoreError, Timestamp, UserId,
};

use crate::demo::demo_seeds;

/// Seeds held in process memory, keyed by user.
#[derive(Debug, Default)]
pub struct MemorySeedRepository {
    seeds: Mutex<HashMap<UserId, Vec<Seed>>>,
    with_demo: bool,
}

impl MemorySeedRepository {
    /// An empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// A repository that shows the demo seeds to every user on first access.
    pub fn with_demo_data() -> Self {
        Self {
            seeds: Mutex::default(),
            with_demo: true,
        }
    }

    fn with_user<T>(&self, user: &UserId, f: impl FnOnce(&mut Vec<Seed>) -> T) -> T {
        let mut guard = self.seeds.lock().unwrap_or_else(|e| e.into_inner());
        let list = guard.entry(user.clone()).or_insert_with(|| {
            if self.with_demo {
                demo_seeds(user)
            } else {
                Vec::new()
            }
        });
        f(list)
    }
}

#[async_trait]
impl SeedRepository for MemorySeedRepository {
    async fn list_by_user(&self, user: &UserId) -> Result<Vec<Seed>, StoreError> {
        Ok(self.with_user(user, |list| {
            let mut out = list.clone();
            newest_first(&mut out, |s| s.created_at);
            out
        }))
    }

    async fn create(&self, seed: NewSeed) -> Result<Seed, StoreError> {
        let user = seed.user_id.clone();
        Ok(self.with_user(&user, |list| {
            let stored = seed.into_seed(SeedId::new_random(), Timestamp::now());
            list.push(stored.clone());
            stored
        }))
    }

    async fn set_status(
        &self,
        user: &UserId,
        id: SeedId,
        status: SeedStatus,
    ) -> Result<Seed, StoreError> {
        self.with_user(user, |list| {
            let seed = list
                .iter_mut()
                .find(|s| s.id == id)
                .ok_or_else(|| StoreError::NotFound {
                    kind: "seed",
                    id: id.to_string(),
                })?;
            seed.status = status;
            Ok(seed.clone())
        })
    }
}

/// Articles held in process memory, keyed by user. Starts empty.
#[derive(Debug, Default)]
pub struct MemoryArticleRepository {
    articles: Mutex<HashMap<UserId, Vec<Article>>>,
}

impl MemoryArticleRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ArticleRepository for MemoryArticleRepository {
    async fn list_by_user(&self, user: &UserId) -> Result<Vec<Article>, StoreError> {
        let guard = self.articles.lock().unwrap_or_else(|e| e.into_inner());
        let mut out = guard.get(user).cloned().unwrap_or_default();
        newest_first(&mut out, |a| a.created_at);
        Ok(out)
    }

    async fn create(&self, article: NewArticle) -> Result<Article, StoreError> {
        let stored = article.into_article(ArticleId::new_random(), Timestamp::now());
        let mut guard = self.articles.lock().unwrap_or_else(|e| e.into_inner());
        guard
            .entry(stored.user_id.clone())
            .or_default()
            .push(stored.clone());
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use pipeline::Pillar;
    use pretty_assertions::assert_eq;

    use super::*;

    fn user(name: &str) -> UserId {
        UserId::new(name).unwrap()
    }

    #[tokio::test]
    async fn demo_data_is_per_user_and_fixed() {
        let repo = MemorySeedRepository::with_demo_data();
        let seeds = repo.list_by_user(&user("a")).await.unwrap();
        assert_eq!(seeds.len(), 2);
        assert!(seeds.iter().all(|s| s.user_id == user("a")));

        let again = repo.list_by_user(&user("a")).await.unwrap();
        let ids: Vec<_> = seeds.iter().map(|s| s.id).collect();
        let ids_again: Vec<_> = again.iter().map(|s| s.id).collect();
        assert_eq!(ids, ids_again);
    }

    #[tokio::test]
    async fn created_seeds_list_first() {
        let repo = MemorySeedRepository::with_demo_data();
        repo.list_by_user(&user("a")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let created = repo
            .create(NewSeed::new(user("a"), "New", "Body", Pillar::MetaSkill).unwrap())
            .await
            .unwrap();
        let seeds = repo.list_by_user(&user("a")).await.unwrap();
        assert_eq!(seeds.len(), 3);
        assert_eq!(seeds[0].id, created.id);
    }

    #[tokio::test]
    async fn set_status_updates_and_reports_missing() {
        let repo = MemorySeedRepository::new();
        let created = repo
            .create(NewSeed::new(user("a"), "t", "c", Pillar::FieldNote).unwrap())
            .await
            .unwrap();
        let updated = repo
            .set_status(&user("a"), created.id, SeedStatus::Written)
            .await
            .unwrap();
        assert_eq!(updated.status, SeedStatus::Written);

        let err = repo
            .set_status(&user("b"), created.id, SeedStatus::Written)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { kind: "seed", .. }));
    }

    #[tokio::test]
    async fn articles_are_scoped_by_user() {
        let repo = MemoryArticleRepository::new();
        assert!(repo.list_by_user(&user("a")).await.unwrap().is_empty());
    }
}
