//! Typed, owner-agnostic operations over the document's collections.
//!
//! [`Repository`] never checks who is asking. Callers either pass an owner
//! filter themselves or go through [`crate::QuestVault`], which folds the
//! ownership check into the same critical section as the mutation.

use std::marker::PhantomData;
use std::sync::Arc;

use quest_core::{
    Achievement, AchievementPatch, Quest, QuestPatch, User, UserPatch, ValidationError,
};

use crate::completion::{CompletionPipeline, is_completion_edge};
use crate::document::{Document, EntityKind};
use crate::error::{Result, StoreError};
use crate::record::{Commit, RecordStore};

/// A record type stored in one of the document's collections.
pub trait Entity: Clone + Send + 'static {
    const KIND: EntityKind;

    /// Sparse update applied by [`Repository::update_by_key`].
    type Patch;

    fn id(&self) -> &str;

    /// Lookup key for [`Repository::update_by_key`] and [`Repository::find`].
    fn key(&self) -> &str {
        self.id()
    }

    /// The user this record belongs to.
    fn owner_id(&self) -> &str;

    fn collection(document: &Document) -> &Vec<Self>;

    fn collection_mut(document: &mut Document) -> &mut Vec<Self>;

    fn apply(&mut self, patch: Self::Patch);

    fn validate(&self) -> std::result::Result<(), ValidationError>;

    /// The quest to run through the completion pipeline, if this update
    /// completed one.
    fn completed_quest<'a>(_before: &Self, _after: &'a Self) -> Option<&'a Quest> {
        None
    }
}

/// Entities with a public-visibility flag.
pub trait Visible: Entity {
    fn is_hidden(&self) -> bool;

    fn set_hidden(&mut self, hidden: bool);
}

impl Entity for User {
    const KIND: EntityKind = EntityKind::User;
    type Patch = UserPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn key(&self) -> &str {
        &self.username
    }

    fn owner_id(&self) -> &str {
        &self.id
    }

    fn collection(document: &Document) -> &Vec<Self> {
        &document.users
    }

    fn collection_mut(document: &mut Document) -> &mut Vec<Self> {
        &mut document.users
    }

    fn apply(&mut self, patch: UserPatch) {
        User::apply(self, patch);
    }

    fn validate(&self) -> std::result::Result<(), ValidationError> {
        User::validate(self)
    }
}

impl Entity for Quest {
    const KIND: EntityKind = EntityKind::Quest;
    type Patch = QuestPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn owner_id(&self) -> &str {
        &self.user_id
    }

    fn collection(document: &Document) -> &Vec<Self> {
        &document.quests
    }

    fn collection_mut(document: &mut Document) -> &mut Vec<Self> {
        &mut document.quests
    }

    fn apply(&mut self, patch: QuestPatch) {
        Quest::apply(self, patch);
    }

    fn validate(&self) -> std::result::Result<(), ValidationError> {
        Quest::validate(self)
    }

    fn completed_quest<'a>(before: &Self, after: &'a Self) -> Option<&'a Quest> {
        is_completion_edge(before, after).then_some(after)
    }
}

impl Visible for Quest {
    fn is_hidden(&self) -> bool {
        self.is_hidden
    }

    fn set_hidden(&mut self, hidden: bool) {
        self.is_hidden = hidden;
    }
}

impl Entity for Achievement {
    const KIND: EntityKind = EntityKind::Achievement;
    type Patch = AchievementPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn owner_id(&self) -> &str {
        &self.user_id
    }

    fn collection(document: &Document) -> &Vec<Self> {
        &document.achievements
    }

    fn collection_mut(document: &mut Document) -> &mut Vec<Self> {
        &mut document.achievements
    }

    fn apply(&mut self, patch: AchievementPatch) {
        Achievement::apply(self, patch);
    }

    fn validate(&self) -> std::result::Result<(), ValidationError> {
        Achievement::validate(self)
    }
}

impl Visible for Achievement {
    fn is_hidden(&self) -> bool {
        self.is_hidden
    }

    fn set_hidden(&mut self, hidden: bool) {
        self.is_hidden = hidden;
    }
}

pub(crate) fn validated<E: Entity>(entity: &E) -> Result<()> {
    entity
        .validate()
        .map_err(|source| StoreError::ValidationFailed {
            kind: E::KIND,
            source,
        })
}

pub(crate) fn owned_by<E: Entity>(entity: &E, owner: Option<&str>) -> bool {
    owner.is_none_or(|owner| entity.owner_id() == owner)
}

/// Merge `patch` into the entity at `index`, re-validate, and run the
/// completion pipeline when the update completed a quest.
///
/// On error the document is left as it was.
pub(crate) fn patch_at<E: Entity>(
    document: &mut Document,
    index: usize,
    patch: E::Patch,
    completion: Option<&CompletionPipeline>,
) -> Result<E> {
    let before = E::collection(document)[index].clone();
    let mut after = before.clone();
    after.apply(patch);
    validated(&after)?;

    E::collection_mut(document)[index] = after.clone();

    if let (Some(pipeline), Some(quest)) = (completion, E::completed_quest(&before, &after)) {
        pipeline.complete(document, quest)?;
    }

    Ok(after)
}

/// Owner-agnostic access to one collection.
pub struct Repository<E> {
    store: Arc<RecordStore>,
    completion: Option<Arc<CompletionPipeline>>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for Repository<E> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            completion: self.completion.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> Repository<E> {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self {
            store,
            completion: None,
            _entity: PhantomData,
        }
    }

    /// Run updates through `pipeline` so completed quests yield achievements.
    pub fn with_completion(mut self, pipeline: Arc<CompletionPipeline>) -> Self {
        self.completion = Some(pipeline);
        self
    }

    /// All entities in insertion order, optionally only those owned by
    /// `owner`.
    pub fn list(&self, owner: Option<&str>) -> Result<Vec<E>> {
        self.store.read(|doc| {
            E::collection(doc)
                .iter()
                .filter(|e| owned_by(*e, owner))
                .cloned()
                .collect()
        })
    }

    pub fn find(&self, key: &str) -> Result<Option<E>> {
        self.store
            .read(|doc| E::collection(doc).iter().find(|e| e.key() == key).cloned())
    }

    /// Append `entity`. Identifiers are the caller's job.
    pub fn insert(&self, entity: E) -> Result<E> {
        validated(&entity)?;
        self.store.transact(|doc| {
            E::collection_mut(doc).push(entity.clone());
            tracing::debug!("Inserted {} {}", E::KIND, entity.id());
            Ok(Commit::Write(entity))
        })
    }

    /// Apply a sparse patch to the entity identified by `key`.
    pub fn update_by_key(&self, key: &str, patch: E::Patch) -> Result<E> {
        let completion = self.completion.as_deref();
        self.store.transact(|doc| {
            let index = E::collection(doc)
                .iter()
                .position(|e| e.key() == key)
                .ok_or_else(|| StoreError::not_found(E::KIND, key))?;

            let updated = patch_at::<E>(doc, index, patch, completion)?;
            tracing::debug!("Updated {} {}", E::KIND, key);
            Ok(Commit::Write(updated))
        })
    }

    /// Remove the entity with `id`. Storage is only rewritten when something
    /// was removed.
    pub fn delete_by_id(&self, id: &str) -> Result<bool> {
        self.store.transact(|doc| {
            let items = E::collection_mut(doc);
            let before = items.len();
            items.retain(|e| e.id() != id);

            if items.len() < before {
                tracing::debug!("Deleted {} {}", E::KIND, id);
                Ok(Commit::Write(true))
            } else {
                Ok(Commit::Skip(false))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quest_core::{QuestDraft, QuestStatus, SequenceSelector};

    fn quest(id: &str, owner: &str, title: &str) -> Quest {
        let mut quest = Quest::from_draft(QuestDraft::new(title), owner);
        quest.id = id.to_string();
        quest
    }

    fn quests() -> Repository<Quest> {
        Repository::new(Arc::new(RecordStore::in_memory()))
    }

    #[test]
    fn list_filters_by_owner_in_insertion_order() {
        let repo = quests();
        repo.insert(quest("q1", "u1", "one")).unwrap();
        repo.insert(quest("q2", "u2", "two")).unwrap();
        repo.insert(quest("q3", "u1", "three")).unwrap();

        let ids: Vec<_> = repo
            .list(Some("u1"))
            .unwrap()
            .into_iter()
            .map(|q| q.id)
            .collect();
        assert_eq!(ids, ["q1", "q3"]);
        assert_eq!(repo.list(None).unwrap().len(), 3);
    }

    #[test]
    fn update_missing_is_not_found() {
        let repo = quests();
        let err = repo.update_by_key("nope", QuestPatch::default()).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn invalid_patch_is_rejected_and_not_persisted() {
        let repo = quests();
        repo.insert(quest("q1", "u1", "one")).unwrap();

        let err = repo
            .update_by_key(
                "q1",
                QuestPatch {
                    progress: Some(150),
                    title: Some("renamed".into()),
                    ..QuestPatch::default()
                },
            )
            .unwrap_err();

        assert!(matches!(
            err,
            StoreError::ValidationFailed {
                kind: EntityKind::Quest,
                ..
            }
        ));
        let stored = repo.find("q1").unwrap().unwrap();
        assert_eq!(stored.title, "one");
        assert_eq!(stored.progress, 0);
    }

    #[test]
    fn users_are_keyed_by_username() {
        let repo: Repository<User> = Repository::new(Arc::new(RecordStore::in_memory()));
        let user = repo
            .insert(User::new("veteran", None, "hash"))
            .unwrap();

        let updated = repo
            .update_by_key(
                "veteran",
                UserPatch {
                    display_name: Some("Princess Donut".into()),
                    ..UserPatch::default()
                },
            )
            .unwrap();

        assert_eq!(updated.id, user.id);
        assert_eq!(updated.display_name.as_deref(), Some("Princess Donut"));
        assert!(repo.update_by_key(&user.id, UserPatch::default()).is_err());
    }

    #[test]
    fn delete_reports_whether_anything_was_removed() {
        let repo = quests();
        repo.insert(quest("q1", "u1", "one")).unwrap();

        assert!(repo.delete_by_id("q1").unwrap());
        assert!(!repo.delete_by_id("q1").unwrap());
        assert!(repo.list(None).unwrap().is_empty());
    }

    #[test]
    fn bare_repository_without_pipeline_derives_nothing() {
        let store = Arc::new(RecordStore::in_memory());
        let repo: Repository<Quest> = Repository::new(Arc::clone(&store));
        repo.insert(quest("q1", "u1", "one")).unwrap();

        repo.update_by_key("q1", QuestPatch::status(QuestStatus::Completed))
            .unwrap();
        assert!(store.load().unwrap().achievements.is_empty());

        let with_pipeline = repo.with_completion(Arc::new(CompletionPipeline::new(
            Default::default(),
            SequenceSelector::new([0]),
        )));
        with_pipeline
            .update_by_key("q1", QuestPatch::status(QuestStatus::Active))
            .unwrap();
        with_pipeline
            .update_by_key("q1", QuestPatch::status(QuestStatus::Completed))
            .unwrap();
        assert_eq!(store.load().unwrap().achievements.len(), 1);
    }
}
