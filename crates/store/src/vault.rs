//! Owner-checked façade used by request handlers.
//!
//! Every call that names a specific record also names the caller, and the
//! ownership check runs inside the same critical section as the mutation.
//! A record owned by someone else is reported exactly like a missing one.

use std::sync::Arc;

use quest_core::{
    Achievement, AchievementDraft, Profile, PublicProfile, Quest, QuestDraft, User,
};

use crate::completion::{CompletionPipeline, refresh_stats};
use crate::document::EntityKind;
use crate::error::{Result, StoreError};
use crate::record::{Commit, RecordStore};
use crate::repository::{Entity, Repository, Visible, patch_at, validated};

/// What [`QuestVault::reset_for_owner`] removed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResetSummary {
    pub quests_removed: usize,
    pub achievements_removed: usize,
}

pub struct QuestVault {
    store: Arc<RecordStore>,
    completion: Arc<CompletionPipeline>,
}

impl QuestVault {
    pub fn new(store: Arc<RecordStore>, completion: CompletionPipeline) -> Self {
        Self {
            store,
            completion: Arc::new(completion),
        }
    }

    pub fn store(&self) -> &Arc<RecordStore> {
        &self.store
    }

    /// Bare repository for `E`, wired to the completion pipeline.
    pub fn repository<E: Entity>(&self) -> Repository<E> {
        Repository::new(Arc::clone(&self.store)).with_completion(Arc::clone(&self.completion))
    }

    pub fn list_entities<E: Entity>(&self, owner: Option<&str>) -> Result<Vec<E>> {
        self.repository::<E>().list(owner)
    }

    /// Fetch one record by id, provided `owner` owns it.
    pub fn get_owned<E: Entity>(&self, id: &str, owner: &str) -> Result<E> {
        self.store
            .read(|doc| {
                E::collection(doc)
                    .iter()
                    .find(|e| e.id() == id && e.owner_id() == owner)
                    .cloned()
            })?
            .ok_or_else(|| StoreError::not_found(E::KIND, id))
    }

    pub fn insert_entity<E: Entity>(&self, entity: E) -> Result<E> {
        self.repository::<E>().insert(entity)
    }

    /// Sparse-update a record owned by `owner`.
    ///
    /// Quest updates that complete the quest also append the derived
    /// achievement, in the same save.
    pub fn update_entity<E: Entity>(&self, id: &str, patch: E::Patch, owner: &str) -> Result<E> {
        self.store.transact(|doc| {
            let index = E::collection(doc)
                .iter()
                .position(|e| e.id() == id && e.owner_id() == owner)
                .ok_or_else(|| StoreError::not_found(E::KIND, id))?;

            let updated = patch_at::<E>(doc, index, patch, Some(self.completion.as_ref()))?;
            tracing::debug!("User {} updated {} {}", owner, E::KIND, id);
            Ok(Commit::Write(updated))
        })
    }

    /// Delete a record owned by `owner`. Returns `false` when it does not
    /// exist or belongs to someone else.
    pub fn delete_entity<E: Entity>(&self, id: &str, owner: &str) -> Result<bool> {
        self.store.transact(|doc| {
            let items = E::collection_mut(doc);
            let Some(index) = items
                .iter()
                .position(|e| e.id() == id && e.owner_id() == owner)
            else {
                return Ok(Commit::Skip(false));
            };

            items.remove(index);
            tracing::debug!("User {} deleted {} {}", owner, E::KIND, id);
            Ok(Commit::Write(true))
        })
    }

    /// Set `is_hidden` on every record of kind `E` owned by `owner`, in one
    /// save. Returns how many records matched.
    pub fn bulk_set_visibility<E: Visible>(&self, owner: &str, hidden: bool) -> Result<usize> {
        self.store.transact(|doc| {
            let mut matched = 0;
            for entity in E::collection_mut(doc)
                .iter_mut()
                .filter(|e| e.owner_id() == owner)
            {
                entity.set_hidden(hidden);
                matched += 1;
            }

            tracing::debug!(
                "User {} set hidden={} on {} {}(s)",
                owner,
                hidden,
                matched,
                E::KIND
            );
            Ok(Commit::Write(matched))
        })
    }

    /// Remove every quest and achievement owned by `owner`. User records and
    /// other owners' data are untouched.
    pub fn reset_for_owner(&self, owner: &str) -> Result<ResetSummary> {
        self.store.transact(|doc| {
            let quests_before = doc.quests.len();
            let achievements_before = doc.achievements.len();
            doc.quests.retain(|q| q.user_id != owner);
            doc.achievements.retain(|a| a.user_id != owner);

            let summary = ResetSummary {
                quests_removed: quests_before - doc.quests.len(),
                achievements_removed: achievements_before - doc.achievements.len(),
            };
            tracing::info!(
                "Reset data for user {}: {} quests, {} achievements removed",
                owner,
                summary.quests_removed,
                summary.achievements_removed
            );
            Ok(Commit::Write(summary))
        })
    }

    /// Wipe the whole store.
    pub fn clear_all(&self) -> Result<()> {
        self.store.clear_all()
    }

    // ===== domain operations =====

    pub fn create_quest(&self, owner: &str, draft: QuestDraft) -> Result<Quest> {
        self.insert_entity(Quest::from_draft(draft, owner))
    }

    /// Create an achievement by hand; missing flavor fields are filled the
    /// same way as for completed quests.
    pub fn create_achievement(&self, owner: &str, draft: AchievementDraft) -> Result<Achievement> {
        let draft = self.completion.fill_defaults(draft)?;
        self.insert_entity(Achievement::from_draft(draft, owner))
    }

    /// Add a user, rejecting a taken username atomically.
    pub fn register_user(&self, user: User) -> Result<User> {
        validated(&user)?;
        self.store.transact(|doc| {
            if doc.users.iter().any(|u| u.username == user.username) {
                return Err(StoreError::UsernameTaken(user.username.clone()));
            }
            doc.users.push(user.clone());
            tracing::info!("Registered user {} ({})", user.username, user.id);
            Ok(Commit::Write(user))
        })
    }

    pub fn find_user(&self, username: &str) -> Result<Option<User>> {
        self.repository::<User>().find(username)
    }

    /// Recompute and persist the user's dimension stats.
    pub fn recalculate_stats(&self, username: &str) -> Result<User> {
        self.store.transact(|doc| {
            let user_id = doc
                .users
                .iter()
                .find(|u| u.username == username)
                .map(|u| u.id.clone())
                .ok_or_else(|| StoreError::not_found(EntityKind::User, username))?;

            refresh_stats(doc, &user_id);
            let user = doc
                .users
                .iter()
                .find(|u| u.id == user_id)
                .cloned()
                .ok_or_else(|| StoreError::not_found(EntityKind::User, username))?;
            Ok(Commit::Write(user))
        })
    }

    pub fn profile(&self, user: &User) -> Result<Profile> {
        self.store.read(|doc| {
            let quests: Vec<Quest> = doc
                .quests
                .iter()
                .filter(|q| q.user_id == user.id)
                .cloned()
                .collect();
            let achievements: Vec<Achievement> = doc
                .achievements
                .iter()
                .filter(|a| a.user_id == user.id)
                .cloned()
                .collect();
            Profile::summarize(&user.username, &quests, &achievements)
        })
    }

    pub fn public_profile(&self, username: &str) -> Result<PublicProfile> {
        self.store
            .read(|doc| {
                let user = doc.users.iter().find(|u| u.username == username)?;
                let quests = doc
                    .quests
                    .iter()
                    .filter(|q| q.user_id == user.id)
                    .cloned()
                    .collect();
                let achievements = doc
                    .achievements
                    .iter()
                    .filter(|a| a.user_id == user.id)
                    .cloned()
                    .collect();
                Some(PublicProfile::build(&user.username, quests, achievements))
            })?
            .ok_or_else(|| StoreError::not_found(EntityKind::User, username))
    }

    /// Any user's achievement, unless it is hidden.
    pub fn public_achievement(&self, id: &str) -> Result<Achievement> {
        self.store
            .read(|doc| {
                doc.achievements
                    .iter()
                    .find(|a| a.id == id && !a.is_hidden)
                    .cloned()
            })?
            .ok_or_else(|| StoreError::not_found(EntityKind::Achievement, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quest_core::{AchievementPatch, QuestPatch, QuestStatus, SequenceSelector};

    fn vault() -> QuestVault {
        QuestVault::new(
            Arc::new(RecordStore::in_memory()),
            CompletionPipeline::new(Default::default(), SequenceSelector::new([0])),
        )
    }

    #[test]
    fn foreign_records_look_missing() {
        let vault = vault();
        let quest = vault.create_quest("u1", QuestDraft::new("mine")).unwrap();

        assert!(vault.get_owned::<Quest>(&quest.id, "u2").unwrap_err().is_not_found());
        assert!(
            vault
                .update_entity::<Quest>(&quest.id, QuestPatch::default(), "u2")
                .unwrap_err()
                .is_not_found()
        );
        assert!(!vault.delete_entity::<Quest>(&quest.id, "u2").unwrap());
        assert_eq!(vault.get_owned::<Quest>(&quest.id, "u1").unwrap(), quest);
    }

    #[test]
    fn achievement_patch_goes_through_owner_check() {
        let vault = vault();
        let achievement = vault
            .create_achievement("u1", AchievementDraft::new("Found a Shiny Rock", "pick up a rock"))
            .unwrap();

        let updated = vault
            .update_entity::<Achievement>(
                &achievement.id,
                AchievementPatch {
                    title: Some("Found a Very Shiny Rock".into()),
                    ..AchievementPatch::default()
                },
                "u1",
            )
            .unwrap();

        assert_eq!(updated.title, "Found a Very Shiny Rock");
        assert_eq!(updated.ai_description, achievement.ai_description);
    }

    #[test]
    fn duplicate_username_rejected() {
        let vault = vault();
        vault.register_user(User::new("noob", None, "h")).unwrap();

        let err = vault.register_user(User::new("noob", None, "h2")).unwrap_err();
        assert!(matches!(err, StoreError::UsernameTaken(name) if name == "noob"));
        // Case-sensitive.
        vault.register_user(User::new("Noob", None, "h")).unwrap();
        assert_eq!(vault.list_entities::<User>(None).unwrap().len(), 2);
    }

    #[test]
    fn public_achievement_hides_hidden() {
        let vault = vault();
        let mut draft = AchievementDraft::new("Secret", "ctx");
        draft.is_hidden = true;
        let hidden = vault.create_achievement("u1", draft).unwrap();
        let open = vault
            .create_achievement("u1", AchievementDraft::new("Open", "ctx"))
            .unwrap();

        assert!(vault.public_achievement(&hidden.id).unwrap_err().is_not_found());
        assert_eq!(vault.public_achievement(&open.id).unwrap(), open);
    }

    #[test]
    fn profile_counts_only_own_records() {
        let vault = vault();
        let user = vault.register_user(User::new("veteran", None, "h")).unwrap();
        let mut draft = QuestDraft::new("Defeat the Goblin King");
        draft.status = Some(QuestStatus::Active);
        vault.create_quest(&user.id, draft).unwrap();
        vault.create_quest("someone-else", QuestDraft::new("other")).unwrap();

        let profile = vault.profile(&user).unwrap();
        assert_eq!(profile.stats.quests_active, 1);
        assert_eq!(profile.level, 1);

        assert!(vault.public_profile("ghost").unwrap_err().is_not_found());
    }
}
