//! Quest completion side effects.
//!
//! When a quest update moves `status` from anything else to `completed`, the
//! pipeline appends a synthesized achievement and refreshes the owner's
//! dimension stats. It runs inside the caller's critical section, so the
//! quest write, the achievement, and the stats land in one save.

use std::sync::Mutex;

use chrono::Utc;
use quest_core::{
    Achievement, AchievementDraft, PhrasePools, PhraseSelector, Quest, RandomSelector,
    completion_draft, dimension_stats, fill_achievement_defaults,
};

use crate::document::Document;
use crate::error::{Result, StoreError};
use crate::repository::validated;

/// True when `after` is completed and `before` was not.
pub fn is_completion_edge(before: &Quest, after: &Quest) -> bool {
    !before.status.is_completed() && after.status.is_completed()
}

/// Fills achievement defaults and derives completion achievements.
pub struct CompletionPipeline {
    pools: PhrasePools,
    selector: Mutex<Box<dyn PhraseSelector>>,
}

impl CompletionPipeline {
    pub fn new(pools: PhrasePools, selector: impl PhraseSelector + 'static) -> Self {
        Self {
            pools,
            selector: Mutex::new(Box::new(selector)),
        }
    }

    /// Announcer pools with entropy-seeded selection.
    pub fn random() -> Self {
        Self::new(PhrasePools::announcer(), RandomSelector::from_entropy())
    }

    pub fn pools(&self) -> &PhrasePools {
        &self.pools
    }

    /// Fill image, description and reward on a draft where missing.
    pub fn fill_defaults(&self, draft: AchievementDraft) -> Result<AchievementDraft> {
        let mut selector = self.selector.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(fill_achievement_defaults(&self.pools, &mut **selector, draft))
    }

    /// Append the achievement for a just-completed `quest` to `document` and
    /// refresh its owner's stats.
    pub fn complete(&self, document: &mut Document, quest: &Quest) -> Result<Achievement> {
        let draft = self.fill_defaults(completion_draft(quest, Utc::now()))?;
        let achievement = Achievement::from_draft(draft, quest.user_id.clone());
        validated(&achievement)?;

        document.achievements.push(achievement.clone());
        refresh_stats(document, &quest.user_id);

        tracing::info!(
            "Quest {} completed; derived achievement {}",
            quest.id,
            achievement.id
        );

        Ok(achievement)
    }
}

/// Recompute the dimension stats of user `user_id` from its quests.
///
/// Returns `false` when no such user exists; quests may outlive their owner's
/// record in hand-edited documents.
pub(crate) fn refresh_stats(document: &mut Document, user_id: &str) -> bool {
    let owned: Vec<Quest> = document
        .quests
        .iter()
        .filter(|q| q.user_id == user_id)
        .cloned()
        .collect();

    match document.users.iter_mut().find(|u| u.id == user_id) {
        Some(user) => {
            user.dimension_stats = dimension_stats(&owned);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quest_core::{Dimension, QuestDraft, QuestStatus, SequenceSelector, User};

    fn pipeline() -> CompletionPipeline {
        CompletionPipeline::new(PhrasePools::announcer(), SequenceSelector::new([2, 0, 1]))
    }

    #[test]
    fn edge_detection() {
        let active = {
            let mut draft = QuestDraft::new("q");
            draft.status = Some(QuestStatus::Active);
            Quest::from_draft(draft, "u1")
        };
        let mut completed = active.clone();
        completed.status = QuestStatus::Completed;

        assert!(is_completion_edge(&active, &completed));
        assert!(!is_completion_edge(&completed, &completed));
        assert!(!is_completion_edge(&completed, &active));
        assert!(!is_completion_edge(&active, &active));
    }

    #[test]
    fn complete_appends_achievement_and_refreshes_stats() {
        let user = User::new("veteran", None, "hash");
        let mut draft = QuestDraft::new("Learn Ancient Runes");
        draft.status = Some(QuestStatus::Completed);
        draft.dimension = Some(Dimension::Intellectual);
        draft.xp_reward = Some(120);
        let quest = Quest::from_draft(draft, user.id.clone());

        let mut document = Document {
            users: vec![user],
            quests: vec![quest.clone()],
            achievements: vec![],
        };

        let achievement = pipeline().complete(&mut document, &quest).unwrap();

        assert_eq!(document.achievements, vec![achievement.clone()]);
        assert_eq!(achievement.quest_id.as_deref(), Some(quest.id.as_str()));
        assert_eq!(achievement.dimension, Some(Dimension::Intellectual));
        assert_eq!(
            achievement.ai_description.as_deref(),
            Some(
                "OH LOOK, YOU DID SOMETHING. You have managed to Completed the quest 'Learn Ancient Runes'. Victory Condition: Survival. I suppose that's adequate, for a hairless ape."
            )
        );
        assert_eq!(
            achievement.ai_reward.as_deref(),
            Some("+500 XP and a sense of impending doom.")
        );

        let stats = &document.users[0].dimension_stats;
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].xp, 120);
        assert_eq!(stats[0].level, 2);
    }
}
