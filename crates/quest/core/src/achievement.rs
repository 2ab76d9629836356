//! Achievements: completion records, written by hand or derived from quests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dimension::Dimension;
use crate::validate::{ValidationError, non_empty};

/// A persisted achievement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub user_id: String,
    /// Originating quest, if any. Not kept in sync when the quest is deleted.
    #[serde(default)]
    pub quest_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub context: String,
    pub date_completed: DateTime<Utc>,
    #[serde(default)]
    pub dimension: Option<Dimension>,
    #[serde(default)]
    pub ai_description: Option<String>,
    #[serde(default)]
    pub ai_reward: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_hidden: bool,
}

impl Achievement {
    /// Build an achievement for `user_id` from a draft, assigning a fresh id.
    ///
    /// Flavor defaults are not filled here; run the draft through
    /// [`crate::fill_achievement_defaults`] first.
    pub fn from_draft(draft: AchievementDraft, user_id: impl Into<String>) -> Self {
        Self {
            id: crate::new_id(),
            user_id: user_id.into(),
            quest_id: draft.quest_id,
            title: draft.title,
            context: draft.context,
            date_completed: draft.date_completed.unwrap_or_else(Utc::now),
            dimension: draft.dimension,
            ai_description: draft.ai_description,
            ai_reward: draft.ai_reward,
            image_url: draft.image_url,
            is_hidden: draft.is_hidden,
        }
    }

    pub fn apply(&mut self, patch: AchievementPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(context) = patch.context {
            self.context = context;
        }
        if let Some(date_completed) = patch.date_completed {
            self.date_completed = date_completed;
        }
        if let Some(dimension) = patch.dimension {
            self.dimension = Some(dimension);
        }
        if let Some(ai_description) = patch.ai_description {
            self.ai_description = Some(ai_description);
        }
        if let Some(ai_reward) = patch.ai_reward {
            self.ai_reward = Some(ai_reward);
        }
        if let Some(image_url) = patch.image_url {
            self.image_url = Some(image_url);
        }
        if let Some(is_hidden) = patch.is_hidden {
            self.is_hidden = is_hidden;
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        non_empty("id", &self.id)?;
        non_empty("title", &self.title)
    }
}

/// Client input for creating an achievement, also produced by the
/// completion pipeline.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AchievementDraft {
    pub title: String,
    pub context: String,
    pub date_completed: Option<DateTime<Utc>>,
    pub dimension: Option<Dimension>,
    pub quest_id: Option<String>,
    pub ai_description: Option<String>,
    pub ai_reward: Option<String>,
    pub image_url: Option<String>,
    pub is_hidden: bool,
}

impl AchievementDraft {
    pub fn new(title: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            context: context.into(),
            ..Self::default()
        }
    }
}

/// Sparse update for an achievement; `None` leaves the field unchanged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AchievementPatch {
    pub title: Option<String>,
    pub context: Option<String>,
    pub date_completed: Option<DateTime<Utc>>,
    pub dimension: Option<Dimension>,
    pub ai_description: Option<String>,
    pub ai_reward: Option<String>,
    pub image_url: Option<String>,
    pub is_hidden: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_draft_keeps_supplied_fields() {
        let mut draft = AchievementDraft::new("First Blood", "Killed a rat in the sewer.");
        draft.dimension = Some(Dimension::Physical);
        draft.ai_reward = Some("A rat tail. Don't eat it.".into());

        let achievement = Achievement::from_draft(draft, "u1");
        assert_eq!(achievement.user_id, "u1");
        assert_eq!(achievement.dimension, Some(Dimension::Physical));
        assert_eq!(achievement.ai_reward.as_deref(), Some("A rat tail. Don't eat it."));
        assert!(achievement.quest_id.is_none());
        assert!(achievement.validate().is_ok());
    }

    #[test]
    fn patch_is_sparse() {
        let mut achievement =
            Achievement::from_draft(AchievementDraft::new("Shiny Rock", "Picked it up."), "u1");
        let before = achievement.clone();

        achievement.apply(AchievementPatch {
            is_hidden: Some(true),
            ..AchievementPatch::default()
        });

        assert!(achievement.is_hidden);
        assert_eq!(achievement.title, before.title);
        assert_eq!(achievement.context, before.context);
        assert_eq!(achievement.date_completed, before.date_completed);
    }

    #[test]
    fn blank_title_is_invalid() {
        let mut achievement =
            Achievement::from_draft(AchievementDraft::new("ok", "ctx"), "u1");
        achievement.apply(AchievementPatch {
            title: Some(String::new()),
            ..AchievementPatch::default()
        });
        assert_eq!(
            achievement.validate(),
            Err(ValidationError::Empty { field: "title" })
        );
    }
}
