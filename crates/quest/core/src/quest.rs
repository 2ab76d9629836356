//! Quests: the user's tasks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dimension::Dimension;
use crate::validate::{ValidationError, in_range, non_empty};

/// Lifecycle of a quest.
///
/// `Completed` is terminal in the normal flows, but nothing locks a completed
/// quest against further edits.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum QuestStatus {
    #[default]
    Backlog,
    Active,
    Completed,
}

impl QuestStatus {
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// A persisted quest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    pub id: String,
    /// Owning user. Used for filtering only; the user record does not list
    /// its quests.
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub dimension: Option<Dimension>,
    #[serde(default)]
    pub status: QuestStatus,
    #[serde(default = "Quest::default_difficulty")]
    pub difficulty: u8,
    #[serde(default = "Quest::default_xp_reward")]
    pub xp_reward: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub victory_condition: Option<String>,
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub is_hidden: bool,
    /// Records written without a timestamp read back as the Unix epoch.
    #[serde(default)]
    pub created_at: DateTime<Utc>,
}

impl Quest {
    pub const MIN_DIFFICULTY: u8 = 1;
    pub const MAX_DIFFICULTY: u8 = 5;
    pub const MAX_PROGRESS: u8 = 100;
    pub const DEFAULT_XP_REWARD: u32 = 10;
    pub const MAX_XP_REWARD: u32 = 100_000;

    fn default_difficulty() -> u8 {
        Self::MIN_DIFFICULTY
    }

    fn default_xp_reward() -> u32 {
        Self::DEFAULT_XP_REWARD
    }

    /// Build a quest for `user_id` from client input, assigning a fresh id.
    pub fn from_draft(draft: QuestDraft, user_id: impl Into<String>) -> Self {
        Self {
            id: crate::new_id(),
            user_id: user_id.into(),
            title: draft.title,
            description: draft.description,
            dimension: draft.dimension,
            status: draft.status.unwrap_or_default(),
            difficulty: draft.difficulty.unwrap_or(Self::MIN_DIFFICULTY),
            xp_reward: draft.xp_reward.unwrap_or(Self::DEFAULT_XP_REWARD),
            tags: draft.tags,
            victory_condition: draft.victory_condition,
            progress: draft.progress.unwrap_or(0),
            is_hidden: draft.is_hidden,
            created_at: Utc::now(),
        }
    }

    /// Merge the fields present in `patch`; absent fields are left alone.
    pub fn apply(&mut self, patch: QuestPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(dimension) = patch.dimension {
            self.dimension = Some(dimension);
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(difficulty) = patch.difficulty {
            self.difficulty = difficulty;
        }
        if let Some(xp_reward) = patch.xp_reward {
            self.xp_reward = xp_reward;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(victory_condition) = patch.victory_condition {
            self.victory_condition = Some(victory_condition);
        }
        if let Some(progress) = patch.progress {
            self.progress = progress;
        }
        if let Some(is_hidden) = patch.is_hidden {
            self.is_hidden = is_hidden;
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        non_empty("id", &self.id)?;
        non_empty("title", &self.title)?;
        in_range(
            "difficulty",
            self.difficulty.into(),
            Self::MIN_DIFFICULTY.into(),
            Self::MAX_DIFFICULTY.into(),
        )?;
        in_range("progress", self.progress.into(), 0, Self::MAX_PROGRESS.into())?;
        in_range("xp_reward", self.xp_reward.into(), 0, Self::MAX_XP_REWARD.into())?;
        Ok(())
    }
}

/// Client input for creating a quest.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestDraft {
    pub title: String,
    pub description: Option<String>,
    pub dimension: Option<Dimension>,
    pub status: Option<QuestStatus>,
    pub difficulty: Option<u8>,
    pub xp_reward: Option<u32>,
    pub tags: Vec<String>,
    pub victory_condition: Option<String>,
    pub progress: Option<u8>,
    pub is_hidden: bool,
}

impl QuestDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Sparse update for a quest.
///
/// `None` (missing or `null` on the wire) means "leave unchanged"; a field can
/// therefore never be cleared through a patch.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub dimension: Option<Dimension>,
    pub status: Option<QuestStatus>,
    pub difficulty: Option<u8>,
    pub xp_reward: Option<u32>,
    pub tags: Option<Vec<String>>,
    pub victory_condition: Option<String>,
    pub progress: Option<u8>,
    pub is_hidden: Option<bool>,
}

impl QuestPatch {
    pub fn status(status: QuestStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goblin_quest() -> Quest {
        let mut draft = QuestDraft::new("Defeat the Goblin King");
        draft.status = Some(QuestStatus::Active);
        draft.dimension = Some(Dimension::Physical);
        draft.tags = vec!["dungeon".into(), "combat".into()];
        draft.victory_condition = Some("Kill the boss in the throne room".into());
        Quest::from_draft(draft, "u1")
    }

    #[test]
    fn draft_defaults() {
        let quest = Quest::from_draft(QuestDraft::new("Wander"), "u1");
        assert_eq!(quest.status, QuestStatus::Backlog);
        assert_eq!(quest.difficulty, 1);
        assert_eq!(quest.xp_reward, 10);
        assert_eq!(quest.progress, 0);
        assert!(!quest.id.is_empty());
    }

    #[test]
    fn patch_leaves_absent_fields_untouched() {
        let mut quest = goblin_quest();
        let before = quest.clone();

        quest.apply(QuestPatch {
            progress: Some(40),
            ..QuestPatch::default()
        });

        assert_eq!(quest.progress, 40);
        assert_eq!(quest.title, before.title);
        assert_eq!(quest.tags, before.tags);
        assert_eq!(quest.victory_condition, before.victory_condition);
        assert_eq!(quest.dimension, before.dimension);
    }

    #[test]
    fn null_in_patch_is_skipped() {
        let mut quest = goblin_quest();
        let patch: QuestPatch =
            serde_json::from_str(r#"{"victory_condition": null, "title": "King Slain"}"#).unwrap();
        quest.apply(patch);

        assert_eq!(quest.title, "King Slain");
        assert_eq!(
            quest.victory_condition.as_deref(),
            Some("Kill the boss in the throne room")
        );
    }

    #[test]
    fn validation_rejects_out_of_range() {
        let mut quest = goblin_quest();
        quest.progress = 101;
        assert!(matches!(
            quest.validate(),
            Err(ValidationError::OutOfRange { field: "progress", .. })
        ));

        let mut quest = goblin_quest();
        quest.difficulty = 0;
        assert!(quest.validate().is_err());

        let mut quest = goblin_quest();
        quest.title = "   ".into();
        assert_eq!(quest.validate(), Err(ValidationError::Empty { field: "title" }));

        let mut quest = goblin_quest();
        quest.xp_reward = u32::MAX;
        assert!(matches!(
            quest.validate(),
            Err(ValidationError::OutOfRange { field: "xp_reward", .. })
        ));
        quest.xp_reward = Quest::MAX_XP_REWARD;
        assert!(quest.validate().is_ok());
    }

    #[test]
    fn unknown_status_fails_to_parse() {
        let result = serde_json::from_str::<QuestPatch>(r#"{"status": "abandoned"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn legacy_record_fills_defaults() {
        let quest: Quest =
            serde_json::from_str(r#"{"id": "q1", "user_id": "u1", "title": "Old"}"#).unwrap();
        assert_eq!(quest.status, QuestStatus::Backlog);
        assert_eq!(quest.difficulty, 1);
        assert!(quest.tags.is_empty());

        // Reading the same bytes twice yields the same record.
        let again: Quest =
            serde_json::from_str(r#"{"id": "q1", "user_id": "u1", "title": "Old"}"#).unwrap();
        assert_eq!(again.created_at, quest.created_at);
        assert_eq!(quest.created_at, DateTime::<Utc>::default());
    }
}
