//! Profile summaries and per-dimension progression.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::achievement::Achievement;
use crate::dimension::Dimension;
use crate::quest::{Quest, QuestStatus};
use crate::user::DimensionStat;

/// Achievements needed per overall profile level.
pub const ACHIEVEMENTS_PER_LEVEL: usize = 5;
/// Experience needed per dimension level.
pub const XP_PER_LEVEL: u32 = 100;
/// Number of achievements listed as "recent".
pub const RECENT_ACHIEVEMENTS: usize = 5;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileStats {
    pub quests_active: usize,
    pub quests_completed: usize,
    pub achievements_unlocked: usize,
}

/// A user's own profile summary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub username: String,
    pub level: usize,
    pub stats: ProfileStats,
    pub recent_achievements: Vec<Achievement>,
}

impl Profile {
    /// Summarize the given quests and achievements, in insertion order.
    pub fn summarize(username: &str, quests: &[Quest], achievements: &[Achievement]) -> Self {
        let count = |status: QuestStatus| quests.iter().filter(|q| q.status == status).count();
        let recent_start = achievements.len().saturating_sub(RECENT_ACHIEVEMENTS);

        Self {
            username: username.to_string(),
            level: 1 + achievements.len() / ACHIEVEMENTS_PER_LEVEL,
            stats: ProfileStats {
                quests_active: count(QuestStatus::Active),
                quests_completed: count(QuestStatus::Completed),
                achievements_unlocked: achievements.len(),
            },
            recent_achievements: achievements[recent_start..].to_vec(),
        }
    }
}

/// What anyone can see about a user: hidden records are left out of both the
/// figures and the lists.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PublicProfile {
    #[serde(flatten)]
    pub summary: Profile,
    pub quests: Vec<Quest>,
    pub achievements: Vec<Achievement>,
}

impl PublicProfile {
    pub fn build(username: &str, quests: Vec<Quest>, achievements: Vec<Achievement>) -> Self {
        let quests: Vec<Quest> = quests.into_iter().filter(|q| !q.is_hidden).collect();
        let achievements: Vec<Achievement> =
            achievements.into_iter().filter(|a| !a.is_hidden).collect();

        Self {
            summary: Profile::summarize(username, &quests, &achievements),
            quests,
            achievements,
        }
    }
}

/// Recompute dimension stats from a user's quests.
///
/// Each completed quest with a dimension contributes its `xp_reward`. Only
/// dimensions with at least one completed quest appear, in declaration order.
/// Totals saturate at `u32::MAX`.
pub fn dimension_stats(quests: &[Quest]) -> Vec<DimensionStat> {
    let mut xp: BTreeMap<Dimension, u32> = BTreeMap::new();
    for quest in quests.iter().filter(|q| q.status.is_completed()) {
        if let Some(dimension) = quest.dimension {
            let total = xp.entry(dimension).or_default();
            *total = total.saturating_add(quest.xp_reward);
        }
    }

    xp.into_iter()
        .map(|(dimension, xp)| DimensionStat {
            dimension,
            xp,
            level: 1 + xp / XP_PER_LEVEL,
        })
        .collect()
}
