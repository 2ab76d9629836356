//! Achievement flavor text.
//!
//! Both the direct achievement-create path and the quest-completion pipeline
//! fill missing image, description and reward through
//! [`fill_achievement_defaults`], drawing from the same three phrase pools.
//! Selection goes through a [`PhraseSelector`] so callers decide between
//! real randomness and a scripted sequence.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::achievement::AchievementDraft;
use crate::quest::Quest;
use crate::validate::{ValidationError, is_blank};

/// Image assigned to achievements that arrive without one.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://source.unsplash.com/random/300x400?fantasy,card";

/// Victory condition used in the completion context when the quest has none.
pub const DEFAULT_VICTORY_CONDITION: &str = "Survival";

const INTROS: [&str; 3] = [
    "NEW ACHIEVEMENT!",
    "CONGRATULATIONS, CRAWLER!",
    "OH LOOK, YOU DID SOMETHING.",
];

const INSULTS: [&str; 4] = [
    "I suppose that's adequate, for a hairless ape.",
    "Don't let it go to your head. You're still squishy.",
    "My grandmother could do that, and she's a subroutine.",
    "You want a cookie? Too bad.",
];

const REWARDS: [&str; 4] = [
    "A Silver Loot Box (It's empty).",
    "+500 XP and a sense of impending doom.",
    "A pat on the back. Not really.",
    "The realization that this is all meaningless.",
];

/// Picks an index into a non-empty pool.
///
/// Each call is independent; implementations must return a value in
/// `0..len`.
pub trait PhraseSelector: Send {
    fn select(&mut self, len: usize) -> usize;
}

/// Uniform selection backed by an RNG.
pub struct RandomSelector<R = StdRng> {
    rng: R,
}

impl RandomSelector<StdRng> {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible selection, for tests and seeded demo data.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> RandomSelector<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng + Send> PhraseSelector for RandomSelector<R> {
    fn select(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Replays a fixed list of picks, wrapping around, each reduced modulo the
/// pool length.
#[derive(Clone, Debug)]
pub struct SequenceSelector {
    picks: Vec<usize>,
    cursor: usize,
}

impl SequenceSelector {
    pub fn new(picks: impl Into<Vec<usize>>) -> Self {
        Self {
            picks: picks.into(),
            cursor: 0,
        }
    }
}

impl PhraseSelector for SequenceSelector {
    fn select(&mut self, len: usize) -> usize {
        if self.picks.is_empty() {
            return 0;
        }
        let pick = self.picks[self.cursor % self.picks.len()];
        self.cursor += 1;
        pick % len
    }
}

/// The three phrase pools. Never empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhrasePools {
    intros: Vec<String>,
    insults: Vec<String>,
    rewards: Vec<String>,
}

impl PhrasePools {
    pub fn new(
        intros: Vec<String>,
        insults: Vec<String>,
        rewards: Vec<String>,
    ) -> Result<Self, ValidationError> {
        for (pool, phrases) in [
            ("intro", &intros),
            ("insult", &insults),
            ("reward", &rewards),
        ] {
            if phrases.is_empty() {
                return Err(ValidationError::EmptyPool { pool });
            }
        }
        Ok(Self {
            intros,
            insults,
            rewards,
        })
    }

    /// The dungeon-crawler announcer voice.
    pub fn announcer() -> Self {
        let owned = |pool: &[&str]| pool.iter().map(|s| s.to_string()).collect();
        Self {
            intros: owned(&INTROS),
            insults: owned(&INSULTS),
            rewards: owned(&REWARDS),
        }
    }

    pub fn intros(&self) -> &[String] {
        &self.intros
    }

    pub fn insults(&self) -> &[String] {
        &self.insults
    }

    pub fn rewards(&self) -> &[String] {
        &self.rewards
    }
}

impl Default for PhrasePools {
    fn default() -> Self {
        Self::announcer()
    }
}

fn choose<'a>(pool: &'a [String], selector: &mut dyn PhraseSelector) -> &'a str {
    let index = selector.select(pool.len()).min(pool.len() - 1);
    &pool[index]
}

/// Fill the image, description and reward of a draft when they are missing.
///
/// Description draws an intro then an insult; reward draws afterwards. Fields
/// the caller supplied are kept verbatim and consume no draws.
pub fn fill_achievement_defaults(
    pools: &PhrasePools,
    selector: &mut dyn PhraseSelector,
    mut draft: AchievementDraft,
) -> AchievementDraft {
    if is_blank(&draft.image_url) {
        draft.image_url = Some(PLACEHOLDER_IMAGE_URL.to_string());
    }

    if is_blank(&draft.ai_description) {
        let intro = choose(&pools.intros, selector);
        let insult = choose(&pools.insults, selector);
        draft.ai_description = Some(format!(
            "{intro} You have managed to {}. {insult}",
            draft.context
        ));
    }

    if is_blank(&draft.ai_reward) {
        draft.ai_reward = Some(choose(&pools.rewards, selector).to_string());
    }

    draft
}

/// The achievement draft synthesized when `quest` becomes completed.
pub fn completion_draft(quest: &Quest, completed_at: DateTime<Utc>) -> AchievementDraft {
    let victory = quest
        .victory_condition
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(DEFAULT_VICTORY_CONDITION);

    AchievementDraft {
        title: format!("Quest Complete: {}", quest.title),
        context: format!(
            "Completed the quest '{}'. Victory Condition: {victory}",
            quest.title
        ),
        date_completed: Some(completed_at),
        dimension: quest.dimension,
        quest_id: Some(quest.id.clone()),
        ..AchievementDraft::default()
    }
}
