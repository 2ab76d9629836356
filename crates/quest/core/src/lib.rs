//! Domain model and pure rules for the quest tracker.
//!
//! `quest-core` defines the canonical entities (users, quests, achievements),
//! the sparse-patch semantics used by every update, and the deterministic
//! pieces of the completion pipeline. Nothing here touches storage; the
//! `quest-store` crate persists these types and the server exposes them.
//!
//! Modules are organized by responsibility:
//! - [`user`], [`quest`], [`achievement`] hold the entities and their patches
//! - [`dimension`] is the shared life-area taxonomy
//! - [`flavor`] fills achievement defaults from fixed phrase pools
//! - [`profile`] derives levels and per-dimension stats
//! - [`validate`] carries the structural validation error
pub mod achievement;
pub mod dimension;
pub mod flavor;
pub mod profile;
pub mod quest;
pub mod user;
pub mod validate;

pub use achievement::{Achievement, AchievementDraft, AchievementPatch};
pub use dimension::Dimension;
pub use flavor::{
    PLACEHOLDER_IMAGE_URL, PhrasePools, PhraseSelector, RandomSelector, SequenceSelector,
    completion_draft, fill_achievement_defaults,
};
pub use profile::{Profile, ProfileStats, PublicProfile, dimension_stats};
pub use quest::{Quest, QuestDraft, QuestPatch, QuestStatus};
pub use user::{DimensionStat, User, UserPatch, UserView};
pub use validate::ValidationError;

/// Generate a fresh entity identifier.
///
/// Identifiers are assigned by the domain layer before insertion; the store
/// never invents them.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
