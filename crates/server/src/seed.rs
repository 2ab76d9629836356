//! Demo data: a fresh account and a seasoned one with quests and trophies.
//!
//! Seeding is idempotent. Users are created only when missing, and the
//! veteran's quests and achievements only when that user has none yet.

use anyhow::Result;
use chrono::{Duration, Utc};
use quest_core::{
    Achievement, AchievementDraft, Dimension, Quest, QuestDraft, QuestStatus, User,
};
use quest_store::QuestVault;

use crate::auth::hash_password;

pub const DEMO_PASSWORD: &str = "password";

/// What a [`seed`] run added.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub users: usize,
    pub quests: usize,
    pub achievements: usize,
}

pub fn seed(vault: &QuestVault) -> Result<SeedReport> {
    let mut report = SeedReport::default();

    ensure_user(vault, "noob", "Fresh Meat", &mut report)?;
    let veteran = ensure_user(vault, "veteran", "Princess Donut", &mut report)?;

    if vault.list_entities::<Quest>(Some(&veteran.id))?.is_empty() {
        for draft in veteran_quests() {
            vault.create_quest(&veteran.id, draft)?;
            report.quests += 1;
        }
    } else {
        tracing::info!("Quests for veteran already exist");
    }

    if vault.list_entities::<Achievement>(Some(&veteran.id))?.is_empty() {
        let lost_cat = vault
            .list_entities::<Quest>(Some(&veteran.id))?
            .into_iter()
            .find(|q| q.title == "Find the Lost Cat")
            .map(|q| q.id);

        for draft in veteran_achievements(lost_cat) {
            vault.create_achievement(&veteran.id, draft)?;
            report.achievements += 1;
        }
    } else {
        tracing::info!("Achievements for veteran already exist");
    }

    vault.recalculate_stats(&veteran.username)?;
    tracing::info!(
        "Seeding complete: {} users, {} quests, {} achievements added",
        report.users,
        report.quests,
        report.achievements
    );
    Ok(report)
}

fn ensure_user(
    vault: &QuestVault,
    username: &str,
    display_name: &str,
    report: &mut SeedReport,
) -> Result<User> {
    if let Some(user) = vault.find_user(username)? {
        tracing::info!("User {} already exists", username);
        return Ok(user);
    }

    let hashed = hash_password(DEMO_PASSWORD)?;
    let user = vault.register_user(User::new(username, Some(display_name.into()), hashed))?;
    report.users += 1;
    Ok(user)
}

fn quest(
    title: &str,
    dimension: Option<Dimension>,
    status: QuestStatus,
    tags: &[&str],
    victory_condition: &str,
) -> QuestDraft {
    QuestDraft {
        dimension,
        status: Some(status),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        victory_condition: Some(victory_condition.into()),
        ..QuestDraft::new(title)
    }
}

fn veteran_quests() -> Vec<QuestDraft> {
    vec![
        quest(
            "Defeat the Goblin King",
            Some(Dimension::Physical),
            QuestStatus::Active,
            &["dungeon", "combat"],
            "Kill the boss in the throne room",
        ),
        quest(
            "Learn Ancient Runes",
            Some(Dimension::Intellectual),
            QuestStatus::Active,
            &["magic", "study"],
            "Read the tablet without a translator",
        ),
        QuestDraft {
            progress: Some(100),
            ..quest(
                "Find the Lost Cat",
                Some(Dimension::Emotional),
                QuestStatus::Completed,
                &["side-quest"],
                "Return Mittens to the owner",
            )
        },
        quest(
            "Conquer the World",
            Some(Dimension::Vocational),
            QuestStatus::Backlog,
            &["long-term"],
            "Become Supreme Ruler",
        ),
        quest(
            "Wander Aimlessly",
            None,
            QuestStatus::Active,
            &["exploration"],
            "Walk until you get tired",
        ),
    ]
}

fn trophy(
    title: &str,
    context: &str,
    days_ago: i64,
    dimension: Option<Dimension>,
    description: &str,
    reward: &str,
) -> AchievementDraft {
    AchievementDraft {
        date_completed: Some(Utc::now() - Duration::days(days_ago)),
        dimension,
        ai_description: Some(description.into()),
        ai_reward: Some(reward.into()),
        ..AchievementDraft::new(title, context)
    }
}

fn veteran_achievements(lost_cat: Option<String>) -> Vec<AchievementDraft> {
    let mut drafts = vec![
        trophy(
            "Hero of the Village",
            "Saved the village from a rat infestation.",
            5,
            Some(Dimension::Social),
            "You killed some rats. The villagers are mildly impressed.",
            "+10 Reputation",
        ),
        trophy(
            "Found a Shiny Rock",
            "I picked up a rock. It was shiny.",
            0,
            None,
            "You picked up a rock. Fascinating.",
            "A rock.",
        ),
    ];

    if let Some(quest_id) = lost_cat {
        drafts.push(AchievementDraft {
            quest_id: Some(quest_id),
            ..trophy(
                "Quest Complete: Find the Lost Cat",
                "Returned Mittens to the owner. The owner was a witch.",
                2,
                Some(Dimension::Emotional),
                "NEW ACHIEVEMENT! You saved a cat. How original. I'm sure the witch won't turn you into a toad later.",
                "+50 Karma points (useless).",
            )
        });
    }

    drafts.extend([
        trophy(
            "First Blood",
            "Killed a rat in the sewer.",
            5,
            Some(Dimension::Physical),
            "CONGRATULATIONS, CRAWLER! You murdered a rodent. You are truly a force to be reckoned with.",
            "A rat tail. Don't eat it.",
        ),
        trophy(
            "Shiny Object Syndrome",
            "Collected 100 useless shiny rocks.",
            1,
            Some(Dimension::Financial),
            "OH LOOK, YOU DID SOMETHING. You filled your inventory with garbage. Typical.",
            "Back pain.",
        ),
    ]);
    drafts
}
