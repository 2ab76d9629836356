//! The single persisted aggregate.

use quest_core::{Achievement, Quest, User};
use serde::{Deserialize, Serialize};

/// Entity collections held by a [`Document`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum EntityKind {
    User,
    Quest,
    Achievement,
}

impl EntityKind {
    /// Capitalized name for user-facing messages.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Quest => "Quest",
            Self::Achievement => "Achievement",
        }
    }
}

/// Everything the store persists: three order-preserving collections.
///
/// A missing collection key deserializes as empty; [`Document::parse`]
/// reports which keys were missing so the backend can heal the file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub quests: Vec<Quest>,
    #[serde(default)]
    pub achievements: Vec<Achievement>,
}

impl Document {
    /// Top-level keys every persisted document carries.
    pub const COLLECTIONS: [&'static str; 3] = ["users", "quests", "achievements"];

    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.quests.is_empty() && self.achievements.is_empty()
    }

    /// Parse persisted bytes, returning the document and the collection keys
    /// that were absent.
    pub fn parse(bytes: &[u8]) -> Result<(Self, Vec<&'static str>), String> {
        let raw: serde_json::Value = serde_json::from_slice(bytes).map_err(|e| e.to_string())?;
        let object = raw
            .as_object()
            .ok_or_else(|| "top-level value is not an object".to_string())?;

        let missing = Self::COLLECTIONS
            .into_iter()
            .filter(|key| !object.contains_key(*key))
            .collect();

        let document = serde_json::from_value(raw).map_err(|e| e.to_string())?;
        Ok((document, missing))
    }

    /// Serialize with four-space indentation.
    pub fn to_pretty_bytes(&self) -> serde_json::Result<Vec<u8>> {
        let mut bytes = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut bytes, formatter);
        self.serialize(&mut serializer)?;
        Ok(bytes)
    }
}
