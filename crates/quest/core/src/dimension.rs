//! Life-area taxonomy shared by quests, achievements and user stats.

use serde::{Deserialize, Serialize};

/// Life area a quest or achievement contributes to.
///
/// Declaration order is the canonical ordering used when stats are listed.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Dimension {
    Physical,
    Intellectual,
    Financial,
    Vocational,
    Social,
    Emotional,
    Environmental,
    Spiritual,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!(Dimension::from_str("Physical").unwrap(), Dimension::Physical);
        assert_eq!(Dimension::from_str("SPIRITUAL").unwrap(), Dimension::Spiritual);
        assert!(Dimension::from_str("astral").is_err());
    }

    #[test]
    fn wire_format_is_snake_case() {
        let json = serde_json::to_string(&Dimension::Environmental).unwrap();
        assert_eq!(json, "\"environmental\"");
        assert_eq!(Dimension::iter().count(), 8);
    }
}
