use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::i18n::Translator;

/// The characters that have an authored adventure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CharacterId {
    Astronaut,
    Pilot,
    Farmer,
    Engineer,
    Photographer,
    SolarStorm,
}

impl CharacterId {
    /// Display order on the character selection screen.
    pub const ALL: [CharacterId; 6] = [
        CharacterId::Astronaut,
        CharacterId::Pilot,
        CharacterId::Farmer,
        CharacterId::Engineer,
        CharacterId::Photographer,
        CharacterId::SolarStorm,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CharacterId::Astronaut => "astronaut",
            CharacterId::Pilot => "pilot",
            CharacterId::Farmer => "farmer",
            CharacterId::Engineer => "engineer",
            CharacterId::Photographer => "photographer",
            CharacterId::SolarStorm => "solar-storm",
        }
    }

    fn portrait(self) -> &'static str {
        match self {
            CharacterId::Astronaut => "/friendly-astronaut-character-in-white-space-suit-w.jpg",
            CharacterId::Pilot => "/airplane-pilot-character-in-cockpit-with-headset-a.jpg",
            CharacterId::Farmer => "/friendly-farmer-character-in-field-with-hat-and-ov.jpg",
            CharacterId::Engineer => "/electrical-engineer-character-with-hard-hat-and-to.jpg",
            CharacterId::Photographer => "/photographer-character-with-camera-and-tripod-unde.jpg",
            CharacterId::SolarStorm => "/glowing-solar-storm-energy-burst-with-bright-orang.jpg",
        }
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CharacterId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CharacterId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or(())
    }
}

/// What the selection screen shows for one character.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacterProfile {
    pub id: CharacterId,
    pub name: String,
    pub description: String,
    pub challenge: String,
    pub image_ref: String,
    pub facts: Vec<String>,
}

impl CharacterProfile {
    pub fn build(id: CharacterId, t: &dyn Translator) -> Self {
        let key = |field: &str| t.translate(&format!("characters.{id}.{field}"));
        Self {
            id,
            name: key("name"),
            description: key("description"),
            challenge: key("challenge"),
            image_ref: id.portrait().to_string(),
            facts: (1..=3).map(|n| key(&format!("fact{n}"))).collect(),
        }
    }
}

/// Every character in display order, strings bound through `t`.
pub fn characters(t: &dyn Translator) -> Vec<CharacterProfile> {
    CharacterId::ALL
        .into_iter()
        .map(|id| CharacterProfile::build(id, t))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::KeyEcho;

    #[test]
    fn test_ids_round_trip_through_str() {
        for id in CharacterId::ALL {
            assert_eq!(id.as_str().parse::<CharacterId>(), Ok(id));
        }
        assert_eq!("unicorn-rider".parse::<CharacterId>(), Err(()));
        assert_eq!("Astronaut".parse::<CharacterId>(), Err(()));
    }

    #[test]
    fn test_roster_has_six_characters_in_order() {
        let roster = characters(&KeyEcho);
        let ids: Vec<&str> = roster.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(
            ids,
            ["astronaut", "pilot", "farmer", "engineer", "photographer", "solar-storm"]
        );
    }

    #[test]
    fn test_profile_uses_translation_keys() {
        let profile = CharacterProfile::build(CharacterId::SolarStorm, &KeyEcho);
        assert_eq!(profile.name, "characters.solar-storm.name");
        assert_eq!(profile.challenge, "characters.solar-storm.challenge");
        assert_eq!(
            profile.facts,
            [
                "characters.solar-storm.fact1",
                "characters.solar-storm.fact2",
                "characters.solar-storm.fact3"
            ]
        );
        assert!(profile.image_ref.ends_with(".jpg"));
    }

    #[test]
    fn test_serde_uses_kebab_case() {
        let json = serde_json::to_string(&CharacterId::SolarStorm).unwrap();
        assert_eq!(json, "\"solar-storm\"");
    }
}
