use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix marking a choice that counts towards a successful outcome.
pub const GOOD_PREFIX: &str = "good";
/// Prefix marking a choice that does not count towards success.
pub const BAD_PREFIX: &str = "bad";

// ---------------------------------------------------------------------------
// Choice identifiers
// ---------------------------------------------------------------------------

/// Whether a choice is the safe/informed option or the risky one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Good,
    Bad,
}

/// Identifier of a choice, e.g. `good-shelter` or `bad-ignore`.
///
/// The leading `good`/`bad` token is the only part that carries meaning.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChoiceId(String);

impl ChoiceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Polarity encoded in the id prefix, if any.
    pub fn polarity(&self) -> Option<Polarity> {
        if self.0.starts_with(GOOD_PREFIX) {
            Some(Polarity::Good)
        } else if self.0.starts_with(BAD_PREFIX) {
            Some(Polarity::Bad)
        } else {
            None
        }
    }

    /// True for ids of the form `good-<x>` / `bad-<x>`.
    fn is_well_formed(&self) -> bool {
        [GOOD_PREFIX, BAD_PREFIX].iter().any(|prefix| {
            self.0
                .strip_prefix(prefix)
                .and_then(|rest| rest.strip_prefix('-'))
                .is_some_and(|suffix| !suffix.is_empty())
        })
    }
}

impl fmt::Display for ChoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChoiceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl PartialEq<str> for ChoiceId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ChoiceId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

// ---------------------------------------------------------------------------
// Story graph
// ---------------------------------------------------------------------------

/// One option a player may pick within a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "AuthoredChoice")]
pub struct Choice {
    pub id: ChoiceId,
    /// Derived from the id prefix when the choice is built.
    pub polarity: Option<Polarity>,
    /// The decision as presented to the player.
    pub text: String,
    /// Optional educational aside shown under the choice.
    pub hint: Option<String>,
    /// Scene to advance to. `None` ends the story (last scene only).
    pub next_scene_index: Option<usize>,
}

/// A choice as written in a story file. Polarity is never authored; it
/// always comes from the id.
#[derive(Deserialize)]
struct AuthoredChoice {
    id: String,
    text: String,
    #[serde(default)]
    hint: Option<String>,
    #[serde(default)]
    next_scene_index: Option<usize>,
}

impl From<AuthoredChoice> for Choice {
    fn from(raw: AuthoredChoice) -> Self {
        let choice = Choice::new(raw.id, raw.text, raw.next_scene_index);
        match raw.hint {
            Some(hint) => choice.with_hint(hint),
            None => choice,
        }
    }
}

impl Choice {
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        next_scene_index: Option<usize>,
    ) -> Self {
        let id = ChoiceId::new(id);
        Self {
            polarity: id.polarity(),
            id,
            text: text.into(),
            hint: None,
            next_scene_index,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn is_terminal(&self) -> bool {
        self.next_scene_index.is_none()
    }
}

/// One narrative beat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub title: String,
    pub description: String,
    /// Opaque reference handed to whatever renders the scene.
    pub image_ref: Option<String>,
    pub educational_info: Option<String>,
    pub choices: Vec<Choice>,
}

impl Scene {
    pub fn choice(&self, id: &str) -> Option<&Choice> {
        self.choices.iter().find(|c| c.id == id)
    }
}

/// A character's complete adventure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub character_name: String,
    pub title: String,
    /// Index 0 is the entry point.
    pub scenes: Vec<Scene>,
    /// Takeaways shown on completion regardless of the branch taken.
    pub learnings: Vec<String>,
}

/// A broken story graph. These are authoring mistakes, not runtime
/// conditions a player can trigger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoryError {
    #[error("story has no scenes")]
    NoScenes,

    #[error("scene {scene} has no choices")]
    NoChoices { scene: usize },

    #[error("scene {scene} offers choice '{choice_id}' more than once")]
    DuplicateChoice { scene: usize, choice_id: String },

    #[error("choice '{choice_id}' in scene {scene} does not start with 'good-' or 'bad-'")]
    MalformedChoiceId { scene: usize, choice_id: String },

    #[error("choice '{choice_id}' in scene {scene} has a polarity that disagrees with its id")]
    PolarityMismatch { scene: usize, choice_id: String },

    #[error("choice '{choice_id}' in scene {scene} is a dead end before the last scene")]
    DeadEnd { scene: usize, choice_id: String },

    #[error("choice '{choice_id}' in scene {scene} points at missing scene {target}")]
    TargetOutOfRange {
        scene: usize,
        choice_id: String,
        target: usize,
    },

    #[error("choice '{choice_id}' in the last scene ({scene}) points at scene {target}")]
    TerminalHasTarget {
        scene: usize,
        choice_id: String,
        target: usize,
    },
}

impl Story {
    pub fn scene(&self, index: usize) -> Option<&Scene> {
        self.scenes.get(index)
    }

    pub fn last_scene_index(&self) -> usize {
        self.scenes.len().saturating_sub(1)
    }

    /// Check the graph invariants:
    /// - at least one scene, every scene has at least one choice
    /// - choice ids are `good-*`/`bad-*` and unique within their scene
    /// - every choice before the last scene points at an existing scene
    /// - every choice in the last scene is terminal
    pub fn validate(&self) -> Result<(), StoryError> {
        if self.scenes.is_empty() {
            return Err(StoryError::NoScenes);
        }

        let last = self.last_scene_index();
        for (index, scene) in self.scenes.iter().enumerate() {
            if scene.choices.is_empty() {
                return Err(StoryError::NoChoices { scene: index });
            }

            let mut seen = HashSet::new();
            for choice in &scene.choices {
                let choice_id = choice.id.to_string();

                if !seen.insert(choice.id.as_str()) {
                    return Err(StoryError::DuplicateChoice {
                        scene: index,
                        choice_id,
                    });
                }
                if !choice.id.is_well_formed() {
                    return Err(StoryError::MalformedChoiceId {
                        scene: index,
                        choice_id,
                    });
                }
                if choice.polarity != choice.id.polarity() {
                    return Err(StoryError::PolarityMismatch {
                        scene: index,
                        choice_id,
                    });
                }

                match (index == last, choice.next_scene_index) {
                    (false, None) => {
                        return Err(StoryError::DeadEnd {
                            scene: index,
                            choice_id,
                        })
                    }
                    (false, Some(target)) if target >= self.scenes.len() => {
                        return Err(StoryError::TargetOutOfRange {
                            scene: index,
                            choice_id,
                            target,
                        })
                    }
                    (true, Some(target)) => {
                        return Err(StoryError::TerminalHasTarget {
                            scene: index,
                            choice_id,
                            target,
                        })
                    }
                    _ => {}
                }
            }
        }

        Ok(())
    }
}
