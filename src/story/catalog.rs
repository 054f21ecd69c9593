use log::{debug, warn};
use thiserror::Error;

use crate::i18n::Translator;
use crate::story::character::CharacterId;
use crate::story::model::{Choice, Scene, Story};

const LEARNINGS_PER_STORY: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("no story for character '{0}'")]
    NotFound(String),
}

// ---------------------------------------------------------------------------
// Authored outlines
// ---------------------------------------------------------------------------

/// The untranslated skeleton of one scene: its image and the ids of its
/// choices. Text comes from `story.<character>.sceneN.*` keys.
struct SceneOutline {
    image: &'static str,
    choice_ids: &'static [&'static str],
}

/// All six adventures share one shape: two decision scenes that each lead
/// to the next scene, then a closing scene whose choices end the story.
fn outline(id: CharacterId) -> [SceneOutline; 3] {
    match id {
        CharacterId::Astronaut => [
            SceneOutline {
                image: "/international-space-station-with-bright-solar-flar.jpg",
                choice_ids: &["good-shelter", "bad-ignore"],
            },
            SceneOutline {
                image: "/astronaut-checking-computer-systems-inside-space-s.jpg",
                choice_ids: &["good-manual", "bad-panic"],
            },
            SceneOutline {
                image: "/stunning-green-and-purple-aurora-borealis-viewed-f.jpg",
                choice_ids: &["good-document", "good-report"],
            },
        ],
        CharacterId::Pilot => [
            SceneOutline {
                image: "/airplane-cockpit-with-gps-error-warnings-on-displa.jpg",
                choice_ids: &["good-backup", "bad-trust"],
            },
            SceneOutline {
                image: "/pilot-using-radio-headset-in-cockpit-with-static-i.jpg",
                choice_ids: &["good-altitude", "bad-continue"],
            },
            SceneOutline {
                image: "/airplane-landing-at-sunset-with-aurora-borealis-in.jpg",
                choice_ids: &["good-report", "good-inform"],
            },
        ],
        CharacterId::Farmer => [
            SceneOutline {
                image: "/farmer-on-modern-gps-tractor-in-golden-wheat-field.jpg",
                choice_ids: &["good-manual", "bad-continue"],
            },
            SceneOutline {
                image: "/farmer-checking-weather-app-on-smartphone-in-farm-.jpg",
                choice_ids: &["good-observe", "bad-guess"],
            },
            SceneOutline {
                image: "/friendly-farmer-character-in-field-with-hat-and-ov.jpg",
                choice_ids: &["good-backup", "good-share"],
            },
        ],
        CharacterId::Engineer => [
            SceneOutline {
                image: "/electrical-engineer-character-with-hard-hat-and-to.jpg",
                choice_ids: &["good-reduce", "bad-wait"],
            },
            SceneOutline {
                image: "/engineer-character-with-tools.jpg",
                choice_ids: &["good-shutdown", "bad-risk"],
            },
            SceneOutline {
                image: "/space-station-interior-with-red-warning-lights-and.jpg",
                choice_ids: &["good-document", "good-upgrade"],
            },
        ],
        CharacterId::Photographer => [
            SceneOutline {
                image: "/photographer-character-with-camera.jpg",
                choice_ids: &["good-research", "bad-random"],
            },
            SceneOutline {
                image: "/photographer-character-with-camera-and-tripod-unde.jpg",
                choice_ids: &["good-settings", "bad-auto"],
            },
            SceneOutline {
                image: "/beautiful-green-and-pink-aurora-borealis-dancing-o.jpg",
                choice_ids: &["good-share", "good-educate"],
            },
        ],
        CharacterId::SolarStorm => [
            SceneOutline {
                image: "/massive-solar-flare-erupting-from-sun-surface-with.jpg",
                choice_ids: &["good-fast", "good-slow"],
            },
            SceneOutline {
                image: "/coronal-mass-ejection-erupting-from-sun-toward-ear.jpg",
                choice_ids: &["good-interact", "good-disrupt"],
            },
            SceneOutline {
                image: "/glowing-solar-storm-energy-burst-with-bright-orang.jpg",
                choice_ids: &["good-inspire", "good-protect"],
            },
        ],
    }
}

// ---------------------------------------------------------------------------
// Story building
// ---------------------------------------------------------------------------

fn build_story(id: CharacterId, t: &dyn Translator) -> Story {
    let scenes = outline(id);
    let last = scenes.len() - 1;

    let scenes = scenes
        .iter()
        .enumerate()
        .map(|(index, scene)| {
            let prefix = format!("story.{id}.scene{}", index + 1);
            let next = (index < last).then_some(index + 1);

            let choices = scene
                .choice_ids
                .iter()
                .enumerate()
                .map(|(n, choice_id)| {
                    let key = format!("{prefix}.choice{}", n + 1);
                    Choice::new(*choice_id, t.translate(&format!("{key}.text")), next)
                        .with_hint(t.translate(&format!("{key}.hint")))
                })
                .collect();

            Scene {
                title: t.translate(&format!("{prefix}.title")),
                description: t.translate(&format!("{prefix}.description")),
                image_ref: Some(scene.image.to_string()),
                educational_info: Some(t.translate(&format!("{prefix}.educationalInfo"))),
                choices,
            }
        })
        .collect();

    Story {
        character_name: t.translate(&format!("characters.{id}.name")),
        title: t.translate(&format!("story.{id}.title")),
        scenes,
        learnings: (1..=LEARNINGS_PER_STORY)
            .map(|n| t.translate(&format!("story.{id}.learning{n}")))
            .collect(),
    }
}

/// Build the story for `character_id` with every display string bound
/// through `t`.
pub fn get_story(character_id: &str, t: &dyn Translator) -> Result<Story, CatalogError> {
    let Ok(id) = character_id.parse::<CharacterId>() else {
        warn!("Unknown character id: {character_id}");
        return Err(CatalogError::NotFound(character_id.to_string()));
    };

    let story = build_story(id, t);
    debug_assert!(
        story.validate().is_ok(),
        "authored story for {id} is malformed: {:?}",
        story.validate()
    );
    debug!(
        "Built story for {id}: {} scenes, {} learnings",
        story.scenes.len(),
        story.learnings.len()
    );

    Ok(story)
}
