use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::story::model::{Choice, ChoiceId, Polarity, Scene, Story, StoryError};

/// Share of the story's scenes that must be answered with a good choice.
pub const SUCCESS_THRESHOLD: f64 = 0.5;

/// How a finished play-through is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Challenge,
}

impl Outcome {
    /// `Success` when at least half as many good choices were made as the
    /// story has scenes. Scene count, not choice count, is the yardstick.
    pub fn score<I>(polarities: I, scene_count: usize) -> Self
    where
        I: IntoIterator<Item = Option<Polarity>>,
    {
        let good_count = polarities
            .into_iter()
            .filter(|p| *p == Some(Polarity::Good))
            .count();
        let threshold = scene_count as f64 * SUCCESS_THRESHOLD;

        if good_count as f64 >= threshold {
            Outcome::Success
        } else {
            Outcome::Challenge
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The id is not offered by the current scene, or the story has
    /// already ended and no scene is offering anything.
    #[error("choice '{choice_id}' is not offered at scene {scene_index}")]
    InvalidChoice {
        choice_id: String,
        scene_index: usize,
    },
}

/// Result of a successful `select_choice`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Advanced { scene_index: usize },
    Completed(Outcome),
}

/// One player's play-through of one story.
#[derive(Debug, Clone)]
pub struct StorySession<'a> {
    story: &'a Story,
    current_scene_index: usize,
    /// Choices picked so far, in order.
    history: Vec<&'a Choice>,
    outcome: Option<Outcome>,
}

impl<'a> StorySession<'a> {
    /// Start a play-through. The story graph is checked here so a broken
    /// story never reaches `select_choice`.
    pub fn new(story: &'a Story) -> Result<Self, StoryError> {
        if let Err(e) = story.validate() {
            warn!("Refusing to start \"{}\": {e}", story.title);
            return Err(e);
        }

        info!(
            "Session started: \"{}\" ({} scenes)",
            story.title,
            story.scenes.len()
        );
        Ok(Self {
            story,
            current_scene_index: 0,
            history: Vec::new(),
            outcome: None,
        })
    }

    /// Restart, then select each of `choice_ids` in turn, stopping at the
    /// first rejected id.
    pub fn replay<I, S>(&mut self, choice_ids: I) -> Result<(), SessionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.restart();
        for id in choice_ids {
            self.select_choice(id.as_ref())?;
        }
        Ok(())
    }

    pub fn story(&self) -> &'a Story {
        self.story
    }

    pub fn current_scene_index(&self) -> usize {
        self.current_scene_index
    }

    pub fn current_scene(&self) -> &'a Scene {
        &self.story.scenes[self.current_scene_index]
    }

    pub fn selected_choice_ids(&self) -> Vec<ChoiceId> {
        self.history.iter().map(|choice| choice.id.clone()).collect()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn is_completed(&self) -> bool {
        self.outcome.is_some()
    }

    /// `(current + 1) / scenes` while playing, `1.0` once completed.
    pub fn progress_fraction(&self) -> f64 {
        if self.is_completed() {
            return 1.0;
        }
        (self.current_scene_index + 1) as f64 / self.story.scenes.len() as f64
    }

    /// Record `choice_id` and advance. Leaves the session untouched when
    /// the id is not one the current scene offers.
    pub fn select_choice(&mut self, choice_id: &str) -> Result<Step, SessionError> {
        let from = self.current_scene_index;
        let choice = match self.current_scene().choice(choice_id) {
            Some(choice) if !self.is_completed() => choice,
            _ => {
                warn!(
                    "Rejected choice '{choice_id}' at scene {from} (completed={})",
                    self.is_completed()
                );
                return Err(SessionError::InvalidChoice {
                    choice_id: choice_id.to_string(),
                    scene_index: from,
                });
            }
        };

        self.history.push(choice);
        debug!("Choice history: {:?}", self.selected_choice_ids());

        match choice.next_scene_index {
            Some(next) => {
                self.current_scene_index = next;
                info!("Transition: scene {from} -> {next} (choice {choice_id})");
                Ok(Step::Advanced { scene_index: next })
            }
            None => {
                let outcome = Outcome::score(
                    self.history.iter().map(|choice| choice.polarity),
                    self.story.scenes.len(),
                );
                self.outcome = Some(outcome);
                info!(
                    "Story completed at scene {from} with {outcome:?} after {} choices",
                    self.history.len()
                );
                Ok(Step::Completed(outcome))
            }
        }
    }

    pub fn restart(&mut self) {
        self.current_scene_index = 0;
        self.history.clear();
        self.outcome = None;
        info!("Session restarted: \"{}\"", self.story.title);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::KeyEcho;
    use crate::story::catalog::get_story;

    fn scene(choices: Vec<Choice>) -> Scene {
        Scene {
            title: "Scene".into(),
            description: "Something happens".into(),
            image_ref: None,
            educational_info: None,
            choices,
        }
    }

    /// Three linear scenes: `good-a`/`bad-a`, `good-b`/`bad-b`, then
    /// terminal `good-c`/`bad-c`.
    fn three_scene_story() -> Story {
        Story {
            character_name: "Tester".into(),
            title: "Three scenes".into(),
            scenes: vec![
                scene(vec![
                    Choice::new("good-a", "A", Some(1)),
                    Choice::new("bad-a", "not A", Some(1)),
                ]),
                scene(vec![
                    Choice::new("good-b", "B", Some(2)),
                    Choice::new("bad-b", "not B", Some(2)),
                ]),
                scene(vec![
                    Choice::new("good-c", "C", None),
                    Choice::new("bad-c", "not C", None),
                ]),
            ],
            learnings: vec!["Lesson".into()],
        }
    }

    fn played<'a>(story: &'a Story, ids: &[&str]) -> StorySession<'a> {
        let mut session = StorySession::new(story).unwrap();
        session.replay(ids).unwrap();
        session
    }

    fn assert_initial(session: &StorySession<'_>) {
        assert_eq!(session.current_scene_index(), 0);
        assert!(session.selected_choice_ids().is_empty());
        assert_eq!(session.outcome(), None);
        assert!(!session.is_completed());
    }

    #[test]
    fn test_new_session_starts_at_first_scene() {
        let story = three_scene_story();
        let session = StorySession::new(&story).unwrap();
        assert_initial(&session);
        assert_eq!(session.current_scene().choices[0].id, "good-a");
    }

    #[test]
    fn test_new_rejects_story_without_scenes() {
        let story = Story {
            character_name: "Nobody".into(),
            title: "Empty".into(),
            scenes: vec![],
            learnings: vec![],
        };
        assert_eq!(StorySession::new(&story).unwrap_err(), StoryError::NoScenes);
    }

    #[test]
    fn test_new_rejects_out_of_range_target() {
        let mut story = three_scene_story();
        story.scenes[0].choices[0].next_scene_index = Some(5);
        assert!(matches!(
            StorySession::new(&story),
            Err(StoryError::TargetOutOfRange { target: 5, .. })
        ));

        // A lone scene pointing anywhere is not terminal either.
        let lone = Story {
            scenes: vec![scene(vec![Choice::new("good-a", "A", Some(5))])],
            ..three_scene_story()
        };
        assert!(StorySession::new(&lone).is_err());
    }

    #[test]
    fn test_all_good_choices_succeed() {
        let story = three_scene_story();
        let mut session = StorySession::new(&story).unwrap();

        assert_eq!(
            session.select_choice("good-a"),
            Ok(Step::Advanced { scene_index: 1 })
        );
        assert_eq!(
            session.select_choice("good-b"),
            Ok(Step::Advanced { scene_index: 2 })
        );
        assert_eq!(
            session.select_choice("good-c"),
            Ok(Step::Completed(Outcome::Success))
        );

        assert_eq!(session.selected_choice_ids(), ["good-a", "good-b", "good-c"]);
        assert_eq!(session.outcome(), Some(Outcome::Success));
    }

    #[test]
    fn test_mostly_bad_choices_are_a_challenge() {
        let story = three_scene_story();
        let session = played(&story, &["bad-a", "bad-b", "good-c"]);
        assert_eq!(session.outcome(), Some(Outcome::Challenge));
    }

    #[test]
    fn test_final_choice_counts_towards_outcome() {
        // Two good choices only reach the threshold with the last one included.
        let story = three_scene_story();
        let session = played(&story, &["bad-a", "good-b", "good-c"]);
        assert_eq!(session.outcome(), Some(Outcome::Success));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        use Polarity::{Bad, Good};

        // 3 scenes -> threshold 1.5; 2 good choices succeed, 1 does not.
        assert_eq!(
            Outcome::score([Some(Good), Some(Good), Some(Bad)], 3),
            Outcome::Success
        );
        assert_eq!(
            Outcome::score([Some(Good), Some(Bad), Some(Bad)], 3),
            Outcome::Challenge
        );
        // 4 scenes -> threshold 2.0, exactly met.
        assert_eq!(
            Outcome::score([Some(Good), Some(Good), Some(Bad), Some(Bad)], 4),
            Outcome::Success
        );
        assert_eq!(Outcome::score([None, None], 2), Outcome::Challenge);
    }

    #[test]
    fn test_scoring_uses_recorded_polarity() {
        // The stored polarity is what counts, not a re-read of the id.
        let mut story = three_scene_story();
        for scene in &mut story.scenes {
            for choice in &mut scene.choices {
                choice.polarity = Some(Polarity::Bad);
            }
        }
        let mut session = StorySession {
            story: &story,
            current_scene_index: 0,
            history: Vec::new(),
            outcome: None,
        };
        session.replay(["good-a", "good-b", "good-c"]).unwrap();
        assert_eq!(session.outcome(), Some(Outcome::Challenge));
    }

    #[test]
    fn test_restart_resets_after_completion() {
        let story = three_scene_story();
        let mut session = played(&story, &["bad-a", "bad-b", "good-c"]);
        assert_eq!(session.outcome(), Some(Outcome::Challenge));

        session.restart();
        assert_initial(&session);
        assert!(std::ptr::eq(session.story(), &story));

        session.restart();
        assert_initial(&session);
    }

    #[test]
    fn test_restart_mid_story() {
        let story = three_scene_story();
        let mut session = played(&story, &["good-a"]);
        session.restart();
        assert_initial(&session);
        assert_eq!(
            session.select_choice("bad-a"),
            Ok(Step::Advanced { scene_index: 1 })
        );
    }

    #[test]
    fn test_invalid_choice_leaves_state_unchanged() {
        let story = three_scene_story();
        let mut session = StorySession::new(&story).unwrap();

        assert_eq!(
            session.select_choice("bad-zzz"),
            Err(SessionError::InvalidChoice {
                choice_id: "bad-zzz".into(),
                scene_index: 0,
            })
        );
        assert_initial(&session);

        // An id from a later scene is not offered yet either.
        assert!(session.select_choice("good-b").is_err());
        assert_initial(&session);
    }

    #[test]
    fn test_choices_rejected_after_completion() {
        let story = three_scene_story();
        let mut session = played(&story, &["good-a", "good-b", "good-c"]);

        let err = session.select_choice("bad-c").unwrap_err();
        assert_eq!(
            err,
            SessionError::InvalidChoice {
                choice_id: "bad-c".into(),
                scene_index: 2,
            }
        );
        assert_eq!(session.outcome(), Some(Outcome::Success));
        assert_eq!(session.selected_choice_ids().len(), 3);
    }

    #[test]
    fn test_history_grows_by_one_per_choice() {
        let story = three_scene_story();
        let mut session = StorySession::new(&story).unwrap();
        for (calls, id) in ["good-a", "bad-b", "bad-c"].into_iter().enumerate() {
            assert_eq!(session.selected_choice_ids().len(), calls);
            session.select_choice(id).unwrap();
            assert_eq!(session.selected_choice_ids().len(), calls + 1);
        }
    }

    #[test]
    fn test_single_scene_story_completes_immediately() {
        let story = Story {
            character_name: "Solo".into(),
            title: "One scene".into(),
            scenes: vec![scene(vec![
                Choice::new("bad-x", "X", None),
                Choice::new("good-y", "Y", None),
            ])],
            learnings: vec![],
        };

        let mut session = StorySession::new(&story).unwrap();
        assert_eq!(session.progress_fraction(), 1.0);
        // Threshold 0.5: a single bad choice falls short.
        assert_eq!(
            session.select_choice("bad-x"),
            Ok(Step::Completed(Outcome::Challenge))
        );

        session.restart();
        assert_eq!(
            session.select_choice("good-y"),
            Ok(Step::Completed(Outcome::Success))
        );
    }

    #[test]
    fn test_progress_fraction() {
        let story = three_scene_story();
        let mut session = StorySession::new(&story).unwrap();
        assert!((session.progress_fraction() - 1.0 / 3.0).abs() < f64::EPSILON);
        session.select_choice("good-a").unwrap();
        assert!((session.progress_fraction() - 2.0 / 3.0).abs() < f64::EPSILON);
        session.select_choice("good-b").unwrap();
        assert_eq!(session.progress_fraction(), 1.0);
        session.select_choice("good-c").unwrap();
        assert_eq!(session.progress_fraction(), 1.0);
    }

    #[test]
    fn test_replay_is_deterministic() {
        let story = get_story("engineer", &KeyEcho).unwrap();
        let path = ["good-reduce", "bad-risk", "good-upgrade"];

        let first = played(&story, &path);
        let mut second = StorySession::new(&story).unwrap();
        second.replay(path).unwrap();
        // Replaying over a finished session starts from scratch.
        second.replay(path).unwrap();

        assert_eq!(first.outcome(), second.outcome());
        assert_eq!(first.selected_choice_ids(), second.selected_choice_ids());
        assert_eq!(first.outcome(), Some(Outcome::Success));
    }

    #[test]
    fn test_replay_stops_at_invalid_choice() {
        let story = three_scene_story();
        let mut session = StorySession::new(&story).unwrap();
        let err = session.replay(["good-a", "good-a"]).unwrap_err();
        assert_eq!(
            err,
            SessionError::InvalidChoice {
                choice_id: "good-a".into(),
                scene_index: 1,
            }
        );
        assert_eq!(session.selected_choice_ids(), ["good-a"]);
    }

    #[test]
    fn test_shipped_stories_score_as_expected() {
        let story = get_story("astronaut", &KeyEcho).unwrap();

        let careful = played(&story, &["good-shelter", "good-manual", "good-report"]);
        assert_eq!(careful.outcome(), Some(Outcome::Success));

        // The closing scene only offers good choices, so two bad picks
        // still leave one good choice: 1 < 1.5.
        let reckless = played(&story, &["bad-ignore", "bad-panic", "good-document"]);
        assert_eq!(reckless.outcome(), Some(Outcome::Challenge));
    }
}
