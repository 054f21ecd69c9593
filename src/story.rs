pub mod catalog;
pub mod character;
pub mod model;
pub mod session;

pub use catalog::{get_story, CatalogError};
pub use character::{characters, CharacterId, CharacterProfile};
pub use model::{Choice, ChoiceId, Polarity, Scene, Story, StoryError};
pub use session::{Outcome, SessionError, Step, StorySession, SUCCESS_THRESHOLD};
