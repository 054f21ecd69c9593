//! Branching story engine for the Space Weather Adventure.
//!
//! A [`story::Story`] is built per character by [`story::get_story`], with
//! display strings bound through an [`i18n::Translator`]. A
//! [`story::StorySession`] then tracks one play-through and scores it.
//! The terminal front end in [`play`] also offers a [`facts::FactDeck`]
//! of fun facts and the [`resources`] reading list.

pub mod facts;
pub mod i18n;
pub mod image_cache;
pub mod play;
pub mod resources;
pub mod story;
