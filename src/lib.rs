//! vibera: a terminal AI DJ.
//!
//! A generative model writes a fictional setlist and a hype caption, then two
//! virtual decks play through it with a simulated crossfade. No audio is
//! involved; the playback simulator in [`pipeline::playback`] is a pure state
//! transition advanced once per second by [`middle::Middle`].

pub mod config;
pub mod loader;
pub mod middle;
pub mod pipeline;
pub mod shared;
pub mod source;
pub mod tui;
