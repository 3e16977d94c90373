//! # Campus Invasion
//!
//! Frame-by-frame simulation of the Alien Invasion arcade game.
//!
//! The crate knows nothing about windows, terminals or audio. A front-end
//! feeds [`Command`]s in, calls [`Game::tick`] once per frame, draws the
//! entity sets it reads back and reacts to the returned [`GameEvent`]s.

pub mod alien;
pub mod bullet;
pub mod button;
pub mod error;
pub mod firing;
pub mod game;
pub mod geometry;
pub mod settings;
pub mod ship;
pub mod stats;

pub use error::GameError;
pub use game::{Command, Game, GameEvent};
pub use geometry::Rect;
pub use settings::{DynamicSettings, Settings};
pub use stats::{GameStats, HighScoreStore};
