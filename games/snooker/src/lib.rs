use wasm_bindgen::prelude::*;
use baize_engine::*;

pub mod ball;
pub mod config;
pub mod cue;
pub mod feedback;
pub mod game;
pub mod presets;
pub mod registry;
pub mod render;
pub mod sim;
pub mod table;

pub use game::SnookerGame;

baize_web::export_game!(SnookerGame, "snooker");
