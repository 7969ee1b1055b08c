// Library surface: the game engine plus the pieces the terminal binary wires
// together. Headless tests drive `session::GameSession` directly.
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod history;
pub mod matching;
pub mod persistence;
pub mod runtime;
pub mod score;
pub mod session;
pub mod ui;
pub mod words;
