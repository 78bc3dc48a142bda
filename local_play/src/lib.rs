//! Single-machine match driver: shared-keyboard play or a human against the
//! built-in bot, running the same kernel the server uses.

pub mod simulation;

pub use simulation::{LocalMatch, Opponent};
