//! Courtside command-line front end.

pub mod analyze;
pub mod cli;
pub mod parse;
pub mod render;
pub mod replay;

pub use cli::{Cli, Commands};
