//! # lyricfetch common library
//!
//! Shared code for the lyricfetch crates:
//! - Song model and equality rules
//! - Configuration loading (TOML file, environment, defaults)
//! - Common error type

pub mod config;
pub mod error;
pub mod song;

pub use config::Config;
pub use error::{Error, Result};
pub use song::Song;
