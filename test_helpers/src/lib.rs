//! Test helpers shared across the workspace.
//!
//! [`env`] guards process environment mutations; [`figment`] wraps
//! `figment::Jail` for tests that need files and variables together.

pub mod env;
pub mod figment;
