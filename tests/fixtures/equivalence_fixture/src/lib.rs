//! Fixture crate comparing the reflective loader with the generated one.
//!
//! `build.rs` runs the generator over this crate's sources, so
//! [`settings::Settings`] carries both a [`triconf::Bind`] implementation and
//! a generated `triconf_load` method driven by the same annotations.

pub mod settings;
