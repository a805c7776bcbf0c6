//! Generator that renders static `triconf` loaders.
//!
//! `cargo triconf` walks a source tree, treats every directory of `.rs` files
//! as a package, and for each struct whose documentation carries a
//! `triconf:` directive renders an `impl` with a `triconf_load` method. The
//! rendered code loads the configuration file, environment variables and
//! flags with the same naming and precedence rules as [`triconf::Loader`].
//!
//! Build scripts can call [`app::render_package`] directly and `include!` the
//! rendered units from `OUT_DIR`.

pub mod app;
pub mod cli;
pub mod error;
pub mod output;
pub mod render;
pub mod schema;
