//! Renders the static loaders for `src/` into `OUT_DIR`.

use camino::{Utf8Path, Utf8PathBuf};
use cargo_triconf::{app, output};

#[expect(
    clippy::print_stdout,
    reason = "cargo reads build script directives from stdout"
)]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=src");
    let out_dir = Utf8PathBuf::from(std::env::var("OUT_DIR")?);
    let artifacts = app::render_package(Utf8Path::new("src"))?;
    output::write_artifacts(&out_dir, &artifacts)?;
    Ok(())
}
