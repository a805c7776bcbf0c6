//! Command-line interface definitions for `cargo-triconf`.

use camino::Utf8PathBuf;
use clap::{Args as ClapArgs, Parser};

use crate::app::Options;

/// Cargo passes the subcommand name as the first argument.
#[derive(Debug, Parser)]
#[command(name = "cargo", bin_name = "cargo")]
pub enum Cargo {
    /// Generate static triconf loaders for annotated structs.
    Triconf(Args),
}

/// Parsed arguments of `cargo triconf`.
#[derive(Debug, ClapArgs)]
#[command(version)]
pub struct Args {
    /// Directory to scan for packages.
    #[arg(default_value = ".", value_name = "DIR")]
    pub dir: Utf8PathBuf,
    /// Render and print the loaders without writing them.
    #[arg(long = "dry-run")]
    pub is_dry_run: bool,
    /// Skip running `rustfmt` on written files.
    #[arg(long = "no-format")]
    pub should_skip_format: bool,
    /// Skip running `cargo fetch` after writing.
    #[arg(long = "no-fetch")]
    pub should_skip_fetch: bool,
}

impl From<Args> for Options {
    fn from(args: Args) -> Self {
        Self {
            root: args.dir,
            is_dry_run: args.is_dry_run,
            should_format: !args.should_skip_format,
            should_fetch: !args.should_skip_fetch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(argv: &[&str]) -> Options {
        match Cargo::try_parse_from(argv) {
            Ok(Cargo::Triconf(args)) => args.into(),
            Err(err) => panic!("unexpected parse failure: {err}"),
        }
    }

    #[test]
    fn defaults_scan_the_working_directory() {
        let options = parse(&["cargo", "triconf"]);
        assert_eq!(options.root, ".");
        assert!(!options.is_dry_run);
        assert!(options.should_format);
        assert!(options.should_fetch);
    }

    #[rstest]
    #[case(&["cargo", "triconf", "src", "--dry-run"], true, true)]
    #[case(&["cargo", "triconf", "src", "--no-format", "--no-fetch"], false, false)]
    fn switches_map_onto_options(
        #[case] argv: &[&str],
        #[case] is_dry_run: bool,
        #[case] should_format: bool,
    ) {
        let options = parse(argv);
        assert_eq!(options.root, "src");
        assert_eq!(options.is_dry_run, is_dry_run);
        assert_eq!(options.should_format, should_format);
    }

    #[test]
    fn missing_subcommand_is_rejected() {
        assert!(Cargo::try_parse_from(["cargo"]).is_err());
    }
}
