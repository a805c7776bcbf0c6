//! Shell-word splitting and option parsing for directive arguments.

use clap::{Arg, ArgAction, Command};

use super::{GenerationOptions, GrammarError};

/// Split `text` into shell words.
///
/// # Errors
///
/// Returns [`GrammarError::Tokenize`] when quotes are unbalanced.
///
/// # Examples
///
/// ```
/// use triconf::annotation::split_words;
/// let words = split_words(r#"-f "my config.yaml" -e APP"#).unwrap_or_default();
/// assert_eq!(words, ["-f", "my config.yaml", "-e", "APP"]);
/// ```
pub fn split_words(text: &str) -> Result<Vec<String>, GrammarError> {
    shlex::split(text).ok_or_else(|| GrammarError::Tokenize {
        text: text.to_owned(),
    })
}

fn generate_command() -> Command {
    Command::new("generate")
        .no_binary_name(true)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg(
            Arg::new("filename")
                .long("filename")
                .short('f')
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("env-prefix")
                .long("env-prefix")
                .short('e')
                .action(ArgAction::Set),
        )
}

/// Parse the argument text of a `generate` directive.
///
/// # Errors
///
/// Returns [`GrammarError::Tokenize`] for unbalanced quotes and
/// [`GrammarError::Options`] for unknown or incomplete options.
///
/// # Examples
///
/// ```
/// use triconf::annotation::parse_generate_options;
/// let options = parse_generate_options("--filename config.yaml -e app").unwrap_or_default();
/// assert_eq!(options.filename, "config.yaml");
/// assert_eq!(options.env_prefix, "app");
/// ```
pub fn parse_generate_options(text: &str) -> Result<GenerationOptions, GrammarError> {
    let words = split_words(text)?;
    let matches = generate_command()
        .try_get_matches_from(words)
        .map_err(|err| GrammarError::Options {
            text: text.to_owned(),
            message: err.kind().to_string(),
        })?;
    let value = |id: &str| {
        matches
            .get_one::<String>(id)
            .cloned()
            .unwrap_or_default()
    };
    Ok(GenerationOptions {
        filename: value("filename"),
        env_prefix: value("env-prefix"),
    })
}
