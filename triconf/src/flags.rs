//! Command-line flag construction and change detection.
//!
//! Every flag takes its value as text so that binder and generated loaders
//! convert it with the same parsers. Boolean flags may be given bare
//! (`--debug`) or with an attached value (`--debug=false`).

use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::scalar::ValueKind;

/// Build the flag `--name` (and `-s` when a shorthand is given) for a field
/// of `kind`.
///
/// # Examples
///
/// ```
/// use triconf::{ValueKind, flag_arg, flag_command};
/// let cmd = flag_command("demo").arg(flag_arg("port", Some('p'), ValueKind::String, ""));
/// let matches = cmd.try_get_matches_from(["-p", "9090"]).map_err(|e| e.to_string());
/// assert_eq!(
///     matches.ok().and_then(|m| triconf::changed_value(&m, "port")).as_deref(),
///     Some("9090")
/// );
/// ```
#[must_use]
pub fn flag_arg(name: &str, shorthand: Option<char>, kind: ValueKind, help: &str) -> Arg {
    let mut arg = Arg::new(name.to_owned())
        .long(name.to_owned())
        .action(ArgAction::Set)
        .value_name(kind.to_string().to_ascii_uppercase());
    if let Some(short) = shorthand {
        arg = arg.short(short);
    }
    if !help.is_empty() {
        arg = arg.help(help.to_owned());
    }
    if kind.is_bool() {
        arg = arg
            .num_args(0..=1)
            .require_equals(true)
            .default_missing_value("true");
    }
    arg
}

/// Command that parses an argument vector without a leading program name.
#[must_use]
pub fn flag_command(name: &str) -> Command {
    Command::new(name.to_owned())
        .no_binary_name(true)
        .disable_version_flag(true)
}

/// Text given for `id` on the command line, `None` when the flag was not
/// passed explicitly.
#[must_use]
pub fn changed_value(matches: &ArgMatches, id: &str) -> Option<String> {
    let value = matches.try_get_one::<String>(id).ok().flatten()?;
    (matches.value_source(id) == Some(ValueSource::CommandLine)).then(|| value.clone())
}
