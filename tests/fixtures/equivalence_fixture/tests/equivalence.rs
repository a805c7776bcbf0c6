//! The reflective loader and the generated loader agree on every input.

use std::collections::BTreeMap;

use anyhow::{Result, ensure};
use equivalence_fixture::settings::{Settings, Upstream};
use figment::Jail;
use rstest::rstest;
use test_helpers::figment::with_jail;

const FILE: &str = r"
listen_port: 8080
name: from-file
ratio: 0.5
log:
  level: debug
  retries: 5
tags: [a, b]
weights:
  search: 5
upstream:
  limit: 10
";

type Outcome = (Result<Settings, String>, Result<Settings, String>);

/// Load with both implementations from the jail's current state.
fn load_both(argv: &[&str]) -> Outcome {
    let loader = Settings::loader();
    let reflective = loader
        .bind(Settings::default())
        .map_err(|err| err.to_string())
        .and_then(|()| loader.parse_flags(argv.iter().copied()).map_err(|err| err.to_string()))
        .and_then(|()| loader.load().map_err(|err| err.to_string()))
        .map(|()| loader.current().unwrap_or_default());

    let mut settings = Settings::default();
    let generated = settings
        .triconf_load(argv.iter().copied())
        .map(|()| settings)
        .map_err(|err| err.to_string());
    (reflective, generated)
}

fn setup(jail: &mut Jail, env: &[(&str, &str)]) -> figment::error::Result<()> {
    setup_with(jail, FILE, env)
}

fn setup_with(jail: &mut Jail, file: &str, env: &[(&str, &str)]) -> figment::error::Result<()> {
    jail.create_file("settings.yaml", file)?;
    for (name, value) in env {
        jail.set_env(name, value);
    }
    Ok(())
}

#[rstest]
#[case::file_only(&[], &[])]
#[case::environment(&[("EQ_PORT", "9000"), ("EQ_LOG_LEVEL", "warn"), ("EQ_RATIO", "0.25")], &[])]
#[case::booleans(&[("EQ_VERBOSE", "T"), ("EQ_LOG_JSON", "1")], &[])]
#[case::empty_env_is_absent(&[("EQ_NAME", "")], &[])]
#[case::flags(
    &[("EQ_PORT", "9000"), ("EQ_LOG_LEVEL", "warn")],
    &["-p", "9090", "--log-level", "error", "--verbose", "--log-json=false"]
)]
#[case::unchanged_flags_do_not_override(&[("EQ_PORT", "9000")], &["--log-json"])]
#[case::optional_scalars(&[("EQ_TIMEOUT", "2.5"), ("EQ_OWNER", "ops")], &[])]
#[case::optional_flags(&[("EQ_TIMEOUT", "2.5")], &["-t", "4", "--upstream-host", "db.internal"])]
#[case::optional_record_env(&[("EQ_UPSTREAM_HOST", "up"), ("EQ_UPSTREAM_LIMIT", "3")], &[])]
fn both_loaders_agree(#[case] env: &[(&str, &str)], #[case] argv: &[&str]) -> Result<()> {
    let (reflective, generated) = with_jail(|jail| {
        setup(jail, env)?;
        Ok(load_both(argv))
    })?;
    let reflective = reflective.map_err(anyhow::Error::msg)?;
    let generated = generated.map_err(anyhow::Error::msg)?;
    ensure!(
        reflective == generated,
        "reflective {reflective:?} != generated {generated:?}"
    );
    Ok(())
}

#[test]
fn unset_options_are_allocated_by_both() -> Result<()> {
    let (reflective, generated) = with_jail(|jail| {
        setup_with(jail, "name: bare\n", &[])?;
        Ok(load_both(&[]))
    })?;
    let reflective = reflective.map_err(anyhow::Error::msg)?;
    let generated = generated.map_err(anyhow::Error::msg)?;
    ensure!(
        reflective == generated,
        "reflective {reflective:?} != generated {generated:?}"
    );
    ensure!(generated.owner.as_deref() == Some(""));
    let upstream = Upstream {
        host: String::new(),
        limit: Some(0),
    };
    ensure!(generated.upstream == Some(upstream), "{:?}", generated.upstream);
    Ok(())
}

#[test]
fn file_maps_merge_into_defaults() -> Result<()> {
    let (reflective, generated) = with_jail(|jail| {
        setup(jail, &[])?;
        Ok(load_both(&[]))
    })?;
    let expected = BTreeMap::from([("default".to_owned(), 1), ("search".to_owned(), 5)]);
    for settings in [reflective, generated] {
        let settings = settings.map_err(anyhow::Error::msg)?;
        ensure!(settings.weights == expected, "{:?}", settings.weights);
        ensure!(
            settings.upstream.as_ref().and_then(|u| u.limit) == Some(10),
            "{:?}",
            settings.upstream
        );
    }
    Ok(())
}

#[test]
fn precedence_is_flag_over_env_over_file() -> Result<()> {
    let (_, generated) = with_jail(|jail| {
        setup(jail, &[("EQ_PORT", "9000"), ("EQ_NAME", "from-env")])?;
        Ok(load_both(&["--port", "9090"]))
    })?;
    let settings = generated.map_err(anyhow::Error::msg)?;
    ensure!(settings.port == 9090);
    ensure!(settings.name == "from-env");
    ensure!(settings.log.level == "debug");
    ensure!(settings.log.json == Settings::default().log.json);
    ensure!(settings.tags == ["a", "b"]);
    Ok(())
}

#[rstest]
#[case::bad_env_integer(&[("EQ_PORT", "eighty")], &[], true)]
#[case::out_of_range(&[("EQ_LOG_RETRIES", "99999999999")], &[], true)]
#[case::bad_flag_value(&[], &["--port", "many"], true)]
#[case::unknown_flag(&[], &["--nope"], true)]
#[case::missing_file(&[], &[], false)]
#[case::infinite_float(&[("EQ_RATIO", "inf")], &[], true)]
#[case::not_a_number(&[("EQ_TIMEOUT", "NaN")], &[], true)]
#[case::float_overflow(&[], &["--timeout", "1e400"], true)]
fn both_loaders_fail(
    #[case] env: &[(&str, &str)],
    #[case] argv: &[&str],
    #[case] with_file: bool,
) -> Result<()> {
    let (reflective, generated) = with_jail(|jail| {
        if with_file {
            setup(jail, env)?;
        }
        Ok(load_both(argv))
    })?;
    ensure!(reflective.is_err(), "reflective loaded {reflective:?}");
    ensure!(generated.is_err(), "generated loaded {generated:?}");
    Ok(())
}

#[rstest]
#[case::quoted_integer("listen_port: \"8080\"\n")]
#[case::quoted_boolean("verbose: \"true\"\n")]
#[case::quoted_optional_float("timeout: \"1.5\"\n")]
fn quoted_scalars_in_the_file_fail_both(#[case] file: &str) -> Result<()> {
    let (reflective, generated) = with_jail(|jail| {
        setup_with(jail, file, &[])?;
        Ok(load_both(&[]))
    })?;
    ensure!(reflective.is_err(), "reflective loaded {reflective:?}");
    ensure!(generated.is_err(), "generated loaded {generated:?}");
    Ok(())
}
