//! Schema shared by both loaders.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use triconf::{Bind, BindError, FieldDecl, Fields, GenerationOptions, Loader, Sources};

/// Options of the `generate` directive on [`Settings`].
pub const GENERATE_OPTIONS: &str = "-f settings.yaml -e eq";

/// Service settings.
///
/// triconf:generate -f settings.yaml -e eq
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Port to listen on.
    /// triconf:pflag port p
    #[serde(rename = "listen_port")]
    pub port: u16,
    /// Log every request.
    /// triconf:pflag verbose v
    pub verbose: bool,
    /// Instance name.
    pub name: String,
    /// Sampling ratio.
    pub ratio: f64,
    /// triconf:pflag log
    pub log: Log,
    /// Labels, settable from the file only.
    pub tags: Vec<String>,
    /// Per-route weights, merged with the defaults.
    pub weights: BTreeMap<String, u8>,
    /// Request timeout in seconds.
    /// triconf:pflag timeout t
    pub timeout: Option<f64>,
    /// Owning team.
    pub owner: Option<String>,
    /// triconf:pflag upstream
    pub upstream: Option<Upstream>,
}

/// Upstream service, absent until bound or loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upstream {
    /// Host name.
    /// triconf:pflag host
    pub host: String,
    /// Connection limit.
    pub limit: Option<u32>,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Log {
    /// Minimum level.
    /// triconf:pflag level
    pub level: String,
    /// Emit JSON lines.
    /// triconf:pflag json
    pub json: bool,
    /// Delivery attempts.
    pub retries: i32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: 8000,
            verbose: false,
            name: "svc".to_owned(),
            ratio: 1.0,
            log: Log {
                level: "info".to_owned(),
                json: false,
                retries: 3,
            },
            tags: Vec::new(),
            weights: BTreeMap::from([("default".to_owned(), 1)]),
            timeout: None,
            owner: None,
            upstream: None,
        }
    }
}

impl Bind for Settings {
    fn bind<R: 'static>(fields: &mut Fields<'_, R, Self>) -> Result<(), BindError> {
        fields
            .leaf(
                FieldDecl::new("port")
                    .rename("listen_port")
                    .annotation("triconf:pflag port p"),
                |s| &mut s.port,
            )?
            .leaf(
                FieldDecl::new("verbose").annotation("triconf:pflag verbose v"),
                |s| &mut s.verbose,
            )?
            .leaf(FieldDecl::new("name"), |s| &mut s.name)?
            .leaf(FieldDecl::new("ratio"), |s| &mut s.ratio)?
            .record(
                FieldDecl::new("log").annotation("triconf:pflag log"),
                |s| &mut s.log,
            )?
            .leaf(FieldDecl::new("tags"), |s| &mut s.tags)?
            .leaf(FieldDecl::new("weights"), |s| &mut s.weights)?
            .leaf(
                FieldDecl::new("timeout").annotation("triconf:pflag timeout t"),
                |s| &mut s.timeout,
            )?
            .leaf(FieldDecl::new("owner"), |s| &mut s.owner)?
            .optional_record(
                FieldDecl::new("upstream").annotation("triconf:pflag upstream"),
                |s| &mut s.upstream,
            )?;
        Ok(())
    }
}

impl Bind for Log {
    fn bind<R: 'static>(fields: &mut Fields<'_, R, Self>) -> Result<(), BindError> {
        fields
            .leaf(
                FieldDecl::new("level").annotation("triconf:pflag level"),
                |l| &mut l.level,
            )?
            .leaf(
                FieldDecl::new("json").annotation("triconf:pflag json"),
                |l| &mut l.json,
            )?
            .leaf(FieldDecl::new("retries"), |l| &mut l.retries)?;
        Ok(())
    }
}

impl Bind for Upstream {
    fn bind<R: 'static>(fields: &mut Fields<'_, R, Self>) -> Result<(), BindError> {
        fields
            .leaf(
                FieldDecl::new("host").annotation("triconf:pflag host"),
                |u| &mut u.host,
            )?
            .leaf(FieldDecl::new("limit"), |u| &mut u.limit)?;
        Ok(())
    }
}

impl Settings {
    /// A reflective loader reading the same sources as `triconf_load`.
    #[must_use]
    pub fn loader() -> Loader<Self> {
        Loader::new(Sources::from_options(&GenerationOptions::parse_lenient(
            GENERATE_OPTIONS,
        )))
    }
}

include!(concat!(env!("OUT_DIR"), "/zz_triconf_utils.rs"));
include!(concat!(env!("OUT_DIR"), "/zz_triconf_settings.rs"));
