//! Process Configuration
//!
//! Values are read once at startup from `COSR_*` environment variables and
//! handed to `Pipeline::initialize`. Nothing reads the environment after that.
//! Values that fail to parse keep their default and are reported once logging
//! is set up.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

const ENV_PREFIX: &str = "COSR_";

#[derive(Debug, Clone)]
pub struct Config {
    /// Turns on debug-level logging.
    pub debug: bool,
    /// Serve fixed mock hits instead of querying the indexes.
    pub test_data: bool,
    /// Environment name: "local", "ci" or "prod".
    pub env: String,
    pub host: String,
    pub port: u16,
    /// Base URL of the text-relevance index.
    pub elasticsearch_text: String,
    /// Base URL of the document store.
    pub elasticsearch_docs: String,
    /// Number of hits on each result page.
    pub result_page_size: usize,
    /// Maximum number of words allowed into the actual search.
    pub max_query_terms: usize,
    /// Language assumed when a query arrives without one.
    pub default_lang: String,
    /// Upper bound on each outbound index request.
    pub request_timeout: Duration,
    /// Bang definitions file; the built-in table is used when unset.
    pub bangs_path: Option<PathBuf>,
    /// Malformed variables that fell back to their defaults.
    pub warnings: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            test_data: false,
            env: "local".to_string(),
            host: "0.0.0.0".to_string(),
            port: 9700,
            elasticsearch_text: "http://127.0.0.1:39200".to_string(),
            elasticsearch_docs: "http://127.0.0.1:39200".to_string(),
            result_page_size: 25,
            max_query_terms: 10,
            default_lang: "en".to_string(),
            request_timeout: Duration::from_millis(2000),
            bangs_path: None,
            warnings: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Nothing is logged here since the subscriber depends on the result;
    /// malformed values are collected in `warnings` for the caller to report.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any variable source, e.g. a map in tests.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut reader = EnvReader {
            lookup,
            warnings: Vec::new(),
        };
        let mut config = Self::default();

        config.debug = reader.flag("DEBUG", config.debug);
        config.test_data = reader.flag("TESTDATA", config.test_data);
        if let Some(v) = reader.value("ENV") {
            config.env = v;
        }

        if let Some(v) = reader.value("HOST") {
            config.host = v;
        }
        // PORT is honoured unprefixed as well, as most hosting platforms set it.
        let default_port = config.port;
        config.port = match reader.raw("PORT") {
            Some(v) => reader.parse_or_warn("PORT", &v),
            None => None,
        }
        .unwrap_or_else(|| reader.parsed("PORT", default_port));

        if let Some(v) = reader.value("ELASTICSEARCHTEXT") {
            config.elasticsearch_text = v;
        }
        if let Some(v) = reader.value("ELASTICSEARCHDOCS") {
            config.elasticsearch_docs = v;
        }

        config.result_page_size = reader.parsed("RESULTPAGESIZE", config.result_page_size).max(1);
        config.max_query_terms = reader.parsed("MAXQUERYTERMS", config.max_query_terms).max(1);
        if let Some(v) = reader.value("DEFAULTLANG") {
            config.default_lang = v;
        }
        // A zero timeout would fail every outbound request.
        let timeout_ms = reader
            .parsed("REQUEST_TIMEOUT_MS", config.request_timeout.as_millis() as u64)
            .max(1);
        config.request_timeout = Duration::from_millis(timeout_ms);
        config.bangs_path = reader.value("BANGS_PATH").map(PathBuf::from);

        config.warnings = reader.warnings;
        config
    }

    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port).parse()?;
        Ok(addr)
    }

    pub fn is_production(&self) -> bool {
        self.env == "prod"
    }
}

struct EnvReader<F> {
    lookup: F,
    warnings: Vec<String>,
}

impl<F: Fn(&str) -> Option<String>> EnvReader<F> {
    /// Read a variable as is, ignoring empty values.
    fn raw(&self, name: &str) -> Option<String> {
        (self.lookup)(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Read a prefixed variable.
    fn value(&self, key: &str) -> Option<String> {
        self.raw(&format!("{ENV_PREFIX}{key}"))
    }

    fn flag(&mut self, key: &str, default: bool) -> bool {
        let Some(v) = self.value(key) else {
            return default;
        };
        match parse_bool(&v) {
            Some(flag) => flag,
            None => {
                self.warn(&format!("{ENV_PREFIX}{key}"), &v);
                default
            }
        }
    }

    fn parsed<T: std::str::FromStr>(&mut self, key: &str, default: T) -> T {
        match self.value(key) {
            Some(v) => self
                .parse_or_warn(&format!("{ENV_PREFIX}{key}"), &v)
                .unwrap_or(default),
            None => default,
        }
    }

    fn parse_or_warn<T: std::str::FromStr>(&mut self, name: &str, value: &str) -> Option<T> {
        match value.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                self.warn(name, value);
                None
            }
        }
    }

    fn warn(&mut self, name: &str, value: &str) {
        self.warnings
            .push(format!("Ignoring malformed value for {}: {:?}", name, value));
    }
}

pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
