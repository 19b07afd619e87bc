//! Configuration, macro lookup, and fetch options
//!
//! The build pipeline hands us a macro table: plain defines (cache roots,
//! tool names, `version`) and a hash table keyed by lowercased filename.
//! Both load from a TOML file:
//!
//! ```toml
//! [defines]
//! _sourcedir = "/var/cache/sources:/mnt/mirror/sources"
//! version = "1.2"
//! __gzip = "/usr/bin/gzip"
//!
//! [hashes]
//! "foo-1.2.tar.gz" = "sha256 9f86d081884c7d65..."
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use super::error::{FetchError, Result};

/// Default HTTP timeout in seconds
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Get HTTP timeout from environment variable or use default.
/// Read once per process.
pub fn http_timeout() -> Duration {
    static TIMEOUT: OnceLock<Duration> = OnceLock::new();
    *TIMEOUT.get_or_init(|| {
        let secs = std::env::var("SOURCE_FETCH_HTTP_TIMEOUT")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);
        Duration::from_secs(secs.clamp(5, 300))
    })
}

/// Macro table used to look up cache roots, tool names and expected hashes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    defines: BTreeMap<String, String>,
    #[serde(default)]
    hashes: BTreeMap<String, String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config location: `$SOURCE_FETCH_CONFIG`, else
    /// `<config dir>/source-fetch/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("SOURCE_FETCH_CONFIG") {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|d| d.join("source-fetch").join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| FetchError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
            .map_err(|e| FetchError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(content).map_err(|e| FetchError::Config(e.to_string()))?;
        config.hashes = std::mem::take(&mut config.hashes)
            .into_iter()
            .map(|(k, v)| (k.to_lowercase(), v))
            .collect();
        Ok(config)
    }

    pub fn define(&self, key: &str) -> Option<&str> {
        self.defines.get(key).map(String::as_str)
    }

    pub fn set_define(&mut self, key: &str, value: &str) {
        self.defines.insert(key.to_string(), value.to_string());
    }

    /// Expected `"algorithm digest"` for a filename. Lookup is case-insensitive.
    pub fn hash(&self, file: &str) -> Option<&str> {
        self.hashes.get(&file.to_lowercase()).map(String::as_str)
    }

    pub fn set_hash(&mut self, file: &str, spec: &str) {
        self.hashes.insert(file.to_lowercase(), spec.to_string());
    }

    /// Substitute `%{name}` with defined values. Unknown macros are left as
    /// written so the caller can see what was missing.
    pub fn expand(&self, template: &str) -> String {
        let mut result = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find("%{") {
            result.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            match after.find('}') {
                Some(end) => {
                    let name = &after[..end];
                    match self.define(name) {
                        Some(value) => result.push_str(value),
                        None => {
                            result.push_str("%{");
                            result.push_str(name);
                            result.push('}');
                        }
                    }
                    rest = &after[end + 1..];
                }
                None => {
                    result.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }
        result.push_str(rest);
        result
    }

    /// Ordered cache roots for a define such as `_sourcedir`.
    ///
    /// Entries are separated by `:` or `;`; empty entries are skipped and the
    /// rest are made absolute against the current directory.
    pub fn cache_roots(&self, key: &str) -> Result<Vec<PathBuf>> {
        let value = self
            .define(key)
            .ok_or_else(|| FetchError::UndefinedMacro(key.to_string()))?;

        value
            .split([':', ';'])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| std::path::absolute(s).map_err(FetchError::from))
            .collect()
    }
}

/// Operator switches that shape a fetch.
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub dry_run: bool,
    pub download_disabled: bool,
    pub mirror_bases: Option<Vec<String>>,
}

impl Options {
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn downloads_disabled(&self) -> bool {
        self.download_disabled
    }

    pub fn mirror_bases(&self) -> Option<&[String]> {
        self.mirror_bases.as_deref()
    }
}
