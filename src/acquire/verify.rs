//! Hash verification against the configured hash table
//!
//! The hash table maps a lowercased filename to `"algorithm digest"`, for
//! example `"sha256 9f86d0..."`. A file with no entry is unverifiable: we
//! warn and let it through. Callers decide what a mismatch means: the
//! resolver treats a stale cache hit as soft and deletes it, the plain
//! downloader treats a fresh download as fatal.

use std::path::Path;

use crate::core::config::Config;
use crate::core::error::{FetchError, Result};
use crate::core::output;
use crate::internal::hash::{self, HashAlgorithm};

/// Expected digest for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashSpec {
    pub algorithm: HashAlgorithm,
    /// Lowercase hex
    pub digest: String,
}

impl HashSpec {
    /// Parse an `"algorithm digest"` entry for `file`.
    pub fn parse(file: &str, spec: &str) -> Result<Self> {
        let tokens: Vec<&str> = spec.split_whitespace().collect();
        let [algorithm, digest] = tokens.as_slice() else {
            return Err(FetchError::InvalidHashFormat {
                file: file.to_string(),
                spec: spec.to_string(),
            });
        };

        let algorithm = algorithm
            .parse::<HashAlgorithm>()
            .map_err(|e| FetchError::InvalidHashAlgorithm {
                file: file.to_string(),
                algorithm: e.0,
            })?;

        Ok(Self {
            algorithm,
            digest: digest.to_lowercase(),
        })
    }

    /// Look up the spec for `file` in the hash table.
    pub fn lookup(file: &str, config: &Config) -> Result<Option<Self>> {
        config
            .hash(file)
            .map(|spec| Self::parse(file, spec))
            .transpose()
    }
}

/// Verify `local` against the hash table entry for `label`.
///
/// Returns `Ok(true)` when the digest matches or no entry exists, `Ok(false)`
/// on a mismatch or when the file cannot be read. With `remove_on_failure`
/// the file is deleted on failure. A malformed entry or unknown algorithm is
/// a configuration error and is returned as `Err`.
pub fn verify(label: &str, local: &Path, config: &Config, remove_on_failure: bool) -> Result<bool> {
    let Some(spec) = HashSpec::lookup(label, config)? else {
        output::warning(&format!("{}: no hash found", label));
        return Ok(true);
    };

    let mut failed = false;
    match hash::file_digest(local, spec.algorithm) {
        Ok(actual) => {
            output::output(&format!(
                "checksums: {}: {} => {}",
                label, actual, spec.digest
            ));
            if actual != spec.digest {
                output::warning(&format!("checksum error: {}", label));
                failed = true;
            }
        }
        Err(e) => {
            output::warning(&format!("hash: {}: read error: {}", label, e));
            failed = true;
        }
    }

    if failed && remove_on_failure && local.is_file() {
        output::warning(&format!("removing: {}", label));
        if let Err(e) = std::fs::remove_file(local) {
            output::warning(&format!("cannot remove {}: {}", local.display(), e));
        }
    }

    Ok(!failed)
}
