//! Reference to descriptor resolution

use std::path::PathBuf;

use super::{Protocol, SourceDescriptor, SourceKind, parsers};
use crate::acquire::verify;
use crate::core::config::Config;
use crate::core::error::{FetchError, Result};
use crate::core::output;
use crate::internal::url_utils;

/// Build the descriptor for a source reference.
///
/// `path_key` names the define holding the cache roots (for example
/// `_sourcedir`). The first root is the default location. If a root already
/// holds the file, that root wins and the cached file is verified on the
/// spot; a mismatching file is deleted so the next fetch downloads it again.
pub fn resolve(reference: &str, path_key: &str, config: &Config) -> Result<SourceDescriptor> {
    let (scheme, rest) = url_utils::split_scheme(reference)
        .ok_or_else(|| FetchError::malformed(reference, "missing scheme:// separator"))?;
    let protocol = Protocol::from_reference(reference)
        .ok_or_else(|| FetchError::malformed(reference, "unsupported protocol"))?;

    let (dir, file) = url_utils::split_dirname(rest);
    let (name, ext) = split_name(file);

    let (local_prefix, local) = locate(file, path_key, config)?;

    let mut source = SourceDescriptor {
        url: reference.to_string(),
        protocol,
        path: format!("{}://{}", scheme, dir),
        file: file.to_string(),
        name,
        ext,
        symlink: local.clone(),
        local_prefix,
        local,
        kind: SourceKind::File,
    };

    parsers::parse(protocol, &mut source)?;
    output::trace(&format!(
        "source: {} -> {}",
        source.url,
        source.local.display()
    ));
    Ok(source)
}

/// Split a file name, keeping a `.tar` before the last extension with it.
fn split_name(file: &str) -> (String, String) {
    let (name, ext) = url_utils::split_ext(file);
    match name.strip_suffix(".tar") {
        Some(stem) => (stem.to_string(), format!(".tar{}", ext)),
        None => (name.to_string(), ext.to_string()),
    }
}

/// Search the cache roots in order for `file`.
fn locate(file: &str, path_key: &str, config: &Config) -> Result<(PathBuf, PathBuf)> {
    let roots = config.cache_roots(path_key)?;
    let first = roots
        .first()
        .ok_or_else(|| FetchError::UndefinedMacro(path_key.to_string()))?;

    for root in &roots {
        let local = root.join(file);
        if local.exists() {
            verify::verify(file, &local, config, true)?;
            return Ok((root.clone(), local));
        }
    }

    Ok((first.clone(), first.join(file)))
}
