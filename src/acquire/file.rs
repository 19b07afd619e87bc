//! Local filesystem sources

use std::path::Path;

use crate::internal::url_utils;

/// A `file://` source is available when it is already in the cache, or when
/// the reference names an existing local directory (a source tree used in
/// place).
pub fn download(url: &str, local: &Path) -> bool {
    if local.exists() {
        return true;
    }
    if Path::new(url).is_dir() {
        return true;
    }
    url_utils::split_scheme(url).is_some_and(|(_, path)| Path::new(path).is_dir())
}
