//! Source reference string helpers
//!
//! References look like URLs but are not standard ones: the query part is a
//! `?`-separated operator list, and schemes such as `pw://` or `cvs://` are
//! ours. These helpers therefore work on plain strings and only reach for
//! the `url` crate when joining a mirror base.

use url::Url;

/// Split `scheme://rest` into `("scheme", "rest")`.
///
/// Returns `None` when there is no `://` right after the first colon.
pub fn split_scheme(reference: &str) -> Option<(&str, &str)> {
    let colon = reference.find(':')?;
    let rest = reference[colon + 1..].strip_prefix("//")?;
    Some((&reference[..colon], rest))
}

/// Strip the operator list (everything from the first `?`).
pub fn strip_query(reference: &str) -> &str {
    reference.split('?').next().unwrap_or(reference)
}

/// Split a path into `(dirname, basename)` at the last `/`.
pub fn split_dirname(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(slash) => (&path[..slash], &path[slash + 1..]),
        None => ("", path),
    }
}

/// Split a filename into `(name, ext)`, with `ext` including the dot.
///
/// A leading dot is not an extension separator, so `.bashrc` has no
/// extension.
pub fn split_ext(file: &str) -> (&str, &str) {
    match file.rfind('.') {
        Some(dot) if file[..dot].chars().any(|c| c != '.') => (&file[..dot], &file[dot..]),
        _ => (file, ""),
    }
}

/// The last path segment of a reference, ignoring host and operators.
///
/// `http://host/pub/foo-1.2.tar.gz?x` -> `foo-1.2.tar.gz`
pub fn reference_file(reference: &str) -> &str {
    let base = strip_query(reference);
    let path = match split_scheme(base) {
        Some((_, rest)) => rest.find('/').map_or("", |slash| &rest[slash..]),
        None => base,
    };
    split_dirname(path).1
}

/// Join a mirror base with a file name the way a browser resolves a
/// relative link. The base always gets a trailing `/` first.
pub fn mirror_join(base: &str, file: &str) -> String {
    let base = if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{}/", base)
    };

    match Url::parse(&base).and_then(|u| u.join(file)) {
        Ok(joined) => joined.to_string(),
        Err(_) => format!("{}{}", base, file),
    }
}
