//! Per-protocol descriptor parsers
//!
//! Each parser receives a descriptor whose header the resolver has already
//! filled in and sets the protocol payload, overriding the cache path where
//! the protocol keeps its own sub-root.

use serde::Serialize;

use super::query::{self, Operator};
use super::{Compression, Protocol, SourceDescriptor, SourceKind};
use crate::core::error::{FetchError, Result};
use crate::internal::url_utils;

/// Characters replaced by `_` in cvs cache names.
const CVS_UNSAFE_CHARS: &[char] = &['/', '@', '#', '%', '.', '-'];

pub(super) fn parse(protocol: Protocol, source: &mut SourceDescriptor) -> Result<()> {
    match protocol {
        Protocol::Http | Protocol::Ftp => parse_plain(source),
        Protocol::Patchwork => parse_patchwork(source),
        Protocol::Git => parse_git(source),
        Protocol::Cvs => parse_cvs(source)?,
        Protocol::File => parse_file(source),
    }
    Ok(())
}

fn parse_plain(source: &mut SourceDescriptor) {
    source.kind = SourceKind::Plain {
        compression: Compression::from_extension(&source.ext),
    };
}

fn parse_patchwork(source: &mut SourceDescriptor) {
    let rest = source.url.strip_prefix("pw").unwrap_or(&source.url);
    source.kind = SourceKind::Patchwork {
        http_url: format!("http{}", rest),
    };
}

fn parse_git(source: &mut SourceDescriptor) {
    let (base, operators) = query::split(&source.url);
    let (path, file) = url_utils::split_dirname(base);
    let (name, ext) = url_utils::split_ext(file);

    source.path = path.to_string();
    source.file = file.to_string();
    source.name = name.to_string();
    source.ext = ext.to_string();
    source.local = source.local_prefix.join("git").join(file);
    source.symlink = source.local.clone();
    source.kind = SourceKind::Git {
        args: operators.iter().map(|op| op.raw().to_string()).collect(),
    };
}

fn parse_cvs(source: &mut SourceDescriptor) -> Result<()> {
    let cvs = CvsSource::parse(&source.url)?;

    source.file = cvs.cache_name();
    source.local = source.local_prefix.join("cvs").join(&source.file);
    source.symlink = match &cvs.src_prefix {
        Some(prefix) => source.local.join(prefix),
        None => source.local.clone(),
    };
    source.kind = SourceKind::Cvs(cvs);
    Ok(())
}

fn parse_file(source: &mut SourceDescriptor) {
    source.symlink = source.local.clone();
    source.kind = SourceKind::File;
}

/// A `cvs://host/path[?module=..][?src-prefix=..][?tag=..|?date=..]` reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CvsSource {
    /// `:host:/path`, ready for `cvs -d`
    pub cvsroot: String,
    pub module: Option<String>,
    pub tag: Option<String>,
    pub date: Option<String>,
    pub src_prefix: Option<String>,
    #[serde(skip)]
    repository: String,
}

impl CvsSource {
    /// Parse and validate a cvs reference.
    ///
    /// Operators other than the checkout parameters (`update`, `reset`) are
    /// left for the downloader.
    pub fn parse(reference: &str) -> Result<Self> {
        let invalid = || FetchError::InvalidCvsUrl(reference.to_string());

        let (base, operators) = query::split(reference);
        let rest = base.strip_prefix("cvs://").ok_or_else(invalid)?;
        let slash = rest.find('/').ok_or_else(invalid)?;
        let (host, path) = rest.split_at(slash);
        if host.is_empty() || path.len() < 2 {
            return Err(invalid());
        }

        // A connection method (`pserver:`) is not part of the cache name.
        let repository = match host.split_once(':') {
            Some((_, login)) => format!("{}{}", login, path),
            None => format!("{}{}", host, path),
        };

        let mut source = Self {
            cvsroot: format!(":{}:{}", host, path),
            module: None,
            tag: None,
            date: None,
            src_prefix: None,
            repository,
        };

        for op in &operators {
            let slot = match op.key() {
                "module" => &mut source.module,
                "src-prefix" => &mut source.src_prefix,
                "tag" => &mut source.tag,
                "date" => &mut source.date,
                _ => continue,
            };
            *slot = Some(required_value(op)?.to_string());
        }

        if source.tag.is_some() && source.date.is_some() {
            return Err(FetchError::MutuallyExclusiveOption {
                url: reference.to_string(),
                first: "date",
                second: "tag",
            });
        }

        Ok(source)
    }

    /// Single-segment cache name: repository, then module, tag and date in
    /// that fixed order, with path-unsafe characters replaced by `_`.
    pub fn cache_name(&self) -> String {
        let mut name = self.repository.clone();
        for part in [&self.module, &self.tag, &self.date].into_iter().flatten() {
            name.push('_');
            name.push_str(part);
        }
        name.replace(CVS_UNSAFE_CHARS, "_")
    }
}

fn required_value(op: &Operator) -> Result<&str> {
    op.value().ok_or_else(|| FetchError::InvalidCvsOption {
        key: op.key().to_string(),
        operator: op.raw().to_string(),
    })
}
