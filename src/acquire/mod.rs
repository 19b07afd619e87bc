//! Acquisition - populating the cache from a source reference
//!
//! [`Fetcher::fetch`] builds the candidate list (mirror bases first, then the
//! reference's own URLs) and hands each candidate to the downloader for its
//! protocol until one succeeds.
//!
//! ## Cache ownership
//!
//! One process owns a cache root at a time. Nothing here locks; two builds
//! racing on the same cache path is unsupported.
//!
//! ## Modes
//!
//! - **dry run**: log what would happen, write nothing, never fail for
//!   running out of candidates
//! - **downloads disabled**: the target must already be cached

pub mod cvs;
pub mod download;
pub mod file;
pub mod git;
pub mod vcs;
pub mod verify;

#[cfg(test)]
pub(crate) mod testing;

use std::path::Path;

use crate::core::config::{Config, Options};
use crate::core::error::{FetchError, Result};
use crate::core::output;
use crate::internal::{fs_utils, url_utils};
use crate::source::Protocol;

use vcs::{SystemVcs, Vcs};

/// Fetch `reference` into `local` using the system git and cvs clients.
pub fn fetch(reference: &str, local: &Path, options: &Options, config: &Config) -> Result<()> {
    Fetcher::new(config, options).fetch(reference, local)
}

/// Dispatches a fetch across candidates and downloaders.
pub struct Fetcher<'a> {
    config: &'a Config,
    options: &'a Options,
    vcs: &'a dyn Vcs,
}

impl<'a> Fetcher<'a> {
    pub fn new(config: &'a Config, options: &'a Options) -> Self {
        Self::with_vcs(config, options, &SystemVcs)
    }

    pub fn with_vcs(config: &'a Config, options: &'a Options, vcs: &'a dyn Vcs) -> Self {
        Self {
            config,
            options,
            vcs,
        }
    }

    /// Ordered candidate URLs: each mirror base joined with the reference's
    /// file name, then every whitespace-separated URL of the reference.
    /// Mirrors are skipped when the reference has no file name.
    pub fn candidates(&self, reference: &str) -> Vec<String> {
        let alternates: Vec<&str> = reference.split_whitespace().collect();
        let mut urls = Vec::new();

        if let Some(bases) = self.options.mirror_bases() {
            let file = alternates
                .first()
                .map(|first| url_utils::reference_file(first))
                .unwrap_or_default();
            // A bare base would fetch the mirror's index page, not the source
            if file.is_empty() {
                output::trace(&format!("no file name in {}, skipping mirrors", reference));
            } else {
                urls.extend(bases.iter().map(|base| url_utils::mirror_join(base, file)));
            }
        }

        urls.extend(alternates.into_iter().map(str::to_string));
        urls
    }

    /// Make `local` hold the source named by `reference`.
    pub fn fetch(&self, reference: &str, local: &Path) -> Result<()> {
        let dry_run = self.options.dry_run();
        let disabled = self.options.downloads_disabled();

        if let Some(parent) = local.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.is_dir() && !disabled {
                output::notice(&format!(
                    "Creating source directory: {}",
                    fs_utils::display_relative(parent)
                ));
            }
            output::output(&format!("making dir: {}", parent.display()));
            if !dry_run {
                fs_utils::ensure_parent_dir(local)?;
            }
        }

        if disabled {
            if !local.exists() {
                return Err(FetchError::SourceNotFound(local.to_path_buf()));
            }
            output::trace(&format!("downloads disabled, using {}", local.display()));
            return Ok(());
        }

        let urls = self.candidates(reference);
        output::trace(&format!("_url: {} -> {}", urls.join(","), local.display()));

        for url in &urls {
            let Some(protocol) = Protocol::from_reference(url) else {
                output::trace(&format!("no downloader for {}", url));
                continue;
            };
            if self.download(protocol, url, local)? {
                return Ok(());
            }
        }

        if dry_run {
            return Ok(());
        }
        Err(FetchError::AllMirrorsExhausted {
            url: reference.to_string(),
        })
    }

    fn download(&self, protocol: Protocol, url: &str, local: &Path) -> Result<bool> {
        match protocol {
            Protocol::Http | Protocol::Ftp | Protocol::Patchwork => {
                download::download(url, local, self.config, self.options)
            }
            Protocol::Git => git::download(url, local, self.options, self.vcs),
            Protocol::Cvs => cvs::download(url, local, self.options, self.vcs),
            Protocol::File => Ok(file::download(url, local)),
        }
    }
}
