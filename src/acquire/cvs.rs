//! CVS source synchronization
//!
//! The reference's `module`, `src-prefix`, `tag` and `date` operators shape
//! the initial checkout; `update` and `reset` act on an existing one.

use std::path::Path;

use super::vcs::Vcs;
use crate::core::config::Options;
use crate::core::error::Result;
use crate::core::output;
use crate::internal::fs_utils;
use crate::source::CvsSource;
use crate::source::query;

/// Check out or refresh the cvs working copy at `local`.
///
/// The reference is fully validated first, so a bad operator or a tag/date
/// clash fails before any checkout is attempted.
pub fn download(url: &str, local: &Path, options: &Options, vcs: &dyn Vcs) -> Result<bool> {
    let source = CvsSource::parse(url)?;
    let (base, operators) = query::split(url);

    let dry_run = options.dry_run();
    let rlp = fs_utils::display_relative(local);
    let repo = vcs.cvs(local, source.src_prefix.as_deref());

    if !repo.valid() {
        if !local.is_dir() {
            output::notice(&format!("Creating source directory: {}", rlp));
            if !dry_run {
                std::fs::create_dir_all(local)?;
            }
        }
        output::notice(&format!("cvs: checkout: {} -> {}", base, rlp));
        if !dry_run {
            repo.checkout(
                &source.cvsroot,
                source.module.as_deref(),
                source.tag.as_deref(),
                source.date.as_deref(),
            )?;
        }
    }

    for op in &operators {
        match op.key() {
            "update" => {
                output::notice(&format!("cvs: update: {}", base));
                if !dry_run {
                    repo.update()?;
                }
            }
            "reset" => {
                output::notice(&format!("cvs: reset: {}", base));
                if !dry_run {
                    repo.reset()?;
                }
            }
            _ => {}
        }
    }

    Ok(true)
}
