//! Git source synchronization
//!
//! `git://host/repo.git?branch=next?pull` keeps a working copy under the
//! cache root:
//!
//! 1. no repository yet: clone the base URL
//! 2. existing repository: `clean -f -d`, `reset --hard`, `checkout master`
//! 3. apply the operators left to right
//!
//! | operator | action |
//! |----------|--------|
//! | `branch=<ref>`, `checkout=<ref>` | checkout the ref |
//! | `pull` | pull |
//! | `submodule=<name>` | init and update the submodule |
//! | `fetch` | fetch remote refs |
//! | `reset[=<mode>]` | reset, hard unless a mode is given |
//!
//! Every step is logged; under dry-run nothing is executed.

use std::path::Path;

use super::vcs::{ResetMode, Vcs};
use crate::core::config::Options;
use crate::core::error::{FetchError, Result};
use crate::core::output;
use crate::internal::fs_utils;
use crate::source::query::{self, Operator};

/// Branch every existing working copy is reset to before operators run.
pub const DEFAULT_BRANCH: &str = "master";

/// A parsed git operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitOp {
    Checkout(String),
    Pull,
    Submodule(String),
    Fetch,
    Reset(ResetMode),
}

impl GitOp {
    /// Parse one operator. Unknown keys yield `None`.
    pub fn parse(op: &Operator) -> Result<Option<Self>> {
        let invalid = || FetchError::InvalidGitOption {
            key: op.key().to_string(),
            operator: op.raw().to_string(),
        };

        let parsed = match op.key() {
            "branch" | "checkout" => Self::Checkout(op.value().ok_or_else(invalid)?.to_string()),
            "submodule" => Self::Submodule(op.value().ok_or_else(invalid)?.to_string()),
            "pull" => Self::Pull,
            "fetch" => Self::Fetch,
            "reset" if op.is_flag() => Self::Reset(ResetMode::default()),
            "reset" => Self::Reset(
                op.value()
                    .ok_or_else(invalid)?
                    .parse()
                    .map_err(|_| invalid())?,
            ),
            _ => return Ok(None),
        };
        Ok(Some(parsed))
    }
}

/// Bring the working copy at `local` in line with `url`.
///
/// All operators are validated before anything touches the working copy.
pub fn download(url: &str, local: &Path, options: &Options, vcs: &dyn Vcs) -> Result<bool> {
    let (base, operators) = query::split(url);
    let mut ops = Vec::with_capacity(operators.len());
    for op in &operators {
        match GitOp::parse(op)? {
            Some(parsed) => ops.push(parsed),
            None => output::warning(&format!("git: ignoring unknown option: {}", op.raw())),
        }
    }

    let dry_run = options.dry_run();
    let rlp = fs_utils::display_relative(local);
    let repo = vcs.git(local);

    if !repo.valid() {
        output::notice(&format!("git: clone: {} -> {}", base, rlp));
        if !dry_run {
            repo.clone_from(base)?;
        }
    } else {
        output::notice(&format!(
            "git: reset: {} -> {} (clean, hard reset, {})",
            base, rlp, DEFAULT_BRANCH
        ));
        if !dry_run {
            repo.clean(&["-f", "-d"])?;
            repo.reset(ResetMode::Hard)?;
            repo.checkout(DEFAULT_BRANCH)?;
        }
    }

    for op in &ops {
        match op {
            GitOp::Checkout(reference) => {
                output::notice(&format!("git: checkout: {} => {}", base, reference));
                if !dry_run {
                    repo.checkout(reference)?;
                }
            }
            GitOp::Pull => {
                output::notice(&format!("git: pull: {}", base));
                if !dry_run {
                    repo.pull()?;
                }
            }
            GitOp::Submodule(name) => {
                output::notice(&format!("git: submodule: {} <= {}", base, name));
                if !dry_run {
                    repo.submodule(name)?;
                }
            }
            GitOp::Fetch => {
                output::notice(&format!("git: fetch: {} -> {}", base, rlp));
                if !dry_run {
                    repo.fetch()?;
                }
            }
            GitOp::Reset(mode) => {
                output::notice(&format!("git: reset: {} {}", base, mode.flag()));
                if !dry_run {
                    repo.reset(*mode)?;
                }
            }
        }
    }

    Ok(true)
}
