//! Version control collaborators
//!
//! The git and cvs downloaders decide *what* to run and in which order; the
//! traits here do the running. [`SystemVcs`] spawns the real `git` and `cvs`
//! programs. Working copies under the cache root are tool-owned: `clean` and
//! `reset` discard local edits without asking.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::str::FromStr;

use crate::core::error::{FetchError, Result};
use crate::core::output;
use crate::internal::progress::{self, ProgressGuard};

/// `git reset` modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResetMode {
    Soft,
    Mixed,
    #[default]
    Hard,
    Merge,
    Keep,
}

impl ResetMode {
    pub fn flag(&self) -> &'static str {
        match self {
            Self::Soft => "--soft",
            Self::Mixed => "--mixed",
            Self::Hard => "--hard",
            Self::Merge => "--merge",
            Self::Keep => "--keep",
        }
    }
}

impl FromStr for ResetMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "soft" => Ok(Self::Soft),
            "mixed" => Ok(Self::Mixed),
            "hard" => Ok(Self::Hard),
            "merge" => Ok(Self::Merge),
            "keep" => Ok(Self::Keep),
            other => Err(format!("unknown reset mode: {}", other)),
        }
    }
}

/// A git working copy at a fixed path.
pub trait GitRepository {
    /// Whether the path holds a usable repository.
    fn valid(&self) -> bool;
    /// Clone `url` into the repository path.
    fn clone_from(&self, url: &str) -> Result<()>;
    fn clean(&self, flags: &[&str]) -> Result<()>;
    fn reset(&self, mode: ResetMode) -> Result<()>;
    fn checkout(&self, reference: &str) -> Result<()>;
    fn pull(&self) -> Result<()>;
    fn fetch(&self) -> Result<()>;
    fn submodule(&self, name: &str) -> Result<()>;
}

/// A cvs checkout at a fixed path.
pub trait CvsRepository {
    fn valid(&self) -> bool;
    fn checkout(
        &self,
        cvsroot: &str,
        module: Option<&str>,
        tag: Option<&str>,
        date: Option<&str>,
    ) -> Result<()>;
    fn update(&self) -> Result<()>;
    fn reset(&self) -> Result<()>;
}

/// Factory for working-copy handles.
pub trait Vcs {
    fn git(&self, path: &Path) -> Box<dyn GitRepository + '_>;
    fn cvs(&self, path: &Path, src_prefix: Option<&str>) -> Box<dyn CvsRepository + '_>;
}

/// Spawns the system `git` and `cvs` binaries.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemVcs;

impl Vcs for SystemVcs {
    fn git(&self, path: &Path) -> Box<dyn GitRepository + '_> {
        Box::new(GitCli {
            path: path.to_path_buf(),
        })
    }

    fn cvs(&self, path: &Path, src_prefix: Option<&str>) -> Box<dyn CvsRepository + '_> {
        Box::new(CvsCli {
            path: path.to_path_buf(),
            src_prefix: src_prefix.map(str::to_string),
        })
    }
}

/// Run a VCS command, capturing stderr for the error message.
fn run(tool: &'static str, args: &[&str], dir: &Path) -> Result<()> {
    output::trace(&format!("{} {} ({})", tool, args.join(" "), dir.display()));

    let pb = progress::create_spinner(&format!("{} {}", tool, args.first().unwrap_or(&"")));
    let _guard = ProgressGuard::new(&pb);

    let result = Command::new(tool)
        .args(args)
        .current_dir(dir)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output();

    let failed = |stderr: String| FetchError::VcsCommandFailed {
        tool,
        command: args.join(" "),
        dir: dir.to_path_buf(),
        stderr,
    };

    match result {
        Ok(out) if out.status.success() => Ok(()),
        Ok(out) => Err(failed(String::from_utf8_lossy(&out.stderr).trim().to_string())),
        Err(e) => Err(failed(format!("failed to run {}: {}", tool, e))),
    }
}

/// Whether a command exits zero, output discarded.
fn succeeds(tool: &str, args: &[&str], dir: &Path) -> bool {
    Command::new(tool)
        .args(args)
        .current_dir(dir)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

struct GitCli {
    path: PathBuf,
}

impl GitCli {
    fn git(&self, args: &[&str]) -> Result<()> {
        run("git", args, &self.path)
    }
}

impl GitRepository for GitCli {
    fn valid(&self) -> bool {
        self.path.join(".git").exists() && succeeds("git", &["rev-parse", "HEAD"], &self.path)
    }

    fn clone_from(&self, url: &str) -> Result<()> {
        let dest = self
            .path
            .to_str()
            .ok_or_else(|| FetchError::Config("destination path contains invalid UTF-8".into()))?;
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        std::fs::create_dir_all(parent)?;
        run("git", &["clone", "--", url, dest], parent)
    }

    fn clean(&self, flags: &[&str]) -> Result<()> {
        let mut args = vec!["clean"];
        args.extend_from_slice(flags);
        self.git(&args)
    }

    fn reset(&self, mode: ResetMode) -> Result<()> {
        self.git(&["reset", mode.flag()])
    }

    fn checkout(&self, reference: &str) -> Result<()> {
        self.git(&["checkout", reference])
    }

    fn pull(&self) -> Result<()> {
        self.git(&["pull"])
    }

    fn fetch(&self) -> Result<()> {
        self.git(&["fetch"])
    }

    fn submodule(&self, name: &str) -> Result<()> {
        self.git(&["submodule", "update", "--init", "--", name])
    }
}

struct CvsCli {
    path: PathBuf,
    src_prefix: Option<String>,
}

impl CvsCli {
    /// Directory holding the `CVS/` admin files.
    fn work_dir(&self) -> PathBuf {
        match &self.src_prefix {
            Some(prefix) => self.path.join(prefix),
            None => self.path.clone(),
        }
    }
}

impl CvsRepository for CvsCli {
    fn valid(&self) -> bool {
        let dir = self.work_dir();
        dir.join("CVS").is_dir() && succeeds("cvs", &["-n", "-q", "update"], &dir)
    }

    fn checkout(
        &self,
        cvsroot: &str,
        module: Option<&str>,
        tag: Option<&str>,
        date: Option<&str>,
    ) -> Result<()> {
        let mut args = vec!["-z", "9", "-d", cvsroot, "checkout"];
        if let Some(tag) = tag {
            args.extend(["-r", tag]);
        }
        if let Some(date) = date {
            args.extend(["-D", date]);
        }
        if let Some(module) = module {
            args.push(module);
        }
        run("cvs", &args, &self.path)
    }

    fn update(&self) -> Result<()> {
        run("cvs", &["-z", "9", "-q", "update"], &self.work_dir())
    }

    fn reset(&self) -> Result<()> {
        run("cvs", &["-z", "9", "-q", "update", "-A", "-C"], &self.work_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_mode_parse() {
        assert_eq!("hard".parse::<ResetMode>(), Ok(ResetMode::Hard));
        assert_eq!("soft".parse::<ResetMode>(), Ok(ResetMode::Soft));
        assert!("sideways".parse::<ResetMode>().is_err());
        assert_eq!(ResetMode::default(), ResetMode::Hard);
        assert_eq!(ResetMode::Mixed.flag(), "--mixed");
    }

    #[test]
    fn test_git_invalid_for_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!SystemVcs.git(dir.path()).valid());
    }

    #[test]
    fn test_cvs_invalid_without_admin_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!SystemVcs.cvs(dir.path(), Some("src")).valid());
    }

    #[test]
    fn test_run_missing_tool_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let result = run("definitely-not-a-vcs-tool", &["status"], dir.path());
        assert!(matches!(result, Err(FetchError::VcsCommandFailed { .. })));
    }
}
