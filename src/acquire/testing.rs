//! Recording VCS fake for unit tests.

use std::cell::RefCell;
use std::path::Path;

use super::vcs::{CvsRepository, GitRepository, ResetMode, Vcs};
use crate::core::error::Result;

#[derive(Default)]
pub(crate) struct RecordingVcs {
    git_valid: bool,
    cvs_valid: bool,
    git: RefCell<Vec<String>>,
    cvs: RefCell<Vec<String>>,
}

impl RecordingVcs {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_git_valid(mut self, valid: bool) -> Self {
        self.git_valid = valid;
        self
    }

    pub(crate) fn with_cvs_valid(mut self, valid: bool) -> Self {
        self.cvs_valid = valid;
        self
    }
}

pub(crate) fn git_calls(vcs: &RecordingVcs) -> Vec<String> {
    vcs.git.borrow().clone()
}

pub(crate) fn cvs_calls(vcs: &RecordingVcs) -> Vec<String> {
    vcs.cvs.borrow().clone()
}

impl Vcs for RecordingVcs {
    fn git(&self, _path: &Path) -> Box<dyn GitRepository + '_> {
        Box::new(RecordingGit {
            valid: self.git_valid,
            log: &self.git,
        })
    }

    fn cvs(&self, _path: &Path, src_prefix: Option<&str>) -> Box<dyn CvsRepository + '_> {
        if let Some(prefix) = src_prefix {
            self.cvs.borrow_mut().push(format!("src-prefix {}", prefix));
        }
        Box::new(RecordingCvs {
            valid: self.cvs_valid,
            log: &self.cvs,
        })
    }
}

struct RecordingGit<'a> {
    valid: bool,
    log: &'a RefCell<Vec<String>>,
}

impl RecordingGit<'_> {
    fn record(&self, call: String) -> Result<()> {
        self.log.borrow_mut().push(call);
        Ok(())
    }
}

impl GitRepository for RecordingGit<'_> {
    fn valid(&self) -> bool {
        self.valid
    }

    fn clone_from(&self, url: &str) -> Result<()> {
        self.record(format!("clone {}", url))
    }

    fn clean(&self, flags: &[&str]) -> Result<()> {
        self.record(format!("clean {}", flags.join(" ")))
    }

    fn reset(&self, mode: ResetMode) -> Result<()> {
        self.record(format!("reset {}", mode.flag()))
    }

    fn checkout(&self, reference: &str) -> Result<()> {
        self.record(format!("checkout {}", reference))
    }

    fn pull(&self) -> Result<()> {
        self.record("pull".to_string())
    }

    fn fetch(&self) -> Result<()> {
        self.record("fetch".to_string())
    }

    fn submodule(&self, name: &str) -> Result<()> {
        self.record(format!("submodule {}", name))
    }
}

struct RecordingCvs<'a> {
    valid: bool,
    log: &'a RefCell<Vec<String>>,
}

impl CvsRepository for RecordingCvs<'_> {
    fn valid(&self) -> bool {
        self.valid
    }

    fn checkout(
        &self,
        cvsroot: &str,
        module: Option<&str>,
        tag: Option<&str>,
        date: Option<&str>,
    ) -> Result<()> {
        self.log.borrow_mut().push(format!(
            "checkout {} module={} tag={} date={}",
            cvsroot,
            module.unwrap_or("-"),
            tag.unwrap_or("-"),
            date.unwrap_or("-")
        ));
        Ok(())
    }

    fn update(&self) -> Result<()> {
        self.log.borrow_mut().push("update".to_string());
        Ok(())
    }

    fn reset(&self) -> Result<()> {
        self.log.borrow_mut().push("reset".to_string());
        Ok(())
    }
}
