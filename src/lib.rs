//! Source fetching for LevitateOS builds
//!
//! A build description names its sources with protocol-prefixed references.
//! This crate turns a reference into a verified file or an up-to-date working
//! copy in the local source cache.
//!
//! # Example
//!
//! ```no_run
//! use levitate_fetch::{Config, Options, fetch, resolve};
//!
//! let mut config = Config::new();
//! config.set_define("_sourcedir", "/var/cache/sources");
//! config.set_hash("bash-5.2.26.tar.gz", "sha256 a139c166df7ff4471c5e0733051642ee5556c1cc8a4a78f145583c5c81ab32fb");
//!
//! let source = resolve("https://ftp.gnu.org/gnu/bash/bash-5.2.26.tar.gz", "_sourcedir", &config)?;
//! fetch(&source.url, &source.local, &Options::default(), &config)?;
//! println!("{}", source.symlink.display());
//! # Ok::<(), levitate_fetch::FetchError>(())
//! ```
//!
//! # Reference Syntax
//!
//! `scheme://host/path[?op1[?op2...]]`
//!
//! - `http`, `https`, `ftp` - plain downloads, verified against the hash table
//! - `pw` - patchwork patches, fetched over http
//! - `git` - `?branch=`, `?checkout=`, `?pull`, `?fetch`, `?submodule=`, `?reset[=mode]`
//! - `cvs` - `?module=`, `?src-prefix=`, `?tag=` or `?date=`, `?update`, `?reset`
//! - `file` - local trees used in place
//!
//! Operators are applied left to right and may repeat.
//!
//! # Cache
//!
//! Cache roots come from a define (conventionally `_sourcedir`), a `:`
//! separated list searched in order. Git and cvs working copies live under
//! `git/` and `cvs/` in the chosen root and are owned by this tool: local
//! edits are discarded on the next fetch.

pub mod acquire;
pub mod core;
mod internal;
pub mod source;

pub use acquire::{Fetcher, fetch};
pub use core::config::{Config, Options};
pub use core::error::{FetchError, Result};
pub use core::output;
pub use internal::hash::HashAlgorithm;
pub use internal::hash::file_digest;
pub use source::{Compression, Protocol, SourceDescriptor, SourceKind, resolve};
