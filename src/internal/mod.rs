//! Internal utility modules
//!
//! Shared by the resolver and the downloaders; not part of the public API.

pub mod fs_utils;
pub mod hash;
pub mod progress;
pub mod url_utils;
