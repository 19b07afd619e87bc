//! Plain downloads (http, https, ftp, patchwork)
//!
//! http and https go through ureq; ftp candidates use a passive binary RETR
//! with suppaftp. Both stream through the same chunked copy and status line.
//!
//! A file already in the cache is trusted as-is. Otherwise the resource is
//! streamed straight into the cache path. A transfer error removes the
//! partial file and reports `false` so the next mirror can be tried. A
//! completed transfer must pass its checksum; a mismatch is fatal.

use std::io::{Read, Write};
use std::net::ToSocketAddrs;
use std::path::Path;

use suppaftp::FtpStream;
use suppaftp::types::FileType;

use crate::acquire::verify;
use crate::core::config::{self, Config, Options};
use crate::core::error::{FetchError, Result};
use crate::core::output;
use crate::internal::fs_utils;
use crate::internal::progress::TransferStatus;

/// Transfer chunk size (256 KiB)
const CHUNK_SIZE: usize = 256 * 1024;

/// Default FTP control port
const FTP_PORT: u16 = 21;

/// GitHub API prefix whose URLs need the release tarball path appended
const GITHUB_API: &str = "https://api.github.com";

/// Download `url` to `local` unless it is already cached.
///
/// Returns `Ok(false)` for a recoverable transport failure and `Err` for a
/// checksum failure or a transfer that did not produce a regular file.
pub fn download(url: &str, local: &Path, config: &Config, options: &Options) -> Result<bool> {
    if local.exists() {
        return Ok(true);
    }

    let url = request_url(url, config);
    let dst = fs_utils::display_relative(local);
    output::notice(&format!("download: {} -> {}", url, dst));

    if options.dry_run() {
        return Ok(true);
    }

    if let Err(e) = transfer(&url, local, &dst) {
        output::notice(&e.to_string());
        if let Err(rm) = fs_utils::remove_if_exists(local) {
            output::warning(&format!("cannot remove {}: {}", dst, rm));
        }
        return if e.is_recoverable() { Ok(false) } else { Err(e) };
    }

    if !local.is_file() {
        return Err(FetchError::NotAFile(local.to_path_buf()));
    }

    let label = local
        .file_name()
        .map(|f| f.to_string_lossy().to_string())
        .unwrap_or_default();
    if !verify::verify(&label, local, config, false)? {
        // The verifier keeps the file; a known-bad download never stays cached.
        fs_utils::remove_if_exists(local)?;
        return Err(FetchError::ChecksumFailure { file: dst });
    }

    Ok(true)
}

/// The URL actually requested for a candidate.
///
/// `pw://` is fetched over http, and GitHub API URLs get the release
/// tarball path for `%{version}` joined on.
fn request_url(url: &str, config: &Config) -> String {
    if let Some(rest) = url.strip_prefix("pw://") {
        return format!("http://{}", rest);
    }
    if url.starts_with(GITHUB_API) {
        let tarball = config.expand("tarball/%{version}");
        if let Ok(joined) = url::Url::parse(url).and_then(|u| u.join(&tarball)) {
            return joined.to_string();
        }
    }
    url.to_string()
}

/// Stream `url` into `dest`, returning the number of bytes written.
fn transfer(url: &str, dest: &Path, dst: &str) -> Result<u64> {
    let failed = |message: String| FetchError::TransportFailure {
        url: url.to_string(),
        message,
    };

    let have = if url.starts_with("ftp://") {
        ftp_transfer(url, dest, dst).map_err(failed)?
    } else {
        http_transfer(url, dest, dst).map_err(failed)?
    };

    output::trace(&format!("downloaded {} ({} bytes)", dst, have));
    Ok(have)
}

fn http_transfer(url: &str, dest: &Path, dst: &str) -> std::result::Result<u64, String> {
    let response = ureq::get(url)
        .timeout(config::http_timeout())
        .call()
        .map_err(|e| e.to_string())?;

    let length = response
        .header("content-length")
        .and_then(|s| s.trim().parse::<u64>().ok());

    let mut reader = response.into_reader();
    copy_to_file(&mut reader, dest, dst, length).map_err(|e| e.to_string())
}

/// Anonymous (or URL-credentialed) binary RETR over passive FTP.
fn ftp_transfer(url: &str, dest: &Path, dst: &str) -> std::result::Result<u64, String> {
    let parsed = url::Url::parse(url).map_err(|e| e.to_string())?;
    let host = parsed.host_str().ok_or("missing host")?;
    let port = parsed.port().unwrap_or(FTP_PORT);
    let addr = (host, port)
        .to_socket_addrs()
        .map_err(|e| e.to_string())?
        .next()
        .ok_or_else(|| format!("cannot resolve {}", host))?;

    let mut ftp = FtpStream::connect_timeout(addr, config::http_timeout())
        .map_err(|e| e.to_string())?;

    let user = match parsed.username() {
        "" => "anonymous",
        user => user,
    };
    let password = parsed.password().unwrap_or("anonymous@");
    ftp.login(user, password).map_err(|e| e.to_string())?;
    ftp.transfer_type(FileType::Binary)
        .map_err(|e| e.to_string())?;

    let path = parsed.path();
    // SIZE is optional on many servers; without it there is no percentage
    let length = ftp.size(path).ok().map(|n| n as u64);

    let mut stream = ftp.retr_as_stream(path).map_err(|e| e.to_string())?;
    let have = copy_to_file(&mut stream, dest, dst, length).map_err(|e| e.to_string())?;
    ftp.finalize_retr_stream(stream)
        .map_err(|e| e.to_string())?;
    let _ = ftp.quit();

    Ok(have)
}

/// Copy `reader` into a new file at `dest` in fixed chunks, driving the
/// status line.
fn copy_to_file(
    reader: &mut impl Read,
    dest: &Path,
    dst: &str,
    length: Option<u64>,
) -> std::io::Result<u64> {
    let mut file = std::fs::File::create(dest)?;
    let mut buffer = vec![0u8; CHUNK_SIZE];
    let mut have = 0u64;
    let mut status = TransferStatus::new(dst, length);

    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        file.write_all(&buffer[..n])?;
        have += n as u64;
        status.update(have);
    }

    file.flush()?;
    Ok(have)
}
