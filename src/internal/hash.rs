//! File digest helpers
//!
//! Computes hex digests for every algorithm a hash spec may name.

use sha2::Digest;
use std::fmt;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// Chunk size for reading files during hashing (1MB)
const CHUNK_SIZE: usize = 1024 * 1024;

/// Supported hash algorithms, named as they appear in hash specs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    Sha3_256,
    Sha3_512,
    Blake3,
}

impl HashAlgorithm {
    pub const ALL: [HashAlgorithm; 9] = [
        Self::Md5,
        Self::Sha1,
        Self::Sha224,
        Self::Sha256,
        Self::Sha384,
        Self::Sha512,
        Self::Sha3_256,
        Self::Sha3_512,
        Self::Blake3,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha224 => "sha224",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
            Self::Sha3_256 => "sha3_256",
            Self::Sha3_512 => "sha3_512",
            Self::Blake3 => "blake3",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a spec names an algorithm we cannot compute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAlgorithm(pub String);

impl FromStr for HashAlgorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| UnknownAlgorithm(s.to_string()))
    }
}

/// Compute the lowercase hex digest of a file.
pub fn file_digest(file: &Path, algorithm: HashAlgorithm) -> std::io::Result<String> {
    let mut f = std::fs::File::open(file)?;

    match algorithm {
        HashAlgorithm::Md5 => digest_reader::<md5::Md5>(&mut f),
        HashAlgorithm::Sha1 => digest_reader::<sha1::Sha1>(&mut f),
        HashAlgorithm::Sha224 => digest_reader::<sha2::Sha224>(&mut f),
        HashAlgorithm::Sha256 => digest_reader::<sha2::Sha256>(&mut f),
        HashAlgorithm::Sha384 => digest_reader::<sha2::Sha384>(&mut f),
        HashAlgorithm::Sha512 => digest_reader::<sha2::Sha512>(&mut f),
        HashAlgorithm::Sha3_256 => digest_reader::<sha3::Sha3_256>(&mut f),
        HashAlgorithm::Sha3_512 => digest_reader::<sha3::Sha3_512>(&mut f),
        HashAlgorithm::Blake3 => blake3_reader(&mut f),
    }
}

/// Digest using any RustCrypto hasher
fn digest_reader<D: Digest>(reader: &mut impl Read) -> std::io::Result<String> {
    let mut hasher = D::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];

    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// BLAKE3 (separate implementation due to different API)
fn blake3_reader(reader: &mut impl Read) -> std::io::Result<String> {
    let mut hasher = blake3::Hasher::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];

    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(hasher.finalize().to_hex().to_string())
}
