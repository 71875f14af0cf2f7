use crate::config::HashAlgorithm;
use anyhow::{Context, Result};
use md5::{Digest, Md5};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use xxhash_rust::xxh3::{Xxh3, xxh3_128};

/// Length of a rendered digest in hex characters (128 bits).
pub const DIGEST_HEX_LEN: usize = 32;

/// Block size used when none is configured (1 MiB).
pub const DEFAULT_BLOCK_SIZE: usize = 1024 * 1024;

/// Incremental state for either supported digest
enum StreamHasher {
    Md5(Md5),
    Xxh3(Box<Xxh3>),
}

impl StreamHasher {
    fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Md5 => Self::Md5(Md5::new()),
            HashAlgorithm::Xxh3 => Self::Xxh3(Box::new(Xxh3::new())),
        }
    }

    fn update(&mut self, data: &[u8]) {
        match self {
            Self::Md5(hasher) => hasher.update(data),
            Self::Xxh3(hasher) => hasher.update(data),
        }
    }

    fn finish(self) -> u128 {
        match self {
            Self::Md5(hasher) => u128::from_be_bytes(hasher.finalize().into()),
            Self::Xxh3(hasher) => hasher.digest128(),
        }
    }
}

/// Hash an in-memory buffer with the default algorithm.
#[must_use]
pub fn hash_bytes(data: &[u8]) -> String {
    hash_bytes_with(HashAlgorithm::default(), data)
}

/// Hash an in-memory buffer.
#[must_use]
pub fn hash_bytes_with(algorithm: HashAlgorithm, data: &[u8]) -> String {
    let digest = match algorithm {
        HashAlgorithm::Md5 => u128::from_be_bytes(Md5::digest(data).into()),
        HashAlgorithm::Xxh3 => xxh3_128(data),
    };
    format_digest(digest)
}

/// Hash a file by feeding it to the hasher one block at a time.
///
/// Memory use is bounded by `block_size` regardless of the file size.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or a read fails.
pub fn hash_file_streaming(
    path: &Path,
    algorithm: HashAlgorithm,
    block_size: usize,
) -> Result<String> {
    let mut file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut hasher = StreamHasher::new(algorithm);
    let mut buffer = vec![0u8; block_size.max(1)];

    loop {
        let bytes_read = match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()));
            }
        };
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format_digest(hasher.finish()))
}

/// Whether `s` looks like a digest produced by this module.
#[must_use]
pub fn is_valid_digest(s: &str) -> bool {
    s.len() == DIGEST_HEX_LEN && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

fn format_digest(hash: u128) -> String {
    format!("{hash:032x}")
}
