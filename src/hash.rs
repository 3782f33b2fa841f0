//! Content addressing for embedded media.
//!
//! ENEX keys every `<en-media>` tag to its `<resource>` by the MD5 digest of
//! the media. Images travel through the pipeline as base64 text, and the
//! digest is taken from that text by decoding it, so the hash always agrees
//! with the payload written into the resource.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use md5::{Digest, Md5};

use crate::error::Result;

/// Encode raw bytes as standard (padded) base64.
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Compute the lowercase hex MD5 digest of a base64 payload.
///
/// Fails with [`Error::Format`](crate::Error::Format) if the payload is not
/// valid base64.
pub fn hash_base64(data: &str) -> Result<String> {
    let bytes = STANDARD.decode(data)?;
    Ok(hex_digest(&bytes))
}

/// Encode an image and compute its content hash.
///
/// Returns `(hash, base64)`. Identical bytes always produce identical hashes;
/// callers do not de-duplicate on them.
///
/// # Example
///
/// ```
/// use enexport::hash::hash_image;
///
/// let (hash, data) = hash_image(b"hello").unwrap();
/// assert_eq!(data, "aGVsbG8=");
/// assert_eq!(hash, "5d41402abc4b2a76b9719d911017c592");
/// ```
pub fn hash_image(bytes: &[u8]) -> Result<(String, String)> {
    let data = encode_base64(bytes);
    let hash = hash_base64(&data)?;
    Ok((hash, data))
}

fn hex_digest(bytes: &[u8]) -> String {
    hex::encode(Md5::digest(bytes))
}
