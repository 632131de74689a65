//! Content hashing of rendered surfaces.
//!
//! Two renders are considered visually identical when their SHA-256 digests
//! match, which is how resize idempotence and deterministic compositing are
//! checked.

use sha2::{Digest, Sha256};

use crate::frame::FrameBuffer;

/// A SHA-256 digest of a frame buffer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentHash {
    bytes: [u8; 32],
}

impl ContentHash {
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Hash dimensions, format and pixels of a frame buffer.
pub fn hash_frame(frame: &FrameBuffer) -> ContentHash {
    let mut hasher = Sha256::new();
    hasher.update(frame.width.to_le_bytes());
    hasher.update(frame.height.to_le_bytes());
    hasher.update([frame.format as u8]);
    hasher.update(&frame.data);
    ContentHash {
        bytes: hasher.finalize().into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;

    #[test]
    fn test_hash_deterministic() {
        let a = FrameBuffer::solid(10, 10, &Color::TRAIL);
        let b = FrameBuffer::solid(10, 10, &Color::TRAIL);
        assert_eq!(hash_frame(&a), hash_frame(&b));
    }

    #[test]
    fn test_hash_sensitive_to_size_and_content() {
        let base = hash_frame(&FrameBuffer::solid(10, 10, &Color::RED));
        assert_ne!(base, hash_frame(&FrameBuffer::solid(10, 10, &Color::BLUE)));
        assert_ne!(base, hash_frame(&FrameBuffer::solid(20, 5, &Color::RED)));
    }

    #[test]
    fn test_hash_hex_format() {
        let hex = hash_frame(&FrameBuffer::solid(2, 2, &Color::BLACK)).to_hex();
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
