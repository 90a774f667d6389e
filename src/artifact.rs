// Copyright 2025 Erst Users
// SPDX-License-Identifier: Apache-2.0

//! Loading of hex-encoded contract creation code, as written by `solc --bin`.

use std::fs;
use std::path::Path;

/// EIP-3860 limit on creation code.
pub const MAX_INITCODE_SIZE: usize = 2 * 24 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("failed to read bytecode file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid bytecode hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
    #[error("bytecode is empty")]
    Empty,
    #[error("bytecode too large: {size} bytes (limit {limit})")]
    TooLarge { size: usize, limit: usize },
}

/// Trims whitespace and an optional `0x`/`0X` prefix from hex text.
pub fn strip_hex_prefix(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed)
}

/// Decode creation code from hex text. Surrounding whitespace and an
/// optional `0x` prefix are accepted.
pub fn decode_bytecode(text: &str) -> Result<Vec<u8>, ArtifactError> {
    let digits = strip_hex_prefix(text);

    if digits.is_empty() {
        return Err(ArtifactError::Empty);
    }

    let bytes = hex::decode(digits)?;
    if bytes.len() > MAX_INITCODE_SIZE {
        return Err(ArtifactError::TooLarge {
            size: bytes.len(),
            limit: MAX_INITCODE_SIZE,
        });
    }
    Ok(bytes)
}

pub fn load_bytecode_from_path(path: impl AsRef<Path>) -> Result<Vec<u8>, ArtifactError> {
    let text = fs::read_to_string(path)?;
    decode_bytecode(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_decode_with_and_without_prefix() {
        assert_eq!(decode_bytecode("0x5f80f3").unwrap(), vec![0x5f, 0x80, 0xf3]);
        assert_eq!(decode_bytecode("5f80f3\n").unwrap(), vec![0x5f, 0x80, 0xf3]);
        assert_eq!(decode_bytecode("0X5F80F3").unwrap(), vec![0x5f, 0x80, 0xf3]);
    }

    #[test]
    fn test_strip_hex_prefix() {
        assert_eq!(strip_hex_prefix(" 0xabcd\n"), "abcd");
        assert_eq!(strip_hex_prefix("0Xabcd"), "abcd");
        assert_eq!(strip_hex_prefix("abcd"), "abcd");
        assert_eq!(strip_hex_prefix("0x"), "");
    }

    #[test]
    fn test_decode_rejects_bad_input() {
        assert!(matches!(decode_bytecode("0x"), Err(ArtifactError::Empty)));
        assert!(matches!(
            decode_bytecode("0xzz"),
            Err(ArtifactError::InvalidHex(_))
        ));
        assert!(matches!(
            decode_bytecode("abc"),
            Err(ArtifactError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_decode_rejects_oversized_code() {
        let text = "00".repeat(MAX_INITCODE_SIZE + 1);
        match decode_bytecode(&text) {
            Err(ArtifactError::TooLarge { size, limit }) => {
                assert_eq!(size, MAX_INITCODE_SIZE + 1);
                assert_eq!(limit, MAX_INITCODE_SIZE);
            }
            other => panic!("expected TooLarge, got {:?}", other),
        }
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "0x6080604052").unwrap();

        let code = load_bytecode_from_path(file.path()).unwrap();
        assert_eq!(code, vec![0x60, 0x80, 0x60, 0x40, 0x52]);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_bytecode_from_path("/nonexistent/contract.bin").unwrap_err();
        assert!(err.to_string().starts_with("failed to read bytecode file"));
    }
}
