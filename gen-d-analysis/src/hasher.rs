//! Hasher (§4.3): reduces canonical text (and raw docstring text) to a
//! fixed-width SHA-256 hex digest.

use gen_d_core::errors::HashError;
use sha2::{Digest, Sha256};

use crate::normalizer::normalize;

/// `semantic_fingerprint(source) = HEX(SHA256(UTF8(normalize(source))))`.
pub fn semantic_fingerprint(source: &str) -> Result<String, HashError> {
    let canonical = normalize(source)?;
    Ok(hex_sha256(canonical.as_bytes()))
}

/// `doc_fingerprint(text) = HEX(SHA256(UTF8(strip(text))))`, where `strip`
/// removes only leading/trailing ASCII whitespace.
pub fn doc_fingerprint(text: &str) -> String {
    let stripped = text.trim_matches(|c: char| c.is_ascii_whitespace());
    hex_sha256(stripped.as_bytes())
}

fn hex_sha256(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semantic_fingerprint_is_64_lowercase_hex() {
        let fp = semantic_fingerprint("def f():\n    return 1\n").unwrap();
        assert_eq!(fp.len(), 64);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn semantic_fingerprint_is_deterministic() {
        let src = "def f():\n    return 1\n";
        assert_eq!(semantic_fingerprint(src).unwrap(), semantic_fingerprint(src).unwrap());
    }

    #[test]
    fn semantic_fingerprint_ignores_reformatting() {
        let a = semantic_fingerprint("def f():\n    return a+b\n").unwrap();
        let b = semantic_fingerprint("def f():\n\n    return  a + b  # add\n").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn semantic_fingerprint_detects_logic_change() {
        let a = semantic_fingerprint("def f():\n    return a + b\n").unwrap();
        let b = semantic_fingerprint("def f():\n    return a - b\n").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn doc_fingerprint_strips_only_leading_trailing_whitespace() {
        let a = doc_fingerprint("  hello world  ");
        let b = doc_fingerprint("hello world");
        assert_eq!(a, b);
        let c = doc_fingerprint("hello   world");
        assert_ne!(a, c);
    }
}
