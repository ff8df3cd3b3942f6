//! Property tests for the hasher/normalizer pair (§8 properties 2-3):
//! determinism and whitespace/comment insensitivity.

use gen_d_analysis::semantic_fingerprint;
use proptest::prelude::*;

fn ident() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,8}"
}

fn literal() -> impl Strategy<Value = i64> {
    0i64..1000
}

proptest! {
    #[test]
    fn fingerprint_is_deterministic(name in ident(), n in literal()) {
        let source = format!("def {name}():\n    return {n}\n");
        let a = semantic_fingerprint(&source).unwrap();
        let b = semantic_fingerprint(&source).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn fingerprint_is_insensitive_to_blank_lines_and_comments(name in ident(), n in literal()) {
        let plain = format!("def {name}():\n    return {n}\n");
        let padded = format!("def {name}():\n\n    # a comment\n    return {n}\n\n");
        prop_assert_eq!(semantic_fingerprint(&plain).unwrap(), semantic_fingerprint(&padded).unwrap());
    }

    #[test]
    fn fingerprint_changes_with_literal(name in ident(), n in literal()) {
        let a = format!("def {name}():\n    return {n}\n");
        let b = format!("def {name}():\n    return {}\n", n + 1);
        prop_assert_ne!(semantic_fingerprint(&a).unwrap(), semantic_fingerprint(&b).unwrap());
    }

    #[test]
    fn fingerprint_is_stable_length_hex(name in ident(), n in literal()) {
        let source = format!("def {name}():\n    return {n}\n");
        let fp = semantic_fingerprint(&source).unwrap();
        prop_assert_eq!(fp.len(), 64);
        prop_assert!(fp.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
