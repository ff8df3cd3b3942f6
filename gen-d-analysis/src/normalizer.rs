//! Normalizer (§4.2): reduces a callable's CST to canonical text, invariant
//! under blank lines, comments, and docstring edits but sensitive to every
//! other structural or lexical change.
//!
//! Tree-sitter has no canonical-printer / tree-mutation API the way a
//! LibCST-style library does, so rather than mutate-then-reprint, this walks
//! the CST once and serializes a reduced structural form directly, in a
//! single pass instead of building a separate intermediate tree first.

use gen_d_core::errors::NormalizeError;
use tree_sitter::Node;

use crate::parser;
use crate::python_syntax::docstring_text;

/// Produce the canonical text of a callable's source. `NormalizeError` only
/// if the input does not parse (§4.2).
pub fn normalize(callable_source_text: &str) -> Result<String, NormalizeError> {
    let tree = parser::parse(callable_source_text).map_err(NormalizeError::from)?;
    let mut out = String::new();
    serialize(&tree.root_node(), callable_source_text.as_bytes(), &mut out);
    Ok(out)
}

fn serialize(node: &Node, source: &[u8], out: &mut String) {
    if node.kind() == "comment" {
        return;
    }

    if node.child_count() == 0 {
        if node.is_named() {
            out.push('[');
            out.push_str(node.kind());
            out.push(':');
            out.push_str(node.utf8_text(source).unwrap_or(""));
            out.push(']');
        } else {
            out.push_str(node.kind());
        }
        return;
    }

    out.push('(');
    out.push_str(node.kind());

    let body_field = if node.kind() == "function_definition" || node.kind() == "class_definition" {
        node.child_by_field_name("body")
    } else {
        None
    };

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "comment" {
            continue;
        }
        out.push(' ');
        if let Some(body) = &body_field {
            if body.id() == child.id() {
                serialize_stripped_body(&child, source, out);
                continue;
            }
        }
        serialize(&child, source, out);
    }
    out.push(')');
}

/// Serialize a function/class body, dropping a leading bare-string docstring
/// statement (§4.2 step 1) and substituting a synthetic `pass` when that
/// leaves the body empty.
fn serialize_stripped_body(block: &Node, source: &[u8], out: &mut String) {
    let mut cursor = block.walk();
    let mut children: Vec<Node> = block.children(&mut cursor).filter(|c| c.kind() != "comment").collect();

    if let Some(first) = children.first() {
        if docstring_text(first, source).is_some() {
            children.remove(0);
        }
    }

    out.push('(');
    out.push_str(block.kind());
    if children.is_empty() {
        out.push_str(" (pass_statement pass)");
    } else {
        for child in children {
            out.push(' ');
            serialize(&child, source, out);
        }
    }
    out.push(')');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_are_invariant() {
        let a = normalize("def f():\n    return a+b\n").unwrap();
        let b = normalize("def f():\n\n\n    return  a + b\n").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn comments_are_invariant() {
        let a = normalize("def f():\n    return a+b\n").unwrap();
        let b = normalize("def f():\n    return a+b  # add them\n").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn docstring_edits_are_invariant() {
        let a = normalize("def f():\n    \"\"\"old\"\"\"\n    return 1\n").unwrap();
        let b = normalize("def f():\n    \"\"\"brand new text\"\"\"\n    return 1\n").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn docstring_only_body_collapses_like_pass() {
        let a = normalize("def f():\n    \"\"\"just a doc\"\"\"\n").unwrap();
        let b = normalize("def f():\n    pass\n").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn identifier_rename_changes_output() {
        let a = normalize("def f():\n    return a\n").unwrap();
        let b = normalize("def f():\n    return b\n").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn operator_change_changes_output() {
        let a = normalize("def f():\n    return a + b\n").unwrap();
        let b = normalize("def f():\n    return a - b\n").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn statement_reordering_changes_output() {
        let a = normalize("def f():\n    x = 1\n    y = 2\n    return x + y\n").unwrap();
        let b = normalize("def f():\n    y = 2\n    x = 1\n    return x + y\n").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn nested_class_docstring_is_stripped_too() {
        let a = normalize("def f():\n    class C:\n        \"\"\"doc\"\"\"\n        pass\n").unwrap();
        let b = normalize("def f():\n    class C:\n        pass\n").unwrap();
        assert_eq!(a, b);
    }
}
