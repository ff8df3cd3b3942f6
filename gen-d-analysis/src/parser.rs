//! Thin wrapper around `tree-sitter-python`, scoped to the one language
//! this crate supports.

use gen_d_core::errors::ParseError;
use tree_sitter::{Parser, Tree};

/// Parse Python source text into a tree-sitter CST.
///
/// Tree-sitter is error-tolerant and always returns a tree; a syntax error
/// surfaces as an error node somewhere in that tree, which we treat as a
/// `ParseError` per §7 (encoding and parse errors are not distinguished).
pub fn parse(source: &str) -> Result<Tree, ParseError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| ParseError::new("0:0", format!("failed to load grammar: {e}")))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ParseError::new("0:0", "tree-sitter returned no tree"))?;

    if tree.root_node().has_error() {
        let node = first_error_node(&tree.root_node()).unwrap_or_else(|| tree.root_node());
        let pos = node.start_position();
        return Err(ParseError::new(
            format!("{}:{}", pos.row + 1, pos.column + 1),
            "syntax error",
        ));
    }

    Ok(tree)
}

fn first_error_node<'a>(node: &tree_sitter::Node<'a>) -> Option<tree_sitter::Node<'a>> {
    if node.is_error() || node.is_missing() {
        return Some(*node);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = first_error_node(&child) {
            return Some(found);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_source() {
        let tree = parse("def f():\n    return 1\n").unwrap();
        assert!(!tree.root_node().has_error());
    }

    #[test]
    fn rejects_invalid_source() {
        let err = parse("def f(:\n").unwrap_err();
        assert!(err.message.contains("syntax error"));
    }

    #[test]
    fn empty_source_parses_to_empty_module() {
        let tree = parse("").unwrap();
        assert_eq!(tree.root_node().kind(), "module");
        assert_eq!(tree.root_node().child_count(), 0);
    }
}
