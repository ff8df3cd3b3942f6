//! Small Python-grammar helpers shared by the extractor and normalizer:
//! docstring detection (§4.1, §9 "exact structural check, not a regex") and
//! dotted-name assembly for call targets.

use tree_sitter::Node;

/// If `stmt` (a statement node, typically the first child of a function or
/// class body) is a bare string-literal expression and not an f-string,
/// return its content with the leading/trailing quote characters stripped.
/// Otherwise `None`.
pub fn docstring_text(stmt: &Node, source: &[u8]) -> Option<String> {
    if stmt.kind() != "expression_statement" {
        return None;
    }
    let mut cursor = stmt.walk();
    let children: Vec<Node> = stmt.named_children(&mut cursor).collect();
    if children.len() != 1 {
        return None;
    }
    string_literal_text(&children[0], source)
}

fn string_literal_text(node: &Node, source: &[u8]) -> Option<String> {
    match node.kind() {
        "string" => {
            if contains_interpolation(node) {
                return None;
            }
            Some(strip_quotes(&node.utf8_text(source).ok()?))
        }
        "concatenated_string" => {
            let mut cursor = node.walk();
            let mut parts = Vec::new();
            for child in node.named_children(&mut cursor) {
                if child.kind() != "string" || contains_interpolation(&child) {
                    return None;
                }
                parts.push(strip_quotes(&child.utf8_text(source).ok()?));
            }
            Some(parts.join(""))
        }
        _ => None,
    }
}

fn contains_interpolation(string_node: &Node) -> bool {
    let mut cursor = string_node.walk();
    string_node.children(&mut cursor).any(|c| c.kind() == "interpolation")
}

/// Strip a Python string literal's quote delimiters (triple or single,
/// any of `'`/`"`, ignoring any prefix like `r`/`b`/`u`). Interior content,
/// including whitespace, is preserved byte-for-byte.
fn strip_quotes(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() && bytes[i] != b'\'' && bytes[i] != b'"' {
        i += 1;
    }
    if i >= bytes.len() {
        return raw.to_string();
    }
    let quote = bytes[i];
    let triple = bytes.len() >= i + 3 && bytes[i + 1] == quote && bytes[i + 2] == quote;
    let qlen = if triple { 3 } else { 1 };
    let start = i + qlen;
    let end = if bytes.len() >= start + qlen { bytes.len() - qlen } else { bytes.len() };
    if end < start {
        return String::new();
    }
    raw[start..end].to_string()
}

/// Resolve a call expression's `function` field to a callee name per §4.1:
/// a bare identifier, a fully dotted attribute chain, or `None` for anything
/// else (subscript, call-of-call, lambda literal).
pub fn callee_name(func_node: &Node, source: &[u8]) -> Option<String> {
    match func_node.kind() {
        "identifier" => func_node.utf8_text(source).ok().map(|s| s.to_string()),
        "attribute" => dotted_attribute(func_node, source),
        _ => None,
    }
}

fn dotted_attribute(node: &Node, source: &[u8]) -> Option<String> {
    let object = node.child_by_field_name("object")?;
    let attr = node.child_by_field_name("attribute")?;
    let attr_text = attr.utf8_text(source).ok()?;
    let object_text = match object.kind() {
        "identifier" => object.utf8_text(source).ok()?.to_string(),
        "attribute" => dotted_attribute(&object, source)?,
        _ => return None,
    };
    Some(format!("{object_text}.{attr_text}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    fn first_function_body_first_stmt<'a>(tree: &'a tree_sitter::Tree, source: &str) -> Node<'a> {
        let root = tree.root_node();
        let func = find_kind(&root, "function_definition").unwrap();
        let body = func.child_by_field_name("body").unwrap();
        let _ = source;
        body.named_child(0).unwrap()
    }

    fn find_kind<'a>(node: &Node<'a>, kind: &str) -> Option<Node<'a>> {
        if node.kind() == kind {
            return Some(*node);
        }
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if let Some(found) = find_kind(&child, kind) {
                return Some(found);
            }
        }
        None
    }

    #[test]
    fn detects_triple_quoted_docstring() {
        let src = "def f():\n    \"\"\"hello world\"\"\"\n    return 1\n";
        let tree = parser::parse(src).unwrap();
        let stmt = first_function_body_first_stmt(&tree, src);
        assert_eq!(docstring_text(&stmt, src.as_bytes()), Some("hello world".to_string()));
    }

    #[test]
    fn rejects_fstring_as_docstring() {
        let src = "def f():\n    f\"hello {1}\"\n    return 1\n";
        let tree = parser::parse(src).unwrap();
        let stmt = first_function_body_first_stmt(&tree, src);
        assert_eq!(docstring_text(&stmt, src.as_bytes()), None);
    }

    #[test]
    fn non_string_first_statement_is_not_a_docstring() {
        let src = "def f():\n    x = 1\n    return x\n";
        let tree = parser::parse(src).unwrap();
        let stmt = first_function_body_first_stmt(&tree, src);
        assert_eq!(docstring_text(&stmt, src.as_bytes()), None);
    }

    #[test]
    fn dotted_callee_name_joins_chain() {
        let src = "def f():\n    a.b.c()\n";
        let tree = parser::parse(src).unwrap();
        let call = find_kind(&tree.root_node(), "call").unwrap();
        let func = call.child_by_field_name("function").unwrap();
        assert_eq!(callee_name(&func, src.as_bytes()), Some("a.b.c".to_string()));
    }

    #[test]
    fn subscript_callee_is_dropped() {
        let src = "def f():\n    handlers[0]()\n";
        let tree = parser::parse(src).unwrap();
        let call = find_kind(&tree.root_node(), "call").unwrap();
        let func = call.child_by_field_name("function").unwrap();
        assert_eq!(callee_name(&func, src.as_bytes()), None);
    }
}
