//! Structural extractor (§4.1): a single CST traversal over three stacks —
//! class names, callable names, and callable identifiers — emitting one
//! record per callable definition and one call site per resolvable call
//! expression.

use gen_d_core::errors::ParseError;
use gen_d_core::types::{make_id, make_qualified_name, CallSite};
use tree_sitter::Node;

use crate::parser;
use crate::python_syntax::{callee_name, docstring_text};

/// A callable as seen by the extractor, before fingerprinting (§4.1's
/// contract return type: "CallableRecord-without-fingerprints").
#[derive(Debug, Clone)]
pub struct ExtractedCallable {
    pub id: String,
    pub name: String,
    pub file_path: String,
    pub class_name: Option<String>,
    pub is_method: bool,
    pub start_line: u32,
    pub end_line: u32,
    pub source_text: String,
    pub docstring: Option<String>,
}

struct Ctx<'s> {
    source: &'s str,
    file_path: String,
    module: Option<String>,
    class_stack: Vec<String>,
    callable_names: Vec<String>,
    callable_ids: Vec<String>,
    callables: Vec<ExtractedCallable>,
    call_sites: Vec<CallSite>,
}

/// Walk `source_text` and return every callable plus every resolvable call
/// site. Fails with `ParseError` if the source does not parse (§4.1).
pub fn extract(
    source_text: &str,
    file_path: &str,
    module_name: Option<&str>,
) -> Result<(Vec<ExtractedCallable>, Vec<CallSite>), ParseError> {
    if source_text.trim().is_empty() {
        return Ok((Vec::new(), Vec::new()));
    }
    let tree = parser::parse(source_text)?;
    let mut ctx = Ctx {
        source: source_text,
        file_path: file_path.to_string(),
        module: module_name.map(|s| s.to_string()),
        class_stack: Vec::new(),
        callable_names: Vec::new(),
        callable_ids: Vec::new(),
        callables: Vec::new(),
        call_sites: Vec::new(),
    };
    walk(&tree.root_node(), &mut ctx);
    Ok((ctx.callables, ctx.call_sites))
}

fn walk(node: &Node, ctx: &mut Ctx) {
    match node.kind() {
        "decorated_definition" => {
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                if child.kind() == "decorator" {
                    walk(&child, ctx);
                }
            }
            if let Some(inner) = find_definition_child(node) {
                dispatch_definition(&inner, ctx, Some(*node));
            }
        }
        "function_definition" => dispatch_definition(node, ctx, None),
        "class_definition" => dispatch_definition(node, ctx, None),
        "call" => {
            record_call_site(node, ctx);
            recurse_children(node, ctx);
        }
        _ => recurse_children(node, ctx),
    }
}

fn find_definition_child<'a>(decorated: &Node<'a>) -> Option<Node<'a>> {
    let mut cursor = decorated.walk();
    decorated
        .named_children(&mut cursor)
        .find(|c| c.kind() == "function_definition" || c.kind() == "class_definition")
}

fn dispatch_definition(node: &Node, ctx: &mut Ctx, span_node: Option<Node>) {
    if node.kind() == "function_definition" {
        handle_function(node, ctx, span_node);
    } else {
        handle_class(node, ctx, span_node);
    }
}

fn recurse_children(node: &Node, ctx: &mut Ctx) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        walk(&child, ctx);
    }
}

fn handle_function(node: &Node, ctx: &mut Ctx, span_node: Option<Node>) {
    let name = field_text(node, "name", ctx.source).unwrap_or_default();
    let qualified = make_qualified_name(
        ctx.module.as_deref(),
        &ctx.class_stack,
        &ctx.callable_names,
        &name,
    );
    let id = make_id(&ctx.file_path, &qualified);
    let is_method = !ctx.class_stack.is_empty();
    let class_name = ctx.class_stack.last().cloned();

    let span = span_node.unwrap_or(*node);
    let start_line = span.start_position().row as u32 + 1;
    let end_line = span.end_position().row as u32 + 1;
    let source_text = span.utf8_text(ctx.source.as_bytes()).unwrap_or_default().to_string();

    let docstring = node
        .child_by_field_name("body")
        .and_then(|b| b.named_child(0))
        .and_then(|stmt| docstring_text(&stmt, ctx.source.as_bytes()));

    ctx.callable_names.push(name.clone());
    ctx.callable_ids.push(id.clone());

    if let Some(body) = node.child_by_field_name("body") {
        walk(&body, ctx);
    }

    ctx.callable_names.pop();
    ctx.callable_ids.pop();

    ctx.callables.push(ExtractedCallable {
        id,
        name,
        file_path: ctx.file_path.clone(),
        class_name,
        is_method,
        start_line,
        end_line,
        source_text,
        docstring,
    });
}

fn handle_class(node: &Node, ctx: &mut Ctx, _span_node: Option<Node>) {
    let name = field_text(node, "name", ctx.source).unwrap_or_default();
    ctx.class_stack.push(name);
    if let Some(body) = node.child_by_field_name("body") {
        walk(&body, ctx);
    }
    ctx.class_stack.pop();
}

fn record_call_site(node: &Node, ctx: &mut Ctx) {
    let Some(caller_id) = ctx.callable_ids.last() else { return };
    let Some(func) = node.child_by_field_name("function") else { return };
    let Some(name) = callee_name(&func, ctx.source.as_bytes()) else { return };
    let call_line = node.start_position().row as u32 + 1;
    ctx.call_sites.push(CallSite {
        caller_id: caller_id.clone(),
        callee_name: name,
        call_line,
    });
}

fn field_text(node: &Node, field: &str, source: &str) -> Option<String> {
    node.child_by_field_name(field)
        .and_then(|n| n.utf8_text(source.as_bytes()).ok())
        .map(|s| s.to_string())
}
