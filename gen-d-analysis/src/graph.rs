//! Call graph (§4.5): a directed multigraph of callables with ancestor
//! ("affected by") closure queries (ancestors unioned with the input set).

use std::collections::{HashSet, VecDeque};

use gen_d_core::types::{CallableId, CallableRecord, DriftStatus};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use rustc_hash::FxHashMap;

/// A node is either a fully-known callable or an unresolved placeholder
/// created by an edge whose target wasn't itself extracted (§4.5).
#[derive(Debug, Clone)]
enum GraphNode {
    Real(CallableRecord),
    Placeholder(String),
}

impl GraphNode {
    fn id(&self) -> String {
        match self {
            GraphNode::Real(r) => r.id.clone(),
            GraphNode::Placeholder(id) => id.clone(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CallGraph {
    graph: DiGraph<GraphNode, u32>,
    index: FxHashMap<String, NodeIndex>,
    file_index: FxHashMap<String, HashSet<String>>,
}

impl CallGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or fully replace a callable, keyed by identifier (§4.5).
    pub fn add(&mut self, record: CallableRecord) {
        let id = record.id.clone();
        let file = record.file_path.clone();
        if let Some(&idx) = self.index.get(&id) {
            self.graph[idx] = GraphNode::Real(record);
        } else {
            let idx = self.graph.add_node(GraphNode::Real(record));
            self.index.insert(id.clone(), idx);
        }
        self.file_index.entry(file).or_default().insert(id);
    }

    fn ensure_node(&mut self, id: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(id) {
            return idx;
        }
        let idx = self.graph.add_node(GraphNode::Placeholder(id.to_string()));
        self.index.insert(id.to_string(), idx);
        idx
    }

    /// Add a directed edge; the callee may not yet be a known node, in which
    /// case a placeholder node is created for it (§4.5).
    pub fn add_edge(&mut self, caller_id: &str, callee_id_or_name: &str, call_line: u32) {
        let caller = self.ensure_node(caller_id);
        let callee = self.ensure_node(callee_id_or_name);
        self.graph.add_edge(caller, callee, call_line);
    }

    pub fn node(&self, id: &str) -> Option<&CallableRecord> {
        let idx = *self.index.get(id)?;
        match &self.graph[idx] {
            GraphNode::Real(r) => Some(r),
            GraphNode::Placeholder(_) => None,
        }
    }

    /// Direct callers (predecessors) of a node.
    pub fn callers(&self, id: &str) -> Vec<CallableId> {
        let Some(&idx) = self.index.get(id) else { return Vec::new() };
        self.graph
            .neighbors_directed(idx, Direction::Incoming)
            .map(|n| self.graph[n].id())
            .collect()
    }

    /// Direct callees (successors) of a node.
    pub fn callees(&self, id: &str) -> Vec<CallableId> {
        let Some(&idx) = self.index.get(id) else { return Vec::new() };
        self.graph
            .neighbors_directed(idx, Direction::Outgoing)
            .map(|n| self.graph[n].id())
            .collect()
    }

    pub fn by_file<'a>(&'a self, path: &str) -> impl Iterator<Item = &'a CallableRecord> + 'a {
        let ids = self.file_index.get(path).cloned().unwrap_or_default();
        ids.into_iter().filter_map(move |id| self.node_owned_lookup(id))
    }

    fn node_owned_lookup(&self, id: String) -> Option<&CallableRecord> {
        self.node(&id)
    }

    pub fn by_status(&self, status: DriftStatus) -> impl Iterator<Item = &CallableRecord> + '_ {
        self.graph.node_weights().filter_map(move |n| match n {
            GraphNode::Real(r) if r.drift_status == status => Some(r),
            _ => None,
        })
    }

    /// All edges currently in the graph, as (caller_id, callee_id_or_name, call_line).
    pub fn edges(&self) -> Vec<(CallableId, CallableId, u32)> {
        self.graph
            .edge_references()
            .map(|e| (self.graph[e.source()].id(), self.graph[e.target()].id(), *e.weight()))
            .collect()
    }

    /// Ancestor closure over "callers": everything that can reach any node
    /// in `change_set` via a directed caller→callee path. Includes the
    /// input set itself (§4.5, §8 property 8). Terminates on cyclic graphs.
    pub fn affected_by(&self, change_set: &[CallableId]) -> HashSet<CallableId> {
        let mut visited: HashSet<CallableId> = change_set.iter().cloned().collect();
        let mut queue: VecDeque<NodeIndex> =
            change_set.iter().filter_map(|id| self.index.get(id).copied()).collect();

        while let Some(idx) = queue.pop_front() {
            for caller in self.graph.neighbors_directed(idx, Direction::Incoming) {
                let id = self.graph[caller].id();
                if visited.insert(id) {
                    queue.push_back(caller);
                }
            }
        }
        visited
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: &str) -> CallableRecord {
        CallableRecord {
            id: id.to_string(),
            name: id.to_string(),
            file_path: "m.py".to_string(),
            class_name: None,
            is_method: false,
            start_line: 1,
            end_line: 1,
            semantic_fingerprint: "a".repeat(64),
            doc_fingerprint: None,
            docstring: None,
            drift_status: DriftStatus::Fresh,
        }
    }

    #[test]
    fn affected_by_includes_input_set() {
        let mut g = CallGraph::new();
        g.add(rec("x"));
        let affected = g.affected_by(&["x".to_string()]);
        assert!(affected.contains("x"));
    }

    #[test]
    fn affected_by_follows_caller_chain() {
        let mut g = CallGraph::new();
        g.add(rec("a"));
        g.add(rec("b"));
        g.add(rec("c"));
        g.add_edge("a", "b", 1);
        g.add_edge("b", "c", 2);
        let affected = g.affected_by(&["c".to_string()]);
        assert!(affected.contains("a"));
        assert!(affected.contains("b"));
        assert!(affected.contains("c"));
    }

    #[test]
    fn cycles_terminate() {
        let mut g = CallGraph::new();
        g.add(rec("a"));
        g.add(rec("b"));
        g.add_edge("a", "b", 1);
        g.add_edge("b", "a", 2);
        let affected = g.affected_by(&["a".to_string()]);
        assert_eq!(affected.len(), 2);
    }

    #[test]
    fn self_edge_is_permitted() {
        let mut g = CallGraph::new();
        g.add(rec("a"));
        g.add_edge("a", "a", 1);
        let affected = g.affected_by(&["a".to_string()]);
        assert_eq!(affected.len(), 1);
    }

    #[test]
    fn unresolved_callee_becomes_placeholder() {
        let mut g = CallGraph::new();
        g.add(rec("a"));
        g.add_edge("a", "unresolved_name", 1);
        assert!(g.node("unresolved_name").is_none());
        assert_eq!(g.callees("a"), vec!["unresolved_name".to_string()]);
    }

    #[test]
    fn edges_lists_every_caller_callee_pair() {
        let mut g = CallGraph::new();
        g.add(rec("a"));
        g.add(rec("b"));
        g.add_edge("a", "b", 7);
        g.add_edge("a", "unresolved_name", 9);
        let mut edges = g.edges();
        edges.sort();
        let mut expected =
            vec![("a".to_string(), "b".to_string(), 7), ("a".to_string(), "unresolved_name".to_string(), 9)];
        expected.sort();
        assert_eq!(edges, expected);
    }
}
