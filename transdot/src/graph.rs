//! Dependency graphs under construction.

use std::collections::HashSet;

use crate::error::TransdotError;

/// A dependency edge.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Edge {
    head: usize,
    dependent: usize,
}

impl Edge {
    pub fn new(head: usize, dependent: usize) -> Self {
        Edge { head, dependent }
    }

    /// Get the head of the edge.
    pub fn head(&self) -> usize {
        self.head
    }

    /// Get the dependent of the edge.
    pub fn dependent(&self) -> usize {
        self.dependent
    }
}

impl From<Edge> for (usize, usize) {
    fn from(edge: Edge) -> Self {
        (edge.head, edge.dependent)
    }
}

/// A partial or complete dependency graph.
///
/// Nodes are token positions in the sentence, where position 0 is the
/// root. The graph stores the head of each token, so that a token can
/// never have more than one head. Edges can only be added, never
/// removed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DependencyGraph {
    heads: Vec<Option<usize>>,
    n_edges: usize,
}

impl DependencyGraph {
    /// Construct an empty graph for a sentence of `sentence_len` tokens,
    /// including the root.
    pub fn new(sentence_len: usize) -> Self {
        DependencyGraph {
            heads: vec![None; sentence_len],
            n_edges: 0,
        }
    }

    /// Add the edge `head -> dependent`.
    ///
    /// Fails when `dependent` already has a head.
    pub fn add(&mut self, head: usize, dependent: usize) -> Result<(), TransdotError> {
        assert!(
            head < self.heads.len() && dependent < self.heads.len(),
            "Edge {} -> {} out of bounds for graph of {} nodes",
            head,
            dependent,
            self.heads.len()
        );

        if let Some(existing) = self.heads[dependent] {
            return Err(TransdotError::DoubleHead {
                dependent,
                head: existing,
                new_head: head,
            });
        }

        self.heads[dependent] = Some(head);
        self.n_edges += 1;

        Ok(())
    }

    /// Get the dependents of `head` in sentence order.
    pub fn dependents(&self, head: usize) -> impl Iterator<Item = usize> + '_ {
        self.heads
            .iter()
            .enumerate()
            .filter(move |(_, &h)| h == Some(head))
            .map(|(dependent, _)| dependent)
    }

    /// Iterate over the edges, ordered by dependent.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.heads
            .iter()
            .enumerate()
            .filter_map(|(dependent, head)| head.map(|head| Edge::new(head, dependent)))
    }

    /// Collect the edges as `(head, dependent)` pairs.
    pub fn edge_set(&self) -> HashSet<(usize, usize)> {
        self.edges().map(Into::into).collect()
    }

    /// Check whether `dependent` has a head.
    pub fn has_head(&self, dependent: usize) -> bool {
        self.heads.get(dependent).copied().flatten().is_some()
    }

    /// Get the edge that attaches `dependent` to its head.
    pub fn head(&self, dependent: usize) -> Option<Edge> {
        self.heads
            .get(dependent)
            .copied()
            .flatten()
            .map(|head| Edge::new(head, dependent))
    }

    /// Check whether the graph has no edges.
    pub fn is_empty(&self) -> bool {
        self.n_edges == 0
    }

    /// Get the leftmost dependent of `head`.
    pub fn leftmost_dependent(&self, head: usize) -> Option<usize> {
        self.dependents(head).next()
    }

    /// Get the number of edges.
    pub fn len(&self) -> usize {
        self.n_edges
    }

    /// Get the number of nodes, including the root.
    pub fn n_nodes(&self) -> usize {
        self.heads.len()
    }

    /// Get the rightmost dependent of `head`.
    pub fn rightmost_dependent(&self, head: usize) -> Option<usize> {
        self.dependents(head).last()
    }
}
