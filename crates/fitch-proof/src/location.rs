//! Locations and flattening.
//!
//! A [`Location`] is a path of indices from the document root: every prefix
//! selects a child sequence, the last index selects a leaf inside it. The
//! flattened view lists leaves in pre-order; a leaf's flat position plus one
//! is its line number. Subproof boundaries consume no line number.

use crate::document::{ProofDocument, ProofLine, ProofNode};
use std::fmt;

/// Path of indices from the root to a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location(Vec<usize>);

impl Location {
    pub fn new(path: Vec<usize>) -> Self {
        Self(path)
    }

    pub fn root(index: usize) -> Self {
        Self(vec![index])
    }

    pub fn path(&self) -> &[usize] {
        &self.0
    }

    /// Nesting depth of the addressed node; root children are depth 0.
    pub fn depth(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    pub fn last_index(&self) -> Option<usize> {
        self.0.last().copied()
    }

    /// Path of the sequence that contains the addressed node.
    pub fn container(&self) -> &[usize] {
        match self.0.split_last() {
            Some((_, init)) => init,
            None => &[],
        }
    }

    /// Location of the enclosing subproof node, if any.
    pub fn parent(&self) -> Option<Location> {
        if self.0.len() > 1 {
            Some(Location(self.container().to_vec()))
        } else {
            None
        }
    }

    /// True when this addresses the first line of a subproof, i.e. its
    /// hypothesis.
    pub fn opens_subproof(&self) -> bool {
        self.0.len() > 1 && self.last_index() == Some(0)
    }

    pub fn child(&self, index: usize) -> Location {
        let mut path = self.0.clone();
        path.push(index);
        Location(path)
    }
}

impl From<Vec<usize>> for Location {
    fn from(path: Vec<usize>) -> Self {
        Self(path)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|i| i.to_string()).collect();
        write!(f, "[{}]", parts.join("."))
    }
}

/// A leaf in the flattened, read-only view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatLine<'a> {
    pub location: Location,
    pub position: usize,
    pub line: &'a ProofLine,
}

impl FlatLine<'_> {
    /// 1-based line number.
    pub fn number(&self) -> usize {
        self.position + 1
    }

    pub fn depth(&self) -> usize {
        self.location.depth()
    }

    pub fn formula(&self) -> &str {
        &self.line.formula
    }

    pub fn justification(&self) -> &str {
        &self.line.justification
    }
}

/// Pre-order listing of every leaf.
pub fn flatten(doc: &ProofDocument) -> Vec<FlatLine<'_>> {
    fn walk<'a>(nodes: &'a [ProofNode], prefix: &mut Vec<usize>, out: &mut Vec<FlatLine<'a>>) {
        for (i, node) in nodes.iter().enumerate() {
            prefix.push(i);
            match node {
                ProofNode::Line(line) => out.push(FlatLine {
                    location: Location(prefix.clone()),
                    position: out.len(),
                    line,
                }),
                ProofNode::Subproof(children) => walk(children, prefix, out),
            }
            prefix.pop();
        }
    }

    let mut out = Vec::new();
    walk(&doc.nodes, &mut Vec::new(), &mut out);
    out
}

/// Deepest subproof nesting present; a flat document is depth 0.
pub fn max_depth(doc: &ProofDocument) -> usize {
    fn seq_depth(nodes: &[ProofNode]) -> usize {
        nodes
            .iter()
            .map(|node| match node {
                ProofNode::Line(_) => 0,
                ProofNode::Subproof(children) => seq_depth(children) + 1,
            })
            .max()
            .unwrap_or(0)
    }
    seq_depth(&doc.nodes)
}

/// Resolve a flat position to a location.
///
/// Out-of-range positions resolve to `[position]` at the root so that "one
/// past the end" addresses the end of the document.
pub fn resolve(doc: &ProofDocument, position: usize) -> Location {
    flatten(doc)
        .into_iter()
        .nth(position)
        .map(|flat| flat.location)
        .unwrap_or_else(|| Location::root(position))
}

/// Flat position of the leaf at `location`, if it addresses a leaf.
pub fn position_of(doc: &ProofDocument, location: &Location) -> Option<usize> {
    flatten(doc)
        .into_iter()
        .find(|flat| &flat.location == location)
        .map(|flat| flat.position)
}

pub fn line_at<'a>(doc: &'a ProofDocument, location: &Location) -> Option<&'a ProofLine> {
    let (&last, container) = location.path().split_last()?;
    match sequence_at(&doc.nodes, container)?.get(last)? {
        ProofNode::Line(line) => Some(line),
        ProofNode::Subproof(_) => None,
    }
}

pub fn line_at_mut<'a>(doc: &'a mut ProofDocument, location: &Location) -> Option<&'a mut ProofLine> {
    let (&last, container) = location.path().split_last()?;
    match sequence_at_mut(&mut doc.nodes, container)?.get_mut(last)? {
        ProofNode::Line(line) => Some(line),
        ProofNode::Subproof(_) => None,
    }
}

/// The child sequence selected by `path`; the empty path is the root.
pub fn sequence_at<'a>(nodes: &'a [ProofNode], path: &[usize]) -> Option<&'a [ProofNode]> {
    match path.split_first() {
        None => Some(nodes),
        Some((&head, rest)) => match nodes.get(head)? {
            ProofNode::Subproof(children) => sequence_at(children, rest),
            ProofNode::Line(_) => None,
        },
    }
}

pub fn sequence_at_mut<'a>(
    nodes: &'a mut Vec<ProofNode>,
    path: &[usize],
) -> Option<&'a mut Vec<ProofNode>> {
    match path.split_first() {
        None => Some(nodes),
        Some((&head, rest)) => match nodes.get_mut(head)? {
            ProofNode::Subproof(children) => sequence_at_mut(children, rest),
            ProofNode::Line(_) => None,
        },
    }
}
