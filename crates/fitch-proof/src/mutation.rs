//! Location-addressed structural edits.
//!
//! Every operation takes a flat position, resolves it to a [`Location`] and
//! descends the tree along that path. Out-of-range positions never fail: one
//! past the end inserts at the end of the document, edits and deletes there
//! leave the document unchanged.
//!
//! Invariants kept by construction:
//! - a subproof is only ever inserted together with its hypothesis line;
//! - removing a hypothesis line removes its whole subproof, so no subproof is
//!   left without one;
//! - insertion at the root never lands in front of a premise line.

use crate::document::{ProofDocument, ProofNode, HYPOTHESIS, PREMISE};
use crate::filters::InputFilter;
use crate::location::{self, Location};
use crate::rules;

/// What an insert creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// An empty, unjustified line.
    Line,
    /// A subproof holding one empty hypothesis line.
    Subproof,
}

/// Where an insert goes relative to the resolved line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Right after the line, in its own sequence.
    Sibling,
    /// Right after the subproof containing the line, in the parent sequence.
    /// At the root this is the same as `Sibling`.
    Parent,
}

/// Result of a delete request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// One line was removed.
    Line { location: Location },
    /// A hypothesis line was targeted and its whole subproof was removed.
    Subproof { location: Location, lines: usize },
    /// The cascade was not confirmed.
    Declined,
    /// Nothing addressable at that position.
    Unchanged,
}

impl DeleteOutcome {
    pub fn changed(&self) -> bool {
        matches!(self, DeleteOutcome::Line { .. } | DeleteOutcome::Subproof { .. })
    }
}

/// Insert a new line or subproof after the line at `position`.
///
/// Returns the location of the new leaf: the line itself, or the hypothesis of
/// the new subproof.
pub fn insert_after(
    doc: &mut ProofDocument,
    position: usize,
    kind: NodeKind,
    placement: Placement,
) -> Location {
    let resolved = location::resolve(doc, position);
    let path = resolved.path();

    let (container, anchor) = match (placement, path.len()) {
        (Placement::Parent, len) if len >= 2 => (&path[..len - 2], path[len - 2]),
        (_, len) => (&path[..len - 1], path[len - 1]),
    };

    let node = match kind {
        NodeKind::Line => ProofNode::Line(Default::default()),
        NodeKind::Subproof => ProofNode::opened_subproof(),
    };

    let inserted = insert_into(&mut doc.nodes, container, anchor, node, true);
    let mut new_path = container.to_vec();
    new_path.push(inserted);
    if kind == NodeKind::Subproof {
        new_path.push(0);
    }

    tracing::debug!(
        position,
        ?kind,
        ?placement,
        at = %Location::new(new_path.clone()),
        "inserted node"
    );
    Location::new(new_path)
}

/// Recursive descent to the container, then insert after `anchor`.
/// Returns the index the node landed at.
fn insert_into(
    nodes: &mut Vec<ProofNode>,
    container: &[usize],
    anchor: usize,
    node: ProofNode,
    at_root: bool,
) -> usize {
    if let Some((&head, rest)) = container.split_first() {
        if let Some(ProofNode::Subproof(children)) = nodes.get_mut(head) {
            return insert_into(children, rest, anchor, node, false);
        }
        // Resolution only produces paths through subproofs; fall back to the
        // end of this sequence rather than lose the node.
        let at = nodes.len();
        nodes.push(node);
        return at;
    }

    let mut at = anchor.saturating_add(1).min(nodes.len());
    if at_root {
        at = at.max(leading_premises(nodes));
    }
    nodes.insert(at, node);
    at
}

fn leading_premises(nodes: &[ProofNode]) -> usize {
    nodes
        .iter()
        .take_while(|node| node.as_line().is_some_and(|line| line.is_premise()))
        .count()
}

/// Overwrite the formula of the line at `position` (after normalization).
/// Returns false when the position does not address a line.
pub fn edit_formula(
    doc: &mut ProofDocument,
    position: usize,
    value: &str,
    filter: &dyn InputFilter,
) -> bool {
    let loc = location::resolve(doc, position);
    match location::line_at_mut(doc, &loc) {
        Some(line) => {
            line.formula = filter.fix_formula(value);
            tracing::debug!(position, formula = %line.formula, "edited formula");
            true
        }
        None => false,
    }
}

/// Overwrite the justification of the line at `position` with the canonical,
/// normalized form of `value`.
///
/// Structural markers are never written through here: the result is refused
/// if it would read `Pr` or `Hyp`, and marker lines keep their justification.
pub fn edit_justification(
    doc: &mut ProofDocument,
    position: usize,
    value: &str,
    filter: &dyn InputFilter,
) -> bool {
    let loc = location::resolve(doc, position);
    let Some(line) = location::line_at_mut(doc, &loc) else {
        return false;
    };
    if line.is_premise() || line.is_hypothesis() {
        return false;
    }
    let canonical = filter.fix_justification(&rules::to_canonical(value));
    if canonical == PREMISE || canonical == HYPOTHESIS {
        tracing::debug!(position, value, "refusing marker as justification");
        return false;
    }
    line.justification = canonical;
    tracing::debug!(position, justification = %line.justification, "edited justification");
    true
}

/// The cascade a hypothesis delete would trigger, offered for confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cascade {
    /// Location of the subproof that would be removed.
    pub subproof: Location,
    /// Number of lines inside it.
    pub lines: usize,
}

/// What deleting the line at `position` would do, without doing it.
pub fn plan_delete(doc: &ProofDocument, position: usize) -> Option<Result<Location, Cascade>> {
    let flat = location::flatten(doc);
    let target = flat.get(position)?.location.clone();
    if target.opens_subproof() {
        let subproof = target.parent()?;
        let lines = node_at(doc, &subproof).map_or(0, ProofNode::leaf_count);
        Some(Err(Cascade { subproof, lines }))
    } else {
        Some(Ok(target))
    }
}

/// Delete the line at `position`. Deleting a subproof's hypothesis asks
/// `confirm` first and, when accepted, removes the whole subproof.
pub fn delete_line(
    doc: &mut ProofDocument,
    position: usize,
    confirm: impl FnOnce(&Cascade) -> bool,
) -> DeleteOutcome {
    match plan_delete(doc, position) {
        None => DeleteOutcome::Unchanged,
        Some(Ok(target)) => {
            if remove_at(&mut doc.nodes, target.path()).is_some() {
                tracing::debug!(position, at = %target, "deleted line");
                DeleteOutcome::Line { location: target }
            } else {
                DeleteOutcome::Unchanged
            }
        }
        Some(Err(cascade)) => {
            if !confirm(&cascade) {
                tracing::debug!(position, subproof = %cascade.subproof, "subproof delete declined");
                return DeleteOutcome::Declined;
            }
            match remove_at(&mut doc.nodes, cascade.subproof.path()) {
                Some(removed) => {
                    tracing::debug!(position, subproof = %cascade.subproof, "deleted subproof");
                    DeleteOutcome::Subproof {
                        location: cascade.subproof,
                        lines: removed.leaf_count(),
                    }
                }
                None => DeleteOutcome::Unchanged,
            }
        }
    }
}

fn remove_at(nodes: &mut Vec<ProofNode>, path: &[usize]) -> Option<ProofNode> {
    match path.split_first()? {
        (&index, []) => (index < nodes.len()).then(|| nodes.remove(index)),
        (&head, rest) => match nodes.get_mut(head)? {
            ProofNode::Subproof(children) => remove_at(children, rest),
            ProofNode::Line(_) => None,
        },
    }
}

fn node_at<'a>(doc: &'a ProofDocument, loc: &Location) -> Option<&'a ProofNode> {
    let (&last, container) = loc.path().split_last()?;
    location::sequence_at(&doc.nodes, container)?.get(last)
}
