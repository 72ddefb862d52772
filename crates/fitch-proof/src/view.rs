//! Row view of a document: what a renderer needs per line, without any
//! rendering.

use crate::document::{ProofDocument, ProofNode};
use crate::location::{self, Location};
use crate::rules;

/// One displayed line and the affordances it offers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofRow {
    pub number: usize,
    pub location: Location,
    pub depth: usize,
    pub formula: String,
    /// Justification as shown to the reader.
    pub justification: String,
    pub is_premise: bool,
    pub is_hypothesis: bool,
    /// Draws the rule under the premises and under each hypothesis.
    pub separator: bool,
    pub formula_editable: bool,
    pub justification_editable: bool,
    pub deletable: bool,
    pub can_insert: bool,
    /// Last node of a subproof: may close it by adding to the parent.
    pub can_insert_in_parent: bool,
}

impl ProofRow {
    /// Flat position of this row.
    pub fn position(&self) -> usize {
        self.number - 1
    }
}

/// Rows for every leaf, in line-number order.
pub fn rows(doc: &ProofDocument) -> Vec<ProofRow> {
    location::flatten(doc)
        .into_iter()
        .map(|flat| {
            let line = flat.line;
            let siblings = location::sequence_at(&doc.nodes, flat.location.container())
                .unwrap_or_default();
            let index = flat.location.last_index().unwrap_or(0);
            let next_is_premise = siblings
                .get(index + 1)
                .and_then(ProofNode::as_line)
                .is_some_and(|next| next.is_premise());
            let last_premise = line.is_premise() && !next_is_premise;
            let is_last = index + 1 == siblings.len();

            ProofRow {
                number: flat.number(),
                depth: flat.depth(),
                formula: line.formula.clone(),
                justification: rules::to_display(&line.justification),
                is_premise: line.is_premise(),
                is_hypothesis: line.is_hypothesis(),
                separator: last_premise || line.is_hypothesis(),
                formula_editable: !line.is_premise(),
                justification_editable: !line.is_premise() && !line.is_hypothesis(),
                deletable: !line.is_premise(),
                can_insert: !line.is_premise() || last_premise,
                can_insert_in_parent: is_last && flat.depth() > 0,
                location: flat.location,
            }
        })
        .collect()
}
