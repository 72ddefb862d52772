//! The nested proof document.
//!
//! Wire format (what the remote checker reads and writes):
//!
//! ```text
//! [ {"wffstr": "P", "jstr": "Pr"},
//!   [ {"wffstr": "Q", "jstr": "Hyp"}, {"wffstr": "P", "jstr": "R 1"} ],
//!   {"wffstr": "Q → P", "jstr": "→I 2-3"} ]
//! ```
//!
//! A line is an object, a subproof is an array. In memory the distinction is
//! the [`ProofNode`] enum.

use serde::{Deserialize, Serialize};

/// Justification marker for premise lines.
pub const PREMISE: &str = "Pr";

/// Justification marker for the line that opens a subproof.
pub const HYPOTHESIS: &str = "Hyp";

/// One row of the derivation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofLine {
    #[serde(rename = "wffstr")]
    pub formula: String,
    /// Empty (unjustified), a marker, or a canonical rule token.
    #[serde(rename = "jstr")]
    pub justification: String,
}

impl ProofLine {
    pub fn new(formula: impl Into<String>, justification: impl Into<String>) -> Self {
        Self {
            formula: formula.into(),
            justification: justification.into(),
        }
    }

    pub fn premise(formula: impl Into<String>) -> Self {
        Self::new(formula, PREMISE)
    }

    pub fn hypothesis(formula: impl Into<String>) -> Self {
        Self::new(formula, HYPOTHESIS)
    }

    /// A fresh, unjustified line with no formula.
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn is_premise(&self) -> bool {
        self.justification == PREMISE
    }

    pub fn is_hypothesis(&self) -> bool {
        self.justification == HYPOTHESIS
    }
}

/// A node of the document tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProofNode {
    Line(ProofLine),
    Subproof(Vec<ProofNode>),
}

impl ProofNode {
    /// A new subproof holding only an empty hypothesis line.
    pub fn opened_subproof() -> Self {
        ProofNode::Subproof(vec![ProofNode::Line(ProofLine::hypothesis(""))])
    }

    pub fn as_line(&self) -> Option<&ProofLine> {
        match self {
            ProofNode::Line(line) => Some(line),
            ProofNode::Subproof(_) => None,
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            ProofNode::Line(_) => 1,
            ProofNode::Subproof(children) => children.iter().map(ProofNode::leaf_count).sum(),
        }
    }
}

impl From<ProofLine> for ProofNode {
    fn from(line: ProofLine) -> Self {
        ProofNode::Line(line)
    }
}

/// The document root: an ordered sequence of nodes at depth 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProofDocument {
    pub nodes: Vec<ProofNode>,
}

impl ProofDocument {
    pub fn new(nodes: Vec<ProofNode>) -> Self {
        Self { nodes }
    }

    /// A document holding only the given premises.
    pub fn from_premises<I, S>(premises: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            nodes: premises
                .into_iter()
                .map(|formula| ProofNode::Line(ProofLine::premise(formula)))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().map(ProofNode::leaf_count).sum()
    }

    /// Root-level premise lines.
    pub fn premise_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| node.as_line().is_some_and(ProofLine::is_premise))
            .count()
    }

    /// Formulas of the root-level premise lines, in order.
    pub fn premises(&self) -> Vec<String> {
        self.nodes
            .iter()
            .filter_map(ProofNode::as_line)
            .filter(|line| line.is_premise())
            .map(|line| line.formula.clone())
            .collect()
    }

    /// Same document with every justification passed through `f`.
    pub fn map_justifications(&self, f: &impl Fn(&str) -> String) -> Self {
        fn map_seq(nodes: &[ProofNode], f: &impl Fn(&str) -> String) -> Vec<ProofNode> {
            nodes
                .iter()
                .map(|node| match node {
                    ProofNode::Line(line) => ProofNode::Line(ProofLine {
                        formula: line.formula.clone(),
                        justification: f(&line.justification),
                    }),
                    ProofNode::Subproof(children) => ProofNode::Subproof(map_seq(children, f)),
                })
                .collect()
        }
        Self {
            nodes: map_seq(&self.nodes, f),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
