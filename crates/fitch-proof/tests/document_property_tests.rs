use fitch_proof::location::{flatten, line_at, position_of, resolve};
use fitch_proof::mutation::{delete_line, insert_after, DeleteOutcome, NodeKind, Placement};
use fitch_proof::rules::{canonical_tokens, to_canonical, to_display};
use fitch_proof::{ProofDocument, ProofLine, ProofNode};
use proptest::prelude::*;

const MAX_DEPTH: u32 = 4;

fn line() -> impl Strategy<Value = ProofLine> {
    (
        "[PQRS]{1,3}",
        prop_oneof![Just(""), Just("R 1"), Just("→E 1,2"), Just("∧I 2,3")],
    )
        .prop_map(|(formula, justification)| ProofLine::new(formula, justification))
}

fn node() -> impl Strategy<Value = ProofNode> {
    let leaf = line().prop_map(ProofNode::Line);
    leaf.prop_recursive(MAX_DEPTH, 48, 5, |inner| {
        ("[PQRS]{1,2}", prop::collection::vec(inner, 0..4)).prop_map(|(hyp, rest)| {
            let mut children = vec![ProofNode::Line(ProofLine::hypothesis(hyp))];
            children.extend(rest);
            ProofNode::Subproof(children)
        })
    })
}

fn document() -> impl Strategy<Value = ProofDocument> {
    (
        prop::collection::vec("[PQ]", 0..3),
        prop::collection::vec(node(), 0..5),
    )
        .prop_map(|(premises, body)| {
            let mut doc = ProofDocument::from_premises(premises);
            doc.nodes.extend(body);
            doc
        })
}

/// Document plus a position in `0..=len` (one past the end included).
fn document_and_position() -> impl Strategy<Value = (ProofDocument, usize)> {
    document().prop_flat_map(|doc| {
        let len = flatten(&doc).len();
        (Just(doc), 0..=len)
    })
}

fn count_leaves(nodes: &[ProofNode]) -> usize {
    nodes
        .iter()
        .map(|node| match node {
            ProofNode::Line(_) => 1,
            ProofNode::Subproof(children) => count_leaves(children),
        })
        .sum()
}

fn subproofs_have_hypotheses(nodes: &[ProofNode]) -> bool {
    nodes.iter().all(|node| match node {
        ProofNode::Line(_) => true,
        ProofNode::Subproof(children) => {
            matches!(children.first(), Some(ProofNode::Line(first)) if first.is_hypothesis())
                && subproofs_have_hypotheses(children)
        }
    })
}

fn premises_are_a_root_prefix(doc: &ProofDocument) -> bool {
    let leading = doc
        .nodes
        .iter()
        .take_while(|n| n.as_line().is_some_and(ProofLine::is_premise))
        .count();
    leading == doc.premise_count()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn flatten_lists_every_leaf(doc in document()) {
        prop_assert_eq!(flatten(&doc).len(), count_leaves(&doc.nodes));
    }

    #[test]
    fn resolve_agrees_with_flatten((doc, position) in document_and_position()) {
        let flat = flatten(&doc);
        prop_assume!(position < flat.len());
        let loc = resolve(&doc, position);
        prop_assert_eq!(line_at(&doc, &loc), Some(flat[position].line));
        prop_assert_eq!(position_of(&doc, &loc), Some(position));
    }

    #[test]
    fn insert_then_delete_restores(
        (doc, position) in document_and_position(),
        to_parent in any::<bool>(),
    ) {
        let placement = if to_parent { Placement::Parent } else { Placement::Sibling };
        let mut edited = doc.clone();
        let loc = insert_after(&mut edited, position, NodeKind::Line, placement);
        prop_assert_eq!(flatten(&edited).len(), flatten(&doc).len() + 1);
        prop_assert!(premises_are_a_root_prefix(&edited));

        let new_position = position_of(&edited, &loc).expect("inserted line is addressable");
        let blank = ProofLine::blank();
        let inserted = flatten(&edited)[new_position].line.clone();
        prop_assert_eq!(inserted, blank);

        let outcome = delete_line(&mut edited, new_position, |_| false);
        let removed_line = matches!(outcome, DeleteOutcome::Line { .. });
        prop_assert!(removed_line);
        prop_assert_eq!(edited, doc);
    }

    #[test]
    fn inserted_subproof_opens_with_empty_hypothesis(
        (doc, position) in document_and_position(),
        to_parent in any::<bool>(),
    ) {
        let placement = if to_parent { Placement::Parent } else { Placement::Sibling };
        let mut edited = doc.clone();
        let loc = insert_after(&mut edited, position, NodeKind::Subproof, placement);
        prop_assert!(loc.opens_subproof());
        let hypothesis = ProofLine::hypothesis("");
        prop_assert_eq!(line_at(&edited, &loc), Some(&hypothesis));
        prop_assert!(subproofs_have_hypotheses(&edited.nodes));
        prop_assert!(premises_are_a_root_prefix(&edited));
    }

    #[test]
    fn confirmed_deletes_keep_structure_valid((doc, position) in document_and_position()) {
        let mut edited = doc.clone();
        let before = flatten(&doc).len();
        let outcome = delete_line(&mut edited, position, |_| true);
        prop_assert!(subproofs_have_hypotheses(&edited.nodes));
        match outcome {
            DeleteOutcome::Line { .. } => {
                prop_assert_eq!(flatten(&edited).len(), before - 1);
            }
            DeleteOutcome::Subproof { lines, .. } => {
                prop_assert_eq!(flatten(&edited).len(), before - lines);
            }
            DeleteOutcome::Unchanged => {
                prop_assert_eq!(&edited, &doc);
            }
            DeleteOutcome::Declined => {
                prop_assert!(false, "confirmation was granted");
            }
        }
    }

    #[test]
    fn declined_deletes_change_nothing((doc, position) in document_and_position()) {
        let mut edited = doc.clone();
        let outcome = delete_line(&mut edited, position, |_| false);
        if outcome == DeleteOutcome::Declined {
            prop_assert_eq!(edited, doc);
        }
    }

    #[test]
    fn unknown_justifications_pass_through(text in "[0-9 ,\\-]{0,12}") {
        prop_assert_eq!(to_display(&text), text.clone());
        prop_assert_eq!(to_canonical(&text), text);
    }

    #[test]
    fn rule_names_round_trip_with_citations(
        index in 0usize..13,
        citations in "[0-9]{1,2}(,[0-9]{1,2}){0,2}",
    ) {
        let tokens: Vec<&str> = canonical_tokens().collect();
        let token = tokens[index % tokens.len()];
        let justification = format!("{token} {citations}");
        prop_assert_eq!(to_canonical(&to_display(&justification)), justification);
    }
}
