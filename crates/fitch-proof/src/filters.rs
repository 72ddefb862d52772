//! Input normalization applied when a formula or justification is committed.

use std::fmt;

/// Pure string → string normalization for the two editable cells.
pub trait InputFilter: fmt::Debug + Send + Sync {
    fn fix_formula(&self, input: &str) -> String;
    fn fix_justification(&self, input: &str) -> String;
}

/// ASCII spellings of connectives, longest first.
const CONNECTIVES: &[(&str, &str)] = &[
    ("<->", "↔"),
    ("<=>", "↔"),
    ("->", "→"),
    ("=>", "→"),
    ("&", "∧"),
    ("~", "¬"),
    ("|", "∨"),
];

/// Default filter: trims, collapses runs of whitespace and replaces ASCII
/// connectives with logic symbols.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardFilter;

impl StandardFilter {
    fn symbols(input: &str) -> String {
        let mut text = collapse_whitespace(input);
        for (ascii, symbol) in CONNECTIVES {
            text = text.replace(ascii, symbol);
        }
        text
    }
}

impl InputFilter for StandardFilter {
    fn fix_formula(&self, input: &str) -> String {
        Self::symbols(input)
    }

    /// Also tightens citation lists: `1, 2` → `1,2`, `2 – 5` → `2-5`.
    fn fix_justification(&self, input: &str) -> String {
        Self::symbols(input)
            .replace(['–', '—'], "-")
            .replace(" ,", ",")
            .replace(", ", ",")
            .replace(" - ", "-")
    }
}

fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}
