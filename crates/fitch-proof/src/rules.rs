//! Rule-name translation between canonical justification tokens and the names
//! shown to students.
//!
//! Both directions run an ordered list of substitutions over the text; each
//! substitution replaces its first delimited match. The order of the tables
//! is significant: a later entry must never see text produced by an earlier
//! one and then fire on it.
//!
//! Unrecognized input is returned unchanged.

use regex::Regex;
use std::sync::OnceLock;

struct Substitution {
    pattern: Regex,
    replacement: &'static str,
}

/// (pattern, replacement) for canonical → display.
const DISPLAY_TABLE: &[(&str, &str)] = &[
    (r"(?i)dne", "Double Negation"),
    (r"→E", "Modus Ponens"),
    (r"MT", "Modus Tollens"),
    (r"DS", "Modus Tollendo Ponens"),
    (r"∧E", "Simplification"),
    (r"∨I", "Addition"),
    (r"∧I", "Adjunction"),
    (r"↔E", "Equivalence"),
    (r"→I", "Conditional derivation"),
    (r"∀E", "Universal instantiation"),
    (r"∃I", "Existential generalization"),
    (r"∃E", "Existential instantiation"),
    (r"R", "Repeat"),
];

/// (pattern, replacement) for display → canonical.
const CANONICAL_TABLE: &[(&str, &str)] = &[
    (r"(?i)double negation", "DNE"),
    (r"(?i)modus ponens", "→E"),
    (r"(?i)modus tollens", "MT"),
    (r"(?i)modus tollendo ponens", "DS"),
    (r"(?i)simplification", "∧E"),
    (r"(?i)addition", "∨I"),
    (r"(?i)adjunction", "∧I"),
    (r"(?i)equi[v∨]alence", "↔E"),
    (r"(?i)bicondition", "Bicondition"),
    (r"(?i)conditional deri[v∨]ation", "→I"),
    (r"(?i)uni[v∨]ersal instantiation", "∀E"),
    (r"(?i)existential generalization", "∃I"),
    (r"(?i)existential instantiation", "∃E"),
    (r"(?i)repeat", "R"),
];

fn compile(table: &[(&'static str, &'static str)]) -> Vec<Substitution> {
    table
        .iter()
        .filter_map(|&(pattern, replacement)| match Regex::new(pattern) {
            Ok(pattern) => Some(Substitution {
                pattern,
                replacement,
            }),
            Err(err) => {
                tracing::warn!(pattern, error = %err, "skipping invalid rule-name pattern");
                None
            }
        })
        .collect()
}

fn display_rules() -> &'static [Substitution] {
    static RULES: OnceLock<Vec<Substitution>> = OnceLock::new();
    RULES.get_or_init(|| compile(DISPLAY_TABLE))
}

fn canonical_rules() -> &'static [Substitution] {
    static RULES: OnceLock<Vec<Substitution>> = OnceLock::new();
    RULES.get_or_init(|| compile(CANONICAL_TABLE))
}

/// Canonical tokens known to the translator, in table order.
pub fn canonical_tokens() -> impl Iterator<Item = &'static str> {
    CANONICAL_TABLE
        .iter()
        .map(|&(_, token)| token)
        .filter(|token| *token != "Bicondition")
}

/// Display name for a justification, e.g. `→E 1,2` → `Modus Ponens 1,2`.
pub fn to_display(justification: &str) -> String {
    apply(display_rules(), justification)
}

/// Canonical form of a justification, e.g. `modus ponens 1,2` → `→E 1,2`.
pub fn to_canonical(justification: &str) -> String {
    apply(canonical_rules(), justification)
}

fn apply(rules: &[Substitution], input: &str) -> String {
    let mut text = input.to_string();
    for rule in rules {
        if let Some(replaced) = replace_first_delimited(&rule.pattern, &text, rule.replacement) {
            text = replaced;
        }
    }
    text
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_letter(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

/// Replace the first match that is not glued to a neighbouring word. A
/// citation may follow directly (`R1`), but `R` never fires inside `RAA`
/// or `Pr`.
fn replace_first_delimited(pattern: &Regex, text: &str, replacement: &str) -> Option<String> {
    let m = pattern.find_iter(text).find(|m| {
        let before = text[..m.start()].chars().next_back();
        let after = text[m.end()..].chars().next();
        !before.is_some_and(is_word_char) && !after.is_some_and(is_letter)
    })?;
    let mut out = String::with_capacity(text.len() + replacement.len());
    out.push_str(&text[..m.start()]);
    out.push_str(replacement);
    out.push_str(&text[m.end()..]);
    Some(out)
}
