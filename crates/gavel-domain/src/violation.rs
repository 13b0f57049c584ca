//! Structured validation failures
//!
//! Every factory in this crate collects violations rather than stopping at the
//! first failure: the orchestrator re-injects the rendered list verbatim into
//! the next extraction attempt, so the model needs to see everything that was
//! wrong at once.

use std::fmt;

/// Maximum length of an evidence `source` span, in characters.
pub const MAX_SOURCE_LEN: usize = 1000;

/// Class of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// Structurally present but semantically invalid field: bad enum value,
    /// malformed citation or case-number pattern, missing conditionally
    /// required companion field.
    Schema,

    /// Cross-field or cross-entity consistency rule broken: sentence-chain
    /// arithmetic, id resolution against the identity roster.
    Invariant,
}

impl ViolationKind {
    /// Short label used in rendered feedback.
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationKind::Schema => "schema",
            ViolationKind::Invariant => "invariant",
        }
    }
}

/// A single validation failure with the offending field path and a
/// human-readable reason.
///
/// Paths are dotted and indexed, e.g. `charges[2].cross_border.import_export`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Dotted path to the offending field.
    pub path: String,

    /// Human-readable reason, suitable for model feedback.
    pub reason: String,

    /// Failure class.
    pub kind: ViolationKind,
}

impl Violation {
    /// Create a schema violation.
    pub fn schema(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
            kind: ViolationKind::Schema,
        }
    }

    /// Create an invariant violation.
    pub fn invariant(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
            kind: ViolationKind::Invariant,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.path, self.kind.as_str(), self.reason)
    }
}

/// Render a violation list as the multi-line feedback text handed back to the
/// model on retry.
pub fn render_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| format!("- {}", v))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Check an evidence `source` span: non-empty and length-bounded.
pub(crate) fn check_source(source: &str, path: &str, out: &mut Vec<Violation>) {
    if source.trim().is_empty() {
        out.push(Violation::schema(
            format!("{path}.source"),
            "evidence source must be a non-empty quoted span",
        ));
    } else if source.chars().count() > MAX_SOURCE_LEN {
        out.push(Violation::schema(
            format!("{path}.source"),
            format!(
                "evidence source exceeds {MAX_SOURCE_LEN} characters; quote only the relevant span"
            ),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_lists_every_violation() {
        let violations = vec![
            Violation::schema("charges[0].charge_name", "unknown charge"),
            Violation::invariant("trials[1].final_sentence", "exceeds notional"),
        ];
        let rendered = render_violations(&violations);
        assert!(rendered.contains("charges[0].charge_name (schema): unknown charge"));
        assert!(rendered.contains("trials[1].final_sentence (invariant): exceeds notional"));
        assert_eq!(rendered.lines().count(), 2);
    }

    #[test]
    fn test_check_source_empty() {
        let mut out = Vec::new();
        check_source("   ", "nationality", &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].path, "nationality.source");
        assert_eq!(out[0].kind, ViolationKind::Schema);
    }

    #[test]
    fn test_check_source_too_long() {
        let mut out = Vec::new();
        let long = "x".repeat(MAX_SOURCE_LEN + 1);
        check_source(&long, "gender", &mut out);
        assert_eq!(out.len(), 1);
        assert!(out[0].reason.contains("exceeds"));
    }

    #[test]
    fn test_check_source_ok() {
        let mut out = Vec::new();
        check_source("the defendant is a 34-year-old man", "gender", &mut out);
        assert!(out.is_empty());
    }
}
