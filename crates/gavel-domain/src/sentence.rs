//! Sentence lengths as (years, months) with a derived month total

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::violation::Violation;

/// Upper bound on a span's derived total, in months (100 years). No Hong Kong
/// determinate sentence comes anywhere near it; a span past the bound is model
/// noise, not a sentence.
pub const MAX_TOTAL_MONTHS: u32 = 1200;

/// A sentence length decomposed into years and months.
///
/// `total_months` is derived (`years * 12 + months`, saturating). Whatever a
/// model emits for it is discarded and recomputed at construction, so the
/// persisted form is always arithmetically consistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SentenceSpan {
    /// Whole years of the sentence.
    pub years: u32,

    /// Months beyond the whole years.
    pub months: u32,

    /// Derived total in months; recomputed, never independently settable.
    #[serde(default)]
    pub total_months: u32,
}

impl SentenceSpan {
    /// Build a span with the total computed.
    pub fn new(years: u32, months: u32) -> Self {
        let mut span = Self {
            years,
            months,
            total_months: 0,
        };
        span.recompute();
        span
    }

    /// Recompute the derived total in place. Called by every stage factory.
    ///
    /// Computed in `u64` and saturated so arbitrary model-supplied years can
    /// never wrap; anything saturated is far past [`MAX_TOTAL_MONTHS`] and is
    /// rejected by [`SentenceSpan::check`].
    pub(crate) fn recompute(&mut self) {
        let total = u64::from(self.years) * 12 + u64::from(self.months);
        self.total_months = u32::try_from(total).unwrap_or(u32::MAX);
    }

    /// Reject spans whose total exceeds [`MAX_TOTAL_MONTHS`]. Run after
    /// [`SentenceSpan::recompute`], before any chain arithmetic.
    pub(crate) fn check(&self, path: &str, out: &mut Vec<Violation>) {
        if self.total_months > MAX_TOTAL_MONTHS {
            out.push(Violation::schema(
                path,
                format!(
                    "sentence length of {} years {} months exceeds the maximum of {} months",
                    self.years, self.months, MAX_TOTAL_MONTHS
                ),
            ));
        }
    }

    /// Total sentence length in months.
    pub fn total(&self) -> u32 {
        self.total_months
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_is_derived() {
        assert_eq!(SentenceSpan::new(3, 2).total(), 38);
        assert_eq!(SentenceSpan::new(0, 0).total(), 0);
        assert_eq!(SentenceSpan::new(10, 11).total(), 131);
    }

    #[test]
    fn test_recompute_overrides_model_value() {
        // A model may emit any total; deserialisation keeps it only until the
        // factory recomputes.
        let mut span: SentenceSpan =
            serde_json::from_str(r#"{"years": 2, "months": 6, "total_months": 99}"#).unwrap();
        span.recompute();
        assert_eq!(span.total(), 30);
    }

    #[test]
    fn test_missing_total_defaults_then_recomputes() {
        let mut span: SentenceSpan = serde_json::from_str(r#"{"years": 1, "months": 0}"#).unwrap();
        assert_eq!(span.total_months, 0);
        span.recompute();
        assert_eq!(span.total_months, 12);
    }

    #[test]
    fn test_huge_years_saturate_instead_of_wrapping() {
        let mut span: SentenceSpan =
            serde_json::from_str(r#"{"years": 400000000, "months": 0}"#).unwrap();
        span.recompute();
        assert_eq!(span.total(), u32::MAX);

        let mut out = Vec::new();
        span.check("starting_point.sentence", &mut out);
        assert_eq!(out.len(), 1);
        assert!(out[0].reason.contains("exceeds the maximum"));
    }

    #[test]
    fn test_check_accepts_ordinary_spans() {
        let mut out = Vec::new();
        SentenceSpan::new(30, 0).check("sentence", &mut out);
        assert!(out.is_empty());
    }
}
