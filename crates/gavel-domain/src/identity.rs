//! Identity resolution: defendant ids, charge numbers, and the
//! charge-to-defendant adjacency
//!
//! Deterministic and pure: re-running on the same judgement produces identical
//! ids. Never consults defendants- or trials-stage output.

use std::collections::HashMap;

use crate::judgement::{Charge, Judgement};

/// Assign 1-indexed charge numbers by position and defendant ids by
/// first-appearance order, overwriting whatever the model produced.
///
/// Called exactly once, at `Judgement` finalisation.
pub(crate) fn assign_ids(charges: &mut [Charge]) {
    let mut index: HashMap<String, u32> = HashMap::new();
    let mut next_id = 1u32;
    for (idx, charge) in charges.iter_mut().enumerate() {
        charge.charge_no = Some(idx as u32 + 1);
        for defendant in &mut charge.defendants_of_charge {
            let id = *index
                .entry(defendant.defendant_name.clone())
                .or_insert_with(|| {
                    let id = next_id;
                    next_id += 1;
                    id
                });
            defendant.defendant_id = Some(id);
        }
    }
}

/// The ordered defendant identity map for one judgement.
///
/// Injective (no two names share an id) and surjective onto `1..=N` with no
/// gaps; ids are stable once assigned and reused verbatim by the defendants
/// and trials passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefendantRoster {
    entries: Vec<(u32, String)>,
    index: HashMap<String, u32>,
}

impl DefendantRoster {
    /// Scan charges in order, defendants within each charge in order, and
    /// assign the next integer id (starting at 1) on first appearance.
    pub fn from_judgement(judgement: &Judgement) -> Self {
        let mut entries = Vec::new();
        let mut index = HashMap::new();
        for charge in &judgement.charges {
            for defendant in &charge.defendants_of_charge {
                if !index.contains_key(&defendant.defendant_name) {
                    let id = entries.len() as u32 + 1;
                    index.insert(defendant.defendant_name.clone(), id);
                    entries.push((id, defendant.defendant_name.clone()));
                }
            }
        }
        Self { entries, index }
    }

    /// Ordered `(id, name)` list.
    pub fn entries(&self) -> &[(u32, String)] {
        &self.entries
    }

    /// Look up a defendant id by display name.
    pub fn id_of(&self, name: &str) -> Option<u32> {
        self.index.get(name).copied()
    }

    /// Whether the id was assigned (ids are contiguous from 1).
    pub fn contains_id(&self, id: u32) -> bool {
        id >= 1 && id as usize <= self.entries.len()
    }

    /// Number of distinct defendants.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the judgement named no defendants.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Context text injected into the defendants-stage prompt:
    /// newline-delimited `"{id}. {name}"` lines.
    pub fn context_text(&self) -> String {
        self.entries
            .iter()
            .map(|(id, name)| format!("{id}. {name}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Per-charge defendant listing used by the trials stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeDefendants {
    /// 1-indexed charge number.
    pub charge_no: u32,
    /// Display name of the charge.
    pub charge_name: &'static str,
    /// Ordered `(defendant_id, defendant_name)` pairs under this charge.
    pub defendants: Vec<(u32, String)>,
}

/// Charge-to-defendant adjacency for one judgement.
///
/// Exposed both as a structured map (trials `charge_ref` cross-checks) and as
/// formatted context text (trials-stage prompt conditioning).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeAdjacency {
    charges: Vec<ChargeDefendants>,
}

impl ChargeAdjacency {
    /// Build from a finalised judgement (ids already assigned).
    pub fn from_judgement(judgement: &Judgement) -> Self {
        let charges = judgement
            .charges
            .iter()
            .map(|charge| ChargeDefendants {
                charge_no: charge.charge_no.unwrap_or_default(),
                charge_name: charge.charge_name.as_str(),
                defendants: charge
                    .defendants_of_charge
                    .iter()
                    .map(|d| (d.defendant_id.unwrap_or_default(), d.defendant_name.clone()))
                    .collect(),
            })
            .collect();
        Self { charges }
    }

    /// Per-charge listings in judgment order.
    pub fn charges(&self) -> &[ChargeDefendants] {
        &self.charges
    }

    /// Number of charges.
    pub fn charge_count(&self) -> usize {
        self.charges.len()
    }

    /// Whether this exact charge×defendant pair exists.
    pub fn contains(&self, charge_no: u32, defendant_id: u32) -> bool {
        self.charges
            .iter()
            .filter(|c| c.charge_no == charge_no)
            .any(|c| c.defendants.iter().any(|(id, _)| *id == defendant_id))
    }

    /// Context text injected into the trials-stage prompt:
    /// `"Charge {no}. {name}"` headers, each followed by indented
    /// `"  -> On Defendant {id}: {name}"` lines.
    pub fn context_text(&self) -> String {
        let mut out = String::new();
        for charge in &self.charges {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&format!("Charge {}. {}", charge.charge_no, charge.charge_name));
            for (id, name) in &charge.defendants {
                out.push_str(&format!("\n  -> On Defendant {id}: {name}"));
            }
        }
        out
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// For any sequence of charge defendant-name lists, assigned ids are
        /// exactly 1..=N with no gaps or repeats, by first appearance.
        #[test]
        fn test_ids_are_contiguous(names in proptest::collection::vec(
            proptest::collection::vec("[A-C][a-z]{1,4}", 1..4), 1..5)
        ) {
            let charges = names.iter().map(|defs| serde_json::json!({
                "charge_name": "Trafficking in a dangerous drug",
                "cross_border": {"cross_border": false, "import_export": null, "source": "s"},
                "defendants_of_charge": defs.iter()
                    .map(|n| serde_json::json!({"defendant_name": n}))
                    .collect::<Vec<_>>()
            })).collect::<Vec<_>>();
            let judgement = crate::judgement::Judgement::from_value(serde_json::json!({
                "neutral_citation": "[2024] HKDC 1",
                "judge_name": "J",
                "judgment_date_time": "2024-01-02T09:00:00",
                "representatives": [],
                "cases_heard": ["DCCC 1/2024"],
                "charges": charges
            })).unwrap();

            let roster = DefendantRoster::from_judgement(&judgement);
            let ids: Vec<u32> = roster.entries().iter().map(|(id, _)| *id).collect();
            let expected: Vec<u32> = (1..=roster.len() as u32).collect();
            prop_assert_eq!(ids, expected);

            // every stamped id resolves back to the same name
            for charge in &judgement.charges {
                for d in &charge.defendants_of_charge {
                    prop_assert_eq!(roster.id_of(&d.defendant_name), d.defendant_id);
                }
            }
        }
    }
}
