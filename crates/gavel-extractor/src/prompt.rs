//! Stage instructions and identity-context injection
//!
//! The context lists reproduce the exact textual shape the model is
//! conditioned on: `"{id}. {name}"` lines for the defendants stage, and
//! `"Charge {no}. {name}"` headers with indented defendant lines for the
//! trials stage.

use gavel_domain::{ChargeAdjacency, DefendantRoster, Stage};

/// Build the full instruction text for a stage attempt.
///
/// `context` is the identity context from the judgement stage (none for the
/// judgement stage itself); `last_error` is the failure text from the
/// previous attempt, if any.
pub fn stage_instructions(
    stage: Stage,
    context: Option<&str>,
    last_error: Option<&str>,
) -> String {
    let mut instructions = format!(
        "Extract {stage} according to the provided schema. \
         If a feature is not mentioned in the case, set the corresponding field to null, \
         but check the case text thoroughly."
    );

    if let Some(context) = context {
        instructions.push_str("\n\n");
        instructions.push_str(context);
    }

    if let Some(error) = last_error {
        instructions.push_str(&format!(
            "\n\nPrevious attempt failed with error: {error}. Please try again carefully."
        ));
    }

    instructions
}

/// Identity context for the defendants stage.
pub fn defendants_context(roster: &DefendantRoster) -> String {
    format!(
        "The defendants in this case, with their assigned ids:\n{}",
        roster.context_text()
    )
}

/// Identity context for the trials stage.
pub fn trials_context(adjacency: &ChargeAdjacency) -> String {
    format!(
        "The charges in this case and the defendants on each, with their assigned numbers:\n{}",
        adjacency.context_text()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use gavel_domain::Judgement;
    use serde_json::json;

    fn judgement() -> Judgement {
        Judgement::from_value(json!({
            "neutral_citation": "[2024] HKDC 321",
            "judge_name": "Judge Leung",
            "judgment_date_time": "2024-05-03T14:15:00",
            "representatives": [],
            "cases_heard": ["DCCC 101/2024"],
            "charges": [{
                "charge_name": "Trafficking in a dangerous drug",
                "cross_border": {"cross_border": false, "import_export": null, "source": "s"},
                "defendants_of_charge": [
                    {"defendant_name": "Chan Tai Man"},
                    {"defendant_name": "Lee Siu Ming"}
                ]
            }]
        }))
        .unwrap()
    }

    #[test]
    fn test_base_instructions_name_the_stage() {
        let instructions = stage_instructions(Stage::Judgement, None, None);
        assert!(instructions.starts_with("Extract judgement according to the provided schema."));
        assert!(instructions.contains("set the corresponding field to null"));
        assert!(!instructions.contains("Previous attempt"));
    }

    #[test]
    fn test_error_context_appended_on_retry() {
        let instructions = stage_instructions(
            Stage::Defendants,
            None,
            Some("- charges[0].charge_name (schema): unknown variant"),
        );
        assert!(instructions.contains(
            "Previous attempt failed with error: - charges[0].charge_name (schema): \
             unknown variant. Please try again carefully."
        ));
    }

    #[test]
    fn test_defendants_context_lists_roster() {
        let roster = DefendantRoster::from_judgement(&judgement());
        let context = defendants_context(&roster);
        assert!(context.contains("1. Chan Tai Man\n2. Lee Siu Ming"));
    }

    #[test]
    fn test_trials_context_lists_adjacency() {
        let adjacency = ChargeAdjacency::from_judgement(&judgement());
        let context = trials_context(&adjacency);
        assert!(context.contains("Charge 1. Trafficking in a dangerous drug"));
        assert!(context.contains("  -> On Defendant 1: Chan Tai Man"));
        assert!(context.contains("  -> On Defendant 2: Lee Siu Ming"));
    }

    #[test]
    fn test_context_sits_between_instructions_and_error() {
        let roster = DefendantRoster::from_judgement(&judgement());
        let context = defendants_context(&roster);
        let instructions =
            stage_instructions(Stage::Defendants, Some(&context), Some("some failure"));
        let context_pos = instructions.find("The defendants in this case").unwrap();
        let error_pos = instructions.find("Previous attempt failed").unwrap();
        assert!(context_pos < error_pos);
    }
}
