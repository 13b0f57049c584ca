//! JSON-schema export for the stage entities
//!
//! The schemas are derived from the entity types themselves, so the contract
//! sent to the model can never drift from what the factories will accept.

use schemars::schema_for;

use crate::defendants::Defendants;
use crate::judgement::Judgement;
use crate::traits::Stage;
use crate::trials::Trials;

/// JSON schema for the judgement stage.
pub fn judgement_schema() -> serde_json::Value {
    serde_json::to_value(schema_for!(Judgement)).unwrap_or_default()
}

/// JSON schema for the defendants stage.
pub fn defendants_schema() -> serde_json::Value {
    serde_json::to_value(schema_for!(Defendants)).unwrap_or_default()
}

/// JSON schema for the trials stage.
pub fn trials_schema() -> serde_json::Value {
    serde_json::to_value(schema_for!(Trials)).unwrap_or_default()
}

/// JSON schema for the given stage.
pub fn schema_for_stage(stage: Stage) -> serde_json::Value {
    match stage {
        Stage::Judgement => judgement_schema(),
        Stage::Defendants => defendants_schema(),
        Stage::Trials => trials_schema(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schemas_are_objects() {
        for stage in Stage::all() {
            let schema = schema_for_stage(stage);
            assert!(schema.is_object(), "{stage} schema is not an object");
        }
    }

    #[test]
    fn test_judgement_schema_names_charges() {
        let schema = judgement_schema();
        let properties = schema["properties"].as_object().unwrap();
        assert!(properties.contains_key("charges"));
        assert!(properties.contains_key("neutral_citation"));
    }

    #[test]
    fn test_trials_schema_carries_enum_values() {
        let rendered = trials_schema().to_string();
        assert!(rendered.contains("Methamphetamine"));
        assert!(rendered.contains("Up to committal"));
    }
}
