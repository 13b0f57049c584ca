//! Stage-output persistence
//!
//! One JSON document per stage per case at `<out_dir>/<case_id>/<stage>.json`:
//! the validated entity's serde output plus an injected `tracing_id` field.
//! Field names are a durable contract other tooling reads.

use std::fs;
use std::path::{Path, PathBuf};

use gavel_domain::Stage;
use serde_json::Value;
use uuid::Uuid;

use crate::error::ExtractorError;

/// Path of the persisted output for a stage of a case.
pub fn stage_output_path(out_dir: &Path, case_id: &str, stage: Stage) -> PathBuf {
    out_dir.join(case_id).join(format!("{stage}.json"))
}

/// Whether all three stage outputs already exist for a case.
pub fn outputs_exist(out_dir: &Path, case_id: &str) -> bool {
    Stage::all()
        .iter()
        .all(|stage| stage_output_path(out_dir, case_id, *stage).exists())
}

/// Write a validated stage entity to disk with its tracing id injected.
pub fn write_stage_output(
    out_dir: &Path,
    case_id: &str,
    stage: Stage,
    mut entity: Value,
    tracing_id: Uuid,
) -> Result<PathBuf, ExtractorError> {
    if let Value::Object(map) = &mut entity {
        map.insert(
            "tracing_id".to_string(),
            Value::String(tracing_id.to_string()),
        );
    }

    let path = stage_output_path(out_dir, case_id, stage);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut rendered = serde_json::to_string_pretty(&entity)?;
    rendered.push('\n');
    fs::write(&path, rendered)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_path_shape() {
        let path = stage_output_path(Path::new("/tmp/out"), "case-1", Stage::Trials);
        assert_eq!(path, PathBuf::from("/tmp/out/case-1/trials.json"));
    }

    #[test]
    fn test_write_injects_tracing_id() {
        let dir = tempfile::tempdir().unwrap();
        let tracing_id = Uuid::now_v7();
        let path = write_stage_output(
            dir.path(),
            "case-1",
            Stage::Judgement,
            json!({"judge_name": "Judge Ho"}),
            tracing_id,
        )
        .unwrap();

        let written: Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(written["judge_name"], "Judge Ho");
        assert_eq!(written["tracing_id"], tracing_id.to_string());
    }

    #[test]
    fn test_outputs_exist_requires_all_stages() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!outputs_exist(dir.path(), "case-1"));

        for stage in [Stage::Judgement, Stage::Defendants] {
            write_stage_output(dir.path(), "case-1", stage, json!({}), Uuid::now_v7()).unwrap();
        }
        assert!(!outputs_exist(dir.path(), "case-1"));

        write_stage_output(dir.path(), "case-1", Stage::Trials, json!({}), Uuid::now_v7())
            .unwrap();
        assert!(outputs_exist(dir.path(), "case-1"));
    }
}
