//! Three-stage pipeline driver
//!
//! Drives judgement → defendants → trials for one document. Stages run
//! strictly sequentially because stages 2 and 3 are conditioned on the
//! identity context only a validated judgement can produce; retries within a
//! stage are sequential because each attempt's failure feeds the next.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use gavel_domain::schema_export;
use gavel_domain::violation::render_violations;
use gavel_domain::{
    ChargeAdjacency, DefendantRoster, Defendants, Judgement, ModelFailure, ModelProvider,
    ModelRequest, Stage, Trials, Violation,
};
use serde::Serialize;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::PipelineConfig;
use crate::error::ExtractorError;
use crate::parser::parse_model_output;
use crate::persist::write_stage_output;
use crate::prompt;
use crate::stage::{after_failure, next_attempt, StageState};

/// Outcome of one stage, as observed by callers.
#[derive(Debug, Clone)]
pub enum StageOutcome {
    /// Validated entity persisted to disk.
    Done {
        /// Attempts used.
        attempts: u32,
        /// Trace id injected into the persisted document.
        tracing_id: Uuid,
        /// Where the output was written.
        path: PathBuf,
    },
    /// Retry budget exhausted.
    Failed {
        /// Attempts used.
        attempts: u32,
        /// Last recorded failure reason.
        reason: String,
    },
    /// Not attempted because an earlier stage failed.
    Skipped,
}

/// Per-stage result within a case report.
#[derive(Debug, Clone)]
pub struct StageReport {
    /// The stage.
    pub stage: Stage,
    /// What happened.
    pub outcome: StageOutcome,
}

/// Result of running the full pipeline over one document.
#[derive(Debug, Clone)]
pub struct CaseReport {
    /// Caller-supplied case identifier; also the output directory name.
    pub case_id: String,
    /// One report per stage, in pipeline order.
    pub stages: Vec<StageReport>,
}

impl CaseReport {
    /// Whether every stage completed.
    pub fn succeeded(&self) -> bool {
        self.stages
            .iter()
            .all(|report| matches!(report.outcome, StageOutcome::Done { .. }))
    }

    /// The first failed stage and its reason, if any.
    pub fn first_failure(&self) -> Option<(Stage, &str)> {
        self.stages.iter().find_map(|report| match &report.outcome {
            StageOutcome::Failed { reason, .. } => Some((report.stage, reason.as_str())),
            _ => None,
        })
    }
}

/// Result of running one stage internally: the entity is kept for identity
/// context, the report for the caller.
enum StageRun<T> {
    Done {
        entity: T,
        attempts: u32,
        tracing_id: Uuid,
        path: PathBuf,
    },
    Failed {
        attempts: u32,
        reason: String,
    },
}

/// The Orchestrator drives the three extraction stages for one document at a
/// time. Instances are cheap to clone-per-document; they share no mutable
/// state.
pub struct Orchestrator<P>
where
    P: ModelProvider + 'static,
{
    provider: Arc<P>,
    config: PipelineConfig,
    out_dir: PathBuf,
}

impl<P> Orchestrator<P>
where
    P: ModelProvider + 'static,
{
    /// Create an orchestrator writing outputs under `out_dir`.
    pub fn new(provider: P, config: PipelineConfig, out_dir: impl AsRef<Path>) -> Self {
        Self {
            provider: Arc::new(provider),
            config,
            out_dir: out_dir.as_ref().to_path_buf(),
        }
    }

    /// Output directory this orchestrator writes under.
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Run the full pipeline for one document.
    ///
    /// A stage failure marks the remaining stages `Skipped` and is reported,
    /// not returned as an error; earlier stages' outputs stay on disk.
    /// Errors are reserved for the environment: I/O, configuration, runtime.
    pub async fn run_case(
        &self,
        case_id: &str,
        input: &str,
    ) -> Result<CaseReport, ExtractorError> {
        if input.len() > self.config.max_text_length {
            return Err(ExtractorError::TextTooLong(
                input.len(),
                self.config.max_text_length,
            ));
        }

        info!(case_id, input_len = input.len(), "starting extraction");

        let mut stages = Vec::with_capacity(3);

        let judgement_run = self
            .run_stage(
                case_id,
                Stage::Judgement,
                schema_export::judgement_schema(),
                None,
                input,
                Judgement::from_value,
            )
            .await?;

        let judgement = match judgement_run {
            StageRun::Done {
                entity,
                attempts,
                tracing_id,
                path,
            } => {
                stages.push(StageReport {
                    stage: Stage::Judgement,
                    outcome: StageOutcome::Done {
                        attempts,
                        tracing_id,
                        path,
                    },
                });
                entity
            }
            StageRun::Failed { attempts, reason } => {
                stages.push(StageReport {
                    stage: Stage::Judgement,
                    outcome: StageOutcome::Failed { attempts, reason },
                });
                stages.push(StageReport {
                    stage: Stage::Defendants,
                    outcome: StageOutcome::Skipped,
                });
                stages.push(StageReport {
                    stage: Stage::Trials,
                    outcome: StageOutcome::Skipped,
                });
                return Ok(CaseReport {
                    case_id: case_id.to_string(),
                    stages,
                });
            }
        };

        let roster = DefendantRoster::from_judgement(&judgement);
        let adjacency = ChargeAdjacency::from_judgement(&judgement);

        let defendants_run = self
            .run_stage(
                case_id,
                Stage::Defendants,
                schema_export::defendants_schema(),
                Some(prompt::defendants_context(&roster)),
                input,
                |value| Defendants::from_value(value, &roster),
            )
            .await?;

        let defendants_ok = match defendants_run {
            StageRun::Done {
                attempts,
                tracing_id,
                path,
                ..
            } => {
                stages.push(StageReport {
                    stage: Stage::Defendants,
                    outcome: StageOutcome::Done {
                        attempts,
                        tracing_id,
                        path,
                    },
                });
                true
            }
            StageRun::Failed { attempts, reason } => {
                stages.push(StageReport {
                    stage: Stage::Defendants,
                    outcome: StageOutcome::Failed { attempts, reason },
                });
                false
            }
        };

        if !defendants_ok {
            stages.push(StageReport {
                stage: Stage::Trials,
                outcome: StageOutcome::Skipped,
            });
            return Ok(CaseReport {
                case_id: case_id.to_string(),
                stages,
            });
        }

        let trials_run = self
            .run_stage(
                case_id,
                Stage::Trials,
                schema_export::trials_schema(),
                Some(prompt::trials_context(&adjacency)),
                input,
                |value| Trials::from_value(value, &adjacency),
            )
            .await?;

        stages.push(match trials_run {
            StageRun::Done {
                attempts,
                tracing_id,
                path,
                ..
            } => StageReport {
                stage: Stage::Trials,
                outcome: StageOutcome::Done {
                    attempts,
                    tracing_id,
                    path,
                },
            },
            StageRun::Failed { attempts, reason } => StageReport {
                stage: Stage::Trials,
                outcome: StageOutcome::Failed { attempts, reason },
            },
        });

        Ok(CaseReport {
            case_id: case_id.to_string(),
            stages,
        })
    }

    /// Run one stage's attempt loop to a terminal state.
    async fn run_stage<T, F>(
        &self,
        case_id: &str,
        stage: Stage,
        schema: serde_json::Value,
        context: Option<String>,
        input: &str,
        validate: F,
    ) -> Result<StageRun<T>, ExtractorError>
    where
        T: Serialize,
        F: Fn(serde_json::Value) -> Result<T, Vec<Violation>>,
    {
        let tracing_id = Uuid::now_v7();
        let mut state = StageState::Pending;

        while let Some((attempt, feedback)) = next_attempt(&state) {
            state = StageState::CallingModel { attempt };
            debug!(case_id, %stage, attempt, "calling model");

            let instructions =
                prompt::stage_instructions(stage, context.as_deref(), feedback.as_deref());
            let request = ModelRequest {
                stage,
                schema: schema.clone(),
                instructions,
                input: input.to_string(),
            };

            let reason = match self.call_model(request).await? {
                Ok(text) => {
                    state = StageState::Validating { attempt };
                    match parse_model_output(&text).map(&validate) {
                        Ok(Ok(entity)) => {
                            let serialized = serde_json::to_value(&entity)?;
                            let path = write_stage_output(
                                &self.out_dir,
                                case_id,
                                stage,
                                serialized,
                                tracing_id,
                            )?;
                            info!(case_id, %stage, attempt, %tracing_id, "stage validated");
                            return Ok(StageRun::Done {
                                entity,
                                attempts: attempt,
                                tracing_id,
                                path,
                            });
                        }
                        Ok(Err(violations)) => render_violations(&violations),
                        Err(parse_error) => parse_error.to_string(),
                    }
                }
                Err(ModelFailure::Refusal(_)) | Err(ModelFailure::EmptyOutput) => {
                    "the model did not return usable output. Respond with the requested JSON only"
                        .to_string()
                }
                Err(transport) => transport.to_string(),
            };

            warn!(case_id, %stage, attempt, reason, "attempt failed");
            state = after_failure(attempt, self.config.max_retries, reason);
        }

        match state {
            StageState::Failed { attempts, reason } => Ok(StageRun::Failed { attempts, reason }),
            other => Err(ExtractorError::Internal(format!(
                "{stage} attempt loop ended in non-terminal state {other:?}"
            ))),
        }
    }

    /// Invoke the provider on a blocking thread, bounded by the stage
    /// timeout. A timeout abandons the current attempt only.
    async fn call_model(
        &self,
        request: ModelRequest,
    ) -> Result<Result<String, ModelFailure>, ExtractorError> {
        let provider = Arc::clone(&self.provider);
        let handle = tokio::task::spawn_blocking(move || provider.generate_structured(&request));

        match timeout(self.config.stage_timeout(), handle).await {
            Err(_) => Ok(Err(ModelFailure::Transport(
                "attempt timed out".to_string(),
            ))),
            Ok(Err(join_error)) => Err(ExtractorError::Join(join_error.to_string())),
            Ok(Ok(result)) => Ok(result),
        }
    }
}
