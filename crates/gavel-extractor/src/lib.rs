//! Gavel Extractor
//!
//! Drives the three-stage extraction pipeline over one court judgment:
//! judgement → defendants → trials.
//!
//! # Architecture
//!
//! ```text
//! Case text → Orchestrator → ModelProvider → domain factories → disk
//!                  ↑                              |
//!                  └──── violation feedback ──────┘
//! ```
//!
//! # Key behaviours
//!
//! - **Retry with feedback**: a validation failure re-injects the full
//!   violation list into the next attempt's instructions; model refusals and
//!   empty output retry with a generic warning. Budget is bounded
//!   (default 3 attempts per stage).
//! - **Identity context**: the validated judgement yields the defendant
//!   roster and charge adjacency, which condition the later stages' prompts
//!   and cross-checks.
//! - **Downstream abort**: an exhausted stage marks the remaining stages
//!   skipped for that document; earlier stages' outputs stay on disk and
//!   other documents are unaffected.
//!
//! # Example
//!
//! ```no_run
//! use gavel_extractor::{Orchestrator, PipelineConfig};
//! use gavel_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = MockProvider::new();
//! let orchestrator = Orchestrator::new(provider, PipelineConfig::default(), "out");
//!
//! let report = orchestrator.run_case("hkdc-2024-9", "THE COURT: ...").await?;
//! for stage in &report.stages {
//!     println!("{}: {:?}", stage.stage, stage.outcome);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod orchestrator;
mod parser;
mod persist;
mod prompt;
mod stage;


pub use config::PipelineConfig;
pub use error::ExtractorError;
pub use orchestrator::{CaseReport, Orchestrator, StageOutcome, StageReport};
pub use persist::{outputs_exist, stage_output_path};
pub use prompt::{defendants_context, stage_instructions, trials_context};
pub use stage::StageState;
