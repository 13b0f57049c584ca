//! Gavel Domain Layer
//!
//! Entity schemas, enumerations, derived fields, and construction-time
//! validation for structured sentencing facts extracted from Hong Kong
//! drug-trafficking judgments.
//!
//! ## Key Concepts
//!
//! - **Stage entities**: `Judgement`, `Defendants`, `Trials` — one per
//!   extraction pass, each built through a factory that either returns a fully
//!   valid entity or the complete list of [`Violation`]s.
//! - **Derived fields**: never independently settable — court code from the
//!   citation, day-of-week/holiday flag from a date, district from a
//!   sub-district, total-months from (years, months). Recomputed at
//!   construction so persisted documents round-trip to equal entities.
//! - **Identity**: defendant ids by first-appearance order and 1-indexed
//!   charge numbers, assigned exactly once at `Judgement` finalisation.
//! - **Evidence**: every populated fact carries a `source` span quoted from
//!   the judgment text.
//!
//! ## Architecture
//!
//! Pure business logic only: no I/O, no network access. The model-call seam is
//! the [`traits::ModelProvider`] trait; infrastructure implementations live in
//! other crates.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod calendar;
pub mod defendants;
pub mod districts;
pub mod identity;
pub mod judgement;
pub mod schema_export;
pub mod sentence;
pub mod traits;
pub mod trials;
pub mod violation;

// Re-exports for convenience
pub use defendants::{DefendantProfile, Defendants, Nationality, NationalityCategory};
pub use districts::{District, SubDistrict};
pub use identity::{ChargeAdjacency, DefendantRoster};
pub use judgement::{Charge, ChargeForDefendant, ChargeName, Judgement};
pub use sentence::SentenceSpan;
pub use traits::{ModelFailure, ModelProvider, ModelRequest, Stage};
pub use trials::{GuiltyPleaDetail, Trial, Trials};
pub use violation::{Violation, ViolationKind};
