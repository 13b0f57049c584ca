//! Trials-stage entities: sentencing analysis per charge and defendant
//!
//! Each `Trial` addresses one charge x defendant pair and carries the drug
//! particulars, role, factor lists, guilty plea, and the sentence chain from
//! starting point to final sentence.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::identity::ChargeAdjacency;
use crate::sentence::SentenceSpan;
use crate::violation::{check_source, Violation};

/// Dangerous drug types recognised by the Hong Kong Police drug guide.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum DrugType {
    #[serde(rename = "Cannabis")]
    Cannabis,
    #[serde(rename = "THC/CBD")]
    ThcCbd,
    #[serde(rename = "Cathinones")]
    Cathinones,
    #[serde(rename = "Cocaine")]
    Cocaine,
    #[serde(rename = "Cough medicine")]
    CoughMedicine,
    #[serde(rename = "Ecstasy")]
    Ecstasy,
    #[serde(rename = "GHB/GBL")]
    GhbGbl,
    #[serde(rename = "Heroin")]
    Heroin,
    #[serde(rename = "Ketamine")]
    Ketamine,
    #[serde(rename = "Nimetazepam")]
    Nimetazepam,
    #[serde(rename = "Morphine")]
    Morphine,
    #[serde(rename = "Methamphetamine")]
    Methamphetamine,
    #[serde(rename = "Salvia")]
    Salvia,
    #[serde(rename = "TFMPP")]
    Tfmpp,
    #[serde(rename = "Etomidate")]
    Etomidate,
    #[serde(rename = "Other")]
    Other,
}

/// Role of the defendant in the trafficking operation.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum DefendantRole {
    #[serde(rename = "Courier")]
    Courier,
    #[serde(rename = "Storekeeper")]
    Storekeeper,
    #[serde(rename = "Lookout/scout")]
    Lookout,
    #[serde(rename = "Actual trafficker")]
    ActualTrafficker,
    #[serde(rename = "Manager/organizer")]
    Manager,
    #[serde(rename = "Operator/financial controller")]
    Operator,
    #[serde(rename = "International operator/financial controller")]
    InternationalOperator,
    #[serde(rename = "Other")]
    Other,
}

/// Aggravating factors a judge may address.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum AggravatingFactor {
    #[serde(rename = "Refugee/Asylum")]
    RefugeeAsylum,
    #[serde(rename = "Illegal immigrant")]
    IllegalImmigrant,
    #[serde(rename = "On bail")]
    OnBail,
    #[serde(rename = "Suspended sentence")]
    SuspendedSentence,
    #[serde(rename = "CSD supervision")]
    CsdSupervision,
    #[serde(rename = "Wanted")]
    Wanted,
    #[serde(rename = "Persistent offender")]
    PersistentOffender,
    #[serde(rename = "Import")]
    CrossBorderImport,
    #[serde(rename = "Export")]
    CrossBorderExport,
    #[serde(rename = "Use of minors")]
    UseOfMinors,
    #[serde(rename = "Multiple drugs")]
    MultipleDrugTypes,
    #[serde(rename = "Role of the defendant")]
    RoleOfDefendant,
    #[serde(rename = "Other")]
    Other,
}

/// Mitigating factors a judge may address, excluding the guilty plea.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum MitigatingFactor {
    #[serde(rename = "Voluntary surrender")]
    VoluntarySurrender,
    #[serde(rename = "Self-consumption")]
    SelfConsumption,
    #[serde(rename = "Assistance - limited")]
    AssistanceLimited,
    #[serde(rename = "Assistance - useful")]
    AssistanceUseful,
    #[serde(rename = "Assistance - testify")]
    AssistanceTestify,
    #[serde(rename = "Assistance - risk")]
    AssistanceRisk,
    #[serde(rename = "Extreme youth")]
    ExtremeYouth,
    #[serde(rename = "Young offender")]
    YoungOffender,
    #[serde(rename = "Medical conditions")]
    MedicalConditions,
    #[serde(rename = "Family illness")]
    FamilyIllness,
    #[serde(rename = "Prosecutorial delay")]
    ProsecutorialDelay,
    #[serde(rename = "Mistaken belief")]
    MistakenBelief,
    #[serde(rename = "Rehabilitation programme")]
    RehabilitationProgramme,
    #[serde(rename = "Other")]
    Other,
}

/// Court where the plea was entered.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum CourtType {
    #[serde(rename = "High Court")]
    HighCourt,
    #[serde(rename = "District Court")]
    DistrictCourt,
}

/// Stage of a guilty plea entered in the High Court.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum HighCourtPleaStage {
    #[serde(rename = "Unknown")]
    Unknown,
    #[serde(rename = "Up to committal")]
    UpToCommittal,
    #[serde(rename = "After committal")]
    AfterCommittal,
    #[serde(rename = "After dates fixed")]
    AfterDatesFixed,
    #[serde(rename = "First day")]
    FirstDay,
    #[serde(rename = "During trial")]
    DuringTrial,
}

/// Stage of a guilty plea entered in the District Court.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum DistrictCourtPleaStage {
    #[serde(rename = "Unknown")]
    Unknown,
    #[serde(rename = "Plea day")]
    PleaDay,
    #[serde(rename = "After dates fixed")]
    AfterDatesFixed,
    #[serde(rename = "First day")]
    FirstDay,
    #[serde(rename = "During trial")]
    DuringTrial,
}

/// Reference tying a trial back to a charge x defendant pair from the
/// judgement stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ChargeRef {
    /// Charge number as listed in the prompt context.
    pub charge_no: u32,
    /// Defendant id as listed in the prompt context.
    pub defendant_id: u32,
}

/// One drug type and quantity involved in the offence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DrugDetail {
    /// Type of dangerous drug.
    pub drug_type: DrugType,
    /// Free-text drug name, required when `drug_type` is `Other`.
    pub other_drug_type: Option<String>,
    /// Quantity in grams.
    pub quantity: f64,
    /// Quoted span.
    pub source: String,
}

impl DrugDetail {
    fn validate(&self, path: &str, out: &mut Vec<Violation>) {
        if self.drug_type == DrugType::Other && self.other_drug_type.is_none() {
            out.push(Violation::schema(
                format!("{path}.other_drug_type"),
                "other_drug_type is required when drug_type is 'Other'",
            ));
        }
        if !self.quantity.is_finite() || self.quantity < 0.0 {
            out.push(Violation::schema(
                format!("{path}.quantity"),
                format!("quantity must be a non-negative number of grams, got {}", self.quantity),
            ));
        }
        check_source(&self.source, path, out);
    }
}

/// The defendant's role in the operation, as found by the judge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RoleDetail {
    /// Role in the trafficking operation.
    pub role: DefendantRole,
    /// Quoted span.
    pub source: String,
}

/// An aggravating factor explicitly addressed by the judge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AggravatingFactorDetail {
    /// The factor.
    pub factor: AggravatingFactor,
    /// Free-text factor, required when `factor` is `Other`.
    pub other_factor: Option<String>,
    /// Enhancement in months, or null when the judge acknowledged the factor
    /// without imposing one.
    pub enhancement: Option<u32>,
    /// Quoted span.
    pub source: String,
}

impl AggravatingFactorDetail {
    fn validate(&self, path: &str, out: &mut Vec<Violation>) {
        if self.factor == AggravatingFactor::Other && self.other_factor.is_none() {
            out.push(Violation::schema(
                format!("{path}.other_factor"),
                "other_factor is required when factor is 'Other'",
            ));
        }
        check_source(&self.source, path, out);
    }
}

/// A mitigating factor explicitly addressed by the judge, excluding the
/// guilty plea.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MitigatingFactorDetail {
    /// The factor.
    pub factor: MitigatingFactor,
    /// Free-text factor, required when `factor` is `Other`.
    pub other_factor: Option<String>,
    /// Reduction in months, or null when the judge acknowledged the factor
    /// without granting one.
    pub reduction: Option<u32>,
    /// Quoted span.
    pub source: String,
}

impl MitigatingFactorDetail {
    fn validate(&self, path: &str, out: &mut Vec<Violation>) {
        if self.factor == MitigatingFactor::Other && self.other_factor.is_none() {
            out.push(Violation::schema(
                format!("{path}.other_factor"),
                "other_factor is required when factor is 'Other'",
            ));
        }
        check_source(&self.source, path, out);
    }
}

/// Guilty plea and, when entered, the court and stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GuiltyPleaDetail {
    /// Whether the defendant pleaded guilty.
    pub pleaded_guilty: bool,
    /// Court where the plea was entered; required when `pleaded_guilty`.
    pub court_type: Option<CourtType>,
    /// Plea stage; required when `court_type` is `High Court`.
    pub high_court_stage: Option<HighCourtPleaStage>,
    /// Plea stage; required when `court_type` is `District Court`.
    pub district_court_stage: Option<DistrictCourtPleaStage>,
    /// Quoted span.
    pub source: String,
}

impl GuiltyPleaDetail {
    fn validate(&self, path: &str, out: &mut Vec<Violation>) {
        match self.court_type {
            None => {
                if self.pleaded_guilty {
                    out.push(Violation::schema(
                        format!("{path}.court_type"),
                        "court_type is required when pleaded_guilty is true",
                    ));
                }
            }
            Some(CourtType::HighCourt) => {
                if self.high_court_stage.is_none() {
                    out.push(Violation::schema(
                        format!("{path}.high_court_stage"),
                        "high_court_stage is required when court_type is 'High Court'",
                    ));
                }
                if self.district_court_stage.is_some() {
                    out.push(Violation::schema(
                        format!("{path}.district_court_stage"),
                        "district_court_stage must be null when court_type is 'High Court'",
                    ));
                }
            }
            Some(CourtType::DistrictCourt) => {
                if self.district_court_stage.is_none() {
                    out.push(Violation::schema(
                        format!("{path}.district_court_stage"),
                        "district_court_stage is required when court_type is 'District Court'",
                    ));
                }
                if self.high_court_stage.is_some() {
                    out.push(Violation::schema(
                        format!("{path}.high_court_stage"),
                        "high_court_stage must be null when court_type is 'District Court'",
                    ));
                }
            }
        }
        check_source(&self.source, path, out);
    }
}

/// Starting point of sentence based on drug type and quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StartingPointDetail {
    /// Sentence length.
    pub sentence: SentenceSpan,
    /// Quoted span.
    pub source: String,
}

/// Sentence after taking the defendant's role into account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SentenceAfterRoleDetail {
    /// Sentence length.
    pub sentence: SentenceSpan,
    /// Quoted span, or the inference note when substituted.
    pub source: String,
}

/// Notional sentence: starting point plus aggravation enhancements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NotionalSentenceDetail {
    /// Sentence length.
    pub sentence: SentenceSpan,
    /// Quoted span.
    pub source: String,
}

/// Total reduction granted for mitigating factors, excluding the guilty plea.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MitigationReductionDetail {
    /// Reduction granted.
    pub reduction: SentenceSpan,
    /// Quoted span.
    pub source: String,
}

/// Final sentence for the charge, including any guilty-plea reduction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FinalSentenceDetail {
    /// Sentence length.
    pub sentence: SentenceSpan,
    /// Reduction specifically due to the guilty plea, when quantified.
    pub guilty_plea_reduction: Option<SentenceSpan>,
    /// Quoted span.
    pub source: String,
}

/// Source string used when the after-role sentence is substituted with the
/// starting point.
const INFERRED_AFTER_ROLE: &str =
    "Inferred as starting point since role adjustment not provided";

/// Sentencing analysis for one charge x defendant pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Trial {
    /// The charge and defendant this trial entry addresses.
    pub charge_ref: ChargeRef,
    /// Drugs involved in the offence.
    pub drugs: Vec<DrugDetail>,
    /// Roles the judge found the defendant played; may be empty.
    #[serde(default)]
    pub roles: Vec<RoleDetail>,
    /// Aggravating factors explicitly addressed by the judge.
    pub aggravating_factors: Option<Vec<AggravatingFactorDetail>>,
    /// Mitigating factors explicitly addressed by the judge.
    pub mitigating_factors: Option<Vec<MitigatingFactorDetail>>,
    /// Guilty plea.
    pub guilty_plea: GuiltyPleaDetail,
    /// Starting point of the sentence.
    pub starting_point: StartingPointDetail,
    /// Sentence after role adjustment; substituted with the starting point
    /// when not stated.
    pub sentence_after_role: Option<SentenceAfterRoleDetail>,
    /// Notional sentence.
    pub notional_sentence: NotionalSentenceDetail,
    /// Total mitigation reduction, excluding the guilty plea.
    pub mitigation_reduction: Option<MitigationReductionDetail>,
    /// Final sentence.
    pub final_sentence: FinalSentenceDetail,
}

impl Trial {
    fn recompute_spans(&mut self) {
        self.starting_point.sentence.recompute();
        if let Some(after_role) = &mut self.sentence_after_role {
            after_role.sentence.recompute();
        }
        self.notional_sentence.sentence.recompute();
        if let Some(mitigation) = &mut self.mitigation_reduction {
            mitigation.reduction.recompute();
        }
        self.final_sentence.sentence.recompute();
        if let Some(plea) = &mut self.final_sentence.guilty_plea_reduction {
            plea.recompute();
        }
    }

    fn validate(&mut self, path: &str, adjacency: &ChargeAdjacency, out: &mut Vec<Violation>) {
        if !adjacency.contains(self.charge_ref.charge_no, self.charge_ref.defendant_id) {
            out.push(Violation::invariant(
                format!("{path}.charge_ref"),
                format!(
                    "charge {} with defendant {} is not a listed charge-defendant pair",
                    self.charge_ref.charge_no, self.charge_ref.defendant_id
                ),
            ));
        }
        if self.drugs.is_empty() {
            out.push(Violation::schema(
                format!("{path}.drugs"),
                "at least one drug must be listed for the charge",
            ));
        }
        for (i, drug) in self.drugs.iter().enumerate() {
            drug.validate(&format!("{path}.drugs[{i}]"), out);
        }
        for (i, role) in self.roles.iter().enumerate() {
            check_source(&role.source, &format!("{path}.roles[{i}]"), out);
        }
        if let Some(factors) = &self.aggravating_factors {
            for (i, factor) in factors.iter().enumerate() {
                factor.validate(&format!("{path}.aggravating_factors[{i}]"), out);
            }
        }
        if let Some(factors) = &self.mitigating_factors {
            for (i, factor) in factors.iter().enumerate() {
                factor.validate(&format!("{path}.mitigating_factors[{i}]"), out);
            }
        }
        self.guilty_plea.validate(&format!("{path}.guilty_plea"), out);

        check_source(
            &self.starting_point.source,
            &format!("{path}.starting_point"),
            out,
        );
        self.starting_point
            .sentence
            .check(&format!("{path}.starting_point.sentence"), out);
        check_source(
            &self.notional_sentence.source,
            &format!("{path}.notional_sentence"),
            out,
        );
        self.notional_sentence
            .sentence
            .check(&format!("{path}.notional_sentence.sentence"), out);
        check_source(
            &self.final_sentence.source,
            &format!("{path}.final_sentence"),
            out,
        );
        self.final_sentence
            .sentence
            .check(&format!("{path}.final_sentence.sentence"), out);
        if let Some(plea_reduction) = &self.final_sentence.guilty_plea_reduction {
            plea_reduction.check(&format!("{path}.final_sentence.guilty_plea_reduction"), out);
        }
        if let Some(after_role) = &self.sentence_after_role {
            check_source(
                &after_role.source,
                &format!("{path}.sentence_after_role"),
                out,
            );
            after_role
                .sentence
                .check(&format!("{path}.sentence_after_role.sentence"), out);
        }
        if let Some(mitigation) = &self.mitigation_reduction {
            check_source(
                &mitigation.source,
                &format!("{path}.mitigation_reduction"),
                out,
            );
            mitigation
                .reduction
                .check(&format!("{path}.mitigation_reduction.reduction"), out);
        }

        self.check_sentence_flow(path, out);
    }

    /// The sentence-arithmetic chain. The only defaulting rule in the whole
    /// schema lives here: a missing after-role sentence is substituted with
    /// the starting point and tagged as inferred. Mitigation and guilty-plea
    /// reductions are never defaulted.
    fn check_sentence_flow(&mut self, path: &str, out: &mut Vec<Violation>) {
        if self.sentence_after_role.is_none() {
            self.sentence_after_role = Some(SentenceAfterRoleDetail {
                sentence: self.starting_point.sentence,
                source: INFERRED_AFTER_ROLE.to_owned(),
            });
        }
        // Always Some past this point.
        let after_role = match &self.sentence_after_role {
            Some(detail) => i64::from(detail.sentence.total_months),
            None => return,
        };
        let notional = i64::from(self.notional_sentence.sentence.total_months);
        let final_months = i64::from(self.final_sentence.sentence.total_months);

        if notional < after_role {
            out.push(Violation::invariant(
                format!("{path}.notional_sentence"),
                format!(
                    "notional sentence ({notional} months) cannot be less than the sentence \
                     after role adjustment ({after_role} months)"
                ),
            ));
        }

        let mut current = notional;
        if let Some(mitigation) = &self.mitigation_reduction {
            current -= i64::from(mitigation.reduction.total_months);
        }

        if final_months > current {
            out.push(Violation::invariant(
                format!("{path}.final_sentence"),
                format!(
                    "final sentence ({final_months} months) cannot be greater than the notional \
                     sentence minus mitigation reduction ({current} months)"
                ),
            ));
        }

        if let Some(plea_reduction) = &self.final_sentence.guilty_plea_reduction {
            let expected = current - i64::from(plea_reduction.total_months);
            if final_months != expected {
                out.push(Violation::invariant(
                    format!("{path}.final_sentence"),
                    format!(
                        "final sentence ({final_months} months) must equal the notional sentence \
                         minus mitigation reduction minus guilty-plea reduction ({expected} months)"
                    ),
                ));
            }
        }
    }
}

/// The validated trials-stage entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Trials {
    /// One entry per charge x defendant pair discussed in the judgment.
    pub trials: Vec<Trial>,
}

impl Trials {
    /// Build validated `Trials` from raw model output, cross-checking each
    /// charge reference against the judgement stage's charge adjacency.
    pub fn from_value(
        value: serde_json::Value,
        adjacency: &ChargeAdjacency,
    ) -> Result<Self, Vec<Violation>> {
        let trials: Trials = serde_json::from_value(value)
            .map_err(|e| vec![Violation::schema("$", e.to_string())])?;
        trials.finalize(adjacency)
    }

    fn finalize(mut self, adjacency: &ChargeAdjacency) -> Result<Self, Vec<Violation>> {
        let mut violations = Vec::new();
        if self.trials.is_empty() {
            violations.push(Violation::schema(
                "trials",
                "at least one trial entry must be provided",
            ));
        }
        let mut seen = std::collections::HashSet::new();
        for (i, trial) in self.trials.iter_mut().enumerate() {
            trial.recompute_spans();
            if !seen.insert((trial.charge_ref.charge_no, trial.charge_ref.defendant_id)) {
                violations.push(Violation::invariant(
                    format!("trials[{i}].charge_ref"),
                    format!(
                        "duplicate trial entry for charge {} and defendant {}",
                        trial.charge_ref.charge_no, trial.charge_ref.defendant_id
                    ),
                ));
            }
            trial.validate(&format!("trials[{i}]"), adjacency, &mut violations);
        }
        if violations.is_empty() {
            Ok(self)
        } else {
            Err(violations)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::judgement::Judgement;
    use crate::ViolationKind;
    use serde_json::json;

    fn adjacency() -> ChargeAdjacency {
        let judgement = Judgement::from_value(json!({
            "neutral_citation": "[2023] HKCFI 120",
            "judge_name": "Mr Justice Wong",
            "judgment_date_time": "2023-06-12T10:00:00",
            "representatives": [],
            "cases_heard": ["HCCC 77/2023"],
            "charges": [{
                "charge_name": "Trafficking in a dangerous drug",
                "cross_border": {"cross_border": false, "import_export": null, "source": "s"},
                "defendants_of_charge": [{"defendant_name": "Chan Tai Man"}]
            }]
        }))
        .unwrap();
        ChargeAdjacency::from_judgement(&judgement)
    }

    fn trial_value() -> serde_json::Value {
        json!({
            "charge_ref": {"charge_no": 1, "defendant_id": 1},
            "drugs": [{
                "drug_type": "Cocaine",
                "other_drug_type": null,
                "quantity": 48.2,
                "source": "48.2 grammes of a solid containing cocaine"
            }],
            "roles": [],
            "aggravating_factors": null,
            "mitigating_factors": null,
            "guilty_plea": {
                "pleaded_guilty": true,
                "court_type": "High Court",
                "high_court_stage": "Up to committal",
                "district_court_stage": null,
                "source": "pleaded guilty at the earliest opportunity"
            },
            "starting_point": {
                "sentence": {"years": 6, "months": 0},
                "source": "a starting point of 6 years"
            },
            "sentence_after_role": null,
            "notional_sentence": {
                "sentence": {"years": 6, "months": 0},
                "source": "the notional sentence remains 6 years"
            },
            "mitigation_reduction": null,
            "final_sentence": {
                "sentence": {"years": 4, "months": 0},
                "guilty_plea_reduction": {"years": 2, "months": 0},
                "source": "sentenced to 4 years' imprisonment"
            }
        })
    }

    #[test]
    fn test_valid_trial_passes() {
        let trials = Trials::from_value(json!({"trials": [trial_value()]}), &adjacency()).unwrap();
        assert_eq!(trials.trials.len(), 1);
        // Totals are recomputed from years and months.
        assert_eq!(trials.trials[0].starting_point.sentence.total_months, 72);
        assert_eq!(trials.trials[0].final_sentence.sentence.total_months, 48);
    }

    #[test]
    fn test_missing_after_role_substituted_with_starting_point() {
        let trials = Trials::from_value(json!({"trials": [trial_value()]}), &adjacency()).unwrap();
        let after_role = trials.trials[0].sentence_after_role.as_ref().unwrap();
        assert_eq!(after_role.sentence.total_months, 72);
        assert_eq!(after_role.source, INFERRED_AFTER_ROLE);
    }

    #[test]
    fn test_absurd_sentence_length_rejected_without_panic() {
        let mut trial = trial_value();
        trial["starting_point"]["sentence"] = json!({"years": 400000000, "months": 0});
        let err = Trials::from_value(json!({"trials": [trial]}), &adjacency()).unwrap_err();
        assert!(err.iter().any(|v| {
            v.path == "trials[0].starting_point.sentence" && v.reason.contains("exceeds the maximum")
        }));
    }

    #[test]
    fn test_notional_below_after_role_fails() {
        let mut trial = trial_value();
        trial["notional_sentence"]["sentence"] = json!({"years": 5, "months": 0});
        let err = Trials::from_value(json!({"trials": [trial]}), &adjacency()).unwrap_err();
        assert!(err
            .iter()
            .any(|v| v.path == "trials[0].notional_sentence" && v.kind == ViolationKind::Invariant));
    }

    #[test]
    fn test_final_above_current_fails() {
        let mut trial = trial_value();
        trial["final_sentence"]["sentence"] = json!({"years": 7, "months": 0});
        trial["final_sentence"]["guilty_plea_reduction"] = json!(null);
        let err = Trials::from_value(json!({"trials": [trial]}), &adjacency()).unwrap_err();
        assert!(err
            .iter()
            .any(|v| v.reason.contains("cannot be greater than")));
    }

    #[test]
    fn test_guilty_plea_reduction_must_balance() {
        let mut trial = trial_value();
        // 72 - 36 != 48
        trial["final_sentence"]["guilty_plea_reduction"] = json!({"years": 3, "months": 0});
        let err = Trials::from_value(json!({"trials": [trial]}), &adjacency()).unwrap_err();
        assert!(err.iter().any(|v| v.reason.contains("must equal")));
    }

    #[test]
    fn test_zero_guilty_plea_reduction_still_checked() {
        let mut trial = trial_value();
        trial["final_sentence"]["guilty_plea_reduction"] = json!({"years": 0, "months": 0});
        // final 48 != current 72 - 0, so the presence of a zero reduction
        // still triggers the equality check.
        let err = Trials::from_value(json!({"trials": [trial]}), &adjacency()).unwrap_err();
        assert!(err.iter().any(|v| v.reason.contains("must equal")));
    }

    #[test]
    fn test_mitigation_enters_the_chain() {
        let mut trial = trial_value();
        trial["mitigation_reduction"] = json!({
            "reduction": {"years": 1, "months": 0},
            "source": "12 months for his assistance"
        });
        trial["final_sentence"]["sentence"] = json!({"years": 3, "months": 4});
        trial["final_sentence"]["guilty_plea_reduction"] = json!({"years": 1, "months": 8});
        // 72 - 12 - 20 = 40 months.
        let trials = Trials::from_value(json!({"trials": [trial]}), &adjacency()).unwrap();
        assert_eq!(trials.trials[0].final_sentence.sentence.total_months, 40);
    }

    #[test]
    fn test_unknown_charge_pair_is_invariant_violation() {
        let mut trial = trial_value();
        trial["charge_ref"] = json!({"charge_no": 2, "defendant_id": 1});
        let err = Trials::from_value(json!({"trials": [trial]}), &adjacency()).unwrap_err();
        assert!(err
            .iter()
            .any(|v| v.path == "trials[0].charge_ref" && v.kind == ViolationKind::Invariant));
    }

    #[test]
    fn test_duplicate_pair_rejected() {
        let err = Trials::from_value(
            json!({"trials": [trial_value(), trial_value()]}),
            &adjacency(),
        )
        .unwrap_err();
        assert!(err.iter().any(|v| v.reason.contains("duplicate trial entry")));
    }

    #[test]
    fn test_other_drug_requires_name() {
        let mut trial = trial_value();
        trial["drugs"][0]["drug_type"] = json!("Other");
        let err = Trials::from_value(json!({"trials": [trial]}), &adjacency()).unwrap_err();
        assert!(err
            .iter()
            .any(|v| v.path == "trials[0].drugs[0].other_drug_type"));
    }

    #[test]
    fn test_negative_quantity_rejected() {
        let mut trial = trial_value();
        trial["drugs"][0]["quantity"] = json!(-1.0);
        let err = Trials::from_value(json!({"trials": [trial]}), &adjacency()).unwrap_err();
        assert!(err.iter().any(|v| v.reason.contains("non-negative")));
    }

    #[test]
    fn test_plea_requires_court_and_matching_stage() {
        let mut trial = trial_value();
        trial["guilty_plea"]["court_type"] = json!(null);
        trial["guilty_plea"]["high_court_stage"] = json!(null);
        let err = Trials::from_value(json!({"trials": [trial]}), &adjacency()).unwrap_err();
        assert!(err.iter().any(|v| v.path == "trials[0].guilty_plea.court_type"));

        let mut trial = trial_value();
        trial["guilty_plea"]["court_type"] = json!("District Court");
        trial["guilty_plea"]["high_court_stage"] = json!(null);
        let err = Trials::from_value(json!({"trials": [trial]}), &adjacency()).unwrap_err();
        assert!(err
            .iter()
            .any(|v| v.path == "trials[0].guilty_plea.district_court_stage"));

        let mut trial = trial_value();
        trial["guilty_plea"]["district_court_stage"] = json!("Plea day");
        let err = Trials::from_value(json!({"trials": [trial]}), &adjacency()).unwrap_err();
        assert!(err
            .iter()
            .any(|v| v.reason.contains("district_court_stage must be null")));
    }

    #[test]
    fn test_round_trip_equal() {
        let trials = Trials::from_value(json!({"trials": [trial_value()]}), &adjacency()).unwrap();
        let serialized = serde_json::to_value(&trials).unwrap();
        let reparsed = Trials::from_value(serialized, &adjacency()).unwrap();
        assert_eq!(trials, reparsed);
    }
}
