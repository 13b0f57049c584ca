//! Defendants-stage entities: one profile per defendant
//!
//! Profiles are keyed by the defendant ids the judgement stage assigned;
//! every populated attribute block carries its own evidence source.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::identity::DefendantRoster;
use crate::violation::{check_source, Violation};

/// Broad nationality category.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum NationalityCategory {
    #[serde(rename = "Hong Kong resident")]
    HkResident,
    #[serde(rename = "Mainland Chinese")]
    MainlandChinese,
    #[serde(rename = "Foreign nationality")]
    Foreign,
}

/// Residency status, required for Hong Kong residents.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum HkResidentStatus {
    #[serde(rename = "Permanent resident")]
    Permanent,
    #[serde(rename = "New arrival")]
    NewArrival,
    #[serde(rename = "N/A")]
    NotApplicable,
}

/// Gender of the defendant.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Gender {
    Male,
    Female,
}

/// Marital status.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum MaritalStatus {
    #[serde(rename = "Single")]
    Single,
    #[serde(rename = "Married")]
    Married,
    #[serde(rename = "Separated/divorced")]
    SeparatedDivorced,
    #[serde(rename = "Widowed")]
    Widowed,
    #[serde(rename = "Cohabiting")]
    Cohabiting,
}

/// Parental status.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum ParentalStatus {
    #[serde(rename = "No children")]
    NoChildren,
    #[serde(rename = "Parent")]
    Parent,
    #[serde(rename = "Expecting parent")]
    Expecting,
}

/// Custody, only applicable for parents.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum CustodyStatus {
    #[serde(rename = "Parent with custody")]
    WithCustody,
    #[serde(rename = "Parent without custody")]
    WithoutCustody,
}

/// Household composition.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum HouseholdComposition {
    #[serde(rename = "Lives alone")]
    Alone,
    #[serde(rename = "Lives with family")]
    WithFamily,
    #[serde(rename = "Lives with non-family")]
    WithNonFamily,
    #[serde(rename = "Homeless")]
    Homeless,
}

/// Kind of health condition mentioned in the judgment.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum HealthCondition {
    #[serde(rename = "Drug addiction")]
    DrugAddiction,
    #[serde(rename = "Mental health")]
    MentalHealth,
    #[serde(rename = "Physical health")]
    PhysicalHealth,
}

/// Highest education level attained.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum EducationLevel {
    #[serde(rename = "Uneducated")]
    Uneducated,
    #[serde(rename = "Primary")]
    Primary,
    #[serde(rename = "Secondary - Lower")]
    SecondaryLower,
    #[serde(rename = "Secondary - Upper")]
    SecondaryUpper,
    #[serde(rename = "Tertiary")]
    Tertiary,
}

/// Occupation at time of offence.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum OccupationCategory {
    #[serde(rename = "Unemployed")]
    Unemployed,
    #[serde(rename = "Manager")]
    Manager,
    #[serde(rename = "Professional")]
    Professional,
    #[serde(rename = "Associate professional")]
    AssociateProfessional,
    #[serde(rename = "Clerical support worker")]
    Clerical,
    #[serde(rename = "Service and sales worker")]
    ServiceSales,
    #[serde(rename = "Craft and related worker")]
    Craft,
    #[serde(rename = "Plant and machine operator and assembler")]
    PlantMachine,
    #[serde(rename = "Elementary occupation")]
    Elementary,
    #[serde(rename = "Skilled agricultural and fishery worker")]
    Agricultural,
    #[serde(rename = "Student")]
    Student,
    #[serde(rename = "Other")]
    Other,
}

/// Criminal record of the defendant.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum CriminalRecord {
    #[serde(rename = "None")]
    None,
    #[serde(rename = "Drug trafficking")]
    DrugTrafficking,
    #[serde(rename = "Dangerous drug offences")]
    OtherDrug,
    #[serde(rename = "Other offences")]
    OtherOffence,
}

/// Positive habits shown after arrest.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum PositiveHabit {
    #[serde(rename = "Volunteering")]
    Volunteering,
    #[serde(rename = "Studying")]
    Studying,
    #[serde(rename = "Working")]
    Working,
    #[serde(rename = "Negative drug tests")]
    NegativeDrugTests,
    #[serde(rename = "Participation in rehabilitation/self-improvement")]
    Rehabilitation,
}

/// Form of family support present.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum FamilySupport {
    #[serde(rename = "None")]
    None,
    #[serde(rename = "Family presence in court")]
    PresenceInCourt,
    #[serde(rename = "Letters of support from family")]
    LettersOfSupport,
    #[serde(rename = "Other")]
    Other,
}

/// Nationality with its conditional companions.
///
/// `Hong Kong resident` requires `hk_resident_status`; `Foreign nationality`
/// requires a two-letter `foreign_country_code`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Nationality {
    /// Broad category.
    pub category: NationalityCategory,
    /// Required when category is `Hong Kong resident`.
    pub hk_resident_status: Option<HkResidentStatus>,
    /// ISO 3166-1 alpha-2 code, required for `Foreign nationality`.
    pub foreign_country_code: Option<String>,
    /// Reason for inferring the nationality, if it was inferred.
    pub infer_reason: Option<String>,
    /// Quoted span.
    pub source: String,
}

impl Nationality {
    fn validate(&self, path: &str, out: &mut Vec<Violation>) {
        if self.category == NationalityCategory::HkResident && self.hk_resident_status.is_none() {
            out.push(Violation::schema(
                format!("{path}.hk_resident_status"),
                "hk_resident_status is required when category is 'Hong Kong resident'",
            ));
        }
        match (&self.category, &self.foreign_country_code) {
            (NationalityCategory::Foreign, None) => out.push(Violation::schema(
                format!("{path}.foreign_country_code"),
                "foreign_country_code is required when category is 'Foreign nationality'",
            )),
            (NationalityCategory::Foreign, Some(code)) => {
                if code.len() != 2 || !code.chars().all(|c| c.is_ascii_uppercase()) {
                    out.push(Violation::schema(
                        format!("{path}.foreign_country_code"),
                        format!("'{code}' is not a two-letter ISO 3166-1 alpha-2 country code"),
                    ));
                }
            }
            _ => {}
        }
        check_source(&self.source, path, out);
    }
}

/// Exact age or an estimated `[lo, hi]` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum AgeValue {
    /// Exact age in years.
    Exact(u32),
    /// Estimated range `[lo, hi]`.
    Range([u32; 2]),
}

/// An age fact (at offence or at sentencing).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AgeDetail {
    /// Exact age or estimated range.
    pub age: AgeValue,
    /// Quoted span.
    pub source: String,
}

impl AgeDetail {
    fn validate(&self, path: &str, out: &mut Vec<Violation>) {
        if let AgeValue::Range([lo, hi]) = self.age {
            if lo > hi {
                out.push(Violation::schema(
                    format!("{path}.age"),
                    format!("age range [{lo}, {hi}] is inverted"),
                ));
            }
        }
        check_source(&self.source, path, out);
    }
}

/// Defendant name with its evidence span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DefendantNameDetail {
    /// Full name as appearing in the judgment.
    pub name: String,
    /// Quoted span.
    pub source: String,
}

/// Gender fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GenderDetail {
    /// Gender.
    pub gender: Gender,
    /// Quoted span.
    pub source: String,
}

/// Marital-status fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MaritalStatusDetail {
    /// Marital status.
    pub status: MaritalStatus,
    /// Quoted span.
    pub source: String,
}

/// Parental status with conditional custody.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ParentalStatusDetail {
    /// Parental status.
    pub status: ParentalStatus,
    /// Custody; only applicable when status is `Parent`.
    pub custody: Option<CustodyStatus>,
    /// Quoted span.
    pub source: String,
}

impl ParentalStatusDetail {
    fn validate(&self, path: &str, out: &mut Vec<Violation>) {
        if self.custody.is_some() && self.status != ParentalStatus::Parent {
            out.push(Violation::schema(
                format!("{path}.custody"),
                "custody is only applicable when status is 'Parent'",
            ));
        }
        check_source(&self.source, path, out);
    }
}

/// Household-composition fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HouseholdCompositionDetail {
    /// Household composition.
    pub composition: HouseholdComposition,
    /// Quoted span.
    pub source: String,
}

/// A single health condition found in the judgment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HealthConditionDetail {
    /// Kind of condition.
    #[serde(rename = "type")]
    pub condition: HealthCondition,
    /// Quoted span.
    pub source: String,
}

/// Health conditions mentioned in the judgment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HealthStatus {
    /// Conditions found, possibly several.
    pub conditions: Vec<HealthConditionDetail>,
}

/// Community or residential drug-treatment participation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DrugTreatmentDetail {
    /// Whether the defendant participated.
    pub participated: bool,
    /// Quoted span.
    pub source: String,
}

/// Education-level fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EducationLevelDetail {
    /// Education level.
    pub level: EducationLevel,
    /// Quoted span.
    pub source: String,
}

/// Occupation at time of offence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OccupationDetail {
    /// Occupation category.
    pub occupation_category: OccupationCategory,
    /// Specific occupation name, when available.
    pub occupation_name: Option<String>,
    /// Quoted span.
    pub source: String,
}

/// Monthly wage at time of offence, in HKD. 0 when unemployed; an absent
/// block means the wage was not mentioned at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MonthlyWageDetail {
    /// Monthly wage in HKD.
    pub wage: u32,
    /// Quoted span.
    pub source: String,
}

/// Criminal-record fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CriminalRecordDetail {
    /// Record category.
    pub record: CriminalRecord,
    /// Quoted span.
    pub source: String,
}

/// Positive habits shown after arrest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PositiveHabitsDetail {
    /// Habits found.
    pub habits: Vec<PositiveHabit>,
    /// Quoted span.
    pub source: String,
}

/// A form of family support present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FamilySupportDetail {
    /// Kind of support.
    pub support: FamilySupport,
    /// Quoted span.
    pub source: String,
}

/// Profile of one defendant: identity plus independently-optional attribute
/// blocks, each carrying its own evidence source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DefendantProfile {
    /// Defendant id as listed in the prompt context; must match the identity
    /// map of the judgement stage.
    pub defendant_id: u32,

    /// Name with its evidence span.
    pub defendant_name: DefendantNameDetail,

    /// Nationality, possibly inferred.
    pub nationality: Option<Nationality>,
    /// Age at time of offence.
    pub age_at_offence: Option<AgeDetail>,
    /// Age at sentencing.
    pub age_at_sentencing: Option<AgeDetail>,
    /// Gender.
    pub gender: Option<GenderDetail>,
    /// Marital status.
    pub marital_status: Option<MaritalStatusDetail>,
    /// Parental status.
    pub parental_status: Option<ParentalStatusDetail>,
    /// Household composition.
    pub household_composition: Option<HouseholdCompositionDetail>,
    /// Health conditions.
    pub health_status: Option<HealthStatus>,
    /// Drug-treatment participation.
    pub drug_treatment_participation: Option<DrugTreatmentDetail>,
    /// Education level.
    pub education_level: Option<EducationLevelDetail>,
    /// Occupation.
    pub occupation: Option<OccupationDetail>,
    /// Monthly wage.
    pub monthly_wage: Option<MonthlyWageDetail>,
    /// Criminal record.
    pub criminal_record: Option<CriminalRecordDetail>,
    /// Positive habits after arrest.
    pub positive_habits_after_arrest: Option<PositiveHabitsDetail>,
    /// Family supports present.
    pub family_supports: Option<Vec<FamilySupportDetail>>,
}

impl DefendantProfile {
    fn validate(&self, path: &str, roster: &DefendantRoster, out: &mut Vec<Violation>) {
        if !roster.contains_id(self.defendant_id) {
            out.push(Violation::invariant(
                format!("{path}.defendant_id"),
                format!(
                    "defendant id {} does not exist; known ids are 1..={}",
                    self.defendant_id,
                    roster.len()
                ),
            ));
        }
        check_source(
            &self.defendant_name.source,
            &format!("{path}.defendant_name"),
            out,
        );

        if let Some(nationality) = &self.nationality {
            nationality.validate(&format!("{path}.nationality"), out);
        }
        if let Some(age) = &self.age_at_offence {
            age.validate(&format!("{path}.age_at_offence"), out);
        }
        if let Some(age) = &self.age_at_sentencing {
            age.validate(&format!("{path}.age_at_sentencing"), out);
        }
        if let Some(gender) = &self.gender {
            check_source(&gender.source, &format!("{path}.gender"), out);
        }
        if let Some(status) = &self.marital_status {
            check_source(&status.source, &format!("{path}.marital_status"), out);
        }
        if let Some(parental) = &self.parental_status {
            parental.validate(&format!("{path}.parental_status"), out);
        }
        if let Some(household) = &self.household_composition {
            check_source(
                &household.source,
                &format!("{path}.household_composition"),
                out,
            );
        }
        if let Some(health) = &self.health_status {
            for (i, condition) in health.conditions.iter().enumerate() {
                check_source(
                    &condition.source,
                    &format!("{path}.health_status.conditions[{i}]"),
                    out,
                );
            }
        }
        if let Some(treatment) = &self.drug_treatment_participation {
            check_source(
                &treatment.source,
                &format!("{path}.drug_treatment_participation"),
                out,
            );
        }
        if let Some(education) = &self.education_level {
            check_source(&education.source, &format!("{path}.education_level"), out);
        }
        if let Some(occupation) = &self.occupation {
            check_source(&occupation.source, &format!("{path}.occupation"), out);
        }
        if let Some(wage) = &self.monthly_wage {
            check_source(&wage.source, &format!("{path}.monthly_wage"), out);
        }
        if let Some(record) = &self.criminal_record {
            check_source(&record.source, &format!("{path}.criminal_record"), out);
        }
        if let Some(habits) = &self.positive_habits_after_arrest {
            check_source(
                &habits.source,
                &format!("{path}.positive_habits_after_arrest"),
                out,
            );
        }
        if let Some(supports) = &self.family_supports {
            for (i, support) in supports.iter().enumerate() {
                check_source(&support.source, &format!("{path}.family_supports[{i}]"), out);
            }
        }
    }
}

/// The validated defendants-stage entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Defendants {
    /// Profiles, one per defendant discussed.
    pub defendants: Vec<DefendantProfile>,
}

impl Defendants {
    /// Build validated `Defendants` from raw model output, cross-checking
    /// every profile id against the judgement stage's identity roster.
    pub fn from_value(
        value: serde_json::Value,
        roster: &DefendantRoster,
    ) -> Result<Self, Vec<Violation>> {
        let defendants: Defendants = serde_json::from_value(value)
            .map_err(|e| vec![Violation::schema("$", e.to_string())])?;
        defendants.validate(roster)
    }

    fn validate(self, roster: &DefendantRoster) -> Result<Self, Vec<Violation>> {
        let mut violations = Vec::new();
        if self.defendants.is_empty() {
            violations.push(Violation::schema(
                "defendants",
                "at least one defendant must be provided",
            ));
        }
        let mut seen = std::collections::HashSet::new();
        for (i, profile) in self.defendants.iter().enumerate() {
            if !seen.insert(profile.defendant_id) {
                violations.push(Violation::invariant(
                    format!("defendants[{i}].defendant_id"),
                    format!("duplicate profile for defendant id {}", profile.defendant_id),
                ));
            }
            profile.validate(&format!("defendants[{i}]"), roster, &mut violations);
        }
        if violations.is_empty() {
            Ok(self)
        } else {
            Err(violations)
        }
    }
}
