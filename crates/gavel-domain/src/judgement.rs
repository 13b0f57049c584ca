//! Judgement-stage entities: case metadata and charges
//!
//! The `Judgement` is the first extraction pass. Its factory validates the
//! citation and case-number patterns, every charge, and then performs the
//! one-time assignment of charge numbers and defendant ids before any id is
//! handed to a later stage.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::calendar::{self, TimeOfDay};
use crate::districts::{District, SubDistrict};
use crate::identity;
use crate::violation::{check_source, Violation};

static NEUTRAL_CITATION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[\d{4}\]\s+[A-Z]+\s+\d+$").expect("valid pattern"));
static CASES_HEARD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]+\s+\d+/\d{4}$").expect("valid pattern"));

/// Name of the charge (offence). Charges outside this enumeration are dropped
/// by the extractor, never represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum ChargeName {
    /// Trafficking in a single dangerous drug
    #[serde(rename = "Trafficking in a dangerous drug")]
    TraffickingADrug,
    /// Trafficking in multiple dangerous drugs
    #[serde(rename = "Trafficking in dangerous drugs")]
    TraffickingDrugs,
    /// Conspiracy, single drug
    #[serde(rename = "Conspiracy to traffic in a dangerous drug")]
    ConspiracyToTrafficADrug,
    /// Conspiracy, multiple drugs
    #[serde(rename = "Conspiracy to traffic in dangerous drugs")]
    ConspiracyToTrafficDrugs,
}

impl ChargeName {
    /// Display name, identical to the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChargeName::TraffickingADrug => "Trafficking in a dangerous drug",
            ChargeName::TraffickingDrugs => "Trafficking in dangerous drugs",
            ChargeName::ConspiracyToTrafficADrug => "Conspiracy to traffic in a dangerous drug",
            ChargeName::ConspiracyToTrafficDrugs => "Conspiracy to traffic in dangerous drugs",
        }
    }
}

/// Nature of the place of offence.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum NatureOfPlace {
    #[serde(rename = "Residential building")]
    Residential,
    #[serde(rename = "Commercial building")]
    Commercial,
    #[serde(rename = "Industrial building")]
    Industrial,
    #[serde(rename = "Government or public building")]
    Government,
    #[serde(rename = "Entertainment venue")]
    Entertainment,
    #[serde(rename = "Street")]
    Street,
    #[serde(rename = "Car park or parking lot")]
    CarPark,
    #[serde(rename = "Shopping mall")]
    ShoppingMall,
    #[serde(rename = "Public transport")]
    PublicTransport,
    #[serde(rename = "Private vehicle")]
    PrivateVehicle,
    #[serde(rename = "Restaurant")]
    Restaurant,
    #[serde(rename = "Educational institution")]
    Education,
    #[serde(rename = "Hospital or medical facility")]
    Hospital,
    #[serde(rename = "Outside methadone clinic")]
    MethadoneClinic,
    #[serde(rename = "Recreational area")]
    Recreational,
    #[serde(rename = "Hotel or guesthouse")]
    Hotel,
    #[serde(rename = "Construction site")]
    Construction,
    #[serde(rename = "Vacant or abandoned property")]
    Vacant,
    #[serde(rename = "Border checkpoint")]
    Border,
    #[serde(rename = "Other")]
    Other,
}

/// Mode of drug trafficking.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum TraffickingMode {
    #[serde(rename = "Street-level dealing")]
    StreetDealing,
    #[serde(rename = "Social supply")]
    SocialSupply,
    #[serde(rename = "Courier delivery")]
    Courier,
    #[serde(rename = "Parcel delivery")]
    Parcel,
    #[serde(rename = "Drug houses")]
    DrugHouses,
    #[serde(rename = "Vehicle-based dealing")]
    VehicleDealing,
    #[serde(rename = "Vehicle concealment")]
    VehicleConcealment,
    #[serde(rename = "Mule trafficking")]
    Mule,
    #[serde(rename = "Drug repackaging or storage")]
    DrugStorage,
    #[serde(rename = "Maritime transport")]
    Maritime,
    #[serde(rename = "Festival or event dealing")]
    Festival,
    #[serde(rename = "Online trafficking")]
    Online,
    #[serde(rename = "Other")]
    Other,
}

/// Reason for committing the offence.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum ReasonForOffence {
    #[serde(rename = "Financial gain")]
    FinancialGain,
    #[serde(rename = "Economic hardship")]
    EconomicHardship,
    #[serde(rename = "Coercion")]
    Coercion,
    #[serde(rename = "Deception")]
    Deception,
    #[serde(rename = "Addiction-driven")]
    AddictionDriven,
    #[serde(rename = "Peer influence")]
    PeerInfluence,
    #[serde(rename = "Helping other people")]
    HelpingOthers,
    #[serde(rename = "Other")]
    Other,
}

/// Direction of cross-border trafficking.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ImportExport {
    Import,
    Export,
}

/// Date of offence with derived calendar facts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DateDetail {
    /// Date of offence (ISO 8601).
    pub date: NaiveDate,

    /// Derived: 1 = Monday .. 7 = Sunday.
    #[serde(default)]
    pub day_of_week: u8,

    /// Derived: whether the date is a Hong Kong general holiday.
    #[serde(default)]
    pub is_hk_public_holiday: bool,

    /// Quoted span the date was extracted from.
    pub source: String,
}

impl DateDetail {
    fn finalize(&mut self, path: &str, out: &mut Vec<Violation>) {
        self.day_of_week = calendar::day_of_week(self.date);
        self.is_hk_public_holiday = calendar::is_hk_public_holiday(self.date);
        check_source(&self.source, path, out);
    }
}

/// Time of offence with the derived time-of-day bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TimeDetail {
    /// Time of offence (ISO 8601, assumed UTC+8 when no zone is stated).
    pub time: NaiveTime,

    /// Derived bucket.
    #[serde(default)]
    pub time_of_day: TimeOfDay,

    /// Quoted span the time was extracted from.
    pub source: String,
}

impl TimeDetail {
    fn finalize(&mut self, path: &str, out: &mut Vec<Violation>) {
        self.time_of_day = calendar::time_of_day(self.time);
        check_source(&self.source, path, out);
    }
}

/// Place of offence; the district is derived from the sub-district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PlaceOfOffence {
    /// Full address of the place of offence.
    pub address: String,

    /// Nature of the place.
    pub nature: NatureOfPlace,

    /// Sub-district named in the judgment.
    pub sub_district: SubDistrict,

    /// Derived district; never independently settable.
    #[serde(default)]
    pub district: Option<District>,

    /// Quoted span.
    pub source: String,
}

impl PlaceOfOffence {
    fn finalize(&mut self, path: &str, out: &mut Vec<Violation>) {
        self.district = Some(self.sub_district.district());
        check_source(&self.source, path, out);
    }
}

/// Trafficking mode attributed to one defendant under one charge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TraffickingModeDetail {
    /// Mode of trafficking.
    pub mode: TraffickingMode,
    /// Quoted span.
    pub source: String,
}

/// A reason for committing the offence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReasonForOffenceDetail {
    /// The reason.
    pub reason: ReasonForOffence,
    /// Quoted span.
    pub source: String,
}

/// Benefits received or to be received for trafficking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BenefitsReceivedDetail {
    /// Whether benefits were received or to be received.
    pub received: bool,
    /// Amount in HKD, excluding the value of the drug itself; `None` when the
    /// amount is not explicitly stated.
    pub amount: Option<f64>,
    /// Quoted span.
    pub source: String,
}

/// Whether the trafficking involved cross-border activities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CrossBorderDetail {
    /// Cross-border flag.
    pub cross_border: bool,
    /// Import or export; required when `cross_border` is true, and must be
    /// absent when it is false.
    pub import_export: Option<ImportExport>,
    /// Quoted span.
    pub source: String,
}

impl CrossBorderDetail {
    fn validate(&self, path: &str, out: &mut Vec<Violation>) {
        if self.cross_border && self.import_export.is_none() {
            out.push(Violation::schema(
                format!("{path}.import_export"),
                "import_export is required when cross_border is true",
            ));
        }
        if !self.cross_border && self.import_export.is_some() {
            out.push(Violation::schema(
                format!("{path}.import_export"),
                "import_export must be null when cross_border is false",
            ));
        }
        check_source(&self.source, path, out);
    }
}

/// The charge as it attaches to one defendant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ChargeForDefendant {
    /// Full name of the defendant as it appears in the judgment.
    pub defendant_name: String,

    /// Defendant id (1-indexed), assigned by first-appearance order across all
    /// charges at finalisation; model output is overwritten.
    #[serde(default)]
    pub defendant_id: Option<u32>,

    /// Mode of trafficking for this defendant, when discussed.
    pub trafficking_mode: Option<TraffickingModeDetail>,

    /// Reasons for committing the offence, when discussed.
    pub reasons_for_offence: Option<Vec<ReasonForOffenceDetail>>,

    /// Benefits received, when discussed.
    pub benefits_received: Option<BenefitsReceivedDetail>,
}

impl ChargeForDefendant {
    fn validate(&self, path: &str, out: &mut Vec<Violation>) {
        if self.defendant_name.trim().is_empty() {
            out.push(Violation::schema(
                format!("{path}.defendant_name"),
                "defendant name must not be empty",
            ));
        }
        if let Some(mode) = &self.trafficking_mode {
            check_source(&mode.source, &format!("{path}.trafficking_mode"), out);
        }
        if let Some(reasons) = &self.reasons_for_offence {
            for (i, reason) in reasons.iter().enumerate() {
                check_source(
                    &reason.source,
                    &format!("{path}.reasons_for_offence[{i}]"),
                    out,
                );
            }
        }
        if let Some(benefits) = &self.benefits_received {
            if let Some(amount) = benefits.amount {
                if amount < 0.0 {
                    out.push(Violation::schema(
                        format!("{path}.benefits_received.amount"),
                        "benefit amount cannot be negative",
                    ));
                }
            }
            check_source(&benefits.source, &format!("{path}.benefits_received"), out);
        }
    }
}

/// A single charge in the judgment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Charge {
    /// Charge number (1-indexed), assigned by position at finalisation;
    /// model output is overwritten.
    #[serde(default)]
    pub charge_no: Option<u32>,

    /// Name of the charge.
    pub charge_name: ChargeName,

    /// Date of the offence, when stated.
    pub offence_date: Option<DateDetail>,

    /// Time of the offence, when stated.
    pub offence_time: Option<TimeDetail>,

    /// Place of the offence, when stated.
    pub place_of_offence: Option<PlaceOfOffence>,

    /// Cross-border involvement.
    pub cross_border: CrossBorderDetail,

    /// The defendants this charge attaches to, in judgment order.
    pub defendants_of_charge: Vec<ChargeForDefendant>,
}

impl Charge {
    fn finalize(&mut self, path: &str, out: &mut Vec<Violation>) {
        if let Some(date) = &mut self.offence_date {
            date.finalize(&format!("{path}.offence_date"), out);
        }
        if let Some(time) = &mut self.offence_time {
            time.finalize(&format!("{path}.offence_time"), out);
        }
        if let Some(place) = &mut self.place_of_offence {
            place.finalize(&format!("{path}.place_of_offence"), out);
        }
        self.cross_border
            .validate(&format!("{path}.cross_border"), out);
        if self.defendants_of_charge.is_empty() {
            out.push(Violation::schema(
                format!("{path}.defendants_of_charge"),
                "a charge must name at least one defendant",
            ));
        }
        for (i, defendant) in self.defendants_of_charge.iter().enumerate() {
            defendant.validate(&format!("{path}.defendants_of_charge[{i}]"), out);
        }
    }
}

/// A legal representative involved in the case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Representative {
    /// Name of the representative.
    pub name: String,
    /// Role, in the original language of the judgment.
    pub role: String,
}

/// The validated judgement-stage entity.
///
/// Owns its charges; charges do not outlive the judgement. Construct through
/// [`Judgement::from_value`]; a `Judgement` either exists fully valid (with
/// charge numbers and defendant ids assigned) or construction fails with the
/// full violation list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Judgement {
    /// Neutral citation, `[YYYY] COURT NNN`.
    pub neutral_citation: String,

    /// Derived court code (second token of the citation).
    #[serde(default)]
    pub court: String,

    /// Name of the presiding judge.
    pub judge_name: String,

    /// Date and time of the judgment (ISO 8601).
    pub judgment_date_time: NaiveDateTime,

    /// Legal representatives involved in the case.
    pub representatives: Vec<Representative>,

    /// Case identifiers heard, `TYPE NNN/YYYY`, at least one.
    pub cases_heard: Vec<String>,

    /// Charges in judgment order.
    pub charges: Vec<Charge>,
}

impl Judgement {
    /// Build a validated `Judgement` from raw model output.
    ///
    /// Runs all schema checks, recomputes every derived field, and performs
    /// the one-time assignment of charge numbers and defendant ids.
    pub fn from_value(value: serde_json::Value) -> Result<Self, Vec<Violation>> {
        let judgement: Judgement = serde_json::from_value(value)
            .map_err(|e| vec![Violation::schema("$", e.to_string())])?;
        judgement.finalize()
    }

    fn finalize(mut self) -> Result<Self, Vec<Violation>> {
        let mut violations = Vec::new();

        if !NEUTRAL_CITATION_PATTERN.is_match(&self.neutral_citation) {
            violations.push(Violation::schema(
                "neutral_citation",
                format!(
                    "invalid neutral citation '{}'; expected format: [year] court number (e.g. '[2024] HKCFI 123')",
                    self.neutral_citation
                ),
            ));
        } else {
            self.court = self
                .neutral_citation
                .split_whitespace()
                .nth(1)
                .unwrap_or_default()
                .to_string();
        }

        if self.cases_heard.is_empty() {
            violations.push(Violation::schema(
                "cases_heard",
                "at least one case must be present",
            ));
        }
        for (i, case) in self.cases_heard.iter().enumerate() {
            if !CASES_HEARD_PATTERN.is_match(case) {
                violations.push(Violation::schema(
                    format!("cases_heard[{i}]"),
                    format!(
                        "invalid case '{case}'; expected format: case_type case_no/year (e.g. 'CC 1/2024')"
                    ),
                ));
            }
        }

        for (i, charge) in self.charges.iter_mut().enumerate() {
            charge.finalize(&format!("charges[{i}]"), &mut violations);
        }

        if !violations.is_empty() {
            return Err(violations);
        }

        // One-time deterministic id assignment, after all checks pass and
        // before any id can be handed to a later stage.
        identity::assign_ids(&mut self.charges);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    pub(crate) fn minimal_judgement_value() -> serde_json::Value {
        json!({
            "neutral_citation": "[2024] HKDC 123",
            "judge_name": "Judge A. Wong",
            "judgment_date_time": "2024-07-02T10:30:00",
            "representatives": [
                {"name": "Ms B. Chan", "role": "for HKSAR"}
            ],
            "cases_heard": ["DCCC 101/2024"],
            "charges": [
                {
                    "charge_name": "Trafficking in a dangerous drug",
                    "offence_date": {
                        "date": "2024-07-01",
                        "source": "on 1 July 2024"
                    },
                    "cross_border": {
                        "cross_border": false,
                        "import_export": null,
                        "source": "arrested in Mong Kok"
                    },
                    "defendants_of_charge": [
                        {"defendant_name": "Chan Tai Man"}
                    ]
                }
            ]
        })
    }

    #[test]
    fn test_minimal_judgement_validates() {
        let judgement = Judgement::from_value(minimal_judgement_value()).unwrap();
        assert_eq!(judgement.court, "HKDC");
        assert_eq!(judgement.charges[0].charge_no, Some(1));
        assert_eq!(
            judgement.charges[0].defendants_of_charge[0].defendant_id,
            Some(1)
        );
        let date = judgement.charges[0].offence_date.as_ref().unwrap();
        assert_eq!(date.day_of_week, 1); // Monday
        assert!(date.is_hk_public_holiday); // HKSAR Establishment Day
    }

    #[test]
    fn test_bad_citation_rejected() {
        let mut value = minimal_judgement_value();
        value["neutral_citation"] = json!("2024 HKDC 123");
        let err = Judgement::from_value(value).unwrap_err();
        assert!(err.iter().any(|v| v.path == "neutral_citation"));
    }

    #[test]
    fn test_bad_case_number_rejected() {
        let mut value = minimal_judgement_value();
        value["cases_heard"] = json!(["DCCC-101-2024"]);
        let err = Judgement::from_value(value).unwrap_err();
        assert!(err.iter().any(|v| v.path == "cases_heard[0]"));
    }

    #[test]
    fn test_empty_cases_heard_rejected() {
        let mut value = minimal_judgement_value();
        value["cases_heard"] = json!([]);
        let err = Judgement::from_value(value).unwrap_err();
        assert!(err.iter().any(|v| v.path == "cases_heard"));
    }

    #[test]
    fn test_unknown_charge_name_is_schema_violation() {
        let mut value = minimal_judgement_value();
        value["charges"][0]["charge_name"] = json!("Possession of a dangerous drug");
        let err = Judgement::from_value(value).unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err[0].kind, crate::ViolationKind::Schema);
    }

    #[test]
    fn test_cross_border_requires_direction() {
        let mut value = minimal_judgement_value();
        value["charges"][0]["cross_border"] = json!({
            "cross_border": true,
            "import_export": null,
            "source": "brought the drugs across the border"
        });
        let err = Judgement::from_value(value).unwrap_err();
        assert!(err
            .iter()
            .any(|v| v.path == "charges[0].cross_border.import_export"));
    }

    #[test]
    fn test_direction_forbidden_without_cross_border() {
        let mut value = minimal_judgement_value();
        value["charges"][0]["cross_border"]["import_export"] = json!("import");
        let err = Judgement::from_value(value).unwrap_err();
        assert!(err
            .iter()
            .any(|v| v.reason.contains("must be null when cross_border is false")));
    }

    #[test]
    fn test_model_proposed_ids_overwritten() {
        let mut value = minimal_judgement_value();
        value["charges"][0]["charge_no"] = json!(7);
        value["charges"][0]["defendants_of_charge"][0]["defendant_id"] = json!(42);
        let judgement = Judgement::from_value(value).unwrap();
        assert_eq!(judgement.charges[0].charge_no, Some(1));
        assert_eq!(
            judgement.charges[0].defendants_of_charge[0].defendant_id,
            Some(1)
        );
    }

    #[test]
    fn test_district_is_derived() {
        let mut value = minimal_judgement_value();
        value["charges"][0]["place_of_offence"] = json!({
            "address": "123 Nathan Road",
            "nature": "Street",
            "sub_district": "Mong Kok",
            "district": "Islands",
            "source": "at 123 Nathan Road, Mong Kok"
        });
        let judgement = Judgement::from_value(value).unwrap();
        let place = judgement.charges[0].place_of_offence.as_ref().unwrap();
        assert_eq!(place.district, Some(crate::District::YauTsimMong));
    }

    #[test]
    fn test_round_trip_equal() {
        let judgement = Judgement::from_value(minimal_judgement_value()).unwrap();
        let serialized = serde_json::to_value(&judgement).unwrap();
        let reparsed = Judgement::from_value(serialized).unwrap();
        assert_eq!(judgement, reparsed);
    }

    #[test]
    fn test_missing_source_on_populated_date_rejected() {
        let mut value = minimal_judgement_value();
        value["charges"][0]["offence_date"]["source"] = json!("");
        let err = Judgement::from_value(value).unwrap_err();
        assert!(err
            .iter()
            .any(|v| v.path == "charges[0].offence_date.source"));
    }
}
