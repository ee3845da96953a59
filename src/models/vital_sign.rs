use serde::{Deserialize, Serialize};

/// Numeric vital-sign series tracked over time. Blood pressure contributes
/// two series (systolic and diastolic).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VitalMetric {
    Systolic,
    Diastolic,
    BloodSugar,
    HeartRate,
    Temperature,
    Weight,
    Cholesterol,
    Hba1c,
}

impl VitalMetric {
    pub const ALL: [VitalMetric; 8] = [
        VitalMetric::Systolic,
        VitalMetric::Diastolic,
        VitalMetric::BloodSugar,
        VitalMetric::HeartRate,
        VitalMetric::Temperature,
        VitalMetric::Weight,
        VitalMetric::Cholesterol,
        VitalMetric::Hba1c,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            VitalMetric::Systolic => "systolic",
            VitalMetric::Diastolic => "diastolic",
            VitalMetric::BloodSugar => "blood_sugar",
            VitalMetric::HeartRate => "heart_rate",
            VitalMetric::Temperature => "temperature",
            VitalMetric::Weight => "weight",
            VitalMetric::Cholesterol => "cholesterol",
            VitalMetric::Hba1c => "hba1c",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == s)
    }

    /// Display unit. Reports carry US units, so temperature is Fahrenheit
    /// and weight is pounds.
    pub fn default_unit(self) -> &'static str {
        match self {
            VitalMetric::Systolic | VitalMetric::Diastolic => "mmHg",
            VitalMetric::BloodSugar | VitalMetric::Cholesterol => "mg/dL",
            VitalMetric::HeartRate => "bpm",
            VitalMetric::Temperature => "°F",
            VitalMetric::Weight => "lbs",
            VitalMetric::Hba1c => "%",
        }
    }
}

/// Vital signs recognized in one report.
///
/// Every field is optional: a field is present only when its pattern matched
/// the report text. Absent fields are left out of the serialized form
/// entirely rather than written as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalsRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub systolic: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diastolic: Option<u16>,
    /// `"<systolic>/<diastolic>"` exactly as written in the report.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_pressure: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_sugar: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cholesterol: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hba1c: Option<f64>,
}

impl VitalsRecord {
    /// Number of fields present.
    pub fn len(&self) -> usize {
        let bp = usize::from(self.blood_pressure.is_some());
        bp + VitalMetric::ALL
            .into_iter()
            .filter(|m| self.metric_value(*m).is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Numeric value of one metric, if the report contained it.
    pub fn metric_value(&self, metric: VitalMetric) -> Option<f64> {
        match metric {
            VitalMetric::Systolic => self.systolic.map(f64::from),
            VitalMetric::Diastolic => self.diastolic.map(f64::from),
            VitalMetric::BloodSugar => self.blood_sugar.map(f64::from),
            VitalMetric::HeartRate => self.heart_rate.map(f64::from),
            VitalMetric::Temperature => self.temperature,
            VitalMetric::Weight => self.weight.map(f64::from),
            VitalMetric::Cholesterol => self.cholesterol.map(f64::from),
            VitalMetric::Hba1c => self.hba1c,
        }
    }
}
