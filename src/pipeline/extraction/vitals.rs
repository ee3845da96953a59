//! Vital-sign extraction from free-form report text.
//!
//! Each vital is found by an independent, case-insensitive search of the whole
//! text: a label, a colon/whitespace separator, a number, and an optional unit.
//! The first match in the text wins. A vital whose label never appears is left
//! out of the record; extraction itself cannot fail.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::models::VitalsRecord;

/// 2-3 ASCII digits. `\d` would also accept non-ASCII Unicode digits.
const INTEGER: &str = "[0-9]{2,3}";
/// 2-3 integer digits, then an optional point and an optional digit. The
/// point and the digit are independent, so `1004` is read whole.
const TEMPERATURE: &str = "[0-9]{2,3}\\.?[0-9]?";
/// Same shape with a 1-2 digit integer part, so `10.2` and `12` are not cut
/// down to their first digit.
const PERCENT: &str = "[0-9]{1,2}\\.?[0-9]?";

/// Where a single-value match lands in the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    BloodSugar,
    HeartRate,
    Temperature,
    Weight,
    Cholesterol,
    Hba1c,
}

/// "label, separator, number, optional unit". Only the number is captured.
struct SingleRule {
    labels: &'static [&'static str],
    number: &'static str,
    units: &'static [&'static str],
    target: Target,
}

const SINGLE_RULES: &[SingleRule] = &[
    SingleRule {
        labels: &["blood sugar", "glucose", "fasting"],
        number: INTEGER,
        units: &["mg/dl"],
        target: Target::BloodSugar,
    },
    SingleRule {
        labels: &["heart rate", "pulse", "hr"],
        number: INTEGER,
        units: &["bpm"],
        target: Target::HeartRate,
    },
    SingleRule {
        labels: &["temperature", "temp"],
        number: TEMPERATURE,
        units: &["°f", "°c", "°", "f", "c"],
        target: Target::Temperature,
    },
    SingleRule {
        labels: &["weight"],
        number: INTEGER,
        units: &["lbs", "kg"],
        target: Target::Weight,
    },
    SingleRule {
        labels: &["cholesterol", "total cholesterol"],
        number: INTEGER,
        units: &["mg/dl"],
        target: Target::Cholesterol,
    },
    SingleRule {
        labels: &["hba1c"],
        number: PERCENT,
        units: &["%"],
        target: Target::Hba1c,
    },
];

fn alternation(words: &[&str]) -> String {
    words.iter().map(|w| regex::escape(w)).collect::<Vec<_>>().join("|")
}

/// Compile one rule. The unit group is optional, so it never decides whether
/// a label matches.
fn compile(labels: &[&str], value: &str, units: &[&str]) -> Regex {
    let unit = if units.is_empty() {
        String::new()
    } else {
        format!(r"\s*(?:{})?", alternation(units))
    };
    let pattern = format!(r"(?i)(?:{})[:\s]+{value}{unit}", alternation(labels));
    Regex::new(&pattern).expect("vital-sign patterns are static and valid")
}

static BLOOD_PRESSURE: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        &["blood pressure", "bp"],
        &format!(r"({INTEGER})\s*/\s*({INTEGER})"),
        &[],
    )
});

static SINGLE_PATTERNS: LazyLock<Vec<(Target, Regex)>> = LazyLock::new(|| {
    SINGLE_RULES
        .iter()
        .map(|rule| {
            let value = format!("({})", rule.number);
            (rule.target, compile(rule.labels, &value, rule.units))
        })
        .collect()
});

/// Extract every recognized vital sign from `text`.
///
/// Pure function of its input: the same text always yields the same record,
/// and the presence of one vital never changes how another is read.
pub fn extract_vitals(text: &str) -> VitalsRecord {
    let mut record = VitalsRecord::default();

    if let Some(caps) = BLOOD_PRESSURE.captures(text) {
        apply_blood_pressure(&mut record, &caps);
    }

    for (target, regex) in SINGLE_PATTERNS.iter() {
        if let Some(value) = regex.captures(text).and_then(|c| c.get(1)) {
            apply_single(&mut record, *target, value.as_str());
        }
    }

    record
}

fn apply_blood_pressure(record: &mut VitalsRecord, caps: &Captures) {
    let (Some(sys), Some(dia)) = (caps.get(1), caps.get(2)) else {
        return;
    };
    // The composite keeps the digits as written; the integers drop leading zeros.
    if let (Ok(systolic), Ok(diastolic)) = (sys.as_str().parse::<u16>(), dia.as_str().parse::<u16>()) {
        record.systolic = Some(systolic);
        record.diastolic = Some(diastolic);
        record.blood_pressure = Some(format!("{}/{}", sys.as_str(), dia.as_str()));
    }
}

fn apply_single(record: &mut VitalsRecord, target: Target, raw: &str) {
    match target {
        Target::BloodSugar => record.blood_sugar = raw.parse().ok(),
        Target::HeartRate => record.heart_rate = raw.parse().ok(),
        Target::Temperature => record.temperature = raw.parse().ok(),
        Target::Weight => record.weight = raw.parse().ok(),
        Target::Cholesterol => record.cholesterol = raw.parse().ok(),
        Target::Hba1c => record.hba1c = raw.parse().ok(),
    }
}
