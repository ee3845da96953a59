use std::sync::atomic::{AtomicUsize, Ordering};

use super::types::{FileCategory, RecognizedText, TextRecognizer};
use super::ExtractionError;
use crate::models::ExtractionMethod;

/// Canned reports returned in place of real recognition for PDFs and images.
/// `{date}` is replaced with today's date.
const SAMPLE_REPORTS: [&str; 3] = [
    "MEDICAL REPORT
Patient: John Doe
Date: {date}

VITAL SIGNS:
Blood Pressure: 128/82 mmHg
Blood Sugar (Fasting): 98 mg/dL
Heart Rate: 72 bpm
Temperature: 98.6°F
Weight: 165 lbs

LABORATORY RESULTS:
Cholesterol: 185 mg/dL
HDL: 52 mg/dL
LDL: 110 mg/dL

DIAGNOSIS: Patient shows normal vital signs with slightly elevated BP.
Recommend lifestyle modifications and follow-up in 3 months.",
    "BLOOD TEST RESULTS
Patient Name: Jane Smith
Test Date: {date}

GLUCOSE PROFILE:
Fasting Blood Sugar: 112 mg/dL
HbA1c: 5.8%

CARDIOVASCULAR:
Blood Pressure: 135/88 mmHg
Total Cholesterol: 220 mg/dL
Triglycerides: 155 mg/dL

Heart Rate: 78 bpm

NOTES: Pre-diabetic range. Recommend dietary changes and exercise.",
    "HEALTH CHECKUP REPORT
Date: {date}

VITALS:
BP: 118/75 mmHg
Pulse: 68 bpm
Blood Sugar (Random): 105 mg/dL
Temperature: 98.2°F

BMI: 23.5 (Normal)

All parameters within normal range.
Patient is healthy. Annual checkup recommended.",
];

/// Stand-in recognizer. Plain-text uploads are read as-is; PDFs and images
/// get the next canned sample report in a fixed rotation.
#[derive(Debug, Default)]
pub struct SimulatedOcr {
    cursor: AtomicUsize,
}

impl SimulatedOcr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the rotation at a given sample (wraps around).
    pub fn starting_at(index: usize) -> Self {
        Self {
            cursor: AtomicUsize::new(index % SAMPLE_REPORTS.len()),
        }
    }

    pub fn sample_count() -> usize {
        SAMPLE_REPORTS.len()
    }

    fn next_sample(&self) -> String {
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % SAMPLE_REPORTS.len();
        let today = chrono::Local::now().format("%-m/%-d/%Y").to_string();
        tracing::debug!(sample = index, "Returning simulated OCR sample");
        SAMPLE_REPORTS[index].replace("{date}", &today)
    }
}

impl TextRecognizer for SimulatedOcr {
    fn recognize(&self, bytes: &[u8], mime_type: &str) -> Result<RecognizedText, ExtractionError> {
        match FileCategory::from_mime(mime_type) {
            FileCategory::PlainText => {
                let text = std::str::from_utf8(bytes)
                    .map_err(|e| ExtractionError::EncodingError(e.to_string()))?;
                if text.trim().is_empty() {
                    return Err(ExtractionError::EmptyDocument);
                }
                Ok(RecognizedText {
                    method: ExtractionMethod::PlainTextRead,
                    text: text.to_string(),
                })
            }
            FileCategory::Pdf | FileCategory::Image => Ok(RecognizedText {
                method: ExtractionMethod::SimulatedOcr,
                text: self.next_sample(),
            }),
            FileCategory::Unsupported => Err(ExtractionError::UnsupportedFormat(mime_type.to_string())),
        }
    }
}
