//! Report ingestion: recognize → sanitize → extract vitals → persist.
//!
//! The recognizer is injected so the pipeline runs against canned or mock
//! text in tests.

use rusqlite::Connection;
use uuid::Uuid;

use crate::db::{repository, DatabaseError};
use crate::models::{Report, ReportType, VitalsEntry};
use crate::pipeline::extraction::{extract_vitals, sanitize_report_text, ExtractionError, TextRecognizer};

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Upload has no user id")]
    MissingUser,

    #[error("No file provided")]
    EmptyFile,

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl From<rusqlite::Error> for IngestError {
    fn from(e: rusqlite::Error) -> Self {
        IngestError::Database(DatabaseError::Sqlite(e))
    }
}

/// An uploaded report as received from the caller.
#[derive(Debug, Clone)]
pub struct UploadRequest<'a> {
    pub user_id: &'a str,
    pub file_name: &'a str,
    pub mime_type: &'a str,
    /// Free-form label; blank or missing means "general".
    pub report_type: Option<&'a str>,
    pub bytes: &'a [u8],
}

pub struct ReportIngestor {
    recognizer: Box<dyn TextRecognizer + Send + Sync>,
}

impl ReportIngestor {
    pub fn new(recognizer: Box<dyn TextRecognizer + Send + Sync>) -> Self {
        Self { recognizer }
    }

    /// Ingest one upload. The report row is always written; a vitals entry
    /// is written only when at least one vital was found. Both writes share
    /// one transaction.
    pub fn ingest(&self, conn: &Connection, upload: &UploadRequest) -> Result<Report, IngestError> {
        if upload.user_id.trim().is_empty() {
            return Err(IngestError::MissingUser);
        }
        if upload.bytes.is_empty() {
            return Err(IngestError::EmptyFile);
        }

        tracing::info!(
            user_id = %upload.user_id,
            file = %upload.file_name,
            mime = %upload.mime_type,
            "Ingesting report"
        );

        let recognized = self.recognizer.recognize(upload.bytes, upload.mime_type)?;
        let report_text = sanitize_report_text(&recognized.text);
        let vitals = extract_vitals(&report_text);

        let report = Report {
            id: Uuid::new_v4(),
            user_id: upload.user_id.to_string(),
            file_name: upload.file_name.to_string(),
            file_type: upload.mime_type.to_string(),
            report_type: ReportType::from_label(upload.report_type),
            report_label: ReportType::display_label(upload.report_type),
            uploaded_at: chrono::Local::now().naive_local(),
            extraction_method: recognized.method,
            report_text,
            vitals,
        };

        let tx = conn.unchecked_transaction()?;
        repository::insert_report(&tx, &report)?;
        if report.vitals.is_empty() {
            tracing::warn!(report_id = %report.id, "No vitals recognized in report");
        } else {
            repository::insert_vitals_entry(&tx, &VitalsEntry::from_report(&report))?;
        }
        tx.commit()?;

        tracing::info!(
            report_id = %report.id,
            method = report.extraction_method.as_str(),
            vitals = report.vitals.len(),
            "Report stored"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;
    use crate::models::ExtractionMethod;
    use crate::pipeline::extraction::{RecognizedText, SimulatedOcr};

    /// Returns fixed text regardless of input.
    struct FixedText(&'static str);

    impl TextRecognizer for FixedText {
        fn recognize(&self, _: &[u8], _: &str) -> Result<RecognizedText, ExtractionError> {
            Ok(RecognizedText {
                method: ExtractionMethod::PlainTextRead,
                text: self.0.to_string(),
            })
        }
    }

    fn upload<'a>(user_id: &'a str, bytes: &'a [u8], mime_type: &'a str) -> UploadRequest<'a> {
        UploadRequest {
            user_id,
            file_name: "report.pdf",
            mime_type,
            report_type: None,
            bytes,
        }
    }

    #[test]
    fn ingest_stores_report_and_vitals() {
        let conn = open_memory_database().unwrap();
        let ingestor = ReportIngestor::new(Box::new(SimulatedOcr::new()));

        let report = ingestor
            .ingest(&conn, &upload("patient-1", b"%PDF", "application/pdf"))
            .unwrap();

        assert_eq!(report.extraction_method, ExtractionMethod::SimulatedOcr);
        assert_eq!(report.report_type, ReportType::General);
        assert_eq!(report.vitals.blood_pressure.as_deref(), Some("128/82"));
        assert_eq!(report.vitals.heart_rate, Some(72));
        assert_eq!(report.vitals.temperature, Some(98.6));
        assert_eq!(report.vitals.weight, Some(165));
        assert_eq!(report.vitals.cholesterol, Some(185));
        assert_eq!(report.vitals.blood_sugar, None);

        let stored = repository::get_report(&conn, &report.id).unwrap().unwrap();
        assert_eq!(stored.vitals, report.vitals);
        assert!(!stored.report_text.starts_with(' '));

        let entry = repository::get_vitals_for_report(&conn, &report.id).unwrap().unwrap();
        assert_eq!(entry.user_id, "patient-1");
        assert_eq!(entry.vitals, report.vitals);
    }

    #[test]
    fn rotation_feeds_successive_uploads() {
        let conn = open_memory_database().unwrap();
        let ingestor = ReportIngestor::new(Box::new(SimulatedOcr::new()));
        let first = ingestor.ingest(&conn, &upload("patient-1", b"a", "image/png")).unwrap();
        let second = ingestor.ingest(&conn, &upload("patient-1", b"b", "image/png")).unwrap();

        assert_eq!(first.vitals.systolic, Some(128));
        assert_eq!(second.vitals.systolic, Some(135));
        assert_eq!(second.vitals.blood_sugar, Some(112));
        assert_eq!(second.vitals.hba1c, Some(5.8));
        assert_eq!(second.vitals.cholesterol, Some(220));
    }

    #[test]
    fn report_without_vitals_has_no_entry() {
        let conn = open_memory_database().unwrap();
        let ingestor = ReportIngestor::new(Box::new(FixedText("Discharge summary. No measurements.")));

        let report = ingestor
            .ingest(&conn, &upload("patient-1", b"x", "text/plain"))
            .unwrap();

        assert!(report.vitals.is_empty());
        assert!(repository::get_report(&conn, &report.id).unwrap().is_some());
        assert!(repository::get_vitals_for_report(&conn, &report.id).unwrap().is_none());
    }

    #[test]
    fn text_is_sanitized_before_extraction() {
        let conn = open_memory_database().unwrap();
        let ingestor = ReportIngestor::new(Box::new(FixedText(
            "  Temperature:\u{00A0}99.1\u{00C2}\u{00B0}F\x00  \n\n",
        )));

        let report = ingestor
            .ingest(&conn, &upload("patient-1", b"x", "text/plain"))
            .unwrap();

        assert_eq!(report.report_text, "Temperature: 99.1°F");
        assert_eq!(report.vitals.temperature, Some(99.1));
    }

    #[test]
    fn sanitizing_never_finds_more_vitals_than_the_raw_text() {
        let raw = "Pulse: 6\u{0}8\nHbA1c: 5\u{7}.8%";
        let conn = open_memory_database().unwrap();
        let ingestor = ReportIngestor::new(Box::new(FixedText(raw)));

        let report = ingestor
            .ingest(&conn, &upload("patient-1", b"x", "text/plain"))
            .unwrap();

        assert_eq!(report.vitals.heart_rate, None);
        assert_eq!(report.vitals.heart_rate, extract_vitals(raw).heart_rate);
        assert_eq!(report.vitals.hba1c, Some(5.0));
        assert!(report.vitals.len() <= extract_vitals(raw).len());
    }

    #[test]
    fn report_type_label_is_normalized() {
        let conn = open_memory_database().unwrap();
        let ingestor = ReportIngestor::new(Box::new(FixedText("Pulse: 70")));
        let mut request = upload("patient-1", b"x", "text/plain");
        request.report_type = Some("Blood Test");

        let report = ingestor.ingest(&conn, &request).unwrap();
        assert_eq!(report.report_type, ReportType::BloodTest);
        assert_eq!(report.report_label, "Blood Test");
    }

    #[test]
    fn unknown_report_label_is_kept_verbatim() {
        let conn = open_memory_database().unwrap();
        let ingestor = ReportIngestor::new(Box::new(FixedText("Pulse: 70")));
        let mut request = upload("patient-1", b"x", "text/plain");
        request.report_type = Some("Dermatology");

        let report = ingestor.ingest(&conn, &request).unwrap();
        assert_eq!(report.report_type, ReportType::Other);

        let stored = repository::get_report(&conn, &report.id).unwrap().unwrap();
        assert_eq!(stored.report_label, "Dermatology");
        assert_eq!(stored.report_type, ReportType::Other);
    }

    #[test]
    fn missing_user_is_rejected() {
        let conn = open_memory_database().unwrap();
        let ingestor = ReportIngestor::new(Box::new(SimulatedOcr::new()));
        let err = ingestor
            .ingest(&conn, &upload("  ", b"x", "application/pdf"))
            .unwrap_err();
        assert!(matches!(err, IngestError::MissingUser));
    }

    #[test]
    fn empty_upload_is_rejected() {
        let conn = open_memory_database().unwrap();
        let ingestor = ReportIngestor::new(Box::new(SimulatedOcr::new()));
        let request = UploadRequest {
            user_id: "patient-1",
            file_name: "scan.pdf",
            mime_type: "application/pdf",
            report_type: None,
            bytes: &[],
        };
        assert!(matches!(ingestor.ingest(&conn, &request), Err(IngestError::EmptyFile)));
    }

    #[test]
    fn unsupported_upload_writes_nothing() {
        let conn = open_memory_database().unwrap();
        let ingestor = ReportIngestor::new(Box::new(SimulatedOcr::new()));
        let err = ingestor
            .ingest(&conn, &upload("patient-1", b"PK", "application/zip"))
            .unwrap_err();

        assert!(matches!(err, IngestError::Extraction(ExtractionError::UnsupportedFormat(_))));
        assert!(repository::list_reports_for_user(&conn, "patient-1").unwrap().is_empty());
    }
}
