pub mod extraction;
pub mod ingest;
