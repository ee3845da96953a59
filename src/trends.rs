//! Vitals trends: per-metric time series over a user's stored vitals.
//!
//! Entries arrive oldest first. Any entry may lack any metric; a metric's
//! series only contains the entries that carry it, and metrics with no
//! values at all are left out of the summary.

use chrono::NaiveDateTime;
use rusqlite::Connection;
use serde::Serialize;
use uuid::Uuid;

use crate::db::{repository, DatabaseError};
use crate::models::{VitalMetric, VitalsEntry};

// ═══════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub recorded_at: NaiveDateTime,
    pub report_id: Uuid,
    pub value: f64,
    /// Mean of this point and every earlier point in the series.
    pub running_average: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricTrend {
    pub metric: VitalMetric,
    pub unit: &'static str,
    pub points: Vec<TrendPoint>,
    pub latest: f64,
    pub average: f64,
    pub min: f64,
    pub max: f64,
}

/// Everything the trends view needs for one user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalsTrends {
    pub user_id: String,
    pub entries: Vec<VitalsEntry>,
    pub metrics: Vec<MetricTrend>,
}

// ═══════════════════════════════════════════════════════════
// Aggregation
// ═══════════════════════════════════════════════════════════

/// Build one series per metric from entries sorted oldest first.
pub fn summarize_trends(entries: &[VitalsEntry]) -> Vec<MetricTrend> {
    VitalMetric::ALL
        .into_iter()
        .filter_map(|metric| metric_trend(metric, entries))
        .collect()
}

fn metric_trend(metric: VitalMetric, entries: &[VitalsEntry]) -> Option<MetricTrend> {
    let mut points = Vec::new();
    let mut sum = 0.0;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for entry in entries {
        let Some(value) = entry.vitals.metric_value(metric) else {
            continue;
        };
        sum += value;
        min = min.min(value);
        max = max.max(value);
        points.push(TrendPoint {
            recorded_at: entry.recorded_at,
            report_id: entry.report_id,
            value,
            running_average: sum / (points.len() + 1) as f64,
        });
    }

    let latest = points.last()?.value;
    Some(MetricTrend {
        metric,
        unit: metric.default_unit(),
        average: sum / points.len() as f64,
        latest,
        min,
        max,
        points,
    })
}

/// Load a user's vitals and summarize them.
pub fn get_vitals_trends(conn: &Connection, user_id: &str) -> Result<VitalsTrends, DatabaseError> {
    let entries = repository::list_vitals_for_user(conn, user_id)?;
    let metrics = summarize_trends(&entries);
    tracing::debug!(user_id, entries = entries.len(), metrics = metrics.len(), "Vitals trends assembled");
    Ok(VitalsTrends {
        user_id: user_id.to_string(),
        entries,
        metrics,
    })
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
