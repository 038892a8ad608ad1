//! Standardized metrics collection and reporting for CI.
//!
//! Worldtests export one JSON report each under `target/metrics/` so generation throughput,
//! cave density and reconciliation counts can be tracked across changes.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Top-level metrics report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsReport {
    /// Test identifier
    pub test_name: String,

    /// Timestamp when metrics were collected (RFC 3339)
    pub timestamp: String,

    /// Overall test result
    pub result: TestResult,

    /// Region generation metrics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation: Option<GenerationMetrics>,

    /// Surface reconciliation metrics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reconcile: Option<ReconcileMetrics>,

    /// Region seam validation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seams: Option<SeamValidation>,

    /// Test execution metrics
    pub test_execution: TestExecutionMetrics,
}

/// Overall test result status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestResult {
    /// Test passed all validations
    Pass,
    /// Test failed
    Fail,
    /// Test was skipped
    Skip,
}

/// Cave generation throughput and density.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationMetrics {
    /// Regions generated
    pub regions_generated: usize,

    /// Voxels in all target regions
    pub voxels_generated: usize,

    /// Cave voxels in all target regions
    pub cave_voxels: usize,

    /// `cave_voxels / voxels_generated`
    pub cave_fraction: f64,

    /// Cave object anchors placed
    pub object_anchors: usize,

    /// Average generation time per region (microseconds)
    pub avg_gen_time_us: f64,

    /// Min generation time (microseconds)
    pub min_gen_time_us: u128,

    /// Max generation time (microseconds)
    pub max_gen_time_us: u128,

    /// Total generation time (milliseconds)
    pub total_gen_time_ms: f64,
}

/// Counts reported by surface reconciliation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReconcileMetrics {
    /// Cave voxels considered
    pub cave_voxels: usize,

    /// Cave voxels removed from open space or sealed under water
    pub removed: usize,

    /// Surface markers moved onto breached cave floors
    pub seeds: usize,

    /// Surface markers added by lateral propagation
    pub propagated: usize,

    /// Largest lateral distance from any propagated marker to the nearest seed
    pub max_spread: u32,
}

/// Agreement of overlapping voxels between independently generated regions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeamValidation {
    /// Seams checked
    pub total_seams: usize,

    /// Seams whose shared voxels all agree
    pub seams_valid: usize,

    /// Seams with at least one disagreement
    pub seams_failed: usize,

    /// Shared voxels compared
    pub voxels_compared: usize,
}

/// Test execution and infrastructure metrics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestExecutionMetrics {
    /// Total test duration (seconds)
    pub duration_seconds: f64,

    /// Number of assertions checked
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assertions_checked: Option<usize>,
}

/// Builder for constructing metrics reports
pub struct MetricsReportBuilder {
    report: MetricsReport,
}

impl MetricsReportBuilder {
    /// Create a new builder with test name
    pub fn new(test_name: impl Into<String>) -> Self {
        Self {
            report: MetricsReport {
                test_name: test_name.into(),
                timestamp: chrono::Utc::now().to_rfc3339(),
                result: TestResult::Pass,
                generation: None,
                reconcile: None,
                seams: None,
                test_execution: TestExecutionMetrics::default(),
            },
        }
    }

    /// Set test result
    pub fn result(mut self, result: TestResult) -> Self {
        self.report.result = result;
        self
    }

    /// Set generation metrics
    pub fn generation(mut self, metrics: GenerationMetrics) -> Self {
        self.report.generation = Some(metrics);
        self
    }

    /// Set reconciliation metrics
    pub fn reconcile(mut self, metrics: ReconcileMetrics) -> Self {
        self.report.reconcile = Some(metrics);
        self
    }

    /// Set seam validation results
    pub fn seams(mut self, metrics: SeamValidation) -> Self {
        self.report.seams = Some(metrics);
        self
    }

    /// Set test execution metrics
    pub fn execution(mut self, metrics: TestExecutionMetrics) -> Self {
        self.report.test_execution = metrics;
        self
    }

    /// Build the metrics report
    pub fn build(self) -> MetricsReport {
        self.report
    }
}

/// Sink for writing metrics reports to JSON files
pub struct MetricsSink {
    path: PathBuf,
}

impl MetricsSink {
    /// Create a sink at `path`, creating parent directories if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(Self { path })
    }

    /// Sink at `target/metrics/<name>.json` relative to the workspace root.
    pub fn for_test(name: &str) -> Result<Self> {
        Self::create(metrics_dir().join(format!("{name}.json")))
    }

    /// Write metrics report to file
    pub fn write(&self, report: &MetricsReport) -> Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        let mut file = File::create(&self.path)?;
        file.write_all(json.as_bytes())?;
        debug!(path = %self.path.display(), test = %report.test_name, "wrote metrics");
        Ok(())
    }
}

fn metrics_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../target/metrics")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn metrics_report_roundtrip() {
        let report = MetricsReportBuilder::new("test_example")
            .result(TestResult::Pass)
            .generation(GenerationMetrics {
                regions_generated: 16,
                voxels_generated: 65536,
                cave_voxels: 1200,
                cave_fraction: 1200.0 / 65536.0,
                object_anchors: 14,
                avg_gen_time_us: 3970.0,
                min_gen_time_us: 2500,
                max_gen_time_us: 8000,
                total_gen_time_ms: 63.5,
            })
            .seams(SeamValidation {
                total_seams: 24,
                seams_valid: 24,
                seams_failed: 0,
                voxels_compared: 6144,
            })
            .execution(TestExecutionMetrics {
                duration_seconds: 2.5,
                assertions_checked: Some(500),
            })
            .build();

        let json = serde_json::to_string_pretty(&report).unwrap();
        let parsed: MetricsReport = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.test_name, "test_example");
        assert_eq!(parsed.result, TestResult::Pass);
        assert_eq!(parsed.generation.as_ref().unwrap().regions_generated, 16);
        assert!(parsed.reconcile.is_none());
        assert!(!json.contains("reconcile"));
    }

    #[test]
    fn metrics_sink_writes_file() {
        let path = std::env::temp_dir().join(format!(
            "cavegen-metrics-{}.json",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));

        let report = MetricsReportBuilder::new("sink_test")
            .reconcile(ReconcileMetrics {
                seeds: 3,
                ..Default::default()
            })
            .build();

        let sink = MetricsSink::create(&path).unwrap();
        sink.write(&report).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("sink_test"));
        assert!(contents.contains("\"result\": \"pass\""));

        fs::remove_file(&path).ok();
    }
}
