//! Host utilization sampling
//!
//! Provides the per-request value object served by the HTTP layer:
//! - `MetricsSample` : CPU and memory utilization in percent, normalized
//! - the static "scale up" warning derived from a sample
//! - `MetricsSource` : seam over the OS facility (sysinfo in production)

mod system;

pub use system::SysinfoSource;

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use crate::error::MetricsError;

/// Utilization above which the index page shows the warning (strict comparison).
pub const WARNING_THRESHOLD: f64 = 80.0;

pub const WARNING_MESSAGE: &str = "High CPU or Memory Detected, scale up!!!";

/// Averaging window used by the JSON endpoint.
pub const CPU_WINDOW: Duration = Duration::from_millis(500);

/// One reading of host utilization, taken for a single request.
///
/// Serializes as `{"cpu": <f64>, "mem": <f64>}` and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricsSample {
    #[serde(rename = "cpu")]
    pub cpu_percent: f64,
    #[serde(rename = "mem")]
    pub mem_percent: f64,
}

impl MetricsSample {
    /// Build a sample from raw OS readings.
    ///
    /// Readings are rounded to one decimal and clamped into `[0, 100]`.
    /// A non-finite reading is an error rather than a made-up number.
    pub fn new(cpu_percent: f64, mem_percent: f64) -> Result<Self, MetricsError> {
        Ok(Self {
            cpu_percent: normalize("cpu", cpu_percent)?,
            mem_percent: normalize("memory", mem_percent)?,
        })
    }

    pub fn is_high(&self) -> bool {
        self.cpu_percent > WARNING_THRESHOLD || self.mem_percent > WARNING_THRESHOLD
    }

    /// Warning text for the index page, present iff either metric is above the threshold.
    pub fn warning(&self) -> Option<&'static str> {
        self.is_high().then_some(WARNING_MESSAGE)
    }
}

fn normalize(what: &str, value: f64) -> Result<f64, MetricsError> {
    if !value.is_finite() {
        return Err(MetricsError::unavailable(format!("{what} reading is not a number: {value}")));
    }
    let rounded = (value * 10.0).round() / 10.0;
    Ok(rounded.clamp(0.0, 100.0))
}

/// OS facility reporting host utilization.
#[async_trait]
pub trait MetricsSource: Send + Sync {
    /// CPU utilization across all cores since the previous instantaneous reading. Does not wait.
    fn cpu_instant(&self) -> Result<f64, MetricsError>;

    /// CPU utilization across all cores averaged over `window`.
    async fn cpu_windowed(&self, window: Duration) -> Result<f64, MetricsError>;

    /// Share of physical memory in use.
    fn memory_percent(&self) -> Result<f64, MetricsError>;
}

/// Sample for the index page: instantaneous CPU, current memory.
pub fn sample_instant(source: &dyn MetricsSource) -> Result<MetricsSample, MetricsError> {
    let cpu = source.cpu_instant()?;
    let mem = source.memory_percent()?;
    let sample = MetricsSample::new(cpu, mem)?;
    debug!(cpu = sample.cpu_percent, mem = sample.mem_percent, "instant sample");
    Ok(sample)
}

/// Sample for the JSON endpoint: CPU averaged over `window`, current memory.
pub async fn sample_windowed(
    source: &dyn MetricsSource,
    window: Duration,
) -> Result<MetricsSample, MetricsError> {
    let cpu = source.cpu_windowed(window).await?;
    let mem = source.memory_percent()?;
    let sample = MetricsSample::new(cpu, mem)?;
    debug!(cpu = sample.cpu_percent, mem = sample.mem_percent, ?window, "windowed sample");
    Ok(sample)
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedSource;
    use super::*;

    #[test]
    fn test_warning_threshold_is_strict() {
        assert_eq!(MetricsSample::new(10.0, 20.0).unwrap().warning(), None);
        assert_eq!(MetricsSample::new(80.0, 50.0).unwrap().warning(), None);
        assert_eq!(MetricsSample::new(50.0, 80.0).unwrap().warning(), None);
        assert_eq!(MetricsSample::new(85.0, 30.0).unwrap().warning(), Some(WARNING_MESSAGE));
        assert_eq!(MetricsSample::new(30.0, 80.1).unwrap().warning(), Some(WARNING_MESSAGE));
        assert_eq!(MetricsSample::new(100.0, 100.0).unwrap().warning(), Some(WARNING_MESSAGE));
    }

    #[test]
    fn test_readings_are_rounded_and_clamped() {
        let sample = MetricsSample::new(12.345, 67.89).unwrap();
        assert_eq!(sample.cpu_percent, 12.3);
        assert_eq!(sample.mem_percent, 67.9);

        let sample = MetricsSample::new(100.4, -0.3).unwrap();
        assert_eq!(sample.cpu_percent, 100.0);
        assert_eq!(sample.mem_percent, 0.0);
    }

    #[test]
    fn test_rounding_can_reach_threshold_but_not_cross_it() {
        // 80.04 rounds down to exactly 80.0: no warning
        let sample = MetricsSample::new(80.04, 0.0).unwrap();
        assert_eq!(sample.cpu_percent, 80.0);
        assert!(!sample.is_high());
    }

    #[test]
    fn test_non_finite_reading_is_unavailable() {
        assert!(matches!(MetricsSample::new(f64::NAN, 10.0), Err(MetricsError::Unavailable(_))));
        assert!(matches!(MetricsSample::new(10.0, f64::INFINITY), Err(MetricsError::Unavailable(_))));
    }

    #[test]
    fn test_serializes_exactly_cpu_and_mem() {
        let json = serde_json::to_value(MetricsSample::new(85.0, 30.0).unwrap()).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(obj["cpu"], 85.0);
        assert_eq!(obj["mem"], 30.0);
        assert_eq!(serde_json::to_string(&MetricsSample::new(10.0, 20.0).unwrap()).unwrap(),
                   r#"{"cpu":10.0,"mem":20.0}"#);
    }

    #[test]
    fn test_sample_instant_uses_instant_cpu() {
        let source = ScriptedSource::new(42.0, 17.5);
        let sample = sample_instant(&source).unwrap();
        assert_eq!(sample, MetricsSample { cpu_percent: 42.0, mem_percent: 17.5 });
        assert_eq!(source.instant_calls.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert_eq!(source.windowed_calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_sample_windowed_uses_windowed_cpu() {
        let source = ScriptedSource::new(5.0, 6.0);
        let sample = sample_windowed(&source, CPU_WINDOW).await.unwrap();
        assert_eq!(sample, MetricsSample { cpu_percent: 5.0, mem_percent: 6.0 });
        assert_eq!(source.windowed_calls.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert_eq!(source.instant_calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_source_failure_propagates() {
        let source = ScriptedSource::failing("unsupported platform");
        assert!(sample_instant(&source).is_err());
        assert!(sample_windowed(&source, CPU_WINDOW).await.is_err());
    }
}
