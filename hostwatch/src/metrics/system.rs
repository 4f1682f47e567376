//! sysinfo-backed `MetricsSource`

use async_trait::async_trait;
use parking_lot::Mutex;
use std::time::Duration;
use sysinfo::System;

use super::MetricsSource;
use crate::error::MetricsError;

/// Reads utilization from the host through `sysinfo`.
///
/// The instantaneous CPU reading compares against the counters of the previous
/// instantaneous reading, so this source keeps one `System` around for it.
/// Windowed readings and memory use their own `System`.
pub struct SysinfoSource {
    instant: Mutex<System>,
}

impl SysinfoSource {
    pub fn new() -> Result<Self, MetricsError> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(MetricsError::unavailable(format!(
                "platform {} is not supported",
                std::env::consts::OS
            )));
        }

        // baseline for the first instantaneous reading
        let mut sys = System::new();
        sys.refresh_cpu_usage();

        Ok(Self { instant: Mutex::new(sys) })
    }
}

fn global_cpu(sys: &System) -> Result<f64, MetricsError> {
    if sys.cpus().is_empty() {
        return Err(MetricsError::unavailable("no cpu visible"));
    }
    let usage = sys.global_cpu_info().cpu_usage() as f64;
    // no tick elapsed since the previous refresh
    if usage.is_nan() {
        return Ok(0.0);
    }
    Ok(usage)
}

#[async_trait]
impl MetricsSource for SysinfoSource {
    fn cpu_instant(&self) -> Result<f64, MetricsError> {
        let mut sys = self.instant.lock();
        sys.refresh_cpu_usage();
        global_cpu(&sys)
    }

    async fn cpu_windowed(&self, window: Duration) -> Result<f64, MetricsError> {
        let mut sys = System::new();
        sys.refresh_cpu_usage();

        // sysinfo needs a minimum gap between two refreshes to compute usage
        tokio::time::sleep(window.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL)).await;
        sys.refresh_cpu_usage();

        global_cpu(&sys)
    }

    fn memory_percent(&self) -> Result<f64, MetricsError> {
        let mut sys = System::new();
        sys.refresh_memory();

        let total = sys.total_memory();
        if total == 0 {
            return Err(MetricsError::unavailable("total memory reported as zero"));
        }
        let used = total.saturating_sub(sys.available_memory());
        Ok(used as f64 / total as f64 * 100.0)
    }
}
