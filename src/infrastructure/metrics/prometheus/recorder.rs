use anyhow::Result;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::{Mutex, OnceLock, PoisonError};

static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

// Serializes installation; the global recorder can only be set once.
static INSTALL: Mutex<()> = Mutex::new(());

/// Install the Prometheus recorder globally and store the handle.
///
/// The recorder is process-wide; later and concurrent calls reuse the
/// first handle.
pub fn init_metrics() -> Result<()> {
    // ---
    if HANDLE.get().is_some() {
        return Ok(());
    }

    let _guard = INSTALL.lock().unwrap_or_else(PoisonError::into_inner);
    if HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    let _ = HANDLE.set(handle);

    Ok(())
}

/// Render the current metrics in Prometheus text format.
pub fn render_metrics() -> String {
    HANDLE.get().map(PrometheusHandle::render).unwrap_or_default()
}
