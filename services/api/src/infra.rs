use cvss_score::cvss::{CvssCalculator, DefaultV4Calculator, V4Calculator};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Calculator shared by every request; the v4.0 collaborator is chosen at startup.
pub(crate) type SharedCalculator = Arc<CvssCalculator<Arc<dyn V4Calculator>>>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) calculator: SharedCalculator,
}

/// Uses the bundled v4.0 lookup when the `v4-lookup` feature is enabled.
pub(crate) fn default_calculator() -> SharedCalculator {
    let v4: Arc<dyn V4Calculator> = Arc::new(DefaultV4Calculator::default());
    Arc::new(CvssCalculator::with_v4(v4))
}
