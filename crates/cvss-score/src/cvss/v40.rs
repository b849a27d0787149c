//! CVSS v4.0 metric registry and the boundary to an external v4.0 calculator.
//!
//! v4.0 scores come from the published macro-vector lookup; this crate only
//! validates the vector shape and hands the raw string to a [`V4Calculator`].

use serde::Serialize;

/// Definition of one v4.0 metric and its permitted values.
#[derive(Debug, PartialEq, Eq)]
pub struct V40MetricDef {
    pub abbrev: &'static str,
    pub values: &'static [&'static str],
    pub required: bool,
}

const fn base(abbrev: &'static str, values: &'static [&'static str]) -> V40MetricDef {
    V40MetricDef {
        abbrev,
        values,
        required: true,
    }
}

const fn optional(abbrev: &'static str, values: &'static [&'static str]) -> V40MetricDef {
    V40MetricDef {
        abbrev,
        values,
        required: false,
    }
}

const IMPACT: &[&str] = &["H", "L", "N"];
const MODIFIED_IMPACT: &[&str] = &["X", "H", "L", "N"];
const MODIFIED_SUBSEQUENT: &[&str] = &["X", "S", "H", "L", "N"];
const REQUIREMENT: &[&str] = &["X", "H", "M", "L"];

/// All v4.0 metrics in the canonical order of the specification.
pub static V40_METRICS: [V40MetricDef; 32] = [
    base("AV", &["N", "A", "L", "P"]),
    base("AC", &["L", "H"]),
    base("AT", &["N", "P"]),
    base("PR", &["N", "L", "H"]),
    base("UI", &["N", "P", "A"]),
    base("VC", IMPACT),
    base("VI", IMPACT),
    base("VA", IMPACT),
    base("SC", IMPACT),
    base("SI", IMPACT),
    base("SA", IMPACT),
    optional("E", &["X", "A", "P", "U"]),
    optional("CR", REQUIREMENT),
    optional("IR", REQUIREMENT),
    optional("AR", REQUIREMENT),
    optional("MAV", &["X", "N", "A", "L", "P"]),
    optional("MAC", &["X", "L", "H"]),
    optional("MAT", &["X", "N", "P"]),
    optional("MPR", &["X", "N", "L", "H"]),
    optional("MUI", &["X", "N", "P", "A"]),
    optional("MVC", MODIFIED_IMPACT),
    optional("MVI", MODIFIED_IMPACT),
    optional("MVA", MODIFIED_IMPACT),
    optional("MSC", MODIFIED_IMPACT),
    optional("MSI", MODIFIED_SUBSEQUENT),
    optional("MSA", MODIFIED_SUBSEQUENT),
    optional("S", &["X", "N", "P"]),
    optional("AU", &["X", "N", "Y"]),
    optional("R", &["X", "A", "U", "I"]),
    optional("V", &["X", "D", "C"]),
    optional("RE", &["X", "L", "M", "H"]),
    optional("U", &["X", "Clear", "Green", "Amber", "Red"]),
];

pub fn lookup(abbrev: &str) -> Option<(usize, &'static V40MetricDef)> {
    V40_METRICS
        .iter()
        .enumerate()
        .find(|(_, def)| def.abbrev == abbrev)
}

/// Validated v4.0 metrics keyed by their position in [`V40_METRICS`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct V40Metrics {
    entries: Vec<(&'static str, &'static str)>,
}

impl V40Metrics {
    /// Builds the set from `(registry index, value)` pairs that were already
    /// checked against the registry.
    pub(crate) fn from_indexed(mut indexed: Vec<(usize, &'static str)>) -> Self {
        indexed.sort_by_key(|(index, _)| *index);
        let entries = indexed
            .into_iter()
            .map(|(index, value)| (V40_METRICS[index].abbrev, value))
            .collect();
        Self { entries }
    }

    pub fn get(&self, abbrev: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(key, _)| *key == abbrev)
            .map(|(_, value)| *value)
    }

    pub fn to_vector_string(&self) -> String {
        let mut rendered = String::from("CVSS:4.0");
        for (abbrev, value) in &self.entries {
            rendered.push('/');
            rendered.push_str(abbrev);
            rendered.push(':');
            rendered.push_str(value);
        }
        rendered
    }
}

/// Failure reported by a v4.0 calculator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DelegateError {
    #[error("{0}")]
    Unavailable(String),
    #[error("{0}")]
    Rejected(String),
}

/// External calculator that scores a v4.0 vector string.
///
/// The argument is the caller's input with leading and trailing whitespace
/// trimmed. It is otherwise untouched: metric order and spelling are exactly
/// as supplied, never re-serialised. Echoed results still carry the untrimmed
/// input.
pub trait V4Calculator: Send + Sync {
    fn base_score(&self, raw_vector: &str) -> Result<f64, DelegateError>;
}

/// Stand-in used when no v4.0 implementation is linked into the build.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableV4Calculator;

impl V4Calculator for UnavailableV4Calculator {
    fn base_score(&self, _raw_vector: &str) -> Result<f64, DelegateError> {
        Err(DelegateError::Unavailable(
            "CVSS 4.0 scoring is not enabled in this build".to_string(),
        ))
    }
}

/// Scores v4.0 vectors with the macro-vector lookup from the `cvss` crate.
#[cfg(feature = "v4-lookup")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LookupV4Calculator;

#[cfg(feature = "v4-lookup")]
impl V4Calculator for LookupV4Calculator {
    fn base_score(&self, raw_vector: &str) -> Result<f64, DelegateError> {
        let vector: cvss::v4::Vector = raw_vector
            .parse::<cvss::v4::Vector>()
            .map_err(|err| DelegateError::Rejected(err.to_string()))?;
        Ok(vector.score().value())
    }
}

/// Calculator [`CvssCalculator`](super::CvssCalculator) uses unless told otherwise.
#[cfg(feature = "v4-lookup")]
pub type DefaultV4Calculator = LookupV4Calculator;

#[cfg(not(feature = "v4-lookup"))]
pub type DefaultV4Calculator = UnavailableV4Calculator;

impl<T: V4Calculator + ?Sized> V4Calculator for std::sync::Arc<T> {
    fn base_score(&self, raw_vector: &str) -> Result<f64, DelegateError> {
        (**self).base_score(raw_vector)
    }
}
