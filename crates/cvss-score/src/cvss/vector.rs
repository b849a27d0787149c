use super::metrics::{
    AttackComplexity, AttackVector, ImpactLevel, PrivilegesRequired, Scope, UserInteraction,
    V31Metric, V31Metrics,
};
use super::v40::{self, V40Metrics, V40_METRICS};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

const PREFIX: &str = "CVSS:";
const DELIMITER: char = '/';
const SEPARATOR: char = ':';

/// Scoring standard revisions this crate recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CvssVersion {
    #[serde(rename = "3.1")]
    V31,
    #[serde(rename = "4.0")]
    V40,
}

impl CvssVersion {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "3.1" => Some(Self::V31),
            "4.0" => Some(Self::V40),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::V31 => "3.1",
            Self::V40 => "4.0",
        }
    }
}

impl fmt::Display for CvssVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural problems found while parsing a vector string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("vector string is empty")]
    Empty,
    #[error("vector must start with 'CVSS:<version>', found '{0}'")]
    MissingPrefix(String),
    #[error("unsupported CVSS version '{0}' (supported: 3.1, 4.0)")]
    UnsupportedVersion(String),
    #[error("malformed metric token '{0}': expected '<metric>:<value>'")]
    MalformedToken(String),
    #[error("unknown metric '{metric}' for CVSS {version}")]
    UnknownMetric {
        metric: String,
        version: CvssVersion,
    },
    #[error("metric '{0}' appears more than once")]
    DuplicateMetric(String),
    #[error("invalid value '{value}' for metric '{metric}' (expected one of: {allowed})")]
    InvalidValue {
        metric: String,
        value: String,
        allowed: String,
    },
    #[error("missing required metric(s): {}", .0.join(", "))]
    MissingMetrics(Vec<&'static str>),
}

/// Validated metrics of a parsed vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum VectorMetrics {
    V31(V31Metrics),
    V40(V40Metrics),
}

/// A parsed and validated vector.
///
/// The caller's string is retained as given so responses can echo it back
/// without reordering its metrics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vector {
    raw: String,
    version: CvssVersion,
    metrics: VectorMetrics,
}

impl Vector {
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        parse(raw)
    }

    /// The input exactly as supplied, including surrounding whitespace.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The vector text without surrounding whitespace.
    pub fn text(&self) -> &str {
        self.raw.trim()
    }

    pub fn version(&self) -> CvssVersion {
        self.version
    }

    pub fn metrics(&self) -> &VectorMetrics {
        &self.metrics
    }

    pub fn v31_metrics(&self) -> Option<&V31Metrics> {
        match &self.metrics {
            VectorMetrics::V31(metrics) => Some(metrics),
            VectorMetrics::V40(_) => None,
        }
    }

    /// Re-serialises the validated metrics in canonical order.
    pub fn to_canonical_string(&self) -> String {
        match &self.metrics {
            VectorMetrics::V31(metrics) => metrics.to_vector_string(),
            VectorMetrics::V40(metrics) => metrics.to_vector_string(),
        }
    }
}

impl FromStr for Vector {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

/// Tokenises `raw` and validates it against the metric set of its declared version.
pub fn parse(raw: &str) -> Result<Vector, ParseError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(ParseError::Empty);
    }

    let mut tokens = text.split(DELIMITER);
    let header = tokens.next().unwrap_or_default();
    let version_token = header
        .strip_prefix(PREFIX)
        .ok_or_else(|| ParseError::MissingPrefix(header.to_string()))?;
    let version = CvssVersion::from_token(version_token)
        .ok_or_else(|| ParseError::UnsupportedVersion(version_token.to_string()))?;

    let pairs = tokens
        .map(split_token)
        .collect::<Result<Vec<_>, _>>()?;

    let metrics = match version {
        CvssVersion::V31 => VectorMetrics::V31(parse_v31(&pairs)?),
        CvssVersion::V40 => VectorMetrics::V40(parse_v40(&pairs)?),
    };

    Ok(Vector {
        raw: raw.to_string(),
        version,
        metrics,
    })
}

fn split_token(token: &str) -> Result<(&str, &str), ParseError> {
    match token.split_once(SEPARATOR) {
        Some((metric, value))
            if !metric.is_empty() && !value.is_empty() && !value.contains(SEPARATOR) =>
        {
            Ok((metric, value))
        }
        _ => Err(ParseError::MalformedToken(token.to_string())),
    }
}

fn parse_v31(pairs: &[(&str, &str)]) -> Result<V31Metrics, ParseError> {
    let mut seen: BTreeMap<V31Metric, &str> = BTreeMap::new();

    for &(abbrev, code) in pairs {
        let metric = V31Metric::from_abbrev(abbrev).ok_or_else(|| ParseError::UnknownMetric {
            metric: abbrev.to_string(),
            version: CvssVersion::V31,
        })?;
        if seen.insert(metric, code).is_some() {
            return Err(ParseError::DuplicateMetric(abbrev.to_string()));
        }
    }

    let missing: Vec<&'static str> = V31Metric::ALL
        .iter()
        .filter(|metric| !seen.contains_key(metric))
        .map(|metric| metric.abbrev())
        .collect();
    if !missing.is_empty() {
        return Err(ParseError::MissingMetrics(missing));
    }

    Ok(V31Metrics {
        attack_vector: typed(&seen, V31Metric::AttackVector, AttackVector::from_code)?,
        attack_complexity: typed(&seen, V31Metric::AttackComplexity, AttackComplexity::from_code)?,
        privileges_required: typed(
            &seen,
            V31Metric::PrivilegesRequired,
            PrivilegesRequired::from_code,
        )?,
        user_interaction: typed(&seen, V31Metric::UserInteraction, UserInteraction::from_code)?,
        scope: typed(&seen, V31Metric::Scope, Scope::from_code)?,
        confidentiality: typed(&seen, V31Metric::Confidentiality, ImpactLevel::from_code)?,
        integrity: typed(&seen, V31Metric::Integrity, ImpactLevel::from_code)?,
        availability: typed(&seen, V31Metric::Availability, ImpactLevel::from_code)?,
    })
}

fn typed<T>(
    seen: &BTreeMap<V31Metric, &str>,
    metric: V31Metric,
    from_code: fn(&str) -> Option<T>,
) -> Result<T, ParseError> {
    let code = seen
        .get(&metric)
        .copied()
        .ok_or_else(|| ParseError::MissingMetrics(vec![metric.abbrev()]))?;

    from_code(code).ok_or_else(|| ParseError::InvalidValue {
        metric: metric.abbrev().to_string(),
        value: code.to_string(),
        allowed: metric.allowed_codes().to_string(),
    })
}

fn parse_v40(pairs: &[(&str, &str)]) -> Result<V40Metrics, ParseError> {
    let mut indexed: Vec<(usize, &'static str)> = Vec::with_capacity(pairs.len());

    for &(abbrev, code) in pairs {
        let (index, def) = v40::lookup(abbrev).ok_or_else(|| ParseError::UnknownMetric {
            metric: abbrev.to_string(),
            version: CvssVersion::V40,
        })?;
        if indexed.iter().any(|(seen, _)| *seen == index) {
            return Err(ParseError::DuplicateMetric(abbrev.to_string()));
        }
        let value = def
            .values
            .iter()
            .copied()
            .find(|allowed| *allowed == code)
            .ok_or_else(|| ParseError::InvalidValue {
                metric: abbrev.to_string(),
                value: code.to_string(),
                allowed: def.values.join(", "),
            })?;
        indexed.push((index, value));
    }

    let missing: Vec<&'static str> = V40_METRICS
        .iter()
        .enumerate()
        .filter(|(index, def)| def.required && !indexed.iter().any(|(seen, _)| seen == index))
        .map(|(_, def)| def.abbrev)
        .collect();
    if !missing.is_empty() {
        return Err(ParseError::MissingMetrics(missing));
    }

    Ok(V40Metrics::from_indexed(indexed))
}
