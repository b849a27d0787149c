use super::metrics::V31Metrics;
use super::v31;
use super::v40::{DefaultV4Calculator, DelegateError, V4Calculator};
use super::vector::{parse, CvssVersion, ParseError, Vector, VectorMetrics};
use serde::Serialize;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error, warn};

const MIN_SCORE: f64 = 0.0;
const MAX_SCORE: f64 = 10.0;

/// Outcome of a successful scoring request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    vector: String,
    version: CvssVersion,
    score: f64,
}

impl ScoreResult {
    /// The vector exactly as the caller supplied it.
    pub fn vector(&self) -> &str {
        &self.vector
    }

    pub fn version(&self) -> CvssVersion {
        self.version
    }

    pub fn score(&self) -> f64 {
        self.score
    }
}

/// Wire discriminator for [`ScoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MissingVector,
    InvalidInput,
    RuntimeError,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingVector => "missing_vector",
            Self::InvalidInput => "invalid_input",
            Self::RuntimeError => "runtime_error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoreError {
    #[error("no CVSS vector supplied; provide one such as 'CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:H/A:H'")]
    MissingVector,
    #[error("invalid CVSS vector: {0}")]
    InvalidInput(#[from] ParseError),
    #[error("invalid CVSS vector: rejected by the CVSS 4.0 calculator: {0}")]
    Rejected(String),
    #[error("{0}")]
    Runtime(String),
}

impl ScoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingVector => ErrorKind::MissingVector,
            Self::InvalidInput(_) | Self::Rejected(_) => ErrorKind::InvalidInput,
            Self::Runtime(_) => ErrorKind::RuntimeError,
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            kind: self.kind(),
            message: self.to_string(),
        }
    }
}

/// Serialisable error payload: `{"kind": "...", "message": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub kind: ErrorKind,
    pub message: String,
}

/// Routes parsed vectors to the v3.1 engine or the configured v4.0 calculator.
#[derive(Debug, Clone)]
pub struct CvssCalculator<C = DefaultV4Calculator> {
    v4: C,
}

impl CvssCalculator {
    pub fn new() -> Self {
        Self {
            v4: DefaultV4Calculator::default(),
        }
    }
}

impl Default for CvssCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: V4Calculator> CvssCalculator<C> {
    pub fn with_v4(v4: C) -> Self {
        Self { v4 }
    }

    /// Scores a vector supplied by a transport that may omit the field entirely.
    pub fn compute_optional(&self, raw: Option<&str>) -> Result<ScoreResult, ScoreError> {
        match raw {
            Some(raw) => self.compute(raw),
            None => Err(ScoreError::MissingVector),
        }
    }

    pub fn compute(&self, raw: &str) -> Result<ScoreResult, ScoreError> {
        if raw.trim().is_empty() {
            return Err(ScoreError::MissingVector);
        }

        let vector = parse(raw)?;
        let score = match vector.metrics() {
            VectorMetrics::V31(metrics) => score_v31(metrics)?,
            VectorMetrics::V40(_) => self.score_v40(&vector)?,
        };

        debug!(version = %vector.version(), score, "computed base score");

        Ok(ScoreResult {
            vector: vector.raw().to_string(),
            version: vector.version(),
            score,
        })
    }

    fn score_v40(&self, vector: &Vector) -> Result<f64, ScoreError> {
        let vector_len = vector.text().len();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.v4.base_score(vector.text())));

        match outcome {
            Ok(Ok(score)) if in_range(score) => Ok(score),
            Ok(Ok(score)) => {
                error!(version = "4.0", vector_len, score, "calculator returned out-of-range score");
                Err(ScoreError::Runtime(format!(
                    "CVSS 4.0 calculator returned an out-of-range score ({score})"
                )))
            }
            Ok(Err(DelegateError::Rejected(reason))) => Err(ScoreError::Rejected(reason)),
            Ok(Err(err @ DelegateError::Unavailable(_))) => {
                warn!(version = "4.0", vector_len, error = %err, "calculator unavailable");
                Err(ScoreError::Runtime(err.to_string()))
            }
            Err(_) => {
                error!(version = "4.0", vector_len, "calculator panicked");
                Err(ScoreError::Runtime(
                    "CVSS 4.0 calculator failed unexpectedly".to_string(),
                ))
            }
        }
    }
}

fn score_v31(metrics: &V31Metrics) -> Result<f64, ScoreError> {
    let score = v31::base_score(metrics);
    if in_range(score) {
        Ok(score)
    } else {
        error!(version = "3.1", score, "base score outside [0, 10]");
        Err(ScoreError::Runtime(format!(
            "CVSS 3.1 computation produced an invalid score ({score})"
        )))
    }
}

fn in_range(score: f64) -> bool {
    score.is_finite() && (MIN_SCORE..=MAX_SCORE).contains(&score)
}

/// Scores `raw` with the default calculator.
pub fn compute(raw: &str) -> Result<ScoreResult, ScoreError> {
    CvssCalculator::new().compute(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cvss::UnavailableV4Calculator;
    use std::sync::{Arc, Mutex};

    const V4_BASE: &str = "CVSS:4.0/AV:N/AC:L/AT:N/PR:N/UI:N/VC:H/VI:H/VA:H/SC:N/SI:N/SA:N";

    #[derive(Default)]
    struct RecordingCalculator {
        seen: Mutex<Vec<String>>,
    }

    impl V4Calculator for RecordingCalculator {
        fn base_score(&self, raw_vector: &str) -> Result<f64, DelegateError> {
            self.seen
                .lock()
                .expect("recording mutex poisoned")
                .push(raw_vector.to_string());
            Ok(9.3)
        }
    }

    struct FixedCalculator(Result<f64, DelegateError>);

    impl V4Calculator for FixedCalculator {
        fn base_score(&self, _raw_vector: &str) -> Result<f64, DelegateError> {
            self.0.clone()
        }
    }

    struct PanickingCalculator;

    impl V4Calculator for PanickingCalculator {
        fn base_score(&self, _raw_vector: &str) -> Result<f64, DelegateError> {
            panic!("lookup table missing")
        }
    }

    #[test]
    fn blank_input_is_missing_vector() {
        let calculator = CvssCalculator::new();
        assert_eq!(calculator.compute(""), Err(ScoreError::MissingVector));
        assert_eq!(calculator.compute("   \n"), Err(ScoreError::MissingVector));
        assert_eq!(
            calculator.compute_optional(None),
            Err(ScoreError::MissingVector)
        );
        assert_eq!(
            ScoreError::MissingVector.kind(),
            ErrorKind::MissingVector
        );
    }

    #[test]
    fn v31_result_echoes_raw_vector() {
        let raw = "CVSS:3.1/A:H/I:H/C:H/S:U/UI:N/PR:N/AC:L/AV:N";
        let result = compute(raw).expect("scores");
        assert_eq!(result.vector(), raw);
        assert_eq!(result.version(), CvssVersion::V31);
        assert_eq!(result.score(), 9.8);
    }

    #[test]
    fn parse_failures_surface_as_invalid_input() {
        let error = compute("CVSS:2.0/AV:N/AC:L/Au:N/C:P/I:P/A:P").expect_err("unsupported");
        assert_eq!(error.kind(), ErrorKind::InvalidInput);
        assert!(error.to_string().contains("unsupported CVSS version '2.0'"));
    }

    #[test]
    fn v40_is_delegated_with_the_trimmed_vector() {
        let recorder = Arc::new(RecordingCalculator::default());
        let calculator = CvssCalculator::with_v4(recorder.clone());
        let raw = format!(" {V4_BASE} ");

        let result = calculator.compute(&raw).expect("delegate scores");

        assert_eq!(result.score(), 9.3);
        assert_eq!(result.version(), CvssVersion::V40);
        assert_eq!(result.vector(), raw);
        assert_eq!(
            *recorder.seen.lock().expect("recording mutex poisoned"),
            vec![V4_BASE.to_string()]
        );
    }

    #[test]
    fn v40_is_not_delegated_when_parsing_fails() {
        let recorder = Arc::new(RecordingCalculator::default());
        let calculator = CvssCalculator::with_v4(recorder.clone());

        let error = calculator
            .compute("CVSS:4.0/AV:N/AC:L")
            .expect_err("incomplete vector");

        assert_eq!(error.kind(), ErrorKind::InvalidInput);
        assert!(recorder
            .seen
            .lock()
            .expect("recording mutex poisoned")
            .is_empty());
    }

    #[test]
    fn missing_v40_calculator_is_a_runtime_error() {
        let calculator = CvssCalculator::with_v4(UnavailableV4Calculator);
        let error = calculator.compute(V4_BASE).expect_err("no calculator configured");
        assert_eq!(error.kind(), ErrorKind::RuntimeError);
        assert_eq!(
            error.to_string(),
            "CVSS 4.0 scoring is not enabled in this build"
        );
    }

    #[cfg(feature = "v4-lookup")]
    #[test]
    fn default_calculator_scores_v40_base_vectors() {
        let result = CvssCalculator::default()
            .compute(V4_BASE)
            .expect("bundled lookup scores");
        assert_eq!(result.version(), CvssVersion::V40);
        assert_eq!(result.score(), 9.3);
        assert_eq!(result.vector(), V4_BASE);
    }

    #[test]
    fn delegate_rejection_is_invalid_input() {
        let calculator = CvssCalculator::with_v4(FixedCalculator(Err(DelegateError::Rejected(
            "metrics out of canonical order".to_string(),
        ))));

        let error = calculator.compute(V4_BASE).expect_err("rejected");
        assert_eq!(error.kind(), ErrorKind::InvalidInput);
        assert_eq!(
            error.body().message,
            "invalid CVSS vector: rejected by the CVSS 4.0 calculator: metrics out of canonical order"
        );
    }

    #[test]
    fn delegate_faults_are_normalised_to_runtime_errors() {
        let out_of_range = CvssCalculator::with_v4(FixedCalculator(Ok(11.0)));
        assert_eq!(
            out_of_range.compute(V4_BASE).map_err(|err| err.kind()),
            Err(ErrorKind::RuntimeError)
        );

        let not_a_number = CvssCalculator::with_v4(FixedCalculator(Ok(f64::NAN)));
        assert_eq!(
            not_a_number.compute(V4_BASE).map_err(|err| err.kind()),
            Err(ErrorKind::RuntimeError)
        );

        let panicking = CvssCalculator::with_v4(PanickingCalculator);
        assert_eq!(
            panicking.compute(V4_BASE),
            Err(ScoreError::Runtime(
                "CVSS 4.0 calculator failed unexpectedly".to_string()
            ))
        );
    }

    #[test]
    fn error_body_serialises_kind_and_message() {
        let body = ScoreError::MissingVector.body();
        let json = serde_json::to_value(&body).expect("serialises");
        assert_eq!(json["kind"], "missing_vector");
        assert!(json["message"]
            .as_str()
            .expect("message string")
            .starts_with("no CVSS vector supplied"));
    }

    #[test]
    fn score_result_serialises_version_as_string() {
        let result = compute("CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:C/C:H/I:H/A:H").expect("scores");
        let json = serde_json::to_value(&result).expect("serialises");
        assert_eq!(
            json,
            serde_json::json!({
                "vector": "CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:C/C:H/I:H/A:H",
                "version": "3.1",
                "score": 10.0,
            })
        );
    }
}
