//! CVSS vector parsing, the v3.1 Base Score engine and version dispatch.
//!
//! Raw strings flow through [`vector::parse`] into a typed [`Vector`], then
//! [`CvssCalculator`] scores v3.1 locally and hands v4.0 to a [`V4Calculator`].

pub mod dispatcher;
pub mod metrics;
pub mod v31;
pub mod v40;
pub mod vector;
pub mod weights;

pub use dispatcher::{compute, CvssCalculator, ErrorBody, ErrorKind, ScoreError, ScoreResult};
pub use metrics::{
    AttackComplexity, AttackVector, ImpactLevel, PrivilegesRequired, Scope, UserInteraction,
    V31Metric, V31Metrics,
};
pub use v31::{base_score, roundup, V31Breakdown};
#[cfg(feature = "v4-lookup")]
pub use v40::LookupV4Calculator;
pub use v40::{
    DefaultV4Calculator, DelegateError, UnavailableV4Calculator, V40Metrics, V4Calculator,
};
pub use vector::{parse, CvssVersion, ParseError, Vector, VectorMetrics};
pub use weights::weight_of;
