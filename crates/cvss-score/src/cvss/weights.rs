//! Published CVSS v3.1 base metric coefficients.
//!
//! The table is plain constant data: it is fixed at compile time and shared by
//! every scoring call without synchronisation.

use super::metrics::{
    AttackComplexity, AttackVector, ImpactLevel, PrivilegesRequired, Scope, UserInteraction,
    V31Metric, V31Metrics,
};

pub const AV_NETWORK: f64 = 0.85;
pub const AV_ADJACENT: f64 = 0.62;
pub const AV_LOCAL: f64 = 0.55;
pub const AV_PHYSICAL: f64 = 0.20;

pub const AC_LOW: f64 = 0.77;
pub const AC_HIGH: f64 = 0.44;

pub const PR_NONE: f64 = 0.85;
pub const PR_LOW_UNCHANGED: f64 = 0.62;
pub const PR_HIGH_UNCHANGED: f64 = 0.27;
pub const PR_LOW_CHANGED: f64 = 0.68;
pub const PR_HIGH_CHANGED: f64 = 0.50;

pub const UI_NONE: f64 = 0.85;
pub const UI_REQUIRED: f64 = 0.62;

pub const CIA_HIGH: f64 = 0.56;
pub const CIA_LOW: f64 = 0.22;
pub const CIA_NONE: f64 = 0.0;

impl AttackVector {
    pub fn weight(self) -> f64 {
        match self {
            Self::Network => AV_NETWORK,
            Self::Adjacent => AV_ADJACENT,
            Self::Local => AV_LOCAL,
            Self::Physical => AV_PHYSICAL,
        }
    }
}

impl AttackComplexity {
    pub fn weight(self) -> f64 {
        match self {
            Self::Low => AC_LOW,
            Self::High => AC_HIGH,
        }
    }
}

impl PrivilegesRequired {
    /// Low and High privileges carry the larger coefficients under a changed scope.
    pub fn weight(self, scope: Scope) -> f64 {
        match (self, scope) {
            (Self::None, _) => PR_NONE,
            (Self::Low, Scope::Unchanged) => PR_LOW_UNCHANGED,
            (Self::High, Scope::Unchanged) => PR_HIGH_UNCHANGED,
            (Self::Low, Scope::Changed) => PR_LOW_CHANGED,
            (Self::High, Scope::Changed) => PR_HIGH_CHANGED,
        }
    }
}

impl UserInteraction {
    pub fn weight(self) -> f64 {
        match self {
            Self::None => UI_NONE,
            Self::Required => UI_REQUIRED,
        }
    }
}

impl ImpactLevel {
    pub fn weight(self) -> f64 {
        match self {
            Self::High => CIA_HIGH,
            Self::Low => CIA_LOW,
            Self::None => CIA_NONE,
        }
    }
}

/// Coefficient a metric contributes to the formula for the given metric set.
///
/// Scope has no coefficient of its own and returns `None`; it only selects
/// formula branches and the Privileges Required weight.
pub fn weight_of(metric: V31Metric, metrics: &V31Metrics) -> Option<f64> {
    let weight = match metric {
        V31Metric::AttackVector => metrics.attack_vector.weight(),
        V31Metric::AttackComplexity => metrics.attack_complexity.weight(),
        V31Metric::PrivilegesRequired => metrics.privileges_required.weight(metrics.scope),
        V31Metric::UserInteraction => metrics.user_interaction.weight(),
        V31Metric::Scope => return None,
        V31Metric::Confidentiality => metrics.confidentiality.weight(),
        V31Metric::Integrity => metrics.integrity.weight(),
        V31Metric::Availability => metrics.availability.weight(),
    };
    Some(weight)
}
