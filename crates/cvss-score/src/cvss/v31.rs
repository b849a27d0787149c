//! CVSS v3.1 Base Score formula.

use super::metrics::{Scope, V31Metrics};

const IMPACT_UNCHANGED_FACTOR: f64 = 6.42;
const IMPACT_CHANGED_FACTOR: f64 = 7.52;
const IMPACT_CHANGED_OFFSET: f64 = 0.029;
const IMPACT_CHANGED_PENALTY: f64 = 3.25;
const IMPACT_CHANGED_PENALTY_OFFSET: f64 = 0.02;
const EXPLOITABILITY_FACTOR: f64 = 8.22;
const SCOPE_CHANGED_MULTIPLIER: f64 = 1.08;
const MAX_SCORE: f64 = 10.0;

/// Intermediate values of a v3.1 computation, kept for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct V31Breakdown {
    pub impact_sub_score: f64,
    pub impact: f64,
    pub exploitability: f64,
    pub base_score: f64,
}

/// Computes the Base Score in `[0.0, 10.0]` with one decimal of precision.
pub fn base_score(metrics: &V31Metrics) -> f64 {
    breakdown(metrics).base_score
}

pub fn breakdown(metrics: &V31Metrics) -> V31Breakdown {
    let confidentiality = metrics.confidentiality.weight();
    let integrity = metrics.integrity.weight();
    let availability = metrics.availability.weight();

    let impact_sub_score =
        1.0 - (1.0 - confidentiality) * (1.0 - integrity) * (1.0 - availability);

    let impact = match metrics.scope {
        Scope::Unchanged => IMPACT_UNCHANGED_FACTOR * impact_sub_score,
        Scope::Changed => {
            IMPACT_CHANGED_FACTOR * (impact_sub_score - IMPACT_CHANGED_OFFSET)
                - IMPACT_CHANGED_PENALTY
                    * (impact_sub_score - IMPACT_CHANGED_PENALTY_OFFSET).powi(15)
        }
    };

    let exploitability = EXPLOITABILITY_FACTOR
        * metrics.attack_vector.weight()
        * metrics.attack_complexity.weight()
        * metrics.privileges_required.weight(metrics.scope)
        * metrics.user_interaction.weight();

    let base_score = if impact <= 0.0 {
        0.0
    } else {
        match metrics.scope {
            Scope::Unchanged => roundup((impact + exploitability).min(MAX_SCORE)),
            Scope::Changed => {
                roundup((SCOPE_CHANGED_MULTIPLIER * (impact + exploitability)).min(MAX_SCORE))
            }
        }
    };

    V31Breakdown {
        impact_sub_score,
        impact,
        exploitability,
        base_score,
    }
}

/// Smallest value with one decimal place that is greater than or equal to `value`.
///
/// The input is first rounded to five decimal places so that representation
/// noise such as `4.000000000000001` does not push the result up to `4.1`.
pub fn roundup(value: f64) -> f64 {
    let scaled = (value * 100_000.0).round() as i64;
    if scaled % 10_000 == 0 {
        scaled as f64 / 100_000.0
    } else {
        ((scaled / 10_000) + 1) as f64 / 10.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cvss::metrics::{
        AttackComplexity, AttackVector, ImpactLevel, PrivilegesRequired, UserInteraction,
    };

    fn critical(scope: Scope) -> V31Metrics {
        V31Metrics {
            attack_vector: AttackVector::Network,
            attack_complexity: AttackComplexity::Low,
            privileges_required: PrivilegesRequired::None,
            user_interaction: UserInteraction::None,
            scope,
            confidentiality: ImpactLevel::High,
            integrity: ImpactLevel::High,
            availability: ImpactLevel::High,
        }
    }

    #[test]
    fn roundup_keeps_exact_tenths() {
        assert_eq!(roundup(4.0), 4.0);
        assert_eq!(roundup(4.000000000000001), 4.0);
        assert_eq!(roundup(3.9999999999999996), 4.0);
        assert_eq!(roundup(0.1 + 0.2), 0.3);
        assert_eq!(roundup(0.0), 0.0);
        assert_eq!(roundup(10.0), 10.0);
    }

    #[test]
    fn roundup_always_moves_to_next_tenth() {
        assert_eq!(roundup(4.02), 4.1);
        assert_eq!(roundup(4.00001), 4.1);
        assert_eq!(roundup(9.76), 9.8);
        assert_eq!(roundup(1.01), 1.1);
    }

    #[test]
    fn maximum_unchanged_scope_scores_nine_point_eight() {
        assert_eq!(base_score(&critical(Scope::Unchanged)), 9.8);
    }

    #[test]
    fn maximum_changed_scope_is_capped_at_ten() {
        let result = breakdown(&critical(Scope::Changed));
        assert!(SCOPE_CHANGED_MULTIPLIER * (result.impact + result.exploitability) > 10.0);
        assert_eq!(result.base_score, 10.0);
    }

    #[test]
    fn no_impact_floors_to_zero_for_both_scopes() {
        for scope in [Scope::Unchanged, Scope::Changed] {
            let metrics = V31Metrics {
                confidentiality: ImpactLevel::None,
                integrity: ImpactLevel::None,
                availability: ImpactLevel::None,
                ..critical(scope)
            };
            let result = breakdown(&metrics);
            assert!(result.impact <= 0.0);
            assert!(result.exploitability > 0.0);
            assert_eq!(result.base_score, 0.0);
        }
    }

    #[test]
    fn breakdown_exposes_sub_scores() {
        let result = breakdown(&critical(Scope::Unchanged));
        assert!((result.impact_sub_score - 0.914816).abs() < 1e-9);
        assert!((result.impact - 5.873).abs() < 1e-3);
        assert!((result.exploitability - 3.887).abs() < 1e-3);
    }
}
