use serde::Serialize;

/// Base metric abbreviations defined by CVSS v3.1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum V31Metric {
    AttackVector,
    AttackComplexity,
    PrivilegesRequired,
    UserInteraction,
    Scope,
    Confidentiality,
    Integrity,
    Availability,
}

impl V31Metric {
    /// Canonical ordering used when rendering a vector string.
    pub const ALL: [V31Metric; 8] = [
        V31Metric::AttackVector,
        V31Metric::AttackComplexity,
        V31Metric::PrivilegesRequired,
        V31Metric::UserInteraction,
        V31Metric::Scope,
        V31Metric::Confidentiality,
        V31Metric::Integrity,
        V31Metric::Availability,
    ];

    pub fn from_abbrev(value: &str) -> Option<Self> {
        match value {
            "AV" => Some(Self::AttackVector),
            "AC" => Some(Self::AttackComplexity),
            "PR" => Some(Self::PrivilegesRequired),
            "UI" => Some(Self::UserInteraction),
            "S" => Some(Self::Scope),
            "C" => Some(Self::Confidentiality),
            "I" => Some(Self::Integrity),
            "A" => Some(Self::Availability),
            _ => None,
        }
    }

    pub fn abbrev(self) -> &'static str {
        match self {
            Self::AttackVector => "AV",
            Self::AttackComplexity => "AC",
            Self::PrivilegesRequired => "PR",
            Self::UserInteraction => "UI",
            Self::Scope => "S",
            Self::Confidentiality => "C",
            Self::Integrity => "I",
            Self::Availability => "A",
        }
    }

    /// Comma separated list of accepted value codes, used in error messages.
    pub fn allowed_codes(self) -> &'static str {
        match self {
            Self::AttackVector => "N, A, L, P",
            Self::AttackComplexity => "L, H",
            Self::PrivilegesRequired => "N, L, H",
            Self::UserInteraction => "N, R",
            Self::Scope => "U, C",
            Self::Confidentiality | Self::Integrity | Self::Availability => "H, L, N",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AttackVector {
    Network,
    Adjacent,
    Local,
    Physical,
}

impl AttackVector {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "N" => Some(Self::Network),
            "A" => Some(Self::Adjacent),
            "L" => Some(Self::Local),
            "P" => Some(Self::Physical),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::Network => "N",
            Self::Adjacent => "A",
            Self::Local => "L",
            Self::Physical => "P",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AttackComplexity {
    Low,
    High,
}

impl AttackComplexity {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "L" => Some(Self::Low),
            "H" => Some(Self::High),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::Low => "L",
            Self::High => "H",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PrivilegesRequired {
    None,
    Low,
    High,
}

impl PrivilegesRequired {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "N" => Some(Self::None),
            "L" => Some(Self::Low),
            "H" => Some(Self::High),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::None => "N",
            Self::Low => "L",
            Self::High => "H",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum UserInteraction {
    None,
    Required,
}

impl UserInteraction {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "N" => Some(Self::None),
            "R" => Some(Self::Required),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::None => "N",
            Self::Required => "R",
        }
    }
}

/// Whether a successful exploit can affect components beyond the vulnerable one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Scope {
    Unchanged,
    Changed,
}

impl Scope {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "U" => Some(Self::Unchanged),
            "C" => Some(Self::Changed),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::Unchanged => "U",
            Self::Changed => "C",
        }
    }
}

/// Shared value domain of the Confidentiality, Integrity and Availability impacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ImpactLevel {
    High,
    Low,
    None,
}

impl ImpactLevel {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "H" => Some(Self::High),
            "L" => Some(Self::Low),
            "N" => Some(Self::None),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::High => "H",
            Self::Low => "L",
            Self::None => "N",
        }
    }
}

/// Complete, validated set of v3.1 base metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct V31Metrics {
    pub attack_vector: AttackVector,
    pub attack_complexity: AttackComplexity,
    pub privileges_required: PrivilegesRequired,
    pub user_interaction: UserInteraction,
    pub scope: Scope,
    pub confidentiality: ImpactLevel,
    pub integrity: ImpactLevel,
    pub availability: ImpactLevel,
}

impl V31Metrics {
    pub fn code_of(&self, metric: V31Metric) -> &'static str {
        match metric {
            V31Metric::AttackVector => self.attack_vector.code(),
            V31Metric::AttackComplexity => self.attack_complexity.code(),
            V31Metric::PrivilegesRequired => self.privileges_required.code(),
            V31Metric::UserInteraction => self.user_interaction.code(),
            V31Metric::Scope => self.scope.code(),
            V31Metric::Confidentiality => self.confidentiality.code(),
            V31Metric::Integrity => self.integrity.code(),
            V31Metric::Availability => self.availability.code(),
        }
    }

    /// Renders the metrics in canonical order, e.g. `CVSS:3.1/AV:N/AC:L/...`.
    pub fn to_vector_string(&self) -> String {
        let mut rendered = String::from("CVSS:3.1");
        for metric in V31Metric::ALL {
            rendered.push('/');
            rendered.push_str(metric.abbrev());
            rendered.push(':');
            rendered.push_str(self.code_of(metric));
        }
        rendered
    }
}
