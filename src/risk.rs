//! Risk score and risk level types.
//!
//! The producing service reports a score from 0 to 10. It is sent either as a
//! bare integer or as the scorer object (`{"score": 7, "breakdown": {...}}`);
//! both forms are accepted here.

use std::fmt;

use serde_json::Value;

/// A risk score clamped to `0..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RiskScore(u8);

impl RiskScore {
    /// Highest representable score.
    pub const MAX: u8 = 10;

    /// Create a score, clamping anything above [`RiskScore::MAX`].
    pub fn new(value: u8) -> Self {
        Self(value.min(Self::MAX))
    }

    /// Raw score value.
    pub fn value(self) -> u8 {
        self.0
    }

    /// Risk band for this score.
    pub fn level(self) -> RiskLevel {
        RiskLevel::from_score(self)
    }

    /// Read a score from a wire value.
    ///
    /// Accepts an integer or an object carrying an integer `score` field.
    /// Anything else (floats, strings, null) yields `None`.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .map(|v| Self(v.clamp(0, Self::MAX as i64) as u8))
                // Above i64::MAX
                .or_else(|| n.as_u64().map(|_| Self(Self::MAX))),
            Value::Object(map) => map.get("score").and_then(Self::from_json),
            _ => None,
        }
    }
}

impl fmt::Display for RiskScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}

/// Coarse risk band shown next to the numeric score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Low up to 3, medium up to 7, high above.
    pub fn from_score(score: RiskScore) -> Self {
        match score.value() {
            0..=3 => RiskLevel::Low,
            4..=7 => RiskLevel::Medium,
            _ => RiskLevel::High,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low Risk",
            RiskLevel::Medium => "Medium Risk",
            RiskLevel::High => "High Risk",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
