use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::roll::clamp_modifier;

/// Name given to pieces the host reports without a name.
pub const DEFAULT_NAME: &str = "Token";

/// Opaque identifier of an on-screen object, as handed out by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub String);

impl ObjectId {
    /// Wrap a host-supplied identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One tracked piece in the turn order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantEntry {
    /// The host object this entry tracks.
    #[serde(alias = "tokenId")]
    pub id: ObjectId,
    /// Display label.
    pub name: String,
    /// Roll plus modifier, 0 until rolled.
    #[serde(default, deserialize_with = "lenient_int")]
    pub initiative: i32,
    /// User-editable modifier.
    #[serde(default, deserialize_with = "lenient_modifier")]
    pub modifier: i32,
    /// Last raw d20 result, absent until the first roll.
    #[serde(default)]
    pub roll: Option<i32>,
}

impl ParticipantEntry {
    /// A freshly added, unrolled entry.
    pub fn new(id: ObjectId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            initiative: 0,
            modifier: 0,
            roll: None,
        }
    }

    /// The roll used for tie-breaking, with an unrolled entry counting as 0.
    pub fn roll_or_zero(&self) -> i32 {
        self.roll.unwrap_or(0)
    }
}

/// Accept integers, fractional numbers (truncated) and `null` (as 0).
///
/// Documents written by older clients store a rejected modifier as `null`
/// and keep whatever number the input field produced.
fn lenient_int<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Number>::deserialize(deserializer)?;
    Ok(value.map(|n| number_to_i32(&n)).unwrap_or(0))
}

/// [`lenient_int`], bounded to the modifier range.
fn lenient_modifier<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_int(deserializer).map(clamp_modifier)
}

fn number_to_i32(n: &serde_json::Number) -> i32 {
    if let Some(i) = n.as_i64() {
        return i.clamp(i32::MIN as i64, i32::MAX as i64) as i32;
    }
    match n.as_f64() {
        // `as` saturates on overflow
        Some(f) if f.is_finite() => f.trunc() as i32,
        _ => 0,
    }
}
