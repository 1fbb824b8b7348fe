//! Likert answers and the answer map.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::ValidationError;

/// A single Likert response, always within 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Likert(u8);

impl Likert {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Scale labels, index 0 is the label for 1.
    pub const LABELS: [&'static str; 5] = [
        "Strongly disagree",
        "Disagree",
        "Neutral",
        "Agree",
        "Strongly agree",
    ];

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn label(self) -> &'static str {
        Self::LABELS[usize::from(self.0 - 1)]
    }

    /// Every point on the scale, lowest first.
    pub fn all() -> impl Iterator<Item = Likert> {
        (Self::MIN..=Self::MAX).map(Likert)
    }
}

impl TryFrom<u8> for Likert {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Likert::new(value).ok_or(ValidationError::LikertOutOfRange(i64::from(value)))
    }
}

impl TryFrom<i64> for Likert {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .and_then(Likert::new)
            .ok_or(ValidationError::LikertOutOfRange(value))
    }
}

impl From<Likert> for u8 {
    fn from(value: Likert) -> Self {
        value.0
    }
}

impl fmt::Display for Likert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Answer map: question id -> Likert score.
///
/// Serialized as a flat `{"<id>": <number>}` JSON object. Keys are only
/// added or overwritten; the whole map is cleared on restart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurveyData(BTreeMap<String, Likert>);

impl SurveyData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, question_id: impl Into<String>, score: Likert) {
        self.0.insert(question_id.into(), score);
    }

    pub fn get(&self, question_id: &str) -> Option<Likert> {
        self.0.get(question_id).copied()
    }

    pub fn contains(&self, question_id: &str) -> bool {
        self.0.contains_key(question_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Likert)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<K: Into<String>> FromIterator<(K, Likert)> for SurveyData {
    fn from_iter<I: IntoIterator<Item = (K, Likert)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn likert_bounds() {
        assert!(Likert::new(0).is_none());
        assert!(Likert::new(6).is_none());
        assert_eq!(Likert::new(3).map(Likert::value), Some(3));
        assert_eq!(
            Likert::try_from(-1_i64),
            Err(ValidationError::LikertOutOfRange(-1))
        );
        assert_eq!(Likert::all().count(), 5);
        assert_eq!(Likert::new(5).unwrap().label(), "Strongly agree");
    }

    #[test]
    fn record_overwrites() {
        let mut data = SurveyData::new();
        data.record("q1", Likert::new(2).unwrap());
        data.record("q1", Likert::new(4).unwrap());
        assert_eq!(data.len(), 1);
        assert_eq!(data.get("q1").map(Likert::value), Some(4));
    }

    #[test]
    fn serializes_as_flat_map() {
        let data: SurveyData = [("q1", Likert::new(3).unwrap()), ("q2", Likert::new(5).unwrap())]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&data).unwrap();
        assert_eq!(json, r#"{"q1":3,"q2":5}"#);
    }

    #[test]
    fn out_of_range_values_fail_to_deserialize() {
        assert!(serde_json::from_str::<SurveyData>(r#"{"q1":9}"#).is_err());
        assert!(serde_json::from_str::<SurveyData>(r#"{"q1":"x"}"#).is_err());
        assert!(serde_json::from_str::<SurveyData>(r#"[1,2]"#).is_err());
    }
}
