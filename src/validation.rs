use crate::catalog::QuestionId;
use crate::error::{InvalidInput, ShsError};
use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// Smallest accepted Likert response
pub const MIN_RESPONSE: i64 = -2;
/// Largest accepted Likert response
pub const MAX_RESPONSE: i64 = 2;
/// Number of questions in a complete response set
pub const QUESTION_COUNT: usize = 10;

/// Untyped response set as produced by the loaders
pub type RawResponses = BTreeMap<String, Value>;

/// Check that a raw response set holds exactly `q1..q10`, each an integer in [-2, 2]
pub fn validate(responses: &RawResponses) -> Result<(), ShsError> {
    if responses.len() != QUESTION_COUNT {
        return Err(InvalidInput::WrongCount {
            count: responses.len(),
        }
        .into());
    }

    for question in QuestionId::ALL {
        let value = responses
            .get(question.as_str())
            .ok_or_else(|| InvalidInput::MissingField {
                question: question.to_string(),
            })?;
        response_value(question, value)?;
    }

    Ok(())
}

/// Extract a response value, rejecting non-integers and out-of-range values
fn response_value(question: QuestionId, value: &Value) -> Result<i8, InvalidInput> {
    // u64 covers integers above i64::MAX
    let number = value
        .as_i64()
        .map(i128::from)
        .or_else(|| value.as_u64().map(i128::from))
        .ok_or_else(|| InvalidInput::NotInteger {
            question: question.to_string(),
            value: value.to_string(),
        })?;

    if !(i128::from(MIN_RESPONSE)..=i128::from(MAX_RESPONSE)).contains(&number) {
        return Err(InvalidInput::OutOfRange {
            question: question.to_string(),
            value: number,
        });
    }

    // range checked above
    Ok(number as i8)
}

/// Take the response map out of an arbitrary JSON batch item
pub fn responses_from_value(value: &Value) -> Result<RawResponses, ShsError> {
    match value {
        Value::Object(map) => Ok(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()),
        other => Err(InvalidInput::NotAnObject {
            found: json_type_name(other).to_string(),
        }
        .into()),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// A validated set of ten responses, indexed by question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseSet {
    values: [i8; QUESTION_COUNT],
}

impl ResponseSet {
    /// Response to a single question
    pub fn get(&self, question: QuestionId) -> i8 {
        self.values[question.index()]
    }

    /// Responses in `q1..q10` order
    pub fn values(&self) -> [i8; QUESTION_COUNT] {
        self.values
    }

    /// Build from the positional list form; position `i` maps to `q{i+1}`
    pub fn from_list(responses: &[i64]) -> Result<Self, ShsError> {
        if responses.len() != QUESTION_COUNT {
            return Err(ShsError::Shape {
                expected: QUESTION_COUNT,
                actual: responses.len(),
            });
        }

        let raw: RawResponses = QuestionId::ALL
            .iter()
            .zip(responses)
            .map(|(question, value)| (question.as_str().to_string(), Value::from(*value)))
            .collect();
        Self::try_from(&raw)
    }

    /// Back to the untyped map form
    pub fn to_raw(&self) -> RawResponses {
        QuestionId::ALL
            .iter()
            .map(|q| (q.as_str().to_string(), Value::from(self.get(*q))))
            .collect()
    }
}

impl TryFrom<&RawResponses> for ResponseSet {
    type Error = ShsError;

    fn try_from(responses: &RawResponses) -> Result<Self, Self::Error> {
        validate(responses)?;

        let mut values = [0i8; QUESTION_COUNT];
        for question in QuestionId::ALL {
            if let Some(value) = responses.get(question.as_str()) {
                values[question.index()] = response_value(question, value)?;
            }
        }
        Ok(Self { values })
    }
}

// Serialized as a `q1..q10` map in positional order
impl Serialize for ResponseSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(QUESTION_COUNT))?;
        for question in QuestionId::ALL {
            map.serialize_entry(question.as_str(), &self.get(question))?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ResponseSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawResponses::deserialize(deserializer)?;
        ResponseSet::try_from(&raw).map_err(D::Error::custom)
    }
}
