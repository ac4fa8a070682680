//! Typed parameter bags for API calls.
//!
//! # Design
//! Upstream option objects are free-form. Here a bag is an insertion-ordered
//! list of `(key, ParamValue)` pairs where every value is one of three
//! shapes: a scalar, a flat list of scalars, or a one-level map of scalars.
//! The request builder serializes each shape with a single exhaustive match.

use std::fmt;

use serde_json::{Map, Number, Value};

use crate::error::ApiError;

/// A single leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    pub fn to_json(&self) -> Value {
        match self {
            Scalar::Str(s) => Value::String(s.clone()),
            Scalar::Int(i) => Value::Number((*i).into()),
            Scalar::Float(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
            Scalar::Bool(b) => Value::Bool(*b),
        }
    }

    fn from_json(key: &str, value: &Value) -> Result<Self, ApiError> {
        match value {
            Value::String(s) => Ok(Scalar::Str(s.clone())),
            Value::Bool(b) => Ok(Scalar::Bool(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(Scalar::Int(i)),
                None => n
                    .as_f64()
                    .map(Scalar::Float)
                    .ok_or_else(|| ApiError::InvalidParams(format!("`{key}` is out of range"))),
            },
            other => Err(ApiError::InvalidParams(format!(
                "`{key}` must be a string, number or boolean, got {other}"
            ))),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Str(s) => f.write_str(s),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Float(v) => write!(f, "{v}"),
            Scalar::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Str(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Str(v)
    }
}

impl From<&String> for Scalar {
    fn from(v: &String) -> Self {
        Scalar::Str(v.clone())
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int(v)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Scalar::Int(v.into())
    }
}

impl From<u32> for Scalar {
    fn from(v: u32) -> Self {
        Scalar::Int(v.into())
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

/// The value side of a parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Scalar(Scalar),
    /// Sent as one `key=a,b,c` query entry, or a JSON array in a body.
    List(Vec<Scalar>),
    /// Flattened into its own query entries, or a JSON object in a body.
    Nested(Vec<(String, Scalar)>),
}

impl ParamValue {
    pub fn to_json(&self) -> Value {
        match self {
            ParamValue::Scalar(s) => s.to_json(),
            ParamValue::List(items) => Value::Array(items.iter().map(Scalar::to_json).collect()),
            ParamValue::Nested(pairs) => Value::Object(
                pairs
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect::<Map<_, _>>(),
            ),
        }
    }
}

macro_rules! param_value_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ParamValue {
                fn from(v: $ty) -> Self {
                    ParamValue::Scalar(v.into())
                }
            }

            impl From<Vec<$ty>> for ParamValue {
                fn from(v: Vec<$ty>) -> Self {
                    ParamValue::List(v.into_iter().map(Into::into).collect())
                }
            }
        )*
    };
}

param_value_from!(&str, String, &String, i64, i32, u32, f64, bool);

impl From<Scalar> for ParamValue {
    fn from(v: Scalar) -> Self {
        ParamValue::Scalar(v)
    }
}

/// An insertion-ordered parameter bag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: Vec<(String, ParamValue)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`. An existing key keeps its position and takes the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder form of [`Params::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Merge `other` into `self`, keys of `other` winning.
    pub fn extend(&mut self, other: Params) {
        for (key, value) in other.entries {
            self.insert(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Convert a JSON object into a bag.
    ///
    /// Null members are skipped. Arrays must hold scalars and objects must
    /// hold scalars; anything deeper is rejected.
    pub fn from_json(value: &Value) -> Result<Self, ApiError> {
        let Value::Object(map) = value else {
            return Err(ApiError::InvalidParams(format!(
                "params should be an object, got {}",
                json_kind(value)
            )));
        };

        let mut params = Params::new();
        for (key, value) in map {
            let param = match value {
                Value::Null => continue,
                Value::Array(items) => ParamValue::List(
                    items
                        .iter()
                        .map(|item| Scalar::from_json(key, item))
                        .collect::<Result<_, _>>()?,
                ),
                Value::Object(inner) => ParamValue::Nested(
                    inner
                        .iter()
                        .filter(|(_, v)| !v.is_null())
                        .map(|(k, v)| Ok((k.clone(), Scalar::from_json(k, v)?)))
                        .collect::<Result<_, ApiError>>()?,
                ),
                scalar => ParamValue::Scalar(Scalar::from_json(key, scalar)?),
            };
            params.insert(key.clone(), param);
        }
        Ok(params)
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// What a request carries besides credentials.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Payload {
    #[default]
    None,
    Params(Params),
    /// A bare list joined under `key`, e.g. `fields=id,name,badges`.
    List { key: String, values: Vec<Scalar> },
}

impl Payload {
    pub fn is_empty(&self) -> bool {
        match self {
            Payload::None => true,
            Payload::Params(p) => p.is_empty(),
            Payload::List { values, .. } => values.is_empty(),
        }
    }
}
