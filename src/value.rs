// used for timestamps and dates held by properties
use chrono::{DateTime, NaiveDate, Utc};
// used for decimal numbers
use bigdecimal::BigDecimal;
// used so that property snapshots can be handed to display/audit tooling
use serde::Serialize;

// used when parsing canonical text back into a value
use std::str::FromStr;
// used to print out readable forms of a value
use std::fmt;

use crate::error::{Result, ShapelessError};

/// The run-time type tag of a [`Value`].
///
/// Overload and constructor resolution compares these tags exactly; there is
/// no widening from `Integer` to `Real` or similar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Kind {
    Null,
    Boolean,
    Integer,
    Real,
    Decimal,
    Text,
    Date,
    Timestamp,
    List,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Kind::Null => "Null",
            Kind::Boolean => "Boolean",
            Kind::Integer => "Integer",
            Kind::Real => "Real",
            Kind::Decimal => "Decimal",
            Kind::Text => "Text",
            Kind::Date => "Date",
            Kind::Timestamp => "Timestamp",
            Kind::List => "List",
        };
        write!(f, "{}", name)
    }
}

/// A dynamically typed property value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Real(f64),
    Decimal(BigDecimal),
    Text(String),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
    List(Vec<Value>),
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Boolean(_) => Kind::Boolean,
            Value::Integer(_) => Kind::Integer,
            Value::Real(_) => Kind::Real,
            Value::Decimal(_) => Kind::Decimal,
            Value::Text(_) => Kind::Text,
            Value::Date(_) => Kind::Date,
            Value::Timestamp(_) => Kind::Timestamp,
            Value::List(_) => Kind::List,
        }
    }
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
    /// Parses the canonical text form (as produced by `Display`) into a value
    /// of the given kind. `null` parses to [`Value::Null`] for every kind but
    /// `Text`, where it is just the four letters.
    pub fn parse(kind: Kind, text: &str) -> Result<Value> {
        if text == "null" && kind != Kind::Text {
            return Ok(Value::Null);
        }
        let mismatch = || ShapelessError::TypeMismatch {
            expected: kind,
            found: Kind::Text,
        };
        let value = match kind {
            Kind::Null => return Err(mismatch()),
            Kind::Boolean => Value::Boolean(bool::from_str(text).map_err(|_| mismatch())?),
            Kind::Integer => Value::Integer(i64::from_str(text).map_err(|_| mismatch())?),
            Kind::Real => Value::Real(f64::from_str(text).map_err(|_| mismatch())?),
            Kind::Decimal => Value::Decimal(BigDecimal::from_str(text).map_err(|_| mismatch())?),
            Kind::Text => Value::Text(text.to_string()),
            Kind::Date => Value::Date(NaiveDate::from_str(text).map_err(|_| mismatch())?),
            Kind::Timestamp => {
                Value::Timestamp(DateTime::<Utc>::from_str(text).map_err(|_| mismatch())?)
            }
            // lists have no single-line canonical form to read back
            Kind::List => return Err(mismatch()),
        };
        Ok(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Real(r) => write!(f, "{}", r),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::Text(s) => write!(f, "{}", s),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Timestamp(t) => write!(f, "{}", t.to_rfc3339()),
            Value::List(values) => {
                write!(f, "[")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(r: f64) -> Self {
        Value::Real(r)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

/// A Rust type that can back a field of an introspectable struct.
///
/// Every implementation names its declared type through `DATA_TYPE` (this is
/// the text reported by property descriptors) and its value tag through `KIND`.
pub trait PropertyType: Sized {
    const DATA_TYPE: &'static str;
    const KIND: Kind;
    fn to_value(&self) -> Value;
    /// Returns `None` when the value's kind is incompatible with the field.
    fn from_value(value: Value) -> Option<Self>;
}

// ------------- Property Types --------------
impl PropertyType for bool {
    const DATA_TYPE: &'static str = "bool";
    const KIND: Kind = Kind::Boolean;
    fn to_value(&self) -> Value {
        Value::Boolean(*self)
    }
    fn from_value(value: Value) -> Option<bool> {
        match value {
            Value::Boolean(b) => Some(b),
            _ => None,
        }
    }
}
impl PropertyType for i64 {
    const DATA_TYPE: &'static str = "i64";
    const KIND: Kind = Kind::Integer;
    fn to_value(&self) -> Value {
        Value::Integer(*self)
    }
    fn from_value(value: Value) -> Option<i64> {
        match value {
            Value::Integer(i) => Some(i),
            _ => None,
        }
    }
}
impl PropertyType for i32 {
    const DATA_TYPE: &'static str = "i32";
    const KIND: Kind = Kind::Integer;
    fn to_value(&self) -> Value {
        Value::Integer(*self as i64)
    }
    fn from_value(value: Value) -> Option<i32> {
        match value {
            Value::Integer(i) => i32::try_from(i).ok(),
            _ => None,
        }
    }
}
impl PropertyType for u32 {
    const DATA_TYPE: &'static str = "u32";
    const KIND: Kind = Kind::Integer;
    fn to_value(&self) -> Value {
        Value::Integer(*self as i64)
    }
    fn from_value(value: Value) -> Option<u32> {
        match value {
            Value::Integer(i) => u32::try_from(i).ok(),
            _ => None,
        }
    }
}
impl PropertyType for f64 {
    const DATA_TYPE: &'static str = "f64";
    const KIND: Kind = Kind::Real;
    fn to_value(&self) -> Value {
        Value::Real(*self)
    }
    fn from_value(value: Value) -> Option<f64> {
        match value {
            Value::Real(r) => Some(r),
            _ => None,
        }
    }
}
impl PropertyType for String {
    const DATA_TYPE: &'static str = "String";
    const KIND: Kind = Kind::Text;
    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }
    fn from_value(value: Value) -> Option<String> {
        match value {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}
impl PropertyType for BigDecimal {
    const DATA_TYPE: &'static str = "Decimal";
    const KIND: Kind = Kind::Decimal;
    fn to_value(&self) -> Value {
        Value::Decimal(self.clone())
    }
    fn from_value(value: Value) -> Option<BigDecimal> {
        match value {
            Value::Decimal(d) => Some(d),
            _ => None,
        }
    }
}
impl PropertyType for NaiveDate {
    const DATA_TYPE: &'static str = "NaiveDate";
    const KIND: Kind = Kind::Date;
    fn to_value(&self) -> Value {
        Value::Date(*self)
    }
    fn from_value(value: Value) -> Option<NaiveDate> {
        match value {
            Value::Date(d) => Some(d),
            _ => None,
        }
    }
}
impl PropertyType for DateTime<Utc> {
    const DATA_TYPE: &'static str = "DateTime<Utc>";
    const KIND: Kind = Kind::Timestamp;
    fn to_value(&self) -> Value {
        Value::Timestamp(*self)
    }
    fn from_value(value: Value) -> Option<DateTime<Utc>> {
        match value {
            Value::Timestamp(t) => Some(t),
            _ => None,
        }
    }
}
impl<T: PropertyType> PropertyType for Option<T> {
    // the element type is what gets declared, nullability is implied
    const DATA_TYPE: &'static str = T::DATA_TYPE;
    const KIND: Kind = T::KIND;
    fn to_value(&self) -> Value {
        match self {
            Some(t) => t.to_value(),
            None => Value::Null,
        }
    }
    fn from_value(value: Value) -> Option<Option<T>> {
        match value {
            Value::Null => Some(None),
            other => T::from_value(other).map(Some),
        }
    }
}
impl<T: PropertyType> PropertyType for Vec<T> {
    const DATA_TYPE: &'static str = "Vec";
    const KIND: Kind = Kind::List;
    fn to_value(&self) -> Value {
        Value::List(self.iter().map(PropertyType::to_value).collect())
    }
    fn from_value(value: Value) -> Option<Vec<T>> {
        match value {
            Value::List(values) => values.into_iter().map(T::from_value).collect(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_parse_agree() {
        let date = NaiveDate::from_ymd_opt(2004, 6, 19).unwrap();
        let values = vec![
            Value::Boolean(true),
            Value::Integer(-42),
            Value::Real(1.5),
            Value::Decimal(BigDecimal::from_str("12.340").unwrap()),
            Value::Text("alpha".into()),
            Value::Date(date),
        ];
        for v in values {
            let parsed = Value::parse(v.kind(), &v.to_string()).unwrap();
            assert_eq!(parsed, v);
        }
    }

    #[test]
    fn parse_rejects_incompatible_text() {
        let err = Value::parse(Kind::Integer, "forty-two").unwrap_err();
        assert!(matches!(
            err,
            ShapelessError::TypeMismatch { expected: Kind::Integer, .. }
        ));
        assert_eq!(Value::parse(Kind::Date, "null").unwrap(), Value::Null);
    }

    #[test]
    fn null_is_only_special_outside_text() {
        assert!(Value::parse(Kind::Integer, "null").unwrap().is_null());
        let word = Value::parse(Kind::Text, "null").unwrap();
        assert!(!word.is_null());
        assert_eq!(word, Value::Text("null".into()));
        assert_eq!(Value::parse(Kind::Text, &word.to_string()).unwrap(), word);
    }

    #[test]
    fn optional_fields_carry_null() {
        let absent: Option<String> = None;
        assert_eq!(absent.to_value(), Value::Null);
        assert_eq!(<Option<i64>>::from_value(Value::Null), Some(None));
        assert_eq!(<Option<i64>>::from_value(Value::Integer(3)), Some(Some(3)));
        assert_eq!(<Option<i64>>::from_value(Value::Text("3".into())), None);
        assert_eq!(<Option<i64> as PropertyType>::DATA_TYPE, "i64");
    }

    #[test]
    fn list_display_is_bracketed() {
        let list = vec![1i64, 2, 3].to_value();
        assert_eq!(list.kind(), Kind::List);
        assert_eq!(list.to_string(), "[1, 2, 3]");
    }
}
