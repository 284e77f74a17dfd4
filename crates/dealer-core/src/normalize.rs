//! Conversion boundary between raw form text and canonical decimals.
//!
//! Every numeric slot of a deal is a [`NumericField`]: the form may hold
//! nothing, a half-typed token such as `"3,"`, or a canonical value. Only the
//! last one carries a number; the other two compute as zero but stay
//! distinguishable for "required field" checks.

use rust_decimal::Decimal;
use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A numeric form field after normalisation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NumericField {
    /// Nothing entered.
    #[default]
    Empty,
    /// A partially typed token, kept verbatim for continued editing.
    Incomplete(String),
    /// A canonical, non-negative value.
    Value(Decimal),
}

impl NumericField {
    /// Normalise a raw token.
    ///
    /// Returns `None` when the token is rejected; callers keep their previous
    /// value in that case (see [`NumericField::edit`]).
    pub fn parse(raw: &str) -> Option<NumericField> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Some(NumericField::Empty);
        }

        let compact: String = trimmed.chars().filter(|c| !is_grouping_mark(*c)).collect();
        if !compact
            .chars()
            .all(|c| c.is_ascii_digit() || is_separator(c))
        {
            return None;
        }

        if !compact.chars().any(|c| c.is_ascii_digit()) {
            // A lone separator is the start of "0,5" being typed.
            return if compact.chars().count() == 1 {
                Some(NumericField::Incomplete(raw.to_string()))
            } else {
                None
            };
        }

        let decimal_separator = decimal_separator(&compact)?;

        let mut canonical = String::with_capacity(compact.len() + 1);
        for c in compact.chars() {
            if Some(c) == decimal_separator {
                canonical.push('.');
            } else if !is_separator(c) {
                canonical.push(c);
            }
        }

        if canonical.ends_with('.') {
            return Some(NumericField::Incomplete(raw.to_string()));
        }
        if canonical.starts_with('.') {
            canonical.insert(0, '0');
        }

        Decimal::from_str(&canonical).ok().map(NumericField::Value)
    }

    /// Apply an edit to the field: the new token wins unless it is rejected.
    pub fn edit(&self, raw: &str) -> NumericField {
        NumericField::parse(raw).unwrap_or_else(|| self.clone())
    }

    /// The value used by formulas. Empty and incomplete fields compute as 0.
    pub fn value(&self) -> Decimal {
        match self {
            NumericField::Value(v) => {
                debug_assert!(
                    *v >= Decimal::ZERO,
                    "negative value bypassed normalisation: {v}"
                );
                *v
            }
            NumericField::Empty | NumericField::Incomplete(_) => Decimal::ZERO,
        }
    }

    /// Whether the field holds a canonical value (an explicit 0 counts).
    pub fn is_present(&self) -> bool {
        matches!(self, NumericField::Value(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, NumericField::Empty)
    }
}

impl From<Decimal> for NumericField {
    fn from(value: Decimal) -> Self {
        NumericField::Value(value)
    }
}

fn is_separator(c: char) -> bool {
    c == '.' || c == ','
}

fn is_grouping_mark(c: char) -> bool {
    c.is_whitespace() || c == '\'' || c == '_'
}

/// Work out which separator, if any, marks the decimal point.
///
/// `None` means the token is ambiguous and must be rejected; `Some(None)`
/// means every separator present is digit grouping.
fn decimal_separator(compact: &str) -> Option<Option<char>> {
    let dots = compact.matches('.').count();
    let commas = compact.matches(',').count();

    let separator = match (dots, commas) {
        (0, 0) => None,
        (1, 0) => Some('.'),
        (0, 1) => Some(','),
        (_, 0) | (0, _) => None,
        _ => {
            let last = compact.chars().rev().find(|c| is_separator(*c))?;
            let occurrences = if last == '.' { dots } else { commas };
            if occurrences != 1 {
                return None;
            }
            Some(last)
        }
    };

    // Grouping marks never end a number ("1.000." is not a value in progress).
    if separator.is_none() && compact.ends_with(is_separator) {
        return None;
    }

    Some(separator)
}

impl Serialize for NumericField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            NumericField::Empty => serializer.serialize_none(),
            NumericField::Incomplete(raw) => serializer.serialize_str(raw),
            NumericField::Value(v) => Serialize::serialize(v, serializer),
        }
    }
}

struct NumericFieldVisitor;

impl<'de> Visitor<'de> for NumericFieldVisitor {
    type Value = NumericField;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("null, a non-negative number, or a numeric string")
    }

    fn visit_none<E: de::Error>(self) -> Result<NumericField, E> {
        Ok(NumericField::Empty)
    }

    fn visit_unit<E: de::Error>(self) -> Result<NumericField, E> {
        Ok(NumericField::Empty)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<NumericField, D::Error> {
        deserializer.deserialize_any(NumericFieldVisitor)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<NumericField, E> {
        Ok(NumericField::Value(Decimal::from(v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<NumericField, E> {
        if v < 0 {
            return Err(E::invalid_value(Unexpected::Signed(v), &self));
        }
        Ok(NumericField::Value(Decimal::from(v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<NumericField, E> {
        if !v.is_finite() || v < 0.0 {
            return Err(E::invalid_value(Unexpected::Float(v), &self));
        }
        Decimal::try_from(v)
            .map(NumericField::Value)
            .map_err(|_| E::invalid_value(Unexpected::Float(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<NumericField, E> {
        NumericField::parse(v).ok_or_else(|| E::invalid_value(Unexpected::Str(v), &self))
    }
}

impl<'de> Deserialize<'de> for NumericField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NumericFieldVisitor)
    }
}

/// Text fields are stored as `null` when left blank; read that back as "".
pub(crate) fn text_or_empty<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<String, D::Error> {
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}
