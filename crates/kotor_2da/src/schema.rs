//! Caller supplied column types.
//!
//! A 2DA file only stores text. The type of each column is a contract of the code reading it, and
//! the two games disagree on it for several tables, so schemas live with the caller and are passed
//! to [`TwoDA::typed_row`](crate::TwoDA::typed_row) per lookup.

use derive_more::derive::{Deref, Display, Index, IntoIterator};
use indexmap::IndexMap;
use kotor_common::{ResRef, StrRef};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Type a column is read as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ColumnType {
    /// Free text
    #[display("string")]
    String,
    /// Signed 32 bit integer, decimal or `0x` hexadecimal
    #[display("integer")]
    Integer,
    /// 32 bit float
    #[display("float")]
    Float,
    /// Resource reference
    #[display("resref")]
    ResRef,
    /// Talk table reference
    #[display("strref")]
    StrRef,
    /// Integer flag, non-zero is true
    #[display("boolean")]
    Boolean,
}

impl ColumnType {
    /// Parse `text` as this type
    pub fn parse(self, text: &str) -> Option<TypedCell> {
        Some(match self {
            ColumnType::String => TypedCell::String(text.to_owned()),
            ColumnType::Integer => TypedCell::Integer(parse_int(text)?),
            ColumnType::Float => TypedCell::Float(parse_float(text)?),
            ColumnType::ResRef => TypedCell::ResRef(parse_resref(text)?),
            ColumnType::StrRef => TypedCell::StrRef(parse_strref(text)?),
            ColumnType::Boolean => TypedCell::Boolean(parse_bool(text)?),
        })
    }
}

/// A cell converted to its column type
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TypedCell {
    String(String),
    Integer(i32),
    Float(f32),
    ResRef(ResRef),
    StrRef(StrRef),
    Boolean(bool),
}

/// Column name to type mapping, built per call site
///
/// ```
/// use kotor_2da::{ColumnSchema, ColumnType};
///
/// let schema = ColumnSchema::new()
///     .column("label", ColumnType::String)
///     .column("modela", ColumnType::ResRef)
///     .column("walkdist", ColumnType::Float);
///
/// assert_eq!(schema.get("modela"), Some(ColumnType::ResRef));
/// assert_eq!(schema.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref)]
pub struct ColumnSchema(IndexMap<String, ColumnType>);

impl ColumnSchema {
    /// An empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a column
    pub fn column(mut self, name: impl Into<String>, column_type: ColumnType) -> Self {
        self.0.insert(name.into(), column_type);
        self
    }

    /// Type of a column, if the schema names it
    pub fn get(&self, name: &str) -> Option<ColumnType> {
        self.0.get(name).copied()
    }
}

/// Result of reading one row through a [`ColumnSchema`]
///
/// Each entry is `Ok(None)` for an empty cell, `Ok(Some(_))` for a converted value and
/// `Err(_)` when the text does not parse, leaving the fallback to the caller.
#[derive(Debug, Clone, Default, PartialEq, Deref, Index, IntoIterator)]
#[into_iterator(owned, ref)]
pub struct TypedRow(IndexMap<String, Result<Option<TypedCell>, ParseError>>);

impl TypedRow {
    /// The converted value of a column, treating parse failures and empty cells alike
    pub fn value(&self, column: &str) -> Option<&TypedCell> {
        self.0.get(column)?.as_ref().ok()?.as_ref()
    }

    /// Integer value of a column, or `default` when empty, missing or unparsable
    pub fn int_or(&self, column: &str, default: i32) -> i32 {
        match self.value(column) {
            Some(TypedCell::Integer(value)) => *value,
            _ => default,
        }
    }

    /// Boolean value of a column, or `default` when empty, missing or unparsable
    pub fn bool_or(&self, column: &str, default: bool) -> bool {
        match self.value(column) {
            Some(TypedCell::Boolean(value)) => *value,
            _ => default,
        }
    }
}

impl FromIterator<(String, Result<Option<TypedCell>, ParseError>)> for TypedRow {
    fn from_iter<T: IntoIterator<Item = (String, Result<Option<TypedCell>, ParseError>)>>(
        iter: T,
    ) -> Self {
        Self(iter.into_iter().collect())
    }
}

pub(crate) fn parse_int(text: &str) -> Option<i32> {
    let text = text.trim();
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    // one sign at most, which the integer parsers would otherwise accept again
    let value = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) if hex.bytes().all(|b| b.is_ascii_hexdigit()) => {
            i64::from(u32::from_str_radix(hex, 16).ok()? as i32)
        }
        None if digits.bytes().all(|b| b.is_ascii_digit()) => digits.parse::<i64>().ok()?,
        _ => return None,
    };

    let value = if negative { -value } else { value };
    i32::try_from(value).ok()
}

pub(crate) fn parse_float(text: &str) -> Option<f32> {
    let text = text.trim();
    text.strip_suffix(['f', 'F'])
        .unwrap_or(text)
        .parse::<f32>()
        .ok()
}

pub(crate) fn parse_resref(text: &str) -> Option<ResRef> {
    ResRef::new(text.trim()).ok()
}

pub(crate) fn parse_strref(text: &str) -> Option<StrRef> {
    let text = text.trim();
    if let Ok(value) = text.parse::<u32>() {
        return Some(StrRef::new(value));
    }
    parse_int(text).map(StrRef::from)
}

pub(crate) fn parse_bool(text: &str) -> Option<bool> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("true") {
        return Some(true);
    }
    if text.eq_ignore_ascii_case("false") {
        return Some(false);
    }
    parse_int(text).map(|value| value != 0)
}

#[cfg(test)]
mod test {
    use kotor_common::StrRef;
    use pretty_assertions::assert_eq;

    use crate::error::Result;
    use crate::schema::{parse_bool, parse_float, parse_int, parse_strref, ColumnSchema, ColumnType, TypedCell};
    use crate::types::TwoDA;

    #[test]
    fn integers() {
        assert_eq!(parse_int("12"), Some(12));
        assert_eq!(parse_int(" -3 "), Some(-3));
        assert_eq!(parse_int("0x1F"), Some(31));
        assert_eq!(parse_int("0xFFFFFFFF"), Some(-1));
        assert_eq!(parse_int("3000000000"), None);
        assert_eq!(parse_int("1.5"), None);
        assert_eq!(parse_int(""), None);
    }

    #[test]
    fn integers_take_one_sign() {
        assert_eq!(parse_int("+7"), Some(7));
        assert_eq!(parse_int("--1"), None);
        assert_eq!(parse_int("-+1"), None);
        assert_eq!(parse_int("+-1"), None);
        assert_eq!(parse_int("0x+1"), None);
        assert_eq!(parse_strref("--1"), None);
    }

    #[test]
    fn other_scalars() {
        assert_eq!(parse_float("0.25"), Some(0.25));
        assert_eq!(parse_float("2f"), Some(2.0));
        assert_eq!(parse_float("abc"), None);
        assert_eq!(parse_strref("4294967295"), Some(StrRef::INVALID));
        assert_eq!(parse_strref("-1"), Some(StrRef::INVALID));
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("2"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("yes"), None);
    }

    #[test]
    fn typed_row_with_schema() -> Result<()> {
        let mut table = TwoDA::new(["label", "modela", "walkdist", "hitdist"])?;
        let row = table.add_row(None);
        table.set_cell(row, "label", "Bastila")?;
        table.set_cell(row, "modela", "p_bastbb")?;
        table.set_cell(row, "walkdist", "slow")?;

        let schema = ColumnSchema::new()
            .column("label", ColumnType::String)
            .column("modela", ColumnType::ResRef)
            .column("walkdist", ColumnType::Float)
            .column("hitdist", ColumnType::Float)
            .column("k2_only", ColumnType::Integer);

        let typed = table.typed_row(row, &schema)?;

        assert_eq!(
            typed.value("label"),
            Some(&TypedCell::String("Bastila".into()))
        );
        assert!(matches!(typed.value("modela"), Some(TypedCell::ResRef(r)) if r.as_str() == "p_bastbb"));
        assert!(typed["walkdist"].is_err());
        assert_eq!(typed["hitdist"], Ok(None));
        assert_eq!(typed["k2_only"], Ok(None));
        assert_eq!(typed.int_or("k2_only", 7), 7);

        assert!(table.typed_row(5, &schema).is_err());

        Ok(())
    }
}
