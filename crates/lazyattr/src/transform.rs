//! Property transformers.
//!
//! A transformer turns the raw value found for a property (or its default) into
//! the value handed back to the caller. There are exactly two shapes:
//!
//! - [`Selector`]: a named, argument-less conversion such as `to_i` or
//!   `downcase`, applied to the value itself.
//! - A function receiving the value *and* the owning instance, so it can read
//!   sibling properties. Reading a sibling goes through the normal resolver path
//!   and may therefore trigger that instance's reload hook.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::{AttrError, Result};
use crate::model::Model;
use crate::value::AttrValue;

/// Signature of function transformers.
pub type TransformFn = dyn Fn(AttrValue, &mut dyn Model) -> Result<AttrValue> + Send + Sync;

/// Named conversions usable as transformers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selector {
    ToI,
    ToF,
    ToS,
    ToA,
    Downcase,
    Upcase,
    Strip,
    Length,
}

impl Selector {
    pub const ALL: &'static [Selector] = &[
        Selector::ToI,
        Selector::ToF,
        Selector::ToS,
        Selector::ToA,
        Selector::Downcase,
        Selector::Upcase,
        Selector::Strip,
        Selector::Length,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Selector::ToI => "to_i",
            Selector::ToF => "to_f",
            Selector::ToS => "to_s",
            Selector::ToA => "to_a",
            Selector::Downcase => "downcase",
            Selector::Upcase => "upcase",
            Selector::Strip => "strip",
            Selector::Length => "length",
        }
    }

    /// Apply this conversion to `value`.
    ///
    /// Fails with [`AttrError::UndefinedMethod`] when the value's kind has no
    /// such conversion (e.g. `downcase` on an integer), and with
    /// [`AttrError::FloatDomain`] for `to_i` on NaN or infinity.
    pub fn apply(self, value: AttrValue) -> Result<AttrValue> {
        let undefined = |value: &AttrValue| AttrError::UndefinedMethod {
            selector: self,
            kind: value.kind(),
        };

        let out = match (self, value) {
            (Selector::ToS, v) => AttrValue::Str(v.to_string()),

            (Selector::ToI, AttrValue::Nil) => AttrValue::Int(0),
            (Selector::ToI, AttrValue::Int(i)) => AttrValue::Int(i),
            (Selector::ToI, AttrValue::Float(f)) if !f.is_finite() => {
                return Err(AttrError::FloatDomain(f))
            }
            (Selector::ToI, AttrValue::Float(f)) => AttrValue::Int(f.trunc() as i64),
            (Selector::ToI, AttrValue::Str(s)) => AttrValue::Int(leading_int(&s)),

            (Selector::ToF, AttrValue::Nil) => AttrValue::Float(0.0),
            (Selector::ToF, AttrValue::Int(i)) => AttrValue::Float(i as f64),
            (Selector::ToF, AttrValue::Float(f)) => AttrValue::Float(f),
            (Selector::ToF, AttrValue::Str(s)) => AttrValue::Float(leading_float(&s)),

            (Selector::ToA, AttrValue::Nil) => AttrValue::List(Vec::new()),
            (Selector::ToA, AttrValue::List(items)) => AttrValue::List(items),
            (Selector::ToA, AttrValue::Map(map)) => AttrValue::List(pairs(map)),

            (Selector::Downcase, AttrValue::Str(s)) => AttrValue::Str(s.to_lowercase()),
            (Selector::Upcase, AttrValue::Str(s)) => AttrValue::Str(s.to_uppercase()),
            (Selector::Strip, AttrValue::Str(s)) => AttrValue::Str(s.trim().to_string()),

            (Selector::Length, AttrValue::Str(s)) => AttrValue::Int(s.chars().count() as i64),
            (Selector::Length, AttrValue::List(items)) => AttrValue::Int(items.len() as i64),
            (Selector::Length, AttrValue::Map(map)) => AttrValue::Int(map.len() as i64),

            (_, other) => return Err(undefined(&other)),
        };
        Ok(out)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Selector {
    type Err = AttrError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().trim_start_matches(':');
        Selector::ALL
            .iter()
            .copied()
            .find(|sel| sel.name() == wanted)
            .ok_or_else(|| AttrError::Schema(format!("unknown transformer `{s}`")))
    }
}

/// Parses an optional sign and the digits that follow it, ignoring leading
/// whitespace and anything after the digits. No digits yields 0.
fn leading_int(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());

    rest[..digits_end].bytes().fold(0i64, |acc, b| {
        let digit = i64::from(b - b'0');
        if negative {
            acc.saturating_mul(10).saturating_sub(digit)
        } else {
            acc.saturating_mul(10).saturating_add(digit)
        }
    })
}

/// Parses the longest leading decimal literal (`-1.5e3`, `.5`, `7`), or 0.0.
fn leading_float(s: &str) -> f64 {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'-' | b'+')) {
        end = 1;
    }
    end = digits_from(end);
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        if frac_end > end + 1 {
            end = frac_end;
        }
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'-' | b'+')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    s[..end].parse().unwrap_or(0.0)
}

fn pairs(map: IndexMap<String, AttrValue>) -> Vec<AttrValue> {
    map.into_iter()
        .map(|(k, v)| AttrValue::List(vec![AttrValue::Str(k), v]))
        .collect()
}

/// How a property's found value is turned into its resolved value.
#[derive(Clone, Default)]
pub enum Transformer {
    /// Pass the value through unchanged.
    #[default]
    None,
    Selector(Selector),
    Function(Arc<TransformFn>),
}

impl Transformer {
    /// Build a function transformer.
    ///
    /// The function receives the found value and the instance being read, which
    /// lets it consult other properties:
    ///
    /// ```ignore
    /// Transformer::function(|first, owner| {
    ///     let last = owner.read_attribute("last_name")?;
    ///     Ok(format!("{first} {last}").into())
    /// })
    /// ```
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(AttrValue, &mut dyn Model) -> Result<AttrValue> + Send + Sync + 'static,
    {
        Transformer::Function(Arc::new(f))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Transformer::None)
    }

    /// Errors from the selector or function surface as-is.
    pub fn apply(&self, value: AttrValue, owner: &mut dyn Model) -> Result<AttrValue> {
        match self {
            Transformer::None => Ok(value),
            Transformer::Selector(selector) => selector.apply(value),
            Transformer::Function(f) => f(value, owner),
        }
    }
}

impl From<Selector> for Transformer {
    fn from(selector: Selector) -> Self {
        Transformer::Selector(selector)
    }
}

impl fmt::Debug for Transformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transformer::None => f.write_str("None"),
            Transformer::Selector(sel) => f.debug_tuple("Selector").field(sel).finish(),
            Transformer::Function(_) => f.write_str("Function(..)"),
        }
    }
}

impl fmt::Display for Transformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transformer::None => Ok(()),
            Transformer::Selector(sel) => write!(f, "{sel}"),
            Transformer::Function(_) => f.write_str("<fn>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_i_reads_leading_integer() {
        let to_i = |v: AttrValue| Selector::ToI.apply(v).unwrap();
        assert_eq!(to_i("5".into()), AttrValue::Int(5));
        assert_eq!(to_i("  -12abc".into()), AttrValue::Int(-12));
        assert_eq!(to_i("+7".into()), AttrValue::Int(7));
        assert_eq!(to_i("abc".into()), AttrValue::Int(0));
        assert_eq!(to_i("".into()), AttrValue::Int(0));
        assert_eq!(to_i(AttrValue::Float(3.9)), AttrValue::Int(3));
        assert_eq!(to_i(AttrValue::Nil), AttrValue::Int(0));
        assert_eq!(to_i("99999999999999999999".into()), AttrValue::Int(i64::MAX));
    }

    #[test]
    fn to_i_rejects_booleans_and_collections() {
        let err = Selector::ToI.apply(AttrValue::Bool(true)).unwrap_err();
        assert!(matches!(
            err,
            AttrError::UndefinedMethod {
                selector: Selector::ToI,
                kind: "bool"
            }
        ));
        assert!(Selector::ToI.apply(AttrValue::List(vec![])).is_err());
    }

    #[test]
    fn to_i_rejects_non_finite_floats() {
        for f in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = Selector::ToI.apply(AttrValue::Float(f)).unwrap_err();
            assert!(matches!(err, AttrError::FloatDomain(_)));
        }
        // finite but out of range still saturates
        assert_eq!(
            Selector::ToI.apply(AttrValue::Float(1e30)).unwrap(),
            AttrValue::Int(i64::MAX)
        );
    }

    #[test]
    fn to_f_reads_leading_decimal() {
        let to_f = |s: &str| Selector::ToF.apply(s.into()).unwrap();
        assert_eq!(to_f("2.5kg"), AttrValue::Float(2.5));
        assert_eq!(to_f(".5"), AttrValue::Float(0.5));
        assert_eq!(to_f("1e3"), AttrValue::Float(1000.0));
        assert_eq!(to_f("5."), AttrValue::Float(5.0));
        assert_eq!(to_f("-"), AttrValue::Float(0.0));
        assert_eq!(to_f("x"), AttrValue::Float(0.0));
        assert_eq!(
            Selector::ToF.apply(AttrValue::Int(2)).unwrap(),
            AttrValue::Float(2.0)
        );
    }

    #[test]
    fn to_s_accepts_everything() {
        assert_eq!(
            Selector::ToS.apply(AttrValue::Int(5)).unwrap(),
            AttrValue::from("5")
        );
        assert_eq!(
            Selector::ToS.apply(AttrValue::Nil).unwrap(),
            AttrValue::from("")
        );
    }

    #[test]
    fn to_a_converts_maps_to_pairs() {
        let mut map = IndexMap::new();
        map.insert("a".to_string(), AttrValue::Int(1));
        let out = Selector::ToA.apply(AttrValue::Map(map)).unwrap();
        assert_eq!(
            out,
            AttrValue::List(vec![AttrValue::List(vec![
                AttrValue::from("a"),
                AttrValue::Int(1)
            ])])
        );
        assert_eq!(
            Selector::ToA.apply(AttrValue::Nil).unwrap(),
            AttrValue::List(vec![])
        );
    }

    #[test]
    fn string_selectors_only_accept_strings() {
        assert_eq!(
            Selector::Downcase.apply("MiXed".into()).unwrap(),
            AttrValue::from("mixed")
        );
        assert_eq!(
            Selector::Upcase.apply("MiXed".into()).unwrap(),
            AttrValue::from("MIXED")
        );
        assert_eq!(
            Selector::Strip.apply("  pad \n".into()).unwrap(),
            AttrValue::from("pad")
        );
        assert!(Selector::Downcase.apply(AttrValue::Int(1)).is_err());
    }

    #[test]
    fn length_counts_chars_and_items() {
        assert_eq!(
            Selector::Length.apply("héllo".into()).unwrap(),
            AttrValue::Int(5)
        );
        assert_eq!(
            Selector::Length.apply(vec![1, 2, 3].into()).unwrap(),
            AttrValue::Int(3)
        );
        assert!(Selector::Length.apply(AttrValue::Nil).is_err());
    }

    #[test]
    fn selectors_parse_from_names() {
        assert_eq!("to_i".parse::<Selector>().unwrap(), Selector::ToI);
        assert_eq!(":downcase".parse::<Selector>().unwrap(), Selector::Downcase);
        for sel in Selector::ALL {
            assert_eq!(sel.name().parse::<Selector>().unwrap(), *sel);
        }
        assert!(matches!(
            "to_sym".parse::<Selector>(),
            Err(AttrError::Schema(_))
        ));
    }

    #[test]
    fn transformer_display_and_debug() {
        assert_eq!(Transformer::None.to_string(), "");
        assert_eq!(Transformer::from(Selector::ToI).to_string(), "to_i");
        let f = Transformer::function(|v, _| Ok(v));
        assert_eq!(f.to_string(), "<fn>");
        assert_eq!(format!("{f:?}"), "Function(..)");
        assert!(Transformer::default().is_none());
    }
}
