use std::fmt;

use crate::schema::columns;

/// Closed numeric interval `lo <= v <= hi`.
///
/// NaN is never contained, and a range with `lo > hi` contains nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub lo: f64,
    pub hi: f64,
}

impl Range {
    pub fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        self.lo <= value && value <= self.hi
    }

    /// True when no value can match
    pub fn is_empty(&self) -> bool {
        self.lo.is_nan() || self.hi.is_nan() || self.lo > self.hi
    }
}

/// Float values a range predicate applies to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueRef {
    /// A float column, or a list-of-float column
    Column(String),
    /// A float field inside a list-of-struct column
    StructField { column: String, field: String },
}

impl ValueRef {
    pub fn column(&self) -> &str {
        match self {
            ValueRef::Column(column) | ValueRef::StructField { column, .. } => column,
        }
    }
}

impl fmt::Display for ValueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueRef::Column(column) => write!(f, "{column}"),
            ValueRef::StructField { column, field } => write!(f, "{column}[].{field}"),
        }
    }
}

/// Literal of an equality predicate
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scalar {
    Int(i64),
    Str(String),
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Str(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Str(value)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(value) => write!(f, "{value}"),
            Scalar::Str(value) => write!(f, "'{value}'"),
        }
    }
}

/// Scan-level filter.
///
/// A predicate is answered per scan: `AnyInRange` holds when at least one
/// referenced value lies in the range, `Equals` compares a scalar column and
/// `And` requires every conjunct. An empty `And` matches every scan.
///
/// ```
/// use mzparquet::query::Predicate;
///
/// let predicate = Predicate::mz_between(267.0, 267.1).and(Predicate::ms_level(2));
/// assert_eq!(predicate.to_string(), "mz in [267, 267.1] AND ms_level = 2");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    AnyInRange { target: ValueRef, range: Range },
    Equals { column: String, value: Scalar },
    And(Vec<Predicate>),
}

impl Predicate {
    /// Any peak m/z in `[lo, hi]`
    pub fn mz_between(lo: f64, hi: f64) -> Self {
        Self::any_between(columns::MZ, lo, hi)
    }

    /// Any precursor selected-ion m/z in `[lo, hi]`
    pub fn precursor_mz_between(lo: f64, hi: f64) -> Self {
        Self::struct_field_between(columns::PRECURSORS, columns::SELECTED_ION_MZ, lo, hi)
    }

    /// MS level equal to `level`
    pub fn ms_level(level: i64) -> Self {
        Self::equals(columns::MS_LEVEL, level)
    }

    /// Scan id equal to `id`
    pub fn scan_id(id: impl Into<String>) -> Self {
        Self::equals(columns::SCAN_ID, Scalar::Str(id.into()))
    }

    /// Any value of a float or list-of-float column in `[lo, hi]`
    pub fn any_between(column: impl Into<String>, lo: f64, hi: f64) -> Self {
        Predicate::AnyInRange {
            target: ValueRef::Column(column.into()),
            range: Range::new(lo, hi),
        }
    }

    /// Any `field` of a list-of-struct column in `[lo, hi]`
    pub fn struct_field_between(
        column: impl Into<String>,
        field: impl Into<String>,
        lo: f64,
        hi: f64,
    ) -> Self {
        Predicate::AnyInRange {
            target: ValueRef::StructField {
                column: column.into(),
                field: field.into(),
            },
            range: Range::new(lo, hi),
        }
    }

    /// Scalar column equal to `value`
    pub fn equals(column: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Predicate::Equals {
            column: column.into(),
            value: value.into(),
        }
    }

    /// Conjunction, flattening nested `And`s
    pub fn and(self, other: Predicate) -> Self {
        let mut conjuncts = Vec::new();
        for predicate in [self, other] {
            match predicate {
                Predicate::And(inner) => conjuncts.extend(inner),
                leaf => conjuncts.push(leaf),
            }
        }
        Predicate::And(conjuncts)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::AnyInRange { target, range } => {
                write!(f, "{target} in [{}, {}]", range.lo, range.hi)
            }
            Predicate::Equals { column, value } => write!(f, "{column} = {value}"),
            Predicate::And(inner) if inner.is_empty() => write!(f, "TRUE"),
            Predicate::And(inner) => {
                for (i, predicate) in inner.iter().enumerate() {
                    if i > 0 {
                        write!(f, " AND ")?;
                    }
                    write!(f, "{predicate}")?;
                }
                Ok(())
            }
        }
    }
}
