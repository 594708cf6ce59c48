use arrow::datatypes::{DataType, Schema};
use parquet::arrow::ProjectionMask;
use parquet::schema::types::SchemaDescriptor;

use crate::reader::ReaderError;
use crate::schema::{columns, Layout};

use super::predicate::{Predicate, Range, Scalar, ValueRef};

/// Where the values of a range conjunct live
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValueShape {
    /// One float per row
    Flat,
    /// `List<Float>`
    List,
    /// A float field of `List<Struct>`
    StructList,
}

/// A leaf predicate checked against the container schema
#[derive(Debug, Clone)]
pub(crate) enum Conjunct {
    AnyInRange {
        column: String,
        field: Option<String>,
        shape: ValueShape,
        range: Range,
    },
    EqualsInt {
        column: String,
        value: i64,
    },
    EqualsStr {
        column: String,
        value: String,
    },
}

impl Conjunct {
    pub(crate) fn column(&self) -> &str {
        match self {
            Conjunct::AnyInRange { column, .. }
            | Conjunct::EqualsInt { column, .. }
            | Conjunct::EqualsStr { column, .. } => column,
        }
    }

    fn field(&self) -> Option<&str> {
        match self {
            Conjunct::AnyInRange { field, .. } => field.as_deref(),
            _ => None,
        }
    }
}

/// A predicate whose every column and field has been resolved against a
/// container schema
#[derive(Debug, Clone)]
pub struct BoundPredicate {
    pub(crate) conjuncts: Vec<Conjunct>,
    pub(crate) layout: Layout,
}

fn is_float(data_type: &DataType) -> bool {
    matches!(data_type, DataType::Float32 | DataType::Float64)
}

fn is_int(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64
    )
}

fn bind_range(schema: &Schema, target: &ValueRef, range: Range) -> Result<Conjunct, ReaderError> {
    let column = target.column();
    let data_type = schema
        .field_with_name(column)
        .map_err(|_| ReaderError::mismatch(column, None, "column is missing"))?
        .data_type();

    match target {
        ValueRef::Column(_) => {
            let shape = match data_type {
                t if is_float(t) => ValueShape::Flat,
                DataType::List(item) if is_float(item.data_type()) => ValueShape::List,
                other => {
                    return Err(ReaderError::mismatch(
                        column,
                        None,
                        format!("range needs a float or list-of-float column, found {other:?}"),
                    ))
                }
            };
            Ok(Conjunct::AnyInRange {
                column: column.to_string(),
                field: None,
                shape,
                range,
            })
        }
        ValueRef::StructField { field, .. } => {
            let fields = match data_type {
                DataType::List(item) => match item.data_type() {
                    DataType::Struct(fields) => fields,
                    _ => {
                        return Err(ReaderError::mismatch(
                            column,
                            Some(field.as_str()),
                            "column is not a list of structs",
                        ))
                    }
                },
                _ => {
                    return Err(ReaderError::mismatch(
                        column,
                        Some(field.as_str()),
                        "column is not a list of structs",
                    ))
                }
            };
            let (_, child) = fields.find(field).ok_or_else(|| {
                ReaderError::mismatch(column, Some(field.as_str()), "field is missing")
            })?;
            if !is_float(child.data_type()) {
                return Err(ReaderError::mismatch(
                    column,
                    Some(field.as_str()),
                    format!("range needs a float field, found {:?}", child.data_type()),
                ));
            }
            Ok(Conjunct::AnyInRange {
                column: column.to_string(),
                field: Some(field.clone()),
                shape: ValueShape::StructList,
                range,
            })
        }
    }
}

fn bind_equals(schema: &Schema, column: &str, value: &Scalar) -> Result<Conjunct, ReaderError> {
    let data_type = schema
        .field_with_name(column)
        .map_err(|_| ReaderError::mismatch(column, None, "column is missing"))?
        .data_type();

    match (value, data_type) {
        (Scalar::Int(value), t) if is_int(t) => Ok(Conjunct::EqualsInt {
            column: column.to_string(),
            value: *value,
        }),
        (Scalar::Str(value), DataType::Utf8) => Ok(Conjunct::EqualsStr {
            column: column.to_string(),
            value: value.clone(),
        }),
        (value, other) => Err(ReaderError::mismatch(
            column,
            None,
            format!("cannot compare {other:?} with {value}"),
        )),
    }
}

fn bind_into(
    predicate: &Predicate,
    schema: &Schema,
    out: &mut Vec<Conjunct>,
) -> Result<(), ReaderError> {
    match predicate {
        Predicate::AnyInRange { target, range } => out.push(bind_range(schema, target, *range)?),
        Predicate::Equals { column, value } => out.push(bind_equals(schema, column, value)?),
        Predicate::And(inner) => {
            for predicate in inner {
                bind_into(predicate, schema, out)?;
            }
        }
    }
    Ok(())
}

impl Predicate {
    /// Resolve every referenced column and field against `schema`.
    ///
    /// Unknown names and unusable types fail with
    /// [`ReaderError::SchemaMismatch`] rather than matching nothing.
    pub fn bind(&self, schema: &Schema, layout: Layout) -> Result<BoundPredicate, ReaderError> {
        let mut conjuncts = Vec::new();
        bind_into(self, schema, &mut conjuncts)?;
        Ok(BoundPredicate { conjuncts, layout })
    }
}

impl BoundPredicate {
    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn is_trivial(&self) -> bool {
        self.conjuncts.is_empty()
    }

    /// Leaf columns read by the predicate, plus `scan_id` when `with_scan_id`
    pub(crate) fn leaf_mask(
        &self,
        parquet_schema: &SchemaDescriptor,
        with_scan_id: bool,
    ) -> ProjectionMask {
        let wanted = |parts: &[String]| {
            let Some(root) = parts.first() else {
                return false;
            };
            if with_scan_id && root == columns::SCAN_ID {
                return true;
            }
            self.conjuncts.iter().any(|conjunct| {
                root == conjunct.column()
                    && match conjunct.field() {
                        Some(field) => {
                            parts.len() > 1 && parts.last().map(String::as_str) == Some(field)
                        }
                        None => true,
                    }
            })
        };

        let leaves: Vec<usize> = parquet_schema
            .columns()
            .iter()
            .enumerate()
            .filter(|(_, column)| wanted(column.path().parts()))
            .map(|(i, _)| i)
            .collect();
        ProjectionMask::leaves(parquet_schema, leaves)
    }
}
