use arrow::datatypes::{DataType, Schema};

use super::builders::create_schema;
use super::layout::Layout;

/// Validates that a schema is compatible with the given container layout.
///
/// Every column of the layout must be present with the exact type. Extra
/// columns are tolerated.
pub fn validate_schema(schema: &Schema, layout: Layout) -> Result<(), SchemaValidationError> {
    let expected = create_schema(layout);

    for field in expected.fields() {
        match schema.field_with_name(field.name()) {
            Ok(found) => {
                if !types_compatible(found.data_type(), field.data_type()) {
                    return Err(SchemaValidationError::TypeMismatch {
                        column: field.name().to_string(),
                        expected: format!("{:?}", field.data_type()),
                        found: format!("{:?}", found.data_type()),
                    });
                }
            }
            Err(_) => {
                return Err(SchemaValidationError::MissingColumn(field.name().to_string()));
            }
        }
    }

    Ok(())
}

/// Structural type comparison that ignores field nullability and metadata,
/// which other Parquet writers do not always preserve.
fn types_compatible(found: &DataType, expected: &DataType) -> bool {
    match (found, expected) {
        (DataType::List(a), DataType::List(b)) => types_compatible(a.data_type(), b.data_type()),
        (DataType::Struct(a), DataType::Struct(b)) => b.iter().all(|expected_field| {
            a.iter().any(|found_field| {
                found_field.name() == expected_field.name()
                    && types_compatible(found_field.data_type(), expected_field.data_type())
            })
        }),
        _ => found == expected,
    }
}

/// Errors that can occur during schema validation
#[derive(Debug, thiserror::Error)]
pub enum SchemaValidationError {
    /// A required column is missing from the schema
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// A column has an incorrect data type
    #[error("Type mismatch for column '{column}': expected {expected}, found {found}")]
    TypeMismatch {
        /// Name of the column with the type mismatch
        column: String,
        /// Expected data type
        expected: String,
        /// Actual data type found
        found: String,
    },
}
