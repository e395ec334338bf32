use chrono::DateTime;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::SchemaValidationError;

/// Untyped document as exchanged with the store collaborator.
pub type Mapping = serde_json::Map<String, Value>;

/// Checks a nested mapping against some doctype's field table.
pub type TableCheck = fn(&Mapping, &str) -> Result<(), SchemaValidationError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    /// Absent or `null` converts to the field's empty value (`None` or `[]`).
    Optional,
}

/// Expected JSON shape of a declared field.
#[derive(Clone, Copy)]
pub enum Shape {
    String,
    /// String that parses as a URI with a scheme.
    AbsoluteUri,
    /// RFC 3339 timestamp carrying an explicit offset.
    Timestamp,
    /// Sequence of `{string: string}` mappings.
    StringPairs,
    Mapping(TableCheck),
    Sequence(TableCheck),
    Any,
}

impl Shape {
    fn describe(&self) -> &'static str {
        match self {
            Shape::String => "a string",
            Shape::AbsoluteUri => "an absolute URI",
            Shape::Timestamp => "an RFC 3339 timestamp with offset",
            Shape::StringPairs => "a sequence of string-to-string mappings",
            Shape::Mapping(_) => "a mapping",
            Shape::Sequence(_) => "a sequence of mappings",
            Shape::Any => "any value",
        }
    }
}

/// One row of a doctype's declared field table.
#[derive(Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub presence: Presence,
    pub shape: Shape,
}

impl Field {
    pub const fn required(name: &'static str, shape: Shape) -> Self {
        Self {
            name,
            presence: Presence::Required,
            shape,
        }
    }

    pub const fn optional(name: &'static str, shape: Shape) -> Self {
        Self {
            name,
            presence: Presence::Optional,
            shape,
        }
    }
}

/// A document entity with a declared field table.
///
/// The table drives the presence and shape checks of [`from_mapping`]; serde
/// performs the conversion once the mapping is known to be well formed.
pub trait Doctype: Serialize + DeserializeOwned {
    const ENTITY: &'static str;
    const FIELDS: &'static [Field];

    /// Cross-field invariants checked after conversion.
    fn validate(&self) -> Result<(), SchemaValidationError> {
        Ok(())
    }

    fn from_mapping(source: &Mapping) -> Result<Self, SchemaValidationError> {
        from_mapping(source)
    }

    fn to_mapping(&self) -> Result<Mapping, SchemaValidationError> {
        to_mapping(self)
    }
}

/// Hydrate `T` from an untyped mapping.
pub fn from_mapping<T: Doctype>(source: &Mapping) -> Result<T, SchemaValidationError> {
    check_fields::<T>(source, "")?;
    let entity: T = serde_json::from_value(Value::Object(source.clone())).map_err(|err| {
        SchemaValidationError::Conversion {
            entity: T::ENTITY,
            message: err.to_string(),
        }
    })?;
    entity.validate()?;
    Ok(entity)
}

/// Flatten `entity` into an untyped mapping.
pub fn to_mapping<T: Doctype>(entity: &T) -> Result<Mapping, SchemaValidationError> {
    let conversion = |message: String| SchemaValidationError::Conversion {
        entity: T::ENTITY,
        message,
    };
    match serde_json::to_value(entity).map_err(|err| conversion(err.to_string()))? {
        Value::Object(map) => Ok(map),
        other => Err(conversion(format!("expected a mapping, got `{other}`"))),
    }
}

/// Presence and shape check of `source` against `T::FIELDS`, recursing into
/// nested doctypes. `prefix` is the dotted path of `source` itself.
pub fn check_fields<T: Doctype>(source: &Mapping, prefix: &str) -> Result<(), SchemaValidationError> {
    for field in T::FIELDS {
        let path = if prefix.is_empty() {
            field.name.to_string()
        } else {
            format!("{prefix}.{}", field.name)
        };
        match source.get(field.name) {
            None | Some(Value::Null) => {
                if field.presence == Presence::Required {
                    return Err(SchemaValidationError::MissingField {
                        entity: T::ENTITY,
                        field: path,
                    });
                }
            }
            Some(value) => {
                if !shape_matches(field.shape, value, &path)? {
                    return Err(SchemaValidationError::WrongShape {
                        entity: T::ENTITY,
                        field: path,
                        expected: field.shape.describe(),
                    });
                }
            }
        }
    }
    Ok(())
}

fn shape_matches(shape: Shape, value: &Value, path: &str) -> Result<bool, SchemaValidationError> {
    let matches = match shape {
        Shape::String => value.is_string(),
        Shape::AbsoluteUri => value
            .as_str()
            .is_some_and(|raw| url::Url::parse(raw).is_ok()),
        Shape::Timestamp => value
            .as_str()
            .is_some_and(|raw| DateTime::parse_from_rfc3339(raw).is_ok()),
        Shape::StringPairs => value.as_array().is_some_and(|items| {
            items.iter().all(|item| {
                item.as_object()
                    .is_some_and(|pairs| pairs.values().all(Value::is_string))
            })
        }),
        Shape::Mapping(check) => match value.as_object() {
            Some(nested) => {
                check(nested, path)?;
                true
            }
            None => false,
        },
        Shape::Sequence(check) => match value.as_array() {
            Some(items) => {
                for (index, item) in items.iter().enumerate() {
                    let Some(nested) = item.as_object() else {
                        return Ok(false);
                    };
                    check(nested, &format!("{path}[{index}]"))?;
                }
                true
            }
            None => false,
        },
        Shape::Any => true,
    };
    Ok(matches)
}
