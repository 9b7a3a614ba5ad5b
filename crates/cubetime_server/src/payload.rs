//! Decoding of the `POST /groups` body into a `NewGroup`.
//!
//! Only presence and JSON types are checked here; value rules (non-negative
//! times, non-blank labels) belong to `NewGroup::validate`. Times may be JSON
//! numbers or strings holding a finite number (`"12.5"`).

use cubetime_core::{FieldError, GroupValidationError, NewCube, NewGroup, CUBES_PER_GROUP};
use serde_json::{Map, Value};

pub fn parse_new_group(body: &[u8]) -> Result<NewGroup, GroupValidationError> {
    let root = match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(root)) => root,
        _ => {
            return Err(GroupValidationError::single(FieldError::new(
                "body",
                "The request body must be a JSON object.",
            )))
        }
    };

    let mut errors = Vec::new();
    let group_time = number_field(&root, "group_time", "group_time", &mut errors);

    let mut cubes = Vec::new();
    match root.get("cubes") {
        None | Some(Value::Null) => errors.push(FieldError::required("cubes")),
        Some(Value::Array(items)) => {
            if items.len() != CUBES_PER_GROUP {
                errors.push(FieldError::new(
                    "cubes",
                    format!("The cubes field must contain exactly {CUBES_PER_GROUP} items."),
                ));
            }
            for (index, item) in items.iter().enumerate() {
                if let Some(cube) = parse_cube(index, item, &mut errors) {
                    cubes.push(cube);
                }
            }
        }
        Some(_) => errors.push(FieldError::new("cubes", "The cubes field must be an array.")),
    }

    GroupValidationError::check(errors)?;
    Ok(NewGroup::new(group_time.unwrap_or_default(), cubes))
}

fn parse_cube(index: usize, item: &Value, errors: &mut Vec<FieldError>) -> Option<NewCube> {
    let Value::Object(fields) = item else {
        errors.push(FieldError::new(
            format!("cubes.{index}"),
            format!("The cubes.{index} field must be an object."),
        ));
        return None;
    };

    let prefix = format!("cubes.{index}.");
    let color = string_field(fields, "color", &prefix, errors);
    let face = string_field(fields, "face", &prefix, errors);
    let individual_time = number_field(
        fields,
        "individual_time",
        &format!("{prefix}individual_time"),
        errors,
    );

    Some(NewCube::new(color?, face?, individual_time?))
}

fn string_field(
    fields: &Map<String, Value>,
    key: &str,
    prefix: &str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    let path = format!("{prefix}{key}");
    match fields.get(key) {
        None | Some(Value::Null) => {
            errors.push(FieldError::required(path));
            None
        }
        Some(Value::String(value)) => Some(value.clone()),
        Some(_) => {
            let message = format!("The {path} field must be a string.");
            errors.push(FieldError::new(path, message));
            None
        }
    }
}

fn number_field(
    fields: &Map<String, Value>,
    key: &str,
    path: &str,
    errors: &mut Vec<FieldError>,
) -> Option<f64> {
    let value = match fields.get(key) {
        None | Some(Value::Null) => {
            errors.push(FieldError::required(path));
            return None;
        }
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => parse_numeric(text),
        Some(_) => None,
    };
    if value.is_none() {
        errors.push(FieldError::new(
            path,
            format!("The {path} field must be a number."),
        ));
    }
    value
}

fn parse_numeric(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}
