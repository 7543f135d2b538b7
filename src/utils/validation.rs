use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::errors::AppError;

pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload
        .validate()
        .map_err(|err| AppError::Validation(format!("Validation failed: {}", describe(&err))))
}

/// Flattens nested validation errors into `path: [code: message]` entries.
pub fn describe(errors: &ValidationErrors) -> String {
    let mut details = Vec::new();
    collect(errors, "", &mut details);
    details.sort();
    details.join("; ")
}

fn collect(errors: &ValidationErrors, prefix: &str, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };
        match kind {
            ValidationErrorsKind::Field(errs) => {
                let errors = errs
                    .iter()
                    .map(|e| format!("{}: {}", e.code, e.message.as_deref().unwrap_or("")))
                    .collect::<Vec<_>>()
                    .join(", ");
                out.push(format!("{}: [{}]", path, errors));
            }
            ValidationErrorsKind::Struct(inner) => collect(inner, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect(inner, &format!("{}[{}]", path, index), out);
                }
            }
        }
    }
}
