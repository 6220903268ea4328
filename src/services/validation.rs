use std::fmt;

pub const MSG_REQUIRED: &str = "This field is required.";
pub const MSG_INVALID_EMAIL: &str = "Enter a valid email address.";

/// Field name used for errors that belong to the form as a whole.
pub const NON_FIELD: &str = "__all__";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Ordered list of validation errors collected while checking one form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub errors: Vec<FieldError>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    pub fn messages_for(&self, field: &str) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message.as_str())
            .collect()
    }

    pub fn required(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.add(field, MSG_REQUIRED);
        }
    }

    pub fn max_chars(&mut self, field: &str, value: &str, max: usize) {
        let len = value.chars().count();
        if len > max {
            self.add(
                field,
                format!(
                    "Ensure this value has at most {} characters (it has {}).",
                    max, len
                ),
            );
        }
    }

    /// Empty values pass; pair with `required` when the field is mandatory.
    pub fn email(&mut self, field: &str, value: &str) {
        let value = value.trim();
        if !value.is_empty() && !is_valid_email(value) {
            self.add(field, MSG_INVALID_EMAIL);
        }
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

pub fn is_valid_email(value: &str) -> bool {
    if value.len() > 254 || value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.rsplit_once('@') else {
        return false;
    };
    if local.is_empty() || local.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|l| {
            !l.is_empty()
                && !l.starts_with('-')
                && !l.ends_with('-')
                && l.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}

/// Parses submitted choice ids and checks each one against the catalog.
pub fn parse_choices(
    errors: &mut FieldErrors,
    field: &str,
    raw: &[String],
    available: &[i64],
) -> Vec<i64> {
    let mut ids = Vec::with_capacity(raw.len());
    for value in raw {
        match value.trim().parse::<i64>() {
            Ok(id) if available.contains(&id) => {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
            _ => errors.add(
                field,
                format!(
                    "Select a valid choice. {} is not one of the available choices.",
                    value
                ),
            ),
        }
    }
    ids
}
