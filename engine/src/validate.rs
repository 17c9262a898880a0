use itertools::Itertools;
use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;
use serde_json::{Map, Value};

use crate::error::QuizError;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9]+([._-][A-Za-z0-9]+)*@[A-Za-z0-9-]+(\.[A-Za-z]{2,})+$")
        .expect("email pattern compiles")
});

static ARGON_CONFIG: Lazy<argon2::Config<'static>> = Lazy::new(|| argon2::Config {
    variant: argon2::Variant::Argon2id,
    ..argon2::Config::default()
});

/// What a declared payload field must look like.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Str,
    Int,
    Bool,
    /// A string that must fully match the email shape.
    Email,
    /// An integer restricted to a fixed set of values.
    IntEnum(&'static [i64]),
}

/// One entry of a per-endpoint constraint table. Tables are declared as
/// `const` slices next to the operation they guard.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub min_len: usize,
    pub max_len: Option<usize>,
}

impl FieldSpec {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
            min_len: 0,
            max_len: None,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            min_len: 0,
            max_len: None,
        }
    }

    /// Adds a length constraint. The check only runs when a maximum is set.
    pub const fn bounded(self, min_len: usize, max_len: usize) -> Self {
        Self {
            name: self.name,
            kind: self.kind,
            required: self.required,
            min_len,
            max_len: Some(max_len),
        }
    }
}

/// Checks `payload` against a constraint table and returns the sanitized
/// field map that is safe to hand to storage.
///
/// Per field the checks run as: presence, type (or email shape), length,
/// allowed values. Fields the table does not declare are dropped, absent
/// optional fields are omitted rather than defaulted, and a field literally
/// named `password` is replaced by its one-way hash on the way out.
pub fn validate(
    specs: &[FieldSpec],
    payload: &Map<String, Value>,
) -> Result<Map<String, Value>, QuizError> {
    let mut sanitized = Map::new();

    for spec in specs {
        let value = match payload.get(spec.name) {
            Some(value) => value,
            None if spec.required => {
                return Err(QuizError::validation(spec.name, "is required"));
            }
            None => continue,
        };

        match spec.kind {
            FieldKind::Email => {
                let text = value
                    .as_str()
                    .ok_or_else(|| QuizError::validation(spec.name, "must be a string"))?;
                if !EMAIL_RE.is_match(text) {
                    return Err(QuizError::validation(spec.name, "is not a valid email address"));
                }
            }
            FieldKind::Str => {
                let text = value
                    .as_str()
                    .ok_or_else(|| QuizError::validation(spec.name, "must be a string"))?;
                if let Some(max_len) = spec.max_len {
                    let len = text.chars().count();
                    if len < spec.min_len || len > max_len {
                        return Err(QuizError::validation(
                            spec.name,
                            format!("length must be between {} and {}", spec.min_len, max_len),
                        ));
                    }
                }
            }
            FieldKind::Int => {
                if !value.is_i64() {
                    return Err(QuizError::validation(spec.name, "must be an integer"));
                }
            }
            FieldKind::Bool => {
                if !value.is_boolean() {
                    return Err(QuizError::validation(spec.name, "must be a boolean"));
                }
            }
            FieldKind::IntEnum(allowed) => {
                let number = value
                    .as_i64()
                    .ok_or_else(|| QuizError::validation(spec.name, "must be an integer"))?;
                if !allowed.contains(&number) {
                    return Err(QuizError::validation(
                        spec.name,
                        format!("allowed values: {}", allowed.iter().join(", ")),
                    ));
                }
            }
        }

        // Plaintext must never reach storage, whatever else the field passed.
        let stored = match (value, spec.name) {
            (Value::String(plain), "password") => Value::String(hash_password(plain)?),
            _ => value.clone(),
        };
        sanitized.insert(spec.name.to_string(), stored);
    }

    Ok(sanitized)
}

/// One-way argon2id hash with a fresh random salt.
pub fn hash_password(plain: &str) -> Result<String, QuizError> {
    let salt: [u8; 16] = rand::thread_rng().gen();
    argon2::hash_encoded(plain.as_bytes(), &salt, &ARGON_CONFIG)
        .map_err(|e| QuizError::validation("password", e.to_string()))
}

pub fn verify_password(plain: &str, encoded: &str) -> bool {
    argon2::verify_encoded(encoded, plain.as_bytes()).unwrap_or(false)
}
