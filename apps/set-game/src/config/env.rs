use std::env::{self, VarError};
use std::fmt::Display;
use std::str::FromStr;

use crate::error::GameError;

/// Read and parse an optional environment variable.
///
/// Missing variables are `Ok(None)`; present-but-malformed ones are a
/// configuration error naming the variable.
pub(super) fn parse_var<T>(name: &str) -> Result<Option<T>, GameError>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| GameError::config(format!("{name}='{raw}' is invalid: {e}"))),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(GameError::config(format!(
            "{name} is not valid unicode"
        ))),
    }
}

/// Like [`parse_var`] for on/off switches; accepts `1/0`, `true/false`, `yes/no`.
pub(super) fn parse_flag(name: &str) -> Result<Option<bool>, GameError> {
    let Some(raw) = parse_var::<String>(name)? else {
        return Ok(None);
    };
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        _ => Err(GameError::config(format!(
            "{name}='{raw}' is not a boolean"
        ))),
    }
}

/// Overwrite `target` when the variable is set.
pub(super) fn override_with<T>(name: &str, target: &mut T) -> Result<(), GameError>
where
    T: FromStr,
    T::Err: Display,
{
    if let Some(value) = parse_var(name)? {
        *target = value;
    }
    Ok(())
}
