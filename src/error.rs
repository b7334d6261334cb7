//! Error type shared by every energy object in the crate.

/// Errors raised while building, validating, parsing or writing energy objects.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A name that EnergyPlus cannot accept.
    #[error("invalid name \"{name}\": {reason}")]
    InvalidName { name: String, reason: String },

    /// A numeric field outside its allowed range.
    #[error("{field} must be {range}, got {value}")]
    OutOfRange {
        field: String,
        value: f64,
        range: String,
    },

    /// A field holding a value that is not allowed for other reasons.
    #[error("invalid {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// A construction whose layer stack is not physically valid.
    #[error("construction \"{construction}\" has invalid layers: {reason}")]
    InvalidLayers {
        construction: String,
        reason: String,
    },

    /// A schedule that is inconsistent or cannot be evaluated.
    #[error("schedule \"{name}\": {reason}")]
    Schedule { name: String, reason: String },

    /// IDF text that cannot be read into the expected object.
    #[error("cannot parse {object_type} from IDF: {reason}")]
    IdfParse { object_type: String, reason: String },

    /// A referenced object that was not supplied.
    #[error("{kind} \"{name}\" was not found")]
    MissingReference { kind: String, name: String },

    /// Several distinct objects sharing one name.
    #[error("duplicate {kind} names: {}", .names.join(", "))]
    Duplicate { kind: String, names: Vec<String> },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl Error {
    pub(crate) fn out_of_range(field: impl Into<String>, value: f64, range: &str) -> Self {
        Error::OutOfRange {
            field: field.into(),
            value,
            range: range.to_string(),
        }
    }

    pub(crate) fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    pub(crate) fn idf(object_type: &str, reason: impl Into<String>) -> Self {
        Error::IdfParse {
            object_type: object_type.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn missing(kind: &str, name: &str) -> Self {
        Error::MissingReference {
            kind: kind.to_string(),
            name: name.to_string(),
        }
    }
}

/// Result alias using the crate error.
pub type Result<T> = std::result::Result<T, Error>;

/// Checks that `name` can be written as an EnergyPlus object name.
///
/// Names must be non-empty, at most 100 characters, and free of the
/// characters IDF uses as delimiters.
pub fn check_ep_name(name: &str) -> Result<()> {
    let reason = if name.trim().is_empty() {
        Some("must not be empty".to_string())
    } else if name.chars().count() > 100 {
        Some("must be 100 characters or fewer".to_string())
    } else {
        name.chars()
            .find(|c| matches!(c, ',' | ';' | '!' | '\n' | '\r' | '\t'))
            .map(|c| format!("contains illegal character {c:?}"))
    };
    match reason {
        Some(reason) => Err(Error::InvalidName {
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

/// Checks that `value` lies within `[min, max]`.
pub(crate) fn check_range(field: &str, value: f64, min: f64, max: f64) -> Result<()> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(Error::out_of_range(
            field,
            value,
            &format!("between {min} and {max}"),
        ))
    }
}

/// Checks that `value` is strictly positive.
pub(crate) fn check_positive(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::out_of_range(field, value, "greater than 0"))
    }
}

/// Checks that `value` is zero or positive.
pub(crate) fn check_non_negative(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::out_of_range(field, value, "0 or greater"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_names() {
        assert!(check_ep_name("Generic Brick").is_ok());
        assert!(check_ep_name("Zone 1..Lights").is_ok());
    }

    #[test]
    fn rejects_delimiters_and_long_names() {
        assert!(check_ep_name("a,b").is_err());
        assert!(check_ep_name("a;b").is_err());
        assert!(check_ep_name("").is_err());
        assert!(check_ep_name(&"x".repeat(101)).is_err());
        assert!(check_ep_name(&"x".repeat(100)).is_ok());
    }

    #[test]
    fn range_checks() {
        assert!(check_range("f", 0.5, 0.0, 1.0).is_ok());
        assert!(check_range("f", 1.5, 0.0, 1.0).is_err());
        assert!(check_range("f", f64::NAN, 0.0, 1.0).is_err());
        assert!(check_positive("f", 0.0).is_err());
        assert!(check_non_negative("f", 0.0).is_ok());
    }

    #[test]
    fn display_is_readable() {
        let e = Error::out_of_range("thickness", -1.0, "greater than 0");
        assert_eq!(e.to_string(), "thickness must be greater than 0, got -1");
        let d = Error::Duplicate {
            kind: "material".into(),
            names: vec!["A".into(), "B".into()],
        };
        assert_eq!(d.to_string(), "duplicate material names: A, B");
    }
}
