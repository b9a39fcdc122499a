use std::fmt::{self, Debug, Display};

/// Provides `DocmapError` and maps other errors to convert to a `DocmapError`.
///
/// Only configuration can fail; every lookup on the read path is total and returns
/// a documented default or `Option` instead of an error.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub enum DocmapError {
    /// A converter is already registered for the native type. Carries the native
    /// type plus the existing and the attempted converter.
    DuplicateConverter {
        native: &'static str,
        existing: &'static str,
        attempted: &'static str,
    },
    /// A converter was handed a value it does not understand.
    ConverterInput(String),
    DocmapError(String),
}

impl From<String> for DocmapError {
    fn from(error: String) -> Self {
        DocmapError::DocmapError(error)
    }
}

impl From<&str> for DocmapError {
    fn from(error: &str) -> Self {
        DocmapError::DocmapError(error.to_string())
    }
}

impl std::error::Error for DocmapError {}

impl Display for DocmapError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DocmapError::DuplicateConverter {
                native,
                existing,
                attempted,
            } => write!(
                f,
                "The type '{native}' already has a type converter registered ('{existing}'). \
                 You are trying to register '{attempted}'"
            ),
            DocmapError::ConverterInput(message) => {
                write!(f, "Converter input mismatch: {message}")
            }
            DocmapError::DocmapError(message) => write!(f, "Error: {message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_converter_names_both_converters() {
        let error = DocmapError::DuplicateConverter {
            native: "Duration",
            existing: "DurationConverter",
            attempted: "OtherConverter",
        };
        let message = error.to_string();
        assert!(message.contains("DurationConverter"));
        assert!(message.contains("OtherConverter"));
        assert!(message.contains("Duration"));
    }

    #[test]
    fn from_str_and_string() {
        let a: DocmapError = "boom".into();
        let b: DocmapError = String::from("boom").into();
        assert_eq!(a.to_string(), b.to_string());
    }
}
