use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChordError {
    #[error("unknown note spelling '{token}'")]
    UnknownSpelling { token: String },

    #[error("malformed note '{token}': {reason}")]
    MalformedLine { token: String, reason: String },
}

impl ChordError {
    pub fn unknown(token: impl Into<String>) -> Self {
        Self::UnknownSpelling {
            token: token.into(),
        }
    }

    pub fn malformed(token: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedLine {
            token: token.into(),
            reason: reason.into(),
        }
    }

    /// The raw input token that caused the failure.
    pub fn token(&self) -> &str {
        match self {
            Self::UnknownSpelling { token } | Self::MalformedLine { token, .. } => token,
        }
    }
}

/// A rejected input line. Collected per batch and reported once every other
/// line has been rendered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line_number}: {error} in \"{line}\"")]
pub struct LineError {
    pub line_number: usize,
    pub line: String,
    #[source]
    pub error: ChordError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_error_echoes_token_and_line() {
        let err = LineError {
            line_number: 3,
            line: "T C A".to_string(),
            error: ChordError::unknown("T"),
        };
        let text = err.to_string();
        assert!(text.contains("'T'"));
        assert!(text.contains("\"T C A\""));
        assert!(text.starts_with("line 3:"));
    }

    #[test]
    fn line_error_exposes_its_cause() {
        use std::error::Error as _;
        let err = LineError {
            line_number: 1,
            line: "C10".to_string(),
            error: ChordError::malformed("C10", "octave"),
        };
        let source = err.source().expect("cause is attached");
        assert_eq!(source.to_string(), "malformed note 'C10': octave");
    }

    #[test]
    fn token_accessor_covers_both_kinds() {
        assert_eq!(ChordError::unknown("H#").token(), "H#");
        assert_eq!(ChordError::malformed("C12", "octave").token(), "C12");
    }
}
