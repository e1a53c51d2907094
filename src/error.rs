use crate::ast::Token;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UndefinedIdentifier,
    WrongIdentifierKind,
    UndefinedArgument,
    ArgumentOutsideFunction,
    LocalOutsideFunction,
    UndefinedStatementOrProcedure,
    UndefinedReporter,
    ArityMismatch,
    StructuralInvariantViolation,
    DuplicateDefinition,
}

#[derive(Debug, Clone)]
pub struct TokenError {
    pub kind: ErrorKind,
    pub message: String,
    pub token: Token,
    pub help: Option<String>,
    /// The closest known name, when the error is about an unknown one.
    pub suggestion: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FileError {
    pub kind: ErrorKind,
    pub message: String,
}

#[derive(Debug, Clone)]
pub enum TransformError {
    Token(TokenError),
    File(FileError),
}

impl TransformError {
    pub fn token(kind: ErrorKind, message: impl Into<String>, token: &Token) -> Self {
        TransformError::Token(TokenError {
            kind,
            message: message.into(),
            token: token.clone(),
            help: None,
            suggestion: None,
        })
    }

    pub fn file(kind: ErrorKind, message: impl Into<String>) -> Self {
        TransformError::File(FileError {
            kind,
            message: message.into(),
        })
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        if let TransformError::Token(err) = &mut self {
            err.help = Some(help.into());
        }
        self
    }

    pub fn with_suggestion(mut self, suggestion: Option<String>, help: Option<String>) -> Self {
        if let TransformError::Token(err) = &mut self {
            err.suggestion = suggestion;
            err.help = help;
        }
        self
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            TransformError::Token(err) => err.kind,
            TransformError::File(err) => err.kind,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            TransformError::Token(err) => &err.message,
            TransformError::File(err) => &err.message,
        }
    }

    pub fn help(&self) -> Option<&str> {
        match self {
            TransformError::Token(err) => err.help.as_deref(),
            TransformError::File(_) => None,
        }
    }

    pub fn suggestion(&self) -> Option<&str> {
        match self {
            TransformError::Token(err) => err.suggestion.as_deref(),
            TransformError::File(_) => None,
        }
    }
}

impl Display for TransformError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TransformError::Token(err) => write!(
                f,
                "{} (line {}, column {})",
                err.message, err.token.pos.line, err.token.pos.column
            ),
            TransformError::File(err) => write!(f, "{}", err.message),
        }
    }
}

impl Error for TransformError {}

pub type TransformResult<T> = Result<T, TransformError>;

pub(crate) fn num_plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_errors_report_their_position() {
        let err = TransformError::token(
            ErrorKind::UndefinedIdentifier,
            "Undefined variable or list `scor`",
            &Token::at("scor", 3, 7),
        );
        assert_eq!(
            err.to_string(),
            "Undefined variable or list `scor` (line 3, column 7)"
        );
        assert_eq!(err.kind(), ErrorKind::UndefinedIdentifier);
        assert!(err.help().is_none());
    }

    #[test]
    fn file_errors_carry_no_help() {
        let err = TransformError::file(ErrorKind::StructuralInvariantViolation, "bad stack")
            .with_help("ignored");
        assert_eq!(err.to_string(), "bad stack");
        assert!(err.help().is_none());
        assert!(err.suggestion().is_none());
    }

    #[test]
    fn plural_counts() {
        assert_eq!(num_plural(1, "argument"), "1 argument");
        assert_eq!(num_plural(0, "argument"), "0 arguments");
        assert_eq!(num_plural(3, "argument"), "3 arguments");
    }
}
