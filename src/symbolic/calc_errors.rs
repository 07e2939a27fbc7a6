//! Error type shared by the scanner, segmenter, classifier, evaluator and the
//! interactive shell. Every error is local to one menu operation.
use std::fmt;

/// Errors raised while reading, differentiating or evaluating an expression
#[derive(Debug, Clone, PartialEq)]
pub enum CalcError {
    /// nothing left after whitespace removal
    EmptyExpression,
    /// count of '(' differs from count of ')'
    UnbalancedParentheses { open: usize, close: usize },
    /// a sign with nothing on one side of it, like "x+" or "x+-y"
    EmptyTerm { position: usize },
    InvalidCharacter { ch: char, position: usize },
    MalformedNumeral(String),
    /// the term matches none of the known shapes
    UnrecognizedTermShape { term: String, reason: String },
    Syntax { message: String, position: usize },
    UnboundVariable(String),
    NonFiniteResult(String),
    /// partial derivative in the denominator of dy/dx (or dx/dy) is zero
    ImplicitUndefined { variable: char },
    InvalidMenuSelection(String),
    Config(String),
    Io(String),
}

impl fmt::Display for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CalcError::EmptyExpression => write!(f, "Empty expression"),
            CalcError::UnbalancedParentheses { open, close } => write!(
                f,
                "Bad arithmetic expression: no complete pair of parentheses ['()'] ({} opening, {} closing)",
                open, close
            ),
            CalcError::EmptyTerm { position } => {
                write!(f, "Missing term next to the sign at position {}", position + 1)
            }
            CalcError::InvalidCharacter { ch, position } => {
                write!(f, "Invalid character '{}' at position {}", ch, position + 1)
            }
            CalcError::MalformedNumeral(text) => write!(f, "Malformed numeral: '{}'", text),
            CalcError::UnrecognizedTermShape { term, reason } => {
                write!(f, "Unrecognized term '{}': {}", term, reason)
            }
            CalcError::Syntax { message, position } => {
                write!(f, "Syntax error at position {}: {}", position + 1, message)
            }
            CalcError::UnboundVariable(name) => write!(f, "No value given for variable '{}'", name),
            CalcError::NonFiniteResult(expr) => {
                write!(f, "Expression '{}' has no finite value at this point", expr)
            }
            CalcError::ImplicitUndefined { variable } => write!(
                f,
                "Implicit derivative is undefined: partial derivative with respect to {} is zero",
                variable
            ),
            CalcError::InvalidMenuSelection(text) => {
                write!(f, "Invalid menu selection '{}', expected a number from 1 to 5", text)
            }
            CalcError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CalcError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for CalcError {}

impl From<std::io::Error> for CalcError {
    fn from(err: std::io::Error) -> Self {
        CalcError::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_positions_are_one_based() {
        let err = CalcError::InvalidCharacter { ch: '#', position: 0 };
        assert_eq!(err.to_string(), "Invalid character '#' at position 1");
        let err = CalcError::EmptyTerm { position: 1 };
        assert_eq!(err.to_string(), "Missing term next to the sign at position 2");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: CalcError = io.into();
        assert_eq!(err, CalcError::Io("no such file".to_string()));
    }
}
