use crate::lexer::{
    token::{Token, TokenSlice},
    Span,
};
use nom::error::{ErrorKind, ParseError};
use std::fmt::Display;
use thiserror::Error;

/// Every failure that can end a run. None of them is recoverable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlgoError {
    #[error("[LEXER] Error at line {line} : {message}")]
    Lexical { line: u32, message: String },

    #[error("[PARSER] Error at line {line} Token: {lexeme} : {message}")]
    Syntax {
        line: u32,
        lexeme: String,
        message: String,
    },

    #[error("[INTERPRETER] Error at line {line} Token: {lexeme} : {message}")]
    Runtime {
        line: u32,
        lexeme: String,
        message: String,
    },

    #[error("[OUTPUT] {0}")]
    Output(String),
}

impl AlgoError {
    pub fn lexical(line: u32, message: impl Into<String>) -> Self {
        AlgoError::Lexical {
            line,
            message: message.into(),
        }
    }

    pub fn syntax(token: &Token, message: impl Into<String>) -> Self {
        AlgoError::Syntax {
            line: token.line,
            lexeme: token.text().to_string(),
            message: message.into(),
        }
    }

    pub fn runtime(token: &Token, cause: impl Display) -> Self {
        AlgoError::Runtime {
            line: token.line,
            lexeme: token.text().to_string(),
            message: cause.to_string(),
        }
    }
}

impl<'a> ParseError<Span<'a>> for AlgoError {
    fn from_error_kind(input: Span<'a>, _kind: ErrorKind) -> Self {
        match input.fragment().chars().next() {
            Some(c) => AlgoError::lexical(
                input.location_line(),
                format!("Unexpected character '{}'.", c),
            ),
            None => AlgoError::lexical(input.location_line(), "Unexpected end of input."),
        }
    }

    fn append(_input: Span<'a>, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

impl<'a> ParseError<TokenSlice<'a>> for AlgoError {
    fn from_error_kind(input: TokenSlice<'a>, kind: ErrorKind) -> Self {
        match input.current() {
            Some(token) => AlgoError::syntax(token, format!("Unexpected token ({:?}).", kind)),
            None => AlgoError::Syntax {
                line: 0,
                lexeme: "EOF".to_string(),
                message: "Unexpected end of input.".to_string(),
            },
        }
    }

    fn append(_input: TokenSlice<'a>, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}
