//! Tokenizer for expression strings.
//!
//! Turns `2x^3+sin(2x)` into numerals, single-letter variables, function names,
//! operators and brackets. Each token keeps its byte span in the source string so
//! that the classifier can cut the original text of a function argument back out.
//! Function names are only recognised when they are followed by `(` or `^`:
//! in `cost` the letters are four variables, in `cos(t)` they are a call.
use crate::symbolic::calc_errors::CalcError;
use crate::symbolic::utils::{is_number, parse_float};
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{one_of, satisfy},
    combinator::{map, peek, value},
    sequence::terminated,
};
use strum_macros::Display;

/// functions the calculator knows how to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum FuncName {
    #[strum(to_string = "sin")]
    Sin,
    #[strum(to_string = "cos")]
    Cos,
    #[strum(to_string = "tan")]
    Tan,
    #[strum(to_string = "csc")]
    Csc,
    #[strum(to_string = "sec")]
    Sec,
    #[strum(to_string = "cot")]
    Cot,
    #[strum(to_string = "ln")]
    Ln,
    #[strum(to_string = "log")]
    Log,
}

impl FuncName {
    pub fn is_trig(&self) -> bool {
        !matches!(self, FuncName::Ln | FuncName::Log)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(f64),
    Var(char),
    Func(FuncName),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// byte offset of the first character
    pub start: usize,
    /// byte offset one past the last character
    pub end: usize,
}

impl Token {
    pub fn is_var(&self, var: char) -> bool {
        self.kind == TokenKind::Var(var)
    }
}

// numerals are parsed to f64 only after recognition so that "1.2.3" is reported as malformed
enum Lexeme<'a> {
    Numeral(&'a str),
    Kind(TokenKind),
}

fn parse_numeral(input: &str) -> IResult<&str, &str> {
    take_while1(is_number).parse(input)
}

fn parse_function_name(input: &str) -> IResult<&str, FuncName> {
    let name = alt((
        value(FuncName::Sin, tag("sin")),
        value(FuncName::Cos, tag("cos")),
        value(FuncName::Tan, tag("tan")),
        value(FuncName::Csc, tag("csc")),
        value(FuncName::Sec, tag("sec")),
        value(FuncName::Cot, tag("cot")),
        value(FuncName::Ln, tag("ln")),
        value(FuncName::Log, tag("log")),
    ));
    terminated(name, peek(one_of("(^"))).parse(input)
}

fn parse_variable(input: &str) -> IResult<&str, char> {
    satisfy(|c: char| c.is_ascii_alphabetic()).parse(input)
}

fn parse_operator(input: &str) -> IResult<&str, TokenKind> {
    map(one_of("+-*/^()"), |c| match c {
        '+' => TokenKind::Plus,
        '-' => TokenKind::Minus,
        '*' => TokenKind::Star,
        '/' => TokenKind::Slash,
        '^' => TokenKind::Caret,
        '(' => TokenKind::LParen,
        _ => TokenKind::RParen,
    })
    .parse(input)
}

fn parse_lexeme(input: &str) -> IResult<&str, Lexeme<'_>> {
    alt((
        map(parse_numeral, Lexeme::Numeral),
        map(parse_function_name, |func| Lexeme::Kind(TokenKind::Func(func))),
        map(parse_variable, |c| Lexeme::Kind(TokenKind::Var(c))),
        map(parse_operator, Lexeme::Kind),
    ))
    .parse(input)
}

/// splits an expression into tokens, whitespace is skipped
pub fn tokenize(input: &str) -> Result<Vec<Token>, CalcError> {
    let mut tokens = Vec::new();
    let mut rest = input;
    while let Some(ch) = rest.chars().next() {
        let start = input.len() - rest.len();
        if ch.is_whitespace() {
            rest = &rest[ch.len_utf8()..];
            continue;
        }
        let (remaining, lexeme) =
            parse_lexeme(rest).map_err(|_| CalcError::InvalidCharacter { ch, position: start })?;
        let kind = match lexeme {
            Lexeme::Numeral(text) => TokenKind::Number(parse_float(text)?),
            Lexeme::Kind(kind) => kind,
        };
        let end = input.len() - remaining.len();
        tokens.push(Token { kind, start, end });
        rest = remaining;
    }
    Ok(tokens)
}

/// index of the bracket token closing the one at `open`
pub fn matching_paren(tokens: &[Token], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(open) {
        match token.kind {
            TokenKind::LParen => depth += 1,
            TokenKind::RParen => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// positions of the variable among the tokens (function names never count)
pub fn variable_positions(tokens: &[Token], var: char) -> Vec<usize> {
    tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| t.is_var(var))
        .map(|(i, _)| i)
        .collect()
}

pub fn contains_variable(tokens: &[Token], var: char) -> bool {
    tokens.iter().any(|t| t.is_var(var))
}

/// true if `var` occurs in the expression text as a variable
pub fn uses_variable(expr: &str, var: char) -> Result<bool, CalcError> {
    Ok(contains_variable(&tokenize(expr)?, var))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_tokenize_polynomial() {
        assert_eq!(
            kinds("2x^3"),
            vec![
                TokenKind::Number(2.0),
                TokenKind::Var('x'),
                TokenKind::Caret,
                TokenKind::Number(3.0)
            ]
        );
    }

    #[test]
    fn test_tokenize_function_call_and_spans() {
        let tokens = tokenize("3sin(2.5x)").unwrap();
        assert_eq!(tokens[1].kind, TokenKind::Func(FuncName::Sin));
        assert_eq!((tokens[1].start, tokens[1].end), (1, 4));
        assert_eq!(tokens[3].kind, TokenKind::Number(2.5));
        assert_eq!((tokens[3].start, tokens[3].end), (5, 8));
    }

    #[test]
    fn test_function_name_needs_bracket_or_power() {
        assert_eq!(
            kinds("cos^2(t)")[..3],
            [
                TokenKind::Func(FuncName::Cos),
                TokenKind::Caret,
                TokenKind::Number(2.0)
            ]
        );
        assert_eq!(
            kinds("cost"),
            vec![
                TokenKind::Var('c'),
                TokenKind::Var('o'),
                TokenKind::Var('s'),
                TokenKind::Var('t')
            ]
        );
        assert_eq!(kinds("ln(x)")[0], TokenKind::Func(FuncName::Ln));
        assert_eq!(kinds("log(x)")[0], TokenKind::Func(FuncName::Log));
    }

    #[test]
    fn test_tokenize_errors() {
        assert_eq!(
            tokenize("x#2"),
            Err(CalcError::InvalidCharacter { ch: '#', position: 1 })
        );
        assert_eq!(
            tokenize("1.2.3x"),
            Err(CalcError::MalformedNumeral("1.2.3".to_string()))
        );
    }

    #[test]
    fn test_matching_paren_and_positions() {
        let tokens = tokenize("sin((x))*x").unwrap();
        assert_eq!(matching_paren(&tokens, 1), Some(5));
        assert_eq!(matching_paren(&tokens, 2), Some(4));
        assert_eq!(variable_positions(&tokens, 'x'), vec![3, 7]);
        assert!(uses_variable("x^2+y", 'y').unwrap());
        assert!(!uses_variable("sin(x)", 's').unwrap());
    }
}
