//! # Symbolic Engine Module
//!
//! Expression tree used to evaluate terms numerically.
//!
//! ## Purpose
//!
//! A term such as `3x^2`, `2sin^2(x+y)` or `x/-2` is read from tokens into an `Expr`
//! tree and then evaluated with values bound to its variables. Substituting values by
//! overwriting characters of the term string cannot work for multi-digit coefficients or
//! function names, so evaluation always goes through the tree.
//!
//! ## Grammar
//! ```text
//! sum     := product (('+' | '-') product)*
//! product := unary (('*' | '/') unary | power)*      juxtaposition multiplies: 3x, 2sin(x)
//! unary   := ('-' | '+') unary | power
//! power   := primary ('^' unary)?                    right associative
//! primary := numeral | variable | '(' sum ')' | func ('^' ['-'] numeral)? '(' sum ')'
//! ```
//! `sin^2(x)` reads as `(sin(x))^2`; `ln` and `log` are both the natural logarithm.

#![allow(non_camel_case_types)]

use crate::symbolic::calc_errors::CalcError;
use crate::symbolic::tokenizer::{FuncName, Token, TokenKind, tokenize};
use std::fmt;

/// Core symbolic expression enum representing a term as an abstract syntax tree.
///
/// # Examples
/// ```rust, ignore
/// let x = Expr::Var("x".to_string());
/// let expr = Expr::Add(Box::new(x), Box::new(Expr::Const(2.0)));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Symbolic variable with a name (e.g., "x", "y")
    Var(String),
    /// Numerical constant value
    Const(f64),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    /// Power operation: base ^ exponent
    Pow(Box<Expr>, Box<Expr>),
    /// Natural logarithm: ln(x), also read from log(x)
    Ln(Box<Expr>),
    sin(Box<Expr>),
    cos(Box<Expr>),
    /// Tangent function: tan(x) - uses mathematical notation 'tg'
    tg(Box<Expr>),
    /// Cotangent function: cot(x) - uses mathematical notation 'ctg'
    ctg(Box<Expr>),
    sec(Box<Expr>),
    csc(Box<Expr>),
}

/// Pretty printing with full parenthesisation, mainly for logs and debugging
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Const(val) => write!(f, "{}", val),
            Expr::Add(lhs, rhs) => write!(f, "({} + {})", lhs, rhs),
            Expr::Sub(lhs, rhs) => write!(f, "({} - {})", lhs, rhs),
            Expr::Mul(lhs, rhs) => write!(f, "({} * {})", lhs, rhs),
            Expr::Div(lhs, rhs) => write!(f, "({} / {})", lhs, rhs),
            Expr::Pow(base, exp) => write!(f, "({} ^ {})", base, exp),
            Expr::Ln(expr) => write!(f, "ln({})", expr),
            Expr::sin(expr) => write!(f, "sin({})", expr),
            Expr::cos(expr) => write!(f, "cos({})", expr),
            Expr::tg(expr) => write!(f, "tg({})", expr),
            Expr::ctg(expr) => write!(f, "ctg({})", expr),
            Expr::sec(expr) => write!(f, "sec({})", expr),
            Expr::csc(expr) => write!(f, "csc({})", expr),
        }
    }
}

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::Add(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::Sub(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::Mul(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::Div(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Expr::Mul(Box::new(Expr::Const(-1.0)), self.boxed())
    }
}

impl Expr {
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    pub fn pow(self, rhs: Expr) -> Expr {
        Expr::Pow(self.boxed(), rhs.boxed())
    }

    /// call of a named function on an argument
    pub fn call(func: FuncName, arg: Expr) -> Expr {
        let arg = arg.boxed();
        match func {
            FuncName::Sin => Expr::sin(arg),
            FuncName::Cos => Expr::cos(arg),
            FuncName::Tan => Expr::tg(arg),
            FuncName::Cot => Expr::ctg(arg),
            FuncName::Sec => Expr::sec(arg),
            FuncName::Csc => Expr::csc(arg),
            FuncName::Ln | FuncName::Log => Expr::Ln(arg),
        }
    }

    /// reads an expression string into a tree
    pub fn parse_expression(input: &str) -> Result<Expr, CalcError> {
        let tokens = tokenize(input)?;
        let mut parser = ExprParser {
            tokens: &tokens,
            pos: 0,
            end: input.len(),
        };
        let expr = parser.parse_sum()?;
        if parser.pos < tokens.len() {
            return Err(parser.error("unexpected token after the end of the expression"));
        }
        Ok(expr)
    }

    /// Evaluates the tree with `values[i]` bound to the variable named `vars[i]`
    pub fn eval_expression(&self, vars: &[&str], values: &[f64]) -> Result<f64, CalcError> {
        let res = match self {
            Expr::Var(name) => {
                let index = vars
                    .iter()
                    .position(|&v| v == name.as_str())
                    .ok_or_else(|| CalcError::UnboundVariable(name.clone()))?;
                *values
                    .get(index)
                    .ok_or_else(|| CalcError::UnboundVariable(name.clone()))?
            }
            Expr::Const(val) => *val,
            Expr::Add(lhs, rhs) => {
                let lhs_fn = lhs.eval_expression(vars, values)?;
                let rhs_fn = rhs.eval_expression(vars, values)?;
                lhs_fn + rhs_fn
            }
            Expr::Sub(lhs, rhs) => {
                let lhs_fn = lhs.eval_expression(vars, values)?;
                let rhs_fn = rhs.eval_expression(vars, values)?;
                lhs_fn - rhs_fn
            }
            Expr::Mul(lhs, rhs) => {
                let lhs_fn = lhs.eval_expression(vars, values)?;
                let rhs_fn = rhs.eval_expression(vars, values)?;
                lhs_fn * rhs_fn
            }
            Expr::Div(lhs, rhs) => {
                let lhs_fn = lhs.eval_expression(vars, values)?;
                let rhs_fn = rhs.eval_expression(vars, values)?;
                lhs_fn / rhs_fn
            }
            Expr::Pow(base, exp) => {
                let base_fn = base.eval_expression(vars, values)?;
                let exp_fn = exp.eval_expression(vars, values)?;
                base_fn.powf(exp_fn)
            }
            Expr::Ln(expr) => expr.eval_expression(vars, values)?.ln(),
            Expr::sin(expr) => expr.eval_expression(vars, values)?.sin(),
            Expr::cos(expr) => expr.eval_expression(vars, values)?.cos(),
            Expr::tg(expr) => expr.eval_expression(vars, values)?.tan(),
            Expr::ctg(expr) => 1.0 / expr.eval_expression(vars, values)?.tan(),
            Expr::sec(expr) => 1.0 / expr.eval_expression(vars, values)?.cos(),
            Expr::csc(expr) => 1.0 / expr.eval_expression(vars, values)?.sin(),
        };
        Ok(res)
    }
}

struct ExprParser<'a> {
    tokens: &'a [Token],
    pos: usize,
    /// length of the source, reported as position when input ends early
    end: usize,
}

impl<'a> ExprParser<'a> {
    fn peek(&self) -> Option<&'a TokenKind> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }

    fn advance(&mut self) -> Option<&'a TokenKind> {
        let kind = self.peek();
        if kind.is_some() {
            self.pos += 1;
        }
        kind
    }

    fn error(&self, message: &str) -> CalcError {
        CalcError::Syntax {
            message: message.to_string(),
            position: self.tokens.get(self.pos).map_or(self.end, |t| t.start),
        }
    }

    fn expect(&mut self, kind: TokenKind, message: &str) -> Result<(), CalcError> {
        if self.peek() == Some(&kind) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(message))
        }
    }

    fn parse_sum(&mut self) -> Result<Expr, CalcError> {
        let mut lhs = self.parse_product()?;
        loop {
            match self.peek() {
                Some(TokenKind::Plus) => {
                    self.pos += 1;
                    lhs = lhs + self.parse_product()?;
                }
                Some(TokenKind::Minus) => {
                    self.pos += 1;
                    lhs = lhs - self.parse_product()?;
                }
                _ => return Ok(lhs),
            }
        }
    }

    fn parse_product(&mut self) -> Result<Expr, CalcError> {
        let mut lhs = self.parse_unary()?;
        loop {
            match self.peek() {
                Some(TokenKind::Star) => {
                    self.pos += 1;
                    lhs = lhs * self.parse_unary()?;
                }
                Some(TokenKind::Slash) => {
                    self.pos += 1;
                    lhs = lhs / self.parse_unary()?;
                }
                Some(
                    TokenKind::Number(_) | TokenKind::Var(_) | TokenKind::Func(_) | TokenKind::LParen,
                ) => {
                    lhs = lhs * self.parse_power()?;
                }
                _ => return Ok(lhs),
            }
        }
    }

    fn parse_unary(&mut self) -> Result<Expr, CalcError> {
        match self.peek() {
            Some(TokenKind::Minus) => {
                self.pos += 1;
                Ok(-self.parse_unary()?)
            }
            Some(TokenKind::Plus) => {
                self.pos += 1;
                self.parse_unary()
            }
            _ => self.parse_power(),
        }
    }

    fn parse_power(&mut self) -> Result<Expr, CalcError> {
        let base = self.parse_primary()?;
        if self.peek() == Some(&TokenKind::Caret) {
            self.pos += 1;
            let exponent = self.parse_unary()?;
            return Ok(base.pow(exponent));
        }
        Ok(base)
    }

    fn parse_primary(&mut self) -> Result<Expr, CalcError> {
        let start = self.pos;
        match self.advance() {
            Some(TokenKind::Number(value)) => Ok(Expr::Const(*value)),
            Some(TokenKind::Var(name)) => Ok(Expr::Var(name.to_string())),
            Some(TokenKind::LParen) => {
                let inner = self.parse_sum()?;
                self.expect(TokenKind::RParen, "expected ')'")?;
                Ok(inner)
            }
            Some(TokenKind::Func(func)) => {
                let power = self.parse_function_power()?;
                self.expect(TokenKind::LParen, "expected '(' after function name")?;
                let arg = self.parse_sum()?;
                self.expect(TokenKind::RParen, "expected ')'")?;
                let call = Expr::call(*func, arg);
                Ok(match power {
                    Some(n) => call.pow(Expr::Const(n)),
                    None => call,
                })
            }
            Some(_) => {
                self.pos = start;
                Err(self.error("expected a numeral, a variable, a function or '('"))
            }
            None => Err(self.error("unexpected end of expression")),
        }
    }

    // the n of sin^n(u), only a literal numeral is allowed here
    fn parse_function_power(&mut self) -> Result<Option<f64>, CalcError> {
        if self.peek() != Some(&TokenKind::Caret) {
            return Ok(None);
        }
        self.pos += 1;
        let negative = self.peek() == Some(&TokenKind::Minus);
        if negative {
            self.pos += 1;
        }
        match self.peek() {
            Some(TokenKind::Number(n)) => {
                self.pos += 1;
                Ok(Some(if negative { -n } else { *n }))
            }
            _ => Err(self.error("function power must be a numeral")),
        }
    }
}
