//! Classification of a single additive term by shape.
//!
//! The first depth-zero occurrence of the variable (or the first depth-zero function call
//! whose argument mentions the variable) is the anchor of the term. Everything in front of
//! the anchor is its prefix, everything after it its suffix. Numerals on either side fold
//! into the numeric coefficient; variable-free symbolic text (`y` in `3xy`) is kept verbatim
//! as a constant factor. The anchor decides the shape:
//!```text
//!   3y x ^2       -> PolynomialPower { coefficient: 3y, exponent: 2 }
//!   2 sin (2x)    -> TrigCall        { coefficient: 2,  func: sin, inner: "2x" }
//!   cos^3 (x)     -> TrigPower       { coefficient: 1,  func: cos, power: 3, inner: "x" }
//!   ln (x^2+1)    -> LogCall         { coefficient: 1,  inner: "x^2+1" }
//!   (x^2+x)       -> Group           { inner: "x^2+x" }
//!```
use crate::symbolic::calc_errors::CalcError;
use crate::symbolic::tokenizer::{
    FuncName, Token, TokenKind, contains_variable, matching_paren, tokenize, variable_positions,
};
use crate::symbolic::utils::{format_coefficient, format_number, is_wrapped_in_brackets};
use log::debug;
use strum_macros::Display;

/// numeric coefficient of a term times a variable-free symbolic factor
#[derive(Debug, Clone, PartialEq)]
pub struct Coefficient {
    pub value: f64,
    pub factor: String,
}

impl Coefficient {
    pub fn one() -> Self {
        Coefficient {
            value: 1.0,
            factor: String::new(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.value == 0.0
    }

    /// coefficient scaled by `scale`, written in front of a body: 1 vanishes, -1 is a bare sign
    pub fn prefix(&self, scale: f64) -> String {
        format!("{}{}", format_coefficient(self.value * scale), self.factor)
    }

    /// coefficient scaled by `scale`, written as a whole term on its own
    pub fn standalone(&self, scale: f64) -> String {
        if self.factor.is_empty() {
            format_number(self.value * scale)
        } else {
            self.prefix(scale)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TermShape {
    /// the variable does not occur
    Constant,
    /// a * x^n, bare `a*x` has n = 1
    PolynomialPower {
        coefficient: Coefficient,
        exponent: f64,
    },
    /// a * fn(u) for a trigonometric fn
    TrigCall {
        coefficient: Coefficient,
        func: FuncName,
        inner: String,
    },
    /// a * fn^n(u), n an integer >= 2
    TrigPower {
        coefficient: Coefficient,
        func: FuncName,
        power: f64,
        inner: String,
    },
    /// a * ln(u) or a * log(u), both natural logarithms
    LogCall {
        coefficient: Coefficient,
        func: FuncName,
        inner: String,
    },
    /// the whole term is one bracketed sub-expression
    Group { inner: String },
    /// none of the above, with the reason why
    Unrecognized(String),
}

/// shape names shown in the term report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ShapeKind {
    #[strum(to_string = "constant")]
    Constant,
    #[strum(to_string = "polynomial power")]
    PolynomialPower,
    #[strum(to_string = "trig call")]
    TrigCall,
    #[strum(to_string = "trig power")]
    TrigPower,
    #[strum(to_string = "log call")]
    LogCall,
    #[strum(to_string = "group")]
    Group,
    #[strum(to_string = "unrecognized")]
    Unrecognized,
}

impl TermShape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            TermShape::Constant => ShapeKind::Constant,
            TermShape::PolynomialPower { .. } => ShapeKind::PolynomialPower,
            TermShape::TrigCall { .. } => ShapeKind::TrigCall,
            TermShape::TrigPower { .. } => ShapeKind::TrigPower,
            TermShape::LogCall { .. } => ShapeKind::LogCall,
            TermShape::Group { .. } => ShapeKind::Group,
            TermShape::Unrecognized(_) => ShapeKind::Unrecognized,
        }
    }
}

// token range of the anchor
enum Anchor {
    Variable {
        at: usize,
    },
    Call {
        func: FuncName,
        at: usize,
        power: Option<f64>,
        open: usize,
        close: usize,
    },
}

fn is_operator(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Plus | TokenKind::Minus | TokenKind::Star | TokenKind::Slash | TokenKind::Caret
    )
}

/// original text covered by a run of tokens
fn tokens_text<'a>(term: &'a str, tokens: &[Token]) -> &'a str {
    match (tokens.first(), tokens.last()) {
        (Some(first), Some(last)) => &term[first.start..last.end],
        _ => "",
    }
}

// reads `n`, `-n`, `(n)` or `(-n)` at `at`; returns the value and the index of its last token
fn read_exponent(tokens: &[Token], at: usize) -> Option<(f64, usize)> {
    match tokens.get(at..)? {
        [Token { kind: TokenKind::Number(n), .. }, ..] => Some((*n, at)),
        [
            Token { kind: TokenKind::Minus, .. },
            Token { kind: TokenKind::Number(n), .. },
            ..,
        ] => Some((-n, at + 1)),
        [
            Token { kind: TokenKind::LParen, .. },
            Token { kind: TokenKind::Number(n), .. },
            Token { kind: TokenKind::RParen, .. },
            ..,
        ] => Some((*n, at + 2)),
        [
            Token { kind: TokenKind::LParen, .. },
            Token { kind: TokenKind::Minus, .. },
            Token { kind: TokenKind::Number(n), .. },
            Token { kind: TokenKind::RParen, .. },
            ..,
        ] => Some((-n, at + 3)),
        _ => None,
    }
}

// walks the depth-zero tokens and returns the anchor, or the reason there is none usable
fn find_anchor(tokens: &[Token], var: char) -> Result<Option<Anchor>, String> {
    let mut i = 0;
    while i < tokens.len() {
        match tokens[i].kind {
            TokenKind::Var(c) if c == var => return Ok(Some(Anchor::Variable { at: i })),
            TokenKind::Func(func) => {
                let mut open = i + 1;
                let mut power = None;
                if matches!(tokens.get(open).map(|t| &t.kind), Some(TokenKind::Caret)) {
                    let (value, last) = read_exponent(tokens, open + 1)
                        .ok_or_else(|| format!("the power of {} must be a numeral", func))?;
                    power = Some(value);
                    open = last + 1;
                }
                if !matches!(tokens.get(open).map(|t| &t.kind), Some(TokenKind::LParen)) {
                    return Err(format!("{} must be followed by a bracketed argument", func));
                }
                let close = matching_paren(tokens, open)
                    .ok_or_else(|| format!("the argument of {} is not closed", func))?;
                if contains_variable(&tokens[open..close], var) {
                    return Ok(Some(Anchor::Call {
                        func,
                        at: i,
                        power,
                        open,
                        close,
                    }));
                }
                i = close + 1;
            }
            TokenKind::LParen => {
                let close = matching_paren(tokens, i)
                    .ok_or_else(|| "brackets are not properly nested".to_string())?;
                if contains_variable(&tokens[i..close], var) {
                    return Err(format!("'{}' appears inside a bracketed factor", var));
                }
                i = close + 1;
            }
            TokenKind::RParen => return Err("brackets are not properly nested".to_string()),
            _ => i += 1,
        }
    }
    Ok(None)
}

// symbolic factor must read as a product on its own
fn checked_factor<'a>(term: &'a str, tokens: &[Token]) -> Result<&'a str, String> {
    let starts_badly = tokens
        .first()
        .is_some_and(|t| is_operator(&t.kind) || t.kind == TokenKind::RParen);
    let ends_badly = tokens.last().is_some_and(|t| {
        is_operator(&t.kind) || matches!(t.kind, TokenKind::LParen | TokenKind::Func(_))
    });
    if starts_badly || ends_badly {
        return Err(format!(
            "cannot read '{}' as a coefficient",
            tokens_text(term, tokens)
        ));
    }
    Ok(tokens_text(term, tokens))
}

// numeric and symbolic parts in front of the anchor
fn read_prefix(term: &str, prefix: &[Token], coefficient: &mut Coefficient) -> Result<(), String> {
    let mut rest = prefix;
    let mut numeric = false;
    loop {
        match rest {
            [Token { kind: TokenKind::Number(n), .. }, tail @ ..] if !numeric => {
                coefficient.value *= n;
                numeric = true;
                rest = tail;
            }
            [
                Token { kind: TokenKind::Star, .. },
                Token { kind: TokenKind::Number(n), .. },
                tail @ ..,
            ] if numeric => {
                coefficient.value *= n;
                rest = tail;
            }
            _ => break,
        }
    }
    if numeric {
        if let [Token { kind: TokenKind::Star, .. }, tail @ ..] = rest {
            rest = tail;
        }
    }
    if let [Token { kind: TokenKind::Minus, .. }, tail @ ..] = rest {
        coefficient.value = -coefficient.value;
        rest = tail;
    }
    if let [head @ .., Token { kind: TokenKind::Star, .. }, Token { kind: TokenKind::Minus, .. }] =
        rest
    {
        coefficient.value = -coefficient.value;
        rest = head;
    }
    if let [head @ .., Token { kind: TokenKind::Star, .. }] = rest {
        rest = head;
    }
    if !rest.is_empty() {
        let factor = checked_factor(term, rest)?;
        coefficient.factor.push_str(factor);
    }
    Ok(())
}

// numeric and symbolic parts after the anchor
fn read_suffix(term: &str, suffix: &[Token], coefficient: &mut Coefficient) -> Result<(), String> {
    let mut rest = suffix;
    loop {
        match rest {
            [
                Token { kind: TokenKind::Star, .. },
                Token { kind: TokenKind::Number(n), .. },
                tail @ ..,
            ]
            | [Token { kind: TokenKind::Number(n), .. }, tail @ ..] => {
                coefficient.value *= n;
                rest = tail;
            }
            [
                Token { kind: TokenKind::Star, .. },
                Token { kind: TokenKind::Minus, .. },
                Token { kind: TokenKind::Number(n), .. },
                tail @ ..,
            ] => {
                coefficient.value *= -n;
                rest = tail;
            }
            [
                Token { kind: TokenKind::Slash, .. },
                Token { kind: TokenKind::Number(n), .. },
                tail @ ..,
            ] => {
                if *n == 0.0 {
                    return Err("division by zero".to_string());
                }
                coefficient.value /= n;
                rest = tail;
            }
            [
                Token { kind: TokenKind::Slash, .. },
                Token { kind: TokenKind::Minus, .. },
                Token { kind: TokenKind::Number(n), .. },
                tail @ ..,
            ] => {
                if *n == 0.0 {
                    return Err("division by zero".to_string());
                }
                coefficient.value /= -n;
                rest = tail;
            }
            [
                Token { kind: TokenKind::Star, .. },
                Token { kind: TokenKind::LParen, .. },
                Token { kind: TokenKind::Number(n), .. },
                Token { kind: TokenKind::RParen, .. },
                tail @ ..,
            ]
            | [
                Token { kind: TokenKind::LParen, .. },
                Token { kind: TokenKind::Number(n), .. },
                Token { kind: TokenKind::RParen, .. },
                tail @ ..,
            ] => {
                coefficient.value *= n;
                rest = tail;
            }
            _ => break,
        }
    }
    match rest {
        [
            Token { kind: TokenKind::Star, .. },
            Token { kind: TokenKind::Minus, .. },
            tail @ ..,
        ] => {
            coefficient.value = -coefficient.value;
            rest = tail;
        }
        [Token { kind: TokenKind::Star, .. }, tail @ ..] => rest = tail,
        _ => {}
    }
    if !rest.is_empty() {
        let factor = checked_factor(term, rest)?;
        coefficient.factor.push_str(factor);
    }
    Ok(())
}

fn classify_tokens(term: &str, tokens: &[Token], var: char) -> Result<TermShape, String> {
    let anchor = match find_anchor(tokens, var)? {
        Some(anchor) => anchor,
        None if variable_positions(tokens, var).is_empty() => return Ok(TermShape::Constant),
        None => return Err(format!("'{}' appears in an unsupported position", var)),
    };

    let (start, end) = match &anchor {
        Anchor::Variable { at } => {
            let end = if matches!(tokens.get(at + 1).map(|t| &t.kind), Some(TokenKind::Caret)) {
                match read_exponent(tokens, at + 2) {
                    Some((_, last)) => last,
                    None => return Err("the exponent must be a numeral".to_string()),
                }
            } else {
                *at
            };
            (*at, end)
        }
        Anchor::Call { at, close, .. } => (*at, *close),
    };

    let suffix = &tokens[end + 1..];
    if contains_variable(suffix, var) {
        return Err(format!("more than one factor depends on '{}'", var));
    }
    let mut coefficient = Coefficient::one();
    read_prefix(term, &tokens[..start], &mut coefficient)?;
    read_suffix(term, suffix, &mut coefficient)?;

    match anchor {
        Anchor::Variable { at } => {
            let exponent = if end > at {
                read_exponent(tokens, at + 2).map_or(1.0, |(n, _)| n)
            } else {
                1.0
            };
            Ok(TermShape::PolynomialPower {
                coefficient,
                exponent,
            })
        }
        Anchor::Call {
            func,
            power,
            open,
            close,
            ..
        } => {
            let inner = term[tokens[open].end..tokens[close].start].to_string();
            if inner.trim().is_empty() {
                return Err(format!("{} has an empty argument", func));
            }
            if !func.is_trig() {
                return match power {
                    None => Ok(TermShape::LogCall {
                        coefficient,
                        func,
                        inner,
                    }),
                    Some(_) => Err(format!("powers of {} are not supported", func)),
                };
            }
            match power {
                None => Ok(TermShape::TrigCall {
                    coefficient,
                    func,
                    inner,
                }),
                Some(n) if n == 1.0 => Ok(TermShape::TrigCall {
                    coefficient,
                    func,
                    inner,
                }),
                Some(n) if n == 0.0 => Ok(TermShape::Constant),
                Some(n) if n >= 2.0 && n.fract() == 0.0 => Ok(TermShape::TrigPower {
                    coefficient,
                    func,
                    power: n,
                    inner,
                }),
                Some(n) => Err(format!(
                    "the power of {} must be a whole number, got {}",
                    func,
                    format_number(n)
                )),
            }
        }
    }
}

/// decides the shape of one term with respect to `var`
pub fn classify_term(term: &str, var: char) -> Result<TermShape, CalcError> {
    let tokens = tokenize(term)?;
    if tokens.is_empty() {
        return Err(CalcError::EmptyExpression);
    }
    let trimmed = term.trim();
    if is_wrapped_in_brackets(trimmed) {
        let inner = trimmed[1..trimmed.len() - 1].to_string();
        debug!("term '{}' is a bracketed group", term);
        return Ok(TermShape::Group { inner });
    }
    let shape = classify_tokens(term, &tokens, var).unwrap_or_else(TermShape::Unrecognized);
    debug!("term '{}' classified as {:?}", term, shape);
    Ok(shape)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coefficient(value: f64, factor: &str) -> Coefficient {
        Coefficient {
            value,
            factor: factor.to_string(),
        }
    }

    #[test]
    fn test_polynomial_shapes() {
        assert_eq!(
            classify_term("2x^3", 'x').unwrap(),
            TermShape::PolynomialPower {
                coefficient: coefficient(2.0, ""),
                exponent: 3.0
            }
        );
        assert_eq!(
            classify_term("x", 'x').unwrap(),
            TermShape::PolynomialPower {
                coefficient: Coefficient::one(),
                exponent: 1.0
            }
        );
        assert_eq!(
            classify_term("x^-2", 'x').unwrap(),
            TermShape::PolynomialPower {
                coefficient: Coefficient::one(),
                exponent: -2.0
            }
        );
        assert_eq!(
            classify_term("x^(-0.5)", 'x').unwrap(),
            TermShape::PolynomialPower {
                coefficient: Coefficient::one(),
                exponent: -0.5
            }
        );
    }

    #[test]
    fn test_coefficients_fold_from_both_sides() {
        assert_eq!(
            classify_term("3*x^2*2", 'x').unwrap(),
            TermShape::PolynomialPower {
                coefficient: coefficient(6.0, ""),
                exponent: 2.0
            }
        );
        assert_eq!(
            classify_term("x/4", 'x').unwrap(),
            TermShape::PolynomialPower {
                coefficient: coefficient(0.25, ""),
                exponent: 1.0
            }
        );
        assert_eq!(
            classify_term("3*-x", 'x').unwrap(),
            TermShape::PolynomialPower {
                coefficient: coefficient(-3.0, ""),
                exponent: 1.0
            }
        );
        assert_eq!(
            classify_term("x/-2", 'x').unwrap(),
            TermShape::PolynomialPower {
                coefficient: coefficient(-0.5, ""),
                exponent: 1.0
            }
        );
        assert_eq!(
            classify_term("x^2*-3", 'x').unwrap(),
            TermShape::PolynomialPower {
                coefficient: coefficient(-3.0, ""),
                exponent: 2.0
            }
        );
        assert_eq!(
            classify_term("x*-y", 'x').unwrap(),
            TermShape::PolynomialPower {
                coefficient: coefficient(-1.0, "y"),
                exponent: 1.0
            }
        );
        assert_eq!(
            classify_term("3xy", 'x').unwrap(),
            TermShape::PolynomialPower {
                coefficient: coefficient(3.0, "y"),
                exponent: 1.0
            }
        );
        assert_eq!(
            classify_term("3y^2x", 'x').unwrap(),
            TermShape::PolynomialPower {
                coefficient: coefficient(3.0, "y^2"),
                exponent: 1.0
            }
        );
    }

    #[test]
    fn test_function_shapes() {
        assert_eq!(
            classify_term("2sin(2x)", 'x').unwrap(),
            TermShape::TrigCall {
                coefficient: coefficient(2.0, ""),
                func: FuncName::Sin,
                inner: "2x".to_string()
            }
        );
        assert_eq!(
            classify_term("cos^3(x+1)", 'x').unwrap(),
            TermShape::TrigPower {
                coefficient: Coefficient::one(),
                func: FuncName::Cos,
                power: 3.0,
                inner: "x+1".to_string()
            }
        );
        assert_eq!(
            classify_term("sin^1(x)", 'x').unwrap().kind(),
            ShapeKind::TrigCall
        );
        assert_eq!(
            classify_term("ln(x^2+1)", 'x').unwrap(),
            TermShape::LogCall {
                coefficient: Coefficient::one(),
                func: FuncName::Ln,
                inner: "x^2+1".to_string()
            }
        );
        assert_eq!(
            classify_term("log(x)", 'x').unwrap().kind(),
            ShapeKind::LogCall
        );
    }

    #[test]
    fn test_constants_and_groups() {
        assert_eq!(classify_term("3", 'x').unwrap(), TermShape::Constant);
        assert_eq!(classify_term("5y^2", 'x').unwrap(), TermShape::Constant);
        assert_eq!(classify_term("sin(2)", 'x').unwrap(), TermShape::Constant);
        assert_eq!(classify_term("sin^0(x)", 'x').unwrap(), TermShape::Constant);
        assert_eq!(
            classify_term("(x^2+x)", 'x').unwrap(),
            TermShape::Group {
                inner: "x^2+x".to_string()
            }
        );
    }

    #[test]
    fn test_unrecognized_shapes() {
        for term in [
            "x^x",
            "x*sin(x)",
            "2(x+1)",
            "ln^2(x)",
            "sin^1.5(x)",
            "x/0",
            "x/-0",
            "x^2x",
            "y/x",
        ] {
            assert_eq!(
                classify_term(term, 'x').unwrap().kind(),
                ShapeKind::Unrecognized,
                "{}",
                term
            );
        }
    }

    #[test]
    fn test_coefficient_rendering() {
        assert_eq!(Coefficient::one().prefix(1.0), "");
        assert_eq!(Coefficient::one().prefix(-1.0), "-");
        assert_eq!(Coefficient::one().standalone(1.0), "1");
        assert_eq!(coefficient(3.0, "y").prefix(2.0), "6y");
        assert_eq!(coefficient(1.0, "y").standalone(1.0), "y");
        assert_eq!(classify_term("(1)", 'x').unwrap().kind(), ShapeKind::Group);
    }
}
