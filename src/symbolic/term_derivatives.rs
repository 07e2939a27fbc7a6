//! Symbolic derivative of an expression, one term at a time.
//!
//! Every term is classified by [`classify_term`] and differentiated by the rule of its
//! shape. Function arguments go through the whole pipeline again (chain rule), so
//! `sin(x^2+x)` differentiates its argument as the expression `x^2+x`.
//!
//! A zero derivative is the empty string. The joined result keeps that convention, the
//! caller decides how to print it (see [`assemble_result`](crate::symbolic::assembler::assemble_result)).
//!
//! # Examples
//! ```
//! use RustedDiffCalc::symbolic::term_derivatives::differentiate_expression;
//! assert_eq!(differentiate_expression("x^2+3x", 'x').unwrap(), "2x+3");
//! assert_eq!(differentiate_expression("sin(2x)", 'x').unwrap(), "2cos(2x)");
//! ```
use crate::symbolic::assembler::join_terms;
use crate::symbolic::calc_errors::CalcError;
use crate::symbolic::term_segmenter::{Sign, segment_expression};
use crate::symbolic::term_shapes::{Coefficient, TermShape, classify_term};
use crate::symbolic::tokenizer::{FuncName, tokenize};
use crate::symbolic::utils::{format_number, parse_float};
use log::{debug, info};

/// derivative of the argument of a function call
#[derive(Debug, Clone, PartialEq)]
enum Chain {
    Zero,
    /// a plain numeral, folded into the coefficient
    Numeral(f64),
    /// any other derivative, `compound` if it has more than one term
    Factor {
        scale: f64,
        text: String,
        compound: bool,
    },
}

// more than one additive term at depth zero
fn is_compound(expr: &str) -> bool {
    !matches!(segment_expression(expr), Ok(seg) if seg.len() == 1)
}

fn bracketed_if(compound: bool, text: &str) -> String {
    if compound {
        format!("({})", text)
    } else {
        text.to_string()
    }
}

fn chain_factor(inner: &str, var: char) -> Result<Chain, CalcError> {
    let derivative = differentiate_expression(inner, var)?;
    if derivative.is_empty() {
        return Ok(Chain::Zero);
    }
    let segmentation = segment_expression(&derivative)?;
    if segmentation.len() > 1 {
        return Ok(Chain::Factor {
            scale: 1.0,
            text: derivative,
            compound: true,
        });
    }
    let scale = segmentation.leading.apply(1.0);
    let body = &segmentation.terms[0];
    match parse_float(body) {
        Ok(numeral) => Ok(Chain::Numeral(scale * numeral)),
        Err(_) => Ok(Chain::Factor {
            scale,
            text: body.clone(),
            compound: false,
        }),
    }
}

/// sign and body of fn'(u)
fn function_derivative(func: FuncName, inner: &str) -> (f64, String) {
    match func {
        FuncName::Sin => (1.0, format!("cos({})", inner)),
        FuncName::Cos => (-1.0, format!("sin({})", inner)),
        FuncName::Tan => (1.0, format!("sec^2({})", inner)),
        FuncName::Csc => (-1.0, format!("csc({0})*cot({0})", inner)),
        FuncName::Sec => (1.0, format!("sec({0})*tan({0})", inner)),
        FuncName::Cot => (-1.0, format!("csc^2({})", inner)),
        FuncName::Ln | FuncName::Log => (1.0, format!("1/({})", inner)),
    }
}

/// a*x^n -> a*n*x^(n-1)
fn power_rule(coefficient: &Coefficient, exponent: f64, var: char) -> String {
    if coefficient.is_zero() || exponent == 0.0 {
        return String::new();
    }
    let reduced = exponent - 1.0;
    if reduced == 0.0 {
        coefficient.standalone(exponent)
    } else if reduced == 1.0 {
        format!("{}{}", coefficient.prefix(exponent), var)
    } else {
        format!(
            "{}{}^{}",
            coefficient.prefix(exponent),
            var,
            format_number(reduced)
        )
    }
}

// coefficient * scale * outer * chain
fn compose(coefficient: &Coefficient, scale: f64, outer: &str, chain: Chain) -> String {
    match chain {
        Chain::Zero => String::new(),
        Chain::Numeral(c) => format!("{}{}", coefficient.prefix(scale * c), outer),
        Chain::Factor {
            scale: chain_scale,
            text,
            compound,
        } => format!(
            "{}{}*{}",
            coefficient.prefix(scale * chain_scale),
            outer,
            bracketed_if(compound, &text)
        ),
    }
}

/// a*fn(u) -> a*fn'(u)*u'
fn trig_rule(
    coefficient: &Coefficient,
    func: FuncName,
    inner: &str,
    var: char,
) -> Result<String, CalcError> {
    if coefficient.is_zero() {
        return Ok(String::new());
    }
    let chain = chain_factor(inner, var)?;
    let (sign, outer) = function_derivative(func, inner);
    Ok(compose(coefficient, sign, &outer, chain))
}

/// a*fn^n(u) -> a*n*fn^(n-1)(u)*fn'(u)*u'
fn trig_power_rule(
    coefficient: &Coefficient,
    func: FuncName,
    power: f64,
    inner: &str,
    var: char,
) -> Result<String, CalcError> {
    if coefficient.is_zero() {
        return Ok(String::new());
    }
    let chain = chain_factor(inner, var)?;
    let (sign, derivative) = function_derivative(func, inner);
    let reduced = power - 1.0;
    let lowered = if reduced == 1.0 {
        format!("{}({})", func, inner)
    } else {
        format!("{}^{}({})", func, format_number(reduced), inner)
    };
    let outer = format!("{}*{}", lowered, derivative);
    Ok(compose(coefficient, power * sign, &outer, chain))
}

/// a*ln(u) -> a*u'/u
fn log_rule(coefficient: &Coefficient, inner: &str, var: char) -> Result<String, CalcError> {
    if coefficient.is_zero() {
        return Ok(String::new());
    }
    let denominator = if tokenize(inner)?.len() == 1 {
        inner.trim().to_string()
    } else {
        format!("({})", inner)
    };
    let derivative = match chain_factor(inner, var)? {
        Chain::Zero => String::new(),
        Chain::Numeral(c) => format!("{}/{}", coefficient.standalone(c), denominator),
        Chain::Factor {
            scale,
            text,
            compound,
        } => {
            let prefix = coefficient.prefix(scale);
            if prefix.is_empty() || prefix == "-" {
                format!("{}{}/{}", prefix, bracketed_if(compound, &text), denominator)
            } else {
                format!("{}({})/{}", prefix, text, denominator)
            }
        }
    };
    Ok(derivative)
}

/// derivative of one term with respect to `var`, empty if it is zero
pub fn differentiate_term(term: &str, var: char) -> Result<String, CalcError> {
    let shape = classify_term(term, var)?;
    let derivative = match shape {
        TermShape::Constant => String::new(),
        TermShape::PolynomialPower {
            coefficient,
            exponent,
        } => power_rule(&coefficient, exponent, var),
        TermShape::TrigCall {
            coefficient,
            func,
            inner,
        } => trig_rule(&coefficient, func, &inner, var)?,
        TermShape::TrigPower {
            coefficient,
            func,
            power,
            inner,
        } => trig_power_rule(&coefficient, func, power, &inner, var)?,
        TermShape::LogCall {
            coefficient, inner, ..
        } => log_rule(&coefficient, &inner, var)?,
        TermShape::Group { inner } => {
            let derivative = differentiate_expression(&inner, var)?;
            if derivative.is_empty() {
                derivative
            } else {
                bracketed_if(is_compound(&derivative), &derivative)
            }
        }
        TermShape::Unrecognized(reason) => {
            return Err(CalcError::UnrecognizedTermShape {
                term: term.to_string(),
                reason,
            });
        }
    };
    debug!("d/d{} {} = '{}'", var, term, derivative);
    Ok(derivative)
}

/// derivative of a whole expression, empty if it is zero
pub fn differentiate_expression(expr: &str, var: char) -> Result<String, CalcError> {
    let segmentation = segment_expression(expr)?;
    let derivatives = segmentation
        .terms
        .iter()
        .map(|term| differentiate_term(term, var))
        .collect::<Result<Vec<String>, CalcError>>()?;
    let joined = join_terms(&segmentation, &derivatives);
    info!("d/d{} ({}) = {}", var, segmentation, joined);
    Ok(joined)
}

/// sign and body of a single-term derivative, `None` for a compound one
pub fn split_sign(derivative: &str) -> Option<(Sign, String)> {
    let segmentation = segment_expression(derivative).ok()?;
    if segmentation.len() == 1 {
        Some((segmentation.leading, segmentation.terms[0].clone()))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(expr: &str) -> String {
        differentiate_expression(expr, 'x').unwrap()
    }

    #[test]
    fn test_power_rule() {
        assert_eq!(d("x^2+3x"), "2x+3");
        assert_eq!(d("2x^3"), "6x^2");
        assert_eq!(d("x"), "1");
        assert_eq!(d("x^1"), "1");
        assert_eq!(d("x^0"), "");
        assert_eq!(d("x^-2"), "-2x^-3");
        assert_eq!(d("3x^2-5x+7"), "6x-5");
        assert_eq!(d("-x^2"), "-2x");
        assert_eq!(d("x^0.5"), "0.5x^-0.5");
        assert_eq!(d("x/-2"), "-0.5");
        assert_eq!(d("x*-3"), "-3");
        assert_eq!(d("x^-2+3*-x-x/-2"), "-2x^-3-3+0.5");
        assert_eq!(d("0.00000000001x^2"), "0.00000000002x");
        assert_eq!(d("0.00000000001x"), "0.00000000001");
    }

    #[test]
    fn test_constants_differentiate_to_empty() {
        assert_eq!(d("7"), "");
        assert_eq!(d("5+y"), "");
        assert_eq!(d("0x^2"), "");
    }

    #[test]
    fn test_trig_rules() {
        assert_eq!(d("sin(x)"), "cos(x)");
        assert_eq!(d("sin(2x)"), "2cos(2x)");
        assert_eq!(d("cos(3x)"), "-3sin(3x)");
        assert_eq!(d("2cos(x)"), "-2sin(x)");
        assert_eq!(d("tan(x)"), "sec^2(x)");
        assert_eq!(d("sec(x)"), "sec(x)*tan(x)");
        assert_eq!(d("csc(x)"), "-csc(x)*cot(x)");
        assert_eq!(d("cot(x)"), "-csc^2(x)");
        assert_eq!(d("x^2+cos(x)"), "2x-sin(x)");
        assert_eq!(d("x^2-cos(x)"), "2x+sin(x)");
    }

    #[test]
    fn test_chain_rule() {
        assert_eq!(d("sin(x^2)"), "cos(x^2)*2x");
        assert_eq!(d("sin(x^2+x)"), "cos(x^2+x)*(2x+1)");
        assert_eq!(d("cos(-x)"), "sin(-x)");
        assert_eq!(d("sin(5-x)"), "-cos(5-x)");
        assert_eq!(d("sin(y)"), "");
    }

    #[test]
    fn test_trig_powers() {
        assert_eq!(d("sin^2(x)"), "2sin(x)*cos(x)");
        assert_eq!(d("cos^3(x)"), "-3cos^2(x)*sin(x)");
        assert_eq!(d("sin^2(3x)"), "6sin(3x)*cos(3x)");
    }

    #[test]
    fn test_log_rule() {
        assert_eq!(d("ln(x)"), "1/x");
        assert_eq!(d("3log(x)"), "3/x");
        assert_eq!(d("ln(2x)"), "2/(2x)");
        assert_eq!(d("ln(x^2+1)"), "2x/(x^2+1)");
        assert_eq!(d("ln(x^2+x)"), "(2x+1)/(x^2+x)");
        assert_eq!(d("2ln(x^2)"), "2(2x)/(x^2)");
    }

    #[test]
    fn test_symbolic_factors_and_groups() {
        assert_eq!(d("3xy"), "3y");
        assert_eq!(d("x^2y"), "2yx");
        assert_eq!(d("(x^2+x)"), "(2x+1)");
        assert_eq!(d("-(x^2)"), "-2x");
        assert_eq!(d("(5)"), "");
    }

    #[test]
    fn test_unrecognized_term_is_an_error() {
        assert!(matches!(
            differentiate_expression("x^2+x*sin(x)", 'x'),
            Err(CalcError::UnrecognizedTermShape { term, .. }) if term == "x*sin(x)"
        ));
        assert_eq!(
            differentiate_expression("x+", 'x'),
            Err(CalcError::EmptyTerm { position: 1 })
        );
    }

    #[test]
    fn test_split_sign() {
        assert_eq!(split_sign("-2x"), Some((Sign::Minus, "2x".to_string())));
        assert_eq!(split_sign("3"), Some((Sign::Plus, "3".to_string())));
        assert_eq!(split_sign("2x+1"), None);
    }
}
