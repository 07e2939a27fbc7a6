//! Implicit differentiation of F(x, y) = 0.
//!
//! An equation `lhs = rhs` is moved to one side as `lhs-(rhs)`; an expression without `=`
//! is taken as F itself. The implicit derivative is the quotient of partial derivatives
//!```text
//!   dy/dx = -F_x / F_y          dx/dy = -F_y / F_x
//!```
//! Each partial derivative is an ordinary term-by-term derivative in which the other
//! variable is a constant factor.
use crate::symbolic::calc_errors::CalcError;
use crate::symbolic::term_derivatives::{differentiate_expression, split_sign};
use crate::symbolic::term_segmenter::Sign;
use crate::symbolic::tokenizer::tokenize;
use crate::symbolic::utils::find_char_positions_outside_brackets;
use log::info;

// splits "lhs=rhs" at the first depth-zero '='
fn split_equation(expr: &str) -> Result<Option<(&str, &str)>, CalcError> {
    let Some(at) = find_char_positions_outside_brackets(expr, '=') else {
        return Ok(None);
    };
    let lhs = expr[..at].trim();
    let rhs = expr[at + 1..].trim();
    if lhs.is_empty() || rhs.is_empty() {
        return Err(CalcError::Syntax {
            message: "an equation needs both sides".to_string(),
            position: at,
        });
    }
    if let Some(second) = rhs.find('=') {
        return Err(CalcError::Syntax {
            message: "more than one '=' in the equation".to_string(),
            position: at + 1 + second,
        });
    }
    Ok(Some((lhs, rhs)))
}

/// F for `lhs=rhs` is `lhs-(rhs)`, an expression without `=` is returned unchanged
pub fn implicit_form(expr: &str) -> Result<String, CalcError> {
    match split_equation(expr)? {
        Some((lhs, rhs)) => Ok(format!("{}-({})", lhs, rhs)),
        None => Ok(expr.trim().to_string()),
    }
}

/// `dependent=rhs` is read as the function rhs, any other equation as its implicit form
pub fn explicit_form(expr: &str, dependent: char) -> Result<String, CalcError> {
    match split_equation(expr)? {
        Some((lhs, rhs)) if lhs == dependent.to_string() => Ok(rhs.to_string()),
        Some((lhs, rhs)) => Ok(format!("{}-({})", lhs, rhs)),
        None => Ok(expr.trim().to_string()),
    }
}

// a single token needs no brackets in a denominator
fn denominator_text(expr: &str) -> Result<String, CalcError> {
    if tokenize(expr)?.len() == 1 {
        Ok(expr.to_string())
    } else {
        Ok(format!("({})", expr))
    }
}

/// d(dependent)/d(independent) of the curve F = 0, empty if it is zero
pub fn implicit_derivative(
    expr: &str,
    dependent: char,
    independent: char,
) -> Result<String, CalcError> {
    let form = implicit_form(expr)?;
    let numerator = differentiate_expression(&form, independent)?;
    let denominator = differentiate_expression(&form, dependent)?;
    info!(
        "F = {}, F_{} = '{}', F_{} = '{}'",
        form, independent, numerator, dependent, denominator
    );
    if denominator.is_empty() {
        return Err(CalcError::ImplicitUndefined {
            variable: dependent,
        });
    }
    if numerator.is_empty() {
        return Ok(String::new());
    }
    let negated = match split_sign(&numerator) {
        Some((Sign::Minus, body)) => body,
        Some((Sign::Plus, body)) => format!("-{}", body),
        None => format!("-({})", numerator),
    };
    match denominator.as_str() {
        "1" => return Ok(negated),
        "-1" => return Ok(numerator),
        _ => {}
    }
    Ok(format!("{}/{}", negated, denominator_text(&denominator)?))
}
