//! Numeric value of an expression at a point.
//!
//! The expression is segmented into terms first; each term is parsed into an [`Expr`]
//! tree and evaluated on its own, then the signed values are summed. The same grammar
//! reads every term, so `3x^2`, `3*x^2` and `x^2*3` all give the same number.
use crate::symbolic::calc_errors::CalcError;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::term_segmenter::{Segmentation, segment_expression};
use log::debug;

/// sum of the signed term values, `vars[i]` takes `values[i]`
pub fn evaluate_terms(
    segmentation: &Segmentation,
    vars: &[&str],
    values: &[f64],
) -> Result<f64, CalcError> {
    let mut cal_result = 0.0;
    for (sign, term) in segmentation.signed_terms() {
        let expr = Expr::parse_expression(term)?;
        let value = expr.eval_expression(vars, values)?;
        debug!("term {}{} = {}", sign, term, value);
        cal_result += sign.apply(value);
    }
    if !cal_result.is_finite() {
        return Err(CalcError::NonFiniteResult(segmentation.to_string()));
    }
    Ok(cal_result)
}

pub fn evaluate_expression(expr: &str, vars: &[&str], values: &[f64]) -> Result<f64, CalcError> {
    let segmentation = segment_expression(expr)?;
    evaluate_terms(&segmentation, vars, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_polynomial_value() {
        assert_relative_eq!(
            evaluate_expression("x^2+3x", &["x"], &[2.0]).unwrap(),
            10.0
        );
        assert_relative_eq!(
            evaluate_expression("-2x^3+x-1", &["x"], &[1.5]).unwrap(),
            -6.25
        );
    }

    #[test]
    fn test_functions_and_signs() {
        assert_relative_eq!(
            evaluate_expression("sin(x)^2+cos(x)^2", &["x"], &[0.7]).unwrap(),
            1.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            evaluate_expression("2cos(x)-ln(x)", &["x"], &[1.0]).unwrap(),
            2.0 * 1.0f64.cos(),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            evaluate_expression("x^-2+3*-x", &["x"], &[2.0]).unwrap(),
            0.25 - 6.0
        );
    }

    #[test]
    fn test_two_variables() {
        assert_relative_eq!(
            evaluate_expression("x^2+y^2-25", &["x", "y"], &[3.0, 4.0]).unwrap(),
            0.0
        );
    }

    #[test]
    fn test_evaluation_errors() {
        assert_eq!(
            evaluate_expression("x+y", &["x"], &[1.0]),
            Err(CalcError::UnboundVariable("y".to_string()))
        );
        assert!(matches!(
            evaluate_expression("1/x", &["x"], &[0.0]),
            Err(CalcError::NonFiniteResult(_))
        ));
        assert!(matches!(
            evaluate_expression("ln(x)", &["x"], &[-1.0]),
            Err(CalcError::NonFiniteResult(_))
        ));
    }
}
