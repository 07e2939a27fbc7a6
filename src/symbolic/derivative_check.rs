//! Numerical check of a symbolic derivative.
//!
//! The analytical derivative is evaluated on a grid and compared with the central
//! difference of the original expression on the same grid; the mean-square style norm of
//! the difference must stay below a threshold.
use crate::symbolic::calc_errors::CalcError;
use crate::symbolic::evaluator::evaluate_expression;
use crate::symbolic::term_derivatives::differentiate_expression;
use crate::symbolic::utils::{linspace, norm, numerical_derivative};
use log::{info, warn};

/// compares d/d`var` of `expr` with its numerical derivative on [start, end];
/// returns the norm of the difference and whether it is below `max_norm`
pub fn compare_num1D(
    expr: &str,
    var: char,
    start: f64,
    end: f64,
    num_values: usize,
    max_norm: f64,
) -> Result<(f64, bool), CalcError> {
    let derivative = differentiate_expression(expr, var)?;
    let name = var.to_string();
    let vars = [name.as_str()];
    let domain = linspace(start, end, num_values);

    let analytical = domain
        .iter()
        .map(|&x| {
            if derivative.is_empty() {
                Ok(0.0)
            } else {
                evaluate_expression(&derivative, &vars, &[x])
            }
        })
        .collect::<Result<Vec<f64>, CalcError>>()?;

    let step = if num_values > 1 {
        (1.0 / 1e4) * (end - start) / (num_values as f64 - 1.0)
    } else {
        1e-5
    };
    let numerical = numerical_derivative(
        |x| evaluate_expression(expr, &vars, &[x]),
        &domain,
        step,
    )?;

    let norma_val = norm(&analytical, &numerical);
    let passed = norma_val < max_norm;
    if passed {
        info!("d/d{} ({}) = {} agrees numerically, norm {:e}", var, expr, derivative, norma_val);
    } else {
        warn!("d/d{} ({}) = {} differs numerically, norm {:e}", var, expr, derivative, norma_val);
    }
    Ok((norma_val, passed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polynomials_agree() {
        for expr in ["x^2+3x", "2x^3-x+7", "x^-2", "-4x^0.5"] {
            let (norma, passed) = compare_num1D(expr, 'x', 0.5, 2.0, 20, 1e-5).unwrap();
            assert!(passed, "{} norm {}", expr, norma);
        }
    }

    #[test]
    fn test_functions_agree() {
        for expr in [
            "sin(2x)",
            "cos(x^2+x)",
            "3tan(x)",
            "sec(x)-csc(x)",
            "cot(3x)",
            "sin^2(x)",
            "-2cos^3(2x)",
            "ln(x^2+1)",
            "2log(3x)",
            "(x^2-sin(x))",
        ] {
            let (norma, passed) = compare_num1D(expr, 'x', 0.5, 1.2, 20, 1e-5).unwrap();
            assert!(passed, "{} norm {}", expr, norma);
        }
    }

    #[test]
    fn test_constant_has_zero_derivative() {
        let (norma, passed) = compare_num1D("5", 'x', 0.0, 1.0, 5, 1e-8).unwrap();
        assert!(passed);
        assert_eq!(norma, 0.0);
    }
}
