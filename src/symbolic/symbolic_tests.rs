//////////////////////////////////////////////////////////////////////////////////////////////
//                    PIPELINE TESTS: segmenter -> differentiator -> assembler -> evaluator
//////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use crate::symbolic::assembler::{assemble_result, derivative_label};
    use crate::symbolic::calc_errors::CalcError;
    use crate::symbolic::derivative_check::compare_num1D;
    use crate::symbolic::evaluator::evaluate_expression;
    use crate::symbolic::term_derivatives::{differentiate_expression, differentiate_term};
    use crate::symbolic::term_segmenter::{Sign, segment_expression};
    use crate::symbolic::utils::format_coefficient;
    use approx::assert_relative_eq;

    #[test]
    fn test_end_to_end_derivative_output() {
        let body = differentiate_expression("x^2+3x", 'x').unwrap();
        assert_eq!(
            assemble_result(&derivative_label('x'), &body),
            "f'(x) = 2x+3"
        );
        let body = differentiate_expression("42", 'x').unwrap();
        assert_eq!(assemble_result(&derivative_label('x'), &body), "f'(x) = 0");
    }

    #[test]
    fn test_required_properties() {
        let seg = segment_expression("2x^3+sin(x)-3").unwrap();
        assert_eq!(seg.terms, vec!["2x^3", "sin(x)", "3"]);
        assert_eq!(seg.signs, vec![Sign::Plus, Sign::Minus]);
        assert_eq!(differentiate_term("2x^3", 'x').unwrap(), "6x^2");
        assert_eq!(differentiate_term("x", 'x').unwrap(), "1");
        assert_eq!(differentiate_term("17", 'x').unwrap(), "");
        assert_eq!(differentiate_term("sin(2x)", 'x').unwrap(), "2cos(2x)");
        assert_eq!(format_coefficient(1.0), "");
        assert_eq!(format_coefficient(-1.0), "-");
        assert_eq!(format_coefficient(6.0), "6");
    }

    #[test]
    fn test_joined_derivative_resegments_to_same_structure() {
        for expr in [
            "x^3+sin(x)-2x^2",
            "4x^2-sin(x^2+x)+ln(x)",
            "sin^2(x)+tan(3x)-x^5",
            "2x-(x^2+x)",
        ] {
            let input = segment_expression(expr).unwrap();
            let derivative = differentiate_expression(expr, 'x').unwrap();
            let output = segment_expression(&derivative).unwrap();
            assert_eq!(output.len(), input.len(), "{} -> {}", expr, derivative);
            assert_eq!(output.signs, input.signs, "{} -> {}", expr, derivative);
        }
    }

    #[test]
    fn test_implicit_partials_keep_other_variable() {
        assert_eq!(differentiate_expression("3xy+y^2", 'x').unwrap(), "3y");
        assert_eq!(differentiate_expression("3xy+y^2", 'y').unwrap(), "3x+2y");
        assert_eq!(
            differentiate_expression("sin(y)x^2", 'x').unwrap(),
            "2sin(y)x"
        );
    }

    #[test]
    fn test_derivative_evaluates_like_finite_difference() {
        let derivative = differentiate_expression("x^3-2sin(x)+ln(x^2+1)", 'x').unwrap();
        let x: f64 = 0.8;
        let expected = 3.0 * x * x - 2.0 * x.cos() + 2.0 * x / (x * x + 1.0);
        assert_relative_eq!(
            evaluate_expression(&derivative, &["x"], &[x]).unwrap(),
            expected,
            epsilon = 1e-12
        );
        let (_, passed) =
            compare_num1D("x^3-2sin(x)+ln(x^2+1)", 'x', 0.1, 2.0, 30, 1e-5).unwrap();
        assert!(passed);
    }

    #[test]
    fn test_errors_surface_per_operation() {
        assert!(matches!(
            differentiate_expression("sin(x+1", 'x'),
            Err(CalcError::UnbalancedParentheses { open: 1, close: 0 })
        ));
        assert!(matches!(
            differentiate_expression("2x^x", 'x'),
            Err(CalcError::UnrecognizedTermShape { .. })
        ));
        assert!(matches!(
            differentiate_expression("2x$", 'x'),
            Err(CalcError::InvalidCharacter { ch: '$', .. })
        ));
        assert!(matches!(
            evaluate_expression("2..5x", &["x"], &[1.0]),
            Err(CalcError::MalformedNumeral(_))
        ));
    }
}
