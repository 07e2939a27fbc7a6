#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// error type of the whole calculator
pub mod calc_errors;
/// string helpers: whitespace removal, slicing, bracket bookkeeping, numeral formatting and parsing
pub mod utils;
/// turns an expression string into numerals, variables, function names and operators
pub mod tokenizer;
/// # Term segmenter
/// splits an expression into additive terms and the signs between them
///# Example
/// ```
/// use RustedDiffCalc::symbolic::term_segmenter::segment_expression;
/// let seg = segment_expression("2x^3+sin(x)-3").unwrap();
/// assert_eq!(seg.terms, vec!["2x^3", "sin(x)", "3"]);
/// ```
pub mod term_segmenter;
/// decides the shape of a term: polynomial power, trig call, trig power, log call, group
pub mod term_shapes;
/// ____________________________________________________________________________________________________________________________
/// # Term derivatives
/// derivative of every term by the rule of its shape, chain rule by recursion into function arguments
///# Example
/// ```
/// use RustedDiffCalc::symbolic::term_derivatives::differentiate_expression;
/// let df_dx = differentiate_expression("x^2+cos(3x)", 'x').unwrap();
/// assert_eq!(df_dx, "2x-3sin(3x)");
/// ```
pub mod term_derivatives;
/// joins derivative terms with their signs and labels the result
pub mod assembler;
/// # Symbolic engine
/// expression tree of a term and its numerical evaluation
///# Example
/// ```
/// use RustedDiffCalc::symbolic::symbolic_engine::Expr;
/// let expr = Expr::parse_expression("3x^2+sin(y)").unwrap();
/// let value = expr.eval_expression(&["x", "y"], &[1.0, 0.0]).unwrap();
/// assert_eq!(value, 3.0);
/// ```
pub mod symbolic_engine;
/// value of an expression at a point, term by term
pub mod evaluator;
/// dy/dx and dx/dy of an implicit curve F(x, y) = 0
pub mod implicit;
/// compares a symbolic derivative with a central finite difference
pub mod derivative_check;
mod symbolic_tests;
