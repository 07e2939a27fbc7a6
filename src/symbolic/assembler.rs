//! Joins per-term derivatives back into one printable expression.
use crate::symbolic::term_segmenter::{Segmentation, Sign};

/// joins derivative strings with the signs of the original terms
///
/// An empty derivative is a zero term and is skipped together with its sign. A derivative
/// that starts with `-` takes the place of the joining sign: `+` `-2x` becomes `-2x`,
/// `-` `-2x` becomes `+2x`. No `+` is written in front of the first emitted term.
pub fn join_terms(segmentation: &Segmentation, derivatives: &[String]) -> String {
    let mut result = String::new();
    for ((sign, _), derivative) in segmentation.signed_terms().zip(derivatives.iter()) {
        if derivative.is_empty() {
            continue;
        }
        let (sign, body) = match derivative.strip_prefix('-') {
            Some(rest) => (sign.flip(), rest),
            None => (sign, derivative.as_str()),
        };
        if sign == Sign::Minus || !result.is_empty() {
            result.push_str(&sign.to_string());
        }
        result.push_str(body);
    }
    result
}

/// "f'(x)"
pub fn derivative_label(var: char) -> String {
    format!("f'({})", var)
}

/// "dy/dx"
pub fn implicit_label(dependent: char, independent: char) -> String {
    format!("d{}/d{}", dependent, independent)
}

/// label and body as printed to the user, an empty body is the zero derivative
pub fn assemble_result(label: &str, body: &str) -> String {
    if body.is_empty() {
        format!("{} = 0", label)
    } else {
        format!("{} = {}", label, body)
    }
}
