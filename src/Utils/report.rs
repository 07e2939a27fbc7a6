//! Table of the terms of an expression with their shapes and derivatives.
use crate::symbolic::calc_errors::CalcError;
use crate::symbolic::term_derivatives::differentiate_term;
use crate::symbolic::term_segmenter::{Sign, segment_expression};
use crate::symbolic::term_shapes::classify_term;
use tabled::{builder::Builder, settings::Style};

/// one row per term: signed term text, shape name and derivative (or the reason it has none)
pub fn term_report(expr: &str, var: char) -> Result<String, CalcError> {
    let segmentation = segment_expression(expr)?;
    let mut builder = Builder::default();
    builder.push_record(["term", "shape", "derivative"]);
    for (sign, term) in segmentation.signed_terms() {
        let shape = classify_term(term, var)?;
        let derivative = match differentiate_term(term, var) {
            Ok(d) if d.is_empty() => "0".to_string(),
            Ok(d) => d,
            Err(e) => e.to_string(),
        };
        let signed = match sign {
            Sign::Plus => term.to_string(),
            Sign::Minus => format!("-{}", term),
        };
        builder.push_record([signed, shape.kind().to_string(), derivative]);
    }
    let mut table = builder.build();
    table.with(Style::modern_rounded());
    Ok(table.to_string())
}
