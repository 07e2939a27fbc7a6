//! Splits an expression into its additive terms.
//!
//! A `+` or `-` splits only at bracket depth zero and only when it is not the sign of an
//! exponent or of a factor (`x^-2`, `3*-x`, `x/-2` stay whole). The sign in front of the
//! first term is kept apart from the term text as the leading sign.
//!```text
//!      "-2x^3+sin(x+1)-3"
//!       |  term   |  term   | term |
//!       - 2x^3    + sin(x+1)  - 3
//! leading = '-',  signs = ['+', '-']
//!```
use crate::symbolic::calc_errors::CalcError;
use crate::symbolic::utils::{string_space_remove, string_split};
use log::debug;
use std::fmt;
use strum_macros::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Sign {
    #[strum(to_string = "+")]
    Plus,
    #[strum(to_string = "-")]
    Minus,
}

impl Sign {
    pub fn from_char(c: char) -> Option<Sign> {
        match c {
            '+' => Some(Sign::Plus),
            '-' => Some(Sign::Minus),
            _ => None,
        }
    }

    pub fn flip(self) -> Sign {
        match self {
            Sign::Plus => Sign::Minus,
            Sign::Minus => Sign::Plus,
        }
    }

    pub fn apply(self, value: f64) -> f64 {
        match self {
            Sign::Plus => value,
            Sign::Minus => -value,
        }
    }
}

/// terms of an expression together with the signs joining them
#[derive(Debug, Clone, PartialEq)]
pub struct Segmentation {
    /// sign written in front of the first term, Plus if there is none
    pub leading: Sign,
    pub terms: Vec<String>,
    /// `signs[i]` stands between `terms[i]` and `terms[i + 1]`
    pub signs: Vec<Sign>,
}

impl Segmentation {
    /// every term paired with the sign in front of it
    pub fn signed_terms(&self) -> impl Iterator<Item = (Sign, &str)> {
        std::iter::once(self.leading)
            .chain(self.signs.iter().copied())
            .zip(self.terms.iter().map(|t| t.as_str()))
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl fmt::Display for Segmentation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, (sign, term)) in self.signed_terms().enumerate() {
            if i > 0 || sign == Sign::Minus {
                write!(f, "{}", sign)?;
            }
            write!(f, "{}", term)?;
        }
        Ok(())
    }
}

/// splits `expr` into additive terms, whitespace is removed first
pub fn segment_expression(expr: &str) -> Result<Segmentation, CalcError> {
    let expr = string_space_remove(expr);
    let first = expr.chars().next().ok_or(CalcError::EmptyExpression)?;

    let (leading, mut split_index) = match Sign::from_char(first) {
        Some(sign) => (sign, 1),
        None => (Sign::Plus, 0),
    };
    let mut prev = if split_index == 1 { Some(first) } else { None };

    let mut left_par = 0usize;
    let mut right_par = 0usize;
    let mut terms = Vec::new();
    let mut signs = Vec::new();
    let mut empty_term_at = None;

    for (i, c) in expr.char_indices().skip(split_index) {
        if c == '(' {
            left_par += 1;
        } else if c == ')' {
            right_par += 1;
        }

        let guarded = matches!(prev, Some('^') | Some('*') | Some('/'));
        if let Some(sign) = Sign::from_char(c) {
            if !guarded && left_par == right_par {
                let term = string_split(&expr, split_index, i);
                debug!("term boundary '{}' at {}: term '{}'", c, i, term);
                if term.is_empty() && empty_term_at.is_none() {
                    empty_term_at = Some(i);
                }
                terms.push(term.to_string());
                signs.push(sign);
                split_index = i + 1;
            }
        }
        prev = Some(c);
    }

    let last = string_split(&expr, split_index, expr.len());
    if last.is_empty() && empty_term_at.is_none() {
        empty_term_at = Some(split_index.saturating_sub(1));
    }
    terms.push(last.to_string());

    if left_par != right_par {
        return Err(CalcError::UnbalancedParentheses {
            open: left_par,
            close: right_par,
        });
    }
    if let Some(position) = empty_term_at {
        return Err(CalcError::EmptyTerm { position });
    }

    debug!("segmented '{}' into {:?} with signs {:?}", expr, terms, signs);
    Ok(Segmentation {
        leading,
        terms,
        signs,
    })
}
