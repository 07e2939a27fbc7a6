// the collection of utility functions for scanning expression strings: whitespace removal,
// index slicing, bracket bookkeeping and numeral formatting/parsing
use crate::symbolic::calc_errors::CalcError;

/// removes every whitespace character, the expression is never scanned with spaces inside
pub fn string_space_remove(t: &str) -> String {
    t.chars().filter(|c| !c.is_whitespace()).collect()
}

/// substring between byte indices `from..to`; out of range bounds are clamped
pub fn string_split(t: &str, from: usize, to: usize) -> &str {
    let to = to.min(t.len());
    let from = from.min(to);
    t.get(from..to).unwrap_or("")
}

// code finds the position of the bracket closing the one at `bracket_start`
pub fn find_pair_to_this_bracket(input: &str, bracket_start: usize) -> Option<usize> {
    if input.as_bytes().get(bracket_start) != Some(&b'(') {
        return None;
    }
    let mut stack = 0;
    for (i, c) in input.char_indices().skip_while(|(i, _)| *i < bracket_start) {
        if c == '(' {
            stack += 1;
        } else if c == ')' {
            stack -= 1;
            if stack == 0 {
                return Some(i);
            }
        }
    }
    None
}

/// "(x+1)" is wrapped, "(x+1)*(x-1)" is not
pub fn is_wrapped_in_brackets(s: &str) -> bool {
    s.starts_with('(') && find_pair_to_this_bracket(s, 0) == Some(s.len() - 1)
}

// find position of the first given char that is outside brackets
pub fn find_char_positions_outside_brackets(s: &str, c: char) -> Option<usize> {
    let mut depth = 0;
    for (i, ch) in s.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth -= 1,
            _ if ch == c && depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

/// digits and the decimal point
pub fn is_number(t: char) -> bool {
    t.is_ascii_digit() || t == '.'
}

/// literal decimal form of a numeral: 6.0 prints "6", 2.5 prints "2.5"
pub fn format_number(n: f64) -> String {
    // float noise like 0.30000000000000004 is cut at 12 significant digits
    let rounded = format!("{:.11e}", n).parse::<f64>().unwrap_or(n);
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{}", rounded)
}

/// numeral standing in front of a body: 1 prints "", -1 prints "-", anything else literally
pub fn format_coefficient(n: f64) -> String {
    let text = format_number(n);
    match text.as_str() {
        "1" => String::new(),
        "-1" => "-".to_string(),
        _ => text,
    }
}

pub fn parse_int(t: &str) -> Result<i64, CalcError> {
    t.trim()
        .parse::<i64>()
        .map_err(|_| CalcError::MalformedNumeral(t.to_string()))
}

pub fn parse_float(t: &str) -> Result<f64, CalcError> {
    let value = t
        .trim()
        .parse::<f64>()
        .map_err(|_| CalcError::MalformedNumeral(t.to_string()))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::MalformedNumeral(t.to_string()))
    }
}

pub fn linspace(start: f64, end: f64, num_values: usize) -> Vec<f64> {
    if num_values < 2 {
        return vec![start; num_values];
    }
    let step = (end - start) / (num_values as f64 - 1.0);
    (0..num_values).map(|i| start + i as f64 * step).collect()
}

/// central difference (f(x+h) - f(x-h)) / 2h at every point
pub fn numerical_derivative<F>(f: F, x_values: &[f64], h: f64) -> Result<Vec<f64>, CalcError>
where
    F: Fn(f64) -> Result<f64, CalcError>,
{
    let mut derivatives = Vec::with_capacity(x_values.len());
    for &x in x_values {
        let f_x_plus_h = f(x + h)?;
        let f_x_minus_h = f(x - h)?;
        derivatives.push((f_x_plus_h - f_x_minus_h) / (2.0 * h));
    }
    Ok(derivatives)
}

// compute norm of two vectors
pub fn norm(x: &[f64], y: &[f64]) -> f64 {
    if x.is_empty() {
        return 0.0;
    }
    (1.0 / x.len() as f64)
        * x.iter()
            .zip(y.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f64>()
            .sqrt()
}
