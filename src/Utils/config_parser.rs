/// parse a configuration document with structure like
/// "calculator  variable: x  loglevel: info  show_terms: true" which has section titles and
/// pairs key-vector of values, then read the `calculator` section into [`CalcConfig`].
/// Lines starting with //, #, % or ; are comments.
///```text
/// // calculator settings
/// calculator
///   variable: t
///   implicit_variable: s
///   loglevel: info
///   log_file: auto
///   show_terms: true
///```
use crate::symbolic::calc_errors::CalcError;
use crate::Utils::logger::parse_log_level;
use log::LevelFilter;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{alpha1, alphanumeric1, multispace0, space0},
    combinator::{map, map_res, recognize},
    multi::{many0, many1, separated_list0},
    sequence::{delimited, pair, separated_pair, terminated},
};
use std::collections::HashMap;
use std::fmt::Display;
use std::path::Path;

pub type SectionMap = HashMap<String, Vec<Value>>;
pub type DocumentMap = HashMap<String, SectionMap>;

/// enum to represent different value types:
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Float(f64),
    Integer(i64),
    Boolean(bool),
}

impl Value {
    pub fn as_string(&self) -> Option<&String> {
        if let Value::String(s) = self {
            Some(s)
        } else {
            None
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        if let Value::Boolean(b) = self {
            Some(*b)
        } else {
            None
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Float(_) => "float",
            Value::Integer(_) => "integer",
            Value::Boolean(_) => "boolean",
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::Float(val) => write!(f, "{}", val),
            Value::Integer(val) => write!(f, "{}", val),
            Value::Boolean(val) => write!(f, "{}", val),
        }
    }
}

/// word characters without spaces: letters, digits and '_', not starting with a digit
fn parse_identifier(input: &str) -> IResult<&str, String> {
    let parser = recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ));
    map(parser, String::from).parse(input)
}

/// Parses a title, trailing whitespace is dropped
fn parse_title(input: &str) -> IResult<&str, String> {
    let (input, result) = parse_identifier(input)?;
    Ok((input.trim_start(), result))
}

fn parse_key(input: &str) -> IResult<&str, String> {
    parse_identifier(input)
}

fn parse_value(input: &str) -> IResult<&str, Value> {
    // a single value runs up to a comma, whitespace or semicolon
    let value_parser = take_while1(|c: char| !matches!(c, ',' | ' ' | '\t' | '\r' | '\n' | ';'));
    let mut value_parser = map_res(value_parser, |s: &str| -> Result<Value, String> {
        if let Ok(val) = s.parse::<i64>() {
            Ok(Value::Integer(val))
        } else if let Ok(val) = s.parse::<f64>() {
            Ok(Value::Float(val))
        } else if let Ok(val) = s.parse::<bool>() {
            Ok(Value::Boolean(val))
        } else {
            Ok(Value::String(s.to_string()))
        }
    });
    value_parser.parse(input)
}

fn parse_value_list(input: &str) -> IResult<&str, Vec<Value>> {
    // values stay on the line of their key
    let (input, _) = space0(input)?;
    let separator_coma = delimited(space0, tag(","), space0);
    separated_list0(separator_coma, parse_value).parse(input)
}

/// Parses a key-value pair where value is a list
fn parse_key_value_pair(input: &str) -> IResult<&str, (String, Vec<Value>)> {
    let colon_separator = delimited(space0, tag(":"), space0);
    let mut parser = separated_pair(parse_key, colon_separator, parse_value_list);
    let (input, result) = parser.parse(input)?;
    Ok((input.trim_start(), result))
}

/// Parses a section with a title and one or more key-value pairs
fn parse_section(input: &str) -> IResult<&str, (String, SectionMap)> {
    let (input, _) = space0(input)?;
    let (input, title) = parse_title(input)?;
    let (input, _) = multispace0(input)?;
    let (input, pairs) = many1(terminated(parse_key_value_pair, space0)).parse(input)?;
    let section_map = pairs.into_iter().collect::<SectionMap>();
    Ok((input, (title, section_map)))
}

/// Filters out comment lines (starting with //, #, %, or ;) and blank lines
fn filter_comments(input: &str) -> String {
    input
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("//")
                && !trimmed.starts_with('#')
                && !trimmed.starts_with('%')
                && !trimmed.starts_with(';')
                && !trimmed.is_empty()
        })
        .collect::<Vec<&str>>()
        .join("\n")
}

/// Parses the entire document into a map of sections
pub fn parse_document(input: &str) -> Result<DocumentMap, CalcError> {
    let filtered = filter_comments(input);
    if filtered.trim().is_empty() {
        return Ok(DocumentMap::new());
    }
    let mut parser = many1(delimited(space0, parse_section, multispace0));
    let (remaining, sections) = parser
        .parse(filtered.as_str())
        .map_err(|e| CalcError::Config(format!("parsing error: {:?}", e)))?;
    if !remaining.trim().is_empty() {
        return Err(CalcError::Config(format!(
            "failed to parse entire document, remaining: '{}'",
            remaining
        )));
    }
    Ok(sections.into_iter().collect::<DocumentMap>())
}

pub const SECTION: &str = "calculator";
const KEYS: [&str; 6] = [
    "variable",
    "implicit_variable",
    "loglevel",
    "log_file",
    "show_terms",
    "verify_derivative",
];

/// settings of one calculator run
#[derive(Debug, Clone, PartialEq)]
pub struct CalcConfig {
    /// differentiation variable
    pub variable: char,
    /// second variable of the implicit pair
    pub implicit_variable: char,
    pub loglevel: LevelFilter,
    /// path of the log file or "auto", no file logging if None
    pub log_file: Option<String>,
    /// print the term table after a differentiation
    pub show_terms: bool,
    /// compare every derivative with a finite difference
    pub verify_derivative: bool,
}

impl Default for CalcConfig {
    fn default() -> Self {
        CalcConfig {
            variable: 'x',
            implicit_variable: 'y',
            loglevel: LevelFilter::Warn,
            log_file: None,
            show_terms: false,
            verify_derivative: false,
        }
    }
}

// single value of a key, empty lists read as missing
fn single_value<'a>(key: &str, values: &'a [Value]) -> Result<Option<&'a Value>, CalcError> {
    match values {
        [] => Ok(None),
        [value] => Ok(Some(value)),
        _ => Err(CalcError::Config(format!(
            "key '{}' takes one value, got {}",
            key,
            values.len()
        ))),
    }
}

fn wrong_type(key: &str, expected: &str, value: &Value) -> CalcError {
    CalcError::Config(format!(
        "key '{}' must be a {}, got {} '{}'",
        key,
        expected,
        value.type_name(),
        value
    ))
}

fn read_letter(key: &str, value: &Value) -> Result<char, CalcError> {
    let text = value
        .as_string()
        .ok_or_else(|| wrong_type(key, "single letter", value))?;
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => Ok(c),
        _ => Err(wrong_type(key, "single letter", value)),
    }
}

fn read_bool(key: &str, value: &Value) -> Result<bool, CalcError> {
    value
        .as_boolean()
        .ok_or_else(|| wrong_type(key, "boolean", value))
}

impl CalcConfig {
    /// reads the `calculator` section of a document, a missing section gives the defaults
    pub fn from_document(input: &str) -> Result<CalcConfig, CalcError> {
        let document = parse_document(input)?;
        let mut config = CalcConfig::default();
        let Some(section) = document.get(SECTION) else {
            return Ok(config);
        };
        for (key, values) in section {
            if !KEYS.contains(&key.as_str()) {
                return Err(CalcError::Config(format!(
                    "unknown key '{}' in section {}, expected one of {}",
                    key,
                    SECTION,
                    KEYS.join(", ")
                )));
            }
            let Some(value) = single_value(key, values)? else {
                continue;
            };
            match key.as_str() {
                "variable" => config.variable = read_letter(key, value)?,
                "implicit_variable" => config.implicit_variable = read_letter(key, value)?,
                "loglevel" => {
                    let level = value
                        .as_string()
                        .ok_or_else(|| wrong_type(key, "level name", value))?;
                    config.loglevel = parse_log_level(level)?;
                }
                "log_file" => config.log_file = Some(value.to_string()),
                "show_terms" => config.show_terms = read_bool(key, value)?,
                _ => config.verify_derivative = read_bool(key, value)?,
            }
        }
        if config.variable == config.implicit_variable {
            return Err(CalcError::Config(format!(
                "variable and implicit_variable must differ, both are '{}'",
                config.variable
            )));
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<CalcConfig, CalcError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CalcError::Io(format!("cannot read config {}: {}", path.display(), e))
        })?;
        CalcConfig::from_document(&content)
    }
}
