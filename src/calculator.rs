//! Interactive calculator session.
//!
//! The session owns the current expression and the settings; every menu operation
//! segments the expression again, so an error in one operation never leaks into the next.
//!```text
//! Enter f(x) = x^2+3x
//! Press:  [1] to evaluate the function.
//!         [2] to differentiate the function.
//!         [3] to find the implicit derivative dy/dx.
//!         [4] to find the implicit derivative dx/dy.
//!         [5] to end the program.
//! =>      2
//! The result is...
//! f'(x) = 2x+3
//!
//! Press 'enter' to continue...
//!```
use crate::Utils::config_parser::CalcConfig;
use crate::Utils::report::term_report;
use crate::symbolic::assembler::{assemble_result, derivative_label, implicit_label};
use crate::symbolic::calc_errors::CalcError;
use crate::symbolic::derivative_check::compare_num1D;
use crate::symbolic::evaluator::evaluate_expression;
use crate::symbolic::implicit::{explicit_form, implicit_derivative};
use crate::symbolic::term_derivatives::differentiate_expression;
use crate::symbolic::tokenizer::uses_variable;
use crate::symbolic::utils::{format_number, parse_float, parse_int};
use log::{info, warn};
use std::io::{BufRead, Write};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum MenuOption {
    #[strum(to_string = "evaluate the function")]
    Evaluate,
    #[strum(to_string = "differentiate the function")]
    Derivative,
    #[strum(to_string = "find the implicit derivative")]
    ImplicitDyDx,
    #[strum(to_string = "find the implicit derivative")]
    ImplicitDxDy,
    #[strum(to_string = "end the program")]
    Exit,
}

impl MenuOption {
    /// reads a selection "1" to "5"
    pub fn from_selection(selection: &str) -> Result<MenuOption, CalcError> {
        let invalid = || CalcError::InvalidMenuSelection(selection.trim().to_string());
        let number = parse_int(selection).map_err(|_| invalid())?;
        usize::try_from(number)
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|n| MenuOption::iter().nth(n))
            .ok_or_else(invalid)
    }
}

// trimmed next line, None at the end of input
fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>, CalcError> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

pub struct Session {
    pub config: CalcConfig,
    /// last expression entered, kept across menu operations
    pub expression: Option<String>,
}

impl Session {
    pub fn new(config: CalcConfig) -> Self {
        Session {
            config,
            expression: None,
        }
    }

    /// replaces the current expression, a blank line keeps the previous one
    pub fn set_expression(&mut self, line: &str) -> Result<(), CalcError> {
        let line = line.trim();
        if !line.is_empty() {
            self.expression = Some(line.to_string());
        }
        match self.expression {
            Some(_) => Ok(()),
            None => Err(CalcError::EmptyExpression),
        }
    }

    fn current(&self) -> Result<&str, CalcError> {
        self.expression
            .as_deref()
            .ok_or(CalcError::EmptyExpression)
    }

    /// true if the expression mentions the second variable, so evaluation needs two values
    pub fn needs_two_values(&self) -> Result<bool, CalcError> {
        let form = explicit_form(self.current()?, self.config.implicit_variable)?;
        uses_variable(&form, self.config.implicit_variable)
    }

    /// "f(x) = v" or "f(x,y) = v"; `y=...` is read as the function on the right
    pub fn evaluate(&self, values: &[f64]) -> Result<String, CalcError> {
        let form = explicit_form(self.current()?, self.config.implicit_variable)?;
        let x = self.config.variable.to_string();
        let y = self.config.implicit_variable.to_string();
        let vars = [x.as_str(), y.as_str()];
        let value = evaluate_expression(&form, &vars[..values.len().min(2)], values)?;
        let label = if values.len() > 1 {
            format!("f({},{})", x, y)
        } else {
            format!("f({})", x)
        };
        info!("{} = {} at {:?}", label, value, values);
        Ok(format!("{} = {}", label, format_number(value)))
    }

    /// "f'(x) = ..." plus the term table if it is switched on
    pub fn derivative(&self) -> Result<String, CalcError> {
        let var = self.config.variable;
        let form = explicit_form(self.current()?, self.config.implicit_variable)?;
        let body = differentiate_expression(&form, var)?;
        if self.config.verify_derivative {
            if let Err(e) = compare_num1D(&form, var, 0.5, 1.5, 50, 1e-4) {
                warn!("numerical check of the derivative skipped: {}", e);
            }
        }
        let mut result = assemble_result(&derivative_label(var), &body);
        if self.config.show_terms {
            result.push('\n');
            result.push_str(&term_report(&form, var)?);
        }
        Ok(result)
    }

    /// d(dependent)/d(independent) of the implicit curve
    pub fn implicit(&self, dependent: char, independent: char) -> Result<String, CalcError> {
        let body = implicit_derivative(self.current()?, dependent, independent)?;
        Ok(assemble_result(
            &implicit_label(dependent, independent),
            &body,
        ))
    }

    fn menu_text(&self) -> String {
        let (x, y) = (self.config.variable, self.config.implicit_variable);
        let mut text = String::from("Press:");
        for (i, option) in MenuOption::iter().enumerate() {
            let description = match option {
                MenuOption::ImplicitDyDx => format!("{} {}", option, implicit_label(y, x)),
                MenuOption::ImplicitDxDy => format!("{} {}", option, implicit_label(x, y)),
                _ => option.to_string(),
            };
            text.push_str(&format!("\t[{}] to {}.\n", i + 1, description));
        }
        text
    }

    // reads the point for an evaluation, None at the end of input
    fn read_point<R: BufRead, W: Write>(
        &self,
        input: &mut R,
        output: &mut W,
    ) -> Result<Option<Vec<f64>>, CalcError> {
        let mut names = vec![self.config.variable];
        if self.needs_two_values()? {
            names.push(self.config.implicit_variable);
        }
        let mut values = Vec::with_capacity(names.len());
        for name in names {
            write!(output, "Please enter {} value : ", name)?;
            output.flush()?;
            let Some(line) = read_line(input)? else {
                return Ok(None);
            };
            values.push(parse_float(&line)?);
        }
        Ok(Some(values))
    }

    // result text of one operation, None if the input ended while reading values
    fn execute<R: BufRead, W: Write>(
        &self,
        option: MenuOption,
        input: &mut R,
        output: &mut W,
    ) -> Result<Option<String>, CalcError> {
        let (x, y) = (self.config.variable, self.config.implicit_variable);
        let result = match option {
            MenuOption::Evaluate => match self.read_point(input, output)? {
                Some(values) => self.evaluate(&values)?,
                None => return Ok(None),
            },
            MenuOption::Derivative => self.derivative()?,
            MenuOption::ImplicitDyDx => self.implicit(y, x)?,
            MenuOption::ImplicitDxDy => self.implicit(x, y)?,
            MenuOption::Exit => String::new(),
        };
        Ok(Some(result))
    }

    /// read-eval-print loop, ends on option 5 or at the end of input
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut output: W) -> Result<(), CalcError> {
        loop {
            write!(output, "Enter f({}) = ", self.config.variable)?;
            output.flush()?;
            let Some(line) = read_line(&mut input)? else {
                return Ok(());
            };
            if let Err(e) = self.set_expression(&line) {
                writeln!(output, "{}", e)?;
                continue;
            }

            let option = loop {
                write!(output, "{}=>\t", self.menu_text())?;
                output.flush()?;
                let Some(selection) = read_line(&mut input)? else {
                    return Ok(());
                };
                match MenuOption::from_selection(&selection) {
                    Ok(option) => break option,
                    Err(e) => {
                        warn!("{}", e);
                        writeln!(output, "{}", e)?;
                    }
                }
            };
            if option == MenuOption::Exit {
                return Ok(());
            }

            match self.execute(option, &mut input, &mut output) {
                Ok(Some(result)) => {
                    writeln!(output, "The result is...\n")?;
                    writeln!(output, "{}\n", result)?;
                }
                Ok(None) => return Ok(()),
                Err(e) => {
                    warn!("{}", e);
                    writeln!(output, "Error: {}\n", e)?;
                }
            }
            write!(output, "Press 'enter' to continue...")?;
            output.flush()?;
            if read_line(&mut input)?.is_none() {
                return Ok(());
            }
            writeln!(output)?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run_session(config: CalcConfig, input: &str) -> String {
        let mut session = Session::new(config);
        let mut output = Vec::new();
        session.run(Cursor::new(input), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_menu_selection() {
        assert_eq!(MenuOption::from_selection("1").unwrap(), MenuOption::Evaluate);
        assert_eq!(MenuOption::from_selection(" 5 ").unwrap(), MenuOption::Exit);
        for bad in ["0", "6", "-1", "two", ""] {
            assert!(
                matches!(
                    MenuOption::from_selection(bad),
                    Err(CalcError::InvalidMenuSelection(_))
                ),
                "{}",
                bad
            );
        }
    }

    #[test]
    fn test_derivative_end_to_end() {
        let output = run_session(CalcConfig::default(), "x^2+3x\n2\n\n\n5\n");
        assert!(output.contains("f'(x) = 2x+3"));
        assert!(output.contains("f'(x) = 2x+3\n\nPress 'enter' to continue..."));
        assert_eq!(output.matches("Enter f(x) = ").count(), 2);
    }

    #[test]
    fn test_evaluate_one_and_two_variables() {
        let output = run_session(CalcConfig::default(), "x^2+3x\n1\n2\n");
        assert!(output.contains("Please enter x value : "));
        assert!(output.contains("f(x) = 10"));

        let output = run_session(CalcConfig::default(), "x^2+y^2=25\n1\n3\n4\n\n\n5\n");
        assert!(output.contains("Please enter y value : "));
        assert!(output.contains("f(x,y) = 0"));
    }

    #[test]
    fn test_implicit_options() {
        let output = run_session(CalcConfig::default(), "x^2+y^2=25\n3\n\n\n4\n\n\n5\n");
        assert!(output.contains("dy/dx = -2x/(2y)"));
        assert!(output.contains("dx/dy = -2y/(2x)"));
    }

    #[test]
    fn test_errors_do_not_end_the_session() {
        let output = run_session(CalcConfig::default(), "sin(x+1\n2\n\nx\n9\n2\n\n\n5\n");
        assert!(output.contains("Error: Bad arithmetic expression"));
        assert!(output.contains("Invalid menu selection '9'"));
        assert!(output.contains("f'(x) = 1"));
    }

    #[test]
    fn test_blank_first_expression_and_end_of_input() {
        let output = run_session(CalcConfig::default(), "\n");
        assert!(output.contains("Empty expression"));
        let output = run_session(CalcConfig::default(), "x\n1\n");
        assert!(output.ends_with("Please enter x value : "));
        let output = run_session(CalcConfig::default(), "x\n2\n");
        assert!(output.ends_with("Press 'enter' to continue..."));
    }

    #[test]
    fn test_configured_variables_and_term_table() {
        let config = CalcConfig {
            variable: 't',
            implicit_variable: 's',
            show_terms: true,
            verify_derivative: true,
            ..CalcConfig::default()
        };
        let output = run_session(config, "sin(t)+3s\n2\n\n\n5\n");
        assert!(output.contains("Enter f(t) = "));
        assert!(output.contains("ds/dt"));
        assert!(output.contains("f'(t) = cos(t)"));
        assert!(output.contains("trig call"));
    }

    #[test]
    fn test_session_operations_directly() {
        let mut session = Session::new(CalcConfig::default());
        assert_eq!(session.derivative(), Err(CalcError::EmptyExpression));
        session.set_expression("y = x^3").unwrap();
        assert_eq!(session.derivative().unwrap(), "f'(x) = 3x^2");
        session.set_expression("  ").unwrap();
        assert_eq!(session.expression.as_deref(), Some("y = x^3"));
        assert_eq!(session.evaluate(&[2.0]).unwrap(), "f(x) = 8");
        assert_eq!(session.implicit('y', 'x').unwrap(), "dy/dx = 3x^2");
    }
}
