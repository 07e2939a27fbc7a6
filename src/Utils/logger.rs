//! Logger setup: terminal output plus an optional log file.
use crate::symbolic::calc_errors::CalcError;
use chrono::Local;
use log::LevelFilter;
use simplelog::*;
use std::fs::File;

/// reads a log level name: off, error, warn, info, debug or trace
pub fn parse_log_level(level: &str) -> Result<LevelFilter, CalcError> {
    match level.trim().to_lowercase().as_str() {
        "off" | "none" => Ok(LevelFilter::Off),
        "error" => Ok(LevelFilter::Error),
        "warn" => Ok(LevelFilter::Warn),
        "info" => Ok(LevelFilter::Info),
        "debug" => Ok(LevelFilter::Debug),
        "trace" => Ok(LevelFilter::Trace),
        other => Err(CalcError::Config(format!(
            "loglevel must be off, error, warn, info, debug or trace, got '{}'",
            other
        ))),
    }
}

/// name of the log file: "auto" gives calc_log_<date>_<time>.txt, anything else is used as is
pub fn log_file_name(log_file: &str) -> String {
    if log_file == "auto" {
        let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
        format!("calc_log_{}.txt", date_and_time)
    } else {
        log_file.to_string()
    }
}

/// installs the global logger; a logger that is already installed is kept
pub fn init_logger(level: LevelFilter, log_file: Option<&str>) -> Result<(), CalcError> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    // console logger
    loggers.push(TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ));
    // file logger
    if let Some(log_file) = log_file {
        let name = log_file_name(log_file);
        let file = File::create(&name)
            .map_err(|e| CalcError::Io(format!("cannot create log file {}: {}", name, e)))?;
        loggers.push(WriteLogger::new(level, Config::default(), file));
    }
    let _ = CombinedLogger::init(loggers);
    Ok(())
}
