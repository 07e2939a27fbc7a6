#![allow(non_snake_case)]
use RustedDiffCalc::Utils::config_parser::CalcConfig;
use RustedDiffCalc::Utils::logger::init_logger;
use RustedDiffCalc::calculator::Session;
use log::info;
use std::io;
use std::path::Path;

fn main() {
    // optional settings document as the first argument
    let config = match std::env::args().nth(1) {
        Some(path) => match CalcConfig::from_file(Path::new(&path)) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        },
        None => CalcConfig::default(),
    };
    if let Err(e) = init_logger(config.loglevel, config.log_file.as_deref()) {
        eprintln!("{}", e);
    }
    info!("calculator started with {:?}", config);

    let mut session = Session::new(config);
    let stdin = io::stdin();
    let stdout = io::stdout();
    if let Err(e) = session.run(stdin.lock(), stdout.lock()) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
    info!("calculator finished");
}
