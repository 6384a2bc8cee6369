use crate::numerical::root_finding_utils::IterationRecord;
use crate::numerical::solver_config::SolverLogLevel;
use chrono::Local;
use csv::Writer;
use simplelog::*;
use std::fs::File;
use std::io::{self, Write};

pub fn level_filter(level: SolverLogLevel) -> LevelFilter {
    match level {
        SolverLogLevel::Off => LevelFilter::Off,
        SolverLogLevel::Debug => LevelFilter::Debug,
        SolverLogLevel::Info => LevelFilter::Info,
        SolverLogLevel::Warn => LevelFilter::Warn,
        SolverLogLevel::Error => LevelFilter::Error,
    }
}

/// log_<date>_<time>.txt in the working directory
pub fn log_file_name() -> String {
    let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
    format!("log_{}.txt", date_and_time)
}

/// Install the terminal logger (and a file logger if asked).
/// Returns false if logging is off or a global logger is already installed.
pub fn init_logger(level: SolverLogLevel, log_to_file: bool) -> bool {
    if level == SolverLogLevel::Off {
        return false;
    }
    let log_option = level_filter(level);
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        log_option,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if log_to_file {
        let name = log_file_name();
        match File::create(&name) {
            Ok(file) => loggers.push(WriteLogger::new(log_option, Config::default(), file)),
            Err(e) => eprintln!("cannot create log file {}: {}", name, e),
        }
    }
    match CombinedLogger::init(loggers) {
        Ok(()) => {
            println!(" \n \n Program started with loglevel: {}", log_option);
            true
        }
        Err(_) => false,
    }
}

const HISTORY_HEADERS: [&str; 4] = ["iteration", "x", "next", "relative_change"];

/// tab separated iteration history
pub fn save_history_to_file(history: &[IterationRecord], filename: &str) -> io::Result<()> {
    let mut file = File::create(filename)?;
    // Write headers
    writeln!(file, "{}", HISTORY_HEADERS.join("\t"))?;
    for record in history {
        writeln!(
            file,
            "{}\t{}\t{}\t{}",
            record.iteration, record.x, record.next, record.relative_change
        )?;
    }
    Ok(())
}

pub fn save_history_to_csv(history: &[IterationRecord], filename: &str) -> io::Result<()> {
    let file = File::create(filename)?;
    let mut writer = Writer::from_writer(file);

    writer.write_record(HISTORY_HEADERS)?;
    for record in history {
        writer.write_record(&[
            record.iteration.to_string(),
            record.x.to_string(),
            record.next.to_string(),
            record.relative_change.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
