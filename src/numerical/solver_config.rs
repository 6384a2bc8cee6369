//! Solver configuration: tolerances, iteration ceiling, history recording and logging.
//! Can be built in code or read from the `[solver]` table of a TOML document.
use crate::numerical::approx_derivative::DEFAULT_DX;
use crate::numerical::fixed_point::{DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};
use crate::numerical::root_finding_utils::RootFindingError;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use strum_macros::{Display, EnumString};
use toml::{Table, Value};

/// verbosity of the logger installed by `solve_with_logging`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SolverLogLevel {
    Off,
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    /// epsilon of the relative convergence test
    pub tolerance: f64,
    /// forward-difference step
    pub dx: f64,
    /// `None` iterates without a ceiling
    pub max_iterations: Option<usize>,
    pub record_history: bool,
    pub loglevel: SolverLogLevel,
    pub log_to_file: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            dx: DEFAULT_DX,
            max_iterations: Some(DEFAULT_MAX_ITERATIONS),
            record_history: false,
            loglevel: SolverLogLevel::Off,
            log_to_file: false,
        }
    }
}

impl SolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// default settings without an iteration ceiling
    pub fn unbounded() -> Self {
        Self {
            max_iterations: None,
            ..Self::default()
        }
    }
    ////////////////////////////SETTERS///////////////////////////////////////////////////////////////////
    pub fn set_tolerance(&mut self, tolerance: f64) -> Result<(), RootFindingError> {
        check_positive("tolerance", tolerance)?;
        self.tolerance = tolerance;
        Ok(())
    }

    pub fn set_dx(&mut self, dx: f64) -> Result<(), RootFindingError> {
        check_positive("dx", dx)?;
        self.dx = dx;
        Ok(())
    }

    pub fn set_max_iterations(
        &mut self,
        max_iterations: Option<usize>,
    ) -> Result<(), RootFindingError> {
        if max_iterations == Some(0) {
            return Err(RootFindingError::InvalidInput(
                "max_iterations should be a positive number".to_string(),
            ));
        }
        self.max_iterations = max_iterations;
        Ok(())
    }

    pub fn set_record_history(&mut self, record_history: bool) {
        self.record_history = record_history;
    }

    pub fn set_loglevel(&mut self, loglevel: &str) -> Result<(), RootFindingError> {
        self.loglevel = SolverLogLevel::from_str(loglevel).map_err(|_| {
            RootFindingError::InvalidInput(format!(
                "loglevel must be off, debug, info, warn or error, got {}",
                loglevel
            ))
        })?;
        Ok(())
    }

    pub fn set_log_to_file(&mut self, log_to_file: bool) {
        self.log_to_file = log_to_file;
    }

    /// checks values assigned directly to the public fields
    pub fn validate(&self) -> Result<(), RootFindingError> {
        check_positive("tolerance", self.tolerance)?;
        check_positive("dx", self.dx)?;
        if self.max_iterations == Some(0) {
            return Err(RootFindingError::InvalidInput(
                "max_iterations should be a positive number".to_string(),
            ));
        }
        Ok(())
    }
    ////////////////////////////TOML///////////////////////////////////////////////////////////////////
    /// Read the `[solver]` table of a TOML document. Missing keys keep their defaults.
    /// ```toml
    /// [solver]
    /// tolerance = 1e-10
    /// dx = 1e-8
    /// max_iterations = 200   # or: unbounded = true
    /// record_history = true
    /// loglevel = "info"
    /// log_to_file = false
    /// ```
    pub fn from_toml_str(document: &str) -> Result<Self, RootFindingError> {
        let table = parse_toml(document)?;
        match table.get("solver") {
            Some(Value::Table(solver)) => Self::from_toml_table(solver),
            Some(_) => Err(RootFindingError::InvalidInput(
                "[solver] must be a table".to_string(),
            )),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RootFindingError> {
        let document = read_document(path.as_ref())?;
        Self::from_toml_str(&document)
    }

    pub fn from_toml_table(table: &Table) -> Result<Self, RootFindingError> {
        let mut config = Self::default();
        for (key, value) in table {
            match key.as_str() {
                "tolerance" => config.set_tolerance(toml_f64(key, value)?)?,
                "dx" => config.set_dx(toml_f64(key, value)?)?,
                "max_iterations" => config.set_max_iterations(Some(toml_usize(key, value)?))?,
                "unbounded" => {
                    if toml_bool(key, value)? {
                        config.max_iterations = None;
                    }
                }
                "record_history" => config.set_record_history(toml_bool(key, value)?),
                "loglevel" => config.set_loglevel(toml_str(key, value)?)?,
                "log_to_file" => config.set_log_to_file(toml_bool(key, value)?),
                other => {
                    return Err(RootFindingError::InvalidInput(format!(
                        "unknown key in [solver]: {}",
                        other
                    )));
                }
            }
        }
        Ok(config)
    }
}

pub(crate) fn check_positive(name: &str, value: f64) -> Result<(), RootFindingError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(RootFindingError::InvalidInput(format!(
            "{} must be a positive finite number, got {}",
            name, value
        )))
    }
}

pub(crate) fn parse_toml(document: &str) -> Result<Table, RootFindingError> {
    document
        .parse::<Table>()
        .map_err(|e| RootFindingError::InvalidInput(format!("malformed TOML: {}", e)))
}

pub(crate) fn read_document(path: &Path) -> Result<String, RootFindingError> {
    fs::read_to_string(path).map_err(|e| {
        RootFindingError::InvalidInput(format!("cannot read {}: {}", path.display(), e))
    })
}

pub(crate) fn toml_f64(key: &str, value: &Value) -> Result<f64, RootFindingError> {
    match value {
        Value::Float(v) => Ok(*v),
        Value::Integer(v) => Ok(*v as f64),
        _ => Err(RootFindingError::InvalidInput(format!(
            "{} must be a number",
            key
        ))),
    }
}

pub(crate) fn toml_usize(key: &str, value: &Value) -> Result<usize, RootFindingError> {
    match value {
        Value::Integer(v) if *v >= 0 => Ok(*v as usize),
        _ => Err(RootFindingError::InvalidInput(format!(
            "{} must be a non-negative integer",
            key
        ))),
    }
}

pub(crate) fn toml_bool(key: &str, value: &Value) -> Result<bool, RootFindingError> {
    value
        .as_bool()
        .ok_or_else(|| RootFindingError::InvalidInput(format!("{} must be true or false", key)))
}

pub(crate) fn toml_str<'a>(key: &str, value: &'a Value) -> Result<&'a str, RootFindingError> {
    value
        .as_str()
        .ok_or_else(|| RootFindingError::InvalidInput(format!("{} must be a string", key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = SolverConfig::default();
        assert_eq!(config.tolerance, 1e-8);
        assert_eq!(config.dx, 1e-8);
        assert_eq!(config.max_iterations, Some(1000));
        assert_eq!(config.loglevel, SolverLogLevel::Off);
        assert!(config.validate().is_ok());
        assert_eq!(SolverConfig::unbounded().max_iterations, None);
    }

    #[test]
    fn test_setters_validate() {
        let mut config = SolverConfig::new();
        assert!(config.set_tolerance(-1.0).is_err());
        assert!(config.set_tolerance(f64::NAN).is_err());
        assert!(config.set_dx(0.0).is_err());
        assert!(config.set_max_iterations(Some(0)).is_err());
        assert!(config.set_loglevel("verbose").is_err());
        config.set_tolerance(1e-12).unwrap();
        config.set_loglevel("WARN").unwrap();
        assert_eq!(config.tolerance, 1e-12);
        assert_eq!(config.loglevel, SolverLogLevel::Warn);
        assert_eq!(config.loglevel.to_string(), "warn");
    }

    #[test]
    fn test_validate_public_fields() {
        let config = SolverConfig {
            dx: -1e-8,
            ..SolverConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_toml_str() {
        let document = r#"
            [solver]
            tolerance = 1e-10
            max_iterations = 50
            record_history = true
            loglevel = "info"
        "#;
        let config = SolverConfig::from_toml_str(document).unwrap();
        assert_eq!(config.tolerance, 1e-10);
        assert_eq!(config.dx, 1e-8);
        assert_eq!(config.max_iterations, Some(50));
        assert!(config.record_history);
        assert_eq!(config.loglevel, SolverLogLevel::Info);
    }

    #[test]
    fn test_from_toml_unbounded_and_missing_table() {
        let config = SolverConfig::from_toml_str("[solver]\nunbounded = true\n").unwrap();
        assert_eq!(config.max_iterations, None);
        let config = SolverConfig::from_toml_str("[other]\nkey = 1\n").unwrap();
        assert_eq!(config, SolverConfig::default());
    }

    #[test]
    fn test_from_toml_errors() {
        assert!(SolverConfig::from_toml_str("[solver]\ntolerance = \"small\"\n").is_err());
        assert!(SolverConfig::from_toml_str("[solver]\nepsilon = 1e-8\n").is_err());
        assert!(SolverConfig::from_toml_str("[solver]\nmax_iterations = -3\n").is_err());
        assert!(SolverConfig::from_toml_str("solver = 5\n").is_err());
        assert!(SolverConfig::from_toml_str("[solver\n").is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("solver.toml");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "[solver]\ndx = 1e-6\nlog_to_file = true").unwrap();
        let config = SolverConfig::from_file(&path).unwrap();
        assert_eq!(config.dx, 1e-6);
        assert!(config.log_to_file);
        assert!(SolverConfig::from_file(dir.path().join("missing.toml")).is_err());
    }
}
