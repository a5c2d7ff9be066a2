//! CLI command implementations.

pub mod compact;
pub mod solve;
pub mod validate;

pub use compact::CompactArgs;
pub use solve::SolveArgs;
pub use validate::ValidateArgs;

use std::fs;
use std::path::Path;

use xirr_core::config::XirrConfig;

use crate::error::{CliError, CliResult};

/// Loads solver configuration from a TOML or JSON file, or the defaults.
///
/// The format follows the file extension; anything but `.json` is read as TOML.
pub fn load_config(path: Option<&Path>) -> CliResult<XirrConfig> {
    let Some(path) = path else {
        return Ok(XirrConfig::default());
    };

    let content = fs::read_to_string(path)
        .map_err(|e| CliError::Config(format!("{}: {e}", path.display())))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let config = if is_json {
        XirrConfig::from_json_str(&content)
    } else {
        XirrConfig::from_toml_str(&content)
    };

    log::debug!("Loaded configuration from {}", path.display());
    config.map_err(|e| CliError::Config(format!("{}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use xirr_core::solve::SolverMethod;

    #[test]
    fn test_defaults_without_file() {
        assert_eq!(load_config(None).unwrap(), XirrConfig::default());
    }

    #[test]
    fn test_toml_and_json_files() {
        let mut toml = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(toml, "default_method = \"bisection\"").unwrap();
        let config = load_config(Some(toml.path())).unwrap();
        assert_eq!(config.default_method, SolverMethod::Bisection);

        let mut json = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        writeln!(json, "{{\"iteration_limit\": 7}}").unwrap();
        let config = load_config(Some(json.path())).unwrap();
        assert_eq!(config.iteration_limit, 7);
    }

    #[test]
    fn test_invalid_file_names_path() {
        let mut toml = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(toml, "tolerance = -1.0").unwrap();

        let err = load_config(Some(toml.path())).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
        assert!(err.to_string().contains("tolerance"));
    }
}
