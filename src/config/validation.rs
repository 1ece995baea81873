use crate::config::server::ServerConfig;
use crate::errors::ConfigError;
use std::io;

/// Configuration validator
#[derive(Debug, Default)]
pub struct ConfigValidator {
    warnings: Vec<String>,
}

impl ConfigValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the server configuration, collecting non-fatal warnings
    pub fn validate(&mut self, config: &ServerConfig) -> Result<(), ConfigError> {
        self.warnings.clear();

        if !(100..=599).contains(&config.return_code) {
            return Err(ConfigError::InvalidStatus(config.return_code));
        }

        // A missing root is served as all-404; only a non-directory is fatal.
        match config.cache_dir.metadata() {
            Ok(metadata) if metadata.is_dir() => {}
            Ok(_) => return Err(ConfigError::NotADirectory(config.cache_dir.clone())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                self.warnings.push(format!(
                    "cache dir {} does not exist; every file request will 404",
                    config.cache_dir.display()
                ));
            }
            Err(source) => {
                return Err(ConfigError::Inaccessible {
                    path: config.cache_dir.clone(),
                    source,
                })
            }
        }

        if config.injects_faults() && config.return_code < 400 {
            self.warnings.push(format!(
                "return code {} is not an error status; artifact requests get an empty body",
                config.return_code
            ));
        }

        Ok(())
    }

    /// Get validation warnings
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_validate_valid_config() {
        let temp_dir = TempDir::new().unwrap();
        let mut validator = ConfigValidator::new();

        assert!(validator.validate(&ServerConfig::new(temp_dir.path(), 403)).is_ok());
        assert!(validator.warnings().is_empty());
    }

    #[test]
    fn test_validate_status_range() {
        let temp_dir = TempDir::new().unwrap();
        let mut validator = ConfigValidator::new();

        for code in [0, 99, 600, 999] {
            let result = validator.validate(&ServerConfig::new(temp_dir.path(), code));
            assert!(matches!(result, Err(ConfigError::InvalidStatus(c)) if c == code));
        }
        for code in [100, 200, 401, 599] {
            assert!(validator.validate(&ServerConfig::new(temp_dir.path(), code)).is_ok());
        }
    }

    #[test]
    fn test_validate_cache_dir() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("nix-cache-info");
        fs::write(&file, "StoreDir: /nix/store\n").unwrap();
        let mut validator = ConfigValidator::new();

        let result = validator.validate(&ServerConfig::new(&file, 200));
        assert!(matches!(result, Err(ConfigError::NotADirectory(_))));

        let missing = temp_dir.path().join("missing");
        assert!(validator.validate(&ServerConfig::new(&missing, 200)).is_ok());
        assert_eq!(validator.warnings().len(), 1);
    }

    #[test]
    fn test_non_error_fault_warns() {
        let temp_dir = TempDir::new().unwrap();
        let mut validator = ConfigValidator::new();

        assert!(validator.validate(&ServerConfig::new(temp_dir.path(), 302)).is_ok());
        assert_eq!(validator.warnings().len(), 1);
    }
}
