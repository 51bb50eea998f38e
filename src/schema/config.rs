//! Solve-time parameters for the evolutionary search.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

fn default_queue_capacity() -> usize {
    1000
}

fn default_pool_size() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn default_max_generations() -> usize {
    100
}

/// Parameters controlling a solve run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameters {
    /// Population size, and capacity of the population store.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// Number of worker threads per phase (defaults to logical CPU count).
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
    /// Generation budget before the run is reported as exhausted.
    #[serde(default = "default_max_generations")]
    pub max_generations: usize,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
            pool_size: default_pool_size(),
            max_generations: default_max_generations(),
            random_seed: None,
        }
    }
}

impl Parameters {
    /// Load parameters from a JSON file. Missing fields take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ParameterError> {
        let text = fs::read_to_string(path)?;
        let params: Parameters = serde_json::from_str(&text)?;
        params.validate()?;
        Ok(params)
    }

    /// Validate parameter values.
    pub fn validate(&self) -> Result<(), ParameterError> {
        if self.queue_capacity == 0 {
            return Err(ParameterError::ZeroQueueCapacity);
        }
        if self.pool_size == 0 {
            return Err(ParameterError::ZeroPoolSize);
        }
        if self.max_generations == 0 {
            return Err(ParameterError::ZeroMaxGenerations);
        }
        Ok(())
    }
}

/// Parameter validation and loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ParameterError {
    #[error("Queue capacity must be non-zero")]
    ZeroQueueCapacity,
    #[error("Pool size must be non-zero")]
    ZeroPoolSize,
    #[error("Max generations must be non-zero")]
    ZeroMaxGenerations,
    #[error("Failed to read parameters: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse parameters: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_parameters_valid() {
        let params = Parameters::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.queue_capacity, 1000);
        assert_eq!(params.max_generations, 100);
        assert!(params.pool_size >= 1);
    }

    #[test]
    fn test_zero_values_rejected() {
        let params = Parameters {
            queue_capacity: 0,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ParameterError::ZeroQueueCapacity)
        ));

        let params = Parameters {
            pool_size: 0,
            ..Default::default()
        };
        assert!(matches!(params.validate(), Err(ParameterError::ZeroPoolSize)));

        let params = Parameters {
            max_generations: 0,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ParameterError::ZeroMaxGenerations)
        ));
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("params.json");
        fs::write(&path, r#"{ "queue_capacity": 64, "random_seed": 7 }"#).unwrap();

        let params = Parameters::from_json_file(&path).unwrap();
        assert_eq!(params.queue_capacity, 64);
        assert_eq!(params.max_generations, 100);
        assert_eq!(params.random_seed, Some(7));
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("params.json");
        fs::write(&path, r#"{ "max_generations": 0 }"#).unwrap();
        assert!(matches!(
            Parameters::from_json_file(&path),
            Err(ParameterError::ZeroMaxGenerations)
        ));

        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            Parameters::from_json_file(&path),
            Err(ParameterError::Parse(_))
        ));

        assert!(matches!(
            Parameters::from_json_file(dir.path().join("missing.json")),
            Err(ParameterError::Io(_))
        ));
    }
}
