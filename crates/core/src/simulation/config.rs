//! Batch execution configuration

use crate::error::{Result, WindFieldError};
use serde::{Deserialize, Serialize};

/// How storms in a batch are scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionMode {
    /// One storm after another on the calling thread, timesteps included
    Sequential,
    /// Storms spread over a dedicated worker pool, each storm's timesteps
    /// evaluated in parallel on the same pool.
    /// `workers == 0` uses one worker per available core.
    Parallel { workers: usize },
}

/// Configuration for [`BatchDriver`](crate::simulation::BatchDriver)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Scheduling of storms
    pub execution: ExecutionMode,

    /// Upper bound on the worker pool size
    pub max_workers: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            execution: ExecutionMode::Parallel { workers: 0 },
            max_workers: 256,
        }
    }
}

impl BatchConfig {
    /// Sequential execution
    pub fn sequential() -> Self {
        Self {
            execution: ExecutionMode::Sequential,
            ..Default::default()
        }
    }

    /// Parallel execution on `workers` threads (0 = available cores)
    pub fn parallel(workers: usize) -> Self {
        Self {
            execution: ExecutionMode::Parallel { workers },
            ..Default::default()
        }
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> Result<()> {
        if self.max_workers == 0 {
            return Err(WindFieldError::InvalidConfig(
                "max_workers must be at least 1".to_string(),
            ));
        }
        if let ExecutionMode::Parallel { workers } = self.execution {
            if workers > self.max_workers {
                return Err(WindFieldError::InvalidConfig(format!(
                    "{workers} workers requested, limit is {}",
                    self.max_workers
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_parallel_on_all_cores() {
        let config = BatchConfig::default();
        assert_eq!(config.execution, ExecutionMode::Parallel { workers: 0 });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_worker_limit() {
        assert!(BatchConfig::parallel(8).validate().is_ok());
        assert!(BatchConfig::parallel(1000).validate().is_err());
        let config = BatchConfig {
            max_workers: 0,
            ..BatchConfig::sequential()
        };
        assert!(matches!(config.validate(), Err(WindFieldError::InvalidConfig(_))));
    }
}
