use serde::{Deserialize, Serialize};

use crate::error::DetectError;

/// Algorithm parameters for one detection run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Alternations a trace needs before it is emitted as a period.
    pub minimum_alternations: usize,
    /// Same-pair repeats tolerated before a trace is cut.
    pub max_consecutive_noise: usize,
    /// Records scanned for a candidate pair at each cursor.
    pub lookahead_window_size: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            minimum_alternations: 3,
            max_consecutive_noise: 2,
            lookahead_window_size: 10,
        }
    }
}

impl DetectorConfig {
    /// Sets the minimum alternation count.
    pub fn minimum_alternations(mut self, n: usize) -> Self {
        self.minimum_alternations = n;
        self
    }

    /// Sets the noise tolerance.
    pub fn max_consecutive_noise(mut self, n: usize) -> Self {
        self.max_consecutive_noise = n;
        self
    }

    /// Sets the pair-finder window length.
    pub fn lookahead_window_size(mut self, n: usize) -> Self {
        self.lookahead_window_size = n;
        self
    }

    /// Rejects settings under which no period could ever be found.
    pub fn validate(&self) -> Result<(), DetectError> {
        if self.minimum_alternations == 0 {
            return Err(DetectError::InvalidConfig(
                "minimum_alternations must be at least 1".to_string(),
            ));
        }
        if self.lookahead_window_size < 3 {
            return Err(DetectError::InvalidConfig(format!(
                "lookahead_window_size must be at least 3, got {}",
                self.lookahead_window_size
            )));
        }
        Ok(())
    }
}
