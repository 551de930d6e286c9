//! Dimensionality bound supplied by the environment.

use crate::{FixtureError, Result};

/// Environment variable holding the maximum array rank of the library under test.
pub const MAX_DIM_ENV: &str = "LEGATE_MAX_DIM";

/// Rank bound used when [`MAX_DIM_ENV`] is unset.
pub const DEFAULT_MAX_DIM: usize = 4;

/// Maximum dimensionality, validated to be at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaxDim(usize);

impl MaxDim {
    pub fn new(value: usize) -> Result<Self> {
        if value == 0 {
            return Err(FixtureError::InvalidMaxDim(value));
        }
        Ok(Self(value))
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for MaxDim {
    fn default() -> Self {
        Self(DEFAULT_MAX_DIM)
    }
}

impl TryFrom<usize> for MaxDim {
    type Error = FixtureError;

    fn try_from(value: usize) -> Result<Self> {
        Self::new(value)
    }
}

/// Settings shared by the fixture generators.
///
/// Build a fresh value per test run; nothing is cached process-wide, so
/// changing the environment between runs takes effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FixtureConfig {
    pub max_dim: MaxDim,
}

impl FixtureConfig {
    pub fn new(max_dim: MaxDim) -> Self {
        Self { max_dim }
    }

    /// Read [`MAX_DIM_ENV`] from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve settings through an arbitrary key lookup.
    ///
    /// A missing key falls back to [`DEFAULT_MAX_DIM`]. Surrounding
    /// whitespace is ignored; negative or non-numeric values are rejected.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let max_dim = match lookup(MAX_DIM_ENV) {
            None => MaxDim::default(),
            Some(raw) => {
                let parsed = raw
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| FixtureError::UnparsableMaxDim {
                        var: MAX_DIM_ENV,
                        value: raw.clone(),
                    })?;
                MaxDim::new(parsed)?
            }
        };
        tracing::debug!(max_dim = max_dim.get(), "resolved fixture configuration");
        Ok(Self { max_dim })
    }
}
