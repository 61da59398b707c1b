//! Curve factor decomposition settings.

use serde::{Deserialize, Serialize};

use crate::error::{Validate, ValidationError};

/// Settings for principal component analysis of curve moves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PcaConfig {
    /// Keep at most this many leading components. `None` keeps all.
    #[serde(default)]
    pub max_components: Option<usize>,
}

impl PcaConfig {
    /// Builder method to cap the number of components.
    #[must_use]
    pub fn with_max_components(mut self, max_components: usize) -> Self {
        self.max_components = Some(max_components);
        self
    }
}

impl Validate for PcaConfig {
    fn validate(&self) -> Vec<ValidationError> {
        match self.max_components {
            Some(0) => vec![ValidationError::new(
                "max_components",
                "At least one component must be kept",
            )],
            _ => Vec::new(),
        }
    }
}
