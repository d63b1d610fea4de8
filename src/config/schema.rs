//! Required-column schema (`schema.yaml`)

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Columns a raw dataset must carry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    /// Target column; falls back to `features.target` of the config
    #[serde(default)]
    pub target: Option<String>,
    /// Required non-target columns
    #[serde(default)]
    pub required: Vec<String>,
}

impl Schema {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        super::read_yaml(path.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;

    #[test]
    fn test_parse() {
        let schema: Schema = serde_yaml::from_str("target: quality\nrequired: [alcohol, pH]\n").unwrap();
        assert_eq!(schema.target.as_deref(), Some("quality"));
        assert_eq!(schema.required, vec!["alcohol", "pH"]);
    }

    #[test]
    fn test_missing_schema_file() {
        let err = Schema::load("/no/such/schema.yaml").unwrap_err();
        assert!(matches!(err, PipelineError::MissingInput(_)));
    }
}
