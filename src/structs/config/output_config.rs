use serde::{Deserialize, Serialize};
use crate::helpers::config_helper::ConfigHelper;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct OutputConfig {
    /// `text` or `json`
    #[serde(default = "ConfigHelper::default_format")]
    pub format: String,

    #[serde(default = "ConfigHelper::default_color")]
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: ConfigHelper::default_format(),
            color: ConfigHelper::default_color(),
        }
    }
}
