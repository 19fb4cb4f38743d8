use serde::{Deserialize, Serialize};
use crate::structs::config::api_config::ApiConfig;
use crate::structs::config::output_config::OutputConfig;
use crate::structs::config::review_config::ReviewConfig;

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub review: ReviewConfig,

    #[serde(default)]
    pub output: OutputConfig,
}
