use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::filters::CodebaseFilters;

/// An agent persona as the frontend sees it.
///
/// Only `codebase_filters` drives behavior here; the remaining fields are
/// carried so that saving an edited persona does not drop them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentPersona {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub system_prompt: String,
    #[serde(default)]
    pub codebase_filters: CodebaseFilters,
    #[serde(default)]
    pub output_schema: Value,
    #[serde(default)]
    pub user_variables: Vec<Value>,
    #[serde(default)]
    pub llm_config: LlmConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_parameters")]
    pub parameters: Value,
    #[serde(rename = "configId", default)]
    pub config_id: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self { provider: default_provider(), model: default_model(), parameters: default_parameters(), config_id: String::new() }
    }
}

fn default_provider() -> String {
    "OpenAI".to_string()
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_parameters() -> Value {
    json!({ "temperature": 0.7 })
}

impl AgentPersona {
    pub fn has_filters(&self) -> bool {
        self.codebase_filters.has_filters()
    }
}
