//! Blocking client for the Clarion backend.

use std::time::Duration;

use log::debug;
use reqwest::blocking::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use clarion_base::config::constants::API_PREFIX;
use clarion_base::types::null_as_default;
use clarion_base::{
    AgentPersona, CodebaseFilters, EvaluatorError, FileTreeNode, FilterEvaluator, LlmConfig, VerdictMap,
};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}: {body}")]
    Status { url: String, status: u16, body: String },

    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl From<ApiError> for EvaluatorError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::Status { status, body, .. } => EvaluatorError::Status { status, body },
            ApiError::Decode { .. } => EvaluatorError::Decode(e.to_string()),
            ApiError::Client(_) | ApiError::Request { .. } => EvaluatorError::Transport(e.to_string()),
        }
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Serialize)]
struct PreviewFilterRequest<'a> {
    file_paths: &'a [String],
    include_globs: &'a [String],
    exclude_globs: &'a [String],
}

#[derive(Deserialize)]
struct PreviewFilterResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    status: VerdictMap,
}

#[derive(Serialize)]
struct LoadDirectoryRequest<'a> {
    path: &'a str,
}

/// Persona identity block; the backend serializes it with Go field names.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ProfileWire {
    #[serde(rename = "ID", default)]
    id: String,
    #[serde(rename = "Name", default)]
    name: String,
    #[serde(rename = "Description", default)]
    description: String,
    #[serde(rename = "Version", default)]
    version: String,
    #[serde(rename = "Author", default)]
    author: String,
    #[serde(rename = "Icon", default)]
    icon: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct OutputSchemaWire {
    #[serde(default)]
    schema: Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct AgentWire {
    #[serde(rename = "Profile", default)]
    profile: ProfileWire,
    #[serde(default)]
    system_prompt: String,
    #[serde(default)]
    codebase_filters: CodebaseFilters,
    #[serde(default)]
    output_schema: OutputSchemaWire,
    #[serde(default, deserialize_with = "null_as_default")]
    user_variables: Vec<Value>,
    #[serde(default)]
    llm_config: LlmConfig,
}

#[derive(Serialize)]
struct SaveAgentRequest {
    agent: AgentWire,
}

impl From<AgentWire> for AgentPersona {
    fn from(w: AgentWire) -> Self {
        AgentPersona {
            id: w.profile.id,
            name: w.profile.name,
            description: w.profile.description,
            author: w.profile.author,
            version: w.profile.version,
            icon: w.profile.icon,
            system_prompt: w.system_prompt,
            codebase_filters: w.codebase_filters,
            output_schema: w.output_schema.schema,
            user_variables: w.user_variables,
            llm_config: w.llm_config,
        }
    }
}

impl From<&AgentPersona> for AgentWire {
    fn from(a: &AgentPersona) -> Self {
        AgentWire {
            profile: ProfileWire {
                id: a.id.clone(),
                name: a.name.clone(),
                description: a.description.clone(),
                version: a.version.clone(),
                author: a.author.clone(),
                icon: a.icon.clone(),
            },
            system_prompt: a.system_prompt.clone(),
            codebase_filters: a.codebase_filters.clone(),
            output_schema: OutputSchemaWire { schema: a.output_schema.clone() },
            user_variables: a.user_variables.clone(),
            llm_config: a.llm_config.clone(),
        }
    }
}

// ============================================================================
// Client
// ============================================================================

pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build().map_err(ApiError::Client)?;
        Ok(Self { client, base_url: base_url.trim_end_matches('/').to_string() })
    }

    fn url(&self, route: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, route)
    }

    /// Send and return the body of a 2xx response.
    fn send(&self, request: RequestBuilder, url: &str) -> Result<String, ApiError> {
        let response = request
            .header("Accept", "application/json")
            .send()
            .map_err(|source| ApiError::Request { url: url.to_string(), source })?;

        let status = response.status();
        let body = response.text().map_err(|source| ApiError::Request { url: url.to_string(), source })?;
        if !status.is_success() {
            return Err(ApiError::Status { url: url.to_string(), status: status.as_u16(), body: body.trim().to_string() });
        }
        Ok(body)
    }

    fn decode<T: for<'de> Deserialize<'de>>(body: &str, url: &str) -> Result<T, ApiError> {
        serde_json::from_str(body).map_err(|source| ApiError::Decode { url: url.to_string(), source })
    }

    /// `POST /fs/preview-filter`: one verdict per path.
    pub fn preview_filter(&self, paths: &[String], include: &[String], exclude: &[String]) -> Result<VerdictMap, ApiError> {
        let url = self.url("/fs/preview-filter");
        let payload = PreviewFilterRequest { file_paths: paths, include_globs: include, exclude_globs: exclude };
        let body = self.send(self.client.post(&url).json(&payload), &url)?;
        let response: PreviewFilterResponse = Self::decode(&body, &url)?;
        debug!("preview-filter: {} paths, {} verdicts", paths.len(), response.status.len());
        Ok(response.status)
    }

    /// `POST /fs/directory/load`: the backend's tree for `path`.
    pub fn load_directory(&self, path: &str) -> Result<Vec<FileTreeNode>, ApiError> {
        let url = self.url("/fs/directory/load");
        let body = self.send(self.client.post(&url).json(&LoadDirectoryRequest { path }), &url)?;
        let nodes: Option<Vec<FileTreeNode>> = Self::decode(&body, &url)?;
        Ok(nodes.unwrap_or_default())
    }

    pub fn list_agents(&self) -> Result<Vec<AgentPersona>, ApiError> {
        let url = self.url("/agents/list");
        let body = self.send(self.client.get(&url), &url)?;
        let agents: Option<Vec<AgentWire>> = Self::decode(&body, &url)?;
        Ok(agents.unwrap_or_default().into_iter().map(AgentPersona::from).collect())
    }

    pub fn save_agent(&self, agent: &AgentPersona) -> Result<(), ApiError> {
        let url = self.url("/agents/save");
        let payload = SaveAgentRequest { agent: AgentWire::from(agent) };
        self.send(self.client.post(&url).json(&payload), &url)?;
        Ok(())
    }

    pub fn delete_agent(&self, id: &str) -> Result<(), ApiError> {
        let url = self.url(&format!("/agents/delete/{}", id));
        self.send(self.client.delete(&url), &url)?;
        Ok(())
    }
}

impl FilterEvaluator for ApiClient {
    fn evaluate(&self, paths: &[String], include: &[String], exclude: &[String]) -> Result<VerdictMap, EvaluatorError> {
        Ok(self.preview_filter(paths, include, exclude)?)
    }
}
