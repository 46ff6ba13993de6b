//! Collaborators chosen from settings: filter evaluator, tree source, agent source.

use std::path::Path;
use std::sync::Arc;

use log::{info, warn};
use thiserror::Error;

use clarion_base::config::{Backend, Settings, library};
use clarion_base::{AgentPersona, FileTreeNode, FilterEvaluator};
use clarion_mod_glob::LocalGlobEvaluator;
use clarion_mod_tree::{TreeError, load_project_tree};

use crate::infra::api::{ApiClient, ApiError};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("no agent with id '{0}'")]
    UnknownAgent(String),
}

#[derive(Clone)]
pub enum TreeSource {
    /// Walk the project directory in-process
    Local,
    Remote(Arc<ApiClient>),
}

impl TreeSource {
    pub fn load(&self, root: &Path) -> Result<Vec<FileTreeNode>, SourceError> {
        match self {
            TreeSource::Local => Ok(load_project_tree(root)?),
            TreeSource::Remote(api) => Ok(api.load_directory(&root.to_string_lossy())?),
        }
    }
}

#[derive(Clone)]
pub enum AgentSource {
    /// Embedded seed library, edits live in memory only
    Seed,
    Remote(Arc<ApiClient>),
}

impl AgentSource {
    /// Backend personas, or the seed library when the backend is unavailable or empty.
    pub fn list(&self) -> Vec<AgentPersona> {
        match self {
            AgentSource::Seed => library::agents().to_vec(),
            AgentSource::Remote(api) => match api.list_agents() {
                Ok(agents) if !agents.is_empty() => agents,
                Ok(_) => {
                    info!("backend has no agents, using the seed library");
                    library::agents().to_vec()
                }
                Err(e) => {
                    warn!("could not list agents, using the seed library: {}", e);
                    library::agents().to_vec()
                }
            },
        }
    }

    /// Persist an edited persona. Seed personas are not written anywhere.
    pub fn save(&self, agent: &AgentPersona) -> Result<(), SourceError> {
        match self {
            AgentSource::Seed => {
                info!("agent '{}' updated in memory", agent.id);
                Ok(())
            }
            AgentSource::Remote(api) => Ok(api.save_agent(agent)?),
        }
    }

    pub fn delete(&self, id: &str) -> Result<(), SourceError> {
        match self {
            AgentSource::Seed => {
                if !library::agents().iter().any(|a| a.id == id) {
                    return Err(SourceError::UnknownAgent(id.to_string()));
                }
                info!("seed agent '{}' deleted; the seed library is not persisted", id);
                Ok(())
            }
            AgentSource::Remote(api) => Ok(api.delete_agent(id)?),
        }
    }
}

#[derive(Clone)]
pub struct Services {
    pub evaluator: Arc<dyn FilterEvaluator>,
    pub tree_source: TreeSource,
    pub agents: AgentSource,
}

impl Services {
    pub fn from_settings(settings: &Settings) -> Result<Self, ApiError> {
        if !settings.uses_backend() {
            info!("services: fully local");
            return Ok(Self::local());
        }
        let api = Arc::new(ApiClient::new(&settings.api_url, settings.request_timeout())?);
        let remote = |backend: Backend| (backend == Backend::Remote).then(|| Arc::clone(&api));

        let evaluator: Arc<dyn FilterEvaluator> = match remote(settings.evaluator) {
            Some(api) => api,
            None => Arc::new(LocalGlobEvaluator),
        };
        let tree_source = remote(settings.tree_source).map_or(TreeSource::Local, TreeSource::Remote);
        let agents = remote(settings.agents_source).map_or(AgentSource::Seed, AgentSource::Remote);

        info!(
            "services: evaluator={:?} tree={:?} agents={:?} api={}",
            settings.evaluator, settings.tree_source, settings.agents_source, settings.api_url
        );
        Ok(Self { evaluator, tree_source, agents })
    }

    /// Fully in-process services.
    pub fn local() -> Self {
        Self { evaluator: Arc::new(LocalGlobEvaluator), tree_source: TreeSource::Local, agents: AgentSource::Seed }
    }
}
