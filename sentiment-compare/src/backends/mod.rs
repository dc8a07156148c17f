//! Sentiment backend implementations

pub mod aiapplied;
pub mod alchemy;
pub mod bitext;
pub mod chatterbox;
pub mod datumbox;
pub mod http;
pub mod lymbix;
pub mod repustate;
pub mod sentigem;
pub mod skyttle;
pub mod traits;
pub mod viralheat;

pub use aiapplied::AiAppliedClient;
pub use alchemy::AlchemyClient;
pub use bitext::BitextClient;
pub use chatterbox::ChatterboxClient;
pub use datumbox::DatumboxClient;
pub use lymbix::LymbixClient;
pub use repustate::RepustateClient;
pub use sentigem::SentigemClient;
pub use skyttle::SkyttleClient;
pub use traits::{BackendError, BackendResult, SentimentBackend};
pub use viralheat::ViralheatClient;

use std::collections::HashSet;
use std::sync::Arc;

use crate::config::{Config, ConfigError};

/// Every backend this crate can build, in default display order
pub const KNOWN_BACKENDS: &[&str] = &[
    "skyttle",
    "chatterbox",
    "datumbox",
    "repustate",
    "bitext",
    "viralheat",
    "lymbix",
    "aiapplied",
    "sentigem",
    "alchemy",
];

pub type SharedBackend = Arc<dyn SentimentBackend>;

/// Immutable, ordered set of uniquely named backends.
///
/// Built once at startup; registration order is display order.
#[derive(Clone)]
pub struct BackendRegistry {
    backends: Arc<[SharedBackend]>,
}

impl BackendRegistry {
    pub fn new(backends: Vec<SharedBackend>) -> Result<Self, ConfigError> {
        if backends.is_empty() {
            return Err(ConfigError::NoBackends);
        }

        let mut seen = HashSet::new();
        for backend in &backends {
            if !seen.insert(backend.name().to_string()) {
                return Err(ConfigError::DuplicateBackend(backend.name().to_string()));
            }
        }

        Ok(Self {
            backends: backends.into(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &SharedBackend> {
        self.backends.iter()
    }

    pub fn names(&self) -> Vec<String> {
        self.backends.iter().map(|b| b.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}

impl std::fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendRegistry")
            .field("backends", &self.names())
            .finish()
    }
}

/// Create one backend by name from configuration
pub fn create_backend(name: &str, config: &Config) -> Result<SharedBackend, ConfigError> {
    let backend: SharedBackend = match name.to_lowercase().as_str() {
        "skyttle" => Arc::new(SkyttleClient::from_config(config)?),
        "chatterbox" => Arc::new(ChatterboxClient::from_config(config)?),
        "datumbox" => Arc::new(DatumboxClient::from_config(config)?),
        "repustate" => Arc::new(RepustateClient::from_config(config)?),
        "bitext" => Arc::new(BitextClient::from_config(config)?),
        "viralheat" => Arc::new(ViralheatClient::from_config(config)?),
        "lymbix" => Arc::new(LymbixClient::from_config(config)?),
        "aiapplied" | "ai-applied" => Arc::new(AiAppliedClient::from_config(config)?),
        "sentigem" => Arc::new(SentigemClient::from_config(config)?),
        "alchemy" => Arc::new(AlchemyClient::from_config(config)?),
        _ => return Err(ConfigError::UnknownBackend(name.to_string())),
    };
    Ok(backend)
}

/// Create the configured backends, optionally restricted to `names`.
///
/// Any missing credential is an error here, before a single request is sent.
pub fn create_backends_with_config(
    config: &Config,
    names: Option<&[&str]>,
) -> Result<BackendRegistry, ConfigError> {
    let selected: Vec<&str> = match names {
        Some(names) => names.to_vec(),
        None => config.selected_backends(),
    };

    let mut backends = Vec::with_capacity(selected.len());
    for name in selected {
        backends.push(create_backend(name, config)?);
        tracing::debug!("Registered backend {}", name);
    }

    BackendRegistry::new(backends)
}

/// Whether a backend has the credentials it needs to be built
pub fn has_credentials(name: &str, config: &Config) -> bool {
    create_backend(name, config).is_ok()
}
