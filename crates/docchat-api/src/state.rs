use std::sync::Arc;
use std::time::Duration;

use docchat_extract::{DocumentExtractor, TesseractOcr};
use docchat_llm::{ChatClient, DocumentAnalyst, OpenAICompatClient};
use docchat_persist::{ConversationStore, InMemoryStore, JsonFileStore};

use crate::config::{Config, StorageBackend};

/// Shared application state passed to all handlers
///
/// Handlers only see the store, extractor and analyst through these handles,
/// so tests can swap in fakes for each of them.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn ConversationStore>,
    pub extractor: Arc<DocumentExtractor>,
    pub analyst: Arc<DocumentAnalyst>,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn ConversationStore>,
        extractor: DocumentExtractor,
        analyst: DocumentAnalyst,
    ) -> Self {
        Self {
            config: Arc::new(config),
            store,
            extractor: Arc::new(extractor),
            analyst: Arc::new(analyst),
        }
    }

    /// Wire up the production collaborators described by `config`.
    pub async fn from_config(config: Config) -> anyhow::Result<Self> {
        tracing::info!("Initializing chat client for {}", config.api_url);
        let client: Arc<dyn ChatClient> = Arc::new(
            OpenAICompatClient::builder()
                .api_key(config.api_key.clone())
                .api_url(config.api_url.clone())
                .timeout(Duration::from_secs(config.llm.timeout_secs))
                .build()?,
        );

        let analyst = DocumentAnalyst::new(client)
            .with_model(config.llm.model.clone())
            .with_provider(config.llm.provider.clone())
            .with_temperature(config.llm.temperature)
            .with_max_tokens(config.llm.max_tokens);

        let ocr = TesseractOcr::new()
            .with_binary(config.ocr.binary.clone())
            .with_language(config.ocr.language.clone());
        let extractor = DocumentExtractor::new(Arc::new(ocr));

        let store: Arc<dyn ConversationStore> = match config.storage.backend {
            StorageBackend::Json => {
                tracing::info!("Opening conversation log at {}", config.storage.path.display());
                Arc::new(JsonFileStore::open(config.storage.path.clone()).await?)
            }
            StorageBackend::Memory => {
                tracing::info!("Using in-memory conversation store");
                Arc::new(InMemoryStore::new())
            }
        };

        Ok(Self::new(config, store, extractor, analyst))
    }
}
