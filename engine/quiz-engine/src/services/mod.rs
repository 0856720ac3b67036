use crate::config::Config;

use self::history_store::HistoryStore;
use self::loader::QuestionSource;
use self::repository::QuestionRepository;
use self::storage::FileStateStore;

pub struct AppState {
    pub config: Config,
    pub repository: QuestionRepository,
    pub history: HistoryStore,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        tracing::info!("Loading question bank from {}", config.questions_source);

        let source = QuestionSource::new(&config.questions_source);
        let repository = source.load_repository().await?;

        tracing::info!(
            "Question bank ready: {} questions across {} subjects",
            repository.len(),
            repository.subjects().len()
        );

        let store = FileStateStore::open(&config.data_dir)?;
        let history = HistoryStore::new(Box::new(store), config.history_limit);

        Ok(Self {
            config,
            repository,
            history,
        })
    }
}

pub mod aggregator;
pub mod composer;
pub mod history_store;
pub mod loader;
pub mod repository;
pub mod storage;
