use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use client_logging::client_info;
use pubmed_client::{
    ArticlesApi, ArticlesService, ClientConfig, JobsApi, JobsService, MockBackend, MockStore,
    ReqwestTransport, Transport,
};

use crate::cli::Cli;

/// The job and article services a command talks to.
pub struct Backend {
    pub jobs: Arc<dyn JobsService>,
    pub articles: Arc<dyn ArticlesService>,
}

impl Backend {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        if cli.mock {
            client_info!("Using mock backend ({} ms delay)", cli.mock_delay_ms);
            return Ok(Self::mock(Duration::from_millis(cli.mock_delay_ms)));
        }

        let mut config = ClientConfig::from_env()?;
        if let Some(base_url) = &cli.base_url {
            config = config.with_base_url(base_url)?;
        }
        Self::http(&config)
    }

    /// Both services share one connection pool.
    pub fn http(config: &ClientConfig) -> Result<Self> {
        client_info!("Using backend at {}", config.base_url);
        let transport: Arc<dyn Transport> = Arc::new(ReqwestTransport::new(&config.transport)?);
        Ok(Self {
            jobs: Arc::new(JobsApi::with_transport(
                config.base_url.clone(),
                Arc::clone(&transport),
            )),
            articles: Arc::new(ArticlesApi::with_transport(config.base_url.clone(), transport)),
        })
    }

    pub fn mock(delay: Duration) -> Self {
        let mock = Arc::new(MockBackend::new(MockStore::default(), delay));
        Self {
            jobs: mock.clone(),
            articles: mock,
        }
    }
}
