//! PubMed client: REST executor, typed job/article clients, and a mock backend.
mod articles;
mod config;
mod error;
mod executor;
mod jobs;
mod mock;
pub mod mock_data;
mod persist;
mod transport;
mod validate;
mod watcher;

pub use articles::{retry_failed, ArticlesApi, ArticlesService, RetryReport};
pub use config::{ClientConfig, ConfigError, API_URL_ENV, DEFAULT_API_URL};
pub use error::{select_message, ApiError, ClientError, ErrorKind, ErrorPayload, Result};
pub use executor::{ApiExecutor, Blob, RequestBody, RequestOptions, JSON_CONTENT_TYPE};
pub use jobs::{ExportFormat, JobsApi, JobsService};
pub use mock::{MockBackend, MockStore, DEFAULT_MOCK_DELAY};
pub use persist::{ensure_output_dir, export_file_name, AtomicFileWriter, ExportKind, PersistError};
pub use transport::{
    CacheMode, FormData, FormValue, ReqwestTransport, Transport, TransportBody, TransportFailure,
    TransportRequest, TransportResponse, TransportSettings,
};
pub use watcher::{ChannelWatchSink, JobWatcher, WatchSink};
