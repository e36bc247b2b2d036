//! PubMed core: domain records, validation, and the pure job-watch state machine.
mod article;
mod effect;
mod format;
mod job;
mod msg;
mod state;
mod stats;
mod update;
pub mod validation;
mod view_model;

pub use article::{Article, ArticleStatus};
pub use effect::Effect;
pub use format::{format_date, format_duration, format_file_size, truncate_text};
pub use job::{CreateJobRequest, Job, JobStatus, ParseStatusError};
pub use msg::{FetchResult, Generation, Msg};
pub use state::{WatchState, POLL_INTERVAL};
pub use stats::{ArticleFilter, ArticleStats, StageProgress};
pub use update::update;
pub use view_model::JobWatchView;
