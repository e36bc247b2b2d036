use crate::stats::{ArticleStats, StageProgress};
use crate::{Article, Job};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct JobWatchView {
    pub job_id: Option<String>,
    pub job: Option<Job>,
    pub articles: Vec<Article>,
    pub stats: ArticleStats,
    pub progress: Option<StageProgress>,
    pub polling: bool,
    pub closed: bool,
    pub last_error: Option<String>,
    /// Responses dropped because a newer one had already been applied.
    pub discarded_responses: usize,
    pub dirty: bool,
}
