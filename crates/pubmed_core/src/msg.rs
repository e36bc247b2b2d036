use crate::{Article, Job};

/// Monotonic token attached to every fetch issued by the watcher.
pub type Generation = u64;

/// Outcome of a fetch as seen by the state machine. Errors arrive pre-rendered.
pub type FetchResult<T> = Result<T, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Start watching a job (initial load).
    Opened { job_id: String },
    /// The polling timer fired.
    PollTick,
    /// A job fetch settled.
    JobLoaded {
        generation: Generation,
        result: FetchResult<Job>,
    },
    /// An article-list fetch settled.
    ArticlesLoaded {
        generation: Generation,
        result: FetchResult<Vec<Article>>,
    },
    /// The watcher was torn down; late responses are ignored from here on.
    Closed,
    /// Fallback for placeholder wiring.
    NoOp,
}
