use std::sync::Once;

use pretty_assertions::assert_eq;
use pubmed_core::{
    update, Article, ArticleStatus, Effect, Job, JobStatus, Msg, WatchState, POLL_INTERVAL,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(client_logging::initialize_for_tests);
}

fn job(status: JobStatus) -> Job {
    Job {
        id: "jobA".to_string(),
        created_at: "2024-05-01T09:30:00Z".to_string(),
        name: "AF".to_string(),
        query: "malnutrition AND afib".to_string(),
        max_results: 50,
        date_from: None,
        date_to: None,
        pmc_only: false,
        allow_external: true,
        concurrency: 3,
        status,
        error_msg: None,
    }
}

fn article(id: &str, status: ArticleStatus) -> Article {
    Article {
        id: id.to_string(),
        job_id: "jobA".to_string(),
        pmid: "123".to_string(),
        title: "Title".to_string(),
        pubmed_url: "https://pubmed.ncbi.nlm.nih.gov/123/".to_string(),
        pmc_id: None,
        external_url: None,
        chosen_pdf_url: None,
        status,
        failure_reason: None,
        retries: 0,
    }
}

fn open(job_id: &str) -> (WatchState, Vec<Effect>) {
    update(
        WatchState::new(),
        Msg::Opened {
            job_id: job_id.to_string(),
        },
    )
}

#[test]
fn opening_issues_initial_fetches() {
    init_logging();
    let (mut state, effects) = open("jobA");

    assert_eq!(
        effects,
        vec![
            Effect::FetchJob {
                job_id: "jobA".to_string(),
                generation: 1,
            },
            Effect::FetchArticles {
                job_id: "jobA".to_string(),
                generation: 1,
            },
        ]
    );
    assert_eq!(state.job_id(), Some("jobA"));
    assert!(!state.is_polling());
    assert!(state.consume_dirty());
}

#[test]
fn blank_job_id_is_ignored() {
    let (state, effects) = open("   ");
    assert!(effects.is_empty());
    assert_eq!(state.job_id(), None);
}

#[test]
fn non_terminal_job_starts_polling_once() {
    init_logging();
    let (state, _) = open("jobA");
    let (state, effects) = update(
        state,
        Msg::JobLoaded {
            generation: 1,
            result: Ok(job(JobStatus::Searching)),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::StartPolling {
            interval: POLL_INTERVAL
        }]
    );
    assert!(state.is_polling());

    let (state, effects) = update(state, Msg::PollTick);
    assert_eq!(effects.len(), 2);
    let (_state, effects) = update(
        state,
        Msg::JobLoaded {
            generation: 2,
            result: Ok(job(JobStatus::Resolving)),
        },
    );
    assert!(effects.is_empty());
}

#[test]
fn terminal_job_on_first_load_never_polls() {
    let (state, _) = open("jobA");
    let (state, effects) = update(
        state,
        Msg::JobLoaded {
            generation: 1,
            result: Ok(job(JobStatus::Completed)),
        },
    );
    assert!(effects.is_empty());
    assert!(!state.is_polling());

    let (_state, effects) = update(state, Msg::PollTick);
    assert!(effects.is_empty());
}

#[test]
fn terminal_status_stops_polling() {
    let (state, _) = open("jobA");
    let (state, _) = update(
        state,
        Msg::JobLoaded {
            generation: 1,
            result: Ok(job(JobStatus::Downloading)),
        },
    );
    let (state, _) = update(state, Msg::PollTick);
    let (state, effects) = update(
        state,
        Msg::JobLoaded {
            generation: 2,
            result: Ok(job(JobStatus::Failed)),
        },
    );
    assert_eq!(effects, vec![Effect::StopPolling]);
    assert!(!state.is_polling());
    assert_eq!(state.view().job.unwrap().status, JobStatus::Failed);
}

#[test]
fn stale_response_does_not_overwrite_newer_one() {
    init_logging();
    let (state, _) = open("jobA");
    let (state, _) = update(
        state,
        Msg::JobLoaded {
            generation: 1,
            result: Ok(job(JobStatus::Searching)),
        },
    );
    // Two ticks in flight; the second settles first.
    let (state, _) = update(state, Msg::PollTick);
    let (state, _) = update(state, Msg::PollTick);
    let (state, _) = update(
        state,
        Msg::JobLoaded {
            generation: 3,
            result: Ok(job(JobStatus::Downloading)),
        },
    );
    let (state, effects) = update(
        state,
        Msg::JobLoaded {
            generation: 2,
            result: Ok(job(JobStatus::Resolving)),
        },
    );

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.job.unwrap().status, JobStatus::Downloading);
    assert_eq!(view.discarded_responses, 1);
}

#[test]
fn stale_articles_are_discarded_independently() {
    let (state, _) = open("jobA");
    let (state, _) = update(
        state,
        Msg::JobLoaded {
            generation: 1,
            result: Ok(job(JobStatus::Downloading)),
        },
    );
    let (state, _) = update(state, Msg::PollTick);
    let (state, _) = update(
        state,
        Msg::ArticlesLoaded {
            generation: 2,
            result: Ok(vec![article("a1", ArticleStatus::Downloaded)]),
        },
    );
    let (state, _) = update(
        state,
        Msg::ArticlesLoaded {
            generation: 1,
            result: Ok(vec![article("a1", ArticleStatus::PendingUrls)]),
        },
    );

    let view = state.view();
    assert_eq!(view.articles.len(), 1);
    assert_eq!(view.articles[0].status, ArticleStatus::Downloaded);
    assert_eq!(view.stats.downloaded, 1);
}

#[test]
fn errors_are_recorded_and_polling_continues() {
    let (state, _) = open("jobA");
    let (state, _) = update(
        state,
        Msg::JobLoaded {
            generation: 1,
            result: Ok(job(JobStatus::Resolving)),
        },
    );
    let (state, _) = update(state, Msg::PollTick);
    let (state, effects) = update(
        state,
        Msg::JobLoaded {
            generation: 2,
            result: Err("Bad Gateway".to_string()),
        },
    );
    assert!(effects.is_empty());
    assert!(state.is_polling());
    assert_eq!(state.view().last_error.as_deref(), Some("Bad Gateway"));

    let (state, _) = update(state, Msg::PollTick);
    let (state, _) = update(
        state,
        Msg::JobLoaded {
            generation: 3,
            result: Ok(job(JobStatus::Resolving)),
        },
    );
    assert_eq!(state.view().last_error, None);
}

#[test]
fn job_failure_survives_a_successful_article_load() {
    let (state, _) = open("jobA");
    let (state, _) = update(
        state,
        Msg::JobLoaded {
            generation: 1,
            result: Err("job fetch failed".to_string()),
        },
    );
    let (state, _) = update(
        state,
        Msg::ArticlesLoaded {
            generation: 1,
            result: Ok(vec![article("a1", ArticleStatus::PendingUrls)]),
        },
    );
    assert_eq!(state.last_error(), Some("job fetch failed"));
    assert_eq!(state.view().last_error.as_deref(), Some("job fetch failed"));
    assert_eq!(state.articles().len(), 1);
}

#[test]
fn article_failure_survives_a_successful_job_load() {
    let (state, _) = open("jobA");
    let (state, _) = update(
        state,
        Msg::ArticlesLoaded {
            generation: 1,
            result: Err("Service Unavailable".to_string()),
        },
    );
    let (state, _) = update(
        state,
        Msg::JobLoaded {
            generation: 1,
            result: Ok(job(JobStatus::Searching)),
        },
    );
    assert_eq!(state.last_error(), Some("Service Unavailable"));

    let (state, _) = update(state, Msg::PollTick);
    let (state, _) = update(
        state,
        Msg::ArticlesLoaded {
            generation: 2,
            result: Ok(Vec::new()),
        },
    );
    assert_eq!(state.last_error(), None);
}

#[test]
fn responses_after_close_are_ignored() {
    let (state, _) = open("jobA");
    let (state, _) = update(
        state,
        Msg::JobLoaded {
            generation: 1,
            result: Ok(job(JobStatus::Searching)),
        },
    );
    let (state, _) = update(state, Msg::PollTick);
    let (state, effects) = update(state, Msg::Closed);
    assert_eq!(effects, vec![Effect::StopPolling]);

    let (state, effects) = update(
        state,
        Msg::JobLoaded {
            generation: 2,
            result: Ok(job(JobStatus::Completed)),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.view().job.unwrap().status, JobStatus::Searching);

    let (_state, effects) = update(state, Msg::Closed);
    assert!(effects.is_empty());
}

#[test]
fn reopening_invalidates_requests_for_previous_job() {
    let (state, _) = open("jobA");
    let (state, _) = update(
        state,
        Msg::JobLoaded {
            generation: 1,
            result: Ok(job(JobStatus::Searching)),
        },
    );
    let (state, _) = update(state, Msg::PollTick);
    let (state, effects) = update(
        state,
        Msg::Opened {
            job_id: "jobB".to_string(),
        },
    );
    assert_eq!(effects[0], Effect::StopPolling);
    assert_eq!(
        effects[1],
        Effect::FetchJob {
            job_id: "jobB".to_string(),
            generation: 3,
        }
    );

    // Late answer for jobA's poll.
    let (state, _) = update(
        state,
        Msg::JobLoaded {
            generation: 2,
            result: Ok(job(JobStatus::Completed)),
        },
    );
    assert_eq!(state.view().job, None);
    assert_eq!(state.job_id(), Some("jobB"));
}
