use std::future;
use std::sync::{mpsc, Arc};
use std::time::Duration;

use client_logging::{client_debug, client_warn};
use pubmed_core::{update, Effect, JobWatchView, Msg, WatchState};
use tokio::task::JoinSet;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::articles::ArticlesService;
use crate::jobs::JobsService;

/// Receives a fresh view whenever the watched job changes.
pub trait WatchSink: Send + Sync {
    fn emit(&self, view: JobWatchView);
}

pub struct ChannelWatchSink {
    tx: mpsc::Sender<JobWatchView>,
}

impl ChannelWatchSink {
    pub fn new(tx: mpsc::Sender<JobWatchView>) -> Self {
        Self { tx }
    }
}

impl WatchSink for ChannelWatchSink {
    fn emit(&self, view: JobWatchView) {
        let _ = self.tx.send(view);
    }
}

/// Polls a job and its articles until the job is terminal or the watch is
/// cancelled, executing the effects of the pure watch state machine.
///
/// Fetches run as spawned tasks; a response that settles after a newer one
/// has been applied is dropped by the state machine. At most one fetch per
/// resource is in flight: a tick that finds the previous request still
/// pending skips that resource. Cancelling aborts every fetch still in flight.
pub struct JobWatcher {
    jobs: Arc<dyn JobsService>,
    articles: Arc<dyn ArticlesService>,
    poll_interval: Option<Duration>,
}

impl JobWatcher {
    pub fn new(jobs: Arc<dyn JobsService>, articles: Arc<dyn ArticlesService>) -> Self {
        Self {
            jobs,
            articles,
            poll_interval: None,
        }
    }

    /// Overrides the polling interval requested by the state machine.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    /// Runs the watch to completion and returns the last view.
    pub async fn watch(
        &self,
        job_id: &str,
        sink: &dyn WatchSink,
        cancel: CancellationToken,
    ) -> JobWatchView {
        let mut state = WatchState::new();
        let mut fetches: JoinSet<Msg> = JoinSet::new();
        let mut ticker: Option<Interval> = None;
        let mut in_flight = InFlight::default();

        let mut pending = vec![Msg::Opened {
            job_id: job_id.to_string(),
        }];

        loop {
            for msg in pending.drain(..) {
                let (next, effects) = update(state, msg);
                state = next;
                self.run_effects(effects, &mut fetches, &mut ticker, &mut in_flight);
            }
            if state.consume_dirty() {
                sink.emit(state.view());
            }
            if state.is_closed() || (ticker.is_none() && fetches.is_empty()) {
                break;
            }

            tokio::select! {
                _ = cancel.cancelled() => {
                    client_debug!("Watch of job {} cancelled", job_id);
                    fetches.abort_all();
                    pending.push(Msg::Closed);
                }
                Some(joined) = fetches.join_next(), if !fetches.is_empty() => {
                    match joined {
                        Ok(msg) => {
                            in_flight.settle(&msg);
                            pending.push(msg);
                        }
                        Err(err) => {
                            // The failed task's resource is unknown; free both.
                            client_warn!("Fetch task for job {} failed: {}", job_id, err);
                            in_flight = InFlight::default();
                        }
                    }
                }
                _ = next_tick(&mut ticker) => pending.push(Msg::PollTick),
            }
        }

        let view = state.view();
        if view.discarded_responses > 0 {
            client_debug!(
                "Watch of job {} dropped {} stale responses",
                job_id,
                view.discarded_responses
            );
        }
        view
    }

    fn run_effects(
        &self,
        effects: Vec<Effect>,
        fetches: &mut JoinSet<Msg>,
        ticker: &mut Option<Interval>,
        in_flight: &mut InFlight,
    ) {
        for effect in effects {
            match effect {
                Effect::FetchJob { job_id, generation } => {
                    if in_flight.job {
                        client_debug!(
                            "Skipping job fetch {} for {}: previous request still pending",
                            generation,
                            job_id
                        );
                        continue;
                    }
                    in_flight.job = true;
                    let jobs = Arc::clone(&self.jobs);
                    fetches.spawn(async move {
                        let result = jobs.get_job(&job_id).await.map_err(|err| err.to_string());
                        Msg::JobLoaded { generation, result }
                    });
                }
                Effect::FetchArticles { job_id, generation } => {
                    if in_flight.articles {
                        client_debug!(
                            "Skipping article fetch {} for {}: previous request still pending",
                            generation,
                            job_id
                        );
                        continue;
                    }
                    in_flight.articles = true;
                    let articles = Arc::clone(&self.articles);
                    fetches.spawn(async move {
                        let result = articles
                            .get_job_articles(&job_id)
                            .await
                            .map_err(|err| err.to_string());
                        Msg::ArticlesLoaded { generation, result }
                    });
                }
                Effect::StartPolling { interval } => {
                    let interval = self.poll_interval.unwrap_or(interval);
                    let mut next = interval_at(Instant::now() + interval, interval);
                    next.set_missed_tick_behavior(MissedTickBehavior::Delay);
                    *ticker = Some(next);
                }
                Effect::StopPolling => *ticker = None,
            }
        }
    }
}

#[derive(Debug, Default)]
struct InFlight {
    job: bool,
    articles: bool,
}

impl InFlight {
    fn settle(&mut self, msg: &Msg) {
        match msg {
            Msg::JobLoaded { .. } => self.job = false,
            Msg::ArticlesLoaded { .. } => self.articles = false,
            _ => {}
        }
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => future::pending::<()>().await,
    }
}
