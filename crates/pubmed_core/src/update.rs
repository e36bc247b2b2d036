use crate::{Effect, Msg, WatchState, POLL_INTERVAL};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: WatchState, msg: Msg) -> (WatchState, Vec<Effect>) {
    let effects = match msg {
        Msg::Opened { job_id } => {
            let job_id = job_id.trim().to_string();
            if job_id.is_empty() {
                return (state, Vec::new());
            }
            let mut effects = Vec::with_capacity(3);
            if state.is_polling() {
                effects.push(Effect::StopPolling);
            }
            let generation = state.open(job_id.clone());
            effects.push(Effect::FetchJob {
                job_id: job_id.clone(),
                generation,
            });
            effects.push(Effect::FetchArticles { job_id, generation });
            effects
        }
        Msg::PollTick => match state.job_id() {
            Some(job_id) if state.is_polling() && !state.is_closed() => {
                let job_id = job_id.to_string();
                let generation = state.issue_generation();
                vec![
                    Effect::FetchJob {
                        job_id: job_id.clone(),
                        generation,
                    },
                    Effect::FetchArticles { job_id, generation },
                ]
            }
            _ => Vec::new(),
        },
        Msg::JobLoaded { generation, result } => {
            if state.is_closed() || !state.accept_job_generation(generation) {
                state.note_discarded();
                return (state, Vec::new());
            }
            match result {
                Ok(job) => {
                    let terminal = job.status.is_terminal();
                    state.set_job(job);
                    if terminal && state.is_polling() {
                        state.set_polling(false);
                        vec![Effect::StopPolling]
                    } else if !terminal && !state.is_polling() {
                        state.set_polling(true);
                        vec![Effect::StartPolling {
                            interval: POLL_INTERVAL,
                        }]
                    } else {
                        Vec::new()
                    }
                }
                // Polling carries on; the next tick may succeed.
                Err(message) => {
                    state.set_job_error(message);
                    Vec::new()
                }
            }
        }
        Msg::ArticlesLoaded { generation, result } => {
            if state.is_closed() || !state.accept_articles_generation(generation) {
                state.note_discarded();
                return (state, Vec::new());
            }
            match result {
                Ok(articles) => state.set_articles(articles),
                Err(message) => state.set_articles_error(message),
            }
            Vec::new()
        }
        Msg::Closed => {
            if state.is_closed() {
                return (state, Vec::new());
            }
            let was_polling = state.is_polling();
            state.close();
            if was_polling {
                vec![Effect::StopPolling]
            } else {
                Vec::new()
            }
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
