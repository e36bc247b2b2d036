use pubmed_core::{update, Msg, WatchState};

#[test]
fn idle_messages_leave_a_fresh_watch_untouched() {
    for msg in [Msg::NoOp, Msg::PollTick, Msg::Closed] {
        let (next, effects) = update(WatchState::new(), msg);
        assert!(effects.is_empty());
        assert!(next.job_id().is_none());
        assert!(!next.is_polling());
    }
}

#[test]
fn noop_changes_nothing_on_an_open_watch() {
    let (open, _) = update(
        WatchState::new(),
        Msg::Opened {
            job_id: "job_1".to_string(),
        },
    );
    let (next, effects) = update(open.clone(), Msg::NoOp);
    assert_eq!(next, open);
    assert!(effects.is_empty());
}
