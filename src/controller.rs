//! Fetch lifecycle for the dashboard.
//!
//! The controller lives on the UI thread and is driven by [`RefreshController::tick`]
//! once per frame. Fetches run on worker threads and report back over a
//! channel, so every state transition still happens on the UI thread.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use chrono::Local;

use crate::errors::FetchError;
use crate::models::TrendItem;
use crate::state::{Event, PresentationState};
use crate::trends_client::TrendsSource;

/// Recurring deadline owned by the controller.
///
/// There is at most one pending deadline, so re-arming can never leave a
/// second timer running.
#[derive(Debug)]
pub struct PollTimer {
    interval: Duration,
    next_deadline: Option<Instant>,
}

impl PollTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_deadline: None,
        }
    }

    /// Arm the timer one interval from `now`. Returns false if it was already armed.
    pub fn arm(&mut self, now: Instant) -> bool {
        if self.next_deadline.is_some() {
            return false;
        }
        self.next_deadline = Some(now + self.interval);
        true
    }

    /// Returns true if a pending deadline was cancelled.
    pub fn cancel(&mut self) -> bool {
        self.next_deadline.take().is_some()
    }

    pub fn is_armed(&self) -> bool {
        self.next_deadline.is_some()
    }

    /// Fire if the deadline has passed, re-arming for the next period.
    ///
    /// After a long stall (suspended laptop) the timer fires once and
    /// restarts from `now` instead of replaying every missed period.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        let deadline = match self.next_deadline {
            Some(deadline) if now >= deadline => deadline,
            _ => return false,
        };

        let mut next = deadline + self.interval;
        if next <= now {
            next = now + self.interval;
        }
        self.next_deadline = Some(next);
        true
    }

    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.next_deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }
}

/// Tagged result of one fetch, sent from the worker back to the UI thread.
struct FetchOutcome {
    seq: u64,
    result: Result<Vec<TrendItem>, FetchError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    NotStarted,
    Running,
    ShutDown,
}

pub struct RefreshController {
    source: Arc<dyn TrendsSource>,
    state: PresentationState,
    timer: PollTimer,
    outcome_tx: Sender<FetchOutcome>,
    // Dropped on shutdown; late outcomes then have nowhere to go
    outcome_rx: Option<Receiver<FetchOutcome>>,
    lifecycle: Lifecycle,
    next_seq: u64,
    in_flight: usize,
}

impl RefreshController {
    pub fn new(source: Arc<dyn TrendsSource>, poll_interval: Duration) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::channel();
        Self {
            source,
            state: PresentationState::new(),
            timer: PollTimer::new(poll_interval),
            outcome_tx,
            outcome_rx: Some(outcome_rx),
            lifecycle: Lifecycle::NotStarted,
            next_seq: 0,
            in_flight: 0,
        }
    }

    pub fn state(&self) -> &PresentationState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        self.lifecycle == Lifecycle::Running
    }

    /// Number of fetches issued whose outcome has not been applied yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Issue the initial fetch and arm the poll timer.
    ///
    /// Only the first call does anything; later calls (including after
    /// shutdown) are ignored.
    pub fn start(&mut self, now: Instant) {
        if self.lifecycle != Lifecycle::NotStarted {
            tracing::debug!(
                event = "dashboard.controller.start_ignored",
                lifecycle = ?self.lifecycle
            );
            return;
        }

        self.lifecycle = Lifecycle::Running;
        self.begin_fetch(Event::Start);
        self.timer.arm(now);

        tracing::info!(
            event = "dashboard.controller.started",
            poll_interval_secs = self.timer.interval.as_secs()
        );
    }

    /// User-triggered fetch.
    ///
    /// Safe to call while another fetch is in flight; whichever completes
    /// last determines the final state.
    pub fn refresh_now(&mut self) {
        if !self.is_active() {
            return;
        }
        tracing::info!(event = "dashboard.refresh.manual", in_flight = self.in_flight);
        self.begin_fetch(Event::ManualRefresh);
    }

    /// Per-frame driver: fires the poll timer if due, then applies finished fetches.
    pub fn tick(&mut self, now: Instant) {
        if !self.is_active() {
            return;
        }

        if self.timer.fire_if_due(now) {
            tracing::info!(event = "dashboard.poll.timer_fired", in_flight = self.in_flight);
            self.begin_fetch(Event::TimerTick);
        }

        self.poll_completions();
    }

    /// Apply every outcome that has arrived, in arrival order. Returns how many were applied.
    pub fn poll_completions(&mut self) -> usize {
        if !self.is_active() {
            return 0;
        }

        let mut outcomes = Vec::new();
        if let Some(rx) = &self.outcome_rx {
            while let Ok(outcome) = rx.try_recv() {
                outcomes.push(outcome);
            }
        }

        let applied = outcomes.len();
        for outcome in outcomes {
            self.apply_outcome(outcome);
        }
        applied
    }

    /// Time left until the poll timer fires, if it is armed.
    pub fn time_until_next_poll(&self, now: Instant) -> Option<Duration> {
        if !self.is_active() {
            return None;
        }
        self.timer.remaining(now)
    }

    /// Tear down: cancel the timer and stop applying outcomes. Idempotent.
    pub fn shutdown(&mut self) {
        if self.lifecycle == Lifecycle::ShutDown {
            return;
        }

        self.lifecycle = Lifecycle::ShutDown;
        let cancelled = self.timer.cancel();
        self.outcome_rx = None;

        tracing::info!(
            event = "dashboard.controller.shutdown",
            timer_cancelled = cancelled,
            abandoned_fetches = self.in_flight
        );
    }

    fn begin_fetch(&mut self, trigger: Event) {
        self.state.apply(trigger);

        let seq = self.next_seq;
        self.next_seq += 1;
        self.in_flight += 1;

        tracing::debug!(event = "dashboard.fetch.started", seq = seq);

        let source = Arc::clone(&self.source);
        let tx = self.outcome_tx.clone();
        thread::spawn(move || {
            let result = source.fetch_trends();
            // Receiver is gone after shutdown; the outcome is simply dropped
            let _ = tx.send(FetchOutcome { seq, result });
        });
    }

    fn apply_outcome(&mut self, outcome: FetchOutcome) {
        self.in_flight = self.in_flight.saturating_sub(1);

        match outcome.result {
            Ok(trends) => {
                tracing::info!(
                    event = "dashboard.fetch.succeeded",
                    seq = outcome.seq,
                    count = trends.len()
                );
                self.state.apply(Event::FetchSucceeded {
                    trends,
                    at: Local::now(),
                });
            }
            Err(error) => {
                tracing::warn!(
                    event = "dashboard.fetch.failed",
                    seq = outcome.seq,
                    error_code = error.error_code(),
                    error = %error
                );
                self.state.apply(Event::FetchFailed(error));
            }
        }
    }
}

impl Drop for RefreshController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FETCH_FAILURE_MESSAGE;
    use crate::state::Status;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const INTERVAL: Duration = Duration::from_secs(300);

    struct Step {
        gate: Option<Receiver<()>>,
        result: Result<Vec<TrendItem>, FetchError>,
    }

    /// Source that replays a script of results, optionally holding each one
    /// until the test releases its gate.
    #[derive(Default)]
    struct ScriptedSource {
        script: Mutex<VecDeque<Step>>,
        calls: AtomicUsize,
    }

    impl ScriptedSource {
        fn push(&self, result: Result<Vec<TrendItem>, FetchError>) {
            self.script.lock().unwrap().push_back(Step { gate: None, result });
        }

        fn push_gated(&self, result: Result<Vec<TrendItem>, FetchError>) -> Sender<()> {
            let (release, gate) = mpsc::channel();
            self.script.lock().unwrap().push_back(Step {
                gate: Some(gate),
                result,
            });
            release
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl TrendsSource for ScriptedSource {
        fn fetch_trends(&self) -> Result<Vec<TrendItem>, FetchError> {
            let step = {
                let mut script = self.script.lock().unwrap();
                let step = script.pop_front();
                self.calls.fetch_add(1, Ordering::SeqCst);
                step
            };
            match step {
                Some(step) => {
                    if let Some(gate) = step.gate {
                        let _ = gate.recv();
                    }
                    step.result
                }
                None => Ok(Vec::new()),
            }
        }
    }

    fn item(id: &str) -> TrendItem {
        TrendItem {
            id: id.to_string(),
            title: format!("Post {}", id),
            url: format!("http://example.com/{}", id),
            subreddit: "tech".to_string(),
            score: 42,
            comments: 7,
            created: None,
        }
    }

    fn failure() -> FetchError {
        FetchError::Status {
            url: "http://localhost:8000/api/trends".to_string(),
            status: 502,
        }
    }

    fn controller(source: &Arc<ScriptedSource>) -> RefreshController {
        RefreshController::new(source.clone(), INTERVAL)
    }

    fn wait_until(mut condition: impl FnMut() -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !condition() {
            assert!(Instant::now() < deadline, "timed out waiting for condition");
            thread::sleep(Duration::from_millis(5));
        }
    }

    fn wait_for_outcomes(controller: &mut RefreshController, expected: usize) {
        let mut applied = 0;
        wait_until(|| {
            applied += controller.poll_completions();
            applied >= expected
        });
    }

    #[test]
    fn test_poll_timer_fires_once_per_period() {
        let start = Instant::now();
        let mut timer = PollTimer::new(INTERVAL);
        assert!(timer.arm(start));
        assert!(!timer.arm(start), "second arm must not create another deadline");

        assert!(!timer.fire_if_due(start + Duration::from_secs(299)));
        assert!(timer.fire_if_due(start + INTERVAL));
        assert!(!timer.fire_if_due(start + INTERVAL));
        assert_eq!(
            timer.remaining(start + INTERVAL),
            Some(INTERVAL),
            "re-armed one full period after the previous deadline"
        );
    }

    #[test]
    fn test_poll_timer_does_not_replay_missed_periods() {
        let start = Instant::now();
        let mut timer = PollTimer::new(INTERVAL);
        timer.arm(start);

        let late = start + INTERVAL * 10;
        assert!(timer.fire_if_due(late));
        assert!(!timer.fire_if_due(late));
        assert_eq!(timer.remaining(late), Some(INTERVAL));
    }

    #[test]
    fn test_poll_timer_cancel() {
        let start = Instant::now();
        let mut timer = PollTimer::new(INTERVAL);
        timer.arm(start);
        assert!(timer.cancel());
        assert!(!timer.cancel());
        assert!(!timer.is_armed());
        assert!(!timer.fire_if_due(start + INTERVAL));
    }

    #[test]
    fn test_start_fetches_immediately_and_enters_loading() {
        let source = Arc::new(ScriptedSource::default());
        source.push(Ok(vec![item("1")]));
        let mut controller = controller(&source);

        controller.start(Instant::now());
        assert_eq!(controller.state().status(), Status::Loading);
        assert_eq!(controller.in_flight(), 1);

        wait_for_outcomes(&mut controller, 1);
        assert_eq!(controller.state().status(), Status::Ready);
        assert_eq!(controller.state().trends(), &[item("1")]);
        assert!(controller.state().last_updated().is_some());
        assert_eq!(controller.in_flight(), 0);
    }

    #[test]
    fn test_first_load_empty_list() {
        let source = Arc::new(ScriptedSource::default());
        source.push(Ok(Vec::new()));
        let mut controller = controller(&source);

        controller.start(Instant::now());
        wait_for_outcomes(&mut controller, 1);

        assert_eq!(controller.state().status(), Status::Ready);
        assert!(controller.state().trends().is_empty());
        assert!(controller.state().last_updated().is_some());
    }

    #[test]
    fn test_start_is_idempotent() {
        let source = Arc::new(ScriptedSource::default());
        let mut controller = controller(&source);
        let now = Instant::now();

        controller.start(now);
        controller.start(now + Duration::from_secs(10));
        wait_for_outcomes(&mut controller, 1);

        assert_eq!(source.calls(), 1);
        assert_eq!(controller.time_until_next_poll(now), Some(INTERVAL));
    }

    #[test]
    fn test_timer_tick_issues_fetch_without_user_action() {
        let source = Arc::new(ScriptedSource::default());
        source.push(Ok(vec![item("first")]));
        let release = source.push_gated(Ok(vec![item("second")]));
        let mut controller = controller(&source);
        let start = Instant::now();

        controller.start(start);
        wait_for_outcomes(&mut controller, 1);

        controller.tick(start + Duration::from_secs(120));
        assert_eq!(source.calls(), 1);

        controller.tick(start + INTERVAL);
        assert_eq!(controller.state().status(), Status::Loading);
        // Existing list stays visible during the background refresh
        assert_eq!(controller.state().trends(), &[item("first")]);

        release.send(()).unwrap();
        wait_for_outcomes(&mut controller, 1);
        assert_eq!(source.calls(), 2);
        assert_eq!(controller.state().trends(), &[item("second")]);
    }

    #[test]
    fn test_failed_refresh_keeps_previous_list() {
        let source = Arc::new(ScriptedSource::default());
        source.push(Ok(vec![item("1")]));
        source.push(Err(failure()));
        let mut controller = controller(&source);

        controller.start(Instant::now());
        wait_for_outcomes(&mut controller, 1);
        let updated = controller.state().last_updated();

        controller.refresh_now();
        wait_for_outcomes(&mut controller, 1);

        let state = controller.state();
        assert_eq!(state.status(), Status::Error);
        assert_eq!(state.error_message(), Some(FETCH_FAILURE_MESSAGE));
        assert_eq!(state.trends(), &[item("1")]);
        assert_eq!(state.last_updated(), updated);
    }

    #[test]
    fn test_overlapping_fetches_last_completion_wins() {
        let source = Arc::new(ScriptedSource::default());
        let release_slow = source.push_gated(Ok(vec![item("slow")]));
        source.push(Ok(vec![item("fast")]));
        let mut controller = controller(&source);

        controller.start(Instant::now());
        wait_until(|| source.calls() == 1);
        controller.refresh_now();
        assert_eq!(controller.in_flight(), 2);

        wait_for_outcomes(&mut controller, 1);
        assert_eq!(controller.state().trends(), &[item("fast")]);

        release_slow.send(()).unwrap();
        wait_for_outcomes(&mut controller, 1);
        assert_eq!(controller.state().trends(), &[item("slow")]);
        assert_eq!(controller.state().status(), Status::Ready);
        assert_eq!(controller.in_flight(), 0);
    }

    #[test]
    fn test_rapid_manual_refreshes_do_not_corrupt_state() {
        let source = Arc::new(ScriptedSource::default());
        let mut controller = controller(&source);

        controller.start(Instant::now());
        for _ in 0..5 {
            controller.refresh_now();
        }
        wait_for_outcomes(&mut controller, 6);

        assert_eq!(source.calls(), 6);
        assert_eq!(controller.state().status(), Status::Ready);
        assert!(controller.state().trends().is_empty());
        assert_eq!(controller.in_flight(), 0);
    }

    #[test]
    fn test_shutdown_discards_in_flight_outcome() {
        let source = Arc::new(ScriptedSource::default());
        let release = source.push_gated(Ok(vec![item("late")]));
        let mut controller = controller(&source);
        let start = Instant::now();

        controller.start(start);
        wait_until(|| source.calls() == 1);
        controller.shutdown();

        // Worker may already have exited if the gate was dropped; either way is fine
        let _ = release.send(());
        thread::sleep(Duration::from_millis(50));

        assert_eq!(controller.poll_completions(), 0);
        controller.tick(start + INTERVAL * 2);

        assert!(!controller.is_active());
        assert_eq!(controller.state().status(), Status::Loading);
        assert!(controller.state().trends().is_empty());
        assert!(controller.state().last_updated().is_none());
        assert_eq!(source.calls(), 1, "no fetch after teardown");
    }

    #[test]
    fn test_shutdown_is_idempotent_and_stops_polling() {
        let source = Arc::new(ScriptedSource::default());
        let mut controller = controller(&source);
        let start = Instant::now();

        controller.start(start);
        wait_for_outcomes(&mut controller, 1);
        controller.shutdown();
        controller.shutdown();

        assert_eq!(controller.time_until_next_poll(start), None);
        controller.refresh_now();
        controller.start(start);
        assert_eq!(source.calls(), 1);
    }

    #[test]
    fn test_nothing_happens_before_start() {
        let source = Arc::new(ScriptedSource::default());
        let mut controller = controller(&source);

        controller.refresh_now();
        controller.tick(Instant::now() + INTERVAL);

        assert_eq!(controller.state().status(), Status::Idle);
        assert_eq!(controller.time_until_next_poll(Instant::now()), None);
        assert_eq!(source.calls(), 0);
    }
}
