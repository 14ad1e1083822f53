pub mod view;

use crate::error::TallyError;
use crate::models::{LiveMode, ResultsSection};
use crate::tasks::live_tally::run_live_tally;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use view::{SectionView, render_section};

/// Largest number of votes a single candidate can gain in one tick.
pub const MAX_INCREMENT: u64 = 2;

/// Supplies the per-candidate vote increment for a live tick.
pub trait IncrementSource: Send + 'static {
    fn next_increment(&mut self) -> u64;
}

impl<F> IncrementSource for F
where
    F: FnMut() -> u64 + Send + 'static,
{
    fn next_increment(&mut self) -> u64 {
        self()
    }
}

/// Uniform increments in `0..=MAX_INCREMENT`.
pub struct RandomIncrements {
    rng: StdRng,
}

impl RandomIncrements {
    pub fn new() -> Self {
        Self { rng: StdRng::from_entropy() }
    }

    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }
}

impl Default for RandomIncrements {
    fn default() -> Self {
        Self::new()
    }
}

impl IncrementSource for RandomIncrements {
    fn next_increment(&mut self) -> u64 {
        self.rng.gen_range(0..=MAX_INCREMENT)
    }
}

/// Adds one increment to every candidate and derives fresh totals.
/// Works on a copy so a failure leaves `sections` untouched.
pub fn apply_tick(
    sections: &[ResultsSection],
    source: &mut dyn IncrementSource,
) -> Result<Vec<ResultsSection>, TallyError> {
    let mut next = sections.to_vec();
    for section in &mut next {
        let mut total: u64 = 0;
        for candidate in &mut section.candidates {
            let increment = source.next_increment().min(MAX_INCREMENT);
            let next_votes = candidate.votes.checked_add(increment);
            let next_total = next_votes.and_then(|votes| total.checked_add(votes));
            let (Some(votes), Some(sum)) = (next_votes, next_total) else {
                return Err(TallyError::CountOverflow {
                    section: section.key.clone(),
                    candidate_id: candidate.id,
                });
            };
            candidate.votes = votes;
            total = sum;
        }
        section.reported_total = Some(total);
    }
    Ok(next)
}

pub(crate) enum TickOutcome {
    Applied(u64),
    Skipped(TallyError),
    Cancelled,
}

struct TallyState {
    sections: Vec<ResultsSection>,
    mode: LiveMode,
    /// Bumped on every stop; a ticker only acts while its generation is current.
    generation: u64,
    revision: u64,
    source: Box<dyn IncrementSource>,
}

/// State shared between the engine handle and its ticker task.
pub(crate) struct TallyShared {
    state: Mutex<TallyState>,
    updates: watch::Sender<u64>,
}

impl TallyShared {
    // Sections are only ever replaced wholesale, so a poisoned lock still
    // guards consistent data.
    fn lock(&self) -> MutexGuard<'_, TallyState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn tick(&self, generation: u64) -> TickOutcome {
        let revision = {
            let mut state = self.lock();
            if state.generation != generation || state.mode != LiveMode::Live {
                return TickOutcome::Cancelled;
            }
            let state = &mut *state;
            // A panicking source leaves the committed sections untouched.
            let next = catch_unwind(AssertUnwindSafe(|| {
                apply_tick(&state.sections, state.source.as_mut())
            }));
            match next {
                Ok(Ok(next)) => state.sections = next,
                Ok(Err(e)) => return TickOutcome::Skipped(e),
                Err(_) => return TickOutcome::Skipped(TallyError::SourcePanicked),
            }
            state.revision += 1;
            state.revision
        };
        self.updates.send_replace(revision);
        TickOutcome::Applied(revision)
    }
}

/// Owns the results dataset and the live ticker that mutates it.
pub struct TallyEngine {
    shared: Arc<TallyShared>,
    runtime: Handle,
    period: Duration,
    ticker: Option<JoinHandle<()>>,
}

impl TallyEngine {
    /// Builds the engine in `Live` mode with its ticker already scheduled.
    /// Must be called from within a tokio runtime.
    pub fn start(
        sections: Vec<ResultsSection>,
        period: Duration,
        source: impl IncrementSource,
    ) -> Result<Self, TallyError> {
        let runtime = Handle::try_current().map_err(|_| TallyError::NoRuntime)?;
        let (updates, _) = watch::channel(0);
        let shared = Arc::new(TallyShared {
            state: Mutex::new(TallyState {
                sections,
                mode: LiveMode::Live,
                generation: 0,
                revision: 0,
                source: Box::new(source),
            }),
            updates,
        });

        let mut engine = Self { shared, runtime, period, ticker: None };
        engine.start_ticker(0);
        Ok(engine)
    }

    pub fn mode(&self) -> LiveMode {
        self.shared.lock().mode
    }

    /// Flips between live and stopped. Stopping is synchronous: once this
    /// returns no further tick can land until live mode is re-entered.
    pub fn toggle(&mut self) -> LiveMode {
        let (mode, generation, revision) = {
            let mut state = self.shared.lock();
            state.mode = state.mode.flipped();
            if state.mode == LiveMode::Stopped {
                state.generation += 1;
            }
            state.revision += 1;
            (state.mode, state.generation, state.revision)
        };

        match mode {
            LiveMode::Live => self.start_ticker(generation),
            LiveMode::Stopped => self.stop_ticker(),
        }
        info!("Tally switched to {}", mode.label());
        self.shared.updates.send_replace(revision);
        mode
    }

    pub fn render_view(&self, key: &str) -> Result<SectionView, TallyError> {
        let state = self.shared.lock();
        state
            .sections
            .iter()
            .find(|section| section.key == key)
            .map(render_section)
            .ok_or_else(|| TallyError::UnknownSection(key.to_string()))
    }

    pub fn render_all(&self) -> Vec<SectionView> {
        self.shared.lock().sections.iter().map(render_section).collect()
    }

    pub fn section_keys(&self) -> Vec<String> {
        self.shared.lock().sections.iter().map(|s| s.key.clone()).collect()
    }

    /// Receives the latest revision after every committed tick or toggle.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.shared.updates.subscribe()
    }

    pub fn revision(&self) -> u64 {
        self.shared.lock().revision
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.as_ref().is_some_and(|ticker| !ticker.is_finished())
    }

    fn start_ticker(&mut self, generation: u64) {
        if self.is_ticking() {
            return;
        }
        let shared = Arc::clone(&self.shared);
        let period = self.period;
        self.ticker = Some(
            self.runtime
                .spawn(async move { run_live_tally(shared, period, generation).await }),
        );
    }

    fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

impl Drop for TallyEngine {
    fn drop(&mut self) {
        {
            let mut state = self.shared.lock();
            state.generation += 1;
        }
        if self.ticker.is_some() {
            debug!("Tally engine dropped; stopping ticker");
        }
        self.stop_ticker();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Candidate;
    use std::collections::VecDeque;

    const PERIOD: Duration = Duration::from_millis(5000);

    fn candidate(id: u32, name: &str, votes: u64) -> Candidate {
        Candidate {
            id,
            name: name.to_string(),
            party: "Independent".to_string(),
            image_ref: None,
            votes,
        }
    }

    fn hod() -> ResultsSection {
        ResultsSection {
            key: "hod".to_string(),
            title: "HOD ASPIRANTS".to_string(),
            reported_total: Some(1000),
            candidates: vec![
                candidate(1, "A", 550),
                candidate(2, "B", 300),
                candidate(3, "C", 100),
                candidate(4, "D", 50),
            ],
        }
    }

    fn scripted(increments: Vec<u64>) -> impl IncrementSource {
        let mut queue = VecDeque::from(increments);
        move || queue.pop_front().unwrap_or(0)
    }

    fn votes(engine: &TallyEngine) -> Vec<u64> {
        let view = engine.render_view("hod").unwrap();
        let mut by_id: Vec<_> = view.candidates.iter().map(|c| (c.id, c.votes)).collect();
        by_id.sort();
        by_id.into_iter().map(|(_, votes)| votes).collect()
    }

    #[test]
    fn tick_adds_bounded_increments_and_derives_total() {
        let mut source = scripted(vec![0, 0, 0, 2]);
        let next = apply_tick(&[hod()], &mut source).unwrap();

        assert_eq!(next[0].reported_total, Some(1002));
        let view = render_section(&next[0]);
        let order: Vec<&str> = view.candidates.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(order, vec!["A", "B", "C", "D"]);
        assert_eq!(view.candidates[3].votes, 52);
        assert_eq!(view.candidates[3].percentage, 5);
    }

    #[test]
    fn oversized_increments_are_clamped() {
        let mut source = scripted(vec![9, 9, 9, 9]);
        let next = apply_tick(&[hod()], &mut source).unwrap();
        assert_eq!(next[0].candidate_sum(), 1008);
    }

    #[test]
    fn overflow_fails_without_touching_input() {
        let mut section = hod();
        section.candidates[2].votes = u64::MAX;
        let input = vec![section];
        let mut source = scripted(vec![1, 1, 1, 1]);

        let err = apply_tick(&input, &mut source).unwrap_err();
        assert!(matches!(err, TallyError::CountOverflow { candidate_id: 3, .. }));
        assert_eq!(input[0].candidates[0].votes, 550);
    }

    #[test]
    fn random_increments_stay_in_range() {
        let mut source = RandomIncrements::seeded(7);
        for _ in 0..1000 {
            assert!(source.next_increment() <= MAX_INCREMENT);
        }
    }

    #[test]
    fn start_outside_runtime_fails() {
        let result = TallyEngine::start(vec![hod()], PERIOD, scripted(vec![]));
        assert!(matches!(result, Err(TallyError::NoRuntime)));
    }

    #[tokio::test(start_paused = true)]
    async fn live_ticks_on_interval() {
        let engine = TallyEngine::start(vec![hod()], PERIOD, || 1u64).unwrap();
        assert_eq!(engine.mode(), LiveMode::Live);

        // Nothing fires before the first full period.
        tokio::time::sleep(PERIOD - Duration::from_millis(1)).await;
        assert_eq!(votes(&engine), vec![550, 300, 100, 50]);
        assert_eq!(engine.render_view("hod").unwrap().total_votes, 1000);

        tokio::time::sleep(PERIOD * 2).await;
        assert_eq!(votes(&engine), vec![552, 302, 102, 52]);
        assert_eq!(engine.render_view("hod").unwrap().total_votes, 1008);
        assert_eq!(engine.revision(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn votes_never_decrease() {
        let engine = TallyEngine::start(vec![hod()], PERIOD, RandomIncrements::seeded(42)).unwrap();
        let mut last = votes(&engine);
        // Observe halfway between ticks.
        tokio::time::sleep(PERIOD / 2).await;
        for _ in 0..20 {
            tokio::time::sleep(PERIOD).await;
            let now = votes(&engine);
            for (before, after) in last.iter().zip(&now) {
                assert!(after >= before);
                assert!(after - before <= MAX_INCREMENT);
            }
            last = now;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn stopping_cancels_pending_ticks() {
        let mut engine = TallyEngine::start(vec![hod()], PERIOD, || 2u64).unwrap();
        tokio::time::sleep(PERIOD + Duration::from_millis(1)).await;
        assert_eq!(votes(&engine), vec![552, 302, 102, 52]);

        assert_eq!(engine.toggle(), LiveMode::Stopped);
        assert!(!engine.is_ticking());
        tokio::time::sleep(PERIOD * 10).await;
        assert_eq!(votes(&engine), vec![552, 302, 102, 52]);

        // Views stay readable while stopped.
        assert!(engine.render_view("hod").unwrap().candidates[0].leading);
    }

    #[tokio::test(start_paused = true)]
    async fn double_toggle_restores_mode_and_single_ticker() {
        let mut engine = TallyEngine::start(vec![hod()], PERIOD, || 1u64).unwrap();
        engine.toggle();
        assert_eq!(engine.toggle(), LiveMode::Live);
        assert!(engine.is_ticking());

        // A restarted ticker waits a full period, and only one ticker runs.
        tokio::time::sleep(PERIOD + Duration::from_millis(1)).await;
        assert_eq!(votes(&engine), vec![551, 301, 101, 51]);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_ticker_cannot_mutate_after_stop() {
        let mut engine = TallyEngine::start(vec![hod()], PERIOD, || 1u64).unwrap();
        let shared = Arc::clone(&engine.shared);
        engine.toggle();

        assert!(matches!(shared.tick(0), TickOutcome::Cancelled));
        assert_eq!(votes(&engine), vec![550, 300, 100, 50]);
    }

    #[tokio::test(start_paused = true)]
    async fn overflowing_tick_is_skipped_and_live_continues() {
        let section = ResultsSection {
            key: "hod".to_string(),
            title: "HOD ASPIRANTS".to_string(),
            reported_total: None,
            candidates: vec![candidate(1, "X", 0), candidate(2, "Y", u64::MAX - 1)],
        };
        let mut calls = 0u64;
        // The first tick overflows Y; later ticks add nothing.
        let source = move || {
            calls += 1;
            if calls <= 2 { 2u64 } else { 0u64 }
        };
        let engine = TallyEngine::start(vec![section], PERIOD, source).unwrap();

        tokio::time::sleep(PERIOD + Duration::from_millis(1)).await;
        assert_eq!(engine.revision(), 0);
        assert_eq!(votes(&engine), vec![0, u64::MAX - 1]);

        tokio::time::sleep(PERIOD).await;
        assert_eq!(engine.mode(), LiveMode::Live);
        assert!(engine.is_ticking());
        assert_eq!(engine.revision(), 1);
        assert_eq!(engine.render_view("hod").unwrap().total_votes, u64::MAX - 1);
    }

    #[tokio::test(start_paused = true)]
    async fn panicking_source_skips_the_tick_and_live_continues() {
        let mut calls = 0u64;
        let source = move || {
            calls += 1;
            if calls == 1 {
                panic!("increment source failed");
            }
            1u64
        };
        let engine = TallyEngine::start(vec![hod()], PERIOD, source).unwrap();

        tokio::time::sleep(PERIOD + Duration::from_millis(1)).await;
        assert_eq!(engine.revision(), 0);
        assert_eq!(votes(&engine), vec![550, 300, 100, 50]);
        assert!(engine.is_ticking());

        tokio::time::sleep(PERIOD).await;
        assert_eq!(engine.mode(), LiveMode::Live);
        assert_eq!(engine.revision(), 1);
        assert_eq!(votes(&engine), vec![551, 301, 101, 51]);
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_see_ticks_and_toggles() {
        let mut engine = TallyEngine::start(vec![hod()], PERIOD, || 0u64).unwrap();
        let mut updates = engine.subscribe();

        tokio::time::sleep(PERIOD + Duration::from_millis(1)).await;
        assert!(updates.has_changed().unwrap());
        assert_eq!(*updates.borrow_and_update(), 1);

        engine.toggle();
        assert_eq!(*updates.borrow_and_update(), 2);
    }

    #[tokio::test]
    async fn unknown_section_is_reported() {
        let engine = TallyEngine::start(vec![hod()], PERIOD, || 0u64).unwrap();
        assert_eq!(
            engine.render_view("bursar").unwrap_err(),
            TallyError::UnknownSection("bursar".into())
        );
        assert_eq!(engine.section_keys(), vec!["hod"]);
        assert_eq!(engine.render_all().len(), 1);
    }
}
