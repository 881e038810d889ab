use crate::assignment::generate;
use crate::reveal::{drive, RevealSequencer};
use crate::schedule::TaskHandle;
use crate::wheel::{winner_from_rotation, SpinPlan};
use crate::{load_lottery, LotteryError, Result};
use chance_core::{
    Assignment, LotteryConfig, LotteryMode, LotteryRecord, LotteryStore, ResultView,
};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Presentation hooks. Every callback runs after the matching storage write.
pub trait LotteryObserver: Send + Sync {
    fn on_spin_frame(&self, _rotation: f64) {}

    fn on_winner(&self, _record: &LotteryRecord) {}

    fn on_reveal_step(&self, _index: usize, _assignments: &[Assignment]) {}

    fn on_reveal_complete(&self, _assignments: &[Assignment]) {}

    /// Sound cue for a reveal step. Failures are logged and ignored.
    fn on_reveal_sound(&self) -> std::result::Result<(), String> {
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct NoopObserver;

impl LotteryObserver for NoopObserver {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Idle,
    Spinning,
    Revealing { revealed: usize },
    Done,
}

/// What [`LotteryView::start`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewStart {
    /// A stored result was shown again without rolling
    Replayed,
    /// A fresh reveal sequence is scheduled
    Scheduled,
    /// The wheel is ready and waits for a spin
    AwaitingSpin,
}

/// Result screen for one lottery.
///
/// Owns at most one running timer chain. Starting new work, [`close`] and
/// dropping the view all cancel it.
///
/// [`close`]: LotteryView::close
pub struct LotteryView {
    config: LotteryConfig,
    shared: ViewShared,
    active: Option<TaskHandle<Result<LotteryRecord>>>,
}

/// State the spawned timer chains write to
#[derive(Clone)]
struct ViewShared {
    store: LotteryStore,
    observer: Arc<dyn LotteryObserver>,
    record: Arc<Mutex<LotteryRecord>>,
    state: Arc<Mutex<ViewState>>,
}

impl LotteryView {
    pub async fn open(
        store: LotteryStore,
        config: LotteryConfig,
        observer: Arc<dyn LotteryObserver>,
        id: &str,
    ) -> Result<Self> {
        let record = load_lottery(&store, id).await?;
        Self::with_record(store, config, observer, record)
    }

    /// View over a record the caller already loaded
    pub fn with_record(
        store: LotteryStore,
        config: LotteryConfig,
        observer: Arc<dyn LotteryObserver>,
        record: LotteryRecord,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            shared: ViewShared {
                store,
                observer,
                record: Arc::new(Mutex::new(record)),
                state: Arc::new(Mutex::new(ViewState::Idle)),
            },
            active: None,
        })
    }

    pub fn id(&self) -> String {
        self.shared.record.lock().id.clone()
    }

    pub fn record(&self) -> LotteryRecord {
        self.shared.record.lock().clone()
    }

    pub fn state(&self) -> ViewState {
        *self.shared.state.lock()
    }

    pub fn mode(&self) -> LotteryMode {
        self.shared.record.lock().effective_mode()
    }

    pub fn start(&mut self) -> Result<ViewStart> {
        self.cancel();
        let mut record = self.record();

        if record.has_result() {
            *self.shared.state.lock() = ViewState::Done;

            match record.effective_mode().view() {
                ResultView::Wheel => self.shared.observer.on_winner(&record),
                ResultView::Reveal => {
                    // Stored results are always shown fully revealed
                    let assignments = record.final_assignments.get_or_insert_with(Vec::new);
                    for assignment in assignments.iter_mut() {
                        assignment.is_revealed = true;
                    }
                    self.shared.observer.on_reveal_complete(assignments);
                    *self.shared.record.lock() = record.clone();
                }
            }

            tracing::info!("Replaying stored result of lottery {}", record.id);
            return Ok(ViewStart::Replayed);
        }

        match record.effective_mode().view() {
            ResultView::Wheel => Ok(ViewStart::AwaitingSpin),
            ResultView::Reveal => {
                self.schedule_reveal(self.config.reveal.initial_delay)?;
                Ok(ViewStart::Scheduled)
            }
        }
    }

    /// Spin the wheel. Returns `false` when a spin is already running.
    pub async fn spin(&mut self) -> Result<bool> {
        let mode = self.mode();
        if mode != LotteryMode::SingleTask {
            return Err(LotteryError::WrongMode {
                expected: LotteryMode::SingleTask,
                actual: mode,
            });
        }

        if self.state() == ViewState::Spinning {
            tracing::debug!("Spin ignored, wheel is already turning");
            return Ok(false);
        }

        if self.shared.record.lock().has_result() {
            self.run_again().await?;
        } else {
            self.launch_spin(Duration::ZERO);
        }

        Ok(true)
    }

    /// Throw away the stored result and roll again
    pub async fn run_again(&mut self) -> Result<()> {
        self.cancel();

        let mut record = self.record();
        record.clear_result();
        self.shared.store.save_lottery(&record).await?;
        *self.shared.record.lock() = record.clone();

        tracing::info!("Re-rolling lottery {}", record.id);

        match record.effective_mode().view() {
            ResultView::Wheel => self.launch_spin(self.config.spin.respin_delay),
            ResultView::Reveal => self.schedule_reveal(self.config.reveal.rerun_delay)?,
        }

        Ok(())
    }

    /// Wait for the running spin or reveal and return the stored record
    pub async fn wait(&mut self) -> Result<LotteryRecord> {
        match self.active.take() {
            Some(handle) => handle.join().await?,
            None => Ok(self.record()),
        }
    }

    pub fn cancel(&mut self) {
        if let Some(mut handle) = self.active.take() {
            handle.cancel();
            tracing::debug!("Cancelled pending work for lottery {}", self.id());
        }

        let mut state = self.shared.state.lock();
        if *state != ViewState::Done {
            *state = ViewState::Idle;
        }
    }

    pub fn close(mut self) {
        self.cancel();
    }

    fn launch_spin(&mut self, delay: Duration) {
        let plan = SpinPlan::new(&mut rand::thread_rng(), &self.config.spin);
        *self.shared.state.lock() = ViewState::Spinning;

        let task = self
            .shared
            .clone()
            .run_spin(plan, delay, self.config.spin.frame_interval);
        self.active = Some(TaskHandle::spawn(task));
    }

    fn schedule_reveal(&mut self, initial_delay: Duration) -> Result<()> {
        let assignments = generate(&self.record(), &mut rand::thread_rng())?;
        *self.shared.state.lock() = ViewState::Revealing { revealed: 0 };

        let task = self.shared.clone().run_reveal(
            RevealSequencer::new(assignments),
            initial_delay,
            self.config.reveal.step_delay,
        );
        self.active = Some(TaskHandle::spawn(task));

        Ok(())
    }
}

impl ViewShared {
    async fn run_spin(
        self,
        plan: SpinPlan,
        delay: Duration,
        frame_interval: Duration,
    ) -> Result<LotteryRecord> {
        tokio::time::sleep(delay).await;

        let started = Instant::now();
        let mut ticker = tokio::time::interval(frame_interval);
        loop {
            ticker.tick().await;
            let elapsed = started.elapsed();
            if plan.is_complete(elapsed) {
                break;
            }
            self.observer.on_spin_frame(plan.rotation_at(elapsed));
        }
        self.observer.on_spin_frame(plan.total_rotation);

        let mut updated = self.record.lock().clone();
        let winner = winner_from_rotation(plan.total_rotation, &updated.participants)
            .ok_or_else(|| LotteryError::InvalidState("Lottery has no participants".to_string()))?
            .to_string();
        updated.winner = Some(winner);
        updated.rotation_degree = Some(plan.total_rotation);

        self.store.save_lottery(&updated).await?;
        *self.record.lock() = updated.clone();
        *self.state.lock() = ViewState::Done;

        tracing::info!(
            "Lottery {} spun {:.2} degrees, winner: {}",
            updated.id,
            plan.total_rotation,
            updated.winner.as_deref().unwrap_or_default()
        );
        self.observer.on_winner(&updated);

        Ok(updated)
    }

    async fn run_reveal(
        self,
        sequencer: RevealSequencer,
        initial_delay: Duration,
        step_delay: Duration,
    ) -> Result<LotteryRecord> {
        let step_observer = self.observer.clone();
        let step_state = self.state.clone();
        let completed = self.clone();

        drive(
            sequencer,
            initial_delay,
            step_delay,
            move |index, assignments| {
                *step_state.lock() = ViewState::Revealing {
                    revealed: index + 1,
                };
                if let Err(e) = step_observer.on_reveal_sound() {
                    tracing::debug!("Reveal sound failed: {}", e);
                }
                step_observer.on_reveal_step(index, assignments);
            },
            move |revealed| completed.finish_reveal(revealed),
        )
        .await?;

        let finished = self.record.lock().clone();
        tracing::info!("Lottery {} fully revealed", finished.id);
        Ok(finished)
    }

    async fn finish_reveal(self, revealed: Vec<Assignment>) -> Result<()> {
        let mut updated = self.record.lock().clone();
        updated.final_assignments = Some(revealed.clone());

        self.store.save_lottery(&updated).await?;
        *self.record.lock() = updated;
        *self.state.lock() = ViewState::Done;

        self.observer.on_reveal_complete(&revealed);
        Ok(())
    }
}

impl Drop for LotteryView {
    fn drop(&mut self) {
        if let Some(mut handle) = self.active.take() {
            handle.cancel();
        }
    }
}
