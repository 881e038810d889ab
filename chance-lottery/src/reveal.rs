use crate::{LotteryError, Result};
use chance_core::Assignment;
use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    Idle,
    /// `index` is the most recently revealed entry
    Revealing { index: usize },
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealStep {
    Next(usize),
    Complete,
}

/// Reveals an assignment list strictly in order, one entry at a time
#[derive(Debug, Clone)]
pub struct RevealSequencer {
    assignments: Vec<Assignment>,
    state: RevealState,
}

impl RevealSequencer {
    pub fn new(assignments: Vec<Assignment>) -> Self {
        Self {
            assignments,
            state: RevealState::Idle,
        }
    }

    pub fn state(&self) -> RevealState {
        self.state
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn into_assignments(self) -> Vec<Assignment> {
        self.assignments
    }

    /// Index the next call to [`reveal`](Self::reveal) must use
    pub fn next_index(&self) -> Option<usize> {
        let next = match self.state {
            RevealState::Idle => 0,
            RevealState::Revealing { index } => index + 1,
            RevealState::Done => return None,
        };
        (next < self.assignments.len()).then_some(next)
    }

    pub fn reveal(&mut self, index: usize) -> Result<RevealStep> {
        let expected = self.next_index().ok_or_else(|| {
            LotteryError::InvalidState("Nothing left to reveal".to_string())
        })?;

        if index != expected {
            return Err(LotteryError::InvalidState(format!(
                "Reveal out of order: expected #{}, got #{}",
                expected + 1,
                index + 1
            )));
        }

        self.assignments[index].is_revealed = true;

        if index + 1 == self.assignments.len() {
            self.state = RevealState::Done;
            Ok(RevealStep::Complete)
        } else {
            self.state = RevealState::Revealing { index };
            Ok(RevealStep::Next(index + 1))
        }
    }
}

/// Play a reveal sequence on the tokio clock.
///
/// Waits `initial_delay`, then reveals one entry per `step_delay`, calling
/// `on_step` after each reveal and `on_complete` once after the last one.
pub async fn drive<S, C, Fut>(
    mut sequencer: RevealSequencer,
    initial_delay: Duration,
    step_delay: Duration,
    mut on_step: S,
    on_complete: C,
) -> Result<Vec<Assignment>>
where
    S: FnMut(usize, &[Assignment]),
    C: FnOnce(Vec<Assignment>) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let mut index = sequencer
        .next_index()
        .ok_or_else(|| LotteryError::InvalidState("Nothing to reveal".to_string()))?;

    tokio::time::sleep(initial_delay).await;

    loop {
        let step = sequencer.reveal(index)?;
        tracing::debug!("Revealed assignment #{}", index + 1);
        on_step(index, sequencer.assignments());

        match step {
            RevealStep::Complete => break,
            RevealStep::Next(next) => {
                tokio::time::sleep(step_delay).await;
                index = next;
            }
        }
    }

    let revealed = sequencer.into_assignments();
    on_complete(revealed.clone()).await?;
    Ok(revealed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tokio::time::Instant;

    fn three() -> Vec<Assignment> {
        vec![
            Assignment::new("Alice", "Bob"),
            Assignment::new("Bob", "Carol"),
            Assignment::new("Carol", "Alice"),
        ]
    }

    #[test]
    fn test_reveals_in_order() {
        let mut sequencer = RevealSequencer::new(three());
        assert_eq!(sequencer.state(), RevealState::Idle);

        assert_eq!(sequencer.reveal(0).unwrap(), RevealStep::Next(1));
        assert!(sequencer.assignments()[0].is_revealed);
        assert!(!sequencer.assignments()[1].is_revealed);
        assert_eq!(sequencer.state(), RevealState::Revealing { index: 0 });

        assert_eq!(sequencer.reveal(1).unwrap(), RevealStep::Next(2));
        assert_eq!(sequencer.reveal(2).unwrap(), RevealStep::Complete);
        assert_eq!(sequencer.state(), RevealState::Done);
        assert!(sequencer.assignments().iter().all(|a| a.is_revealed));
        assert_eq!(sequencer.next_index(), None);
    }

    #[test]
    fn test_rejects_skips_and_repeats() {
        let mut sequencer = RevealSequencer::new(three());
        assert!(sequencer.reveal(1).is_err());

        sequencer.reveal(0).unwrap();
        assert!(sequencer.reveal(0).is_err());
        assert!(sequencer.reveal(2).is_err());

        sequencer.reveal(1).unwrap();
        sequencer.reveal(2).unwrap();
        assert!(sequencer.reveal(2).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drive_timing_and_single_completion() {
        let events: RefCell<Vec<(String, u128)>> = RefCell::new(Vec::new());
        let started = Instant::now();

        let revealed = drive(
            RevealSequencer::new(three()),
            Duration::from_millis(3000),
            Duration::from_millis(2000),
            |index, assignments| {
                assert!(assignments[..=index].iter().all(|a| a.is_revealed));
                assert!(assignments[index + 1..].iter().all(|a| !a.is_revealed));
                events
                    .borrow_mut()
                    .push((format!("step{}", index), started.elapsed().as_millis()));
            },
            |assignments| {
                assert_eq!(assignments.len(), 3);
                events
                    .borrow_mut()
                    .push(("complete".to_string(), started.elapsed().as_millis()));
                async { Ok(()) }
            },
        )
        .await
        .unwrap();

        assert!(revealed.iter().all(|a| a.is_revealed));
        assert_eq!(
            events.into_inner(),
            vec![
                ("step0".to_string(), 3000),
                ("step1".to_string(), 5000),
                ("step2".to_string(), 7000),
                ("complete".to_string(), 7000),
            ]
        );
    }

    #[tokio::test]
    async fn test_drive_empty_list_is_refused() {
        let result = drive(
            RevealSequencer::new(Vec::new()),
            Duration::ZERO,
            Duration::ZERO,
            |_, _| {},
            |_| async { Ok(()) },
        )
        .await;
        assert!(matches!(result, Err(LotteryError::InvalidState(_))));
    }
}
