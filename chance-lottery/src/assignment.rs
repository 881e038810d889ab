use crate::{LotteryError, Result};
use chance_core::{Assignment, LotteryMode, LotteryRecord};
use rand::Rng;
use std::collections::HashMap;

/// Produce a fresh, unrevealed assignment list for a multi-option or
/// matching lottery. Participants keep their stored order.
pub fn generate<R: Rng + ?Sized>(record: &LotteryRecord, rng: &mut R) -> Result<Vec<Assignment>> {
    match record.effective_mode() {
        LotteryMode::Matching => generate_matching(&record.participants, rng),
        LotteryMode::SingleTask | LotteryMode::MultiOption => {
            generate_task_assignment(&record.participants, &record.tasks, rng)
        }
    }
}

/// Every task is handed out exactly once
pub fn generate_task_assignment<R: Rng + ?Sized>(
    participants: &[String],
    tasks: &[String],
    rng: &mut R,
) -> Result<Vec<Assignment>> {
    if participants.len() != tasks.len() {
        return Err(LotteryError::TaskCountMismatch {
            participants: participants.len(),
            tasks: tasks.len(),
        });
    }

    let mut shuffled = tasks.to_vec();
    shuffle(&mut shuffled, rng);

    Ok(participants
        .iter()
        .zip(shuffled)
        .map(|(participant, task)| Assignment::new(participant.clone(), task))
        .collect())
}

/// Pair every participant with someone other than themselves.
///
/// Rejection sampling over uniform shuffles, so every derangement is equally
/// likely. Callers are expected to have validated feasibility; an infeasible
/// list is reported instead of looping forever.
pub fn generate_matching<R: Rng + ?Sized>(
    participants: &[String],
    rng: &mut R,
) -> Result<Vec<Assignment>> {
    if !derangement_feasible(participants) {
        return Err(LotteryError::DerangementInfeasible);
    }

    let mut paired = participants.to_vec();
    let mut attempts = 0u32;
    loop {
        attempts += 1;
        shuffle(&mut paired, rng);
        if is_derangement(participants, &paired) {
            break;
        }
    }

    tracing::debug!(
        "Matched {} participants after {} shuffle(s)",
        participants.len(),
        attempts
    );

    Ok(participants
        .iter()
        .zip(paired)
        .map(|(participant, partner)| Assignment::new(participant.clone(), partner))
        .collect())
}

/// Fisher-Yates: for i from the last index down to 1, swap with a uniform
/// j in 0..=i.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

/// No position holds the same name in both lists
pub fn is_derangement(original: &[String], paired: &[String]) -> bool {
    original.len() == paired.len() && original.iter().zip(paired).all(|(a, b)| a != b)
}

/// A derangement by name exists when there are at least two participants
/// and no name fills more than half of the list.
pub fn derangement_feasible(participants: &[String]) -> bool {
    if participants.len() < 2 {
        return false;
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for name in participants {
        *counts.entry(name.as_str()).or_default() += 1;
    }

    let most_common = counts.values().copied().max().unwrap_or(0);
    most_common * 2 <= participants.len()
}
