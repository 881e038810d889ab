//! Task lottery engine
//!
//! Hands out tasks to participants at random, or pairs participants with
//! each other so nobody draws themselves. Single-task lotteries pick their
//! performer with a spinning wheel; the others reveal the assignments one by
//! one on a timer.

pub mod assignment;
pub mod draft;
pub mod error;
pub mod reveal;
pub mod schedule;
pub mod view;
pub mod wheel;

pub use assignment::{generate, is_derangement};
pub use draft::LotteryDraft;
pub use error::{LotteryError, Result};
pub use reveal::{RevealSequencer, RevealState, RevealStep};
pub use schedule::TaskHandle;
pub use view::{LotteryObserver, LotteryView, NoopObserver, ViewStart, ViewState};
pub use wheel::{pick_target_rotation, winner_from_rotation, winner_index, SpinPlan};

use chance_core::{ChanceError, LotteryRecord, LotteryStore};

/// Validate a draft and persist it as a new lottery
pub async fn create_lottery(store: &LotteryStore, draft: &LotteryDraft) -> Result<LotteryRecord> {
    let record = draft.build()?;
    store.save_lottery(&record).await?;

    tracing::info!(
        "Created {} lottery {} with {} participants",
        record.effective_mode(),
        record.id,
        record.participants.len()
    );
    Ok(record)
}

/// Load a lottery. Anything that is not a usable record is reported as not
/// found.
pub async fn load_lottery(store: &LotteryStore, id: &str) -> Result<LotteryRecord> {
    match store.load_lottery(id).await {
        Ok(Some(record)) => match LotteryDraft::from_record(&record).validate() {
            Ok(()) => Ok(record),
            Err(e) => {
                tracing::warn!("Lottery {} is unusable: {}", id, e);
                Err(LotteryError::NotFound(id.to_string()))
            }
        },
        Ok(None) => Err(LotteryError::NotFound(id.to_string())),
        Err(ChanceError::Serialization(e)) => {
            tracing::warn!("Lottery {} is malformed: {}", id, e);
            Err(LotteryError::NotFound(id.to_string()))
        }
        Err(e) => Err(e.into()),
    }
}
