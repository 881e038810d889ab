//! Chance core - records, configuration and storage for task lotteries
//!
//! Lotteries live in a flat key-value store under `lottery_<id>`, the same
//! layout a browser's local storage would hold.

pub mod config;
pub mod error;
pub mod storage;
pub mod types;

pub use config::{LotteryConfig, RevealConfig, SpinConfig};
pub use error::{ChanceError, Result};
pub use storage::{KeyValueStore, LotteryStore, MemoryStorage, SqliteStorage};
pub use types::{Assignment, LotteryMode, LotteryRecord, ResultView};
