pub mod create;
pub mod delete;
pub mod run;
pub mod show;

pub use create::create_lottery;
pub use delete::delete_lottery;
pub use run::run_lottery;
pub use show::{list_lotteries, show_lottery};
