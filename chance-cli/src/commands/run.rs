use chance_core::{Assignment, LotteryConfig, LotteryRecord, LotteryStore};
use chance_lottery::{LotteryObserver, LotteryView, ViewStart};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const FRAMES_PER_REDRAW: usize = 10;

/// Draws lottery progress on stdout
#[derive(Default)]
struct TerminalObserver {
    frames: AtomicUsize,
}

impl LotteryObserver for TerminalObserver {
    fn on_spin_frame(&self, rotation: f64) {
        let frame = self.frames.fetch_add(1, Ordering::Relaxed);
        if frame % FRAMES_PER_REDRAW == 0 {
            print!("\rSpinning... {:>8.1}°", rotation);
            let _ = std::io::stdout().flush();
        }
    }

    fn on_winner(&self, record: &LotteryRecord) {
        println!();
        println!(
            "{} does: {}",
            record.winner.as_deref().unwrap_or("nobody"),
            record.primary_task().unwrap_or_default()
        );
        if let Some(rotation) = record.rotation_degree {
            println!("Wheel stopped at {:.1}°", rotation % 360.0);
        }
    }

    fn on_reveal_step(&self, index: usize, assignments: &[Assignment]) {
        let assignment = &assignments[index];
        println!(
            "[{}/{}] {} -> {}",
            index + 1,
            assignments.len(),
            assignment.participant,
            assignment.task
        );
    }

    fn on_reveal_complete(&self, assignments: &[Assignment]) {
        println!();
        println!("All assignments:");
        for assignment in assignments {
            println!("  {} -> {}", assignment.participant, assignment.task);
        }
    }

    fn on_reveal_sound(&self) -> Result<(), String> {
        let mut stdout = std::io::stdout();
        stdout
            .write_all(b"\x07")
            .and_then(|_| stdout.flush())
            .map_err(|e| e.to_string())
    }
}

pub async fn run_lottery(
    store: &LotteryStore,
    config: &LotteryConfig,
    id: &str,
    again: bool,
) -> anyhow::Result<()> {
    let record = chance_lottery::load_lottery(store, id).await?;
    let observer = Arc::new(TerminalObserver::default());
    let mut view = LotteryView::with_record(store.clone(), config.clone(), observer, record)?;

    println!("Lottery {} ({})", view.id(), view.mode());

    if again {
        view.run_again().await?;
    } else {
        match view.start()? {
            ViewStart::Replayed => {
                println!("(stored result, use --again to roll again)");
                return Ok(());
            }
            ViewStart::Scheduled => println!("Revealing assignments..."),
            ViewStart::AwaitingSpin => {
                view.spin().await?;
            }
        }
    }

    let outcome = tokio::select! {
        result = view.wait() => Some(result),
        _ = tokio::signal::ctrl_c() => None,
    };

    match outcome {
        Some(result) => {
            result?;
        }
        None => {
            view.close();
            println!();
            println!("Interrupted, the result was not saved.");
        }
    }

    Ok(())
}
