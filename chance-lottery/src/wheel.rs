//! Spinning wheel for single-task lotteries.
//!
//! The pointer is fixed at the top and the wheel turns clockwise under it,
//! so growing rotation walks the segments backwards: the winner index is
//! mirrored against the raw segment index.

use chance_core::SpinConfig;
use rand::Rng;
use std::time::Duration;

pub const FULL_TURN: f64 = 360.0;

/// Committed end rotation of a spin: `uniform(min, max)` turns plus
/// `uniform(0, 360)` degrees.
pub fn pick_target_rotation<R: Rng + ?Sized>(rng: &mut R, config: &SpinConfig) -> f64 {
    let spins = if config.max_spins > config.min_spins {
        rng.gen_range(config.min_spins..config.max_spins)
    } else {
        config.min_spins
    };
    let extra_degrees = rng.gen_range(0.0..FULL_TURN);

    spins * FULL_TURN + extra_degrees
}

/// Index of the participant under the pointer after rotating `degrees`.
/// With one (or no) participant the answer is always 0.
pub fn winner_index(degrees: f64, participant_count: usize) -> usize {
    if participant_count <= 1 {
        return 0;
    }

    let normalized = degrees.rem_euclid(FULL_TURN);
    let segment_size = FULL_TURN / participant_count as f64;
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    let raw_index = ((normalized / segment_size).floor() as usize).min(participant_count - 1);

    (participant_count - raw_index - 1) % participant_count
}

pub fn winner_from_rotation(degrees: f64, participants: &[String]) -> Option<&str> {
    if participants.is_empty() {
        return None;
    }
    participants
        .get(winner_index(degrees, participants.len()))
        .map(String::as_str)
}

/// Cubic ease-out over a progress value clamped to [0, 1]
pub fn ease_out_cubic(progress: f64) -> f64 {
    let progress = progress.clamp(0.0, 1.0);
    1.0 - (1.0 - progress).powi(3)
}

/// Instantaneous rotation `elapsed` into a spin towards `total_rotation`
pub fn rotation_at(total_rotation: f64, elapsed: Duration, duration: Duration) -> f64 {
    if duration.is_zero() || elapsed >= duration {
        return total_rotation;
    }

    let progress = elapsed.as_secs_f64() / duration.as_secs_f64();
    total_rotation * ease_out_cubic(progress)
}

/// One committed spin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinPlan {
    pub total_rotation: f64,
    pub duration: Duration,
}

impl SpinPlan {
    pub fn new<R: Rng + ?Sized>(rng: &mut R, config: &SpinConfig) -> Self {
        Self {
            total_rotation: pick_target_rotation(rng, config),
            duration: config.duration,
        }
    }

    pub fn rotation_at(&self, elapsed: Duration) -> f64 {
        rotation_at(self.total_rotation, elapsed, self.duration)
    }

    pub fn is_complete(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }

    pub fn winner_index(&self, participant_count: usize) -> usize {
        winner_index(self.total_rotation, participant_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_four_segment_winners() {
        let people: Vec<String> = ["A", "B", "C", "D"].iter().map(|s| s.to_string()).collect();

        assert_eq!(winner_from_rotation(0.0, &people), Some("D"));
        assert_eq!(winner_from_rotation(89.0, &people), Some("D"));
        assert_eq!(winner_from_rotation(90.0, &people), Some("C"));
        assert_eq!(winner_from_rotation(180.0, &people), Some("B"));
        assert_eq!(winner_from_rotation(359.9, &people), Some("A"));
    }

    #[test]
    fn test_winner_is_periodic() {
        for n in 1..8 {
            for step in 0..72 {
                let degrees = step as f64 * 5.0 + 0.5;
                let base = winner_index(degrees, n);
                assert_eq!(winner_index(degrees + FULL_TURN, n), base);
                assert_eq!(winner_index(degrees + 7.0 * FULL_TURN, n), base);
                assert!(base < n);
            }
        }
    }

    #[test]
    fn test_single_participant_always_wins() {
        let people = vec!["Solo".to_string()];
        assert_eq!(winner_from_rotation(1234.5, &people), Some("Solo"));
        assert_eq!(winner_index(0.0, 1), 0);
        assert_eq!(winner_from_rotation(10.0, &[]), None);
    }

    #[test]
    fn test_negative_rotation_stays_in_range() {
        assert_eq!(winner_index(-1e-20, 4), 0);
        assert_eq!(winner_index(-90.0, 4), 0);
    }

    #[test]
    fn test_target_rotation_range() {
        let config = SpinConfig::default();
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..500 {
            let rotation = pick_target_rotation(&mut rng, &config);
            assert!(rotation >= 5.0 * FULL_TURN);
            assert!(rotation < 9.0 * FULL_TURN);
        }
    }

    #[test]
    fn test_easing_endpoints() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert_eq!(ease_out_cubic(3.0), 1.0);
        assert!((ease_out_cubic(0.5) - 0.875).abs() < 1e-12);
    }

    #[test]
    fn test_animation_ends_on_exact_target() {
        let plan = SpinPlan {
            total_rotation: 2021.123456789,
            duration: Duration::from_millis(5000),
        };

        assert_eq!(plan.rotation_at(Duration::ZERO), 0.0);
        assert!(plan.rotation_at(Duration::from_millis(2500)) < plan.total_rotation);
        assert_eq!(plan.rotation_at(Duration::from_millis(5000)), plan.total_rotation);
        assert_eq!(plan.rotation_at(Duration::from_millis(9000)), plan.total_rotation);
        assert!(plan.is_complete(Duration::from_secs(5)));

        let mut last = 0.0;
        for ms in (0..=5000).step_by(16) {
            let rotation = plan.rotation_at(Duration::from_millis(ms));
            assert!(rotation >= last);
            last = rotation;
        }
    }
}
