/// Cosmetic variation applied to the live stats stream between ticks
use rand::Rng;

use crate::models::{QueueLoad, SystemStats};

/// Floor for the headline average wait, in minutes
pub const MIN_AVERAGE_WAIT: u32 = 5;

fn nudge<R: Rng>(rng: &mut R, value: u32, spread: i64, floor: u32) -> u32 {
    let delta = rng.gen_range(0..=2 * spread) - spread;
    (value as i64 + delta).max(floor as i64) as u32
}

/// Randomly nudge the headline and per-queue figures by a unit or two
///
/// Queue load labels are recomputed from the nudged waiting counts.
pub fn apply_stats_jitter<R: Rng>(stats: &mut SystemStats, rng: &mut R) {
    stats.active_patients = nudge(rng, stats.active_patients, 1, 0);
    stats.average_wait_time = nudge(rng, stats.average_wait_time, 2, MIN_AVERAGE_WAIT);

    for queue in stats.queues.iter_mut() {
        queue.patients_waiting = nudge(rng, queue.patients_waiting, 1, 0);
        queue.average_wait_time = nudge(rng, queue.average_wait_time, 2, 0);
        queue.status = QueueLoad::from_waiting(queue.patients_waiting);
    }
}
