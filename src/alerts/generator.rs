//! Synthetic alert generation and sampling.

use rand::Rng;
use rand::seq::SliceRandom;

use super::{AlertRecord, DisasterType, Severity};

/// Default number of alerts generated per session.
pub const DEFAULT_POOL_SIZE: usize = 300;

/// Default number of alerts drawn for each dashboard refresh.
pub const DEFAULT_SAMPLE_SIZE: usize = 5;

const LOCATIONS: [&str; 3] = ["Area A", "Area B", "Area C"];

const DETAILS: [&str; 3] = [
    "Urgent evacuation needed",
    "Minor damage reported",
    "Alert for potential risk",
];

/// Generate `count` alerts with independently, uniformly drawn severity,
/// type, location, and detail phrase.
///
/// Duplicated content is allowed. Messages are numbered from 1 in
/// generation order.
pub fn generate_messages<R: Rng>(count: usize, rng: &mut R) -> Vec<AlertRecord> {
    (1..=count)
        .map(|i| {
            let severity = Severity::ALL[rng.gen_range(0..Severity::ALL.len())];
            let kind = DisasterType::ALL[rng.gen_range(0..DisasterType::ALL.len())];
            let location = LOCATIONS[rng.gen_range(0..LOCATIONS.len())];
            let details = DETAILS[rng.gen_range(0..DETAILS.len())];

            AlertRecord {
                message: format!(
                    "Message {i}: {kind} - {severity} severity. Location: {location}. Details: {details}."
                ),
                severity,
                kind,
            }
        })
        .collect()
}

/// Draw up to `size` alerts from `pool` without replacement.
///
/// Returns the whole pool (shuffled) when it holds fewer than `size` records.
pub fn sample_messages<R: Rng>(
    pool: &[AlertRecord],
    size: usize,
    rng: &mut R,
) -> Vec<AlertRecord> {
    pool.choose_multiple(rng, size).cloned().collect()
}
