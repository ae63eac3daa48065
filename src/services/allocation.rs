//! Proportional allocation of production events across fixed hour buckets.
//!
//! An event that spans several buckets contributes
//! `metric * overlap / duration` to each, where `overlap` is the length of
//! the intersection of the event with the bucket.

use crate::production::ProductionEvent;

pub const HOURS_PER_DAY: u32 = 24;
const SECONDS_PER_HOUR: u32 = 3600;

/// Seconds shared by `[start, end)` and `[bucket_start, bucket_end)`.
pub fn overlap_secs(start: u32, end: u32, bucket_start: u32, bucket_end: u32) -> u32 {
    end.min(bucket_end).saturating_sub(start.max(bucket_start))
}

/// Share of an event that falls into a bucket, in `[0, 1]`.
/// Zero-length events have no share anywhere.
pub fn share(event: &ProductionEvent, bucket_start: u32, bucket_end: u32) -> f64 {
    let duration = event.duration_secs();
    if duration == 0 {
        return 0.0;
    }
    let overlap = overlap_secs(event.start_secs(), event.end_secs(), bucket_start, bucket_end);
    f64::from(overlap) / f64::from(duration)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HourBucket {
    pub hour: u32,
    pub total: f64,
    pub ok: f64,
    pub ng: f64,
    /// Highest hourly target among events that overlap this hour
    pub target: f64,
    pub item_name: Option<String>,
}

impl HourBucket {
    pub fn label(&self) -> String {
        format!("{:02}:00", self.hour)
    }
}

/// Split events into the 24 hour buckets of their day. Every bucket is
/// returned, including empty ones.
pub fn bucket_by_hour(events: &[ProductionEvent]) -> Vec<HourBucket> {
    let mut buckets: Vec<HourBucket> = (0..HOURS_PER_DAY)
        .map(|hour| HourBucket { hour, ..HourBucket::default() })
        .collect();

    for event in events {
        for bucket in buckets.iter_mut() {
            let bucket_start = bucket.hour * SECONDS_PER_HOUR;
            let fraction = share(event, bucket_start, bucket_start + SECONDS_PER_HOUR);
            if fraction <= 0.0 {
                continue;
            }

            bucket.total += event.total * fraction;
            bucket.ok += event.ok * fraction;
            bucket.ng += event.ng * fraction;

            if let Some(target) = event.target_per_hour {
                bucket.target = bucket.target.max(target);
            }
            if let Some(item) = &event.item_name {
                if bucket.item_name.as_ref().map_or(true, |current| item > current) {
                    bucket.item_name = Some(item.clone());
                }
            }
        }
    }

    buckets
}
