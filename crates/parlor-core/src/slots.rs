//! # Slot Grid Module
//!
//! Pure interval math for bulk slot generation.
//!
//! ## Boundary Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GRID GENERATION: [start, end) partitioned into duration-sized slots   │
//! │                                                                         │
//! │  build_slot_grid(10:00, 12:10, 60 min)                                 │
//! │                                                                         │
//! │  10:00 ──────── 11:00 ──────── 12:00 ── 12:10                          │
//! │  │   slot 1     │    slot 2    │ dropped │                             │
//! │  └──────────────┴──────────────┴─────────┘                             │
//! │                                                                         │
//! │  The trailing 10-minute remainder is DROPPED, never truncated into     │
//! │  a short slot. Only full-duration intervals are emitted.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The grid is pure math over [`NaiveTime`]; materializing rows (ids,
//! timestamps, capacity) is the scheduling engine's job.

use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::validation::{validate_slot_duration, validate_time_range, ValidationResult};

/// One generated interval: `[start_time, end_time)`, exactly
/// `duration_minutes` long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotInterval {
    /// Inclusive start.
    pub start_time: NaiveTime,
    /// Exclusive end.
    pub end_time: NaiveTime,
}

impl SlotInterval {
    /// Interval length in whole minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }
}

/// Partitions `[start, end)` into contiguous, non-overlapping intervals of
/// exactly `duration_minutes` each.
///
/// ## Rules
/// - Intervals are emitted in ascending order, each starting where the
///   previous one ended
/// - A trailing remainder shorter than one full duration is dropped
/// - `end <= start` or a zero/oversized duration is a validation error
/// - A range shorter than one duration yields an empty grid
///
/// ## Example
/// ```rust
/// use chrono::NaiveTime;
/// use parlor_core::slots::build_slot_grid;
///
/// let grid = build_slot_grid(
///     NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
///     NaiveTime::from_hms_opt(12, 10, 0).unwrap(),
///     60,
/// )
/// .unwrap();
///
/// // 12:00-12:10 remainder dropped: exactly two slots
/// assert_eq!(grid.len(), 2);
/// ```
pub fn build_slot_grid(
    start: NaiveTime,
    end: NaiveTime,
    duration_minutes: u32,
) -> ValidationResult<Vec<SlotInterval>> {
    validate_time_range(start, end)?;
    validate_slot_duration(duration_minutes)?;

    let step = Duration::minutes(duration_minutes as i64);
    let mut grid = Vec::new();
    let mut cursor = start;

    loop {
        // overflowing_add_signed reports seconds wrapped past midnight;
        // a wrapped interval can never fit inside [start, end)
        let (next, wrapped) = cursor.overflowing_add_signed(step);
        if wrapped != 0 || next > end {
            break;
        }
        grid.push(SlotInterval {
            start_time: cursor,
            end_time: next,
        });
        if next == end {
            break;
        }
        cursor = next;
    }

    Ok(grid)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_exact_partition() {
        let grid = build_slot_grid(t(10, 0), t(12, 0), 60).unwrap();
        assert_eq!(grid.len(), 2);
        assert_eq!(grid[0].start_time, t(10, 0));
        assert_eq!(grid[0].end_time, t(11, 0));
        assert_eq!(grid[1].start_time, t(11, 0));
        assert_eq!(grid[1].end_time, t(12, 0));
    }

    #[test]
    fn test_trailing_remainder_dropped() {
        // 10:00-12:10 at 60 min: the 12:00-12:10 remainder is dropped,
        // not emitted as a short slot
        let grid = build_slot_grid(t(10, 0), t(12, 10), 60).unwrap();
        assert_eq!(grid.len(), 2);
        assert_eq!(grid.last().unwrap().end_time, t(12, 0));
    }

    #[test]
    fn test_range_shorter_than_duration() {
        let grid = build_slot_grid(t(10, 0), t(10, 30), 60).unwrap();
        assert!(grid.is_empty());
    }

    #[test]
    fn test_intervals_are_contiguous_and_non_overlapping() {
        let grid = build_slot_grid(t(9, 0), t(17, 35), 45).unwrap();
        for pair in grid.windows(2) {
            assert_eq!(pair[0].end_time, pair[1].start_time);
            assert!(pair[0].start_time < pair[0].end_time);
        }
    }

    #[test]
    fn test_total_duration_never_exceeds_range() {
        let cases = [
            (t(10, 0), t(12, 10), 60),
            (t(9, 0), t(17, 0), 45),
            (t(0, 0), t(23, 59), 30),
            (t(8, 15), t(8, 45), 10),
        ];
        for (start, end, duration) in cases {
            let grid = build_slot_grid(start, end, duration).unwrap();
            let total: i64 = grid.iter().map(SlotInterval::duration_minutes).sum();
            let range = (end - start).num_minutes();
            assert!(
                total <= range,
                "grid of {duration}-min slots over {range} min summed to {total}"
            );
            for interval in &grid {
                assert_eq!(interval.duration_minutes(), duration as i64);
            }
        }
    }

    #[test]
    fn test_empty_range_rejected() {
        assert!(build_slot_grid(t(12, 0), t(12, 0), 60).is_err());
        assert!(build_slot_grid(t(12, 0), t(10, 0), 60).is_err());
    }

    #[test]
    fn test_zero_duration_rejected() {
        assert!(build_slot_grid(t(10, 0), t(12, 0), 0).is_err());
    }

    #[test]
    fn test_grid_never_crosses_midnight() {
        // 23:00 + 90 min would wrap past midnight; nothing fits
        let grid = build_slot_grid(t(23, 0), t(23, 59), 90).unwrap();
        assert!(grid.is_empty());
    }
}
