//! Batch planning.
//!
//! Converts a record range into an ordered sequence of fixed-size batches.
//! Planning is a pure function of its inputs: no side effects, deterministic,
//! and fully restartable by re-running with the same arguments (or resuming
//! with a recomputed start offset).

/// A contiguous slice of the record range, identified by offset and size.
///
/// Descriptors are generated once per planning pass and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchDescriptor {
    /// Record index this batch starts at.
    pub offset: u64,
    /// Number of records in this batch.
    pub size: u64,
}

impl BatchDescriptor {
    /// Exclusive upper bound implied by this batch (`offset + size`,
    /// saturating at `u64::MAX`).
    ///
    /// For the final batch this may exceed the configured record total;
    /// bounding the actual read is the trigger target's responsibility, not
    /// the planner's. See [`plan`]. The value only feeds progress output,
    /// so an extreme offset/size combination saturates instead of
    /// overflowing.
    pub const fn end(&self) -> u64 {
        self.offset.saturating_add(self.size)
    }
}

/// Plans the batches covering `[start_offset, total)`.
///
/// Offsets are `start_offset, start_offset + batch_size, ...`, strictly
/// below `total`. A `start_offset >= total` yields an empty plan, which is a
/// valid (finished) run rather than an error.
///
/// Every descriptor carries `size == batch_size`, including the last one:
/// the planner does not clip the final batch to `total`. The trigger target
/// already bounds its own reads, so an overrun descriptor is harmless and
/// keeps resume offsets aligned to the batch grid.
///
/// # Panics
///
/// Debug builds assert `batch_size > 0`; the CLI rejects a zero batch size
/// before planning.
pub fn plan(total: u64, batch_size: u64, start_offset: u64) -> Vec<BatchDescriptor> {
    debug_assert!(batch_size > 0, "batch_size must be greater than 0");

    (start_offset..total)
        .step_by(batch_size as usize)
        .map(|offset| BatchDescriptor {
            offset,
            size: batch_size,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covers_range_with_fixed_stride() {
        let batches = plan(10, 3, 0);
        let offsets: Vec<u64> = batches.iter().map(|b| b.offset).collect();
        assert_eq!(offsets, vec![0, 3, 6, 9]);
        assert!(batches.iter().all(|b| b.size == 3));

        // The last batch overruns the total; the planner leaves it unclipped.
        assert_eq!(batches.last().unwrap().end(), 12);
    }

    #[test]
    fn batch_count_matches_ceiling_division() {
        for (total, batch_size, start, expected) in [
            (0u64, 1u64, 0u64, 0usize),
            (1, 1, 0, 1),
            (1000, 1000, 0, 1),
            (1001, 1000, 0, 2),
            (5_000_000, 1_000, 0, 5_000),
            (5_000_000, 1_000, 100_000, 4_900),
            (7, 2, 3, 2),
        ] {
            let batches = plan(total, batch_size, start);
            assert_eq!(
                batches.len(),
                expected,
                "plan({total}, {batch_size}, {start})"
            );
            let span = total.saturating_sub(start);
            assert_eq!(batches.len() as u64, span.div_ceil(batch_size));
        }
    }

    #[test]
    fn first_offset_is_start_and_spacing_is_batch_size() {
        let batches = plan(100, 7, 13);
        assert_eq!(batches[0].offset, 13);
        for pair in batches.windows(2) {
            assert_eq!(pair[1].offset - pair[0].offset, 7);
        }
        assert!(batches.iter().all(|b| b.offset < 100));
    }

    #[test]
    fn end_saturates_instead_of_overflowing() {
        let batch = BatchDescriptor {
            offset: u64::MAX - 1,
            size: u64::MAX,
        };
        assert_eq!(batch.end(), u64::MAX);
    }

    #[test]
    fn start_at_or_past_total_yields_empty_plan() {
        assert!(plan(100, 10, 100).is_empty());
        assert!(plan(100, 10, 250).is_empty());
        assert!(plan(0, 10, 0).is_empty());
    }

    #[test]
    fn replanning_is_deterministic() {
        assert_eq!(plan(5_000, 128, 256), plan(5_000, 128, 256));
    }
}
