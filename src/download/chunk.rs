//! Byte range partitioning for parallel range requests.

use std::fmt;

use super::constants::MAX_CHUNK_COUNT;

/// An inclusive byte range `[start, end]` of the remote resource.
///
/// Inclusive on both ends to match the HTTP `Range: bytes=start-end` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkRange {
    /// First byte offset (inclusive).
    pub start: u64,
    /// Last byte offset (inclusive).
    pub end: u64,
}

impl ChunkRange {
    /// Creates a range; `end` must not be before `start`.
    #[must_use]
    pub fn new(start: u64, end: u64) -> Self {
        debug_assert!(end >= start, "chunk range end {end} before start {start}");
        Self { start, end }
    }

    /// Number of bytes covered by this range.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// A range always covers at least one byte.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Value for the HTTP `Range` header.
    #[must_use]
    pub fn header_value(&self) -> String {
        format!("bytes={}-{}", self.start, self.end)
    }
}

impl fmt::Display for ChunkRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Splits `[0, total_length)` into consecutive ranges of at most `chunk_size` bytes.
///
/// Returns an empty list when `total_length` or `chunk_size` is zero.
/// Callers bound the range count first; see [`DownloadJob::new`](super::DownloadJob::new).
#[must_use]
pub fn partition(total_length: u64, chunk_size: u64) -> Vec<ChunkRange> {
    if total_length == 0 || chunk_size == 0 {
        return Vec::new();
    }

    let count = total_length.div_ceil(chunk_size);
    let mut ranges = Vec::with_capacity(usize::try_from(count.min(MAX_CHUNK_COUNT)).unwrap_or(0));
    let mut start = 0u64;
    while start < total_length {
        // exclusive end internally, inclusive on the wire
        let end_exclusive = start.saturating_add(chunk_size).min(total_length);
        ranges.push(ChunkRange::new(start, end_exclusive - 1));
        start = end_exclusive;
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIB: u64 = 1024 * 1024;

    fn assert_partition_covers(total: u64, chunk: u64) {
        let ranges = partition(total, chunk);
        assert_eq!(
            ranges.len() as u64,
            total.div_ceil(chunk),
            "count for total={total} chunk={chunk}"
        );

        let mut expected_start = 0;
        for range in &ranges {
            assert_eq!(range.start, expected_start, "gap or overlap at {range}");
            assert!(range.len() <= chunk, "range {range} larger than {chunk}");
            assert!(range.len() > 0);
            expected_start = range.end + 1;
        }
        assert_eq!(expected_start, total, "partition does not end at total");
        assert_eq!(ranges.iter().map(ChunkRange::len).sum::<u64>(), total);
    }

    #[test]
    fn test_partition_five_mib_exact() {
        let ranges = partition(5 * MIB, MIB);
        let wire: Vec<String> = ranges.iter().map(ChunkRange::header_value).collect();
        assert_eq!(
            wire,
            vec![
                "bytes=0-1048575",
                "bytes=1048576-2097151",
                "bytes=2097152-3145727",
                "bytes=3145728-4194303",
                "bytes=4194304-5242879",
            ]
        );
    }

    #[test]
    fn test_partition_last_chunk_truncated() {
        let ranges = partition(10, 4);
        assert_eq!(
            ranges,
            vec![
                ChunkRange::new(0, 3),
                ChunkRange::new(4, 7),
                ChunkRange::new(8, 9)
            ]
        );
        assert_eq!(ranges[2].len(), 2);
    }

    #[test]
    fn test_partition_zero_length_is_empty() {
        assert!(partition(0, MIB).is_empty());
    }

    #[test]
    fn test_partition_zero_chunk_size_is_empty() {
        assert!(partition(100, 0).is_empty());
    }

    #[test]
    fn test_partition_single_byte() {
        assert_eq!(partition(1, MIB), vec![ChunkRange::new(0, 0)]);
    }

    #[test]
    fn test_partition_smaller_than_chunk() {
        assert_eq!(partition(500, MIB), vec![ChunkRange::new(0, 499)]);
    }

    #[test]
    fn test_partition_covers_every_byte_once() {
        for total in [1, 2, 3, 7, 64, 1000, 4096, MIB - 1, MIB, MIB + 1, 3 * MIB + 17] {
            for chunk in [1, 2, 3, 5, 512, 1000, MIB] {
                if total / chunk > 10_000 {
                    continue;
                }
                assert_partition_covers(total, chunk);
            }
        }
    }

    #[test]
    fn test_partition_near_u64_max_does_not_overflow() {
        let ranges = partition(u64::MAX, u64::MAX / 2 + 1);
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[1].end, u64::MAX - 1);
    }

    #[test]
    fn test_chunk_range_len_is_inclusive() {
        assert_eq!(ChunkRange::new(0, 0).len(), 1);
        assert_eq!(ChunkRange::new(1_048_576, 2_097_151).len(), MIB);
    }

    #[test]
    fn test_chunk_range_display() {
        assert_eq!(ChunkRange::new(5, 9).to_string(), "5-9");
        assert_eq!(ChunkRange::new(5, 9).header_value(), "bytes=5-9");
    }
}
