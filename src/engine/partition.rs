use std::ops::Range;

/// Half-open range `[start, end)` into the payment sequence handled by one task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    pub start: usize,
    pub end: usize,
}

impl Partition {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Split `n` items into `workers` contiguous partitions
///
/// The first `workers - 1` partitions hold exactly `n / workers` items and the
/// last one absorbs the remainder. Zero workers is treated as one. Exactly
/// `workers` partitions are returned even when some (or all) are empty.
pub fn partition(n: usize, workers: usize) -> Vec<Partition> {
    let workers = workers.max(1);
    let chunk = n / workers;

    let mut partitions: Vec<Partition> = (0..workers - 1)
        .map(|i| Partition {
            start: i * chunk,
            end: (i + 1) * chunk,
        })
        .collect();

    partitions.push(Partition {
        start: (workers - 1) * chunk,
        end: n,
    });

    partitions
}

/// Split `n` items into fixed-size chunks of `unit_size`
///
/// There are `max(1, n / unit_size)` chunks. All but the last hold exactly
/// `unit_size` items and the last one absorbs the remainder, so an empty
/// input still yields a single empty chunk. A `unit_size` of zero is treated
/// as one.
pub fn chunk(n: usize, unit_size: usize) -> Vec<Partition> {
    let unit_size = unit_size.max(1);
    let count = (n / unit_size).max(1);

    let mut chunks: Vec<Partition> = (0..count - 1)
        .map(|i| Partition {
            start: i * unit_size,
            end: (i + 1) * unit_size,
        })
        .collect();

    chunks.push(Partition {
        start: (count - 1) * unit_size,
        end: n,
    });

    chunks
}
