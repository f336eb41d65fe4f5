use std::collections::BTreeMap;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PairingError {
    #[error("{starts} start markers but {ends} end markers")]
    CountMismatch { starts: usize, ends: usize },

    #[error("end marker at offset {offset} has no open start marker")]
    UnmatchedEnd { offset: usize },

    #[error("start marker at offset {offset} is never closed")]
    UnclosedStart { offset: usize },
}

/// Pairs every start offset with its end offset using bracket matching.
///
/// Events are ordered by `(offset, is_end)`, so at an identical offset a
/// start is pushed before an end pops. Each end closes the most recently
/// opened start that is still pending.
pub fn pair_intervals(
    starts: &[usize],
    ends: &[usize],
) -> Result<BTreeMap<usize, usize>, PairingError> {
    Ok(pair_intervals_ordered(starts, ends)?.into_iter().collect())
}

/// Like [`pair_intervals`], but returns `(start, end)` pairs in the order
/// they close: an inner region comes before the region enclosing it.
pub fn pair_intervals_ordered(
    starts: &[usize],
    ends: &[usize],
) -> Result<Vec<(usize, usize)>, PairingError> {
    if starts.len() != ends.len() {
        return Err(PairingError::CountMismatch {
            starts: starts.len(),
            ends: ends.len(),
        });
    }

    let mut events: Vec<(usize, bool)> = starts
        .iter()
        .map(|&s| (s, false))
        .chain(ends.iter().map(|&e| (e, true)))
        .collect();
    events.sort_unstable();

    let mut pending = Vec::with_capacity(starts.len());
    let mut pairs = Vec::with_capacity(starts.len());

    for (offset, is_end) in events {
        if !is_end {
            pending.push(offset);
            continue;
        }
        let start = pending
            .pop()
            .ok_or(PairingError::UnmatchedEnd { offset })?;
        pairs.push((start, offset));
    }

    // Equal counts with no underflow leave nothing behind; kept for clarity.
    if let Some(&offset) = pending.last() {
        return Err(PairingError::UnclosedStart { offset });
    }

    Ok(pairs)
}
