use crate::types::SeqIndex;

/// Extent of an alternation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trace {
    /// Last index kept inside the run.
    pub last_valid_idx: SeqIndex,
    /// Flips to the expected county after the start record.
    pub alternations: usize,
}

/// Walks `seq` forward from `start_idx`, following the alternation between
/// `a` and `b`.
///
/// The record at `start_idx` seeds the expected county and is not counted.
/// Each later record equal to the expected county is one alternation and
/// flips the expectation. A record equal to the other pair member is noise:
/// it extends the run without counting, and once more than `max_noise` noise
/// records follow each other the run ends just before them. A record outside
/// the pair ends the run at the last valid index.
///
/// A start record outside the pair yields `(start_idx, 0)`.
pub fn trace_pattern<T: PartialEq>(
    seq: &[T],
    start_idx: SeqIndex,
    a: &T,
    b: &T,
    max_noise: usize,
) -> Trace {
    let mut trace = Trace {
        last_valid_idx: start_idx,
        alternations: 0,
    };

    let Some(seed) = seq.get(start_idx) else {
        return trace;
    };
    let mut expected = if seed == a {
        b
    } else if seed == b {
        a
    } else {
        return trace;
    };

    let mut consecutive_same = 0usize;
    for (i, current) in seq.iter().enumerate().skip(start_idx + 1) {
        if current != a && current != b {
            break;
        }

        trace.last_valid_idx = i;
        if current == expected {
            consecutive_same = 0;
            trace.alternations += 1;
            expected = if expected == a { b } else { a };
        } else {
            consecutive_same += 1;
            if consecutive_same > max_noise {
                trace.last_valid_idx = i - consecutive_same;
                break;
            }
        }
    }

    trace
}
