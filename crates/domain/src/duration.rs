/// Rest between sets in minutes.
const REST: i64 = 5;
/// Work per set in minutes.
const WORK: i64 = 1;
const WARMUP: i64 = 3;

/// Estimated length of a session in minutes.
///
/// Every set takes its work time plus a rest, the warmup is added once and the rest after the
/// final set is dropped. A session without sets takes no time.
pub fn estimate_duration(total_sets: i64) -> Result<u32, InvalidInputError> {
    if total_sets < 0 {
        return Err(InvalidInputError::NegativeSets(total_sets));
    }

    if total_sets == 0 {
        return Ok(0);
    }

    let minutes = total_sets
        .checked_mul(REST + WORK)
        .and_then(|m| m.checked_add(WARMUP - REST))
        .and_then(|m| u32::try_from(m).ok())
        .ok_or(InvalidInputError::TooManySets(total_sets))?;

    Ok(minutes)
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum InvalidInputError {
    #[error("Number of sets must not be negative ({0} < 0)")]
    NegativeSets(i64),
    #[error("Number of sets is too large ({0})")]
    TooManySets(i64),
}
