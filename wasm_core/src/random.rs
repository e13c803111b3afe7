//! Small helpers over `getrandom` used by the generator tools.

use crate::error::{Result, ToolError};

pub fn fill_random(buf: &mut [u8]) -> Result<()> {
    getrandom::fill(buf).map_err(|err| ToolError::Random(err.to_string()))
}

pub fn random_u64() -> Result<u64> {
    let mut bytes = [0u8; 8];
    fill_random(&mut bytes)?;
    Ok(u64::from_le_bytes(bytes))
}

/// Uniform integer in `0..bound` using rejection sampling to avoid modulo bias.
pub fn random_below(bound: u64) -> Result<u64> {
    if bound == 0 {
        return Err(ToolError::invalid("random bound must be positive"));
    }
    let zone = u64::MAX - (u64::MAX % bound);
    loop {
        let value = random_u64()?;
        if value < zone {
            return Ok(value % bound);
        }
    }
}

/// Uniform integer in the inclusive range `min..=max`.
pub fn random_in_range(min: i64, max: i64) -> Result<i64> {
    if min > max {
        return Err(ToolError::invalid("minimum must not exceed maximum"));
    }
    let span = (max as i128 - min as i128 + 1) as u128;
    if span > u64::MAX as u128 {
        let raw = random_u64()? as i128;
        return Ok((min as i128 + raw) as i64);
    }
    let offset = random_below(span as u64)?;
    Ok((min as i128 + offset as i128) as i64)
}

pub fn choose<T: Copy>(items: &[T]) -> Result<T> {
    let idx = random_below(items.len() as u64)? as usize;
    Ok(items[idx])
}

/// Fisher-Yates shuffle.
pub fn shuffle<T>(items: &mut [T]) -> Result<()> {
    for idx in (1..items.len()).rev() {
        let swap = random_below(idx as u64 + 1)? as usize;
        items.swap(idx, swap);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_below_stays_in_bounds() {
        for _ in 0..200 {
            assert!(random_below(7).unwrap() < 7);
        }
    }

    #[test]
    fn random_below_rejects_zero() {
        assert!(random_below(0).is_err());
    }

    #[test]
    fn random_in_range_is_inclusive() {
        let mut seen_min = false;
        let mut seen_max = false;
        for _ in 0..500 {
            let value = random_in_range(-1, 1).unwrap();
            assert!((-1..=1).contains(&value));
            seen_min |= value == -1;
            seen_max |= value == 1;
        }
        assert!(seen_min && seen_max);
    }

    #[test]
    fn shuffle_keeps_elements() {
        let mut items: Vec<u32> = (0..20).collect();
        shuffle(&mut items).unwrap();
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..20).collect::<Vec<_>>());
    }
}
