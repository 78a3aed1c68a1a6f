use anyhow::{anyhow, Result};

const BYTES_PER_GIB: u64 = 1024 * 1024 * 1024;

/// Convert a GiB count from the command line into the byte count xapi
/// expects for memory limits and virtual disk sizes.
pub fn gib_to_bytes(gib: u64) -> Result<u64> {
    gib.checked_mul(BYTES_PER_GIB)
        .ok_or_else(|| anyhow!("size of {} GiB does not fit in a byte count", gib))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_whole_gib() {
        assert_eq!(gib_to_bytes(1).unwrap(), 1073741824);
        assert_eq!(gib_to_bytes(2).unwrap(), 2147483648);
        assert_eq!(gib_to_bytes(10).unwrap(), 10737418240);
    }

    #[test]
    fn zero_is_zero() {
        assert_eq!(gib_to_bytes(0).unwrap(), 0);
    }

    #[test]
    fn rejects_overflow() {
        assert!(gib_to_bytes(u64::MAX / 2).is_err());
    }
}
