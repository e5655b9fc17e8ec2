//! Integer helpers shared by the topologies

/// ⌊log2 n⌋ for n ≥ 1
#[inline]
pub fn floor_log2(n: usize) -> u32 {
    debug_assert!(n > 0, "log2 of zero");
    usize::BITS - 1 - n.leading_zeros()
}

/// ⌈log2 n⌉ for n ≥ 1
#[inline]
pub fn ceil_log2(n: usize) -> u32 {
    debug_assert!(n > 0, "log2 of zero");
    if n == 1 {
        0
    } else {
        floor_log2(n - 1) + 1
    }
}

/// Clear the lowest set bit
#[inline]
pub fn clear_lowest_bit(n: usize) -> usize {
    n & n.wrapping_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logs() {
        assert_eq!(floor_log2(1), 0);
        assert_eq!(floor_log2(7), 2);
        assert_eq!(floor_log2(8), 3);
        assert_eq!(ceil_log2(1), 0);
        assert_eq!(ceil_log2(5), 3);
        assert_eq!(ceil_log2(8), 3);
        assert_eq!(ceil_log2(9), 4);
    }

    #[test]
    fn test_clear_lowest_bit() {
        assert_eq!(clear_lowest_bit(0b1011_0000), 0b1010_0000);
        assert_eq!(clear_lowest_bit(1), 0);
        assert_eq!(clear_lowest_bit(0), 0);
    }
}
