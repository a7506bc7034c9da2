//! A flat bit array with 32-bit windowed reads.

/// Fixed-length bit array backed by 64-bit words.
///
/// Bits past `len` always read as zero, so a window that runs off the end of
/// the array sees blocked cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitSet {
    words: Vec<u64>,
    len: usize,
}

impl BitSet {
    /// A bit set of `len` cleared bits.
    pub fn new(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(64)],
            len,
        }
    }

    /// Number of addressable bits.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Read bit `i`. Out-of-range indices read as zero.
    #[inline]
    pub fn get(&self, i: usize) -> bool {
        if i >= self.len {
            return false;
        }
        (self.words[i >> 6] >> (i & 63)) & 1 != 0
    }

    /// Write bit `i`. Out-of-range indices are ignored.
    #[inline]
    pub fn set(&mut self, i: usize, value: bool) {
        if i >= self.len {
            return;
        }
        let mask = 1u64 << (i & 63);
        if value {
            self.words[i >> 6] |= mask;
        } else {
            self.words[i >> 6] &= !mask;
        }
    }

    /// The 32 bits `start..start + 32`, with bit `start` in the least
    /// significant position.
    #[inline]
    pub fn window32(&self, start: usize) -> u32 {
        let w = start >> 6;
        let off = start & 63;
        let lo = self.words.get(w).copied().unwrap_or(0) >> off;
        let hi = if off == 0 {
            0
        } else {
            self.words.get(w + 1).copied().unwrap_or(0) << (64 - off)
        };
        (lo | hi) as u32
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_set() {
        let mut b = BitSet::new(130);
        b.set(0, true);
        b.set(64, true);
        b.set(129, true);
        b.set(500, true);
        assert!(b.get(0) && b.get(64) && b.get(129));
        assert!(!b.get(1) && !b.get(500));
        assert_eq!(b.count_ones(), 3);
        b.set(64, false);
        assert!(!b.get(64));
    }

    #[test]
    fn window_spans_words() {
        let mut b = BitSet::new(200);
        for i in [60, 63, 64, 70, 91] {
            b.set(i, true);
        }
        let w = b.window32(60);
        assert_eq!(w, 1 | 1 << 3 | 1 << 4 | 1 << 10 | 1 << 31);
        assert_eq!(b.window32(64), 1 | 1 << 6 | 1 << 27);
    }

    #[test]
    fn window_past_end_reads_zero() {
        let mut b = BitSet::new(70);
        b.set(69, true);
        assert_eq!(b.window32(69), 1);
        assert_eq!(b.window32(1000), 0);
    }
}
