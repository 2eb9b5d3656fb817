//! Length limits applied by variable-length codecs when reading.

use core::ops::{Bound, RangeBounds};

/// Inclusive bounds on a length or count read from a buffer.
///
/// Variable-length codecs hold one of these so that a corrupted or hostile length is
/// rejected before anything is allocated.
///
/// # Examples
///
/// ```
/// use tagwire_serializer::RangeCfg;
///
/// let cfg = RangeCfg::new(0..=1024);
/// assert!(cfg.contains(500));
/// assert!(!cfg.contains(2000));
///
/// let cfg_min = RangeCfg::new(1..);
/// assert!(cfg_min.contains(1));
/// assert!(!cfg_min.contains(0));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct RangeCfg {
    min: usize,
    max: usize,
}

impl RangeCfg {
    /// Creates bounds from any range of lengths.
    ///
    /// Ranges that admit no value (such as `5..5`) produce bounds that reject every length.
    pub fn new(r: impl RangeBounds<usize>) -> Self {
        let min = match r.start_bound() {
            Bound::Included(&s) => Some(s),
            Bound::Excluded(&s) => s.checked_add(1),
            Bound::Unbounded => Some(0),
        };
        let max = match r.end_bound() {
            Bound::Included(&e) => Some(e),
            Bound::Excluded(&e) => e.checked_sub(1),
            Bound::Unbounded => Some(usize::MAX),
        };
        match (min, max) {
            (Some(min), Some(max)) => Self { min, max },
            _ => Self::EMPTY,
        }
    }

    const EMPTY: Self = Self { min: 1, max: 0 };

    /// Creates bounds that only accept exactly `len`.
    pub fn exact(len: usize) -> Self {
        Self { min: len, max: len }
    }

    /// Returns true if `len` is within bounds.
    pub fn contains(&self, len: usize) -> bool {
        self.min <= len && len <= self.max
    }
}

/// Accepts every length that fits the 4-byte length prefix.
impl Default for RangeCfg {
    fn default() -> Self {
        Self::new(..=u32::MAX as usize)
    }
}

impl RangeBounds<usize> for RangeCfg {
    fn start_bound(&self) -> Bound<&usize> {
        Bound::Included(&self.min)
    }

    fn end_bound(&self) -> Bound<&usize> {
        Bound::Included(&self.max)
    }
}
