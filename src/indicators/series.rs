// =============================================================================
// Aligned series — values paired with their position on the input timeline
// =============================================================================
//
// Chained smoothing stages consume a warm-up prefix each.  Rather than carry
// zero-filled buffers around and re-derive offsets from lengths, every stage
// returns the valid values together with the input index of the first one.
//
//   input:   x0  x1  x2  x3  x4  x5
//   EMA(3):          e2  e3  e4  e5      start = 2
//   EMA(2) of that:      s3  s4  s5      start = 2 + 1
// =============================================================================

use serde::{Deserialize, Serialize};

/// A run of values where `values[j]` belongs to input index `start + j`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aligned<T> {
    pub start: usize,
    pub values: Vec<T>,
}

/// The common case: a real-valued indicator series.
pub type Series = Aligned<f64>;

impl<T> Aligned<T> {
    pub fn new(start: usize, values: Vec<T>) -> Self {
        Self { start, values }
    }

    /// An empty series, the "no value produced" outcome.
    pub fn empty() -> Self {
        Self {
            start: 0,
            values: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of valid values (not the logical timeline length).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// One past the last input index covered.
    pub fn end(&self) -> usize {
        self.start + self.values.len()
    }

    /// Value at input index `index`, if that index is inside the valid range.
    pub fn get(&self, index: usize) -> Option<&T> {
        index
            .checked_sub(self.start)
            .and_then(|j| self.values.get(j))
    }

    /// The most recent value.
    pub fn last(&self) -> Option<&T> {
        self.values.last()
    }

    /// Re-express a series computed over a sub-slice that began at input index
    /// `base` in terms of the full input timeline.
    pub fn shifted(mut self, base: usize) -> Self {
        if !self.values.is_empty() {
            self.start += base;
        }
        self
    }

    /// Valid values at input indices `>= from`.
    pub fn from_index(&self, from: usize) -> &[T] {
        let skip = from.saturating_sub(self.start).min(self.values.len());
        &self.values[skip..]
    }
}

impl Series {
    /// Full-length form with the warm-up prefix zero-filled.
    pub fn to_dense(&self) -> Vec<f64> {
        let mut dense = vec![0.0; self.start];
        dense.extend_from_slice(&self.values);
        dense
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_uses_input_indices() {
        let s = Series::new(3, vec![1.0, 2.0, 3.0]);
        assert_eq!(s.get(2), None);
        assert_eq!(s.get(3), Some(&1.0));
        assert_eq!(s.get(5), Some(&3.0));
        assert_eq!(s.get(6), None);
        assert_eq!(s.end(), 6);
    }

    #[test]
    fn shifted_moves_start_but_not_values() {
        let s = Series::new(1, vec![7.0, 8.0]).shifted(25);
        assert_eq!(s.start, 26);
        assert_eq!(s.values, vec![7.0, 8.0]);
    }

    #[test]
    fn shifting_empty_series_keeps_it_at_zero() {
        let s = Series::empty().shifted(10);
        assert_eq!(s.start, 0);
        assert!(s.is_empty());
    }

    #[test]
    fn from_index_clamps_both_ends() {
        let s = Series::new(2, vec![1.0, 2.0, 3.0]);
        assert_eq!(s.from_index(0), &[1.0, 2.0, 3.0]);
        assert_eq!(s.from_index(3), &[2.0, 3.0]);
        assert!(s.from_index(9).is_empty());
    }

    #[test]
    fn dense_form_zero_fills_warm_up() {
        let s = Series::new(2, vec![5.0, 6.0]);
        assert_eq!(s.to_dense(), vec![0.0, 0.0, 5.0, 6.0]);
    }
}
