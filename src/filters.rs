//! Scanline filters.
//!
//! Each byte is predicted from its left neighbour `a`, the byte above `b` and
//! the byte above-left `c`, where "left" means one whole pixel back. Only the
//! prediction error is compressed.

use log::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterType {
    None = 0,
    Sub = 1,
    Up = 2,
    Average = 3,
    Paeth = 4,
}
impl FilterType {
    pub const ALL: [FilterType; 5] = [
        FilterType::None,
        FilterType::Sub,
        FilterType::Up,
        FilterType::Average,
        FilterType::Paeth,
    ];

    pub fn filter(&self, x: u8, a: u8, b: u8, c: u8) -> u8 {
        match self {
            FilterType::None => x,
            FilterType::Sub => x.wrapping_sub(a),
            FilterType::Up => x.wrapping_sub(b),
            FilterType::Average => x.wrapping_sub(average(a, b)),
            FilterType::Paeth => x.wrapping_sub(paeth_predictor(a, b, c)),
        }
    }

    #[cfg(test)]
    pub(crate) fn reconstruct(&self, x: u8, a: u8, b: u8, c: u8) -> u8 {
        match self {
            FilterType::None => x,
            FilterType::Sub => x.wrapping_add(a),
            FilterType::Up => x.wrapping_add(b),
            FilterType::Average => x.wrapping_add(average(a, b)),
            FilterType::Paeth => x.wrapping_add(paeth_predictor(a, b, c)),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FilterPolicy {
    Fixed(FilterType),
    /// Try all five filters and keep the one whose output has the smallest
    /// sum of absolute values, reading each byte as signed.
    #[default]
    Adaptive,
}

fn average(a: u8, b: u8) -> u8 {
    ((a as u16 + b as u16) / 2) as u8
}

fn paeth_predictor(a: u8, b: u8, c: u8) -> u8 {
    let (a16, b16, c16) = (a as i16, b as i16, c as i16);
    let p = a16 + b16 - c16;
    let pa = (p - a16).abs();
    let pb = (p - b16).abs();
    let pc = (p - c16).abs();
    if pa <= pb && pa <= pc {
        a
    } else if pb <= pc {
        b
    } else {
        c
    }
}

fn filter_into(filter_type: FilterType, row: &[u8], prev: &[u8], stride: usize, out: &mut Vec<u8>) {
    out.clear();
    out.push(filter_type as u8);
    for (i, (&x, &b)) in row.iter().zip(prev).enumerate() {
        let (a, c) = if i >= stride {
            (row[i - stride], prev[i - stride])
        } else {
            (0, 0)
        };
        out.push(filter_type.filter(x, a, b, c));
    }
}

fn cost(filtered: &[u8]) -> u64 {
    filtered[1..]
        .iter()
        .map(|&v| (v as i8).unsigned_abs() as u64)
        .sum()
}

pub(crate) struct ScanlineFilter {
    policy: FilterPolicy,
    stride: usize,
    candidates: [Vec<u8>; 5],
    chosen: [usize; 5],
}
impl ScanlineFilter {
    pub(crate) fn new(policy: FilterPolicy, stride: usize, row_len: usize) -> Self {
        Self {
            policy,
            stride,
            candidates: std::array::from_fn(|_| Vec::with_capacity(row_len + 1)),
            chosen: [0; 5],
        }
    }

    /// Filters one packed row against the packed row above it. The returned
    /// slice starts with the filter-type byte.
    pub(crate) fn apply(&mut self, row: &[u8], prev: &[u8]) -> &[u8] {
        debug_assert_eq!(row.len(), prev.len());
        let best = match self.policy {
            FilterPolicy::Fixed(filter_type) => {
                filter_into(filter_type, row, prev, self.stride, &mut self.candidates[0]);
                self.chosen[filter_type as usize] += 1;
                return &self.candidates[0];
            }
            FilterPolicy::Adaptive => {
                let mut best = 0;
                let mut best_cost = u64::MAX;
                for (index, filter_type) in FilterType::ALL.into_iter().enumerate() {
                    let candidate = &mut self.candidates[index];
                    filter_into(filter_type, row, prev, self.stride, candidate);
                    let candidate_cost = cost(candidate);
                    if candidate_cost < best_cost {
                        best = index;
                        best_cost = candidate_cost;
                    }
                }
                best
            }
        };
        self.chosen[best] += 1;
        &self.candidates[best]
    }

    pub(crate) fn log_stats(&self) {
        let [none, sub, up, average, paeth] = self.chosen;
        trace!(
            "filters chosen: None={none} Sub={sub} Up={up} Average={average} Paeth={paeth} ({:?})",
            self.policy
        );
    }
}
