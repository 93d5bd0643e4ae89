//! Grid column allocator.
//!
//! Tracks occupied column intervals per row so grid cells without an
//! explicit `column` attribute land in the lowest free column, honoring
//! row and column spans. Intervals are kept sorted, disjoint, and merged
//! when adjacent, so occupancy per row stays a short segment list.

use std::collections::BTreeMap;

/// Inclusive occupied column interval.
type Segment = (usize, usize);

#[derive(Debug, Default)]
pub struct GridAllocator {
    rows: BTreeMap<usize, Vec<Segment>>,
}

impl GridAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lowest column where a `colspan`-wide block is free on every row
    /// covered by `rowspan`, starting at `row`. Does not mark occupancy.
    pub fn get_column(&self, row: usize, rowspan: usize, colspan: usize) -> usize {
        let rowspan = rowspan.max(1);
        let colspan = colspan.max(1);
        let mut col = 0;
        'scan: loop {
            let end = col + colspan - 1;
            for r in row..row + rowspan {
                if let Some(segments) = self.rows.get(&r) {
                    for &(s, e) in segments {
                        if s <= end && col <= e {
                            // Blocked; resume after the conflicting segment.
                            col = e + 1;
                            continue 'scan;
                        }
                    }
                }
            }
            return col;
        }
    }

    /// Mark a block occupied on every covered row and re-merge segments.
    pub fn add_column(&mut self, row: usize, col: usize, rowspan: usize, colspan: usize) {
        let rowspan = rowspan.max(1);
        let colspan = colspan.max(1);
        for r in row..row + rowspan {
            let segments = self.rows.entry(r).or_default();
            segments.push((col, col + colspan - 1));
            segments.sort_unstable();
            let mut merged: Vec<Segment> = Vec::with_capacity(segments.len());
            for &(s, e) in segments.iter() {
                match merged.last_mut() {
                    Some(last) if s <= last.1 + 1 => last.1 = last.1.max(e),
                    _ => merged.push((s, e)),
                }
            }
            *segments = merged;
        }
    }

    /// Occupied segments of a row, for inspection.
    pub fn segments(&self, row: usize) -> &[Segment] {
        self.rows.get(&row).map(Vec::as_slice).unwrap_or(&[])
    }
}
