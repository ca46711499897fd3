//! Nested directed/reversed string forest (§3, §4.2).
//!
//! Grounded on `examples/original_source/src/ansi/line.hpp`'s
//! `nested_string` struct (`begin`/`end`/`beg_marker`/`end_marker`/`r2l`/
//! `parent`) and its invariant that parents always precede children and
//! strings never cross.

use boardterm_model::character::Marker;

/// One entry of the nested-string forest cached on a proportional [`Line`](crate::line::Line).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NestedString {
    /// Data-coordinate half-open range `[begin, end)`.
    pub begin: u32,
    pub end: u32,
    /// `true` if this segment runs right-to-left relative to its parent.
    pub r2l: bool,
    pub begin_marker: Marker,
    pub end_marker: Marker,
    /// Index into the owning line's forest vector; the outermost
    /// pseudo-string (index 0) is its own parent.
    pub parent: usize,
}

impl NestedString {
    #[must_use]
    pub const fn contains(&self, x: u32) -> bool {
        self.begin <= x && x < self.end
    }

    #[must_use]
    pub const fn len(&self) -> u32 {
        self.end - self.begin
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    #[must_use]
    pub const fn midpoint(&self) -> u32 {
        self.begin + self.len() / 2
    }
}

/// Build the nested-string forest by scanning a line's cells in data order
/// for SDS/SRS begin/end markers, per §3's forest invariants: parents
/// precede children, strings never cross, unmatched begins are closed at
/// end-of-line and unmatched ends are dropped.
#[must_use]
pub fn build_forest(markers: &[(u32, Marker)], len: u32, line_r2l: bool) -> Vec<NestedString> {
    let mut forest = vec![NestedString {
        begin: 0,
        end: len,
        r2l: line_r2l,
        begin_marker: if line_r2l { Marker::SdsR2l } else { Marker::SdsL2r },
        end_marker: Marker::SdsEnd,
        parent: 0,
    }];
    let mut stack: Vec<usize> = vec![0];
    for &(pos, marker) in markers {
        if marker.is_begin() {
            let parent = *stack.last().unwrap();
            let idx = forest.len();
            forest.push(NestedString {
                begin: pos,
                end: len,
                r2l: marker.begin_r2l(),
                begin_marker: marker,
                end_marker: marker.matching_end(),
                parent,
            });
            stack.push(idx);
        } else if stack.len() > 1 {
            let idx = stack.pop().unwrap();
            forest[idx].end = pos;
        }
        // An end marker with no matching open (stack.len() == 1, only the
        // outer pseudo-string left) is dropped, per the forest invariant.
    }
    forest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_line_has_only_outer_string() {
        let forest = build_forest(&[], 10, false);
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].begin, 0);
        assert_eq!(forest[0].end, 10);
    }

    #[test]
    fn nested_srs_builds_child_with_parent_link() {
        let markers = vec![(2, Marker::SrsBegin), (6, Marker::SrsEnd)];
        let forest = build_forest(&markers, 10, false);
        assert_eq!(forest.len(), 2);
        assert_eq!(forest[1].begin, 2);
        assert_eq!(forest[1].end, 6);
        assert_eq!(forest[1].parent, 0);
        assert!(forest[1].r2l);
    }

    #[test]
    fn unmatched_begin_closes_at_line_end() {
        let markers = vec![(3, Marker::SrsBegin)];
        let forest = build_forest(&markers, 8, false);
        assert_eq!(forest[1].end, 8);
    }
}
