//! Interval algebra on the continuous minute axis.
//!
//! Every interval is half-open `[start, end)` in absolute minutes from some
//! caller-chosen origin (see [`crate::axis`]). All list-producing operations here
//! return normalized output: sorted by start, with touching or overlapping runs
//! merged into one.

use std::cmp::Ordering;

/// A half-open minute interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: i64,
    pub end: i64,
}

impl Interval {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn len(&self) -> i64 {
        (self.end - self.start).max(0)
    }

    pub fn shifted(&self, by: i64) -> Self {
        Self::new(self.start + by, self.end + by)
    }

    pub fn contains_instant(&self, minute: i64) -> bool {
        self.start <= minute && minute < self.end
    }
}

impl PartialOrd for Interval {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Interval {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.start, self.end).cmp(&(other.start, other.end))
    }
}

/// Sort and merge a list of intervals. Two intervals `[a,b)` and `[c,d)` merge
/// iff `c <= b` (touching counts as contiguous).
pub fn normalize(mut intervals: Vec<Interval>) -> Vec<Interval> {
    intervals.retain(|i| !i.is_empty());
    if intervals.is_empty() {
        return intervals;
    }
    intervals.sort();
    let mut merged: Vec<Interval> = Vec::with_capacity(intervals.len());
    for iv in intervals {
        match merged.last_mut() {
            Some(last) if iv.start <= last.end => {
                if iv.end > last.end {
                    last.end = iv.end;
                }
            }
            _ => merged.push(iv),
        }
    }
    merged
}

/// Intersection of two interval lists. Accepts unsorted/overlapping input
/// (normalizes internally); output is normalized.
pub fn intersect(a: &[Interval], b: &[Interval]) -> Vec<Interval> {
    let a = normalize(a.to_vec());
    let b = normalize(b.to_vec());
    let mut result = Vec::new();
    let (mut i, mut j) = (0usize, 0usize);
    while i < a.len() && j < b.len() {
        let s = a[i].start.max(b[j].start);
        let e = a[i].end.min(b[j].end);
        if s < e {
            result.push(Interval::new(s, e));
        }
        if a[i].end < b[j].end {
            i += 1;
        } else {
            j += 1;
        }
    }
    result
}

/// `base \ (union of occupied)`, normalized.
pub fn subtract(base: &[Interval], occupied: &[Interval]) -> Vec<Interval> {
    if base.is_empty() {
        return Vec::new();
    }
    let base_n = normalize(base.to_vec());
    let occ_n = normalize(occupied.to_vec());
    let mut free = Vec::new();
    let mut j = 0usize;
    for b in &base_n {
        let (bs, be) = (b.start, b.end);
        let mut cursor = bs;
        while j < occ_n.len() && occ_n[j].end <= bs {
            j += 1;
        }
        let mut k = j;
        while k < occ_n.len() && occ_n[k].start < be {
            let (os, oe) = (occ_n[k].start, occ_n[k].end);
            if os > cursor {
                free.push(Interval::new(cursor, os.min(be)));
            }
            if oe > cursor {
                cursor = cursor.max(oe);
            }
            k += 1;
        }
        if cursor < be {
            free.push(Interval::new(cursor, be));
        }
    }
    free
}

/// Pack buffered slots into free regions.
///
/// Returns the pre-start minute (the slot's first instant, including
/// `buf_before`) of every candidate whose buffered span fits entirely inside a
/// single free run and whose service-start falls strictly inside `eff_window`.
///
/// `buf_after` does not participate in the stride (it is already folded into
/// `total_slot`); it is accepted for signature parity with callers that reason
/// about the full buffered shape of a slot.
#[allow(clippy::too_many_arguments)]
pub fn pack_slots(
    eff_window: Interval,
    free: &[Interval],
    total_slot: i64,
    buf_before: i64,
    _buf_after: i64,
) -> Vec<i64> {
    if free.is_empty() || total_slot <= 0 {
        return Vec::new();
    }
    let (es, ef) = (eff_window.start, eff_window.end);
    let mut pre_starts = Vec::new();
    for f in free {
        let mut start = (f.start).max(es - buf_before);
        while start + total_slot <= f.end {
            let service_start = start + buf_before;
            if es <= service_start && service_start < ef {
                pre_starts.push(start);
            }
            start += total_slot;
        }
    }
    pre_starts
}

/// A normalized interval list, carrying the "normalized" invariant at
/// construction rather than leaving callers to re-check it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntervalSet(Vec<Interval>);

impl IntervalSet {
    pub fn new(raw: Vec<Interval>) -> Self {
        Self(normalize(raw))
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn as_slice(&self) -> &[Interval] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<Interval> {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn union(&self, other: &IntervalSet) -> IntervalSet {
        let mut raw = self.0.clone();
        raw.extend(other.0.iter().copied());
        IntervalSet::new(raw)
    }

    pub fn intersect(&self, other: &IntervalSet) -> IntervalSet {
        IntervalSet(intersect(&self.0, &other.0))
    }

    pub fn subtract(&self, occupied: &IntervalSet) -> IntervalSet {
        IntervalSet(subtract(&self.0, &occupied.0))
    }
}

impl From<Interval> for IntervalSet {
    fn from(iv: Interval) -> Self {
        IntervalSet::new(vec![iv])
    }
}

impl FromIterator<Interval> for IntervalSet {
    fn from_iter<T: IntoIterator<Item = Interval>>(iter: T) -> Self {
        IntervalSet::new(iter.into_iter().collect())
    }
}
