//! Window composer (C3): computes the start-constraint window as the
//! intersection of the request window, the business attention window, and
//! the service attention window, expanded by day offsets when the request
//! spans a midnight crossover.

use crate::interval::{intersect, normalize, Interval};
use crate::model::DayWindow;

/// Day offsets to replicate a day-local window into absolute minute space.
/// A request window longer than one day (end beyond minute 1440) needs the
/// day-local window duplicated at `+1440` to cover its second calendar day.
pub fn day_offsets(request_window: Interval) -> Vec<i64> {
    if request_window.end > 1440 {
        vec![0, 1440]
    } else {
        vec![0]
    }
}

fn expand(window: DayWindow, offsets: &[i64]) -> Vec<Interval> {
    offsets
        .iter()
        .map(|d| Interval::new(window.start_min + d, window.end_min + d))
        .collect()
}

/// Composes `reqWin ∩ businessWin ∩ serviceAttnWin`, skipping any source
/// that is absent. Returns an empty (normalized) list when the request
/// window itself is empty or when the composition has no overlap.
pub fn start_constraint(
    request_window: Interval,
    business_window: Option<DayWindow>,
    service_attention_window: Option<DayWindow>,
) -> Vec<Interval> {
    if request_window.is_empty() {
        return Vec::new();
    }
    let offsets = day_offsets(request_window);
    let mut constraint = vec![request_window];

    if let Some(biz) = business_window {
        constraint = intersect(&constraint, &expand(biz, &offsets));
    }
    if let Some(svc) = service_attention_window {
        constraint = intersect(&constraint, &expand(svc, &offsets));
    }
    normalize(constraint)
}
