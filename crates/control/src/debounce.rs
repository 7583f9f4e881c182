//! Debounced digital input lines.
//!
//! Converts raw, noisy pin reads into clean edges: a level change is reported
//! only once it has held its new value for the line's full debounce window,
//! so contact bounce and sub-window blips never surface as edges, and two
//! accepted edges on one line are always at least a window apart.

use embassy_time::{Duration, Instant};

/// A reported level transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    /// Low → high
    Rising,
    /// High → low
    Falling,
}

/// One debounced input line.
///
/// Feed it the raw level every poll via [`update`]; it answers with the edge
/// once the change is confirmed. The stored level only ever moves through
/// accepted edges (or [`rearm`]), so [`level`] is the debounced view of the
/// pin.
///
/// [`update`]: DebouncedLine::update
/// [`rearm`]: DebouncedLine::rearm
/// [`level`]: DebouncedLine::level
#[derive(Debug)]
pub struct DebouncedLine {
    window: Duration,
    level: bool,
    pending_since: Option<Instant>,
}

impl DebouncedLine {
    /// Create a line with the given debounce window, baselined at `initial`.
    pub fn new(initial: bool, window: Duration) -> Self {
        Self {
            window,
            level: initial,
            pending_since: None,
        }
    }

    /// Current debounced level.
    pub fn level(&self) -> bool {
        self.level
    }

    /// Whether the raw level currently agrees with the debounced level.
    pub fn is_settled(&self) -> bool {
        self.pending_since.is_none()
    }

    /// Feed one raw sample; returns the confirmed edge, if any.
    pub fn update(&mut self, raw: bool, now: Instant) -> Option<Edge> {
        if raw == self.level {
            // Any pending change was a blip; drop it.
            self.pending_since = None;
            return None;
        }
        match self.pending_since {
            None => {
                self.pending_since = Some(now);
                None
            }
            Some(since) if now.duration_since(since) >= self.window => {
                self.level = raw;
                self.pending_since = None;
                Some(if raw { Edge::Rising } else { Edge::Falling })
            }
            Some(_) => None,
        }
    }

    /// Re-baseline to `raw` without reporting an edge.
    ///
    /// Called on wake-from-sleep so the stale pre-sleep level cannot
    /// fabricate an edge out of the wake-up reading itself.
    pub fn rearm(&mut self, raw: bool) {
        self.level = raw;
        self.pending_since = None;
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::arithmetic_side_effects,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Instant {
        Instant::from_millis(v)
    }

    const WINDOW: Duration = Duration::from_millis(5);

    #[test]
    fn stable_level_reports_nothing() {
        let mut line = DebouncedLine::new(true, WINDOW);
        for t in 0..20 {
            assert_eq!(line.update(true, ms(t)), None);
        }
        assert!(line.level());
    }

    #[test]
    fn change_confirms_after_window() {
        let mut line = DebouncedLine::new(true, WINDOW);
        assert_eq!(line.update(false, ms(0)), None);
        assert_eq!(line.update(false, ms(2)), None);
        assert_eq!(line.update(false, ms(5)), Some(Edge::Falling));
        assert!(!line.level());
    }

    #[test]
    fn blip_shorter_than_window_is_dropped() {
        let mut line = DebouncedLine::new(true, WINDOW);
        assert_eq!(line.update(false, ms(0)), None);
        assert_eq!(line.update(false, ms(2)), None);
        // Raw returns to the stored level before confirmation.
        assert_eq!(line.update(true, ms(4)), None);
        assert_eq!(line.update(true, ms(10)), None);
        assert!(line.level());
    }

    #[test]
    fn bounce_during_change_restarts_the_window() {
        let mut line = DebouncedLine::new(true, WINDOW);
        assert_eq!(line.update(false, ms(0)), None);
        assert_eq!(line.update(true, ms(2)), None); // bounce back
        assert_eq!(line.update(false, ms(3)), None); // change restarts here
        assert_eq!(line.update(false, ms(6)), None); // only 3 ms held
        assert_eq!(line.update(false, ms(8)), Some(Edge::Falling));
    }

    #[test]
    fn accepted_edges_are_at_least_a_window_apart() {
        let mut line = DebouncedLine::new(false, WINDOW);
        let mut edges = Vec::new();
        // Toggle raw every millisecond for a while, then hold high.
        for t in 0..30u64 {
            let raw = t % 2 == 0;
            if let Some(e) = line.update(raw, ms(t)) {
                edges.push((t, e));
            }
        }
        for t in 30..60u64 {
            if let Some(e) = line.update(true, ms(t)) {
                edges.push((t, e));
            }
        }
        for pair in edges.windows(2) {
            assert!(pair[1].0 - pair[0].0 >= 5, "edges too close: {pair:?}");
        }
    }

    #[test]
    fn rearm_suppresses_the_pending_edge() {
        let mut line = DebouncedLine::new(true, WINDOW);
        assert_eq!(line.update(false, ms(0)), None);
        line.rearm(false);
        // Level already re-baselined; no edge is ever reported for it.
        assert_eq!(line.update(false, ms(10)), None);
        assert!(!line.level());
        assert!(line.is_settled());
    }
}
