use crate::core::body::Body;
use crate::error::{Error, Result};
use ordered_float::NotNan;
use std::cmp::Ordering;

/// What a scheduled event refers to.
///
/// Body handles are indices into the driver's body arena. Bodies are never
/// destroyed during a run, so a handle stays good for the lifetime of the
/// simulation; the snapshot counters, not the handles, carry staleness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Collision between bodies `a` and `b` (always `a < b`).
    Pair { a: usize, b: usize },
    /// Body `a` reaches the left or right wall.
    VerticalWall { a: usize },
    /// Body `b` reaches the floor or ceiling.
    HorizontalWall { b: usize },
    /// Periodic frame render; no physical referent, keeps the loop alive.
    Redraw,
}

impl EventKind {
    /// Tie-break key for events at equal times: physical events dispatch
    /// before a frame renders the post-collision state.
    #[inline]
    fn order_key(&self) -> (u8, usize, usize) {
        match *self {
            EventKind::Pair { a, b } => (0, a, b),
            EventKind::VerticalWall { a } => (1, a, 0),
            EventKind::HorizontalWall { b } => (2, b, 0),
            EventKind::Redraw => (3, 0, 0),
        }
    }
}

/// A predicted future occurrence in the schedule.
///
/// Immutable once created. Carries a snapshot of each referenced body's
/// collision counter taken at creation time; `count_a`/`count_b` stay 0 for
/// sides the kind does not reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub time: NotNan<f64>,
    pub kind: EventKind,
    pub count_a: u64,
    pub count_b: u64,
}

impl Event {
    fn checked_time(time: f64) -> Result<NotNan<f64>> {
        if time.is_nan() {
            return Err(Error::MathError("event time cannot be NaN".into()));
        }
        if !time.is_finite() {
            return Err(Error::MathError("event time must be finite".into()));
        }
        NotNan::new(time).map_err(|_| Error::MathError("event time cannot be NaN".into()))
    }

    /// Pair-collision event between `bodies[a]` and `bodies[b]`.
    pub fn pair(time: f64, a: usize, b: usize, bodies: &[Body]) -> Result<Self> {
        Ok(Self {
            time: Self::checked_time(time)?,
            kind: EventKind::Pair { a, b },
            count_a: bodies[a].collisions,
            count_b: bodies[b].collisions,
        })
    }

    /// Vertical-wall event for `bodies[a]`.
    pub fn vertical_wall(time: f64, a: usize, bodies: &[Body]) -> Result<Self> {
        Ok(Self {
            time: Self::checked_time(time)?,
            kind: EventKind::VerticalWall { a },
            count_a: bodies[a].collisions,
            count_b: 0,
        })
    }

    /// Horizontal-wall event for `bodies[b]`.
    pub fn horizontal_wall(time: f64, b: usize, bodies: &[Body]) -> Result<Self> {
        Ok(Self {
            time: Self::checked_time(time)?,
            kind: EventKind::HorizontalWall { b },
            count_a: 0,
            count_b: bodies[b].collisions,
        })
    }

    /// Redraw pseudo-event.
    pub fn redraw(time: f64) -> Result<Self> {
        Ok(Self {
            time: Self::checked_time(time)?,
            kind: EventKind::Redraw,
            count_a: 0,
            count_b: 0,
        })
    }

    /// Returns the raw f64 event time.
    #[inline]
    pub fn time_f64(&self) -> f64 {
        self.time.into_inner()
    }

    /// True while every referenced body still has the collision count it had
    /// when this event was predicted. Any collision involving a referenced
    /// body since then, with anyone, makes the prediction stale.
    pub fn is_valid(&self, bodies: &[Body]) -> bool {
        match self.kind {
            EventKind::Pair { a, b } => {
                bodies[a].collisions == self.count_a && bodies[b].collisions == self.count_b
            }
            EventKind::VerticalWall { a } => bodies[a].collisions == self.count_a,
            EventKind::HorizontalWall { b } => bodies[b].collisions == self.count_b,
            EventKind::Redraw => true,
        }
    }
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.time.cmp(&other.time) {
            Ordering::Equal => {
                let a = self.kind.order_key();
                let b = other.kind.order_key();
                match a.cmp(&b) {
                    Ordering::Equal => {
                        // Final tie-breaker on snapshots to keep a total order
                        (self.count_a, self.count_b).cmp(&(other.count_a, other.count_b))
                    }
                    o => o,
                }
            }
            o => o,
        }
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_bodies() -> Vec<Body> {
        vec![
            Body::new(0.25, 0.25, 0.01, 0.0, 0.02, 20.0).unwrap(),
            Body::new(0.75, 0.75, -0.01, 0.02, 0.03, 30.0).unwrap(),
        ]
    }

    #[test]
    fn rejects_nan_time() {
        let bodies = two_bodies();
        let err = Event::pair(f64::NAN, 0, 1, &bodies).unwrap_err();
        assert!(err.to_string().contains("NaN"));
    }

    #[test]
    fn rejects_infinite_time() {
        // "never" predictions must be filtered out before scheduling
        let err = Event::redraw(f64::INFINITY).unwrap_err();
        assert!(err.to_string().contains("finite"));
    }

    #[test]
    fn ordering_by_time() -> crate::error::Result<()> {
        let bodies = two_bodies();
        let e1 = Event::pair(1.0, 0, 1, &bodies)?;
        let e2 = Event::vertical_wall(2.0, 0, &bodies)?;
        assert!(e1 < e2);
        Ok(())
    }

    #[test]
    fn equal_time_tie_break_is_deterministic() -> crate::error::Result<()> {
        let bodies = two_bodies();
        let t = 5.0;
        let pair = Event::pair(t, 0, 1, &bodies)?;
        let vwall = Event::vertical_wall(t, 0, &bodies)?;
        let hwall = Event::horizontal_wall(t, 1, &bodies)?;
        let redraw = Event::redraw(t)?;
        assert!(pair < vwall);
        assert!(vwall < hwall);
        assert!(hwall < redraw);
        Ok(())
    }

    #[test]
    fn stale_after_any_collision_of_a_referenced_body() -> crate::error::Result<()> {
        let mut bodies = two_bodies();
        let pair = Event::pair(1.0, 0, 1, &bodies)?;
        let vwall = Event::vertical_wall(1.5, 0, &bodies)?;
        let hwall = Event::horizontal_wall(2.0, 1, &bodies)?;
        assert!(pair.is_valid(&bodies));
        assert!(vwall.is_valid(&bodies));
        assert!(hwall.is_valid(&bodies));

        // Body 0 collides with something; everything referencing it goes stale
        bodies[0].bump_collisions();
        assert!(!pair.is_valid(&bodies));
        assert!(!vwall.is_valid(&bodies));
        assert!(hwall.is_valid(&bodies));
        Ok(())
    }

    #[test]
    fn redraw_is_always_valid() -> crate::error::Result<()> {
        let mut bodies = two_bodies();
        let redraw = Event::redraw(0.0)?;
        bodies[0].bump_collisions();
        bodies[1].bump_collisions();
        assert!(redraw.is_valid(&bodies));
        Ok(())
    }
}
