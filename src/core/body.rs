use crate::error::{Error, Result};

/// A circular body bouncing around the unit square.
///
/// Fields:
/// - `rx`, `ry`: center position
/// - `vx`, `vy`: velocity
/// - `radius`: disk radius (> 0)
/// - `mass`: mass (> 0)
/// - `collisions`: incremented each time the body participates in a realized
///   collision; scheduled events snapshot it to detect staleness
#[derive(Debug, Clone)]
pub struct Body {
    /// Center x position.
    pub rx: f64,
    /// Center y position.
    pub ry: f64,
    /// Velocity x component.
    pub vx: f64,
    /// Velocity y component.
    pub vy: f64,
    /// Disk radius (> 0).
    pub radius: f64,
    /// Mass (> 0).
    pub mass: f64,
    /// Collision participation counter (for event invalidation).
    pub collisions: u64,
}

impl Body {
    /// Create a new body after validating invariants.
    ///
    /// Errors:
    /// - `Error::InvalidParam` if `radius` or `mass` is non-positive or any
    ///   component is NaN/inf.
    pub fn new(rx: f64, ry: f64, vx: f64, vy: f64, radius: f64, mass: f64) -> Result<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(Error::InvalidParam("radius must be finite and > 0".into()));
        }
        if !mass.is_finite() || mass <= 0.0 {
            return Err(Error::InvalidParam("mass must be finite and > 0".into()));
        }
        if !(rx.is_finite() && ry.is_finite()) {
            return Err(Error::InvalidParam("position must be finite".into()));
        }
        if !(vx.is_finite() && vy.is_finite()) {
            return Err(Error::InvalidParam("velocity must be finite".into()));
        }
        Ok(Self {
            rx,
            ry,
            vx,
            vy,
            radius,
            mass,
            collisions: 0,
        })
    }

    /// Advance the body along its straight-line trajectory for `dt` time
    /// units.
    ///
    /// No boundary or overlap checks happen here; the driver only ever
    /// advances up to the time of the next unprocessed event.
    #[inline]
    pub fn advance(&mut self, dt: f64) {
        self.rx += self.vx * dt;
        self.ry += self.vy * dt;
    }

    /// Increment the collision counter (stales every outstanding prediction
    /// referencing this body).
    #[inline]
    pub fn bump_collisions(&mut self) {
        self.collisions = self.collisions.saturating_add(1);
    }

    /// Kinetic energy: 1/2 m |v|^2.
    #[inline]
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * (self.vx * self.vx + self.vy * self.vy)
    }

    /// Time until this body and `other` first touch, assuming both keep
    /// their current velocities. `f64::INFINITY` if they never do.
    pub fn predict_contact_time(&self, other: &Body) -> f64 {
        let drx = other.rx - self.rx;
        let dry = other.ry - self.ry;
        let dvx = other.vx - self.vx;
        let dvy = other.vy - self.vy;

        let dvdr = dvx * drx + dvy * dry;
        if dvdr >= 0.0 {
            // Separating or drifting in parallel
            return f64::INFINITY;
        }
        let dvdv = dvx * dvx + dvy * dvy;
        let drdr = drx * drx + dry * dry;
        let sigma = self.radius + other.radius;

        let d = dvdr * dvdr - dvdv * (drdr - sigma * sigma);
        if d < 0.0 {
            // Closest approach never comes within sigma
            return f64::INFINITY;
        }
        // Earlier quadratic root: first contact
        -(dvdr + d.sqrt()) / dvdv
    }

    /// Time until the body reaches the left or right wall, `f64::INFINITY`
    /// when it has no horizontal motion.
    pub fn predict_vertical_wall_time(&self) -> f64 {
        if self.vx > 0.0 {
            (1.0 - self.radius - self.rx) / self.vx
        } else if self.vx < 0.0 {
            (self.radius - self.rx) / self.vx
        } else {
            f64::INFINITY
        }
    }

    /// Time until the body reaches the floor or ceiling, `f64::INFINITY`
    /// when it has no vertical motion.
    pub fn predict_horizontal_wall_time(&self) -> f64 {
        if self.vy > 0.0 {
            (1.0 - self.radius - self.ry) / self.vy
        } else if self.vy < 0.0 {
            (self.radius - self.ry) / self.vy
        } else {
            f64::INFINITY
        }
    }

    /// Resolve an elastic collision with `other` at the moment of contact.
    ///
    /// The impulse acts along the line of centers; both collision counters
    /// increment. The caller only invokes this at a predicted contact time,
    /// so the bodies are touching and approaching.
    pub fn collide_with(&mut self, other: &mut Body) {
        let drx = other.rx - self.rx;
        let dry = other.ry - self.ry;
        let dvx = other.vx - self.vx;
        let dvy = other.vy - self.vy;
        let dvdr = dvx * drx + dvy * dry;
        let sigma = self.radius + other.radius;

        // Impulse magnitude, decomposed along the contact normal
        let j = 2.0 * self.mass * other.mass * dvdr / ((self.mass + other.mass) * sigma);
        let jx = j * drx / sigma;
        let jy = j * dry / sigma;

        self.vx += jx / self.mass;
        self.vy += jy / self.mass;
        other.vx -= jx / other.mass;
        other.vy -= jy / other.mass;

        self.bump_collisions();
        other.bump_collisions();
    }

    /// Reflect off the left or right wall.
    ///
    /// The x position is snapped to the exact contact plane rather than
    /// trusting further extrapolation, so boundary error cannot accumulate
    /// across repeated bounces.
    pub fn collide_with_vertical_wall(&mut self) {
        self.vx = -self.vx;
        self.rx = if self.vx > 0.0 {
            self.radius
        } else {
            1.0 - self.radius
        };
        self.bump_collisions();
    }

    /// Reflect off the floor or ceiling, snapping y to the contact plane.
    pub fn collide_with_horizontal_wall(&mut self) {
        self.vy = -self.vy;
        self.ry = if self.vy > 0.0 {
            self.radius
        } else {
            1.0 - self.radius
        };
        self.bump_collisions();
    }
}
