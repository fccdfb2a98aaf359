use crate::core::body::Body;
use crate::core::event::{Event, EventKind};
use crate::draw::Canvas;
use crate::error::{Error, Result};
use log::{debug, info, trace};
use rand::{Rng, SeedableRng, rng, rngs::StdRng};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Construction parameters for a randomized simulation.
///
/// Bodies are sampled uniformly: radius from `radius_range`, each velocity
/// component with a magnitude from `speed_range` and a random sign, and a
/// position anywhere in the unit square that keeps the whole disk inside the
/// walls. Mass is derived as `radius * mass_scale`.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of bodies (> 0).
    pub count: usize,
    /// Uniform sampling range for body radii.
    pub radius_range: (f64, f64),
    /// Uniform sampling range for each velocity component's magnitude.
    pub speed_range: (f64, f64),
    /// Mass per unit radius.
    pub mass_scale: f64,
    /// Simulated-time interval between frames.
    pub redraw_interval: f64,
    /// Pause handed to `Canvas::show` on each frame, in milliseconds.
    pub show_pause_ms: u64,
    /// RNG seed for reproducibility; `None` for a nondeterministic run.
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            count: 50,
            radius_range: (0.007, 0.05),
            speed_range: (0.0, 0.07),
            mass_scale: 1000.0,
            redraw_interval: 0.07,
            show_pause_ms: 5,
            seed: None,
        }
    }
}

impl SimConfig {
    fn validate(&self) -> Result<()> {
        if self.count == 0 {
            return Err(Error::InvalidParam("count must be > 0".into()));
        }
        let (r_lo, r_hi) = self.radius_range;
        if !(r_lo.is_finite() && r_hi.is_finite()) || r_lo <= 0.0 || r_lo > r_hi {
            return Err(Error::InvalidParam(
                "radius_range must be finite with 0 < lo <= hi".into(),
            ));
        }
        if 2.0 * r_hi > 1.0 {
            return Err(Error::InvalidParam(
                "radius_range must leave room inside the unit square".into(),
            ));
        }
        let (s_lo, s_hi) = self.speed_range;
        if !(s_lo.is_finite() && s_hi.is_finite()) || s_lo < 0.0 || s_lo > s_hi {
            return Err(Error::InvalidParam(
                "speed_range must be finite with 0 <= lo <= hi".into(),
            ));
        }
        if !self.mass_scale.is_finite() || self.mass_scale <= 0.0 {
            return Err(Error::InvalidParam(
                "mass_scale must be finite and > 0".into(),
            ));
        }
        if !self.redraw_interval.is_finite() || self.redraw_interval <= 0.0 {
            return Err(Error::InvalidParam(
                "redraw_interval must be finite and > 0".into(),
            ));
        }
        Ok(())
    }
}

/// Event-driven simulation of elastic disks in the unit square.
///
/// Owns the global clock, the body arena, and a min-priority schedule of
/// predicted events. Stale predictions are filtered lazily when popped, never
/// removed eagerly.
#[derive(Debug)]
pub struct Simulation {
    clock: f64,
    bodies: Vec<Body>,
    schedule: BinaryHeap<Reverse<Event>>,
    redraw_interval: f64,
    show_pause_ms: u64,
}

impl Simulation {
    /// Create a simulation with `config.count` randomly sampled bodies.
    ///
    /// Positions are rejection-sampled so no two bodies start overlapping.
    pub fn new(config: &SimConfig) -> Result<Self> {
        config.validate()?;

        let mut rng: StdRng = match config.seed {
            Some(s) => SeedableRng::seed_from_u64(s),
            None => SeedableRng::seed_from_u64(rng().random()),
        };

        let (r_lo, r_hi) = config.radius_range;
        let (s_lo, s_hi) = config.speed_range;
        let mut bodies: Vec<Body> = Vec::with_capacity(config.count);
        let max_attempts = 1_000_000usize;
        for id in 0..config.count {
            let mut attempts = 0usize;
            let (rx, ry, radius) = loop {
                if attempts >= max_attempts {
                    return Err(Error::InvalidParam(format!(
                        "failed to place body {id} without overlap; try fewer bodies or smaller radii"
                    )));
                }
                attempts += 1;
                let radius = rng.random_range(r_lo..=r_hi);
                let rx = rng.random_range(radius..=1.0 - radius);
                let ry = rng.random_range(radius..=1.0 - radius);
                if !overlaps_existing(&bodies, rx, ry, radius) {
                    break (rx, ry, radius);
                }
            };
            let vx = rng.random_range(s_lo..=s_hi) * random_sign(&mut rng);
            let vy = rng.random_range(s_lo..=s_hi) * random_sign(&mut rng);
            bodies.push(Body::new(rx, ry, vx, vy, radius, radius * config.mass_scale)?);
        }

        info!(
            "created simulation with {} bodies (seed {:?})",
            bodies.len(),
            config.seed
        );
        Self::from_bodies(bodies, config)
    }

    /// Create a simulation from explicit bodies (count, ranges, and seed in
    /// `config` are ignored; the redraw cadence is taken from it).
    ///
    /// Every body must fit inside the unit square. Callers are responsible
    /// for non-overlapping placement.
    pub fn from_bodies(bodies: Vec<Body>, config: &SimConfig) -> Result<Self> {
        if bodies.is_empty() {
            return Err(Error::InvalidParam("at least one body is required".into()));
        }
        if !config.redraw_interval.is_finite() || config.redraw_interval <= 0.0 {
            return Err(Error::InvalidParam(
                "redraw_interval must be finite and > 0".into(),
            ));
        }
        for (i, b) in bodies.iter().enumerate() {
            if b.rx < b.radius || b.rx > 1.0 - b.radius || b.ry < b.radius || b.ry > 1.0 - b.radius
            {
                return Err(Error::InvalidParam(format!(
                    "body {i} does not fit inside the unit square"
                )));
            }
        }

        let mut sim = Self {
            clock: 0.0,
            bodies,
            schedule: BinaryHeap::new(),
            redraw_interval: config.redraw_interval,
            show_pause_ms: config.show_pause_ms,
        };
        sim.seed_schedule()?;
        Ok(sim)
    }

    /// Current simulation time.
    pub fn time(&self) -> f64 {
        self.clock
    }

    /// Number of bodies.
    pub fn num_bodies(&self) -> usize {
        self.bodies.len()
    }

    /// The body arena.
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Mutable access to the body arena. After editing positions or
    /// velocities, call [`Simulation::rebuild_schedule`] so predictions match
    /// the new state.
    pub fn bodies_mut(&mut self) -> &mut [Body] {
        &mut self.bodies
    }

    /// Total kinetic energy (diagnostic; invariant across elastic events).
    pub fn kinetic_energy(&self) -> f64 {
        self.bodies.iter().map(|b| b.kinetic_energy()).sum()
    }

    /// Throw away every prediction and reseed from the current body states.
    pub fn rebuild_schedule(&mut self) -> Result<()> {
        self.schedule.clear();
        self.seed_schedule()
    }

    /// Process the next valid event: advance every body to its time, apply
    /// its effect, and enqueue fresh predictions for whatever it touched.
    ///
    /// Stale entries popped along the way are discarded with no effect.
    /// Returns the event acted upon, or `None` once the schedule is empty
    /// (unreachable in normal operation, since every frame re-arms the next).
    pub fn step<C: Canvas>(&mut self, canvas: &mut C) -> Result<Option<Event>> {
        while let Some(Reverse(event)) = self.schedule.pop() {
            if !event.is_valid(&self.bodies) {
                trace!("discarding stale event {:?}", event.kind);
                continue;
            }
            self.dispatch(event, canvas)?;
            return Ok(Some(event));
        }
        Ok(None)
    }

    /// Run the event loop until `stop` returns true.
    ///
    /// The flag is consulted between iterations only; an event in flight is
    /// always finished. Returns normally if the schedule ever drains.
    pub fn run<C: Canvas>(&mut self, canvas: &mut C, mut stop: impl FnMut() -> bool) -> Result<()> {
        while !stop() {
            if self.step(canvas)?.is_none() {
                break;
            }
        }
        Ok(())
    }

    /// Process every event up to `target_time`, then drift all bodies to
    /// exactly that time. An event past the target stays scheduled for later
    /// calls.
    pub fn run_until<C: Canvas>(&mut self, target_time: f64, canvas: &mut C) -> Result<()> {
        if !target_time.is_finite() {
            return Err(Error::InvalidParam("target_time must be finite".into()));
        }
        if target_time < self.clock {
            return Err(Error::InvalidParam(
                "target_time cannot be earlier than the current clock".into(),
            ));
        }

        while let Some(Reverse(event)) = self.schedule.pop() {
            if event.time_f64() > target_time {
                // Put the event back for future calls
                self.schedule.push(Reverse(event));
                break;
            }
            if !event.is_valid(&self.bodies) {
                trace!("discarding stale event {:?}", event.kind);
                continue;
            }
            self.dispatch(event, canvas)?;
        }

        let dt = target_time - self.clock;
        for body in &mut self.bodies {
            body.advance(dt);
        }
        self.clock = target_time;
        Ok(())
    }

    // ============ Internal helpers ============

    /// Apply one valid event: lockstep-advance every body (not just the
    /// participants) to the event time, so all stored positions agree with
    /// the clock at the instant of dispatch, then resolve and re-predict.
    fn dispatch<C: Canvas>(&mut self, event: Event, canvas: &mut C) -> Result<()> {
        let dt = event.time_f64() - self.clock;
        for body in &mut self.bodies {
            body.advance(dt);
        }
        self.clock = event.time_f64();

        match event.kind {
            EventKind::Pair { a, b } => {
                let (first, second) = pair_mut(&mut self.bodies, a, b);
                first.collide_with(second);
                self.repredict(a)?;
                self.repredict(b)?;
            }
            EventKind::VerticalWall { a } => {
                self.bodies[a].collide_with_vertical_wall();
                self.repredict(a)?;
            }
            EventKind::HorizontalWall { b } => {
                self.bodies[b].collide_with_horizontal_wall();
                self.repredict(b)?;
            }
            EventKind::Redraw => {
                canvas.clear();
                for body in &self.bodies {
                    canvas.draw_circle(body.rx, body.ry, body.radius);
                }
                canvas.show(self.show_pause_ms);
                let next_frame = Event::redraw(self.clock + self.redraw_interval)?;
                self.schedule.push(Reverse(next_frame));
            }
        }
        Ok(())
    }

    /// Predict and enqueue every wall and pairwise event, then arm the first
    /// frame at the current clock.
    fn seed_schedule(&mut self) -> Result<()> {
        let n = self.bodies.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let t = self.bodies[i].predict_contact_time(&self.bodies[j]);
                if t.is_finite() {
                    let ev = Event::pair(self.clock + t, i, j, &self.bodies)?;
                    self.schedule.push(Reverse(ev));
                }
            }
        }
        for i in 0..n {
            self.predict_walls(i)?;
        }
        self.schedule.push(Reverse(Event::redraw(self.clock)?));
        debug!(
            "seeded schedule with {} events for {} bodies",
            self.schedule.len(),
            n
        );
        Ok(())
    }

    fn predict_walls(&mut self, i: usize) -> Result<()> {
        let t = self.bodies[i].predict_vertical_wall_time();
        if t.is_finite() {
            let ev = Event::vertical_wall(self.clock + t, i, &self.bodies)?;
            self.schedule.push(Reverse(ev));
        }
        let t = self.bodies[i].predict_horizontal_wall_time();
        if t.is_finite() {
            let ev = Event::horizontal_wall(self.clock + t, i, &self.bodies)?;
            self.schedule.push(Reverse(ev));
        }
        Ok(())
    }

    /// Re-predict everything involving body `i` after one of its collisions:
    /// both wall times plus a pairwise prediction against every other body.
    fn repredict(&mut self, i: usize) -> Result<()> {
        self.predict_walls(i)?;
        for j in 0..self.bodies.len() {
            if j == i {
                continue;
            }
            let (a, b) = if i < j { (i, j) } else { (j, i) };
            let t = self.bodies[a].predict_contact_time(&self.bodies[b]);
            if t.is_finite() {
                let ev = Event::pair(self.clock + t, a, b, &self.bodies)?;
                self.schedule.push(Reverse(ev));
            }
        }
        Ok(())
    }
}

// ============ Utility helpers ============

/// Split the arena into simultaneous mutable borrows of bodies `a` and `b`.
/// Pair events always carry `a < b`.
fn pair_mut(bodies: &mut [Body], a: usize, b: usize) -> (&mut Body, &mut Body) {
    debug_assert!(a < b);
    let (head, tail) = bodies.split_at_mut(b);
    (&mut head[a], &mut tail[0])
}

fn random_sign(rng: &mut StdRng) -> f64 {
    if rng.random::<bool>() { 1.0 } else { -1.0 }
}

fn overlaps_existing(existing: &[Body], rx: f64, ry: f64, radius: f64) -> bool {
    existing.iter().any(|b| {
        let dx = b.rx - rx;
        let dy = b.ry - ry;
        let min = b.radius + radius;
        dx * dx + dy * dy < min * min
    })
}
