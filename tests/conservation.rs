use disksim::{Body, NullCanvas, SimConfig, Simulation};
use proptest::prelude::*;

/// Elastic pair response: total momentum and kinetic energy are unchanged,
/// within a tight floating-point tolerance.
#[test]
fn pair_collision_conserves_momentum_and_energy() -> disksim::Result<()> {
    // Touching disks at a 3-4-5 offset, unequal masses, oblique approach
    let mut a = Body::new(0.40, 0.50, 0.03, -0.01, 0.05, 60.0)?;
    let mut b = Body::new(0.48, 0.56, -0.05, -0.04, 0.05, 35.0)?;

    let px = a.mass * a.vx + b.mass * b.vx;
    let py = a.mass * a.vy + b.mass * b.vy;
    let ke = a.kinetic_energy() + b.kinetic_energy();

    a.collide_with(&mut b);

    let px1 = a.mass * a.vx + b.mass * b.vx;
    let py1 = a.mass * a.vy + b.mass * b.vy;
    let ke1 = a.kinetic_energy() + b.kinetic_energy();

    assert!((px1 - px).abs() <= 1e-9 * px.abs().max(1.0), "px {px} -> {px1}");
    assert!((py1 - py).abs() <= 1e-9 * py.abs().max(1.0), "py {py} -> {py1}");
    assert!(
        ((ke1 - ke) / ke).abs() <= 1e-9,
        "kinetic energy drifted: {ke} -> {ke1}"
    );
    assert_eq!(a.collisions, 1);
    assert_eq!(b.collisions, 1);
    Ok(())
}

proptest! {
    /// The impulse response at the moment of contact is elastic for
    /// arbitrary masses, radii, and velocities: momentum and kinetic energy
    /// both survive the exchange.
    #[test]
    fn contact_response_is_elastic(
        theta in 0.0..std::f64::consts::TAU,
        r1 in 0.01..0.05f64,
        r2 in 0.01..0.05f64,
        m1 in 0.5..50.0f64,
        m2 in 0.5..50.0f64,
        v1x in -0.1..0.1f64,
        v1y in -0.1..0.1f64,
        v2x in -0.1..0.1f64,
        v2y in -0.1..0.1f64,
    ) {
        // Place the second body exactly at contact distance
        let sigma = r1 + r2;
        let mut a = Body::new(0.5, 0.5, v1x, v1y, r1, m1).unwrap();
        let mut b = Body::new(
            0.5 + sigma * theta.cos(),
            0.5 + sigma * theta.sin(),
            v2x,
            v2y,
            r2,
            m2,
        )
        .unwrap();

        let px = a.mass * a.vx + b.mass * b.vx;
        let py = a.mass * a.vy + b.mass * b.vy;
        let ke = a.kinetic_energy() + b.kinetic_energy();

        a.collide_with(&mut b);

        let px1 = a.mass * a.vx + b.mass * b.vx;
        let py1 = a.mass * a.vy + b.mass * b.vy;
        let ke1 = a.kinetic_energy() + b.kinetic_energy();

        prop_assert!((px1 - px).abs() <= 1e-9 * px.abs().max(1.0));
        prop_assert!((py1 - py).abs() <= 1e-9 * py.abs().max(1.0));
        prop_assert!((ke1 - ke).abs() <= 1e-9 * ke.max(1e-12));
    }
}

/// Total kinetic energy is invariant across a long run: pair responses are
/// elastic and wall bounces only flip one velocity component.
#[test]
fn kinetic_energy_invariant_over_run() -> disksim::Result<()> {
    let config = SimConfig {
        count: 40,
        seed: Some(12345),
        ..SimConfig::default()
    };
    let mut sim = Simulation::new(&config)?;
    let e0 = sim.kinetic_energy();

    let t_end = 50.0;
    let steps = 100;
    for s in 1..=steps {
        sim.run_until(t_end * f64::from(s) / f64::from(steps), &mut NullCanvas)?;
    }

    let e1 = sim.kinetic_energy();
    let rel = ((e1 - e0) / e0).abs();
    assert!(
        rel < 1e-9,
        "relative energy drift {rel} too large (E0={e0}, E1={e1})"
    );
    Ok(())
}
