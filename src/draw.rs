//! Drawing collaborator surface.
//!
//! Rendering is external to the core: on each frame event the driver calls
//! exactly `clear`, then `draw_circle` once per body, then `show`.

/// A surface the simulation renders frames onto.
pub trait Canvas {
    /// Erase the previous frame.
    fn clear(&mut self);

    /// Draw one body as a circle centered at (`x`, `y`).
    fn draw_circle(&mut self, x: f64, y: f64, radius: f64);

    /// Present the frame, pausing for `pause_millis` milliseconds.
    fn show(&mut self, pause_millis: u64);
}

/// Canvas that ignores every call; for headless runs and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCanvas;

impl Canvas for NullCanvas {
    fn clear(&mut self) {}
    fn draw_circle(&mut self, _x: f64, _y: f64, _radius: f64) {}
    fn show(&mut self, _pause_millis: u64) {}
}
