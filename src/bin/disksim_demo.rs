//! Terminal demo client: runs the simulation and renders each frame as an
//! ASCII grid.

use clap::Parser;
use disksim::{Canvas, SimConfig, Simulation};
use std::{thread, time::Duration};

#[derive(Parser, Debug)]
#[command(about = "Bouncing-disk simulation rendered in the terminal")]
struct Args {
    /// Number of bodies
    #[arg(short = 'n', long, default_value_t = 30)]
    count: usize,

    /// RNG seed for a reproducible run
    #[arg(short, long)]
    seed: Option<u64>,

    /// Simulated time to run for
    #[arg(short = 't', long, default_value_t = 20.0)]
    until: f64,

    /// Grid width and height in characters
    #[arg(long, default_value_t = 48)]
    grid: usize,
}

/// Renders bodies as characters on a square character grid.
struct TerminalCanvas {
    size: usize,
    cells: Vec<char>,
    frames: u64,
}

impl TerminalCanvas {
    fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![' '; size * size],
            frames: 0,
        }
    }
}

impl Canvas for TerminalCanvas {
    fn clear(&mut self) {
        self.cells.fill(' ');
    }

    fn draw_circle(&mut self, x: f64, y: f64, radius: f64) {
        let n = self.size as f64;
        let glyph = if radius > 0.03 { 'O' } else { 'o' };
        let col = (x * n) as usize;
        // Terminal rows grow downward
        let row = ((1.0 - y) * n) as usize;
        if row < self.size && col < self.size {
            self.cells[row * self.size + col] = glyph;
        }
    }

    fn show(&mut self, pause_millis: u64) {
        self.frames += 1;
        let border = "-".repeat(self.size + 2);
        let mut frame = String::with_capacity((self.size + 3) * (self.size + 2));
        frame.push_str(&border);
        frame.push('\n');
        for row in self.cells.chunks(self.size) {
            frame.push('|');
            frame.extend(row);
            frame.push_str("|\n");
        }
        frame.push_str(&border);
        // Home the cursor and repaint in place
        print!("\x1b[2J\x1b[H{frame}\n");
        thread::sleep(Duration::from_millis(pause_millis));
    }
}

fn main() -> disksim::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = SimConfig {
        count: args.count,
        seed: args.seed,
        ..SimConfig::default()
    };
    let mut sim = Simulation::new(&config)?;
    let mut canvas = TerminalCanvas::new(args.grid);
    sim.run_until(args.until, &mut canvas)?;

    println!(
        "rendered {} frames over {:.2} time units; final kinetic energy {:.6e}",
        canvas.frames,
        sim.time(),
        sim.kinetic_energy()
    );
    Ok(())
}
