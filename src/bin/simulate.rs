//! Headless run of the deformation engine.
//! Steps every stage at 60 Hz under a swept openness and reports the shape
//! of the last frame, the packed upload size and the average cost of a frame.

use clap::Parser;
use std::process::ExitCode;
use std::time::{Duration, Instant};
use tidal_core::{GpuPoint, SimConfig, Stage, TidalError};
use tidal_physics::deformation::{as_bytes, rotate_about_y};
use tidal_sim::binary_system::BinaryState;
use tidal_sim::gesture::sweep_sample;

const DT: f64 = 1.0 / 60.0;

#[derive(Parser, Debug)]
#[command(name = "simulate")]
#[command(about = "Run the binary star engine without a window", long_about = None)]
struct Args {
    /// Frames to run per stage
    #[arg(default_value_t = 600, value_parser = clap::value_parser!(u32).range(1..))]
    frames: u32,

    /// Seed for the particle set
    #[arg(default_value_t = 42)]
    seed: u64,

    /// Only run this stage (separated, contact, merged, black-hole)
    #[arg(long, value_parser = parse_stage)]
    stage: Option<Stage>,
}

fn parse_stage(name: &str) -> Result<Stage, TidalError> {
    name.parse()
}

struct StageReport {
    min: [f32; 3],
    max: [f32; 3],
    mean_radius: f32,
    bytes_per_frame: usize,
    mean_frame: Duration,
}

/// Engine plus the packed point buffer it fills every frame
struct HeadlessRun {
    state: BinaryState,
    points: Vec<GpuPoint>,
    busy: Duration,
}

impl HeadlessRun {
    fn new(stage: Stage, seed: u64, particles: usize) -> Result<Self, TidalError> {
        let config = SimConfig {
            star_particle_count: particles,
            seed: Some(seed),
            initial_stage: stage,
            ..SimConfig::default()
        };
        let state = BinaryState::new(config)?;
        let points = Vec::with_capacity(state.engine.len());
        Ok(Self {
            state,
            points,
            busy: Duration::ZERO,
        })
    }

    /// Advance one frame and pack it for upload; returns the packed byte count
    fn step(&mut self, frame: u32) -> usize {
        let openness = sweep_sample((frame as f64 * DT) as f32).openness;
        let start = Instant::now();
        self.state.tick(DT, openness);
        self.state.engine.pack_points(&mut self.points);
        self.busy += start.elapsed();
        as_bytes(&self.points).len()
    }

    fn report(&self, frames: u32, bytes_per_frame: usize) -> StageReport {
        let angle = self.state.engine.system_angle();
        let mut min = [f32::INFINITY; 3];
        let mut max = [f32::NEG_INFINITY; 3];
        let mut radius_sum = 0.0f64;
        for point in &self.points {
            let world = rotate_about_y(point.position, angle);
            for axis in 0..3 {
                min[axis] = min[axis].min(world[axis]);
                max[axis] = max[axis].max(world[axis]);
            }
            let [x, y, z] = world;
            radius_sum += (x * x + y * y + z * z).sqrt() as f64;
        }

        StageReport {
            min,
            max,
            mean_radius: (radius_sum / self.points.len().max(1) as f64) as f32,
            bytes_per_frame,
            mean_frame: self.busy / frames,
        }
    }
}

fn run_stage(stage: Stage, args: &Args) -> Result<StageReport, TidalError> {
    let mut run = HeadlessRun::new(stage, args.seed, SimConfig::default().star_particle_count)?;
    let mut bytes = 0;
    for frame in 0..args.frames {
        bytes = run.step(frame);
    }
    Ok(run.report(args.frames, bytes))
}

fn main() -> ExitCode {
    let args = Args::parse();

    let stages: Vec<Stage> = match args.stage {
        Some(stage) => vec![stage],
        None => Stage::ALL.to_vec(),
    };

    println!(
        "VFTS 352 headless: {} frames per stage at 60 Hz, seed {}",
        args.frames, args.seed
    );
    println!();

    for stage in stages {
        let report = match run_stage(stage, &args) {
            Ok(report) => report,
            Err(e) => {
                eprintln!("{stage}: {e}");
                return ExitCode::FAILURE;
            }
        };
        println!("{stage}");
        println!(
            "  x [{:>6.2}, {:>6.2}]  y [{:>6.2}, {:>6.2}]  z [{:>6.2}, {:>6.2}]",
            report.min[0], report.max[0], report.min[1], report.max[1], report.min[2], report.max[2]
        );
        println!(
            "  mean radius {:.3} | {} KiB/frame | {:.3} ms/frame",
            report.mean_radius,
            report.bytes_per_frame / 1024,
            report.mean_frame.as_secs_f64() * 1000.0
        );
    }

    ExitCode::SUCCESS
}
