//! Per-frame particle transform for the binary system.
//!
//! Each frame the base sphere is re-mapped from scratch: two tidally locked
//! stars for the first three stages, a flat accretion disk for the black hole.
//! Nothing is integrated, so any frame can be computed from
//! `(stage, openness, elapsed)` alone.
//!
//! Invariant: the stars are never rotated individually. The tidal bulge must
//! always point along the fixed X axis toward the companion, so the only
//! rotation is the rigid whole-system spin reported as `system_angle`.

use std::f32::consts::TAU;
use tidal_core::*;

/// How particles are placed this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameMode {
    /// Two spheres on the X axis; `tidal` enables the inner-face pull
    TwinStars { tidal: bool },
    /// Differentially rotating disk around the collapsed remnant
    AccretionDisk,
}

impl FrameMode {
    pub fn for_stage(stage: Stage) -> Self {
        match stage {
            Stage::Separated | Stage::Merged => Self::TwinStars { tidal: false },
            Stage::Contact => Self::TwinStars { tidal: true },
            Stage::BlackHole => Self::AccretionDisk,
        }
    }
}

/// Everything the per-particle loop needs, resolved once per frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameScalars {
    pub mode: FrameMode,
    pub params: StageParameters,
    pub openness: f32,
    pub elapsed: f32,
    pub expansion: f32,
    pub turbulence: f32,
}

impl FrameScalars {
    pub fn resolve(stage: Stage, openness: f32, elapsed: f32) -> Self {
        Self {
            mode: FrameMode::for_stage(stage),
            params: stage.parameters(),
            openness,
            elapsed,
            expansion: expansion(openness),
            turbulence: turbulence(openness),
        }
    }

    /// Rigid spin of the whole point set about Y
    pub fn system_angle(&self) -> f32 {
        self.elapsed * self.params.rotation_speed
    }
}

/// Result of one frame. Borrowed from the engine; valid until the next frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameOutput<'a> {
    /// One position per particle, before the system rotation
    pub positions: &'a [[f32; 3]],
    /// Rotation about the vertical axis applied to the whole set
    pub system_angle: f32,
}

/// Owns the base particles and the reusable position buffer
pub struct DeformationEngine {
    particles: Vec<BaseParticle>,
    colors: Vec<[f32; 3]>,
    positions: Vec<[f32; 3]>,
    system_angle: f32,
}

impl DeformationEngine {
    pub fn new(particles: Vec<BaseParticle>) -> Result<Self, TidalError> {
        if particles.is_empty() {
            return Err(TidalError::EmptyParticleSet);
        }
        let colors = particles.iter().map(BaseParticle::color).collect();
        let positions = particles.iter().map(BaseParticle::base).collect();
        Ok(Self {
            particles,
            colors,
            positions,
            system_angle: 0.0,
        })
    }

    /// Recompute every particle position for this frame, in place.
    pub fn compute_frame(&mut self, stage: Stage, openness: f32, elapsed: f32) -> FrameOutput<'_> {
        let scalars = FrameScalars::resolve(stage, openness, elapsed);

        match scalars.mode {
            FrameMode::AccretionDisk => {
                for (out, p) in self.positions.iter_mut().zip(&self.particles) {
                    *out = disk_position(p, &scalars);
                }
            }
            FrameMode::TwinStars { tidal } => {
                for (out, p) in self.positions.iter_mut().zip(&self.particles) {
                    *out = star_position(p, &scalars, tidal);
                }
            }
        }

        self.system_angle = scalars.system_angle();
        FrameOutput {
            positions: &self.positions,
            system_angle: self.system_angle,
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[BaseParticle] {
        &self.particles
    }

    /// Positions from the last computed frame
    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    /// Static per-particle colors, parallel to `positions`
    pub fn colors(&self) -> &[[f32; 3]] {
        &self.colors
    }

    pub fn system_angle(&self) -> f32 {
        self.system_angle
    }

    /// Interleave positions and colors into `out`, reusing its allocation.
    pub fn pack_points(&self, out: &mut Vec<GpuPoint>) {
        out.clear();
        out.extend(
            self.positions
                .iter()
                .zip(&self.colors)
                .map(|(&position, &color)| GpuPoint { position, color }),
        );
    }
}

/// Raw bytes of a packed point buffer, ready for upload
pub fn as_bytes(points: &[GpuPoint]) -> &[u8] {
    bytemuck::cast_slice(points)
}

pub fn expansion(openness: f32) -> f32 {
    EXPANSION_BASE + openness * EXPANSION_GAIN
}

pub fn turbulence(openness: f32) -> f32 {
    TURBULENCE_BASE + openness * TURBULENCE_GAIN
}

/// Tidal pull strength for a base point: 1 on the inter-star axis, 0 beyond ~0.67 from it
pub fn pull_factor(base: [f32; 3]) -> f32 {
    let dist_from_axis = (base[1] * base[1] + base[2] * base[2]).sqrt();
    (1.0 - dist_from_axis * TIDAL_AXIS_FALLOFF).max(0.0)
}

/// X elongation of an inner-face particle
pub fn tidal_stretch(pull: f32, openness: f32) -> f32 {
    1.0 + pull * TIDAL_STRETCH_GAIN * openness
}

/// Accretion disk radius for a base-sphere radius in [0, 1]
pub fn disk_radius(raw_radius: f32) -> f32 {
    DISK_INNER_RADIUS + raw_radius * DISK_RADIAL_SPAN
}

/// Inner orbits turn faster
pub fn disk_angular_speed(rotation_speed: f32, disk_radius: f32) -> f32 {
    rotation_speed * DISK_ORBIT_GAIN / disk_radius
}

/// Rotate a point about the vertical axis (right-handed, Y up)
pub fn rotate_about_y(point: [f32; 3], angle: f32) -> [f32; 3] {
    let (sin, cos) = angle.sin_cos();
    [
        point[0] * cos + point[2] * sin,
        point[1],
        -point[0] * sin + point[2] * cos,
    ]
}

fn star_position(p: &BaseParticle, s: &FrameScalars, tidal: bool) -> [f32; 3] {
    let base = p.base();
    let body = p.body();
    let center_x = body.direction() * s.params.separation / 2.0;

    let scale = s.params.body_radius * s.expansion;
    let mut px = base[0] * scale;
    let mut py = base[1] * scale;
    let mut pz = base[2] * scale;

    if tidal && body.faces_companion(base[0]) {
        px *= tidal_stretch(pull_factor(base), s.openness);
        if px.abs() < NECK_HALF_WIDTH {
            py *= NECK_PINCH;
            pz *= NECK_PINCH;
        }
    }

    // Same offset on all three axes: the surface breathes rather than sparkles
    let noise = (s.elapsed * TURBULENCE_TIME_FREQ + p.phase() * TURBULENCE_PHASE_FREQ + px).sin()
        * s.turbulence;

    [center_x + px + noise, py + noise, pz + noise]
}

fn disk_position(p: &BaseParticle, s: &FrameScalars) -> [f32; 3] {
    let raw = p.radius();
    let radius = disk_radius(raw);
    let speed = disk_angular_speed(s.params.rotation_speed, radius);
    let angle = s.elapsed * speed + p.phase() * TAU;

    let orbit = [
        angle.cos() * radius * s.expansion,
        p.base()[1] * DISK_FLATTEN
            + (angle * 3.0 + s.elapsed * 2.0).sin() * DISK_WOBBLE * s.expansion,
        angle.sin() * radius * s.expansion,
    ];

    if raw < EVENT_HORIZON_RADIUS {
        event_horizon_funnel(orbit)
    } else {
        orbit
    }
}

/// Matter past the horizon threshold is squeezed inward and thrown vertically.
/// The hard cut at the threshold is a deliberate visual discontinuity.
fn event_horizon_funnel([x, y, z]: [f32; 3]) -> [f32; 3] {
    [x * HORIZON_SQUEEZE, y * HORIZON_LIFT, z * HORIZON_SQUEEZE]
}
