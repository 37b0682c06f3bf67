// Deformation constants (render units; the unit sphere is one stellar radius)
// Openness drives two blends: body inflation and surface flicker.

/// Body scale multiplier at openness 0
pub const EXPANSION_BASE: f32 = 0.8;
/// Extra body scale gained at openness 1
pub const EXPANSION_GAIN: f32 = 0.4;

/// Flicker amplitude at openness 0
pub const TURBULENCE_BASE: f32 = 0.05;
/// Extra flicker amplitude gained at openness 1
pub const TURBULENCE_GAIN: f32 = 0.15;
/// Temporal frequency of the surface flicker
pub const TURBULENCE_TIME_FREQ: f32 = 3.0;
/// How strongly the per-particle phase scatters the flicker
pub const TURBULENCE_PHASE_FREQ: f32 = 20.0;

/// Fall-off of the tidal pull with distance from the inter-star axis.
/// Pull vanishes beyond 1/1.5 ≈ 0.67.
pub const TIDAL_AXIS_FALLOFF: f32 = 1.5;
/// Maximum elongation of the inner face at full openness
pub const TIDAL_STRETCH_GAIN: f32 = 0.8;
/// Particles closer than this to their star center (on X) form the neck
pub const NECK_HALF_WIDTH: f32 = 0.5;
/// Y/Z contraction applied to neck particles
pub const NECK_PINCH: f32 = 0.8;

/// Inner edge of the accretion disk
pub const DISK_INNER_RADIUS: f32 = 1.2;
/// Disk width spanned by base radii 0..1
pub const DISK_RADIAL_SPAN: f32 = 3.5;
/// Orbital speed numerator, multiplied by the stage rotation speed
pub const DISK_ORBIT_GAIN: f32 = 5.0;
/// Disk thickness kept from the base sphere's Y
pub const DISK_FLATTEN: f32 = 0.1;
/// Vertical wobble amplitude
pub const DISK_WOBBLE: f32 = 0.1;
/// Base radius under which particles fall into the event horizon
pub const EVENT_HORIZON_RADIUS: f32 = 0.2;
/// Vertical amplification for horizon particles
pub const HORIZON_LIFT: f32 = 5.0;
/// Planar contraction for horizon particles
pub const HORIZON_SQUEEZE: f32 = 0.2;

// Base particle distribution

/// Probability threshold: a uniform draw above this lands on the shell
pub const SHELL_THRESHOLD: f32 = 0.4;
/// Inner radius of the surface shell
pub const SHELL_INNER_RADIUS: f32 = 0.85;
/// Color mix weight carried by radius (the rest is jitter)
pub const COLOR_RADIUS_WEIGHT: f32 = 0.8;

// Background field

/// Inner radius of the distant field shell
pub const FIELD_INNER_RADIUS: f32 = 20.0;
/// Thickness of the field shell
pub const FIELD_DEPTH: f32 = 30.0;
/// Field spin rate about Y (rad/s)
pub const FIELD_SPIN_Y: f32 = 0.05;
/// Field spin rate about X (rad/s)
pub const FIELD_SPIN_X: f32 = 0.02;

// Camera framing

/// Camera target for every stage except the black hole (three-quarter view)
pub const CAMERA_ORBIT_VIEW: [f32; 3] = [0.0, 2.0, 8.0];
/// Camera target for the black hole (near top-down; Z offset keeps the up vector valid)
pub const CAMERA_TOP_VIEW: [f32; 3] = [0.0, 10.0, 0.1];
