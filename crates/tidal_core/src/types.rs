use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::TidalError;

/// Evolutionary stage of the binary system.
/// Exactly one is active at a time; switching is instantaneous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Stage {
    /// Two detached stars orbiting each other
    #[default]
    Separated,
    /// Overcontact: the facing hemispheres are pulled into a shared neck
    Contact,
    /// Both bodies coincide at the origin
    Merged,
    /// Collapsed remnant with a flat accretion disk
    BlackHole,
}

impl Stage {
    /// All stages, in display order
    pub const ALL: [Stage; 4] = [
        Stage::Separated,
        Stage::Contact,
        Stage::Merged,
        Stage::BlackHole,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Separated => "Separated",
            Self::Contact => "Contact",
            Self::Merged => "Merged",
            Self::BlackHole => "Black Hole",
        }
    }

    /// Shape and spin parameters for this stage
    pub fn parameters(&self) -> StageParameters {
        match self {
            Self::Separated => StageParameters {
                separation: 2.8,
                body_radius: 1.2,
                rotation_speed: 0.5,
            },
            Self::Contact => StageParameters {
                separation: 1.6,
                body_radius: 1.3,
                rotation_speed: 0.8,
            },
            Self::Merged => StageParameters {
                separation: 0.0,
                body_radius: 2.2,
                rotation_speed: 0.5,
            },
            Self::BlackHole => StageParameters {
                separation: 0.0,
                body_radius: 4.0,
                rotation_speed: 2.0,
            },
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Stage {
    type Err = TidalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "separated" => Ok(Self::Separated),
            "contact" => Ok(Self::Contact),
            "merged" => Ok(Self::Merged),
            "blackhole" => Ok(Self::BlackHole),
            _ => Err(TidalError::UnknownStage(s.to_string())),
        }
    }
}

impl TryFrom<u8> for Stage {
    type Error = TidalError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| TidalError::UnknownStage(value.to_string()))
    }
}

/// Per-stage shape parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageParameters {
    /// Distance between the two star centers
    pub separation: f32,
    /// Radius of each star before openness expansion
    pub body_radius: f32,
    /// Whole-system spin rate about the vertical axis (rad/s)
    pub rotation_speed: f32,
}

/// Which of the two stars a particle belongs to.
/// Assigned once at generation time by index parity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Body {
    /// Even indices, centered on -X
    A,
    /// Odd indices, centered on +X
    B,
}

impl Body {
    pub fn from_index(index: usize) -> Self {
        if index % 2 == 0 { Self::A } else { Self::B }
    }

    /// Sign of this star's center along X
    pub fn direction(&self) -> f32 {
        match self {
            Self::A => -1.0,
            Self::B => 1.0,
        }
    }

    /// Whether a base X coordinate lies on the hemisphere facing the companion
    pub fn faces_companion(&self, base_x: f32) -> bool {
        match self {
            Self::A => base_x > 0.0,
            Self::B => base_x < 0.0,
        }
    }
}

/// Immutable seed data for one particle slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseParticle {
    base: [f32; 3],
    phase: f32,
    color: [f32; 3],
    body: Body,
}

impl BaseParticle {
    /// Build the particle for slot `index`; the body tag follows index parity.
    pub fn new(index: usize, base: [f32; 3], phase: f32, color: [f32; 3]) -> Self {
        Self {
            base,
            phase,
            color,
            body: Body::from_index(index),
        }
    }

    /// Point on or within the unit sphere
    pub fn base(&self) -> [f32; 3] {
        self.base
    }

    /// Random phase in [0, 1)
    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn color(&self) -> [f32; 3] {
        self.color
    }

    pub fn body(&self) -> Body {
        self.body
    }

    /// Distance of the base point from the origin
    pub fn radius(&self) -> f32 {
        let [x, y, z] = self.base;
        (x * x + y * y + z * z).sqrt()
    }
}

/// Interleaved position + color record for raw buffer upload.
/// Must be repr(C) and Pod so a slice can be cast to bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GpuPoint {
    /// World-space position before the system rotation
    pub position: [f32; 3],
    /// sRGB, as configured
    pub color: [f32; 3],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_table() {
        let sep = Stage::Separated.parameters();
        assert_eq!((sep.separation, sep.body_radius, sep.rotation_speed), (2.8, 1.2, 0.5));
        let contact = Stage::Contact.parameters();
        assert_eq!((contact.separation, contact.body_radius, contact.rotation_speed), (1.6, 1.3, 0.8));
        let merged = Stage::Merged.parameters();
        assert_eq!((merged.separation, merged.body_radius, merged.rotation_speed), (0.0, 2.2, 0.5));
        let hole = Stage::BlackHole.parameters();
        assert_eq!((hole.separation, hole.body_radius, hole.rotation_speed), (0.0, 4.0, 2.0));
    }

    #[test]
    fn test_stage_parsing() {
        assert_eq!("separated".parse::<Stage>().unwrap(), Stage::Separated);
        assert_eq!("Contact".parse::<Stage>().unwrap(), Stage::Contact);
        assert_eq!("Black Hole".parse::<Stage>().unwrap(), Stage::BlackHole);
        assert_eq!("black-hole".parse::<Stage>().unwrap(), Stage::BlackHole);
        assert_eq!("black_hole".parse::<Stage>().unwrap(), Stage::BlackHole);
        assert!(matches!(
            "supernova".parse::<Stage>(),
            Err(TidalError::UnknownStage(s)) if s == "supernova"
        ));
    }

    #[test]
    fn test_stage_from_index_fails_fast() {
        assert_eq!(Stage::try_from(0u8).unwrap(), Stage::Separated);
        assert_eq!(Stage::try_from(3u8).unwrap(), Stage::BlackHole);
        assert!(Stage::try_from(4u8).is_err());
    }

    #[test]
    fn test_body_parity_and_facing() {
        assert_eq!(Body::from_index(0), Body::A);
        assert_eq!(Body::from_index(7), Body::B);
        assert!(Body::A.faces_companion(0.3));
        assert!(!Body::A.faces_companion(-0.3));
        assert!(Body::B.faces_companion(-0.3));
        assert!(!Body::B.faces_companion(0.0));
    }
}
