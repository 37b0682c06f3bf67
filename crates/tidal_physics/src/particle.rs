use rand::Rng;
use std::f32::consts::TAU;
use tidal_core::{
    BaseParticle, TidalError, COLOR_RADIUS_WEIGHT, FIELD_DEPTH, FIELD_INNER_RADIUS,
    SHELL_INNER_RADIUS, SHELL_THRESHOLD,
};

/// Generate the seed particles shared by both stars.
///
/// 60% of the particles sit in a thin shell near the surface so the limb reads
/// clearly; the other 40% fill the volume uniformly. Colors blend from `inside`
/// to `outside` with radius plus a little jitter.
pub fn generate_star_particles(
    count: usize,
    inside: [f32; 3],
    outside: [f32; 3],
    rng: &mut impl Rng,
) -> Result<Vec<BaseParticle>, TidalError> {
    if count == 0 {
        return Err(TidalError::EmptyParticleSet);
    }

    let mut particles = Vec::with_capacity(count);
    for index in 0..count {
        let is_shell = rng.r#gen::<f32>() > SHELL_THRESHOLD;
        let r = if is_shell {
            SHELL_INNER_RADIUS + rng.r#gen::<f32>() * (1.0 - SHELL_INNER_RADIUS)
        } else {
            // cbrt of a uniform draw gives uniform density in volume
            rng.r#gen::<f32>().cbrt()
        };

        let theta = (2.0 * rng.r#gen::<f32>() - 1.0).acos();
        let phi = rng.r#gen::<f32>() * TAU;
        let base = [
            r * theta.sin() * phi.cos(),
            r * theta.sin() * phi.sin(),
            r * theta.cos(),
        ];

        let phase = rng.r#gen::<f32>();

        let mix = (r * COLOR_RADIUS_WEIGHT + rng.r#gen::<f32>() * (1.0 - COLOR_RADIUS_WEIGHT))
            .clamp(0.0, 1.0);
        let color = lerp_rgb(inside, outside, mix);

        particles.push(BaseParticle::new(index, base, phase, color));
    }

    Ok(particles)
}

/// Generate the distant background field: points on a thick shell far outside the stars
pub fn generate_field(count: usize, rng: &mut impl Rng) -> Result<Vec<[f32; 3]>, TidalError> {
    if count == 0 {
        return Err(TidalError::EmptyParticleSet);
    }

    let points = (0..count)
        .map(|_| {
            let r = FIELD_INNER_RADIUS + rng.r#gen::<f32>() * FIELD_DEPTH;
            let azimuth = rng.r#gen::<f32>() * TAU;
            let polar = (2.0 * rng.r#gen::<f32>() - 1.0).acos();
            [
                r * polar.sin() * azimuth.cos(),
                r * polar.sin() * azimuth.sin(),
                r * polar.cos(),
            ]
        })
        .collect();

    Ok(points)
}

fn lerp_rgb(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use tidal_core::Body;

    const INSIDE: [f32; 3] = [1.0, 1.0, 1.0];
    const OUTSIDE: [f32; 3] = [0.0, 0.0, 1.0];

    #[test]
    fn test_particles_inside_unit_sphere() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let particles = generate_star_particles(5_000, INSIDE, OUTSIDE, &mut rng).unwrap();
        assert_eq!(particles.len(), 5_000);
        for p in &particles {
            assert!(p.radius() <= 1.0 + 1e-5);
            assert!((0.0..1.0).contains(&p.phase()));
        }
    }

    #[test]
    fn test_shell_fraction() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let particles = generate_star_particles(20_000, INSIDE, OUTSIDE, &mut rng).unwrap();
        let shell = particles
            .iter()
            .filter(|p| p.radius() >= SHELL_INNER_RADIUS)
            .count() as f32
            / particles.len() as f32;
        // 60% shell draws plus the volume draws that land past 0.85 (1 - 0.85^3 ≈ 0.386 of 40%)
        assert!((shell - 0.754).abs() < 0.03, "shell fraction {shell}");
    }

    #[test]
    fn test_seeded_generation_is_deterministic() {
        let a = generate_star_particles(64, INSIDE, OUTSIDE, &mut ChaCha8Rng::seed_from_u64(9))
            .unwrap();
        let b = generate_star_particles(64, INSIDE, OUTSIDE, &mut ChaCha8Rng::seed_from_u64(9))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_body_tag_follows_parity() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let particles = generate_star_particles(10, INSIDE, OUTSIDE, &mut rng).unwrap();
        for (i, p) in particles.iter().enumerate() {
            let expected = if i % 2 == 0 { Body::A } else { Body::B };
            assert_eq!(p.body(), expected);
        }
    }

    #[test]
    fn test_colors_stay_between_endpoints() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let particles = generate_star_particles(1_000, INSIDE, OUTSIDE, &mut rng).unwrap();
        for p in &particles {
            let [r, g, b] = p.color();
            assert!((0.0..=1.0).contains(&r));
            assert!((r - g).abs() < 1e-6);
            assert!((b - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_empty_set_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        assert!(matches!(
            generate_star_particles(0, INSIDE, OUTSIDE, &mut rng),
            Err(TidalError::EmptyParticleSet)
        ));
        assert!(generate_field(0, &mut rng).is_err());
    }

    #[test]
    fn test_field_shell_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let field = generate_field(1_000, &mut rng).unwrap();
        for [x, y, z] in field {
            let r = (x * x + y * y + z * z).sqrt();
            assert!(r >= FIELD_INNER_RADIUS - 1e-3);
            assert!(r <= FIELD_INNER_RADIUS + FIELD_DEPTH + 1e-3);
        }
    }
}
