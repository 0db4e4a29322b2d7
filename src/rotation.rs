use nalgebra::Matrix3;
use rand::Rng;
use std::f32::consts::PI;

/// Returns the Z-X-Z Euler rotation matrix for the given angles in radians.
/// Any orientation can be written as a rotation about z, then x, then z again.
pub fn mat3_zxz(angle1: f32, angle2: f32, angle3: f32) -> Matrix3<f32> {
    let (s1, c1) = angle1.sin_cos();
    let (s2, c2) = angle2.sin_cos();
    let (s3, c3) = angle3.sin_cos();
    Matrix3::new(
        c1 * c3 - c2 * s1 * s3,
        -c3 * s1 - c1 * c2 * s3,
        s2 * s3,
        c2 * c3 * s1 + c1 * s3,
        c1 * c2 * c3 - s1 * s3,
        -c3 * s2,
        s1 * s2,
        c1 * s2,
        c2,
    )
}

/// Per-render randomness: a mild tilt plus a small bulge factor.
///
/// The ranges are visual-tuning constants. They only need to keep the text
/// legible after the warp, so their exact bounds are not a contract.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderParams {
    pub angle1: f32,
    pub angle2: f32,
    pub angle3: f32,
    pub height_scale: f32,
}

impl RenderParams {
    pub fn sample<R: Rng>(rng: &mut R) -> Self {
        Self {
            angle1: PI / rng.random_range(5.0..=16.0),
            angle2: PI / rng.random_range(2.8..=3.2),
            angle3: 0.1,
            height_scale: 29.0 / 255.0 / rng.random_range(5.0..=20.0),
        }
    }

    pub fn matrix(&self) -> Matrix3<f32> {
        mat3_zxz(self.angle1, self.angle2, self.angle3)
    }
}

#[test]
fn test_zxz_orthonormal() {
    // rotation matrices invert by transpose
    let angles = [(0.5f32, 1.0f32, 0.1f32), (0.2, 3.0, 0.0), (-1.3, 0.7, 2.2)];
    for (a1, a2, a3) in angles {
        let r = mat3_zxz(a1, a2, a3);
        let v = nalgebra::Vector3::new(0.3f32, -1.2, 2.5);
        let w = r.transpose() * (r * v);
        assert!((w - v).norm() < 1.0e-5);
        assert!((r.determinant() - 1f32).abs() < 1.0e-5);
    }
}

#[test]
fn test_sample_ranges() {
    use rand::SeedableRng;
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(0);
    for _ in 0..100 {
        let p = RenderParams::sample(&mut rng);
        assert!(p.angle1 >= PI / 16f32 && p.angle1 <= PI / 5f32);
        assert!(p.angle2 >= PI / 3.2 && p.angle2 <= PI / 2.8);
        assert!(p.height_scale > 0f32 && p.height_scale <= 29.0 / 255.0 / 5.0);
        assert_eq!(p.angle3, 0.1);
    }
}

#[test]
fn test_sample_deterministic() {
    use rand::SeedableRng;
    let mut rng0 = rand_chacha::ChaCha8Rng::seed_from_u64(42);
    let mut rng1 = rand_chacha::ChaCha8Rng::seed_from_u64(42);
    assert_eq!(
        RenderParams::sample(&mut rng0),
        RenderParams::sample(&mut rng1)
    );
}
