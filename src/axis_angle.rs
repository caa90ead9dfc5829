//! Axis-angle (Rodrigues) rotation helpers.
//!
//! A rotation vector `r` encodes a rotation of `‖r‖` radians about the unit axis `r / ‖r‖`. The
//! same rotation has many rotation vectors (any angle plus a multiple of a full turn, and at
//! exactly half a turn both `r` and `-r`), so this module also provides [`canonicalize`] and
//! [`keep_north`] to pick one representative.

use crate::error::FormatError;
use crate::util::BoundedAngle;
use crate::Vector3;
use std::f64::consts::PI;

#[cfg(feature = "random")]
use rand::Rng;
#[cfg(feature = "random")]
use rand_distr::StandardNormal;
#[cfg(feature = "random")]
use uom::si::{angle::radian, f64::Angle};

/// How far a norm may be from π, or a component from zero, and still count as exact. Scaled to
/// π's magnitude, since norms of half-turn vectors rarely round to π itself.
const HALF_TURN_TOLERANCE: f64 = 8. * f64::EPSILON * PI;

/// Norms below this are treated as zero when normalizing sampled axes.
#[cfg(feature = "random")]
const MIN_AXIS_NORM: f64 = 1e-8;

/// Rotates `point` by the rotation vector `r`.
///
/// Fails if `r` does not have exactly three components.
///
/// See <https://en.wikipedia.org/wiki/Axis%E2%80%93angle_representation#Rotating_a_vector>.
pub fn rotate(point: Vector3, r: &[f64]) -> Result<Vector3, FormatError> {
    let r = rotation_vector(r)?;
    Ok(rodrigues(&point, &r))
}

/// Rotates every point in `points` by the rotation vector `r`.
///
/// Fails if `r` does not have exactly three components.
pub fn rotate_all(points: &[Vector3], r: &[f64]) -> Result<Vec<Vector3>, FormatError> {
    let r = rotation_vector(r)?;
    Ok(points.iter().map(|p| rodrigues(p, &r)).collect())
}

fn rotation_vector(r: &[f64]) -> Result<Vector3, FormatError> {
    match *r {
        [x, y, z] => Ok(Vector3::new(x, y, z)),
        _ => Err(FormatError::Arity {
            field: "rotation",
            expected: 3,
            found: r.len(),
        }),
    }
}

fn rodrigues(v: &Vector3, r: &Vector3) -> Vector3 {
    let theta = r.norm();
    if theta == 0. {
        return *v;
    }
    let k = r / theta;
    let (s, c) = theta.sin_cos();
    c * v + s * k.cross(v) + (1. - c) * k.dot(v) * k
}

/// Picks a single representative for rotation vectors of exactly half a turn.
///
/// `r` and `-r` describe the same rotation when `‖r‖ = π`. This flips the sign so that the first
/// non-zero component (in x, y, z order) is positive. Both the norm and the components are
/// compared with a tolerance scaled to π. Any other rotation vector is returned
/// unchanged.
///
/// See <https://courses.cs.duke.edu/fall13/compsci527/notes/rodrigues.pdf>.
#[must_use]
pub fn keep_north(r: Vector3) -> Vector3 {
    let theta = r.norm();
    let eps = HALF_TURN_TOLERANCE;
    if (theta - PI).abs() > eps {
        return r;
    }
    // the first component that is not zero within tolerance decides the sign
    match [r.x, r.y, r.z].into_iter().find(|c| c.abs() > eps) {
        Some(c) if c < 0. => -r,
        _ => r,
    }
}

/// Rewrites `r` so that its angle lies in [0, π], then applies [`keep_north`].
///
/// Angles past half a turn are expressed as the shorter rotation about the opposite axis.
#[must_use]
pub fn canonicalize(r: Vector3) -> Vector3 {
    let theta = r.norm();
    if theta == 0. {
        return r;
    }
    // in [-π, π); a negative value means the axis has to be flipped
    let wrapped = BoundedAngle::from_radians(theta).to_signed_range();
    let r = if wrapped == theta {
        r
    } else {
        r * (wrapped / theta)
    };
    keep_north(r)
}

/// Samples a random rotation vector.
///
/// The axis is drawn uniformly from the directions with non-negative z (the "northern"
/// hemisphere) and the angle uniformly from `[0, max_angle)`.
#[cfg(feature = "random")]
pub fn random_rotation_vector<R>(rng: &mut R, max_angle: Angle) -> Vector3
where
    R: Rng + ?Sized,
{
    // an isotropic Gaussian gives uniformly distributed directions once normalized
    let (axis, norm) = loop {
        let mut axis = Vector3::new(
            rng.sample(StandardNormal),
            rng.sample(StandardNormal),
            rng.sample(StandardNormal),
        );
        axis.z = axis.z.abs();
        let norm = axis.norm();
        if norm > MIN_AXIS_NORM {
            break (axis, norm);
        }
    };
    let angle = max_angle.get::<radian>() * rng.gen::<f64>();
    axis * (angle / norm)
}

/// Samples `n` random rotation vectors; see [`random_rotation_vector`].
#[cfg(feature = "random")]
pub fn random_rotation_vectors<R>(rng: &mut R, n: usize, max_angle: Angle) -> Vec<Vector3>
where
    R: Rng + ?Sized,
{
    (0..n)
        .map(|_| random_rotation_vector(rng, max_angle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::UnitQuaternion;
    use rstest::rstest;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[rstest]
    #[case([0., 0., FRAC_PI_2], Vector3::new(1., 0., 0.), Vector3::new(0., 1., 0.))]
    #[case([0., 0., PI], Vector3::new(1., 0., 0.), Vector3::new(-1., 0., 0.))]
    #[case([FRAC_PI_2, 0., 0.], Vector3::new(0., 1., 0.), Vector3::new(0., 0., 1.))]
    #[case([0., -FRAC_PI_2, 0.], Vector3::new(1., 0., 0.), Vector3::new(0., 0., 1.))]
    #[case([0., 0., 0.], Vector3::new(1., 2., 3.), Vector3::new(1., 2., 3.))]
    fn rotate_known_cases(#[case] r: [f64; 3], #[case] v: Vector3, #[case] expected: Vector3) {
        let rotated = rotate(v, &r).unwrap();
        assert_relative_eq!(rotated, expected, epsilon = 1e-12);
    }

    #[rstest]
    #[case(&[])]
    #[case(&[1., 2.])]
    #[case(&[1., 2., 3., 4.])]
    fn rotate_rejects_wrong_arity(#[case] r: &[f64]) {
        assert_eq!(
            rotate(Vector3::x(), r),
            Err(FormatError::Arity {
                field: "rotation",
                expected: 3,
                found: r.len(),
            })
        );
    }

    #[test]
    fn rotate_all_matches_nalgebra() {
        let r = [0.3, -1.2, 0.7];
        let q = UnitQuaternion::from_scaled_axis(Vector3::new(r[0], r[1], r[2]));
        let points = [
            Vector3::new(1., 0., 0.),
            Vector3::new(0., -2., 5.),
            Vector3::new(0.1, 0.2, 0.3),
        ];
        let rotated = rotate_all(&points, &r).unwrap();
        assert_eq!(rotated.len(), points.len());
        for (p, rp) in points.iter().zip(&rotated) {
            assert_relative_eq!(*rp, q * p, epsilon = 1e-12);
        }
    }

    #[rstest]
    #[case(Vector3::new(-PI, 0., 0.), Vector3::new(PI, 0., 0.))]
    #[case(Vector3::new(0., -PI, 0.), Vector3::new(0., PI, 0.))]
    #[case(Vector3::new(0., 0., -PI), Vector3::new(0., 0., PI))]
    #[case(Vector3::new(PI, 0., 0.), Vector3::new(PI, 0., 0.))]
    #[case(Vector3::new(0., 0., -1.), Vector3::new(0., 0., -1.))]
    fn keep_north_picks_representative(#[case] r: Vector3, #[case] expected: Vector3) {
        assert_eq!(keep_north(r), expected);
    }

    #[rstest]
    #[case(Vector3::new(-1., 2., -0.5))]
    #[case(Vector3::new(0.3, -0.3, 0.9))]
    #[case(Vector3::new(0., -1., 1.))]
    #[case(Vector3::new(1e-17, -1., 0.))]
    fn keep_north_identifies_antipodes(#[case] axis: Vector3) {
        let axis = axis.normalize();
        let north = keep_north(axis * PI);
        assert_eq!(north, keep_north(-axis * PI));
        assert_relative_eq!(north.norm(), PI, epsilon = 1e-12);
    }

    #[test]
    fn keep_north_leaves_other_angles_alone() {
        let r = Vector3::new(-1., 2., -0.5).normalize() * (PI - 1e-6);
        assert_eq!(keep_north(r), r);
    }

    #[rstest]
    #[case(Vector3::new(0., 0., 1.5 * PI), Vector3::new(0., 0., -0.5 * PI))]
    #[case(Vector3::new(0., 0., 2. * PI + 0.25), Vector3::new(0., 0., 0.25))]
    #[case(Vector3::new(0.5, 0., 0.), Vector3::new(0.5, 0., 0.))]
    #[case(Vector3::new(0., 0., -PI), Vector3::new(0., 0., PI))]
    fn canonicalize_wraps_angle(#[case] r: Vector3, #[case] expected: Vector3) {
        assert_relative_eq!(canonicalize(r), expected, epsilon = 1e-12);
    }

    #[test]
    fn canonicalize_preserves_rotation() {
        let r = Vector3::new(1., -4., 2.);
        let p = Vector3::new(0.3, 0.2, -1.);
        let before = rotate(p, r.as_slice()).unwrap();
        let after = rotate(p, canonicalize(r).as_slice()).unwrap();
        assert_relative_eq!(before, after, epsilon = 1e-12);
        assert!(canonicalize(r).norm() <= PI);
    }

    #[cfg(feature = "random")]
    #[test]
    fn random_rotation_vectors_stay_in_bounds() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;
        use uom::si::angle::degree;

        let mut rng = StdRng::seed_from_u64(7);
        let max = Angle::new::<degree>(90.);
        let samples = random_rotation_vectors(&mut rng, 500, max);
        assert_eq!(samples.len(), 500);
        for r in samples {
            assert!(r.z >= 0.);
            assert!(r.norm() < FRAC_PI_2 + 1e-12);
        }
    }
}
