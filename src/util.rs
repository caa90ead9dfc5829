use uom::si::angle::radian;
use uom::si::f64::Angle;

/// A rotation angle reduced modulo a full turn.
///
/// Used to bring the norm of a rotation vector back into a single turn before picking its
/// canonical form.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct BoundedAngle {
    /// always in [0, 2π) radians
    radians: f64,
}

impl BoundedAngle {
    pub(crate) fn new(angle: Angle) -> Self {
        Self {
            radians: Self::into_bounds(angle),
        }
    }

    pub(crate) fn from_radians(radians: f64) -> Self {
        Self::new(Angle::new::<radian>(radians))
    }

    fn into_bounds(angle: Angle) -> f64 {
        let full_turn = Angle::FULL_TURN.get::<radian>();
        let bounded = angle.get::<radian>().rem_euclid(full_turn);
        // rem_euclid can round up to the modulus itself for tiny negative inputs
        if bounded < full_turn {
            bounded
        } else {
            0.
        }
    }

    /// Returns the angle in [-π, π) in radians.
    pub(crate) fn to_signed_range(self) -> f64 {
        if self.radians < Angle::HALF_TURN.get::<radian>() {
            self.radians
        } else {
            self.radians - Angle::FULL_TURN.get::<radian>()
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::util::BoundedAngle;
    use approx::assert_relative_eq;
    use rstest::rstest;
    use std::f64::consts::{FRAC_PI_2, PI};
    use uom::si::angle::degree;
    use uom::si::f64::Angle;

    #[rstest]
    #[case(0., 0.)]
    #[case(0.25, 0.25)]
    #[case(-FRAC_PI_2, -FRAC_PI_2)]
    #[case(1.5 * PI, -FRAC_PI_2)]
    #[case(PI, -PI)]
    #[case(6. * PI + 0.25, 0.25)]
    #[case(-4. * PI - 0.25, -0.25)]
    fn rotation_norms_wrap_into_signed_half_turn(#[case] radians: f64, #[case] expected: f64) {
        assert_relative_eq!(
            BoundedAngle::from_radians(radians).to_signed_range(),
            expected,
            epsilon = 1e-12
        );
    }

    #[test]
    fn tiny_negative_angles_stay_below_a_full_turn() {
        let wrapped = BoundedAngle::from_radians(-1e-20).to_signed_range();
        assert!((-PI..PI).contains(&wrapped));
        assert_relative_eq!(wrapped, 0., epsilon = 1e-12);
    }

    #[rstest]
    #[case(270., -90.)]
    #[case(360. + 120., 120.)]
    #[case(-180., -180.)]
    fn degrees_convert_through_uom(#[case] degrees: f64, #[case] expected_degrees: f64) {
        let bounded = BoundedAngle::new(Angle::new::<degree>(degrees));
        assert_relative_eq!(
            bounded.to_signed_range(),
            expected_degrees.to_radians(),
            epsilon = 1e-12
        );
    }
}
