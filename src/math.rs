//! The rigid body transform primitive.
//!
//! [`RigidTransform`] describes the isometry (ie, rotation and translation) that takes points
//! expressed in one frame into another. It implements the operations you would expect from an
//! element of SE(3): you can compose two with `*`, take the inverse, and apply one to a point.
//!
//! Rotations are stored as rotation vectors (see [`crate::axis_angle`]) so that a transform
//! survives a round trip through its serialized form bit for bit.

use crate::axis_angle;
use crate::{Isometry3, Point3, UnitQuaternion, Vector3};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::ops::{Mul, Neg};
use uom::si::angle::radian;
use uom::si::f64::Angle;

#[cfg(any(test, feature = "approx"))]
use approx::{AbsDiffEq, RelativeEq};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A rotation followed by a translation.
///
/// Applying the transform to a point `p` yields `R p + t`, where `R` is the rotation described by
/// [`rotation_vector`](RigidTransform::rotation_vector) and `t` is
/// [`translation`](RigidTransform::translation).
///
/// <div class="warning">
///
/// `PartialEq` compares the stored components exactly, so two transforms that describe the same
/// isometry through different rotation vectors (eg, `r` and `-r` at half a turn) are not `==`.
/// Use the [`approx`] traits to compare isometries.
///
/// </div>
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RigidTransform {
    rotation: Vector3,
    translation: Vector3,
}

impl RigidTransform {
    /// Constructs a transform from a translation and an axis-angle rotation vector whose norm is
    /// the rotation angle in radians.
    ///
    /// The rotation is applied first.
    #[must_use]
    pub fn new(translation: Vector3, rotation: Vector3) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// Like [`RigidTransform::new`], but from plain arrays.
    ///
    /// ```
    /// use frametree::math::RigidTransform;
    /// use std::f64::consts::FRAC_PI_2;
    ///
    /// // a quarter turn about z, then one unit up
    /// let t = RigidTransform::from_parts([0., 0., 1.], [0., 0., FRAC_PI_2]);
    /// let p = t.transform_point([1., 0., 0.].into());
    /// assert!((p - nalgebra::Point3::new(0., 1., 1.)).norm() < 1e-12);
    /// ```
    #[must_use]
    pub fn from_parts(translation: [f64; 3], rotation: [f64; 3]) -> Self {
        Self::new(Vector3::from(translation), Vector3::from(rotation))
    }

    /// The transform that leaves every point where it is.
    #[must_use]
    pub fn identity() -> Self {
        Self::new(Vector3::zeros(), Vector3::zeros())
    }

    /// Constructs a transform from an isometry.
    ///
    /// The rotation vector is canonicalized (see [`axis_angle::canonicalize`]).
    #[must_use]
    pub fn from_isometry(isometry: &Isometry3) -> Self {
        Self::new(
            isometry.translation.vector,
            axis_angle::canonicalize(scaled_axis(&isometry.rotation)),
        )
    }

    /// Returns the equivalent isometry.
    #[must_use]
    pub fn to_isometry(&self) -> Isometry3 {
        Isometry3::new(self.translation, self.rotation)
    }

    /// Returns the equal-but-opposite transform to this one.
    #[must_use]
    pub fn inverse(&self) -> Self {
        Self::from_isometry(&self.to_isometry().inverse())
    }

    /// Chains two transforms: the result first applies `self`, then `next`.
    ///
    /// This is the same as `next * self`.
    #[must_use]
    pub fn and_then(self, next: Self) -> Self {
        next * self
    }

    /// Returns the translation, which is applied after the rotation.
    #[must_use]
    pub fn translation(&self) -> Vector3 {
        self.translation
    }

    /// Returns the rotation as an axis-angle vector.
    #[must_use]
    pub fn rotation_vector(&self) -> Vector3 {
        self.rotation
    }

    /// Returns the rotation as a unit quaternion.
    #[must_use]
    pub fn rotation(&self) -> UnitQuaternion {
        UnitQuaternion::from_scaled_axis(self.rotation)
    }

    /// Returns the angle of the rotation component.
    #[must_use]
    pub fn angle(&self) -> Angle {
        Angle::new::<radian>(self.rotation.norm())
    }

    /// Applies the transform to a point.
    #[doc(alias = "apply")]
    #[must_use]
    pub fn transform_point(&self, point: Point3) -> Point3 {
        self.to_isometry().transform_point(&point)
    }

    /// Applies the transform to every point in `points`.
    #[must_use]
    pub fn transform_points(&self, points: &[Point3]) -> Vec<Point3> {
        let isometry = self.to_isometry();
        points.iter().map(|p| isometry.transform_point(p)).collect()
    }

    /// Applies only the rotation of the transform to a vector.
    ///
    /// Vectors describe displacements without an origin, so translating them is meaningless.
    #[must_use]
    pub fn transform_vector(&self, vector: Vector3) -> Vector3 {
        self.rotation() * vector
    }
}

// `2 atan2(|v|, w)` keeps full precision for small angles, where `acos(w)` does not.
fn scaled_axis(rotation: &UnitQuaternion) -> Vector3 {
    let imag = rotation.imag();
    let sin_half = imag.norm();
    if sin_half == 0. {
        return Vector3::zeros();
    }
    let angle = 2. * sin_half.atan2(rotation.scalar());
    imag * (angle / sin_half)
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Display for RigidTransform {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let t = self.translation;
        let r = self.rotation;
        write!(
            f,
            "Translation: ({}, {}, {}), Rotation: ({}, {}, {})",
            t.x, t.y, t.z, r.x, r.y, r.z
        )
    }
}

impl Neg for RigidTransform {
    type Output = RigidTransform;

    fn neg(self) -> Self::Output {
        self.inverse()
    }
}

// like matrices, `a * b` applies `b` first and then `a`.
impl Mul<RigidTransform> for RigidTransform {
    type Output = RigidTransform;

    fn mul(self, rhs: RigidTransform) -> Self::Output {
        Self::from_isometry(&(self.to_isometry() * rhs.to_isometry()))
    }
}

impl Mul<Point3> for RigidTransform {
    type Output = Point3;

    fn mul(self, rhs: Point3) -> Self::Output {
        self.transform_point(rhs)
    }
}

#[cfg(any(test, feature = "approx"))]
impl AbsDiffEq<Self> for RigidTransform {
    type Epsilon = <f64 as AbsDiffEq>::Epsilon;

    fn default_epsilon() -> Self::Epsilon {
        Isometry3::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.to_isometry()
            .abs_diff_eq(&other.to_isometry(), epsilon)
    }
}

#[cfg(any(test, feature = "approx"))]
impl RelativeEq for RigidTransform {
    fn default_max_relative() -> Self::Epsilon {
        Isometry3::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.to_isometry()
            .relative_eq(&other.to_isometry(), epsilon, max_relative)
    }
}
