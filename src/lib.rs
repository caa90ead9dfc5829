//! This library keeps track of named 3-D coordinate frames related by rigid body transforms, and
//! tells you the transform between any two of them.
//!
//! Frames are connected by [`Edge`]s, each of which holds the [rigid
//! transform](math::RigidTransform) taking points in a _child_ frame into its _parent_ frame. A
//! [`FrameTree`] is a single connected set of such frames with one root (think of the joints of a
//! robot arm or a character skeleton), and a [`FrameForest`] holds any number of disjoint trees
//! (say, several robots whose relative positions are not known yet).
//!
//! Both answer [`get_transform(a, b)`](FrameTree::get_transform) by walking from `a` and `b` up
//! to their lowest common ancestor and composing the edges along the way, so the cost of a query
//! grows with the depth of the two frames rather than with the size of the structure. Both can be
//! grown edge by edge with `update`, which rejects any edge that would break the tree structure
//! and leaves the structure untouched when it does.
//!
//! # Examples
//!
//! ```
//! use frametree::{Edge, FrameTree, math::RigidTransform};
//! use nalgebra::Point3;
//! use std::f64::consts::FRAC_PI_2;
//!
//! // a sensor rig: the lidar and the camera are both mounted on the base
//! let mut rig = FrameTree::from_edges([
//!     Edge::new(RigidTransform::from_parts([0., 0., 0.5], [0., 0., 0.]), "lidar", "base")?,
//!     Edge::new(
//!         RigidTransform::from_parts([0.3, 0., 0.2], [0., 0., FRAC_PI_2]),
//!         "camera",
//!         "base",
//!     )?,
//! ])?;
//!
//! // something the lidar saw, expressed in the camera's frame
//! let hit = rig.transform_point("lidar", "camera", Point3::new(2., 0., 0.))?;
//!
//! // the camera gets bumped; only that one edge needs replacing
//! rig.update(Edge::new(
//!     RigidTransform::from_parts([0.3, 0.01, 0.2], [0., 0., FRAC_PI_2]),
//!     "camera",
//!     "base",
//! )?)?;
//! # let _ = hit;
//!
//! print!("{rig}");
//! # Ok::<(), frametree::Error>(())
//! ```
//!
//! # Serialization
//!
//! Trees and forests serialize to a flat list of [`EdgeRecord`]s (with the `serde` feature, they
//! also implement `Serialize` and `Deserialize` in that form). The order of the records depends
//! only on the contents of the structure, and deserializing the records reproduces them exactly.
//!
//! # Features
//!
//! - `serde` (default): `Serialize` and `Deserialize` implementations.
//! - `approx` (default): approximate comparison of [`math::RigidTransform`]s.
//! - `random` (default): random rotation vectors in [`axis_angle`].

mod edge;
mod error;
mod forest;
mod graph;
mod tree;
mod util;

pub mod axis_angle;
pub mod math;

#[cfg(test)]
mod testing;

pub(crate) type Point3 = nalgebra::Point3<f64>;
pub(crate) type Vector3 = nalgebra::Vector3<f64>;
pub(crate) type UnitQuaternion = nalgebra::UnitQuaternion<f64>;
pub(crate) type Isometry3 = nalgebra::Isometry3<f64>;

pub use edge::{Edge, EdgeRecord};
pub use error::{Error, FormatError, GraphError, LookupError, Result};
pub use forest::FrameForest;
pub use graph::UpdatePolicy;
pub use tree::FrameTree;
