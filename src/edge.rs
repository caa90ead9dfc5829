use crate::error::{FormatError, GraphError};
use crate::math::RigidTransform;
use crate::Vector3;
use std::fmt;
use std::fmt::{Display, Formatter};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A rigid transform from a named child frame into its named parent frame.
///
/// Applying [`Edge::transform`] to a point expressed in [`Edge::child`] yields the same point
/// expressed in [`Edge::parent`].
///
/// Edges are immutable. To change the transform between two frames, submit a new edge with the
/// same names to [`FrameTree::update`](crate::FrameTree::update) or
/// [`FrameForest::update`](crate::FrameForest::update).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "EdgeRecord", try_from = "EdgeRecord"))]
pub struct Edge {
    transform: RigidTransform,
    child: String,
    parent: String,
}

impl Edge {
    /// Constructs an edge saying that `transform` takes points in `child` into `parent`.
    ///
    /// Fails if either name is empty or if both names are the same.
    pub fn new(
        transform: RigidTransform,
        child: impl Into<String>,
        parent: impl Into<String>,
    ) -> Result<Self, GraphError> {
        let child = child.into();
        let parent = parent.into();
        match validate_names(&child, &parent) {
            Ok(()) => Ok(Self {
                transform,
                child,
                parent,
            }),
            Err(reason) => Err(GraphError::InvalidEdge {
                child,
                parent,
                reason,
            }),
        }
    }

    #[must_use]
    pub fn transform(&self) -> RigidTransform {
        self.transform
    }

    #[must_use]
    pub fn child(&self) -> &str {
        &self.child
    }

    #[must_use]
    pub fn parent(&self) -> &str {
        &self.parent
    }

    /// Returns the same relation stated the other way round: `parent` becomes the child.
    #[must_use]
    pub fn inverted(&self) -> Self {
        Self {
            transform: self.transform.inverse(),
            child: self.parent.clone(),
            parent: self.child.clone(),
        }
    }

    /// Returns the serialized form of this edge.
    #[must_use]
    pub fn to_record(&self) -> EdgeRecord {
        EdgeRecord {
            rotation: self.transform.rotation_vector().as_slice().to_vec(),
            translation: self.transform.translation().as_slice().to_vec(),
            child: self.child.clone(),
            parent: self.parent.clone(),
        }
    }

    /// Parses an edge from its serialized form.
    pub fn from_record(record: EdgeRecord) -> Result<Self, FormatError> {
        let rotation = three("rotation", &record.rotation)?;
        let translation = three("translation", &record.translation)?;
        validate_names(&record.child, &record.parent)?;
        Ok(Self {
            transform: RigidTransform::new(translation, rotation),
            child: record.child,
            parent: record.parent,
        })
    }
}

fn validate_names(child: &str, parent: &str) -> Result<(), FormatError> {
    if child.is_empty() || parent.is_empty() {
        return Err(FormatError::EmptyFrameName);
    }
    if child == parent {
        return Err(FormatError::SameFrame(child.to_string()));
    }
    Ok(())
}

fn three(field: &'static str, values: &[f64]) -> Result<Vector3, FormatError> {
    let [x, y, z] = *values else {
        return Err(FormatError::Arity {
            field,
            expected: 3,
            found: values.len(),
        });
    };
    if !(x.is_finite() && y.is_finite() && z.is_finite()) {
        return Err(FormatError::NonFinite(field));
    }
    Ok(Vector3::new(x, y, z))
}

impl Display for Edge {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}: {}", self.child, self.parent, self.transform)
    }
}

/// The serialized form of an [`Edge`].
///
/// `rotation` is an axis-angle rotation vector (radians) and `translation` a displacement; both
/// must have exactly three components.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct EdgeRecord {
    pub rotation: Vec<f64>,
    pub translation: Vec<f64>,
    pub child: String,
    pub parent: String,
}

impl From<Edge> for EdgeRecord {
    fn from(edge: Edge) -> Self {
        edge.to_record()
    }
}

impl TryFrom<EdgeRecord> for Edge {
    type Error = FormatError;

    fn try_from(record: EdgeRecord) -> Result<Self, Self::Error> {
        Edge::from_record(record)
    }
}
