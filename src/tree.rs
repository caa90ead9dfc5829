use crate::edge::{Edge, EdgeRecord};
use crate::error::{Error, GraphError, LookupError};
use crate::forest::FrameForest;
use crate::graph::{FrameGraph, UpdatePolicy};
use crate::math::RigidTransform;
use crate::Point3;
use std::fmt;
use std::fmt::{Display, Formatter};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single connected set of frames with one root.
///
/// Every frame except the root has exactly one parent, and the parent relation has no cycles.
/// Updates must attach to the frames already in the tree; use a [`FrameForest`] if you need to
/// hold frames that are not (yet) connected.
///
/// ```
/// use frametree::{Edge, FrameTree, math::RigidTransform};
///
/// let tree = FrameTree::from_edges([
///     Edge::new(RigidTransform::from_parts([1., 2., 3.], [0., 0., 0.]), "body", "origin")?,
///     Edge::new(RigidTransform::from_parts([0., 0., 0.5], [0., 0., 0.]), "head", "body")?,
/// ])?;
///
/// let head_in_origin = tree.get_transform("head", "origin")?;
/// assert!((head_in_origin.translation() - nalgebra::Vector3::new(1., 2., 3.5)).norm() < 1e-8);
/// # Ok::<(), frametree::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(into = "Vec<EdgeRecord>", try_from = "Vec<EdgeRecord>")
)]
pub struct FrameTree {
    graph: FrameGraph,
}

impl FrameTree {
    /// Constructs an empty tree. Its first [`update`](FrameTree::update) defines the root.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs a tree from a batch of edges.
    ///
    /// Fails if a frame is given two different parents, if the edges form a cycle, or if they do
    /// not form exactly one connected component.
    pub fn from_edges<I>(edges: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = Edge>,
    {
        Self::from_graph(FrameGraph::from_edges(edges)?)
    }

    pub(crate) fn from_graph(graph: FrameGraph) -> Result<Self, GraphError> {
        if graph.component_count() > 1 {
            return Err(GraphError::Disconnected(
                graph.component_count(),
                graph.roots().into_iter().map(str::to_string).collect(),
            ));
        }
        Ok(Self { graph })
    }

    /// Wraps one component cut out of a larger graph, which is connected by construction.
    pub(crate) fn from_component(graph: FrameGraph) -> Self {
        debug_assert!(graph.component_count() <= 1);
        Self { graph }
    }

    /// Adds or replaces an edge.
    ///
    /// - If the tree already holds an edge between the two frames, its transform is replaced.
    /// - If exactly one of the frames is new, the tree grows by that frame.
    /// - If neither frame is in the tree, this fails with [`GraphError::Orphan`] (unless the tree
    ///   is empty).
    /// - Connecting two frames already in the tree in any other way fails, since it would close a
    ///   cycle or give a frame a second parent.
    ///
    /// On failure the tree is left unchanged.
    pub fn update(&mut self, edge: Edge) -> Result<(), GraphError> {
        self.graph.update(edge, UpdatePolicy::RejectOrphans)
    }

    /// Returns the transform that takes points expressed in `from` into `to`.
    ///
    /// `get_transform(a, b)` is the inverse of `get_transform(b, a)`, and
    /// `get_transform(a, a)` is the identity.
    pub fn get_transform(&self, from: &str, to: &str) -> Result<RigidTransform, LookupError> {
        self.graph.get_transform(from, to)
    }

    /// Expresses `point`, given in `from`, in `to`.
    pub fn transform_point(&self, from: &str, to: &str, point: Point3) -> Result<Point3, LookupError> {
        Ok(self.get_transform(from, to)?.transform_point(point))
    }

    /// Whether both frames are in this tree.
    #[must_use]
    pub fn can_transform(&self, from: &str, to: &str) -> bool {
        self.contains(from) && self.contains(to)
    }

    /// The one frame without a parent, or `None` for an empty tree.
    #[must_use]
    pub fn root(&self) -> Option<&str> {
        self.graph.roots().first().copied()
    }

    #[must_use]
    pub fn contains(&self, frame: &str) -> bool {
        self.graph.contains(frame)
    }

    /// All frame names, in name order.
    pub fn frames(&self) -> impl Iterator<Item = &str> {
        self.graph.frames()
    }

    /// The number of frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.graph.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// The edges, parents before children, siblings in name order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.graph.ordered_edges().into_iter()
    }

    /// The edge connecting `frame` to its parent.
    #[must_use]
    pub fn edge(&self, frame: &str) -> Option<&Edge> {
        self.graph.edge(frame)
    }

    #[must_use]
    pub fn parent(&self, frame: &str) -> Option<&str> {
        self.graph.parent(frame)
    }

    /// The children of `frame`, in name order.
    #[must_use]
    pub fn children(&self, frame: &str) -> Vec<&str> {
        self.graph.children(frame)
    }

    /// `frame` followed by each of its ancestors up to and including the root.
    pub fn path_to_root<'a>(&'a self, frame: &'a str) -> Result<Vec<&'a str>, LookupError> {
        self.graph.path_to_root(frame)
    }

    /// The deepest frame that both `a` and `b` descend from (or are).
    pub fn lowest_common_ancestor<'a>(
        &'a self,
        a: &'a str,
        b: &'a str,
    ) -> Result<&'a str, LookupError> {
        self.graph.lowest_common_ancestor(a, b)
    }

    /// Returns the serialized form of the tree.
    ///
    /// The order of the records only depends on the contents of the tree.
    #[must_use]
    pub fn to_serializable(&self) -> Vec<EdgeRecord> {
        self.graph
            .ordered_edges()
            .into_iter()
            .map(Edge::to_record)
            .collect()
    }

    /// Reconstructs a tree from its serialized form.
    pub fn from_serializable<I>(records: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = EdgeRecord>,
    {
        let edges = records
            .into_iter()
            .map(Edge::from_record)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_edges(edges)?)
    }

    /// Renders the subtree below `from`, one frame per line, indented by depth.
    pub fn render(&self, from: &str) -> Result<String, LookupError> {
        self.graph.render(from)
    }

    /// Turns this tree into a forest holding just this tree.
    #[must_use]
    pub fn into_forest(self) -> FrameForest {
        FrameForest::from(self)
    }

    pub(crate) fn into_graph(self) -> FrameGraph {
        self.graph
    }
}

impl Display for FrameTree {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.graph.render_all())
    }
}

impl From<FrameTree> for Vec<EdgeRecord> {
    fn from(tree: FrameTree) -> Self {
        tree.to_serializable()
    }
}

impl TryFrom<Vec<EdgeRecord>> for FrameTree {
    type Error = Error;

    fn try_from(records: Vec<EdgeRecord>) -> Result<Self, Self::Error> {
        Self::from_serializable(records)
    }
}

impl TryFrom<FrameForest> for FrameTree {
    type Error = GraphError;

    fn try_from(forest: FrameForest) -> Result<Self, Self::Error> {
        forest.into_tree()
    }
}
