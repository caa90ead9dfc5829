use crate::edge::{Edge, EdgeRecord};
use crate::error::{Error, GraphError, LookupError};
use crate::graph::{FrameGraph, UpdatePolicy};
use crate::math::RigidTransform;
use crate::tree::FrameTree;
use crate::Point3;
use std::fmt;
use std::fmt::{Display, Formatter};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Any number of disjoint [`FrameTree`]s.
///
/// Each frame name belongs to at most one tree. Frames in the same tree can be related with
/// [`get_transform`](FrameForest::get_transform); frames in different trees cannot.
///
/// Unlike a [`FrameTree`], a forest accepts edges that do not touch any frame it already knows
/// about by starting a new tree, and an edge between two trees merges them into one.
///
/// ```
/// use frametree::{Edge, FrameForest, LookupError, math::RigidTransform};
///
/// let mut forest = FrameForest::new();
/// forest.update(Edge::new(RigidTransform::from_parts([1., 0., 0.], [0., 0., 0.]), "camera", "rig")?)?;
/// forest.update(Edge::new(RigidTransform::from_parts([0., 0., 2.], [0., 0., 0.]), "arm", "base")?)?;
/// assert_eq!(forest.tree_count(), 2);
/// assert!(matches!(forest.get_transform("camera", "arm"), Err(LookupError::NoPath { .. })));
///
/// // the rig is mounted on the arm
/// forest.update(Edge::new(RigidTransform::from_parts([0., 0., 0.1], [0., 0., 0.]), "rig", "arm")?)?;
/// assert_eq!(forest.tree_count(), 1);
/// assert!(forest.get_transform("camera", "base").is_ok());
/// # Ok::<(), frametree::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(into = "Vec<EdgeRecord>", try_from = "Vec<EdgeRecord>")
)]
pub struct FrameForest {
    graph: FrameGraph,
}

impl FrameForest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs a forest from a batch of edges, with one tree per connected component.
    ///
    /// Fails if a frame is given two different parents or if the edges form a cycle.
    pub fn from_edges<I>(edges: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = Edge>,
    {
        Ok(Self {
            graph: FrameGraph::from_edges(edges)?,
        })
    }

    /// Adds or replaces an edge.
    ///
    /// - If neither frame is known, the edge becomes a new tree.
    /// - If exactly one frame is known, that frame's tree grows by the other.
    /// - If both frames are in the same tree, the transform between them is replaced (which fails
    ///   if they are not directly connected).
    /// - If the frames are in different trees, the trees are merged. This fails with
    ///   [`GraphError::AmbiguousMerge`] if both frames already have parents.
    ///
    /// On failure the forest is left unchanged.
    pub fn update(&mut self, edge: Edge) -> Result<(), GraphError> {
        self.update_with(edge, UpdatePolicy::CreateComponent)
    }

    /// Like [`FrameForest::update`], but with control over edges that touch no known frame.
    pub fn update_with(&mut self, edge: Edge, policy: UpdatePolicy) -> Result<(), GraphError> {
        self.graph.update(edge, policy)
    }

    /// Returns the transform that takes points expressed in `from` into `to`.
    ///
    /// Fails with [`LookupError::UnknownFrame`] if either frame is not in the forest, and with
    /// [`LookupError::NoPath`] if they are in different trees.
    pub fn get_transform(&self, from: &str, to: &str) -> Result<RigidTransform, LookupError> {
        self.graph.get_transform(from, to)
    }

    /// Expresses `point`, given in `from`, in `to`.
    pub fn transform_point(&self, from: &str, to: &str, point: Point3) -> Result<Point3, LookupError> {
        Ok(self.get_transform(from, to)?.transform_point(point))
    }

    /// Whether both frames are known and in the same tree.
    #[must_use]
    pub fn can_transform(&self, from: &str, to: &str) -> bool {
        match (self.graph.root_of(from), self.graph.root_of(to)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// The number of trees.
    #[must_use]
    pub fn tree_count(&self) -> usize {
        self.graph.component_count()
    }

    /// The root of each tree, in name order.
    #[must_use]
    pub fn roots(&self) -> Vec<&str> {
        self.graph.roots()
    }

    /// The root of the tree that `frame` belongs to.
    #[must_use]
    pub fn root_of<'a>(&'a self, frame: &'a str) -> Option<&'a str> {
        self.graph.root_of(frame)
    }

    /// Copies of the trees, ordered by root name.
    #[must_use]
    pub fn trees(&self) -> Vec<FrameTree> {
        self.graph
            .roots()
            .into_iter()
            .map(|root| FrameTree::from_component(self.graph.component(root)))
            .collect()
    }

    /// A copy of the tree that `frame` belongs to.
    #[must_use]
    pub fn tree_containing(&self, frame: &str) -> Option<FrameTree> {
        let root = self.graph.root_of(frame)?;
        Some(FrameTree::from_component(self.graph.component(root)))
    }

    #[must_use]
    pub fn contains(&self, frame: &str) -> bool {
        self.graph.contains(frame)
    }

    /// All frame names, in name order.
    pub fn frames(&self) -> impl Iterator<Item = &str> {
        self.graph.frames()
    }

    /// The number of frames across all trees.
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

    /// The edges, tree by tree in root name order, parents before children.
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

    /// `frame` followed by each of its ancestors up to and including its tree's root.
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

    /// Returns the serialized form of the forest: every edge of every tree.
    #[must_use]
    pub fn to_serializable(&self) -> Vec<EdgeRecord> {
        self.graph
            .ordered_edges()
            .into_iter()
            .map(Edge::to_record)
            .collect()
    }

    /// Reconstructs a forest from its serialized form. The records may come in any order.
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

    /// Turns the forest into a tree, provided it holds at most one.
    pub fn into_tree(self) -> Result<FrameTree, GraphError> {
        FrameTree::from_graph(self.graph)
    }
}

/// Renders each tree in root name order, separated by blank lines.
impl Display for FrameForest {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.graph.render_all())
    }
}

impl From<FrameTree> for FrameForest {
    fn from(tree: FrameTree) -> Self {
        Self {
            graph: tree.into_graph(),
        }
    }
}

impl From<FrameForest> for Vec<EdgeRecord> {
    fn from(forest: FrameForest) -> Self {
        forest.to_serializable()
    }
}

impl TryFrom<Vec<EdgeRecord>> for FrameForest {
    type Error = Error;

    fn try_from(records: Vec<EdgeRecord>) -> Result<Self, Self::Error> {
        Self::from_serializable(records)
    }
}
