//! The representation shared by [`FrameTree`](crate::FrameTree) and
//! [`FrameForest`](crate::FrameForest).
//!
//! Frames are identified by name. Every non-root frame maps to the single [`Edge`] that connects
//! it to its parent, so a frame has at most one parent by construction and cycle detection is a
//! matter of chasing parent names. Each root identifies one connected component.
//!
//! All maps are ordered, which makes serialization and rendering depend only on the graph's
//! contents and not on the order in which edges were inserted.

use crate::edge::Edge;
use crate::error::{GraphError, LookupError};
use crate::math::RigidTransform;
use std::collections::{BTreeMap, BTreeSet};

/// How an update treats an edge whose frames are both unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdatePolicy {
    /// Fail with [`GraphError::Orphan`]. The edge must attach to the existing structure.
    RejectOrphans,
    /// Start a new component holding just that edge.
    #[default]
    CreateComponent,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct FrameGraph {
    /// child -> edge into its parent
    edges: BTreeMap<String, Edge>,
    /// parent -> its children, kept in step with `edges`
    children: BTreeMap<String, BTreeSet<String>>,
    frames: BTreeSet<String>,
}

impl FrameGraph {
    /// Builds a graph from a batch of edges, storing each edge exactly as given.
    pub(crate) fn from_edges<I>(edges: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = Edge>,
    {
        let mut graph = Self::default();
        for edge in edges {
            if let Some(existing) = graph.edges.get(edge.child()) {
                if existing.parent() != edge.parent() {
                    return Err(GraphError::AmbiguousParent {
                        child: edge.child().to_string(),
                        first: existing.parent().to_string(),
                        second: edge.parent().to_string(),
                    });
                }
                log::warn!(
                    "edge '{}' -> '{}' given more than once; keeping the last transform",
                    edge.child(),
                    edge.parent()
                );
            }
            graph.insert(edge);
        }
        graph.check_acyclic()?;
        Ok(graph)
    }

    fn check_acyclic(&self) -> Result<(), GraphError> {
        let mut acyclic: BTreeSet<&str> = BTreeSet::new();
        for start in self.edges.keys() {
            let mut path: Vec<&str> = Vec::new();
            let mut on_path: BTreeSet<&str> = BTreeSet::new();
            let mut current = start.as_str();
            loop {
                if acyclic.contains(current) {
                    break;
                }
                if !on_path.insert(current) {
                    let parent = self.parent(current).unwrap_or_default();
                    return Err(GraphError::Cycle {
                        child: current.to_string(),
                        parent: parent.to_string(),
                    });
                }
                path.push(current);
                match self.parent(current) {
                    Some(parent) => current = parent,
                    None => break,
                }
            }
            acyclic.extend(path);
        }
        Ok(())
    }

    fn insert(&mut self, edge: Edge) {
        self.frames.insert(edge.child().to_string());
        self.frames.insert(edge.parent().to_string());
        self.children
            .entry(edge.parent().to_string())
            .or_default()
            .insert(edge.child().to_string());
        if let Some(previous) = self.edges.insert(edge.child().to_string(), edge) {
            self.unlink(&previous);
        }
    }

    // drops `previous` from its parent's child list unless the replacement kept that parent
    fn unlink(&mut self, previous: &Edge) {
        if self.parent(previous.child()) == Some(previous.parent()) {
            return;
        }
        if let Some(siblings) = self.children.get_mut(previous.parent()) {
            siblings.remove(previous.child());
            if siblings.is_empty() {
                self.children.remove(previous.parent());
            }
        }
    }

    pub(crate) fn contains(&self, frame: &str) -> bool {
        self.frames.contains(frame)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.frames.len()
    }

    pub(crate) fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub(crate) fn frames(&self) -> impl Iterator<Item = &str> {
        self.frames.iter().map(String::as_str)
    }

    pub(crate) fn edge(&self, child: &str) -> Option<&Edge> {
        self.edges.get(child)
    }

    pub(crate) fn parent(&self, frame: &str) -> Option<&str> {
        self.edges.get(frame).map(Edge::parent)
    }

    /// Children of `frame`, in name order.
    pub(crate) fn children(&self, frame: &str) -> Vec<&str> {
        self.children
            .get(frame)
            .map(|children| children.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Frames without a parent, in name order. There is one per component.
    pub(crate) fn roots(&self) -> Vec<&str> {
        self.frames
            .iter()
            .map(String::as_str)
            .filter(|frame| !self.edges.contains_key(*frame))
            .collect()
    }

    pub(crate) fn component_count(&self) -> usize {
        self.frames.len() - self.edges.len()
    }

    /// `frame` followed by its ancestors, ending at its root.
    pub(crate) fn path_to_root<'a>(&'a self, frame: &'a str) -> Result<Vec<&'a str>, LookupError> {
        if !self.contains(frame) {
            return Err(LookupError::UnknownFrame(frame.to_string()));
        }
        let mut path = vec![frame];
        let mut current = frame;
        while let Some(parent) = self.parent(current) {
            path.push(parent);
            current = parent;
        }
        Ok(path)
    }

    pub(crate) fn root_of<'a>(&'a self, frame: &'a str) -> Option<&'a str> {
        let path = self.path_to_root(frame).ok()?;
        path.last().copied()
    }

    /// Returns the deepest frame that is an ancestor of (or equal to) both `a` and `b`.
    pub(crate) fn lowest_common_ancestor<'a>(
        &'a self,
        a: &'a str,
        b: &'a str,
    ) -> Result<&'a str, LookupError> {
        let from_a = self.path_to_root(a)?;
        let from_b = self.path_to_root(b)?;
        Self::common_ancestor(&from_a, &from_b)
            .map(|(i, _)| from_a[i])
            .ok_or_else(|| LookupError::NoPath {
                from: a.to_string(),
                to: b.to_string(),
            })
    }

    /// Positions of the lowest common ancestor in both root paths.
    fn common_ancestor(from_a: &[&str], from_b: &[&str]) -> Option<(usize, usize)> {
        let depth_in_b: BTreeMap<&str, usize> =
            from_b.iter().enumerate().map(|(i, f)| (*f, i)).collect();
        from_a
            .iter()
            .enumerate()
            .find_map(|(i, f)| depth_in_b.get(f).map(|&j| (i, j)))
    }

    /// Composes the edges along `path[..steps]`, ie from `path[0]` up to `path[steps]`.
    fn accumulate(&self, path: &[&str], steps: usize) -> RigidTransform {
        path[..steps]
            .iter()
            .filter_map(|frame| self.edge(frame))
            .fold(RigidTransform::identity(), |acc, edge| {
                acc.and_then(edge.transform())
            })
    }

    /// Returns the transform that takes points in `from` into `to`.
    pub(crate) fn get_transform(&self, from: &str, to: &str) -> Result<RigidTransform, LookupError> {
        for frame in [from, to] {
            if !self.contains(frame) {
                return Err(LookupError::UnknownFrame(frame.to_string()));
            }
        }
        if from == to {
            return Ok(RigidTransform::identity());
        }
        let from_path = self.path_to_root(from)?;
        let to_path = self.path_to_root(to)?;
        let (from_steps, to_steps) =
            Self::common_ancestor(&from_path, &to_path).ok_or_else(|| LookupError::NoPath {
                from: from.to_string(),
                to: to.to_string(),
            })?;
        log::trace!(
            "resolving '{from}' -> '{to}' through '{}' ({from_steps} up, {to_steps} down)",
            from_path[from_steps]
        );

        let from_to_ancestor = self.accumulate(&from_path, from_steps);
        let to_to_ancestor = self.accumulate(&to_path, to_steps);
        Ok(from_to_ancestor.and_then(to_to_ancestor.inverse()))
    }

    /// Inserts or replaces `edge` while keeping every component a tree.
    ///
    /// Nothing is modified when an error is returned.
    pub(crate) fn update(&mut self, edge: Edge, policy: UpdatePolicy) -> Result<(), GraphError> {
        let child = edge.child();
        let parent = edge.parent();
        let child_root = self.root_of(child).map(str::to_owned);
        let parent_root = self.root_of(parent).map(str::to_owned);
        let child_has_parent = self.edges.contains_key(child);

        match (child_root, parent_root) {
            (None, None) => {
                if policy == UpdatePolicy::RejectOrphans && !self.is_empty() {
                    return Err(GraphError::Orphan {
                        child: child.to_string(),
                        parent: parent.to_string(),
                    });
                }
                log::debug!("new component '{parent}' with child '{child}'");
                self.insert(edge);
            }
            (None, Some(_)) => {
                log::debug!("attaching new frame '{child}' below '{parent}'");
                self.insert(edge);
            }
            (Some(_), None) if !child_has_parent => {
                log::debug!("new frame '{parent}' becomes the parent of root '{child}'");
                self.insert(edge);
            }
            (Some(_), None) => {
                // `child` already has a parent, so the new frame hangs below it instead
                log::debug!("attaching new frame '{parent}' below '{child}' (stored inverted)");
                self.insert(edge.inverted());
            }
            (Some(a), Some(b)) if a == b => {
                if self.parent(child) == Some(parent) {
                    log::debug!("replacing transform '{child}' -> '{parent}'");
                    self.insert(edge);
                } else if self.parent(parent) == Some(child) {
                    log::debug!("replacing transform '{parent}' -> '{child}' (stored inverted)");
                    self.insert(edge.inverted());
                } else if self.is_ancestor(child, parent) || !child_has_parent {
                    return Err(GraphError::Cycle {
                        child: child.to_string(),
                        parent: parent.to_string(),
                    });
                } else {
                    return Err(GraphError::AmbiguousParent {
                        child: child.to_string(),
                        first: self.parent(child).unwrap_or_default().to_string(),
                        second: parent.to_string(),
                    });
                }
            }
            (Some(_), Some(_)) if !child_has_parent => {
                log::debug!("splicing component of '{child}' below '{parent}'");
                self.insert(edge);
            }
            (Some(_), Some(_)) if !self.edges.contains_key(parent) => {
                log::debug!("splicing component of '{parent}' below '{child}' (stored inverted)");
                self.insert(edge.inverted());
            }
            (Some(_), Some(_)) => {
                return Err(GraphError::AmbiguousMerge {
                    child: child.to_string(),
                    parent: parent.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Whether `ancestor` lies on the path from `frame` to its root (excluding `frame` itself).
    fn is_ancestor(&self, ancestor: &str, frame: &str) -> bool {
        let mut current = frame;
        while let Some(parent) = self.parent(current) {
            if parent == ancestor {
                return true;
            }
            current = parent;
        }
        false
    }

    /// Visits the component below `from` depth first, children in name order.
    ///
    /// Costs time proportional to the size of that component only.
    fn depth_first<'a>(&'a self, from: &'a str) -> Vec<(&'a str, usize)> {
        let mut visited = Vec::new();
        let mut stack = vec![(from, 0)];
        while let Some((frame, depth)) = stack.pop() {
            visited.push((frame, depth));
            if let Some(children) = self.children.get(frame) {
                stack.extend(children.iter().rev().map(|child| (child.as_str(), depth + 1)));
            }
        }
        visited
    }

    /// Every edge, grouped by component (components in root name order), parents before children.
    pub(crate) fn ordered_edges(&self) -> Vec<&Edge> {
        self.roots()
            .into_iter()
            .flat_map(|root| self.depth_first(root))
            .filter_map(|(frame, _)| self.edge(frame))
            .collect()
    }

    /// The component rooted at `root`.
    pub(crate) fn component(&self, root: &str) -> Self {
        Self::from_trusted(
            self.depth_first(root)
                .into_iter()
                .filter_map(|(frame, _)| self.edge(frame))
                .cloned(),
        )
    }

    // for edges taken from an already valid graph
    fn from_trusted(edges: impl IntoIterator<Item = Edge>) -> Self {
        let mut graph = Self::default();
        for edge in edges {
            graph.insert(edge);
        }
        graph
    }

    /// Renders the subtree below `from`, one frame per line, indented two spaces per level.
    pub(crate) fn render(&self, from: &str) -> Result<String, LookupError> {
        if !self.contains(from) {
            return Err(LookupError::UnknownFrame(from.to_string()));
        }
        let mut out = String::new();
        self.render_into(&mut out, from);
        Ok(out)
    }

    fn render_into(&self, out: &mut String, from: &str) {
        for (frame, depth) in self.depth_first(from) {
            out.extend(std::iter::repeat("  ").take(depth));
            out.push_str(frame);
            out.push('\n');
        }
    }

    /// Renders every component, in root name order, separated by blank lines.
    pub(crate) fn render_all(&self) -> String {
        let mut out = String::new();
        for (i, root) in self.roots().into_iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            self.render_into(&mut out, root);
        }
        out
    }
}
