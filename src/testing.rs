//! Fixtures shared by the unit tests.

use crate::edge::Edge;
use crate::math::RigidTransform;
use crate::tree::FrameTree;
use quickcheck::{Arbitrary, Gen};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_3, FRAC_PI_4, FRAC_PI_6, FRAC_PI_8};

fn e(translation: [f64; 3], rotation: [f64; 3], child: &str, parent: &str) -> Edge {
    Edge::new(RigidTransform::from_parts(translation, rotation), child, parent)
        .expect("fixture edges are valid")
}

/// A humanoid rooted at `origin`.
pub(crate) fn skeleton() -> Vec<Edge> {
    vec![
        e([1., 2., 3.], [0., 0., 0.], "body", "origin"),
        e([0., 0., 0.5], [0., 0., -FRAC_PI_3], "head", "body"),
        e([0., 1., 0.], [0., 0., 0.], "l_shoulder", "body"),
        e([0., -1., 0.], [0., 0., 0.], "r_shoulder", "body"),
        e([0., 0., -0.7], [0., -FRAC_PI_6, 0.], "l_elbow", "l_shoulder"),
        e([0., 0., -0.7], [0., -FRAC_PI_3, 0.], "r_elbow", "r_shoulder"),
        e([0., 0., -0.6], [0., 0., 0.], "l_wrist", "l_elbow"),
        e([0., 0., -0.6], [0., 0., 0.], "r_wrist", "r_elbow"),
        e([0., 0., -1.], [0., 0., FRAC_PI_8], "waist", "body"),
        e([0., 0.4, 0.], [0., -FRAC_PI_4, 0.], "l_hip", "waist"),
        e([0., -0.4, 0.], [0., 0., 0.], "r_hip", "waist"),
        e([0., 0., -1.2], [0., FRAC_PI_2, 0.], "l_knee", "l_hip"),
        e([0., 0., -1.2], [0., 0., 0.], "r_knee", "r_hip"),
        e([0., 0., -0.9], [0., -FRAC_PI_8, 0.], "l_ankle", "l_knee"),
        e([0., 0., -0.9], [0., 0., 0.], "r_ankle", "r_knee"),
        e([0.2, 0., 0.], [0., 0., 0.], "l_foot", "l_ankle"),
        e([0.2, 0., 0.], [0., 0., 0.], "r_foot", "r_ankle"),
    ]
}

impl Arbitrary for FrameTree {
    fn arbitrary(g: &mut Gen) -> Self {
        // every frame but the first picks an earlier frame as its parent
        let n = usize::arbitrary(g) % 12;
        let edges = (1..n).map(|i| {
            let parent = usize::arbitrary(g) % i;
            Edge::new(RigidTransform::arbitrary(g), format!("f{i}"), format!("f{parent}"))
                .expect("frame names differ")
        });
        FrameTree::from_edges(edges.collect::<Vec<_>>()).expect("edges point to earlier frames")
    }
}
