//! Interface to external layout engines.
//!
//! A [`LayoutCollaborator`] receives a [`LayoutRequest`] describing node
//! sizes and edges and answers with a [`LayoutResponse`] carrying positions.
//! Both sides are plain serde types so a collaborator can live behind any
//! transport. The built-in strategies implement the same trait through
//! [`BuiltinCollaborator`], which makes them a drop-in alternative.
//!
//! [`LayoutPipeline`] chains an optional built-in pre-pass with a
//! collaborator and keeps the previously positioned graph when the
//! collaborator fails.

use indexmap::IndexMap;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use dotscape_core::{
    geometry::{Point, Size},
    model::{Edge, Graph, Node},
};

use crate::{
    error::DotscapeError,
    layout::{LayoutAlgorithm, LayoutParams, apply_positions},
};

/// Option key selecting the built-in algorithm.
pub const ALGORITHM_OPTION: &str = "algorithm";

/// Option key naming the anchor node.
pub const ANCHOR_OPTION: &str = "anchor";

/// A node as sent to a collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestNode {
    pub id: String,
    pub width: f32,
    pub height: f32,
}

/// An edge as exchanged with a collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRef {
    pub id: String,
    pub source: String,
    pub target: String,
}

/// The input of a collaborator layout run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutRequest {
    pub nodes: Vec<RequestNode>,
    pub edges: Vec<EdgeRef>,
    #[serde(default)]
    pub options: IndexMap<String, String>,
}

impl LayoutRequest {
    /// Describes `graph` for a collaborator, in node and edge order.
    pub fn from_graph(graph: &Graph, options: IndexMap<String, String>) -> Self {
        let nodes = graph
            .nodes()
            .map(|node| RequestNode {
                id: node.id().to_string(),
                width: node.width(),
                height: node.height(),
            })
            .collect();
        let edges = graph.edges().iter().map(EdgeRef::from).collect();

        Self {
            nodes,
            edges,
            options,
        }
    }

    /// Returns the value of option `key`.
    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }
}

impl From<&Edge> for EdgeRef {
    fn from(edge: &Edge) -> Self {
        Self {
            id: edge.id().to_string(),
            source: edge.source().to_string(),
            target: edge.target().to_string(),
        }
    }
}

/// A positioned node returned by a collaborator.
///
/// `x` and `y` are the top-left corner. A collaborator may resize nodes by
/// returning `width` and `height`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseNode {
    pub id: String,
    pub x: f32,
    pub y: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
}

/// The output of a collaborator layout run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutResponse {
    pub nodes: Vec<ResponseNode>,
    #[serde(default)]
    pub edges: Vec<EdgeRef>,
}

impl LayoutResponse {
    /// Checks the response against `graph` without modifying it.
    ///
    /// # Errors
    ///
    /// Returns an error when a node id is not in `graph` or a coordinate or
    /// size is not a finite number.
    pub fn validate(&self, graph: &Graph) -> Result<(), CollaboratorError> {
        for node in &self.nodes {
            if !graph.contains_node(&node.id) {
                return Err(CollaboratorError::UnknownNode(node.id.clone()));
            }
            let finite = [Some(node.x), Some(node.y), node.width, node.height]
                .into_iter()
                .flatten()
                .all(f32::is_finite);
            if !finite {
                return Err(CollaboratorError::InvalidResponse(format!(
                    "node `{}` has a non-finite coordinate or size",
                    node.id
                )));
            }
        }
        Ok(())
    }

    /// Writes positions and sizes into `graph`.
    ///
    /// The response is validated first; on error `graph` is left untouched.
    /// Nodes absent from the response keep their position. Returns the
    /// number of nodes updated.
    pub fn apply(&self, graph: &mut Graph) -> Result<usize, CollaboratorError> {
        self.validate(graph)?;

        let mut applied = 0;
        for entry in &self.nodes {
            let Some(node) = graph.node_mut(&entry.id) else {
                continue;
            };
            node.set_position(Point::new(entry.x, entry.y));
            if let (Some(width), Some(height)) = (entry.width, entry.height) {
                node.set_size(Size::new(width, height));
            }
            applied += 1;
        }
        Ok(applied)
    }
}

/// Failure reported by or about a collaborator.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("collaborator failed: {0}")]
    Failed(String),

    #[error("response references unknown node `{0}`")]
    UnknownNode(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// An engine that positions the nodes of a [`LayoutRequest`].
pub trait LayoutCollaborator {
    /// Computes a layout for `request`.
    fn layout(&self, request: &LayoutRequest) -> Result<LayoutResponse, CollaboratorError>;
}

/// The built-in strategies behind the collaborator interface.
///
/// The `algorithm` option picks the strategy (aliases accepted, unknown
/// names fall back to circular) and the `anchor` option overrides the
/// anchor in the parameters.
#[derive(Debug, Clone, Default)]
pub struct BuiltinCollaborator {
    params: LayoutParams,
}

impl BuiltinCollaborator {
    pub fn new(params: LayoutParams) -> Self {
        Self { params }
    }
}

impl LayoutCollaborator for BuiltinCollaborator {
    fn layout(&self, request: &LayoutRequest) -> Result<LayoutResponse, CollaboratorError> {
        let algorithm = request
            .option(ALGORITHM_OPTION)
            .map(LayoutAlgorithm::from_name)
            .unwrap_or_default();
        let mut params = self.params.clone();
        if let Some(anchor) = request.option(ANCHOR_OPTION) {
            params.anchor = Some(anchor.to_string());
        }

        let mut graph = Graph::new(true);
        for node in &request.nodes {
            graph.insert_node(Node::new(&node.id).with_size(Size::new(node.width, node.height)));
        }
        for edge in &request.edges {
            graph.push_edge(Edge::new(&edge.id, &edge.source, &edge.target));
        }

        let positions = algorithm.layout(&graph, &params);
        let nodes = graph
            .nodes()
            .filter_map(|node| {
                let position = positions.get(node.id())?;
                Some(ResponseNode {
                    id: node.id().to_string(),
                    x: position.x(),
                    y: position.y(),
                    width: Some(node.width()),
                    height: Some(node.height()),
                })
            })
            .collect();

        Ok(LayoutResponse {
            nodes,
            edges: request.edges.clone(),
        })
    }
}

/// Runs an optional built-in pre-pass followed by a collaborator.
pub struct LayoutPipeline<C> {
    collaborator: C,
    prepass: Option<LayoutAlgorithm>,
    params: LayoutParams,
    options: IndexMap<String, String>,
}

impl<C: LayoutCollaborator> LayoutPipeline<C> {
    pub fn new(collaborator: C) -> Self {
        Self {
            collaborator,
            prepass: None,
            params: LayoutParams::default(),
            options: IndexMap::new(),
        }
    }

    /// Run `algorithm` on the graph before the collaborator
    pub fn with_prepass(mut self, algorithm: LayoutAlgorithm) -> Self {
        self.prepass = Some(algorithm);
        self
    }

    /// Set the parameters of the pre-pass
    pub fn with_params(mut self, params: LayoutParams) -> Self {
        self.params = params;
        self
    }

    /// Add an option forwarded to the collaborator
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Lays out `graph` in place.
    ///
    /// # Errors
    ///
    /// Returns [`DotscapeError::Layout`] when the collaborator fails or
    /// answers with an invalid response. `graph` then keeps the positions it
    /// had before the collaborator ran, including those of the pre-pass.
    pub fn run(&self, graph: &mut Graph) -> Result<(), DotscapeError> {
        if let Some(algorithm) = self.prepass {
            let positions = algorithm.layout(graph, &self.params);
            apply_positions(graph, &positions);
            debug!(algorithm:% = algorithm; "Pre-pass applied");
        }

        let request = LayoutRequest::from_graph(graph, self.options.clone());
        let result = self
            .collaborator
            .layout(&request)
            .and_then(|response| response.apply(graph));

        match result {
            Ok(applied) => {
                info!(applied; "Collaborator layout applied");
                Ok(())
            }
            Err(err) => {
                warn!(err:% = err; "Collaborator layout failed, keeping previous positions");
                Err(DotscapeError::Layout(err.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    impl LayoutCollaborator for Failing {
        fn layout(&self, _request: &LayoutRequest) -> Result<LayoutResponse, CollaboratorError> {
            Err(CollaboratorError::Failed("engine unavailable".to_string()))
        }
    }

    struct Fixed(LayoutResponse);

    impl LayoutCollaborator for Fixed {
        fn layout(&self, _request: &LayoutRequest) -> Result<LayoutResponse, CollaboratorError> {
            Ok(self.0.clone())
        }
    }

    fn sample() -> Graph {
        let mut graph = Graph::new(true);
        graph.connect("a", "b");
        graph.connect("b", "c");
        graph
    }

    fn positions(graph: &Graph) -> Vec<Point> {
        graph.nodes().map(|node| node.position()).collect()
    }

    #[test]
    fn test_request_from_graph() {
        let request = LayoutRequest::from_graph(&sample(), IndexMap::new());

        let ids: Vec<&str> = request.nodes.iter().map(|node| node.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert_eq!(request.edges.len(), 2);
        assert_eq!(request.edges[0].source, "a");
        assert_eq!(request.nodes[0].width, 150.0);
    }

    #[test]
    fn test_builtin_matches_direct_layout() {
        let graph = sample();
        let mut options = IndexMap::new();
        options.insert(ALGORITHM_OPTION.to_string(), "dot".to_string());
        let request = LayoutRequest::from_graph(&graph, options);

        let response = BuiltinCollaborator::default()
            .layout(&request)
            .expect("built-in layout succeeds");
        let direct = LayoutAlgorithm::Hierarchical.layout(&graph, &LayoutParams::default());

        assert_eq!(response.nodes.len(), 3);
        for node in &response.nodes {
            assert_eq!(Point::new(node.x, node.y), direct[node.id.as_str()]);
        }
    }

    #[test]
    fn test_response_json_shape() {
        let json = r#"{"nodes":[{"id":"a","x":1.5,"y":2.0}],"edges":[]}"#;
        let response: LayoutResponse = serde_json::from_str(json).expect("valid response");

        assert_eq!(response.nodes[0].width, None);
        assert_eq!(
            serde_json::to_string(&response).expect("serializable"),
            r#"{"nodes":[{"id":"a","x":1.5,"y":2.0}],"edges":[]}"#
        );
    }

    #[test]
    fn test_apply_rejects_unknown_node_without_changes() {
        let mut graph = sample();
        let response = LayoutResponse {
            nodes: vec![
                ResponseNode {
                    id: "a".to_string(),
                    x: 10.0,
                    y: 10.0,
                    width: None,
                    height: None,
                },
                ResponseNode {
                    id: "ghost".to_string(),
                    x: 0.0,
                    y: 0.0,
                    width: None,
                    height: None,
                },
            ],
            edges: Vec::new(),
        };

        let err = response.apply(&mut graph).unwrap_err();
        assert!(matches!(err, CollaboratorError::UnknownNode(id) if id == "ghost"));
        assert!(graph.nodes().all(|node| node.position().is_zero()));
    }

    #[test]
    fn test_apply_resizes_nodes() {
        let mut graph = sample();
        let response = LayoutResponse {
            nodes: vec![ResponseNode {
                id: "b".to_string(),
                x: 5.0,
                y: 6.0,
                width: Some(80.0),
                height: Some(30.0),
            }],
            edges: Vec::new(),
        };

        assert_eq!(response.apply(&mut graph).expect("valid response"), 1);
        let node = graph.node("b").expect("node exists");
        assert_eq!(node.position(), Point::new(5.0, 6.0));
        assert_eq!(node.size(), Size::new(80.0, 30.0));
    }

    #[test]
    fn test_failing_collaborator_keeps_prepass_positions() {
        let mut graph = sample();
        let pipeline = LayoutPipeline::new(Failing).with_prepass(LayoutAlgorithm::Grid);

        let err = pipeline.run(&mut graph).unwrap_err();
        assert!(matches!(err, DotscapeError::Layout(_)));

        let expected = LayoutAlgorithm::Grid.layout(&sample(), &LayoutParams::default());
        let expected: Vec<Point> = expected.values().copied().collect();
        assert_eq!(positions(&graph), expected);
    }

    #[test]
    fn test_invalid_response_keeps_previous_graph() {
        let mut graph = sample();
        let before = graph.clone();
        let pipeline = LayoutPipeline::new(Fixed(LayoutResponse {
            nodes: vec![ResponseNode {
                id: "a".to_string(),
                x: f32::NAN,
                y: 0.0,
                width: None,
                height: None,
            }],
            edges: Vec::new(),
        }));

        assert!(pipeline.run(&mut graph).is_err());
        assert_eq!(graph, before);
    }

    #[test]
    fn test_pipeline_with_builtin_collaborator() {
        let mut graph = sample();
        let pipeline = LayoutPipeline::new(BuiltinCollaborator::default())
            .with_option(ALGORITHM_OPTION, "radial")
            .with_option(ANCHOR_OPTION, "b");

        pipeline.run(&mut graph).expect("built-in layout succeeds");
        let anchor = graph.node("b").expect("node exists");
        assert_eq!(anchor.position(), LayoutParams::default().center);
    }
}
