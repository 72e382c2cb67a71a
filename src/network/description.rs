//! The resolved network description consumed by [`Network::build`](super::Network::build).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A description of a road network: junction positions and the roads between them.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct NetworkDescription {
    /// A human readable title.
    pub name: String,
    pub nodes: Vec<NodeDescription>,
    pub edges: Vec<EdgeDescription>,
}

/// A junction at a fixed position.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeDescription {
    pub id: String,
    pub x: f64,
    pub y: f64,
}

/// A directed road from one node to another.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct EdgeDescription {
    pub id: String,
    pub from: String,
    pub to: String,
    /// The number of lanes. Must be positive.
    #[cfg_attr(feature = "serde", serde(alias = "nLanes"))]
    pub lanes: i32,
    #[cfg_attr(feature = "serde", serde(default, alias = "oneway"))]
    pub one_way: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub lane_width: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub median_width: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub shoulder_width: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub median_color: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub shoulder_color: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub lane_color: Option<String>,
    /// The speed limit in m/s.
    #[cfg_attr(feature = "serde", serde(default))]
    pub speed_limit: Option<f64>,
    /// Whether traffic must stop at the end of the road.
    #[cfg_attr(feature = "serde", serde(default))]
    pub stop: bool,
}

impl EdgeDescription {
    /// Creates a two-way road description with default widths and colours.
    pub fn new(id: impl Into<String>, from: impl Into<String>, to: impl Into<String>, lanes: i32) -> Self {
        Self {
            id: id.into(),
            from: from.into(),
            to: to.into(),
            lanes,
            one_way: false,
            lane_width: None,
            median_width: None,
            shoulder_width: None,
            median_color: None,
            shoulder_color: None,
            lane_color: None,
            speed_limit: None,
            stop: false,
        }
    }

    /// Marks the road as one-way.
    pub fn one_way(mut self) -> Self {
        self.one_way = true;
        self
    }

    /// Sets the speed limit in m/s.
    pub fn with_speed_limit(mut self, speed_limit: f64) -> Self {
        self.speed_limit = Some(speed_limit);
        self
    }
}

impl NetworkDescription {
    /// Creates an empty description.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Adds a node.
    pub fn add_node(&mut self, id: impl Into<String>, x: f64, y: f64) -> &mut Self {
        self.nodes.push(NodeDescription { id: id.into(), x, y });
        self
    }

    /// Adds an edge.
    pub fn add_edge(&mut self, edge: EdgeDescription) -> &mut Self {
        self.edges.push(edge);
        self
    }

    /// Creates a grid of `wide` × `tall` nodes, `spacing` metres apart,
    /// joined by one-way, two-lane roads running in the +x and +y directions.
    pub fn grid(wide: usize, tall: usize, spacing: f64) -> Self {
        let mut desc = Self::new(format!("constructed grid of {wide}x{tall} nodes"));
        let node_id = |row: usize, col: usize| (row * wide + col).to_string();

        for row in 0..tall {
            for col in 0..wide {
                desc.add_node(node_id(row, col), col as f64 * spacing, row as f64 * spacing);
            }
        }

        let mut roads = vec![];
        for row in 0..tall {
            for col in 1..wide {
                roads.push((node_id(row, col - 1), node_id(row, col)));
            }
        }
        for col in 0..wide {
            for row in 1..tall {
                roads.push((node_id(row - 1, col), node_id(row, col)));
            }
        }
        for (idx, (from, to)) in roads.into_iter().enumerate() {
            desc.add_edge(EdgeDescription::new(idx.to_string(), from, to, 2).one_way());
        }

        desc
    }
}
