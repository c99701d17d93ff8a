//! A* search over a [`RoadGraph`]. Every city moves through three states:
//! unvisited (never reached), open (in the frontier with a tentative cost)
//! and closed (expanded, cost is final). All search state lives in a
//! [`SearchState`] owned by a single call, so any number of searches can run
//! against the same graph at once.

use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use tracing::debug;

use crate::common::graph_data::EdgeData;
use crate::common::road_graph::RoadGraph;
use crate::error::RouteError;
use crate::routing::breakdown::RouteResult;
use crate::routing::cost::{CostModel, Heuristic};
use crate::routing::frontier::{Frontier, Priority};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    Unvisited,
    Open,
    Closed,
}

/// Everything known about a single city during one search
#[derive(Debug, Clone, Copy)]
struct NodeState {
    visit: Visit,
    g: f64,
    // City this one was reached from, and the exact segment used. Recording
    // the segment keeps parallel roads unambiguous
    parent: Option<(NodeIndex, EdgeIndex)>,
    seq: u64,
}

impl NodeState {
    fn new() -> Self {
        NodeState {
            visit: Visit::Unvisited,
            g: f64::INFINITY,
            parent: None,
            seq: 0,
        }
    }
}

struct SearchState {
    nodes: Vec<NodeState>,
    frontier: Frontier<Priority>,
    next_seq: u64,
}

impl SearchState {
    fn new(node_count: usize) -> Self {
        SearchState {
            nodes: vec![NodeState::new(); node_count],
            frontier: Frontier::new(node_count),
            next_seq: 0,
        }
    }

    /// Record a cheaper way of reaching `node`. Newly discovered cities join
    /// the frontier, cities which are already open have their key lowered in
    /// place. Closed cities are final and are left untouched, in which case
    /// false is returned
    fn open(
        &mut self,
        node: NodeIndex,
        g: f64,
        f: f64,
        parent: Option<(NodeIndex, EdgeIndex)>,
    ) -> bool {
        let state = &mut self.nodes[node.index()];

        match state.visit {
            Visit::Unvisited => {
                state.g = g;
                state.parent = parent;
                state.visit = Visit::Open;
                state.seq = self.next_seq;
                self.next_seq += 1;
                self.frontier.push(node.index(), Priority::new(f, state.seq));
                true
            }
            Visit::Open => {
                state.g = g;
                state.parent = parent;
                self.frontier
                    .update_priority(node.index(), Priority::new(f, state.seq));
                true
            }
            Visit::Closed => false,
        }
    }

    /// Follow parent links back from the provided city, returning the
    /// segments of the path in travel order
    fn segments_to(&self, end: NodeIndex) -> Vec<EdgeIndex> {
        let mut segments = Vec::new();
        let mut cur = end;
        while let Some((parent, edge)) = self.nodes[cur.index()].parent {
            segments.push(edge);
            cur = parent;
        }
        segments.reverse();
        segments
    }
}

/// Lowest-cost sequence of segments from `start` to `end`, along with its
/// total cost in minutes. An empty sequence means start and end are the same
/// city
pub fn find_path(
    graph: &RoadGraph,
    costs: &CostModel,
    start: &str,
    end: &str,
) -> Result<(Vec<EdgeIndex>, f64), RouteError> {
    let start_inx = graph.node_index(start)?;
    let end_inx = graph.node_index(end)?;
    let heuristic = Heuristic::new(graph, costs, end)?;
    let city_graph = graph.graph();

    let mut state = SearchState::new(graph.city_count());
    let start_h = heuristic.estimate(&city_graph[start_inx]);
    state.open(start_inx, 0.0, start_h, None);

    let mut expanded = 0usize;

    while let Some((node, _)) = state.frontier.pop() {
        let u = NodeIndex::new(node);
        state.nodes[node].visit = Visit::Closed;
        expanded += 1;

        if u == end_inx {
            let total = state.nodes[node].g;
            debug!(start, end, expanded, total, "route found");
            return Ok((state.segments_to(end_inx), total));
        }

        let g_u = state.nodes[node].g;

        for eref in city_graph.edges(u) {
            let v = eref.target();
            let v_state = state.nodes[v.index()];
            if v_state.visit == Visit::Closed {
                continue;
            }

            let candidate_g = g_u + costs.edge_cost_min(eref.weight());
            if v_state.visit == Visit::Unvisited || candidate_g < v_state.g {
                let f = candidate_g + heuristic.estimate(&city_graph[v]);
                state.open(v, candidate_g, f, Some((u, eref.id())));
            }
        }
    }

    debug!(start, end, expanded, "frontier exhausted");
    Err(RouteError::Unreachable {
        start: start.to_string(),
        end: end.to_string(),
    })
}

/// Find the lowest-cost route between two named cities, and itemise the
/// cost of every leg along it
pub fn find_route(
    graph: &RoadGraph,
    costs: &CostModel,
    start: &str,
    end: &str,
) -> Result<RouteResult, RouteError> {
    let (segments, _) = find_path(graph, costs, start, end)?;

    let city_graph = graph.graph();
    let edges: Vec<&EdgeData> =
        segments.iter().map(|edge| &city_graph[*edge]).collect();

    Ok(RouteResult::from_edges(costs, start, &edges))
}
