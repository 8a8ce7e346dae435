//! Curve dependency resolution.
//!
//! A curve depends on another when one of its swap or OIS helpers names it
//! as `discount_curve`. The resolver orders curves so dependencies build
//! first, groups them into waves of mutually independent curves, and hands
//! out verdicts for the ones that can never be built.

use std::collections::HashMap;

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{depth_first_search, DfsEvent, Reversed};

use crate::contracts::CurveSpec;
use crate::error::{EngineError, EngineResult};

/// Outcome of dependency resolution. Curves are addressed by their position
/// in the request.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Buildable curves grouped by dependency depth, each wave in request
    /// order.
    pub waves: Vec<Vec<usize>>,
    /// Failure verdict per curve; `None` for buildable curves.
    pub verdicts: Vec<Option<EngineError>>,
    /// Resolved dependencies per curve, in declaration order.
    pub dependencies: Vec<Vec<usize>>,
}

/// Dependency graph over the curves of one batch.
///
/// Edges run from a dependency to its dependent; node weights are request
/// positions, so `NodeIndex::index` and the position coincide.
#[derive(Debug)]
pub struct DependencyResolver<'a> {
    specs: &'a [CurveSpec],
    graph: DiGraph<usize, ()>,
    dependencies: Vec<Vec<usize>>,
    missing: Vec<Option<String>>,
}

impl<'a> DependencyResolver<'a> {
    /// Builds the graph; an empty or repeated curve id is a request error.
    pub fn new(specs: &'a [CurveSpec]) -> EngineResult<Self> {
        let mut ids: HashMap<&str, usize> = HashMap::with_capacity(specs.len());
        for (i, spec) in specs.iter().enumerate() {
            if spec.id.is_empty() {
                return Err(EngineError::invalid_request(format!("curve {i} has no id")));
            }
            if ids.insert(spec.id.as_str(), i).is_some() {
                return Err(EngineError::invalid_request(format!(
                    "duplicate curve id '{}'",
                    spec.id
                )));
            }
        }

        let mut graph = DiGraph::with_capacity(specs.len(), specs.len());
        for i in 0..specs.len() {
            graph.add_node(i);
        }

        let mut dependencies = Vec::with_capacity(specs.len());
        let mut missing = Vec::with_capacity(specs.len());
        for (i, spec) in specs.iter().enumerate() {
            let mut deps = Vec::new();
            let mut first_missing = None;
            for id in spec.dependencies() {
                match ids.get(id) {
                    Some(&j) => {
                        graph.add_edge(NodeIndex::new(j), NodeIndex::new(i), ());
                        deps.push(j);
                    }
                    None if first_missing.is_none() => first_missing = Some(id.to_string()),
                    None => {}
                }
            }
            dependencies.push(deps);
            missing.push(first_missing);
        }

        Ok(Self {
            specs,
            graph,
            dependencies,
            missing,
        })
    }

    /// Resolves build order, waves and verdicts.
    pub fn resolve(specs: &'a [CurveSpec]) -> EngineResult<Resolution> {
        Ok(Self::new(specs)?.run())
    }

    fn run(self) -> Resolution {
        let n = self.specs.len();
        let mut verdicts: Vec<Option<EngineError>> = vec![None; n];

        for (i, missing) in self.missing.iter().enumerate() {
            if let Some(missing) = missing {
                verdicts[i] = Some(EngineError::MissingDependency {
                    curve: self.specs[i].id.clone(),
                    missing: missing.clone(),
                });
            }
        }

        let (post_order, has_cycle) = self.post_order();
        if has_cycle {
            for mut component in tarjan_scc(&self.graph) {
                if component.len() < 2 {
                    continue;
                }
                component.sort_unstable();
                let cycle: Vec<String> = component
                    .iter()
                    .map(|node| self.specs[node.index()].id.clone())
                    .collect();
                for node in &component {
                    let i = node.index();
                    verdicts[i] = Some(EngineError::CyclicDependency {
                        curve: self.specs[i].id.clone(),
                        cycle: cycle.clone(),
                    });
                }
            }
        }

        // Post-order visits every acyclic dependency before its dependents.
        for &i in &post_order {
            if verdicts[i].is_some() {
                continue;
            }
            let root_cause = self.dependencies[i].iter().find_map(|&j| match &verdicts[j] {
                Some(EngineError::DependencyFailed { root_cause, .. }) => Some(root_cause.clone()),
                Some(_) => Some(self.specs[j].id.clone()),
                None => None,
            });
            if let Some(root_cause) = root_cause {
                verdicts[i] = Some(EngineError::DependencyFailed {
                    curve: self.specs[i].id.clone(),
                    root_cause,
                });
            }
        }

        for (spec, verdict) in self.specs.iter().zip(&verdicts) {
            if let Some(e) = verdict {
                tracing::debug!(curve = %spec.id, kind = %e.kind(), "curve not buildable");
            }
        }

        let mut depth = vec![0usize; n];
        for &i in post_order.iter().filter(|&&i| verdicts[i].is_none()) {
            depth[i] = self.dependencies[i]
                .iter()
                .map(|&j| depth[j] + 1)
                .max()
                .unwrap_or(0);
        }
        let mut waves: Vec<Vec<usize>> = Vec::new();
        for i in (0..n).filter(|&i| verdicts[i].is_none()) {
            if waves.len() <= depth[i] {
                waves.resize_with(depth[i] + 1, Vec::new);
            }
            waves[depth[i]].push(i);
        }

        tracing::debug!(
            curves = n,
            buildable = waves.iter().map(Vec::len).sum::<usize>(),
            waves = waves.len(),
            "dependencies resolved"
        );

        Resolution {
            waves,
            verdicts,
            dependencies: self.dependencies,
        }
    }

    /// Depth-first search along dependencies, roots in request order.
    /// Returns the finish order and whether any back edge was seen.
    fn post_order(&self) -> (Vec<usize>, bool) {
        let mut out = Vec::with_capacity(self.specs.len());
        let mut has_cycle = false;
        depth_first_search(Reversed(&self.graph), self.graph.node_indices(), |event| {
            match event {
                DfsEvent::Finish(node, _) => out.push(node.index()),
                DfsEvent::BackEdge(from, to) => {
                    tracing::trace!(from = from.index(), to = to.index(), "dependency back edge");
                    has_cycle = true;
                }
                _ => {}
            }
        });
        (out, has_cycle)
    }
}
