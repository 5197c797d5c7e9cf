//! Dependency graph derived from each plan's `blockedBy` list.
//!
//! An edge `from → to` means `from` must finish before `to` can start.
//! Filenames that name no existing plan stay in a node's `blocked_by` but
//! produce no edge.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::models::{PlanMeta, PlanStatus};

/// One plan in the graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DependencyNode {
    pub filename: String,
    pub title: String,
    pub status: PlanStatus,
    /// Plans this one waits on, duplicates removed
    pub blocked_by: Vec<String>,
    /// Plans waiting on this one
    pub blocks: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DependencyEdge {
    pub from: String,
    pub to: String,
}

/// The whole graph, nodes sorted by filename.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DependencyGraph {
    pub nodes: Vec<DependencyNode>,
    pub edges: Vec<DependencyEdge>,
    pub has_cycle: bool,
    /// Each cycle as the filenames along it
    pub cycles: Vec<Vec<String>>,
    /// Longest chain of dependent plans; empty with a cycle or no chain
    pub critical_path: Vec<String>,
}

/// Neighbourhood of a single plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlanDependencies {
    pub filename: String,
    pub blocked_by: Vec<DependencyNode>,
    pub blocks: Vec<DependencyNode>,
    /// Every upstream plan in the order they must finish, ending with this one
    pub chain: Vec<String>,
}

type NodeMap = BTreeMap<String, DependencyNode>;

impl DependencyGraph {
    pub fn build(plans: &[PlanMeta]) -> Self {
        let mut nodes: NodeMap = plans
            .iter()
            .map(|plan| {
                let frontmatter = plan.frontmatter.as_ref();
                let mut seen = HashSet::new();
                let blocked_by = frontmatter
                    .map(|fm| fm.blocked_by.as_slice())
                    .unwrap_or_default()
                    .iter()
                    .filter(|name| seen.insert(name.as_str()))
                    .cloned()
                    .collect();
                let node = DependencyNode {
                    filename: plan.filename.clone(),
                    title: plan.title.clone(),
                    status: frontmatter
                        .map(|fm| fm.effective_status())
                        .unwrap_or_default(),
                    blocked_by,
                    blocks: Vec::new(),
                };
                (plan.filename.clone(), node)
            })
            .collect();

        let mut edges = Vec::new();
        let pairs: Vec<(String, String)> = nodes
            .values()
            .flat_map(|node| {
                node.blocked_by
                    .iter()
                    .map(move |blocker| (blocker.clone(), node.filename.clone()))
            })
            .collect();
        for (from, to) in pairs {
            if let Some(blocker) = nodes.get_mut(&from) {
                blocker.blocks.push(to.clone());
                edges.push(DependencyEdge { from, to });
            }
        }

        let cycles = detect_cycles(&nodes);
        let critical_path = if cycles.is_empty() {
            critical_path(&nodes)
        } else {
            Vec::new()
        };
        Self {
            nodes: nodes.into_values().collect(),
            edges,
            has_cycle: !cycles.is_empty(),
            cycles,
            critical_path,
        }
    }

    pub fn node(&self, filename: &str) -> Option<&DependencyNode> {
        self.nodes.iter().find(|node| node.filename == filename)
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Direct neighbours and the upstream chain of `filename`, or `None` if
    /// it is not in the graph.
    pub fn dependencies_of(&self, filename: &str) -> Option<PlanDependencies> {
        let target = self.node(filename)?;
        let lookup = |names: &[String]| -> Vec<DependencyNode> {
            names
                .iter()
                .filter_map(|name| self.node(name).cloned())
                .collect()
        };
        Some(PlanDependencies {
            filename: filename.to_string(),
            blocked_by: lookup(&target.blocked_by),
            blocks: lookup(&target.blocks),
            chain: self.chain(filename),
        })
    }

    /// Upstream plans in dependency order (post-order walk over
    /// `blocked_by`), ending with `filename`.
    fn chain(&self, filename: &str) -> Vec<String> {
        fn walk(
            graph: &DependencyGraph,
            current: &str,
            visited: &mut HashSet<String>,
            chain: &mut Vec<String>,
        ) {
            if !visited.insert(current.to_string()) {
                return;
            }
            let Some(node) = graph.node(current) else {
                return;
            };
            for blocker in &node.blocked_by {
                walk(graph, blocker, visited, chain);
            }
            chain.push(current.to_string());
        }

        let mut chain = Vec::new();
        walk(self, filename, &mut HashSet::new(), &mut chain);
        chain
    }
}

/// Every cycle reachable by a depth-first walk over `blocked_by`.
fn detect_cycles(nodes: &NodeMap) -> Vec<Vec<String>> {
    let mut cycles = Vec::new();
    let mut visited = HashSet::new();
    let mut rec_stack = HashSet::new();
    let mut path = Vec::new();

    for filename in nodes.keys() {
        if !visited.contains(filename.as_str()) {
            find_cycles_dfs(
                filename,
                nodes,
                &mut visited,
                &mut rec_stack,
                &mut path,
                &mut cycles,
            );
        }
    }
    cycles
}

fn find_cycles_dfs<'a>(
    current: &'a str,
    nodes: &'a NodeMap,
    visited: &mut HashSet<&'a str>,
    rec_stack: &mut HashSet<&'a str>,
    path: &mut Vec<&'a str>,
    cycles: &mut Vec<Vec<String>>,
) {
    visited.insert(current);
    rec_stack.insert(current);
    path.push(current);

    if let Some(node) = nodes.get(current) {
        for neighbor in &node.blocked_by {
            if !nodes.contains_key(neighbor) {
                continue;
            }
            if !visited.contains(neighbor.as_str()) {
                find_cycles_dfs(neighbor, nodes, visited, rec_stack, path, cycles);
            } else if rec_stack.contains(neighbor.as_str()) {
                if let Some(start) = path.iter().position(|name| *name == neighbor.as_str()) {
                    cycles.push(path[start..].iter().map(|name| name.to_string()).collect());
                }
            }
        }
    }

    path.pop();
    rec_stack.remove(current);
}

/// Longest chain through an acyclic graph, by Kahn's topological order.
///
/// A lone plan is not a chain, so the result is empty unless at least two
/// plans are linked.
fn critical_path(nodes: &NodeMap) -> Vec<String> {
    let mut in_degree: HashMap<&str, usize> = nodes
        .values()
        .map(|node| {
            let known = node
                .blocked_by
                .iter()
                .filter(|name| nodes.contains_key(*name))
                .count();
            (node.filename.as_str(), known)
        })
        .collect();

    let mut dist: HashMap<&str, usize> = HashMap::new();
    let mut prev: HashMap<&str, &str> = HashMap::new();
    let mut queue: VecDeque<&str> = VecDeque::new();
    for filename in nodes.keys() {
        let source = in_degree.get(filename.as_str()) == Some(&0);
        dist.insert(filename, usize::from(source));
        if source {
            queue.push_back(filename);
        }
    }

    while let Some(current) = queue.pop_front() {
        let current_dist = dist.get(current).copied().unwrap_or_default();
        let Some(node) = nodes.get(current) else {
            continue;
        };
        for blocked in &node.blocks {
            let blocked = blocked.as_str();
            if current_dist + 1 > dist.get(blocked).copied().unwrap_or_default() {
                dist.insert(blocked, current_dist + 1);
                prev.insert(blocked, current);
            }
            if let Some(degree) = in_degree.get_mut(blocked) {
                *degree = degree.saturating_sub(1);
                if *degree == 0 {
                    queue.push_back(blocked);
                }
            }
        }
    }

    // First filename wins a tie, so the result is stable.
    let mut end: Option<(&str, usize)> = None;
    for filename in nodes.keys() {
        let d = dist.get(filename.as_str()).copied().unwrap_or_default();
        if end.map_or(true, |(_, best)| d > best) {
            end = Some((filename.as_str(), d));
        }
    }
    let Some((end, longest)) = end else {
        return Vec::new();
    };
    if longest <= 1 {
        return Vec::new();
    }

    let mut path = vec![end.to_string()];
    let mut seen = BTreeSet::from([end]);
    let mut current = end;
    while let Some(&before) = prev.get(current) {
        if !seen.insert(before) {
            break;
        }
        path.push(before.to_string());
        current = before;
    }
    path.reverse();
    path
}
