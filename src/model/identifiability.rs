use itertools::Itertools;
use serde::Serialize;
use tracing::warn;

use crate::{error::ModelError, model::likelihood::Comparisons};

/// Conditions under which the matches cannot pin down every ability
/// (beyond the global shift, which only a prior resolves).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdentifiabilityReport {
    /// 1-based indices of players that never played
    pub unobserved_players: Vec<usize>,
    /// Connected components of the graph linking opponents and teammates
    pub components: usize,
    /// Every match was played by the same two multi-player teams, so only the
    /// team totals are constrained
    pub constant_team_composition: bool,
    /// Strongly connected components of the graph with an edge from every
    /// winner to every loser of a match, teammates linked both ways
    pub win_components: usize
}

impl IdentifiabilityReport {
    pub fn check<C: Comparisons + ?Sized>(data: &C) -> IdentifiabilityReport {
        let num_players = data.num_players();
        let mut appearances = vec![0usize; num_players];
        let mut components = DisjointSet::new(num_players);
        let mut beats = vec![Vec::new(); num_players];

        for n in 0..data.num_matches() {
            let (side0, side1) = data.sides(n);
            let (winners, losers) = if data.side1_won(n) { (side1, side0) } else { (side0, side1) };

            for &w in winners {
                beats[w].extend_from_slice(losers);
            }
            for side in [side0, side1] {
                for (&a, &b) in side.iter().tuple_combinations() {
                    beats[a].push(b);
                    beats[b].push(a);
                }
            }
            let mut participants = side0.iter().chain(side1.iter());

            if let Some(&first) = participants.next() {
                appearances[first] += 1;
                for &p in participants {
                    appearances[p] += 1;
                    components.union(first, p);
                }
            }
        }

        let unobserved_players = appearances
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count == 0)
            .map(|(p, _)| p + 1)
            .collect();

        IdentifiabilityReport {
            unobserved_players,
            components: components.count(),
            constant_team_composition: constant_composition(data),
            win_components: strongly_connected_components(&beats)
        }
    }

    /// Some group of players beat everyone outside it they ever met, so the
    /// likelihood keeps rising as that group pulls away and no finite maximum
    /// exists without a prior.
    pub fn complete_separation(&self) -> bool {
        self.win_components > self.components
    }

    pub fn is_identified(&self) -> bool {
        self.unobserved_players.is_empty() && self.components <= 1 && !self.constant_team_composition
    }

    pub fn log_warnings(&self) {
        if !self.unobserved_players.is_empty() {
            warn!(
                "{} players have no matches; their abilities are set by the prior alone: {:?}",
                self.unobserved_players.len(),
                self.unobserved_players
            );
        }
        if self.components > 1 {
            warn!(
                "Comparison graph has {} disconnected components; abilities across components are not comparable",
                self.components
            );
        }
        if self.constant_team_composition {
            warn!("Team composition never varies; individual contributions lie on a flat likelihood ridge");
        }
        if self.complete_separation() {
            warn!(
                "Win graph splits into {} groups that never beat a stronger group; unregularized abilities diverge",
                self.win_components
            );
        }
    }

    pub fn ensure_identified(&self) -> Result<(), ModelError> {
        if self.is_identified() {
            return Ok(());
        }

        let mut reasons = Vec::new();
        if !self.unobserved_players.is_empty() {
            reasons.push(format!("players without matches {:?}", self.unobserved_players));
        }
        if self.components > 1 {
            reasons.push(format!("{} disconnected components", self.components));
        }
        if self.constant_team_composition {
            reasons.push("constant team composition".to_string());
        }

        Err(ModelError::NotIdentified(reasons.join(", ")))
    }
}

fn constant_composition<C: Comparisons + ?Sized>(data: &C) -> bool {
    if data.num_matches() == 0 {
        return false;
    }

    let lineup = |n: usize| {
        let (side0, side1) = data.sides(n);
        let a: Vec<usize> = side0.iter().copied().sorted().collect();
        let b: Vec<usize> = side1.iter().copied().sorted().collect();
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    };

    let first = lineup(0);
    let multi_player = first.0.len() > 1 || first.1.len() > 1;

    multi_player && (1..data.num_matches()).all(|n| lineup(n) == first)
}

/// Kosaraju's algorithm with explicit stacks.
fn strongly_connected_components(edges: &[Vec<usize>]) -> usize {
    let size = edges.len();
    let mut visited = vec![false; size];
    let mut order = Vec::with_capacity(size);

    for start in 0..size {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        let mut stack = vec![(start, 0usize)];
        while let Some(top) = stack.last_mut() {
            let (node, next) = *top;
            if next < edges[node].len() {
                top.1 += 1;
                let target = edges[node][next];
                if !visited[target] {
                    visited[target] = true;
                    stack.push((target, 0));
                }
            } else {
                order.push(node);
                stack.pop();
            }
        }
    }

    let mut reversed = vec![Vec::new(); size];
    for (from, targets) in edges.iter().enumerate() {
        for &to in targets {
            reversed[to].push(from);
        }
    }

    let mut assigned = vec![false; size];
    let mut count = 0;
    for &root in order.iter().rev() {
        if assigned[root] {
            continue;
        }
        count += 1;
        assigned[root] = true;
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            for &prev in &reversed[node] {
                if !assigned[prev] {
                    assigned[prev] = true;
                    stack.push(prev);
                }
            }
        }
    }

    count
}

struct DisjointSet {
    parent: Vec<usize>,
    sets: usize
}

impl DisjointSet {
    fn new(size: usize) -> DisjointSet {
        DisjointSet {
            parent: (0..size).collect(),
            sets: size
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (root_a, root_b) = (self.find(a), self.find(b));
        if root_a != root_b {
            self.parent[root_b] = root_a;
            self.sets -= 1;
        }
    }

    fn count(&self) -> usize {
        self.sets
    }
}
