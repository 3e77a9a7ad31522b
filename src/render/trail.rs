use std::collections::VecDeque;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailConfig {
    pub enabled: bool,
    pub length: usize,          // max nodes kept per body
    pub min_spacing: f64,       // px between consecutive nodes
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            length: 600,
            min_spacing: 2.0,
        }
    }
}

/// Bounded history of where one body has been.
#[derive(Debug, Clone)]
pub struct Trail {
    nodes: VecDeque<Vector2<f64>>,
    capacity: usize,
    min_spacing_sq: f64,
}

impl Trail {
    pub fn new(config: &TrailConfig) -> Self {
        Self {
            nodes: VecDeque::with_capacity(config.length.min(4096)),
            capacity: config.length,
            min_spacing_sq: config.min_spacing * config.min_spacing,
        }
    }

    /// Record a position unless it is too close to the last one.
    /// Returns whether a node was added.
    pub fn record(&mut self, pos: Vector2<f64>) -> bool {
        if self.capacity == 0 || !pos.iter().all(|c| c.is_finite()) {
            return false;
        }
        let far_enough = self
            .nodes
            .back()
            .map_or(true, |last| (pos - last).norm_squared() > self.min_spacing_sq);
        if !far_enough {
            return false;
        }
        if self.nodes.len() == self.capacity {
            self.nodes.pop_front();
        }
        self.nodes.push_back(pos);
        true
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes oldest first.
    pub fn points(&self) -> Vec<Vector2<f64>> {
        self.nodes.iter().copied().collect()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(length: usize, min_spacing: f64) -> TrailConfig {
        TrailConfig { enabled: true, length, min_spacing }
    }

    #[test]
    fn skips_nodes_closer_than_spacing() {
        let mut t = Trail::new(&config(10, 1.0));
        assert!(t.record(Vector2::new(0.0, 0.0)));
        assert!(!t.record(Vector2::new(0.5, 0.5)));
        assert!(t.record(Vector2::new(1.0, 1.0)));
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn drops_oldest_when_full() {
        let mut t = Trail::new(&config(3, 0.0));
        for i in 0..5 {
            t.record(Vector2::new(i as f64, 0.0));
        }
        let xs: Vec<f64> = t.points().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn ignores_non_finite_positions() {
        let mut t = Trail::new(&config(3, 0.0));
        assert!(!t.record(Vector2::new(f64::NAN, 0.0)));
        assert!(t.is_empty());
    }
}
