//! GraphPool - per-process mini graphs
//!
//! A graph is created the first time a process shows CPU usage and dropped
//! after ten consecutive low-activity samples. Processes that leave the list
//! are collected by a periodic sweep keyed only on the pids present in the
//! tick that triggers it.

use std::collections::{HashMap, HashSet};

use tracing::trace;

use super::graph::{Graph, GraphOptions};
use super::symbols::GraphSymbol;
use super::theme::Theme;
use crate::core::{ProcInfo, Series};

/// Non-identical ticks between two sweeps
pub const DEFAULT_SWEEP_INTERVAL: u32 = 1000;

/// Consecutive samples below `IDLE_CPU` before a graph is dropped
const IDLE_SAMPLES: u32 = 10;

/// CPU percentage under which a process counts as idle
const IDLE_CPU: f64 = 0.1;

/// Width of one mini graph in cells
pub const GRAPH_WIDTH: i32 = 5;

#[derive(Debug, Clone)]
pub struct GraphPool {
    graphs: HashMap<u64, Graph>,
    counters: HashMap<u64, u32>,
    sweep_interval: u32,
    ticks: u32,
}

impl Default for GraphPool {
    fn default() -> Self {
        Self::new(DEFAULT_SWEEP_INTERVAL)
    }
}

impl GraphPool {
    pub fn new(sweep_interval: u32) -> Self {
        GraphPool {
            graphs: HashMap::new(),
            counters: HashMap::new(),
            sweep_interval: sweep_interval.max(1),
            ticks: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }

    pub fn contains(&self, pid: u64) -> bool {
        self.graphs.contains_key(&pid)
    }

    pub fn has_counter(&self, pid: u64) -> bool {
        self.counters.contains_key(&pid)
    }

    /// Drop every graph; the next updates rebuild them with the current symbol
    pub fn clear(&mut self) {
        self.graphs.clear();
        self.counters.clear();
    }

    /// Update the graph of one visible process and return its output.
    ///
    /// Returns `None` while the process has no graph.
    pub fn update(
        &mut self,
        theme: &dyn Theme,
        proc: &ProcInfo,
        symbol: GraphSymbol,
        data_same: bool,
    ) -> Option<&str> {
        let pid = proc.pid;
        let created = !self.graphs.contains_key(&pid) && proc.cpu_p > 0.0;
        if created {
            let graph = Graph::new(
                theme,
                GRAPH_WIDTH,
                1,
                "",
                &Series::new(),
                symbol,
                GraphOptions::default(),
            );
            self.graphs.insert(pid, graph);
            self.counters.insert(pid, 0);
        }

        if data_same || !self.graphs.contains_key(&pid) {
            return self.graphs.get(&pid).map(Graph::output);
        }

        // A graph created this tick starts counting on the next one
        if !created {
            let counter = self.counters.entry(pid).or_insert(0);
            if proc.cpu_p < IDLE_CPU {
                *counter += 1;
                if *counter >= IDLE_SAMPLES {
                    trace!("dropping idle graph for pid {}", pid);
                    self.graphs.remove(&pid);
                    self.counters.remove(&pid);
                    return None;
                }
            } else {
                *counter = 0;
            }
        }

        let value = if (IDLE_CPU..5.0).contains(&proc.cpu_p) {
            5
        } else {
            proc.cpu_p.round() as i64
        };
        let sample: Series = std::iter::once(value).collect();
        if let Some(graph) = self.graphs.get_mut(&pid) {
            graph.append(theme, &sample, false);
        }

        self.graphs.get(&pid).map(Graph::output)
    }

    /// Count one tick and sweep when the interval is reached.
    ///
    /// Identical-data ticks are not counted. Returns whether a sweep ran.
    pub fn tick(&mut self, data_same: bool, live: &[ProcInfo]) -> bool {
        if data_same {
            return false;
        }
        self.ticks += 1;
        if self.ticks < self.sweep_interval {
            return false;
        }
        self.ticks = 0;
        let pids: HashSet<u64> = live.iter().map(|p| p.pid).collect();
        self.sweep(&pids);
        true
    }

    /// Drop graphs and counters of every pid not in `live`
    pub fn sweep(&mut self, live: &HashSet<u64>) {
        let before = self.graphs.len();
        self.graphs.retain(|pid, _| live.contains(pid));
        self.counters.retain(|pid, _| live.contains(pid));
        trace!(
            "graph pool sweep removed {} graphs",
            before - self.graphs.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::theme::DefaultTheme;

    fn proc(pid: u64, cpu_p: f64) -> ProcInfo {
        ProcInfo {
            pid,
            cpu_p,
            ..Default::default()
        }
    }

    #[test]
    fn test_created_on_first_activity() {
        let theme = DefaultTheme::default();
        let mut pool = GraphPool::default();
        assert!(pool.update(&theme, &proc(1, 0.0), GraphSymbol::Braille, false).is_none());
        assert!(pool.is_empty());
        assert!(pool.update(&theme, &proc(1, 12.0), GraphSymbol::Braille, false).is_some());
        assert!(pool.contains(1));
    }

    #[test]
    fn test_evicted_after_idle_samples() {
        let theme = DefaultTheme::default();
        let mut pool = GraphPool::default();
        pool.update(&theme, &proc(7, 50.0), GraphSymbol::Braille, false);
        for _ in 0..9 {
            assert!(pool.update(&theme, &proc(7, 0.0), GraphSymbol::Braille, false).is_some());
        }
        assert!(pool.update(&theme, &proc(7, 0.0), GraphSymbol::Braille, false).is_none());
        assert!(!pool.contains(7));
        assert!(!pool.has_counter(7));
    }

    #[test]
    fn test_activity_resets_idle_counter() {
        let theme = DefaultTheme::default();
        let mut pool = GraphPool::default();
        pool.update(&theme, &proc(7, 50.0), GraphSymbol::Braille, false);
        for _ in 0..9 {
            pool.update(&theme, &proc(7, 0.0), GraphSymbol::Braille, false);
        }
        pool.update(&theme, &proc(7, 3.0), GraphSymbol::Braille, false);
        for _ in 0..9 {
            pool.update(&theme, &proc(7, 0.0), GraphSymbol::Braille, false);
        }
        assert!(pool.contains(7));
    }

    #[test]
    fn test_identical_data_does_not_count() {
        let theme = DefaultTheme::default();
        let mut pool = GraphPool::default();
        pool.update(&theme, &proc(7, 50.0), GraphSymbol::Braille, false);
        let before = pool.update(&theme, &proc(7, 0.0), GraphSymbol::Braille, false).map(String::from);
        for _ in 0..20 {
            let out = pool.update(&theme, &proc(7, 0.0), GraphSymbol::Braille, true).map(String::from);
            assert_eq!(out, before);
        }
        assert!(pool.contains(7));
    }

    #[test]
    fn test_sweep_after_interval() {
        let theme = DefaultTheme::default();
        let mut pool = GraphPool::new(3);
        let live = vec![proc(1, 20.0), proc(2, 20.0)];
        for p in &live {
            pool.update(&theme, p, GraphSymbol::Braille, false);
        }
        let remaining = vec![proc(1, 20.0)];
        assert!(!pool.tick(false, &remaining));
        assert!(!pool.tick(true, &remaining));
        assert!(!pool.tick(false, &remaining));
        assert!(pool.contains(2));
        assert!(pool.tick(false, &remaining));
        assert!(pool.contains(1));
        assert!(!pool.contains(2));
        assert!(!pool.has_counter(2));
    }

    #[test]
    fn test_sweep_is_pure_over_pid_set() {
        let theme = DefaultTheme::default();
        let mut pool = GraphPool::default();
        for pid in 1..=5 {
            pool.update(&theme, &proc(pid, 10.0), GraphSymbol::Block, false);
        }
        let live: HashSet<u64> = [2, 4].into_iter().collect();
        pool.sweep(&live);
        assert_eq!(pool.len(), 2);
        for pid in [1, 3, 5] {
            assert!(!pool.contains(pid) && !pool.has_counter(pid));
        }
        pool.sweep(&HashSet::new());
        assert!(pool.is_empty());
    }
}
