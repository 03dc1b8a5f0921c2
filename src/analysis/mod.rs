use serde::Serialize;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::body::BaseType;
use crate::simulation::Simulation;

/// Partition of the bond graph consumed by external reporting: chain lengths
/// over non-cell components, and cell counts keyed by cluster id (components
/// sharing an id are summed).
#[derive(Clone, Debug, Default, Serialize)]
pub struct ChainReport {
    pub chain_lengths: Vec<usize>,
    pub cluster_sizes: HashMap<u64, usize>,
}

pub fn chain_report(sim: &Simulation) -> ChainReport {
    let id_index = sim.id_index();
    let mut report = ChainReport::default();

    // Chains: connected components among non-cell bodies only.
    let mut visited: HashSet<u64> = HashSet::new();
    for (i, body) in sim.bodies().iter().enumerate() {
        if body.is_cell || visited.contains(&body.id) {
            continue;
        }
        let mut len = 0usize;
        let mut bonded = false;
        let mut queue = VecDeque::new();
        queue.push_back(i);
        visited.insert(body.id);
        while let Some(idx) = queue.pop_front() {
            len += 1;
            for &partner in &sim.bodies()[idx].bonds {
                bonded = true;
                let j = id_index[&partner];
                if !sim.bodies()[j].is_cell && visited.insert(partner) {
                    queue.push_back(j);
                }
            }
        }
        if bonded {
            report.chain_lengths.push(len);
        }
    }

    // Clusters: cells summed per cluster id.
    for body in sim.bodies() {
        if body.is_cell {
            if let Some(cid) = body.cluster_id {
                *report.cluster_sizes.entry(cid).or_insert(0) += 1;
            }
        }
    }

    report
}

/// Aggregate statistics for one frame, the read surface handed to external
/// reporting. Serializable so a run can be dumped for plotting elsewhere.
#[derive(Clone, Debug, Serialize)]
pub struct FrameStats {
    pub frame: usize,
    pub population: usize,
    pub cell_count: usize,
    pub mean_resources: f32,
    pub bond_events: u64,
    pub base_counts: HashMap<BaseType, usize>,
    pub chain_lengths: Vec<usize>,
    pub cluster_sizes: HashMap<u64, usize>,
}

pub struct StatsCollector {
    pub history: Vec<FrameStats>,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self {
            history: Vec::new(),
        }
    }

    pub fn record(&mut self, sim: &Simulation) {
        let mut base_counts: HashMap<BaseType, usize> = HashMap::new();
        let mut cell_count = 0usize;
        let mut total_resources = 0.0f32;
        for body in sim.bodies() {
            if body.is_cell {
                cell_count += 1;
            }
            if let Some(base) = body.base {
                *base_counts.entry(base).or_insert(0) += 1;
            }
            total_resources += body.resources;
        }
        let population = sim.len();
        let mean_resources = if population > 0 {
            total_resources / population as f32
        } else {
            0.0
        };
        let report = chain_report(sim);

        self.history.push(FrameStats {
            frame: sim.frame,
            population,
            cell_count,
            mean_resources,
            bond_events: sim.bond_events(),
            base_counts,
            chain_lengths: report.chain_lengths,
            cluster_sizes: report.cluster_sizes,
        });
    }

    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(writer, &self.history)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }
}

impl Default for StatsCollector {
    fn default() -> Self {
        Self::new()
    }
}
