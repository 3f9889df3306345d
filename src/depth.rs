use log::info;

#[allow(unused_imports)]
use crate::RbMap;

/// Depth tracks the distribution of leaf depths in an [`RbMap`] tree.
/// A leaf here is a sentinel link hanging from a node, so an empty map
/// has a single leaf at depth zero and a map with `n` entries has `n + 1`
/// leaves.
#[derive(Clone, Debug, Default)]
pub struct Depth {
    samples: usize,
    min: usize,
    max: usize,
    total: usize,
    histogram: Vec<u64>, // histogram[depth] = number of leaves
}

impl Depth {
    pub(crate) fn new() -> Depth {
        Default::default()
    }

    pub(crate) fn sample(&mut self, depth: usize) {
        if self.samples == 0 {
            self.min = depth;
            self.max = depth;
        } else {
            self.min = self.min.min(depth);
            self.max = self.max.max(depth);
        }
        if self.histogram.len() <= depth {
            self.histogram.resize(depth + 1, 0);
        }
        self.histogram[depth] += 1;
        self.samples += 1;
        self.total += depth;
    }

    /// Return number of leaves sampled.
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Return depth of the shallowest leaf.
    pub fn min(&self) -> usize {
        self.min
    }

    /// Return depth of the deepest leaf.
    pub fn max(&self) -> usize {
        self.max
    }

    /// Return the average leaf depth, rounded down.
    pub fn mean(&self) -> usize {
        match self.samples {
            0 => 0,
            n => self.total / n,
        }
    }

    /// Return the smallest depth such that at least `perc` percent of
    /// leaves sit at or above it.
    pub fn percentile(&self, perc: u8) -> usize {
        let want = (self.samples as u64 * u64::from(perc.min(100)) + 99) / 100;
        let mut acc = 0_u64;
        for (depth, n) in self.histogram.iter().enumerate() {
            acc += n;
            if acc >= want && acc > 0 {
                return depth;
            }
        }
        self.max
    }

    /// Return (percentile, depth) tuples for percentiles 90 to 99.
    pub fn percentiles(&self) -> Vec<(u8, usize)> {
        (90..100).map(|p| (p, self.percentile(p))).collect()
    }

    /// Log depth statistics in human readable format.
    pub fn pretty_print(&self, prefix: &str) {
        info!(
            "{}depth (min, avg, max): {:?}",
            prefix,
            (self.min, self.mean(), self.max)
        );
        for (perc, depth) in self.percentiles().into_iter() {
            info!("{}  {} percentile = {}", prefix, perc, depth);
        }
    }

    /// Convert depth statistics to JSON format, useful for plotting.
    pub fn json(&self) -> String {
        let ps: Vec<String> = self
            .percentiles()
            .into_iter()
            .map(|(p, d)| format!("\"{}\": {}", p, d))
            .collect();
        format!(
            "{{ \"min\": {}, \"mean\": {}, \"max\": {}, \"percentiles\": {{ {} }} }}",
            self.min,
            self.mean(),
            self.max,
            ps.join(", ")
        )
    }
}
