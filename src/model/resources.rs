//! Resource vectors and per-dimension ceiling comparison.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single resource dimension that can be exhausted by a quota.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// CPU shares in MHz.
    Cpu,
    /// Reserved CPU cores.
    Cores,
    /// Memory in MB.
    Memory,
    /// Memory oversubscription ceiling in MB.
    MemoryMax,
    /// Ephemeral and task disk in MB.
    Disk,
    /// Network bandwidth in Mbits.
    Network,
    /// A named device or custom resource.
    Device(String),
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cpu => f.write_str("cpu"),
            Self::Cores => f.write_str("cores"),
            Self::Memory => f.write_str("memory"),
            Self::MemoryMax => f.write_str("memory_max"),
            Self::Disk => f.write_str("disk"),
            Self::Network => f.write_str("network"),
            Self::Device(name) => write!(f, "device:{name}"),
        }
    }
}

/// Aggregate resource vector.
///
/// The same type describes task requests, allocation footprints, consumed
/// quota usage and quota ceilings. Values are signed because a ceiling may be
/// negative: `0` leaves a dimension unlimited and a negative ceiling disallows
/// it entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resources {
    /// CPU shares in MHz.
    #[serde(default)]
    pub cpu: i64,
    /// Reserved CPU cores.
    #[serde(default)]
    pub cores: i64,
    /// Memory in MB.
    #[serde(default)]
    pub memory_mb: i64,
    /// Memory oversubscription ceiling in MB.
    #[serde(default)]
    pub memory_max_mb: i64,
    /// Disk in MB.
    #[serde(default)]
    pub disk_mb: i64,
    /// Network bandwidth in Mbits.
    #[serde(default)]
    pub network_mbits: i64,
    /// Custom named dimensions such as GPUs.
    #[serde(default)]
    pub devices: BTreeMap<String, i64>,
}

impl Resources {
    /// Create an empty resource vector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set CPU in MHz.
    #[must_use]
    pub fn with_cpu(mut self, cpu: i64) -> Self {
        self.cpu = cpu;
        self
    }

    /// Set reserved cores.
    #[must_use]
    pub fn with_cores(mut self, cores: i64) -> Self {
        self.cores = cores;
        self
    }

    /// Set memory in MB.
    #[must_use]
    pub fn with_memory_mb(mut self, memory_mb: i64) -> Self {
        self.memory_mb = memory_mb;
        self
    }

    /// Set the memory oversubscription ceiling in MB.
    #[must_use]
    pub fn with_memory_max_mb(mut self, memory_max_mb: i64) -> Self {
        self.memory_max_mb = memory_max_mb;
        self
    }

    /// Set disk in MB.
    #[must_use]
    pub fn with_disk_mb(mut self, disk_mb: i64) -> Self {
        self.disk_mb = disk_mb;
        self
    }

    /// Set network bandwidth in Mbits.
    #[must_use]
    pub fn with_network_mbits(mut self, network_mbits: i64) -> Self {
        self.network_mbits = network_mbits;
        self
    }

    /// Set a custom device dimension.
    #[must_use]
    pub fn with_device(mut self, name: impl Into<String>, count: i64) -> Self {
        self.devices.insert(name.into(), count);
        self
    }

    /// Add `other` into `self`, dimension by dimension.
    ///
    /// Sums saturate at the `i64` bounds, so an oversized total still compares
    /// as exceeding any positive ceiling.
    pub fn add(&mut self, other: &Self) {
        self.cpu = self.cpu.saturating_add(other.cpu);
        self.cores = self.cores.saturating_add(other.cores);
        self.memory_mb = self.memory_mb.saturating_add(other.memory_mb);
        self.memory_max_mb = self.memory_max_mb.saturating_add(other.memory_max_mb);
        self.disk_mb = self.disk_mb.saturating_add(other.disk_mb);
        self.network_mbits = self.network_mbits.saturating_add(other.network_mbits);
        for (name, count) in &other.devices {
            let current = self.devices.entry(name.clone()).or_insert(0);
            *current = current.saturating_add(*count);
        }
    }

    /// Subtract `other` from `self`. Consumed usage never drops below zero.
    pub fn subtract(&mut self, other: &Self) {
        fn sub(lhs: &mut i64, rhs: i64) {
            *lhs = lhs.saturating_sub(rhs).max(0);
        }
        sub(&mut self.cpu, other.cpu);
        sub(&mut self.cores, other.cores);
        sub(&mut self.memory_mb, other.memory_mb);
        sub(&mut self.memory_max_mb, other.memory_max_mb);
        sub(&mut self.disk_mb, other.disk_mb);
        sub(&mut self.network_mbits, other.network_mbits);
        for (name, count) in &other.devices {
            if let Some(current) = self.devices.get_mut(name) {
                sub(current, *count);
            }
        }
    }

    /// Treat `self` as a ceiling and list every dimension `proposed` exceeds.
    ///
    /// Devices missing from the ceiling are unlimited.
    pub fn exceeded_by(&self, proposed: &Self) -> Vec<Dimension> {
        let mut exceeded = Vec::new();
        let scalar = [
            (Dimension::Cpu, self.cpu, proposed.cpu),
            (Dimension::Cores, self.cores, proposed.cores),
            (Dimension::Memory, self.memory_mb, proposed.memory_mb),
            (Dimension::MemoryMax, self.memory_max_mb, proposed.memory_max_mb),
            (Dimension::Disk, self.disk_mb, proposed.disk_mb),
            (Dimension::Network, self.network_mbits, proposed.network_mbits),
        ];
        for (dimension, ceiling, value) in scalar {
            if exceeds(ceiling, value) {
                exceeded.push(dimension);
            }
        }
        for (name, value) in &proposed.devices {
            if let Some(ceiling) = self.devices.get(name) {
                if exceeds(*ceiling, *value) {
                    exceeded.push(Dimension::Device(name.clone()));
                }
            }
        }
        exceeded
    }
}

fn exceeds(ceiling: i64, value: i64) -> bool {
    match ceiling {
        0 => false,
        c if c < 0 => value > 0,
        c => value > c,
    }
}
