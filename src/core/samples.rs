//! Sample types handed to the panels by the data collector
//!
//! The collector owns every series; panels only borrow them for the duration
//! of one draw call.

use std::collections::{BTreeMap, VecDeque};

/// Append-only sample stream for one metric
pub type Series = VecDeque<i64>;

/// Static facts about the machine, needed by the layout solver
#[derive(Debug, Clone)]
pub struct SystemInfo {
    /// Number of logical cores
    pub core_count: usize,
    /// Detected CPU model name
    pub cpu_name: String,
    /// Whether temperature sensors were found
    pub has_sensors: bool,
    /// Whether the machine has swap configured
    pub has_swap: bool,
}

impl Default for SystemInfo {
    fn default() -> Self {
        SystemInfo {
            core_count: 1,
            cpu_name: String::new(),
            has_sensors: false,
            has_swap: false,
        }
    }
}

/// CPU samples
#[derive(Debug, Clone, Default)]
pub struct CpuInfo {
    /// Aggregate percentages by name ("total", "user", "system", ...)
    pub cpu_percent: BTreeMap<String, Series>,
    /// One percentage series per core
    pub core_percent: Vec<Series>,
    /// Latest temperatures in degrees Celsius, package first and then one per
    /// core; empty without sensors
    pub temps: Vec<i64>,
    /// Current frequency as a display string, e.g. "3.4 GHz"
    pub frequency: String,
}

impl CpuInfo {
    /// The "total" series, if the collector provided one
    pub fn total(&self) -> Option<&Series> {
        self.cpu_percent.get("total")
    }
}

/// Memory samples (not drawn by the memory panel stub)
#[derive(Debug, Clone, Default)]
pub struct MemInfo {
    pub stats: BTreeMap<String, u64>,
    pub percent: BTreeMap<String, Series>,
}

/// Network samples (not drawn by the network panel stub)
#[derive(Debug, Clone, Default)]
pub struct NetInfo {
    pub bandwidth: BTreeMap<String, Series>,
}

/// One row of the process list
#[derive(Debug, Clone, Default)]
pub struct ProcInfo {
    pub pid: u64,
    pub name: String,
    pub cmd: String,
    pub user: String,
    /// Tree indentation, already rendered by the collector (empty in flat view)
    pub prefix: String,
    /// CPU usage in percent of one core
    pub cpu_p: f64,
    /// Core the process last ran on
    pub cpu_n: usize,
    /// Resident memory in bytes
    pub mem: u64,
    pub threads: u64,
    pub p_nice: i64,
    pub ppid: u64,
}

/// Process state as shown in the detailed view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcStatus {
    #[default]
    Running,
    Sleeping,
    Waiting,
    Zombie,
    Stopped,
    Dead,
}

impl ProcStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ProcStatus::Running => "Running",
            ProcStatus::Sleeping => "Sleeping",
            ProcStatus::Waiting => "Waiting",
            ProcStatus::Zombie => "Zombie",
            ProcStatus::Stopped => "Stopped",
            ProcStatus::Dead => "Dead",
        }
    }

    pub fn is_alive(self) -> bool {
        self != ProcStatus::Dead
    }
}

/// Extra information about the inspected process
#[derive(Debug, Clone, Default)]
pub struct DetailedInfo {
    /// Pid the record was last collected for
    pub last_pid: u64,
    pub entry: ProcInfo,
    pub status: ProcStatus,
    pub elapsed: String,
    pub parent: String,
    pub io_read: String,
    pub io_write: String,
    /// Humanized current memory usage
    pub memory: String,
    pub cpu_percent: Series,
    pub mem_bytes: Series,
    /// Memory usage when the process was first inspected
    pub first_mem: i64,
}

/// Everything the process panel needs for one tick
#[derive(Debug, Clone, Default)]
pub struct ProcSnapshot {
    /// Filtered and sorted process list, in display order
    pub processes: Vec<ProcInfo>,
    /// Total physical memory in bytes
    pub total_mem: u64,
    pub detailed: Option<DetailedInfo>,
}
