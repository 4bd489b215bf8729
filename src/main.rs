//! btop-rs - renders frames of a synthetic system monitor
//!
//! The binary drives the drawing core with a deterministic collector and
//! writes the escape stream to stdout, one frame per tick.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Result};
use chrono::NaiveTime;
use clap::{ArgAction, Parser};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use btop_rs::core::{
    CpuInfo, DetailedInfo, MemInfo, NetInfo, ProcInfo, ProcSnapshot, ProcStatus, Series, Settings,
    SystemInfo,
};
use btop_rs::ui::{floating_humanizer, min_size, DefaultTheme, FrameData, ScreenManager, TermSize};

/// Samples kept per series
const HISTORY: usize = 256;

/// Seconds between two synthetic samples
const TICK_SECONDS: u32 = 2;

/// btop-rs - render a synthetic system monitor
#[derive(Parser, Debug)]
#[command(name = "btop-rs", version)]
struct Args {
    /// Number of frames to render
    #[arg(short = 'n', long = "frames", default_value_t = 1)]
    frames: u32,

    /// Terminal width in columns
    #[arg(long = "width", default_value_t = 120)]
    width: i32,

    /// Terminal height in rows
    #[arg(long = "height", default_value_t = 40)]
    height: i32,

    /// Shown panels, e.g. "cpu proc"
    #[arg(short = 'b', long = "boxes", value_name = "BOXES")]
    boxes: Option<String>,

    /// Use the tty graph symbols and square corners
    #[arg(long = "tty")]
    tty: bool,

    /// Show the process tree
    #[arg(short = 't', long = "tree")]
    tree: bool,

    /// Open the detailed view for PID
    #[arg(short = 'd', long = "detailed", value_name = "PID")]
    detailed: Option<u64>,

    /// Settings file to load instead of the default one
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase log verbosity (logs go to stderr)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

/// Deterministic stand-in for a data collector
struct Synthetic {
    tick: u64,
    cores: usize,
    processes: usize,
    tree: bool,
    total_mem: u64,
    cpu: CpuInfo,
    detailed: Option<DetailedInfo>,
}

impl Synthetic {
    fn new(cores: usize, processes: usize, tree: bool, detailed_pid: Option<u64>) -> Self {
        Synthetic {
            tick: 0,
            cores,
            processes,
            tree,
            total_mem: 16 << 30,
            cpu: CpuInfo {
                core_percent: vec![Series::new(); cores],
                frequency: "3.4 GHz".to_string(),
                ..Default::default()
            },
            detailed: detailed_pid.map(|pid| DetailedInfo {
                last_pid: pid,
                ..Default::default()
            }),
        }
    }

    /// Smooth pseudo load in 0..=100 for a given phase
    fn wave(&self, phase: f64) -> i64 {
        let t = self.tick as f64 * 0.35 + phase;
        (50.0 + 30.0 * t.sin() + 15.0 * (t * 2.7).cos()).round().clamp(0.0, 100.0) as i64
    }

    fn push(series: &mut Series, value: i64) {
        series.push_back(value);
        while series.len() > HISTORY {
            series.pop_front();
        }
    }

    fn elapsed(&self) -> String {
        let secs = (self.tick as u32).saturating_mul(TICK_SECONDS) % 86_400;
        NaiveTime::from_num_seconds_from_midnight_opt(secs, 0)
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_default()
    }

    fn process(&self, pid: u64) -> ProcInfo {
        let load = self.wave(pid as f64 * 1.7);
        let cpu_p = if pid % 3 == 0 { 0.0 } else { load as f64 / 4.0 };
        let depth = if self.tree { (pid.saturating_sub(1) % 3) as usize } else { 0 };
        ProcInfo {
            pid,
            name: format!("worker-{}", pid),
            cmd: format!("/usr/libexec/worker-{} --id {}", pid, pid),
            user: if pid % 2 == 0 { "root" } else { "monitor" }.to_string(),
            prefix: if depth > 0 {
                format!("{}├─ ", "  ".repeat(depth - 1))
            } else {
                String::new()
            },
            cpu_p,
            cpu_n: pid as usize % self.cores.max(1),
            mem: (pid * 37 % 512 + 16) << 20,
            threads: pid % 9 + 1,
            p_nice: 0,
            ppid: if depth > 0 { pid - 1 } else { 0 },
        }
    }

    /// Advance one tick and return the new samples
    fn sample(&mut self) -> (&CpuInfo, ProcSnapshot) {
        self.tick += 1;
        let total = self.wave(0.0);
        let cores: Vec<i64> = (0..self.cores).map(|n| self.wave(n as f64)).collect();
        Self::push(
            self.cpu.cpu_percent.entry("total".to_string()).or_default(),
            total,
        );
        for (series, value) in self.cpu.core_percent.iter_mut().zip(cores) {
            Self::push(series, value);
        }

        let processes: Vec<ProcInfo> = (1..=self.processes as u64).map(|pid| self.process(pid)).collect();

        let elapsed = self.elapsed();
        let total_mem = self.total_mem;
        let entry = self
            .detailed
            .as_ref()
            .and_then(|d| processes.iter().find(|p| p.pid == d.last_pid).cloned());
        if let Some(info) = self.detailed.as_mut() {
            match entry {
                Some(entry) => {
                    Self::push(&mut info.cpu_percent, entry.cpu_p.round() as i64);
                    Self::push(&mut info.mem_bytes, entry.mem as i64);
                    if info.first_mem == 0 {
                        info.first_mem = entry.mem as i64 * 2;
                    }
                    info.memory = floating_humanizer(entry.mem, false);
                    info.status = if entry.cpu_p > 0.0 {
                        ProcStatus::Running
                    } else {
                        ProcStatus::Sleeping
                    };
                    info.parent = if entry.ppid > 0 {
                        format!("worker-{}", entry.ppid)
                    } else {
                        "init".to_string()
                    };
                    info.io_read = floating_humanizer(self.tick * 4096, true);
                    info.io_write = floating_humanizer(self.tick * 1024, true);
                    info.elapsed = elapsed;
                    info.entry = entry;
                }
                None => info.status = ProcStatus::Dead,
            }
        }

        let snapshot = ProcSnapshot {
            processes,
            total_mem,
            detailed: self.detailed.clone(),
        };
        (&self.cpu, snapshot)
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut settings = match args.config {
        Some(ref path) => Settings {
            filename: Some(path.clone()),
            ..Default::default()
        },
        None => Settings::new(),
    };
    if let Err(e) = settings.load() {
        warn!("Failed to load settings: {}", e);
    }

    // Apply command line arguments
    if let Some(boxes) = args.boxes {
        settings.shown_boxes = boxes;
    }
    if args.tty {
        settings.tty_mode = true;
    }
    if args.tree {
        settings.proc_tree = true;
    }
    if let Some(pid) = args.detailed {
        settings.show_detailed = true;
        settings.detailed_pid = i32::try_from(pid).unwrap_or(0);
    }

    let term = TermSize {
        width: args.width,
        height: args.height,
    };
    let (min_width, min_height) = min_size(settings.boxes());
    if term.width < min_width || term.height < min_height {
        bail!(
            "terminal size {}x{} is below the minimum of {}x{}",
            term.width,
            term.height,
            min_width,
            min_height
        );
    }

    let system = SystemInfo {
        core_count: 8,
        cpu_name: "Synthetic CPU".to_string(),
        has_sensors: false,
        has_swap: true,
    };
    let theme = Box::new(DefaultTheme::new(settings.lowcolor));
    let mut screen = ScreenManager::new(settings, theme, term, system.clone());
    let mut collector = Synthetic::new(system.core_count, 60, args.tree, args.detailed);
    let (mem, net) = (MemInfo::default(), NetInfo::default());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for frame in 0..args.frames {
        let (cpu, proc) = collector.sample();
        let data = FrameData {
            cpu,
            mem: &mem,
            net: &net,
            proc: &proc,
        };
        let rendered = screen.draw_all(data, frame == 0, false);
        debug!("frame {}: {} bytes", frame, rendered.len());
        out.write_all(rendered.as_bytes())?;
        out.flush()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_is_deterministic() {
        let mut a = Synthetic::new(4, 10, false, None);
        let mut b = Synthetic::new(4, 10, false, None);
        for _ in 0..5 {
            let (cpu_a, proc_a) = a.sample();
            let total_a = cpu_a.total().cloned();
            let (cpu_b, proc_b) = b.sample();
            assert_eq!(total_a, cpu_b.total().cloned());
            assert_eq!(proc_a.processes.len(), proc_b.processes.len());
        }
    }

    #[test]
    fn test_detailed_tracks_history() {
        let mut collector = Synthetic::new(2, 5, false, Some(4));
        for _ in 0..3 {
            collector.sample();
        }
        let (_, snap) = collector.sample();
        let info = snap.detailed.unwrap();
        assert_eq!(info.entry.pid, 4);
        assert_eq!(info.mem_bytes.len(), 4);
        assert_eq!(info.elapsed, "00:00:08");
    }

    #[test]
    fn test_missing_detailed_pid_is_dead() {
        let mut collector = Synthetic::new(2, 5, false, Some(99));
        let (_, snap) = collector.sample();
        assert_eq!(snap.detailed.map(|d| d.status), Some(ProcStatus::Dead));
    }

    #[test]
    fn test_tree_prefixes() {
        let collector = Synthetic::new(2, 5, true, None);
        assert!(collector.process(1).prefix.is_empty());
        assert_eq!(collector.process(2).prefix, "├─ ");
        assert_eq!(collector.process(3).prefix, "  ├─ ");
    }
}
