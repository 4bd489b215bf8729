//! Settings module
//!
//! This module contains the user-configurable settings read by the drawing
//! core, and their `key=value` file format.

use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use bitflags::bitflags;
use thiserror::Error;
use tracing::{debug, warn};

/// Accepted values for `graph_symbol` and `graph_symbol_proc`
pub const GRAPH_SYMBOLS: &[&str] = &["default", "braille", "block", "tty"];

bitflags! {
    /// Set of panels shown on screen
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Boxes: u8 {
        const CPU = 1 << 0;
        const MEM = 1 << 1;
        const NET = 1 << 2;
        const PROC = 1 << 3;
    }
}

impl Boxes {
    /// Parse a space separated list such as "cpu mem net proc"
    pub fn parse(list: &str) -> Self {
        list.split_whitespace().fold(Boxes::empty(), |acc, name| {
            acc | match name {
                "cpu" => Boxes::CPU,
                "mem" => Boxes::MEM,
                "net" => Boxes::NET,
                "proc" => Boxes::PROC,
                _ => Boxes::empty(),
            }
        })
    }
}

/// Errors produced while parsing a settings value
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("invalid value {value:?} for setting {key}")]
    InvalidValue { key: String, value: String },
    #[error("unknown graph symbol {0:?}")]
    UnknownGraphSymbol(String),
}

/// Drawing settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub tty_mode: bool,
    pub lowcolor: bool,
    pub cpu_bottom: bool,
    pub mem_below_net: bool,
    pub proc_left: bool,
    pub show_disks: bool,
    pub swap_disk: bool,
    pub mem_graphs: bool,
    pub show_cpu_freq: bool,
    pub check_temp: bool,
    pub proc_tree: bool,
    pub proc_reversed: bool,
    pub proc_per_core: bool,
    pub proc_colors: bool,
    pub proc_gradient: bool,
    pub proc_filtering: bool,
    pub proc_mem_bytes: bool,
    pub show_detailed: bool,

    pub graph_symbol: String,
    pub graph_symbol_proc: String,
    pub proc_sorting: String,
    pub proc_filter: String,
    pub custom_cpu_name: String,
    pub shown_boxes: String,

    // Process list position, persisted across resizes
    pub proc_start: i32,
    pub proc_selected: i32,
    pub proc_last_selected: i32,
    pub detailed_pid: i32,

    /// Settings file path
    pub filename: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            tty_mode: false,
            lowcolor: false,
            cpu_bottom: false,
            mem_below_net: false,
            proc_left: false,
            show_disks: true,
            swap_disk: true,
            mem_graphs: true,
            show_cpu_freq: true,
            check_temp: true,
            proc_tree: false,
            proc_reversed: false,
            proc_per_core: false,
            proc_colors: true,
            proc_gradient: true,
            proc_filtering: false,
            proc_mem_bytes: true,
            show_detailed: false,
            graph_symbol: "braille".to_string(),
            graph_symbol_proc: "default".to_string(),
            proc_sorting: "cpu lazy".to_string(),
            proc_filter: String::new(),
            custom_cpu_name: String::new(),
            shown_boxes: "cpu mem net proc".to_string(),
            proc_start: 0,
            proc_selected: 0,
            proc_last_selected: 0,
            detailed_pid: 0,
            filename: None,
        }
    }
}

impl Settings {
    /// Create settings bound to the default config file
    pub fn new() -> Self {
        Settings {
            filename: Self::default_config_path(),
            ..Default::default()
        }
    }

    /// Get the default config file path
    fn default_config_path() -> Option<PathBuf> {
        if let Some(config_dir) = dirs_next::config_dir() {
            Some(config_dir.join("btop-rs").join("btop.conf"))
        } else {
            dirs_next::home_dir().map(|home| home.join(".config").join("btop-rs").join("btop.conf"))
        }
    }

    /// Parsed set of shown panels
    pub fn boxes(&self) -> Boxes {
        Boxes::parse(&self.shown_boxes)
    }

    /// Store the process list scroll/selection position
    pub fn set_proc_position(&mut self, start: i32, selected: i32, last_selected: i32) {
        self.proc_start = start;
        self.proc_selected = selected;
        self.proc_last_selected = last_selected;
    }

    /// Load settings from the config file
    pub fn load(&mut self) -> anyhow::Result<()> {
        let path = match &self.filename {
            Some(p) => p.clone(),
            None => return Ok(()),
        };

        if !path.exists() {
            debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(());
        }

        let file = fs::File::open(&path)?;
        let reader = BufReader::new(file);

        for line in reader.lines() {
            let line = line?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let value = value.trim().trim_matches('"');
                if let Err(e) = self.parse_setting(key.trim(), value) {
                    warn!("{}: {}", path.display(), e);
                }
            }
        }

        Ok(())
    }

    /// Parse a single setting line
    pub fn parse_setting(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        let flag = |v: &str| match v {
            "1" | "true" | "True" => Ok(true),
            "0" | "false" | "False" => Ok(false),
            _ => Err(SettingsError::InvalidValue {
                key: key.to_string(),
                value: v.to_string(),
            }),
        };
        let int = |v: &str| {
            v.parse::<i32>().map_err(|_| SettingsError::InvalidValue {
                key: key.to_string(),
                value: v.to_string(),
            })
        };
        let symbol = |v: &str| {
            if GRAPH_SYMBOLS.contains(&v) {
                Ok(v.to_string())
            } else {
                Err(SettingsError::UnknownGraphSymbol(v.to_string()))
            }
        };

        match key {
            "tty_mode" => self.tty_mode = flag(value)?,
            "lowcolor" => self.lowcolor = flag(value)?,
            "cpu_bottom" => self.cpu_bottom = flag(value)?,
            "mem_below_net" => self.mem_below_net = flag(value)?,
            "proc_left" => self.proc_left = flag(value)?,
            "show_disks" => self.show_disks = flag(value)?,
            "swap_disk" => self.swap_disk = flag(value)?,
            "mem_graphs" => self.mem_graphs = flag(value)?,
            "show_cpu_freq" => self.show_cpu_freq = flag(value)?,
            "check_temp" => self.check_temp = flag(value)?,
            "proc_tree" => self.proc_tree = flag(value)?,
            "proc_reversed" => self.proc_reversed = flag(value)?,
            "proc_per_core" => self.proc_per_core = flag(value)?,
            "proc_colors" => self.proc_colors = flag(value)?,
            "proc_gradient" => self.proc_gradient = flag(value)?,
            "proc_mem_bytes" => self.proc_mem_bytes = flag(value)?,
            "show_detailed" => self.show_detailed = flag(value)?,
            "graph_symbol" => self.graph_symbol = symbol(value)?,
            "graph_symbol_proc" => self.graph_symbol_proc = symbol(value)?,
            "proc_sorting" => self.proc_sorting = value.to_string(),
            "proc_filter" => self.proc_filter = value.to_string(),
            "custom_cpu_name" => self.custom_cpu_name = value.to_string(),
            "shown_boxes" => self.shown_boxes = value.to_string(),
            "proc_start" => self.proc_start = int(value)?.max(0),
            "proc_selected" => self.proc_selected = int(value)?.max(0),
            "proc_last_selected" => self.proc_last_selected = int(value)?.max(0),
            "detailed_pid" => self.detailed_pid = int(value)?.max(0),
            _ => {}
        }
        Ok(())
    }

    /// Write settings to the config file
    pub fn write(&self) -> anyhow::Result<()> {
        let path = match &self.filename {
            Some(p) => p.clone(),
            None => return Ok(()),
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let b = |v: bool| if v { "true" } else { "false" };
        let mut file = fs::File::create(&path)?;
        writeln!(file, "# Beware: this file is rewritten on exit")?;
        writeln!(file, "tty_mode={}", b(self.tty_mode))?;
        writeln!(file, "lowcolor={}", b(self.lowcolor))?;
        writeln!(file, "cpu_bottom={}", b(self.cpu_bottom))?;
        writeln!(file, "mem_below_net={}", b(self.mem_below_net))?;
        writeln!(file, "proc_left={}", b(self.proc_left))?;
        writeln!(file, "show_disks={}", b(self.show_disks))?;
        writeln!(file, "swap_disk={}", b(self.swap_disk))?;
        writeln!(file, "mem_graphs={}", b(self.mem_graphs))?;
        writeln!(file, "show_cpu_freq={}", b(self.show_cpu_freq))?;
        writeln!(file, "check_temp={}", b(self.check_temp))?;
        writeln!(file, "proc_tree={}", b(self.proc_tree))?;
        writeln!(file, "proc_reversed={}", b(self.proc_reversed))?;
        writeln!(file, "proc_per_core={}", b(self.proc_per_core))?;
        writeln!(file, "proc_colors={}", b(self.proc_colors))?;
        writeln!(file, "proc_gradient={}", b(self.proc_gradient))?;
        writeln!(file, "proc_mem_bytes={}", b(self.proc_mem_bytes))?;
        writeln!(file, "show_detailed={}", b(self.show_detailed))?;
        writeln!(file, "graph_symbol={}", self.graph_symbol)?;
        writeln!(file, "graph_symbol_proc={}", self.graph_symbol_proc)?;
        writeln!(file, "proc_sorting={}", self.proc_sorting)?;
        writeln!(file, "proc_filter={}", self.proc_filter)?;
        writeln!(file, "custom_cpu_name={}", self.custom_cpu_name)?;
        writeln!(file, "shown_boxes={}", self.shown_boxes)?;
        writeln!(file, "proc_start={}", self.proc_start)?;
        writeln!(file, "proc_selected={}", self.proc_selected)?;
        writeln!(file, "proc_last_selected={}", self.proc_last_selected)?;
        writeln!(file, "detailed_pid={}", self.detailed_pid)?;

        Ok(())
    }
}
