//! UI module
//!
//! This module contains all drawing components:
//! - CRT: escape sequences, terminal size and mouse regions
//! - Symbols: box drawing characters and graph glyph tables
//! - Theme: named colors and gradients
//! - RowPrint: width aware text fitting and number formatting
//! - Meter, Graph, TextEdit: the widgets
//! - BoxFrame, Panel, Layout: panel placement and frames
//! - CpuPanel, ProcPanel, MemPanel, NetPanel: the four panels
//! - ScreenManager: owns the panels and the render context

mod box_frame;
mod cpu_panel;
mod crt;
mod graph;
mod graph_pool;
mod layout;
mod meter;
mod panel;
mod proc_panel;
mod row_print;
mod screen_manager;
mod selection;
mod stub_panels;
pub mod symbols;
mod text_edit;
mod theme;

pub use box_frame::*;
pub use cpu_panel::*;
pub use crt::*;
pub use graph::*;
pub use graph_pool::*;
pub use layout::*;
pub use meter::*;
pub use panel::*;
pub use proc_panel::*;
pub use row_print::*;
pub use screen_manager::*;
pub use selection::*;
pub use stub_panels::*;
pub use text_edit::*;
pub use theme::*;
