//! Memory and network panels
//!
//! Both only emit their cached frame; the panel bodies are not drawn yet.

use super::crt::mv;
use super::layout::{MemLayout, NetLayout};
use super::panel::PanelGeometry;
use crate::core::{MemInfo, NetInfo};

fn frame_only(geometry: &mut PanelGeometry, force_redraw: bool) -> String {
    let mut out = mv::to(0, 0);
    if let Some(frame) = geometry.take_redraw(force_redraw) {
        out.push_str(frame);
    }
    out
}

#[derive(Debug, Clone, Default)]
pub struct MemPanel {
    pub layout: MemLayout,
}

impl MemPanel {
    pub fn draw(&mut self, _mem: &MemInfo, force_redraw: bool, _data_same: bool) -> String {
        frame_only(&mut self.layout.geometry, force_redraw)
    }
}

#[derive(Debug, Clone, Default)]
pub struct NetPanel {
    pub layout: NetLayout,
}

impl NetPanel {
    pub fn draw(&mut self, _net: &NetInfo, force_redraw: bool, _data_same: bool) -> String {
        frame_only(&mut self.layout.geometry, force_redraw)
    }
}
