use super::{GlDriver, COLOR_BUFFER_BIT, DEPTH_BUFFER_BIT, STENCIL_BUFFER_BIT};
use crate::core::{DriverError, DriverResult};
use std::collections::HashSet;

/// One forwarded driver call, in the order it was received.
#[derive(Debug, Clone, PartialEq)]
pub enum DriverCall {
    ClearColor {
        red: f32,
        green: f32,
        blue: f32,
        alpha: f32,
    },
    Clear {
        mask: u32,
    },
    GenVertexArrays {
        ids: Vec<u32>,
    },
}

/// Contents of the default framebuffer after the last clears.
#[derive(Debug, Clone, PartialEq)]
pub struct FramebufferState {
    pub color: [f32; 4],
    pub depth: f32,
    pub stencil: i32,
    pub color_clears: u64,
    pub depth_clears: u64,
    pub stencil_clears: u64,
}

impl Default for FramebufferState {
    fn default() -> Self {
        Self {
            color: [0.0, 0.0, 0.0, 0.0],
            depth: 1.0,
            stencil: 0,
            color_clears: 0,
            depth_clears: 0,
            stencil_clears: 0,
        }
    }
}

/// In-memory driver used by tests, benches and the host demo loop.
///
/// Vertex-array names come from a counter starting at 1; name 0 is
/// reserved, as in GL, and never handed out.
#[derive(Debug)]
pub struct HeadlessDriver {
    clear_color: [f32; 4],
    framebuffer: FramebufferState,
    next_vertex_array: u64,
    reserved: HashSet<u32>,
    calls: Vec<DriverCall>,
    record_calls: bool,
}

impl Default for HeadlessDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessDriver {
    pub fn new() -> Self {
        Self {
            clear_color: [0.0, 0.0, 0.0, 0.0],
            framebuffer: FramebufferState::default(),
            next_vertex_array: 1,
            reserved: HashSet::new(),
            calls: Vec::new(),
            record_calls: true,
        }
    }

    /// Stop recording calls; for long-running loops.
    pub fn without_call_log(mut self) -> Self {
        self.record_calls = false;
        self
    }

    /// Start handing out names from `next`; lets tests exercise exhaustion.
    pub fn with_next_vertex_array(mut self, next: u32) -> Self {
        self.next_vertex_array = u64::from(next.max(1));
        self
    }

    pub fn active_clear_color(&self) -> [f32; 4] {
        self.clear_color
    }

    pub fn framebuffer(&self) -> &FramebufferState {
        &self.framebuffer
    }

    pub fn calls(&self) -> &[DriverCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<DriverCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn reserved_vertex_arrays(&self) -> usize {
        self.reserved.len()
    }

    pub fn is_vertex_array(&self, id: u32) -> bool {
        self.reserved.contains(&id)
    }

    /// Release names previously returned by `gen_vertex_arrays`.
    /// Unknown names and 0 are silently ignored.
    pub fn delete_vertex_arrays(&mut self, ids: &[u32]) {
        for id in ids {
            self.reserved.remove(id);
        }
    }

    fn record(&mut self, call: DriverCall) {
        if self.record_calls {
            self.calls.push(call);
        }
    }
}

impl GlDriver for HeadlessDriver {
    fn clear_color(&mut self, red: f32, green: f32, blue: f32, alpha: f32) {
        self.clear_color = [red, green, blue, alpha];
        self.record(DriverCall::ClearColor {
            red,
            green,
            blue,
            alpha,
        });
    }

    fn clear(&mut self, mask: u32) {
        if mask & COLOR_BUFFER_BIT != 0 {
            self.framebuffer.color = self.clear_color;
            self.framebuffer.color_clears += 1;
        }
        if mask & DEPTH_BUFFER_BIT != 0 {
            self.framebuffer.depth = 1.0;
            self.framebuffer.depth_clears += 1;
        }
        if mask & STENCIL_BUFFER_BIT != 0 {
            self.framebuffer.stencil = 0;
            self.framebuffer.stencil_clears += 1;
        }
        self.record(DriverCall::Clear { mask });
    }

    fn gen_vertex_arrays(&mut self, ids: &mut [u32]) -> DriverResult<()> {
        let available = u64::from(u32::MAX) + 1 - self.next_vertex_array;
        if ids.len() as u64 > available {
            return Err(DriverError::Allocation(format!(
                "vertex array names exhausted, {} requested",
                ids.len()
            )));
        }

        for slot in ids.iter_mut() {
            let id = self.next_vertex_array as u32;
            self.next_vertex_array += 1;
            self.reserved.insert(id);
            *slot = id;
        }
        self.record(DriverCall::GenVertexArrays { ids: ids.to_vec() });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_uses_active_color() {
        let mut driver = HeadlessDriver::new();
        driver.clear_color(1.0, 0.0, 0.0, 1.0);
        driver.clear(COLOR_BUFFER_BIT | DEPTH_BUFFER_BIT);

        let fb = driver.framebuffer();
        assert_eq!(fb.color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(fb.color_clears, 1);
        assert_eq!(fb.depth_clears, 1);
        assert_eq!(fb.stencil_clears, 0);
    }

    #[test]
    fn test_clear_color_alone_leaves_framebuffer() {
        let mut driver = HeadlessDriver::new();
        driver.clear_color(0.5, 0.5, 0.5, 1.0);
        assert_eq!(driver.framebuffer().color, [0.0, 0.0, 0.0, 0.0]);
        assert_eq!(driver.active_clear_color(), [0.5, 0.5, 0.5, 1.0]);
    }

    #[test]
    fn test_gen_vertex_arrays_distinct_nonzero() {
        let mut driver = HeadlessDriver::new();
        let mut first = [0u32; 3];
        let mut second = [0u32; 2];
        driver.gen_vertex_arrays(&mut first).unwrap();
        driver.gen_vertex_arrays(&mut second).unwrap();

        assert_eq!(first, [1, 2, 3]);
        assert_eq!(second, [4, 5]);
        assert_eq!(driver.reserved_vertex_arrays(), 5);
    }

    #[test]
    fn test_without_call_log() {
        let mut driver = HeadlessDriver::new().without_call_log();
        driver.clear(STENCIL_BUFFER_BIT);
        assert!(driver.calls().is_empty());
        assert_eq!(driver.framebuffer().stencil_clears, 1);
    }

    #[test]
    fn test_delete_vertex_arrays() {
        let mut driver = HeadlessDriver::new();
        let mut ids = [0u32; 2];
        driver.gen_vertex_arrays(&mut ids).unwrap();
        driver.delete_vertex_arrays(&[ids[0], 0, 99]);

        assert!(!driver.is_vertex_array(ids[0]));
        assert!(driver.is_vertex_array(ids[1]));
    }

    #[test]
    fn test_gen_vertex_arrays_exhaustion() {
        let mut driver = HeadlessDriver::new().with_next_vertex_array(u32::MAX - 1);
        let mut ok = [0u32; 2];
        driver.gen_vertex_arrays(&mut ok).unwrap();
        assert_eq!(ok, [u32::MAX - 1, u32::MAX]);

        let mut more = [0u32; 1];
        assert!(driver.gen_vertex_arrays(&mut more).is_err());
    }
}
