use std::ops::ControlFlow;
use std::time::{Duration, Instant};

/// Fixed-rate frame loop.
///
/// Calls the frame callback once per tick and sleeps away whatever is
/// left of the frame budget. A frame that overruns its budget is not
/// compensated for; the next one simply starts late.
pub struct MainLoop {
    frame_time: Duration,
    frame: u64,
}

impl MainLoop {
    pub fn new(frame_rate: u32) -> Self {
        let frame_rate = frame_rate.max(1);
        Self {
            frame_time: Duration::from_secs(1) / frame_rate,
            frame: 0,
        }
    }

    pub fn frame_time(&self) -> Duration {
        self.frame_time
    }

    /// Frames completed so far.
    pub fn frames(&self) -> u64 {
        self.frame
    }

    /// Run until the callback breaks; returns the break value.
    pub fn run<B, F>(&mut self, mut on_frame: F) -> B
    where
        F: FnMut(u64) -> ControlFlow<B>,
    {
        loop {
            let started = Instant::now();
            let flow = on_frame(self.frame);
            self.frame += 1;

            if let ControlFlow::Break(value) = flow {
                tracing::debug!(target: "host", frames = self.frame, "Main loop stopped");
                return value;
            }

            if let Some(rest) = self.frame_time.checked_sub(started.elapsed()) {
                std::thread::sleep(rest);
            }
        }
    }
}
