//! Frame driver. Knows nothing about brands or scenes; it only calls
//! `update` then `draw` once per frame until stopped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Longest delta handed to `update`, so a stall does not produce a jump.
pub const MAX_FRAME_DELTA: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    /// 0 for the first frame
    pub frame: u64,
    /// Time since the previous frame, clamped to `MAX_FRAME_DELTA`
    pub dt: Duration,
}

/// Stops a running loop from anywhere (another thread, or inside `update`).
#[derive(Debug, Clone)]
pub struct StopHandle {
    running: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        !self.running.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct RenderLoop {
    running: Arc<AtomicBool>,
    frame: u64,
    last: Option<Instant>,
    frame_interval: Duration,
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self::new(Duration::from_micros(16_667))
    }
}

impl RenderLoop {
    pub fn new(frame_interval: Duration) -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
            frame: 0,
            last: None,
            frame_interval,
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            running: self.running.clone(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Frames run so far.
    pub fn frames(&self) -> u64 {
        self.frame
    }

    /// Run one frame. Returns false, without calling anything, once stopped.
    pub fn tick<U, D>(&mut self, mut update: U, mut draw: D) -> bool
    where
        U: FnMut(&FrameInfo),
        D: FnMut(&FrameInfo),
    {
        if !self.is_running() {
            return false;
        }
        let now = Instant::now();
        let dt = self
            .last
            .map_or(Duration::ZERO, |last| now.duration_since(last).min(MAX_FRAME_DELTA));
        self.last = Some(now);

        let info = FrameInfo {
            frame: self.frame,
            dt,
        };
        update(&info);
        draw(&info);
        self.frame += 1;
        true
    }

    /// Tick at the frame interval until a `StopHandle` fires. Blocks the
    /// calling thread.
    pub fn start<U, D>(&mut self, mut update: U, mut draw: D)
    where
        U: FnMut(&FrameInfo),
        D: FnMut(&FrameInfo),
    {
        log::debug!("Render loop started ({:?} per frame)", self.frame_interval);
        loop {
            let frame_start = Instant::now();
            if !self.tick(&mut update, &mut draw) {
                break;
            }
            if let Some(rest) = self.frame_interval.checked_sub(frame_start.elapsed()) {
                std::thread::sleep(rest);
            }
        }
        log::debug!("Render loop stopped after {} frames", self.frame);
    }
}
