//! Frame rate averaging for the status line

/// Averages frame times over a fixed window so the readout stays legible
#[derive(Debug, Clone)]
pub struct FpsCounter {
    frames: u32,
    elapsed: f32,
    window: f32,
    fps: f32,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::with_window(0.5)
    }

    /// `window` is the averaging period in seconds
    pub fn with_window(window: f32) -> Self {
        Self {
            frames: 0,
            elapsed: 0.0,
            window,
            fps: 0.0,
        }
    }

    /// Record one frame of `dt` seconds; returns the current average
    pub fn tick(&mut self, dt: f32) -> f32 {
        self.frames += 1;
        self.elapsed += dt.max(0.0);
        if self.elapsed >= self.window && self.elapsed > 0.0 {
            self.fps = self.frames as f32 / self.elapsed;
            self.frames = 0;
            self.elapsed = 0.0;
        }
        self.fps
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}
