/// Tracks simulation time: a monotonic tick counter, accumulated seconds,
/// and the duration of the current tick.
#[derive(Debug, Clone, Default)]
pub struct SimClock {
    tick: u64,
    elapsed: f64,
    delta_time: f32,
}

impl SimClock {
    /// Create a clock at tick 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one tick lasting `delta_time` seconds. Negative or
    /// non-finite durations count as zero. Returns the new tick number.
    pub fn advance(&mut self, delta_time: f32) -> u64 {
        let delta_time = if delta_time.is_finite() && delta_time > 0.0 {
            delta_time
        } else {
            0.0
        };
        self.tick += 1;
        self.delta_time = delta_time;
        self.elapsed += f64::from(delta_time);
        self.tick
    }

    /// Return the current tick number.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Duration of the current tick in seconds.
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Total simulated seconds since the start.
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed
    }
}
