use chrono::{DateTime, Duration, Utc};

/// One tick of a [`Clock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Step index, starting from 0.
    pub step: usize,
    /// Wall-clock time of the step.
    pub at: DateTime<Utc>,
}

/// A simulation clock that walks a fixed number of equal steps from a start time.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use homeload::sim::clock::Clock;
///
/// let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let mut clock = Clock::new(start, Duration::minutes(15), 3);
/// let mut steps = Vec::new();
///
/// clock.run(|tick| steps.push(tick.step));
/// assert_eq!(steps, vec![0, 1, 2]);
/// ```
pub struct Clock {
    start: DateTime<Utc>,
    step: Duration,
    current: usize,
    total: usize,
}

impl Clock {
    /// Creates a clock.
    ///
    /// # Arguments
    ///
    /// * `start` - Time of step 0
    /// * `step` - Spacing between steps
    /// * `total` - Number of steps the clock will run
    pub fn new(start: DateTime<Utc>, step: Duration, total: usize) -> Self {
        Self {
            start,
            step,
            current: 0,
            total,
        }
    }

    /// Time of step `index`, whether or not the clock has reached it.
    pub fn time_of(&self, index: usize) -> DateTime<Utc> {
        self.start + self.step * index as i32
    }

    /// Advances the clock by one step.
    ///
    /// # Returns
    ///
    /// * `Some(tick)` - The step before advancing
    /// * `None` - If the clock has reached its total steps
    pub fn tick(&mut self) -> Option<Tick> {
        if self.current < self.total {
            let step = self.current;
            self.current += 1;
            Some(Tick {
                step,
                at: self.time_of(step),
            })
        } else {
            None
        }
    }

    /// Runs a function for each remaining step.
    pub fn run(&mut self, mut f: impl FnMut(Tick)) {
        while let Some(tick) = self.tick() {
            f(tick);
        }
    }
}
