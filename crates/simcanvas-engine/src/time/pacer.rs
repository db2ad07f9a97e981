/// Fixed-rate step scheduler driven by variable frame deltas.
///
/// Accumulates elapsed time and releases one step per `1 / steps_per_second`.
/// At most `max_steps_per_frame` steps are released per call; any backlog past
/// that is dropped so a slow frame never triggers a burst of catch-up steps.
#[derive(Debug, Clone)]
pub struct StepPacer {
    interval: f32,
    accumulator: f32,
    max_steps_per_frame: u32,
    paused: bool,
}

impl StepPacer {
    /// `steps_per_second` is clamped to at least `0.01`.
    pub fn new(steps_per_second: f32) -> Self {
        Self {
            interval: 1.0 / steps_per_second.max(0.01),
            accumulator: 0.0,
            max_steps_per_frame: 4,
            paused: false,
        }
    }

    pub fn with_max_steps_per_frame(mut self, max: u32) -> Self {
        self.max_steps_per_frame = max.max(1);
        self
    }

    #[inline]
    pub fn steps_per_second(&self) -> f32 {
        1.0 / self.interval
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Pausing also drops any partially accumulated interval.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
        self.accumulator = 0.0;
    }

    pub fn toggle_paused(&mut self) {
        let paused = !self.paused;
        self.set_paused(paused);
    }

    /// Advances by `dt` seconds and returns how many steps are due now.
    pub fn advance(&mut self, dt: f32) -> u32 {
        if self.paused || !dt.is_finite() || dt <= 0.0 {
            return 0;
        }
        self.accumulator += dt;

        let due = (self.accumulator / self.interval).floor();
        let steps = (due as u32).min(self.max_steps_per_frame);
        if due as u32 > self.max_steps_per_frame {
            self.accumulator = 0.0;
        } else {
            self.accumulator -= due * self.interval;
        }
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn releases_one_step_per_interval() {
        let mut pacer = StepPacer::new(10.0);
        assert_eq!(pacer.advance(0.05), 0);
        assert_eq!(pacer.advance(0.06), 1);
        assert_eq!(pacer.advance(0.2), 2);
    }

    #[test]
    fn caps_catch_up_and_drops_backlog() {
        let mut pacer = StepPacer::new(100.0).with_max_steps_per_frame(3);
        assert_eq!(pacer.advance(1.0), 3);
        assert_eq!(pacer.advance(0.001), 0);
    }

    #[test]
    fn paused_pacer_never_steps() {
        let mut pacer = StepPacer::new(10.0);
        pacer.toggle_paused();
        assert!(pacer.is_paused());
        assert_eq!(pacer.advance(5.0), 0);
        pacer.toggle_paused();
        assert_eq!(pacer.advance(0.15), 1);
    }

    #[test]
    fn ignores_bogus_deltas() {
        let mut pacer = StepPacer::new(10.0);
        assert_eq!(pacer.advance(f32::NAN), 0);
        assert_eq!(pacer.advance(-1.0), 0);
    }
}
