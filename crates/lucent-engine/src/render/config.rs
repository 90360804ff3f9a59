use glam::Vec4;

/// Renderer settings read at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct RendererConfig {
    /// Presentation cap in frames per second; `0` means uncapped.
    pub max_fps: u32,
    /// Initial background color (linear RGBA).
    pub clear_color: Vec4,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            max_fps: 0,
            clear_color: Vec4::new(0.05, 0.05, 0.08, 1.0),
        }
    }
}

/// Decides whether a frame is presented under a frame rate cap.
///
/// Presentation slots are scheduled at a fixed interval; a late frame does not
/// shift the schedule unless it falls more than one interval behind.
#[derive(Debug, Clone)]
pub struct FrameLimiter {
    interval_millis: f64,
    next_due: Option<f64>,
}

impl FrameLimiter {
    pub fn new(max_fps: u32) -> Self {
        let interval_millis = if max_fps == 0 {
            0.0
        } else {
            1000.0 / f64::from(max_fps)
        };
        Self {
            interval_millis,
            next_due: None,
        }
    }

    pub fn is_capped(&self) -> bool {
        self.interval_millis > 0.0
    }

    /// Returns `true` and consumes the slot if a frame may be presented at `now_millis`.
    pub fn should_render(&mut self, now_millis: u64) -> bool {
        if !self.is_capped() {
            return true;
        }

        let now = now_millis as f64;
        match self.next_due {
            Some(due) if now < due => false,
            Some(due) if now - due < self.interval_millis => {
                self.next_due = Some(due + self.interval_millis);
                true
            }
            _ => {
                self.next_due = Some(now + self.interval_millis);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncapped_always_renders() {
        let mut l = FrameLimiter::new(0);
        assert!(l.should_render(0));
        assert!(l.should_render(0));
        assert!(l.should_render(1));
    }

    #[test]
    fn capped_skips_early_frames() {
        let mut l = FrameLimiter::new(50); // 20ms
        assert!(l.should_render(1000));
        assert!(!l.should_render(1010));
        assert!(l.should_render(1020));
        assert!(!l.should_render(1039));
        assert!(l.should_render(1040));
    }

    #[test]
    fn schedule_does_not_drift_with_late_frames() {
        let mut l = FrameLimiter::new(50);
        assert!(l.should_render(0));
        // Late by 5ms; the next slot stays at 40.
        assert!(l.should_render(25));
        assert!(!l.should_render(39));
        assert!(l.should_render(40));
    }

    #[test]
    fn long_stall_resets_schedule() {
        let mut l = FrameLimiter::new(50);
        assert!(l.should_render(0));
        assert!(l.should_render(500));
        assert!(!l.should_render(510));
        assert!(l.should_render(520));
    }
}
