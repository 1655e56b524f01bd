use crate::config::scroll as tuning;

/// `min(1, 1.001 - 2^(-10t))`
pub fn ease_out_expo(t: f64) -> f64 {
    (1.001 - 2f64.powf(-10.0 * t)).min(1.0)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

#[derive(Clone, Debug)]
pub struct DriverOptions {
    /// Seconds.
    pub duration: f64,
    pub easing: fn(f64) -> f64,
    pub orientation: Orientation,
    pub gesture_orientation: Orientation,
    pub smooth_touch: bool,
    pub touch_multiplier: f64,
    pub wheel_multiplier: f64,
    pub infinite: bool,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            duration: tuning::DURATION_SECS,
            easing: ease_out_expo,
            orientation: Orientation::Vertical,
            gesture_orientation: Orientation::Vertical,
            smooth_touch: false,
            touch_multiplier: tuning::TOUCH_MULTIPLIER,
            wheel_multiplier: tuning::WHEEL_MULTIPLIER,
            infinite: false,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Tween {
    from: f64,
    to: f64,
    duration_ms: f64,
    started_at: Option<f64>,
}

/// Time-based scroll position interpolation, independent of the DOM.
/// The first `tick` after a new target anchors the tween's start time.
#[derive(Debug)]
pub struct Animator {
    options: DriverOptions,
    position: f64,
    limit: f64,
    tween: Option<Tween>,
}

impl Animator {
    pub fn new(options: DriverOptions, position: f64, limit: f64) -> Self {
        Self {
            options,
            position,
            limit: limit.max(0.0),
            tween: None,
        }
    }

    pub fn options(&self) -> &DriverOptions {
        &self.options
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn target(&self) -> f64 {
        self.tween.map(|tween| tween.to).unwrap_or(self.position)
    }

    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    pub fn set_limit(&mut self, limit: f64) {
        self.limit = limit.max(0.0);
    }

    /// Adopts a position changed outside the animator (native scroll, resize).
    pub fn sync(&mut self, position: f64) {
        if self.tween.is_none() {
            self.position = position;
        }
    }

    pub fn animate_to(&mut self, target: f64, duration_secs: f64) {
        let to = self.clamp(target);
        if !duration_secs.is_finite() || duration_secs <= 0.0 {
            self.position = to;
            self.tween = None;
            return;
        }
        self.tween = Some(Tween {
            from: self.position,
            to,
            duration_ms: duration_secs * 1000.0,
            started_at: None,
        });
    }

    /// Wheel delta in pixels, accumulated onto the current target.
    pub fn wheel(&mut self, delta: f64) {
        self.nudge(delta * self.options.wheel_multiplier);
    }

    /// Finger travel in pixels. Only fed when touch smoothing is enabled.
    pub fn touch(&mut self, delta: f64) {
        self.nudge(delta * self.options.touch_multiplier);
    }

    fn nudge(&mut self, delta: f64) {
        let target = self.target() + delta;
        self.animate_to(target, self.options.duration);
    }

    /// Advances to `now_ms`; returns the new position while animating.
    pub fn tick(&mut self, now_ms: f64) -> Option<f64> {
        let easing = self.options.easing;
        let mut tween = self.tween?;
        let started_at = *tween.started_at.get_or_insert(now_ms);
        let progress = ((now_ms - started_at) / tween.duration_ms).clamp(0.0, 1.0);

        if progress >= 1.0 {
            self.position = tween.to;
            self.tween = None;
        } else {
            self.position = tween.from + (tween.to - tween.from) * easing(progress);
            self.tween = Some(tween);
        }
        Some(self.position)
    }

    pub fn stop(&mut self) {
        self.tween = None;
    }

    fn clamp(&self, value: f64) -> f64 {
        if self.options.infinite {
            value
        } else {
            value.clamp(0.0, self.limit)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn animator(position: f64) -> Animator {
        Animator::new(DriverOptions::default(), position, 5_000.0)
    }

    #[test]
    fn easing_is_monotonic_and_bounded() {
        let mut last = ease_out_expo(0.0);
        assert!(last > 0.0 && last < 0.01);
        for step in 1..=100 {
            let value = ease_out_expo(f64::from(step) / 100.0);
            assert!(value >= last);
            assert!(value <= 1.0);
            last = value;
        }
        assert_eq!(ease_out_expo(1.0), 1.0);
    }

    #[test]
    fn defaults_match_driver_tuning() {
        let options = DriverOptions::default();
        assert_eq!(options.duration, 1.2);
        assert_eq!(options.orientation, Orientation::Vertical);
        assert_eq!(options.gesture_orientation, Orientation::Vertical);
        assert!(!options.smooth_touch);
        assert_eq!(options.touch_multiplier, 2.0);
        assert!(!options.infinite);
    }

    #[test]
    fn tween_lands_exactly_on_target() {
        let mut a = animator(0.0);
        a.animate_to(1_000.0, 1.2);
        assert!(a.is_animating());

        let first = a.tick(100.0).unwrap();
        assert!(first < 10.0);
        let mid = a.tick(700.0).unwrap();
        assert!(mid > 900.0 && mid < 1_000.0, "{mid}");
        assert_eq!(a.tick(1_300.0), Some(1_000.0));
        assert!(!a.is_animating());
        assert_eq!(a.tick(1_400.0), None);
    }

    #[test]
    fn targets_are_clamped_when_not_infinite() {
        let mut a = animator(100.0);
        a.animate_to(-50.0, 0.0);
        assert_eq!(a.position(), 0.0);
        a.animate_to(9_999.0, 0.0);
        assert_eq!(a.position(), 5_000.0);
    }

    #[test]
    fn infinite_mode_skips_clamping() {
        let options = DriverOptions {
            infinite: true,
            ..DriverOptions::default()
        };
        let mut a = Animator::new(options, 0.0, 100.0);
        a.animate_to(500.0, 0.0);
        assert_eq!(a.position(), 500.0);
    }

    #[test]
    fn wheel_deltas_accumulate_on_target() {
        let mut a = animator(0.0);
        a.wheel(120.0);
        a.wheel(120.0);
        assert_eq!(a.target(), 240.0);
        a.tick(0.0);
        a.tick(2_000.0);
        assert_eq!(a.position(), 240.0);
    }

    #[test]
    fn touch_travel_uses_touch_multiplier() {
        let mut a = animator(1_000.0);
        a.touch(50.0);
        assert_eq!(a.target(), 1_100.0);
    }

    #[test]
    fn sync_is_ignored_mid_animation() {
        let mut a = animator(0.0);
        a.sync(300.0);
        assert_eq!(a.position(), 300.0);
        a.animate_to(0.0, 1.0);
        a.sync(800.0);
        assert_eq!(a.position(), 300.0);
        a.stop();
        a.sync(800.0);
        assert_eq!(a.position(), 800.0);
    }
}
