use super::RegionStyle;
use std::time::{Duration, Instant};

/// Symmetric cubic easing: slow start, fast middle, slow finish.
pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

/// Timed interpolation between two full sets of region styles.
#[derive(Debug, Clone)]
pub struct Transition {
    started: Instant,
    duration: Duration,
    from: Vec<RegionStyle>,
    to: Vec<RegionStyle>,
}

impl Transition {
    pub fn new(
        from: Vec<RegionStyle>,
        to: Vec<RegionStyle>,
        started: Instant,
        duration: Duration,
    ) -> Self {
        Self {
            started,
            duration,
            from,
            to,
        }
    }

    pub fn started(&self) -> Instant {
        self.started
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn target(&self) -> &[RegionStyle] {
        &self.to
    }

    /// Linear progress in `[0, 1]`; instants before the start count as zero.
    pub fn progress(&self, now: Instant) -> f64 {
        self.progress_after(now.saturating_duration_since(self.started))
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }

    pub fn sample(&self, now: Instant) -> Vec<RegionStyle> {
        self.sample_after(now.saturating_duration_since(self.started))
    }

    /// Evenly timed samples from start to finish at `fps`; the last one is the target.
    pub fn frames(&self, fps: u32) -> Vec<Vec<RegionStyle>> {
        let fps = fps.max(1);
        let count = (self.duration.as_secs_f64() * f64::from(fps)).ceil() as u32;
        (0..=count)
            .map(|frame| {
                let elapsed = Duration::from_secs_f64(f64::from(frame) / f64::from(fps));
                self.sample_after(elapsed.min(self.duration))
            })
            .collect()
    }

    fn progress_after(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    fn sample_after(&self, elapsed: Duration) -> Vec<RegionStyle> {
        let progress = self.progress_after(elapsed);
        if progress >= 1.0 {
            return self.to.clone();
        }
        let eased = ease_cubic_in_out(progress);
        self.from
            .iter()
            .zip(&self.to)
            .map(|(from, to)| from.interpolate(to, eased))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::Rgb;
    use crate::atlas::Point;

    fn style(fill: Rgb, scale: f64) -> RegionStyle {
        RegionStyle {
            fill,
            scale,
            centroid: Point::new(20.0, 30.0),
        }
    }

    fn transition(started: Instant) -> Transition {
        Transition::new(
            vec![style(Rgb::new(0, 0, 0), 0.4)],
            vec![style(Rgb::new(200, 100, 50), 0.8)],
            started,
            Duration::from_millis(750),
        )
    }

    #[test]
    fn easing_is_symmetric_with_fixed_ends() {
        assert_eq!(ease_cubic_in_out(0.0), 0.0);
        assert_eq!(ease_cubic_in_out(0.5), 0.5);
        assert_eq!(ease_cubic_in_out(1.0), 1.0);
        assert!((ease_cubic_in_out(0.25) + ease_cubic_in_out(0.75) - 1.0).abs() < 1e-12);
        assert!(ease_cubic_in_out(0.25) < 0.25);
    }

    #[test]
    fn samples_interpolate_until_the_duration_elapses() {
        let start = Instant::now();
        let transition = transition(start);

        assert_eq!(transition.sample(start)[0], style(Rgb::new(0, 0, 0), 0.4));

        let halfway = transition.sample(start + Duration::from_millis(375));
        assert_eq!(halfway[0].fill, Rgb::new(100, 50, 25));
        assert!((halfway[0].scale - 0.6).abs() < 1e-12);
        assert!(!transition.is_finished(start + Duration::from_millis(749)));

        let done = start + Duration::from_millis(750);
        assert!(transition.is_finished(done));
        assert_eq!(transition.sample(done), transition.target());
    }

    #[test]
    fn frames_cover_start_to_target() {
        let transition = transition(Instant::now());
        let frames = transition.frames(4);
        assert_eq!(frames.len(), 4);
        assert_eq!(frames[0][0].scale, 0.4);
        assert_eq!(frames.last().expect("final frame"), transition.target());
    }

    #[test]
    fn zero_duration_finishes_immediately() {
        let start = Instant::now();
        let transition = Transition::new(
            vec![style(Rgb::new(0, 0, 0), 0.4)],
            vec![style(Rgb::new(9, 9, 9), 0.9)],
            start,
            Duration::ZERO,
        );
        assert!(transition.is_finished(start));
        assert_eq!(transition.sample(start)[0].scale, 0.9);
    }
}
