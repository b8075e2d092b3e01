//! Tick placement and "nice" domain rounding on 1-2-5 decades.
//!
//! Steps below one are kept as negative inverse increments (`-10` means a
//! step of `0.1`) so tick values are produced by division and stay exact
//! in decimal.

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

/// Rounds half-way cases toward positive infinity.
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// `(i1, i2, increment)` describing the ticks between `start` and `stop`.
fn tick_layout(start: f64, stop: f64, count: f64) -> (f64, f64, f64) {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    let (i1, i2, increment) = if power < 0.0 {
        let inc = 10f64.powf(-power) / factor;
        let mut i1 = round_half_up(start * inc);
        let mut i2 = round_half_up(stop * inc);
        if i1 / inc < start {
            i1 += 1.0;
        }
        if i2 / inc > stop {
            i2 -= 1.0;
        }
        (i1, i2, -inc)
    } else {
        let inc = 10f64.powf(power) * factor;
        let mut i1 = round_half_up(start / inc);
        let mut i2 = round_half_up(stop / inc);
        if i1 * inc < start {
            i1 += 1.0;
        }
        if i2 * inc > stop {
            i2 -= 1.0;
        }
        (i1, i2, inc)
    };

    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_layout(start, stop, count * 2.0);
    }
    (i1, i2, increment)
}

/// Step between ticks, encoded as in [`tick_layout`]. Zero or NaN when undefined.
pub fn tick_increment(start: f64, stop: f64, count: f64) -> f64 {
    tick_layout(start, stop, count).2
}

/// Plain step between ticks, always positive for `start < stop`.
pub fn tick_step(start: f64, stop: f64, count: f64) -> f64 {
    let reverse = stop < start;
    let increment = if reverse {
        tick_increment(stop, start, count)
    } else {
        tick_increment(start, stop, count)
    };
    let step = if increment < 0.0 {
        1.0 / -increment
    } else {
        increment
    };
    if reverse {
        -step
    } else {
        step
    }
}

/// Roughly `count` evenly spaced, round values inside `[start, stop]`.
pub fn ticks(start: f64, stop: f64, count: f64) -> Vec<f64> {
    if !(count > 0.0) {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }
    let reverse = stop < start;
    let (i1, i2, increment) = if reverse {
        tick_layout(stop, start, count)
    } else {
        tick_layout(start, stop, count)
    };
    if !(i2 >= i1) {
        return Vec::new();
    }

    let n = (i2 - i1 + 1.0) as usize;
    let mut values: Vec<f64> = (0..n)
        .map(|offset| {
            let index = i1 + offset as f64;
            if increment < 0.0 {
                index / -increment
            } else {
                index * increment
            }
        })
        .collect();
    if reverse {
        values.reverse();
    }
    values
}

/// Extend `[start, stop]` outward to multiples of the tick step.
pub fn nice(domain: [f64; 2], count: f64) -> [f64; 2] {
    let [mut start, mut stop] = domain;
    let reverse = stop < start;
    if reverse {
        std::mem::swap(&mut start, &mut stop);
    }
    if !(start < stop) || !start.is_finite() || !stop.is_finite() {
        return domain;
    }

    let mut previous = None;
    for _ in 0..10 {
        let step = tick_increment(start, stop, count);
        if previous == Some(step) {
            break;
        } else if step > 0.0 {
            start = (start / step).floor() * step;
            stop = (stop / step).ceil() * step;
        } else if step < 0.0 {
            start = (start * step).ceil() / step;
            stop = (stop * step).floor() / step;
        } else {
            break;
        }
        previous = Some(step);
    }

    if reverse {
        [stop, start]
    } else {
        [start, stop]
    }
}

/// Fractional digits needed to tell ticks `step` apart.
pub fn precision_fixed(step: f64) -> usize {
    let exponent = step.abs().log10().floor();
    if exponent.is_finite() && exponent < 0.0 {
        (-exponent) as usize
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nice_rounds_shared_extent_outward() {
        assert_eq!(nice([0.295, 0.62], 10.0), [0.25, 0.65]);
        assert_eq!(nice([0.02, 0.45], 10.0), [0.0, 0.45]);
        assert_eq!(nice([12.0, 87.0], 10.0), [10.0, 90.0]);
    }

    #[test]
    fn nice_leaves_degenerate_domain_alone() {
        assert_eq!(nice([0.4, 0.4], 10.0), [0.4, 0.4]);
    }

    #[test]
    fn ticks_fall_on_round_fractions() {
        assert_eq!(ticks(0.25, 0.65, 5.0), vec![0.3, 0.4, 0.5, 0.6]);
        assert_eq!(
            ticks(0.0, 0.7, 5.0),
            vec![0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7]
        );
        assert_eq!(ticks(0.0, 10.0, 5.0), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(ticks(1.0, 0.0, 2.0), vec![1.0, 0.5, 0.0]);
        assert!(ticks(0.0, 1.0, 0.0).is_empty());
    }

    #[test]
    fn step_and_precision_agree() {
        assert_eq!(tick_step(0.25, 0.65, 5.0), 0.1);
        assert_eq!(tick_step(0.0, 100.0, 5.0), 20.0);
        assert_eq!(precision_fixed(0.1), 1);
        assert_eq!(precision_fixed(0.05), 2);
        assert_eq!(precision_fixed(20.0), 0);
    }
}
