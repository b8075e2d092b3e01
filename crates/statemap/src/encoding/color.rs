use serde::{Serialize, Serializer};
use std::fmt;

/// Nine-stop sequential "Reds" scheme, light to dark.
const REDS: &str = "fff5f0fee0d2fcbba1fc9272fb6a4aef3b2ccb181da50f1567000d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `rrggbb` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        Some(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Channel-wise linear interpolation, rounded back to whole channels.
    pub fn interpolate(self, to: Rgb, t: f64) -> Rgb {
        let lerp = |a: u8, b: u8| channel(f64::from(a) + (f64::from(b) - f64::from(a)) * t);
        Rgb::new(lerp(self.r, to.r), lerp(self.g, to.g), lerp(self.b, to.b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn channel(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 255.0) as u8
}

/// Continuous color ramp over `[0, 1]`, interpolating the stops with a
/// uniform B-spline per RGB channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRamp {
    stops: Vec<[f64; 3]>,
}

impl ColorRamp {
    pub fn reds() -> Self {
        Self::from_scheme(REDS).unwrap_or_else(|| Self {
            stops: vec![[255.0, 245.0, 240.0], [103.0, 0.0, 13.0]],
        })
    }

    /// Build from concatenated six-digit hex colors; needs at least two stops.
    pub fn from_scheme(scheme: &str) -> Option<Self> {
        if scheme.len() % 6 != 0 || !scheme.is_ascii() {
            return None;
        }
        let stops = (0..scheme.len())
            .step_by(6)
            .map(|start| {
                Rgb::from_hex(&scheme[start..start + 6])
                    .map(|rgb| [f64::from(rgb.r), f64::from(rgb.g), f64::from(rgb.b)])
            })
            .collect::<Option<Vec<_>>>()?;
        (stops.len() >= 2).then_some(Self { stops })
    }

    pub fn stops(&self) -> usize {
        self.stops.len()
    }

    /// Color at `t`; values outside `[0, 1]` clamp to the ends.
    pub fn sample(&self, t: f64) -> Rgb {
        let spline = |component: usize| {
            let values: Vec<f64> = self.stops.iter().map(|stop| stop[component]).collect();
            channel(basis_spline(&values, t))
        };
        Rgb::new(spline(0), spline(1), spline(2))
    }
}

fn basis(t1: f64, v0: f64, v1: f64, v2: f64, v3: f64) -> f64 {
    let t2 = t1 * t1;
    let t3 = t2 * t1;
    ((1.0 - 3.0 * t1 + 3.0 * t2 - t3) * v0
        + (4.0 - 6.0 * t2 + 3.0 * t3) * v1
        + (1.0 + 3.0 * t1 + 3.0 * t2 - 3.0 * t3) * v2
        + t3 * v3)
        / 6.0
}

/// Uniform cubic B-spline through `values`, with reflected end points so the
/// curve starts and ends exactly on the first and last value.
fn basis_spline(values: &[f64], t: f64) -> f64 {
    let n = values.len() - 1;
    let (t, i) = if t.is_nan() || t <= 0.0 {
        (0.0, 0)
    } else if t >= 1.0 {
        (1.0, n - 1)
    } else {
        (t, (t * n as f64).floor() as usize)
    };
    let v1 = values[i];
    let v2 = values[i + 1];
    let v0 = if i > 0 { values[i - 1] } else { 2.0 * v1 - v2 };
    let v3 = if i < n - 1 { values[i + 2] } else { 2.0 * v2 - v1 };
    basis((t - i as f64 / n as f64) * n as f64, v0, v1, v2, v3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trips_through_display() {
        let rgb = Rgb::from_hex("#fb6a4a").expect("valid hex");
        assert_eq!(rgb, Rgb::new(251, 106, 74));
        assert_eq!(rgb.to_hex(), "#fb6a4a");
        assert_eq!(rgb.to_string(), "rgb(251, 106, 74)");
        assert_eq!(Rgb::from_hex("fb6a4"), None);
        assert_eq!(Rgb::from_hex("zz6a4a"), None);
    }

    #[test]
    fn reds_ramp_hits_its_end_stops() {
        let ramp = ColorRamp::reds();
        assert_eq!(ramp.stops(), 9);
        assert_eq!(ramp.sample(0.0), Rgb::new(255, 245, 240));
        assert_eq!(ramp.sample(1.0), Rgb::new(103, 0, 13));
        assert_eq!(ramp.sample(-3.0), ramp.sample(0.0));
        assert_eq!(ramp.sample(4.0), ramp.sample(1.0));
    }

    #[test]
    fn reds_ramp_blends_neighbouring_stops() {
        let ramp = ColorRamp::reds();
        assert_eq!(ramp.sample(0.625), Rgb::new(235, 61, 47));
    }

    #[test]
    fn reds_ramp_darkens_monotonically() {
        let ramp = ColorRamp::reds();
        let greens: Vec<u8> = (0..=20).map(|step| ramp.sample(step as f64 / 20.0).g).collect();
        assert!(greens.windows(2).all(|pair| pair[1] <= pair[0]));
    }

    #[test]
    fn interpolation_is_channel_wise() {
        let from = Rgb::new(0, 100, 200);
        let to = Rgb::new(100, 100, 0);
        assert_eq!(from.interpolate(to, 0.0), from);
        assert_eq!(from.interpolate(to, 1.0), to);
        assert_eq!(from.interpolate(to, 0.5), Rgb::new(50, 100, 100));
    }

    #[test]
    fn scheme_requires_two_stops() {
        assert!(ColorRamp::from_scheme("ffffff").is_none());
        assert!(ColorRamp::from_scheme("ffffff000").is_none());
        assert_eq!(
            ColorRamp::from_scheme("000000ffffff")
                .expect("two stops")
                .sample(0.5),
            Rgb::new(128, 128, 128)
        );
    }
}
