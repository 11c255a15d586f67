//! Seasonal temperature model and growing-season length.
//!
//! A tile's temperature follows a cosine around its annual mean. The swing
//! (amplitude) grows with distance from the equator along a piecewise linear
//! curve: ±3 °C at the equator, ±4 °C a tenth of the way out, ±28 °C at the
//! poles. The southern hemisphere runs half a year out of phase.
//!
//! A year is 60 days split into twelve 5-day twelfths. Each twelfth's mean
//! temperature is the average of 120 evenly spaced samples, and every twelfth
//! whose mean lies in the growth band 6–42 °C contributes 5 growing days.
//!
//! The world statistics only record each tile's seasonal minimum and
//! maximum, so [`growing_days_from_min_max`] recovers mean and amplitude from
//! those.

use std::f64::consts::PI;
use std::sync::OnceLock;

use landingzone_core::FloatRange;

pub const TICKS_PER_DAY: u64 = 60_000;
pub const DAYS_PER_YEAR: u64 = 60;
pub const TWELFTHS_PER_YEAR: usize = 12;
pub const DAYS_PER_TWELFTH: u32 = 5;
pub const TICKS_PER_TWELFTH: u64 = TICKS_PER_DAY * DAYS_PER_TWELFTH as u64;

/// Lowest twelfth mean at which crops grow, in °C.
pub const MIN_GROWTH_TEMP: f64 = 6.0;
/// Highest twelfth mean at which crops grow, in °C.
pub const MAX_GROWTH_TEMP: f64 = 42.0;

/// Longest possible growing season, in days.
pub const MAX_GROWING_DAYS: u32 = TWELFTHS_PER_YEAR as u32 * DAYS_PER_TWELFTH;

/// Distance from equator (0..1) to seasonal amplitude in °C.
const SEASONAL_CURVE: [(f64, f64); 3] = [(0.0, 3.0), (0.1, 4.0), (1.0, 28.0)];

const SAMPLES_PER_TWELFTH: u64 = 120;
const SAMPLE_OFFSET_TICKS: u64 = 30_000;
/// Year fraction at which winter peaks in the northern hemisphere.
const WINTER_PEAK: f64 = 10.0 / 12.0;

/// Grid resolution per axis when searching reachable growing seasons.
const SEARCH_STEPS: usize = 40;

fn lerp_curve(curve: &[(f64, f64)], x: f64) -> f64 {
    let (first, last) = (curve[0], curve[curve.len() - 1]);
    if x <= first.0 {
        return first.1;
    }
    if x >= last.0 {
        return last.1;
    }
    for pair in curve.windows(2) {
        let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
        if x >= x0 && x < x1 {
            return y0 + (x - x0) / (x1 - x0) * (y1 - y0);
        }
    }
    last.1
}

/// Signed seasonal amplitude; negative south of the equator.
pub fn seasonal_amplitude(dist_from_equator: f64, latitude: f64) -> f64 {
    let amplitude = lerp_curve(&SEASONAL_CURVE, dist_from_equator);
    if latitude >= 0.0 {
        amplitude
    } else {
        -amplitude
    }
}

/// Inverse of the amplitude curve. Amplitudes below the equatorial swing
/// map to the equator.
pub fn amplitude_to_dist_from_equator(amplitude: f64) -> f64 {
    let amplitude = amplitude.abs();
    if amplitude <= 3.0 {
        0.0
    } else if amplitude <= 4.0 {
        0.1 * (amplitude - 3.0)
    } else {
        0.1 + 0.9 * (amplitude - 4.0) / 24.0
    }
}

/// Temperature offset from the annual mean at an absolute tick.
pub fn season_offset(tick: u64, dist_from_equator: f64, latitude: f64) -> f64 {
    let amplitude = seasonal_amplitude(dist_from_equator, latitude);
    cycle_position(tick).cos() * -amplitude
}

fn cycle_position(tick: u64) -> f64 {
    let year_pct = (tick as f64 / TICKS_PER_DAY as f64 % DAYS_PER_YEAR as f64) / DAYS_PER_YEAR as f64;
    2.0 * PI * (year_pct - WINTER_PEAK)
}

/// Mean offset of each twelfth for an amplitude of +1 °C.
///
/// The offset is linear in the amplitude, so every twelfth mean is
/// `mean + amplitude * unit[twelfth]`.
fn unit_twelfth_offsets() -> &'static [f64; TWELFTHS_PER_YEAR] {
    static OFFSETS: OnceLock<[f64; TWELFTHS_PER_YEAR]> = OnceLock::new();
    OFFSETS.get_or_init(|| {
        let mut out = [0.0; TWELFTHS_PER_YEAR];
        for (twelfth, slot) in out.iter_mut().enumerate() {
            let start = TICKS_PER_TWELFTH * twelfth as u64 + SAMPLE_OFFSET_TICKS;
            let sum: f64 = (0..SAMPLES_PER_TWELFTH)
                .map(|i| start + i * TICKS_PER_TWELFTH / SAMPLES_PER_TWELFTH)
                .map(|tick| -cycle_position(tick).cos())
                .sum();
            *slot = sum / SAMPLES_PER_TWELFTH as f64;
        }
        out
    })
}

/// Mean temperature over one twelfth (0..12).
pub fn twelfth_average(mean: f64, dist_from_equator: f64, latitude: f64, twelfth: usize) -> f64 {
    let amplitude = seasonal_amplitude(dist_from_equator, latitude);
    mean + amplitude * unit_twelfth_offsets()[twelfth % TWELFTHS_PER_YEAR]
}

fn growing_days_with_amplitude(mean: f64, amplitude: f64) -> u32 {
    let twelfths = unit_twelfth_offsets()
        .iter()
        .map(|unit| mean + amplitude * unit)
        .filter(|t| (MIN_GROWTH_TEMP..=MAX_GROWTH_TEMP).contains(t))
        .count() as u32;
    twelfths * DAYS_PER_TWELFTH
}

/// Growing days per year (a multiple of 5 in `0..=60`).
pub fn growing_days(mean: f64, dist_from_equator: f64, latitude: f64) -> u32 {
    growing_days_with_amplitude(mean, seasonal_amplitude(dist_from_equator, latitude))
}

/// Growing days for a tile known only by its seasonal extremes.
///
/// Assumes the northern hemisphere; the count is the same in the south.
pub fn growing_days_from_min_max(min_temp: f64, max_temp: f64) -> u32 {
    let mean = (min_temp + max_temp) / 2.0;
    let dist = amplitude_to_dist_from_equator((max_temp - min_temp) / 2.0);
    growing_days(mean, dist, dist * 90.0)
}

/// Returns true if the seasonal extremes both stay inside the growth band.
pub fn is_year_round_growing(min_temp: f64, max_temp: f64) -> bool {
    min_temp >= MIN_GROWTH_TEMP && max_temp <= MAX_GROWTH_TEMP
}

/// Shortest and longest growing season reachable by a tile whose seasonal
/// minimum, maximum and mean lie in the given ranges.
///
/// Searches a grid over the minimum and maximum, so a season length reached
/// only on a sliver between grid points can be missed. Returns `None` when
/// no grid point satisfies all three ranges.
pub fn growing_days_range(
    min_temps: &FloatRange,
    max_temps: &FloatRange,
    mean_temps: &FloatRange,
) -> Option<(u32, u32)> {
    let mut found: Option<(u32, u32)> = None;
    for lo in grid(min_temps) {
        for hi in grid(max_temps) {
            if hi < lo || !mean_temps.contains((lo + hi) / 2.0) {
                continue;
            }
            let days = growing_days_from_min_max(lo, hi);
            found = Some(match found {
                None => (days, days),
                Some((a, b)) => (a.min(days), b.max(days)),
            });
        }
    }
    found
}

fn grid(range: &FloatRange) -> impl Iterator<Item = f64> + '_ {
    let step = range.width() / SEARCH_STEPS as f64;
    (0..=SEARCH_STEPS).map(move |i| range.min + step * i as f64)
}
