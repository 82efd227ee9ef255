// src/common/convert.rs

//! Temperature scale conversion and derived comfort metrics.
//!
//! All functions are NaN-transparent: a NaN temperature or humidity (a failed
//! reading) yields NaN.

/// Steadman estimate above which the Rothfusz regression takes over.
pub const HEAT_INDEX_REGRESSION_THRESHOLD_F: f32 = 79.0;

#[inline]
pub fn celsius_to_fahrenheit(c: f32) -> f32 {
    c * 1.8 + 32.0
}

/// Inverse of [`celsius_to_fahrenheit`] using the truncated constant `0.55555`,
/// so a round trip drifts by up to a few thousandths of a degree.
#[inline]
pub fn fahrenheit_to_celsius(f: f32) -> f32 {
    (f - 32.0) * 0.55555
}

/// Heat index (apparent temperature).
///
/// `temperature` and the result are in °F when `is_fahrenheit`, otherwise °C.
/// Uses Steadman's simple formula and switches to the Rothfusz regression plus the
/// NWS low/high humidity adjustments when the simple estimate is above 79 °F.
/// See <https://www.wpc.ncep.noaa.gov/html/heatindex_equation.shtml>.
pub fn heat_index(temperature: f32, percent_humidity: f32, is_fahrenheit: bool) -> f32 {
    let t = if is_fahrenheit { temperature } else { celsius_to_fahrenheit(temperature) };
    let h = percent_humidity;

    let simple = steadman(t, h);
    let hi = if uses_regression(simple) { rothfusz(t, h) } else { simple };

    if is_fahrenheit {
        hi
    } else {
        fahrenheit_to_celsius(hi)
    }
}

/// Dew point, NOAA approximation. Good to 0.25 °C between 0 and 70 °C.
///
/// The polynomial works in Celsius; Fahrenheit input is converted and the result
/// converted back.
pub fn dew_point(temperature: f32, percent_humidity: f32, is_fahrenheit: bool) -> f32 {
    let t = if is_fahrenheit { fahrenheit_to_celsius(temperature) } else { temperature };
    let dryness = 1.0 - 0.01 * percent_humidity;

    let dp = t
        - (14.55 + 0.114 * t) * dryness
        - cube((2.5 + 0.007 * t) * dryness)
        - (15.9 + 0.117 * t) * libm::powf(dryness, 14.0);

    if is_fahrenheit {
        celsius_to_fahrenheit(dp)
    } else {
        dp
    }
}

#[inline]
pub(crate) fn uses_regression(simple_f: f32) -> bool {
    simple_f > HEAT_INDEX_REGRESSION_THRESHOLD_F
}

fn steadman(t: f32, h: f32) -> f32 {
    0.5 * (t + 61.0 + ((t - 68.0) * 1.2) + (h * 0.094))
}

fn rothfusz(t: f32, h: f32) -> f32 {
    let mut hi = -42.379 + 2.049_015_2 * t + 10.143_331 * h
        + -0.224_755_41 * t * h
        + -0.006_837_83 * t * t
        + -0.054_817_17 * h * h
        + 0.001_228_74 * t * t * h
        + 0.000_852_82 * t * h * h
        + -0.000_001_99 * t * t * h * h;

    if h < 13.0 && (80.0..=112.0).contains(&t) {
        hi -= ((13.0 - h) * 0.25) * libm::sqrtf((17.0 - libm::fabsf(t - 95.0)) * 0.058_82);
    } else if h > 85.0 && (80.0..=87.0).contains(&t) {
        hi += ((h - 85.0) * 0.1) * ((87.0 - t) * 0.2);
    }
    hi
}

#[inline]
fn cube(x: f32) -> f32 {
    x * x * x
}
