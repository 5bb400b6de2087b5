//! Speed tag values.

/// Speed assumed for `maxspeed=none` (km/h).
pub const UNLIMITED_SPEED: f64 = 140.0;

/// Speed assumed for `maxspeed=walk` (km/h).
pub const WALK_SPEED: f64 = 6.0;

const MPH_IN_KMH: f64 = 1.609_344;
const KNOT_IN_KMH: f64 = 1.852;

/// Parse a speed tag value into km/h.
///
/// Returns `None` for anything that is not a speed, which includes access
/// values such as `yes` or `no`.
///
/// # Examples
///
/// ```
/// use conditional_router::domain::parse_speed;
///
/// assert_eq!(parse_speed("50"), Some(50.0));
/// assert_eq!(parse_speed("none"), Some(140.0));
/// assert!((parse_speed("30 mph").unwrap() - 48.28).abs() < 0.01);
/// assert_eq!(parse_speed("no"), None);
/// ```
pub fn parse_speed(value: &str) -> Option<f64> {
    let value = value.trim();
    match value {
        "" => return None,
        "none" => return Some(UNLIMITED_SPEED),
        "walk" => return Some(WALK_SPEED),
        _ => {}
    }

    let (number, factor) = if let Some(n) = value.strip_suffix("mph") {
        (n, MPH_IN_KMH)
    } else if let Some(n) = value.strip_suffix("knots") {
        (n, KNOT_IN_KMH)
    } else if let Some(n) = value.strip_suffix("km/h").or_else(|| value.strip_suffix("kmh")) {
        (n, 1.0)
    } else {
        (value, 1.0)
    };

    let speed: f64 = number.trim().parse().ok()?;
    if !speed.is_finite() || speed < 0.0 {
        return None;
    }
    Some(speed * factor)
}
