//! Human-readable byte counts.

const UNITS: [&str; 9] = ["B", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

/// Format a byte count using base-1024 units.
///
/// Zero is `"0B"`. Anything else is `"<mantissa> <unit>"` with the mantissa
/// rounded to two decimals, printed with at least one decimal place, and kept
/// in `[1, 1024)`.
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0B".to_string();
    }

    let mut exp = (bytes.ilog(1024) as usize).min(UNITS.len() - 1);
    let mut mantissa = round2(bytes as f64 / 1024f64.powi(exp as i32));
    // 1048575 B is 1023.999 KB, which rounds up into the next unit.
    if mantissa >= 1024.0 && exp + 1 < UNITS.len() {
        exp += 1;
        mantissa = round2(bytes as f64 / 1024f64.powi(exp as i32));
    }

    format!("{} {}", format_mantissa(mantissa), UNITS[exp])
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

fn format_mantissa(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}
