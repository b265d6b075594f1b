//! Human-readable number formatting used by the CLI summary.

const BILLION: u64 = 1_000_000_000;
const MILLION: u64 = 1_000_000;
const THOUSAND: u64 = 1_000;

/// Formats a count with a `K`/`M`/`B` suffix and one decimal, rounding
/// halves up.
///
/// ```
/// use instalytics_core::format_number;
/// assert_eq!(format_number(1_500_000), "1.5M");
/// assert_eq!(format_number(250_000), "250.0K");
/// assert_eq!(format_number(1_250), "1.3K");
/// assert_eq!(format_number(999), "999");
/// ```
#[must_use]
pub fn format_number(n: u64) -> String {
    if n >= BILLION {
        with_suffix(n, BILLION, 'B')
    } else if n >= MILLION {
        with_suffix(n, MILLION, 'M')
    } else if n >= THOUSAND {
        with_suffix(n, THOUSAND, 'K')
    } else {
        n.to_string()
    }
}

fn with_suffix(n: u64, unit: u64, suffix: char) -> String {
    let (n, unit) = (u128::from(n), u128::from(unit));
    let tenths = (n * 10 + unit / 2) / unit;
    format!("{}.{}{suffix}", tenths / 10, tenths % 10)
}

/// Formats a percentage value with two decimals, e.g. `4.18%`.
#[must_use]
pub fn format_percentage(value: f64) -> String {
    format!("{value:.2}%")
}
