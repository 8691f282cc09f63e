//! Time formatting helpers.

/// Unit sizes in seconds, largest first.
const UNITS: [(u64, &str); 4] = [(86_400, "d"), (3_600, "h"), (60, "m"), (1, "s")];

/// Render a span of seconds as its largest unit plus the next one down,
/// e.g. `"2h 1m"`. Spans under a minute print seconds only.
pub fn format_duration(secs: u64) -> String {
    let lead = UNITS
        .iter()
        .position(|&(size, _)| secs >= size)
        .unwrap_or(UNITS.len() - 1);
    let (size, unit) = UNITS[lead];
    match UNITS.get(lead + 1) {
        Some(&(next, next_unit)) => {
            format!("{}{unit} {}{next_unit}", secs / size, (secs % size) / next)
        }
        None => format!("{secs}{unit}"),
    }
}
