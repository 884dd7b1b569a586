//! Small shared helpers.

/// Format a byte count as a short human-readable size, e.g. `512B`, `4K`,
/// `1.5M`, `12G`. One decimal place below 10 units, whole units above.
pub fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "K", "M", "G", "T"];
    if bytes < 1024 {
        return format!("{}B", bytes);
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if value < 10.0 {
        format!("{:.1}{}", value, UNITS[unit])
    } else {
        format!("{:.0}{}", value, UNITS[unit])
    }
}

/// Parent directory of a slash-separated path: everything before the last
/// separator. Returns `None` when the path has no separator at all.
pub fn parent_dir(path: &str) -> Option<&str> {
    path.rfind('/').map(|idx| &path[..idx])
}
