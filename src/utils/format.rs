//! Human-readable sizes

const UNIT: u64 = 1024;
const PREFIXES: [char; 6] = ['K', 'M', 'G', 'T', 'P', 'E'];

/// Format a byte count, e.g. `1536` as `"1.5 KB"`.
pub fn human_size(bytes: u64) -> String {
    if bytes < UNIT {
        return format!("{bytes} B");
    }

    let mut exp = 0;
    let mut magnitude = UNIT;
    while exp + 1 < PREFIXES.len() && bytes / magnitude >= UNIT {
        magnitude *= UNIT;
        exp += 1;
    }

    format!("{:.1} {}B", bytes as f64 / magnitude as f64, PREFIXES[exp])
}
