use std::fs::Metadata;
use std::os::unix::fs::MetadataExt;

/// Get actual disk usage (blocks * block_size)
/// On most Linux systems, st_blocks is in 512-byte units
pub fn disk_usage(metadata: &Metadata) -> u64 {
    metadata.blocks() * 512
}

/// Convert bytes to KiB, rounding up so a non-empty file never reports 0.
pub fn bytes_to_kb(bytes: u64) -> u64 {
    bytes.div_ceil(1024)
}

/// Parse a size string as printed by `docker system df` ("8.2GB", "512MB",
/// "0B") into KiB. Multipliers are 1024-based. Returns None when the string
/// is not a size.
pub fn parse_docker_size(s: &str) -> Option<u64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    // Longest suffixes first so "GB" is not read as "B".
    const UNITS: &[(&str, f64)] = &[
        ("TB", 1024.0 * 1024.0 * 1024.0),
        ("GB", 1024.0 * 1024.0),
        ("MB", 1024.0),
        ("kB", 1.0),
        ("KB", 1.0),
        ("B", 1.0 / 1024.0),
    ];

    let (num_str, multiplier) = UNITS
        .iter()
        .find_map(|(suffix, mult)| s.strip_suffix(suffix).map(|n| (n, *mult)))?;

    let value: f64 = num_str.trim().parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some((value * multiplier) as u64)
}

/// Parse a reclaimable column such as "5.2GB (30%)" into KiB.
pub fn parse_docker_reclaimable(s: &str) -> Option<u64> {
    parse_docker_size(s.split_whitespace().next().unwrap_or(""))
}
