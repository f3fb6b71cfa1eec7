//! Resource-quantity arithmetic.
//!
//! The API server reports CPU and memory as opaque [`Quantity`] strings
//! ("500m", "4", "16Gi"). The overcommit check needs to sum and compare
//! them, so quantities are reduced to integer millicores and bytes here.
//! Unparseable quantities count as zero rather than failing the check.

use k8s_openapi::apimachinery::pkg::api::resource::Quantity;

/// Reduce a CPU quantity to millicores.
pub fn cpu_millicores(quantity: &Quantity) -> i64 {
    let s = quantity.0.as_str();

    if let Some(millis) = s.strip_suffix('m') {
        millis.parse().unwrap_or(0)
    } else if let Some(nanos) = s.strip_suffix('n') {
        nanos.parse::<i64>().unwrap_or(0) / 1_000_000
    } else {
        // Bare cores, possibly fractional ("2", "0.5")
        (s.parse::<f64>().unwrap_or(0.0) * 1000.0) as i64
    }
}

/// Reduce a memory quantity to bytes.
pub fn memory_bytes(quantity: &Quantity) -> i64 {
    let s = quantity.0.as_str();

    const BINARY: [(&str, i64); 4] = [
        ("Ki", 1 << 10),
        ("Mi", 1 << 20),
        ("Gi", 1 << 30),
        ("Ti", 1 << 40),
    ];
    const DECIMAL: [(&str, i64); 4] = [
        ("k", 1_000),
        ("M", 1_000_000),
        ("G", 1_000_000_000),
        ("T", 1_000_000_000_000),
    ];

    for (suffix, scale) in BINARY {
        if let Some(value) = s.strip_suffix(suffix) {
            return value.parse::<i64>().unwrap_or(0) * scale;
        }
    }
    for (suffix, scale) in DECIMAL {
        if let Some(value) = s.strip_suffix(suffix) {
            return value.parse::<i64>().unwrap_or(0) * scale;
        }
    }
    s.parse().unwrap_or(0)
}

/// Render millicores the way the API server writes them.
pub fn format_millicores(millicores: i64) -> String {
    format!("{millicores}m")
}

/// Render a byte count with the largest exact binary suffix.
pub fn format_bytes(bytes: i64) -> String {
    const SUFFIXES: [(&str, i64); 4] = [
        ("Ti", 1 << 40),
        ("Gi", 1 << 30),
        ("Mi", 1 << 20),
        ("Ki", 1 << 10),
    ];
    for (suffix, scale) in SUFFIXES {
        if bytes != 0 && bytes % scale == 0 {
            return format!("{}{suffix}", bytes / scale);
        }
    }
    bytes.to_string()
}
