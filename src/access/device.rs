//! Device fingerprint classification.
//!
//! Maps a raw client descriptor (typically the `User-Agent` header) to a
//! coarse label stored on the session record. Descriptive metadata only:
//! the validator and the guard never consult it.

/// Ordered substring rules, first match wins. Mobile platforms come before the
/// generic "mobile" marker; Edge and Opera embed "chrome" and Chrome embeds
/// "safari", so the desktop entries are ordered most-specific first.
const DEVICE_RULES: &[(&str, &str)] = &[
    ("iphone", "iPhone"),
    ("ipad", "iPad"),
    ("android", "Android"),
    ("windows phone", "Windows Phone"),
    ("mobile", "Mobile"),
    ("tablet", "Tablet"),
    ("edg", "Edge"),
    ("opr", "Opera"),
    ("opera", "Opera"),
    ("firefox", "Firefox"),
    ("chrome", "Chrome"),
    ("safari", "Safari"),
];

const UNKNOWN_DEVICE: &str = "Unknown";

/// Classify a raw device descriptor, case-insensitively.
#[must_use]
pub fn classify_device(raw_descriptor: &str) -> &'static str {
    let descriptor = raw_descriptor.to_lowercase();
    DEVICE_RULES
        .iter()
        .find(|(needle, _)| descriptor.contains(needle))
        .map_or(UNKNOWN_DEVICE, |(_, label)| label)
}
