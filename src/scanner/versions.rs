//! Platform level tags understood by the binary scanner

pub const EE6: &str = "ee6";
pub const EE7: &str = "ee7";
pub const EE8: &str = "ee8";
pub const EE9: &str = "ee9";

pub const MP_PREFIX: &str = "mp";

/// MicroProfile release -> scanner tag
const MICROPROFILE_TAGS: &[(&str, &str)] = &[
    ("1.2", "mp1.2"),
    ("1.3", "mp1.3"),
    ("1.4", "mp1.4"),
    ("2.0", "mp2.0"),
    ("2.1", "mp2.1"),
    ("2.2", "mp2.2"),
    ("3.0", "mp3.0"),
    ("3.2", "mp3.2"),
    ("3.3", "mp3.3"),
    ("4.0", "mp4.0"),
    ("4.1", "mp4.1"),
];

/// Map a Java EE / Jakarta EE API version (`8.0`, `9.1`, `ee7`) to its tag.
pub fn java_ee_target(version: &str) -> Option<&'static str> {
    let version = version.trim().to_ascii_lowercase();
    let version = version.strip_prefix("ee").unwrap_or(&version);
    let major = version.split('.').next().unwrap_or_default();

    match major {
        "6" => Some(EE6),
        "7" => Some(EE7),
        "8" => Some(EE8),
        "9" => Some(EE9),
        _ => None,
    }
}

/// Map a MicroProfile version (`4.1`, `mp3.3`) to its tag.
pub fn microprofile_target(version: &str) -> Option<&'static str> {
    let version = version.trim().to_ascii_lowercase();
    let version = version.strip_prefix(MP_PREFIX).unwrap_or(&version);

    MICROPROFILE_TAGS
        .iter()
        .find(|(release, _)| *release == version)
        .map(|(_, tag)| *tag)
}

pub fn supported_microprofile_versions() -> impl Iterator<Item = &'static str> {
    MICROPROFILE_TAGS.iter().map(|(release, _)| *release)
}
