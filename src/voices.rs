//! Predefined voice catalog.

/// Voice used when a command does not name one.
pub const DEFAULT_VOICE: &str = "alba";

/// Voices available without voice cloning, in catalog order.
pub const PREDEFINED_VOICES: [&str; 8] = [
    "alba", "marius", "javert", "jean", "fantine", "cosette", "eponine", "azelma",
];

/// Position of a predefined voice in the catalog.
pub fn catalog_index(voice: &str) -> Option<usize> {
    PREDEFINED_VOICES.iter().position(|name| *name == voice)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_voice_is_first_in_catalog() {
        assert_eq!(catalog_index(DEFAULT_VOICE), Some(0));
    }

    #[test]
    fn catalog_lookup_is_case_sensitive() {
        assert_eq!(catalog_index("azelma"), Some(7));
        assert_eq!(catalog_index("Azelma"), None);
        assert_eq!(catalog_index("nobody"), None);
    }
}
