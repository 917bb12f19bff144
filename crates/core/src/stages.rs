//! Construction stage definitions.
//!
//! Fiber installation proceeds through ten fixed stages. Work entries record
//! progress against exactly one stage; the codes below are stored verbatim in
//! `work_entries.stage_code`.

/// A construction stage with its photo/measurement requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageDef {
    pub code: &'static str,
    pub name: &'static str,
    /// Minimum number of photos required for a complete entry.
    pub requires_photos_min: u32,
    /// Whether width/depth measurements are required.
    pub requires_measurements: bool,
}

/// The ten construction stages, in execution order.
pub const STAGES: &[StageDef] = &[
    StageDef {
        code: "stage_1_marking",
        name: "Route marking",
        requires_photos_min: 1,
        requires_measurements: false,
    },
    StageDef {
        code: "stage_2_excavation",
        name: "Excavation",
        requires_photos_min: 2,
        requires_measurements: true,
    },
    StageDef {
        code: "stage_3_conduit",
        name: "Conduit laying",
        requires_photos_min: 2,
        requires_measurements: true,
    },
    StageDef {
        code: "stage_4_cable",
        name: "Cable pulling",
        requires_photos_min: 1,
        requires_measurements: false,
    },
    StageDef {
        code: "stage_5_splice",
        name: "Splicing",
        requires_photos_min: 1,
        requires_measurements: false,
    },
    StageDef {
        code: "stage_6_test",
        name: "Testing",
        requires_photos_min: 1,
        requires_measurements: false,
    },
    StageDef {
        code: "stage_7_connect",
        name: "Connection",
        requires_photos_min: 1,
        requires_measurements: false,
    },
    StageDef {
        code: "stage_8_final",
        name: "Final inspection",
        requires_photos_min: 1,
        requires_measurements: false,
    },
    StageDef {
        code: "stage_9_backfill",
        name: "Backfill",
        requires_photos_min: 1,
        requires_measurements: true,
    },
    StageDef {
        code: "stage_10_surface",
        name: "Surface restoration",
        requires_photos_min: 2,
        requires_measurements: false,
    },
];

/// Valid work methods for a work entry.
pub const VALID_METHODS: &[&str] = &["mole", "hand", "excavator", "trencher", "documentation"];

/// Valid photo labels.
pub const VALID_PHOTO_LABELS: &[&str] = &["before", "during", "after", "instrument", "other"];

/// Look up a stage definition by its code.
pub fn find_stage(code: &str) -> Option<&'static StageDef> {
    STAGES.iter().find(|s| s.code == code)
}

/// Check whether a stage code is one of the known stages.
pub fn is_valid_stage_code(code: &str) -> bool {
    find_stage(code).is_some()
}

/// Check whether a work method is valid.
pub fn is_valid_method(method: &str) -> bool {
    VALID_METHODS.contains(&method)
}

/// Check whether a photo label is valid.
pub fn is_valid_photo_label(label: &str) -> bool {
    VALID_PHOTO_LABELS.contains(&label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn there_are_ten_stages() {
        assert_eq!(STAGES.len(), 10);
    }

    #[test]
    fn stage_codes_resolve() {
        assert!(is_valid_stage_code("stage_1_marking"));
        assert!(is_valid_stage_code("stage_10_surface"));
        assert!(!is_valid_stage_code("stage_11_party"));
        assert!(!is_valid_stage_code(""));
    }

    #[test]
    fn find_stage_returns_definition() {
        let stage = find_stage("stage_2_excavation").expect("stage should exist");
        assert_eq!(stage.name, "Excavation");
        assert!(stage.requires_measurements);
    }

    #[test]
    fn methods_and_labels() {
        assert!(is_valid_method("mole"));
        assert!(!is_valid_method("teleport"));
        assert!(is_valid_photo_label("before"));
        assert!(!is_valid_photo_label("selfie"));
    }
}
