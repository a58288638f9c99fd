//! Scene format versions and the rules for loading older scenes.
//!
//! Every `.tree.ron` file records the `garland_version` it was written with.
//! A scene older than [`current_format_version`] loads as long as no revision
//! between its version and the current one is marked as breaking.

/// One revision of the scene format.
struct Revision {
    version: &'static str,
    /// Older scenes need hand editing to load with this revision.
    breaking: bool,
}

/// Oldest first. The newest entry is what new scenes are written with.
const REVISIONS: &[Revision] = &[
    // needles, ornaments, photos and ground
    Revision {
        version: "0.1",
        breaking: false,
    },
    // adds `starfield` and `shooting_stars`, both defaulted when missing
    Revision {
        version: "0.2",
        breaking: false,
    },
];

/// How a scene's `garland_version` relates to the version this crate writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionStatus {
    /// Written with the current format.
    Current,
    /// Written with an older format that loads unchanged once the version is bumped.
    Outdated {
        /// Version recorded in the scene.
        found: String,
        /// Version the scene is upgraded to.
        current: &'static str,
    },
    /// Written with an older format and a breaking revision lies in between.
    Incompatible {
        /// Version recorded in the scene.
        found: String,
        /// Version this crate reads.
        current: &'static str,
    },
    /// Not a version this crate has ever written.
    Unknown,
}

/// The format version new scenes are written with.
pub fn current_format_version() -> &'static str {
    REVISIONS.last().map_or("0.0", |revision| revision.version)
}

/// Returns `true` when `from` is older than `to` and nothing between them breaks.
pub fn can_auto_upgrade(from: &str, to: &str) -> bool {
    upgrade_path_is_clear(REVISIONS, from, to)
}

fn upgrade_path_is_clear(revisions: &[Revision], from: &str, to: &str) -> bool {
    let position = |version: &str| revisions.iter().position(|r| r.version == version);
    match (position(from), position(to)) {
        (Some(from), Some(to)) if from < to => {
            revisions[from + 1..=to].iter().all(|r| !r.breaking)
        }
        _ => false,
    }
}

/// Classifies a scene's `garland_version`.
pub fn validate_version(version: &str) -> VersionStatus {
    let current = current_format_version();
    if version == current {
        return VersionStatus::Current;
    }
    if !REVISIONS.iter().any(|r| r.version == version) {
        return VersionStatus::Unknown;
    }

    let found = version.to_string();
    if can_auto_upgrade(version, current) {
        VersionStatus::Outdated { found, current }
    } else {
        VersionStatus::Incompatible { found, current }
    }
}
