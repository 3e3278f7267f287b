use crate::model::{Version, VersionId};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimelineError {
    #[error("this document has no versions")]
    EmptyTimeline,

    #[error("version number {version_number} appears more than once in the history")]
    InconsistentHistory { version_number: u32 },
}

/// Rejects histories where two records share a version number.
pub fn validate(versions: &[Version]) -> Result<(), TimelineError> {
    let mut seen = BTreeSet::new();
    for version in versions {
        if !seen.insert(version.version_number) {
            return Err(TimelineError::InconsistentHistory {
                version_number: version.version_number,
            });
        }
    }
    Ok(())
}

pub fn latest_of(versions: &[Version]) -> Result<&Version, TimelineError> {
    validate(versions)?;
    versions
        .iter()
        .max_by_key(|version| version.version_number)
        .ok_or(TimelineError::EmptyTimeline)
}

pub fn is_latest(version: &Version, versions: &[Version]) -> Result<bool, TimelineError> {
    Ok(latest_of(versions)?.id == version.id)
}

/// Most recent first. The sort is stable, so equal numbers keep input order.
pub fn ordered_descending(versions: &[Version]) -> Vec<Version> {
    let mut ordered = versions.to_vec();
    ordered.sort_by(|a, b| b.version_number.cmp(&a.version_number));
    ordered
}

/// The version immediately before `version`, if any.
pub fn predecessor_of<'a>(
    version: &Version,
    versions: &'a [Version],
) -> Result<Option<&'a Version>, TimelineError> {
    validate(versions)?;
    Ok(versions
        .iter()
        .filter(|candidate| candidate.version_number < version.version_number)
        .max_by_key(|candidate| candidate.version_number))
}

pub fn find(versions: &[Version], version_id: VersionId) -> Option<&Version> {
    versions.iter().find(|version| version.id == version_id)
}
