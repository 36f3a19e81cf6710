use crate::artifact::Artifact;
use crate::error::{Error, Result};

const ANY: &str = "*";

/// Check that a selector has the form `group:artifact`
///
/// Either part may be `*`. Neither part may be empty.
pub fn validate_selector(selector: &str) -> Result<()> {
    match selector.split_once(':') {
        Some((group, artifact))
            if !group.is_empty() && !artifact.is_empty() && !artifact.contains(':') =>
        {
            Ok(())
        }
        _ => Err(Error::Configuration(format!(
            "Invalid artifact selector '{}', expected 'group:artifact'",
            selector
        ))),
    }
}

/// Whether any selector in the list accepts the artifact
pub fn matches_any(selectors: &[String], artifact: &Artifact) -> bool {
    selectors.iter().any(|selector| matches(selector, artifact))
}

fn matches(selector: &str, artifact: &Artifact) -> bool {
    let Some((group, id)) = selector.split_once(':') else {
        return false;
    };
    part_matches(group, &artifact.group_id) && part_matches(id, &artifact.artifact_id)
}

fn part_matches(pattern: &str, value: &str) -> bool {
    pattern == ANY || pattern == value
}
