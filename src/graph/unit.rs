use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;

const CLASS_SUFFIX: &str = ".class";

/// A class-like archive member, identified by its dotted name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Unit {
    /// Fully qualified name (e.g., "com.example.app.Main")
    pub name: String,

    /// Archive the unit was loaded from
    pub archive: PathBuf,

    /// Names of the units this one refers to, whether or not they were scanned
    pub references: BTreeSet<String>,
}

impl Unit {
    pub fn new(name: String, archive: PathBuf, references: BTreeSet<String>) -> Self {
        Self {
            name,
            archive,
            references,
        }
    }
}

/// Whether an archive member holds a class
pub fn is_class_member(member_name: &str) -> bool {
    member_name.len() > CLASS_SUFFIX.len()
        && member_name.ends_with(CLASS_SUFFIX)
        && !member_name.ends_with('/')
}

/// Map an archive member path to a unit name: `com/a/X.class` → `com.a.X`
pub fn unit_name_for_member(member_name: &str) -> Option<String> {
    if !is_class_member(member_name) {
        return None;
    }
    let stem = &member_name[..member_name.len() - CLASS_SUFFIX.len()];
    Some(stem.replace('/', "."))
}
