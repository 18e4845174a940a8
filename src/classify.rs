use std::fmt::{self, Display};

use tracing::debug;

use crate::{grid::Grid, groups::extract_groups, pattern::Pattern, templates::TemplateLibrary};

/// What a group was recognised as.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Label {
    /// Name of the first template that matched.
    Known(String),
    Unrecognized,
}

impl Label {
    pub fn name(&self) -> Option<&str> {
        match self {
            Label::Known(name) => Some(name),
            Label::Unrecognized => None,
        }
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Known(name) => f.write_str(name),
            Label::Unrecognized => f.write_str("unrecognized"),
        }
    }
}

/// Checks templates in library order, each at 0°, 90°, 180° then 270°, and
/// stops at the first match.
pub fn classify_group(group: &Pattern, library: &TemplateLibrary) -> Label {
    library
        .iter()
        .find(|t| t.matches(group))
        .map_or(Label::Unrecognized, |t| Label::Known(t.name().to_owned()))
}

/// One label per group, in group order.
pub fn classify(groups: &[Pattern], library: &TemplateLibrary) -> Vec<Label> {
    groups.iter().map(|g| classify_group(g, library)).collect()
}

/// Extracts the groups on `grid` and classifies them.
pub fn classify_grid(grid: &Grid, library: &TemplateLibrary) -> Vec<Label> {
    let labels = classify(&extract_groups(grid), library);
    debug!(
        groups = labels.len(),
        unrecognized = labels.iter().filter(|l| **l == Label::Unrecognized).count(),
        "classified groups"
    );
    labels
}
