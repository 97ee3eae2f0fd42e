//! Hierarchical settings tree and path resolution
//!
//! Settings are grouped into named groups which can nest. A setting is
//! addressed by the ids of the groups leading to it followed by its own id,
//! e.g. `["camera", "cooling", "target_temperature"]` or, in string form,
//! `camera/cooling/target_temperature`.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};

/// Separator used by [`SettingsTree::resolve_str`]
pub const PATH_SEPARATOR: char = '/';

/// Current value of a setting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

/// Kind of a setting value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingKind {
    Bool,
    Integer,
    Float,
    Text,
}

impl SettingValue {
    pub fn kind(&self) -> SettingKind {
        match self {
            SettingValue::Bool(_) => SettingKind::Bool,
            SettingValue::Integer(_) => SettingKind::Integer,
            SettingValue::Float(_) => SettingKind::Float,
            SettingValue::Text(_) => SettingKind::Text,
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            SettingValue::Integer(v) => Some(*v as f64),
            SettingValue::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Bool(v) => write!(f, "{}", v),
            SettingValue::Integer(v) => write!(f, "{}", v),
            SettingValue::Float(v) => write!(f, "{}", v),
            SettingValue::Text(v) => write!(f, "{}", v),
        }
    }
}

/// Restriction on the values a setting may take
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SettingConstraint {
    /// Numeric value within `min..=max`, optionally on a `step` grid from `min`
    Range {
        min: f64,
        max: f64,
        #[serde(default)]
        step: Option<f64>,
    },
    /// Text value from a fixed list
    Choice { options: Vec<String> },
    /// Text value of at most `max` characters
    MaxLength { max: usize },
}

impl SettingConstraint {
    fn check(&self, value: &SettingValue) -> std::result::Result<(), String> {
        match (self, value) {
            (SettingConstraint::Range { min, max, step }, v) => {
                let Some(n) = v.as_f64() else {
                    return Err(format!("{} is not numeric", v));
                };
                if n < *min || n > *max {
                    return Err(format!("{} is outside {}..={}", n, min, max));
                }
                if let Some(step) = step.filter(|s| *s > 0.0) {
                    let steps = (n - min) / step;
                    if (steps - steps.round()).abs() > 1e-9 {
                        return Err(format!("{} is not a multiple of {} from {}", n, step, min));
                    }
                }
                Ok(())
            }
            (SettingConstraint::Choice { options }, SettingValue::Text(s)) => {
                if options.iter().any(|o| o == s) {
                    Ok(())
                } else {
                    Err(format!("'{}' is not one of {:?}", s, options))
                }
            }
            (SettingConstraint::MaxLength { max }, SettingValue::Text(s)) => {
                let len = s.chars().count();
                if len <= *max {
                    Ok(())
                } else {
                    Err(format!("'{}' is {} characters, limit is {}", s, len, max))
                }
            }
            (_, v) => Err(format!("{} is not text", v)),
        }
    }
}

/// A leaf setting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Setting {
    pub id: String,
    pub label: String,
    pub value: SettingValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint: Option<SettingConstraint>,
}

impl Setting {
    pub fn new(id: impl Into<String>, label: impl Into<String>, value: SettingValue) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            value,
            description: None,
            constraint: None,
        }
    }

    pub fn with_constraint(mut self, constraint: SettingConstraint) -> Self {
        self.constraint = Some(constraint);
        self
    }

    pub fn kind(&self) -> SettingKind {
        self.value.kind()
    }

    /// Check the current value against the constraint
    pub fn validate(&self) -> Result<()> {
        match &self.constraint {
            Some(constraint) => constraint.check(&self.value).map_err(|e| {
                DashboardError::Config(format!("Setting '{}' is invalid: {}", self.id, e))
            }),
            None => Ok(()),
        }
    }

    /// Whether `candidate` could replace the current value
    pub fn accepts(&self, candidate: &SettingValue) -> bool {
        candidate.kind() == self.kind()
            && self
                .constraint
                .as_ref()
                .is_none_or(|c| c.check(candidate).is_ok())
    }
}

/// A child of a [`SettingGroup`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SettingEntry {
    Group(SettingGroup),
    Setting(Setting),
}

impl SettingEntry {
    pub fn id(&self) -> &str {
        match self {
            SettingEntry::Group(g) => &g.id,
            SettingEntry::Setting(s) => &s.id,
        }
    }
}

/// A named group of settings and nested groups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingGroup {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub children: Vec<SettingEntry>,
}

impl SettingGroup {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            children: Vec::new(),
        }
    }

    pub fn with_group(mut self, group: SettingGroup) -> Self {
        self.children.push(SettingEntry::Group(group));
        self
    }

    pub fn with_setting(mut self, setting: Setting) -> Self {
        self.children.push(SettingEntry::Setting(setting));
        self
    }

    /// Nested groups, in declaration order
    pub fn groups(&self) -> impl Iterator<Item = &SettingGroup> {
        self.children.iter().filter_map(|entry| match entry {
            SettingEntry::Group(g) => Some(g),
            SettingEntry::Setting(_) => None,
        })
    }

    /// Leaf settings, in declaration order
    pub fn settings(&self) -> impl Iterator<Item = &Setting> {
        self.children.iter().filter_map(|entry| match entry {
            SettingEntry::Setting(s) => Some(s),
            SettingEntry::Group(_) => None,
        })
    }
}

/// Walk `group_path` from the root, keeping only groups at every level.
///
/// The first group whose id matches a segment wins. A segment without a
/// match ends the walk.
fn walk_groups<'a, S: AsRef<str>>(
    root_groups: &'a [SettingGroup],
    group_path: &[S],
) -> Option<&'a SettingGroup> {
    let (first, rest) = group_path.split_first()?;
    let mut current = root_groups.iter().find(|g| g.id == first.as_ref())?;
    for segment in rest {
        let segment = segment.as_ref();
        match current.groups().find(|g| g.id == segment) {
            Some(next) => current = next,
            None => {
                tracing::trace!("No group '{}' under '{}'", segment, current.id);
                return None;
            }
        }
    }
    Some(current)
}

/// Resolve a setting path against a list of root groups.
///
/// Every segment except the last names a group; the last one names a
/// setting inside the final group. Returns `None` for an empty path, a
/// single segment (no settings live at root level), a missing group, or a
/// final segment that is not a setting.
pub fn resolve<'a, S: AsRef<str>>(
    root_groups: &'a [SettingGroup],
    path: &[S],
) -> Option<&'a Setting> {
    let (leaf, group_path) = path.split_last()?;
    let parent = walk_groups(root_groups, group_path)?;
    let leaf = leaf.as_ref();
    parent.settings().find(|s| s.id == leaf)
}

/// Validated, read-only settings tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<SettingGroup>", into = "Vec<SettingGroup>")]
pub struct SettingsTree {
    groups: Vec<SettingGroup>,
}

impl SettingsTree {
    /// Build a tree, rejecting duplicate sibling ids and invalid values
    pub fn new(groups: Vec<SettingGroup>) -> Result<Self> {
        check_unique(groups.iter().map(|g| g.id.as_str()), "root")?;
        for group in &groups {
            validate_group(group)?;
        }
        Ok(Self { groups })
    }

    pub fn groups(&self) -> &[SettingGroup] {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn resolve<S: AsRef<str>>(&self, path: &[S]) -> Option<&Setting> {
        resolve(&self.groups, path)
    }

    /// Resolve a `/`-separated path; empty segments are ignored
    pub fn resolve_str(&self, path: &str) -> Option<&Setting> {
        self.resolve(&split_path(path))
    }

    /// Find a group by the ids leading to it
    pub fn find_group<S: AsRef<str>>(&self, path: &[S]) -> Option<&SettingGroup> {
        walk_groups(&self.groups, path)
    }

    /// Every resolvable setting path, depth first, in declaration order
    pub fn paths(&self) -> Vec<String> {
        fn collect(group: &SettingGroup, prefix: &str, out: &mut Vec<String>) {
            let prefix = format!("{}{}{}", prefix, group.id, PATH_SEPARATOR);
            for entry in &group.children {
                match entry {
                    SettingEntry::Setting(s) => out.push(format!("{}{}", prefix, s.id)),
                    SettingEntry::Group(g) => collect(g, &prefix, out),
                }
            }
        }

        let mut out = Vec::new();
        for group in &self.groups {
            collect(group, "", &mut out);
        }
        out
    }
}

impl TryFrom<Vec<SettingGroup>> for SettingsTree {
    type Error = DashboardError;

    fn try_from(groups: Vec<SettingGroup>) -> Result<Self> {
        Self::new(groups)
    }
}

impl From<SettingsTree> for Vec<SettingGroup> {
    fn from(tree: SettingsTree) -> Self {
        tree.groups
    }
}

/// Split a `/`-separated path into trimmed, non-empty segments
pub fn split_path(path: &str) -> Vec<&str> {
    path.split(PATH_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

fn check_unique<'a>(ids: impl Iterator<Item = &'a str>, parent: &str) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(DashboardError::Config(format!(
                "Duplicate id '{}' under '{}'",
                id, parent
            )));
        }
    }
    Ok(())
}

fn validate_group(group: &SettingGroup) -> Result<()> {
    check_unique(group.children.iter().map(SettingEntry::id), &group.id)?;
    for entry in &group.children {
        match entry {
            SettingEntry::Group(g) => validate_group(g)?,
            SettingEntry::Setting(s) => s.validate()?,
        }
    }
    Ok(())
}
