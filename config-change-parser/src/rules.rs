use crate::event::{ChangeType, PropertyChange, RelatedResource};

pub const BLOCK_DEVICE_MAPPINGS_MARKER: &str = "BlockDeviceMappings";
pub const RELATIONSHIPS_MARKER: &str = "Relationships";
pub const DEFAULT_IGNORED_RESOURCE_TYPE: &str = "AWS::EC2::Volume";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Noise, does not contribute to the decision.
    Ignore,
    /// The rule does not decide this entry, the next rule gets it.
    Inspect,
    Significant,
}

pub trait ChangeRule: Send + Sync {
    fn name(&self) -> &'static str;
    fn classify(&self, path: &str, change: &PropertyChange) -> Classification;
}

/// Resource types whose relationship changes are noise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreResourceList(Vec<String>);

impl IgnoreResourceList {
    pub fn new<I, S>(resource_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list: Vec<String> = Vec::new();
        for resource_type in resource_types {
            let resource_type = resource_type.into();
            if !list.contains(&resource_type) {
                list.push(resource_type);
            }
        }
        Self(list)
    }

    pub fn contains(&self, resource_type: &str) -> bool {
        self.0.iter().any(|ignored| ignored == resource_type)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl Default for IgnoreResourceList {
    fn default() -> Self {
        Self::new([DEFAULT_IGNORED_RESOURCE_TYPE])
    }
}

/// Ignores every entry whose path contains `marker`.
pub struct PathMarkerRule {
    name: &'static str,
    marker: &'static str,
}

impl PathMarkerRule {
    /// Volume attach/detach shows up under the block device mappings.
    pub fn block_device_mappings() -> Self {
        Self {
            name: "block-device-mappings",
            marker: BLOCK_DEVICE_MAPPINGS_MARKER,
        }
    }
}

impl ChangeRule for PathMarkerRule {
    fn name(&self) -> &'static str {
        self.name
    }

    fn classify(&self, path: &str, _change: &PropertyChange) -> Classification {
        if path.contains(self.marker) {
            Classification::Ignore
        } else {
            Classification::Inspect
        }
    }
}

pub struct ResourceTypeSuppressor {
    ignore_list: IgnoreResourceList,
}

impl ResourceTypeSuppressor {
    pub fn new(ignore_list: IgnoreResourceList) -> Self {
        Self { ignore_list }
    }

    /// The related resource the suppression decision is made on.
    pub fn resolve_resource(change: &PropertyChange) -> Option<RelatedResource> {
        match change.change_type {
            ChangeType::Delete | ChangeType::Update => change.previous_resource(),
            ChangeType::Create => change.updated_resource(),
            ChangeType::Unknown => None,
        }
    }

    /// Missing values resolve to no resource type, which is never suppressed.
    pub fn should_ignore(&self, change: &PropertyChange) -> bool {
        Self::resolve_resource(change)
            .and_then(|resource| resource.resource_type)
            .is_some_and(|resource_type| self.ignore_list.contains(&resource_type))
    }
}

/// Relationship changes are significant unless the related resource type is ignored.
pub struct RelationshipRule {
    suppressor: ResourceTypeSuppressor,
}

impl RelationshipRule {
    pub fn new(ignore_list: IgnoreResourceList) -> Self {
        Self {
            suppressor: ResourceTypeSuppressor::new(ignore_list),
        }
    }
}

impl ChangeRule for RelationshipRule {
    fn name(&self) -> &'static str {
        "relationships"
    }

    fn classify(&self, path: &str, change: &PropertyChange) -> Classification {
        if !path.contains(RELATIONSHIPS_MARKER) {
            return Classification::Inspect;
        }

        if self.suppressor.should_ignore(change) {
            let resource = ResourceTypeSuppressor::resolve_resource(change).unwrap_or_default();
            tracing::info!(
                "Relationship change {} with {} {} was marked as spam. Skipped.",
                path,
                resource.resource_type.as_deref().unwrap_or("unknown"),
                resource.label()
            );
            Classification::Ignore
        } else {
            Classification::Significant
        }
    }
}
