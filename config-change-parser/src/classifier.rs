use crate::event::{ConfigurationItemDiff, PropertyChange};
use crate::rules::{ChangeRule, Classification, IgnoreResourceList, PathMarkerRule, RelationshipRule};

/// Decides whether a configuration diff is worth an inventory refresh.
///
/// Each changed property goes through the rule chain once. The first rule that
/// does not answer `Inspect` classifies the entry, entries no rule claims are
/// significant. The decision is true if any entry is significant.
pub struct DiffClassifier {
    rules: Vec<Box<dyn ChangeRule>>,
}

impl DiffClassifier {
    pub fn new(ignore_list: IgnoreResourceList) -> Self {
        Self::with_rules(vec![
            Box::new(PathMarkerRule::block_device_mappings()),
            Box::new(RelationshipRule::new(ignore_list)),
        ])
    }

    pub fn with_rules(rules: Vec<Box<dyn ChangeRule>>) -> Self {
        Self { rules }
    }

    pub fn classify(&self, diff: Option<&ConfigurationItemDiff>) -> bool {
        let Some(diff) = diff else {
            return false;
        };

        let mut trigger = false;
        for (path, change) in &diff.changed_properties {
            match self.classify_entry(path, change) {
                Classification::Significant => {
                    tracing::debug!("Change of {} is significant.", path);
                    trigger = true;
                }
                _ => tracing::info!("Change of {} was marked as spam. Skipped.", path),
            }
        }

        trigger
    }

    fn classify_entry(&self, path: &str, change: &PropertyChange) -> Classification {
        for rule in &self.rules {
            match rule.classify(path, change) {
                Classification::Inspect => continue,
                classification => {
                    tracing::debug!("Rule {} classified {} as {:?}", rule.name(), path, classification);
                    return classification;
                }
            }
        }
        Classification::Significant
    }
}
