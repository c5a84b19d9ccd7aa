//! Field descriptor merging
//!
//! A descriptor is the unit a form renders against: one key's metadata plus
//! its live value. Merging is immutable - every call produces fresh owned
//! descriptors, so two loads never alias the same metadata entry.
//!
//! Two merge flavors exist:
//!
//! - [`merge_strict`] for edit screens: only keys present in both the
//!   catalogue and the value payload become descriptors. Value keys without
//!   metadata are *not* dropped; they come back in a passthrough map that the
//!   submission controller sends along unchanged, so a server newer than the
//!   client cannot lose data on a round trip.
//! - [`merge_permissive`] for detail screens: every value key yields an
//!   entry, metadata attached when the catalogue has one.

use crate::category::Category;
use crate::schema::{FieldMetadata, OptionsCatalogue};
use log::debug;
use serde_json::Value;
use std::collections::BTreeMap;

/// Metadata plus live value for one settings key
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Settings key
    pub key: String,
    /// Metadata from the options catalogue
    pub metadata: FieldMetadata,
    /// Live value from the category payload
    pub value: Value,
}

/// Entry of a permissive (detail-view) merge
#[derive(Debug, Clone, PartialEq)]
pub struct DetailEntry {
    /// Settings key
    pub key: String,
    /// Metadata, when the catalogue knows the key
    pub metadata: Option<FieldMetadata>,
    /// Live value
    pub value: Value,
}

/// Result of a strict merge
#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    /// Renderable descriptors, keyed and ordered by settings key
    pub descriptors: BTreeMap<String, FieldDescriptor>,
    /// Value keys with no (or hidden) metadata, preserved for round-tripping
    pub passthrough: BTreeMap<String, Value>,
}

/// Merge a catalogue with a category's value payload for an edit screen.
///
/// Hidden fields and fields the catalogue does not know go into the
/// passthrough map instead of becoming descriptors.
#[must_use]
pub fn merge_strict(
    options: &OptionsCatalogue,
    values: &BTreeMap<String, Value>,
) -> MergeOutcome {
    let mut outcome = MergeOutcome::default();

    for (key, value) in values {
        match options.get(key) {
            Some(metadata) if !metadata.hidden => {
                outcome.descriptors.insert(
                    key.clone(),
                    FieldDescriptor {
                        key: key.clone(),
                        metadata: metadata.clone(),
                        value: value.clone(),
                    },
                );
            }
            _ => {
                debug!("No renderable metadata for {key}, preserving value as passthrough");
                outcome.passthrough.insert(key.clone(), value.clone());
            }
        }
    }

    outcome
}

/// Merge for a detail screen: every value key yields an entry, metadata
/// looked up permissively.
#[must_use]
pub fn merge_permissive(
    options: &OptionsCatalogue,
    values: &BTreeMap<String, Value>,
) -> Vec<DetailEntry> {
    values
        .iter()
        .map(|(key, value)| DetailEntry {
            key: key.clone(),
            metadata: options.get(key).cloned(),
            value: value.clone(),
        })
        .collect()
}

/// Keys of an instanced category, split per instance
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstanceBuckets {
    /// Keys of the general (default) instance - whatever the numbered
    /// prefixes did not consume
    pub default: Vec<String>,
    /// Keys per instance prefix, in registry order
    pub instances: Vec<(&'static str, Vec<String>)>,
}

/// Split a key set into per-instance buckets for an instanced category.
///
/// A key belongs to the first instance prefix that matches it; everything
/// else lands in the default bucket. Bucket contents keep the input order.
#[must_use]
pub fn split_instances<'a, I>(category: &Category, keys: I) -> InstanceBuckets
where
    I: IntoIterator<Item = &'a str>,
{
    let mut buckets = InstanceBuckets {
        default: Vec::new(),
        instances: category
            .instance_prefixes
            .iter()
            .map(|p| (*p, Vec::new()))
            .collect(),
    };

    for key in keys {
        let claimed = buckets
            .instances
            .iter_mut()
            .find(|(prefix, _)| key.starts_with(prefix));
        match claimed {
            Some((_, bucket)) => bucket.push(key.to_string()),
            None => buckets.default.push(key.to_string()),
        }
    }

    buckets
}

// =============================================================================
// Tests
// =============================================================================
