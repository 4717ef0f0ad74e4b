//! Groups a flat list of uploaded resources for display.
//!
//! Labeled resources are bucketed by label first. What is left is grouped by
//! upload time: each resource not yet taken anchors a window and pulls in every
//! other untaken resource uploaded within `window` of it. Windows are anchored,
//! not chained, so two uploads four minutes apart can land in different groups
//! when an earlier anchor claims one of them.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};

use crate::model::resource::{GroupedResource, Resource, ResourceGroup};

pub const DEFAULT_WINDOW: Duration = Duration::minutes(5);

const TITLE_PREFIX_CHARS: usize = 30;

pub fn group_resources(resources: &[Resource]) -> Vec<GroupedResource> {
    group_resources_within(resources, DEFAULT_WINDOW)
}

pub fn group_resources_within(resources: &[Resource], window: Duration) -> Vec<GroupedResource> {
    let mut grouped = Vec::new();
    let mut consumed: HashSet<&str> = HashSet::new();

    // Label buckets, in the order each label is first seen
    let mut labels: Vec<&str> = Vec::new();
    let mut buckets: HashMap<&str, Vec<&Resource>> = HashMap::new();
    for resource in resources {
        let Some(label) = resource.group_label() else {
            continue;
        };
        if !consumed.insert(resource.id.as_str()) {
            continue;
        }
        buckets
            .entry(label)
            .or_insert_with(|| {
                labels.push(label);
                Vec::new()
            })
            .push(resource);
    }

    for label in labels {
        let Some(mut members) = buckets.remove(label) else {
            continue;
        };
        members.sort_by_key(|r| r.created_at);
        grouped.push(GroupedResource::Group(label_group(label, members)));
    }

    // Upload-time windows over everything the labels left behind
    for (i, anchor) in resources.iter().enumerate() {
        if consumed.contains(anchor.id.as_str()) {
            continue;
        }

        let mut members = vec![anchor];
        consumed.insert(anchor.id.as_str());
        for other in &resources[i + 1..] {
            if consumed.contains(other.id.as_str()) {
                continue;
            }
            if within(anchor.created_at, other.created_at, window) {
                consumed.insert(other.id.as_str());
                members.push(other);
            }
        }

        if members.len() > 1 {
            members.sort_by_key(|r| r.created_at);
            grouped.push(GroupedResource::Group(upload_group(anchor, members)));
        } else {
            grouped.push(GroupedResource::Single(anchor.clone()));
        }
    }

    grouped
}

fn within(a: DateTime<Utc>, b: DateTime<Utc>, window: Duration) -> bool {
    (a - b).abs() <= window
}

/// Label groups use the label itself as the title prefix, not a member's title.
fn label_group(label: &str, members: Vec<&Resource>) -> ResourceGroup {
    let count = members.len();
    build_group(
        format!("label:{label}"),
        format!("{count} Resources - {label}"),
        format!("Resources labeled \"{label}\""),
        Some(label.to_string()),
        members,
    )
}

fn upload_group(anchor: &Resource, members: Vec<&Resource>) -> ResourceGroup {
    let count = members.len();
    let first_title = members.first().map(|r| r.title.as_str()).unwrap_or_default();
    let prefix: String = first_title.chars().take(TITLE_PREFIX_CHARS).collect();
    build_group(
        format!("upload:{}", anchor.id),
        format!("{count} Resources - {prefix}"),
        format!("Uploaded together on {}", anchor.created_at.format("%Y-%m-%d %H:%M")),
        None,
        members,
    )
}

fn build_group(
    id: String,
    title: String,
    description: String,
    label: Option<String>,
    members: Vec<&Resource>,
) -> ResourceGroup {
    let mut file_types: Vec<String> = Vec::new();
    for member in &members {
        if !file_types.contains(&member.file_type) {
            file_types.push(member.file_type.clone());
        }
    }

    ResourceGroup {
        id,
        title,
        description,
        label,
        created_at: members
            .iter()
            .map(|r| r.created_at)
            .min()
            .unwrap_or(DateTime::<Utc>::MIN_UTC),
        total_size: members.iter().map(|r| r.file_size).sum(),
        file_types,
        resources: members.into_iter().cloned().collect(),
    }
}
