//! Works out which assignments a student may see.

use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::availability;
use crate::model::assignment_item::{Assignment, AssignmentItem};

/// Filters the catalog down to what an enrolled student can see right now.
///
/// An assignment must be published, belong to one of the student's courses,
/// belong to the student's organization, and be inside its availability window.
/// The result is ordered by course name, then unit order (unassigned last),
/// then creation time.
pub fn visible_assignments(
    all_assignments: &[Assignment],
    enrolled_course_ids: &HashSet<String>,
    organization_id: &str,
    now: DateTime<Utc>,
) -> Vec<Assignment> {
    let mut visible = student_catalog(all_assignments, enrolled_course_ids, organization_id);
    visible.retain(|a| availability::is_visible(now, a.available_from, a.available_to));
    visible
}

/// Published assignments from the student's courses and organization, whatever
/// their availability window, in catalog order.
pub fn student_catalog(
    all_assignments: &[Assignment],
    enrolled_course_ids: &HashSet<String>,
    organization_id: &str,
) -> Vec<Assignment> {
    if enrolled_course_ids.is_empty() {
        return Vec::new();
    }

    let mut catalog = all_assignments
        .iter()
        .filter(|a| a.published)
        .filter(|a| enrolled_course_ids.contains(&a.course_id))
        .filter(|a| a.organization_id == organization_id)
        .cloned()
        .collect::<Vec<Assignment>>();

    catalog.sort_by(catalog_order);
    catalog
}

/// Tags assignments with their window status at `now`.
///
/// By default only visible assignments are listed, and all of them are open.
/// With `include_unavailable` the upcoming and closed ones are listed too.
pub fn assignment_items(
    all_assignments: &[Assignment],
    enrolled_course_ids: &HashSet<String>,
    organization_id: &str,
    now: DateTime<Utc>,
    include_unavailable: bool,
) -> Vec<AssignmentItem> {
    let assignments = if include_unavailable {
        student_catalog(all_assignments, enrolled_course_ids, organization_id)
    } else {
        visible_assignments(all_assignments, enrolled_course_ids, organization_id, now)
    };
    assignments
        .into_iter()
        .map(|a| AssignmentItem::new(a, now))
        .collect()
}

fn catalog_order(a: &Assignment, b: &Assignment) -> Ordering {
    a.course_name
        .cmp(&b.course_name)
        .then_with(|| match (a.unit_order, b.unit_order) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.created_at.cmp(&b.created_at))
}
