//! Timeline view.

use chrono::{DateTime, Utc};
use serde::Serialize;

use semlens_model::{ColumnMapping, DataSource, roles};

use crate::dates::parse_date;
use crate::extract::{RoleColumn, optional_text};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    pub id: String,
    pub label: String,
    pub start: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TimelineEvent {
    pub fn is_instant(&self) -> bool {
        self.end.is_none()
    }
}

/// Dated events sorted by start. Rows whose start does not parse are
/// skipped; an end that does not parse or precedes the start is dropped.
pub fn to_timeline(source: &DataSource, mappings: &[ColumnMapping]) -> Vec<TimelineEvent> {
    let Some(start) = RoleColumn::resolve(source, mappings, roles::START_DATE) else {
        tracing::debug!("timeline transform skipped: start date is not mapped");
        return Vec::new();
    };
    let end = RoleColumn::resolve(source, mappings, roles::END_DATE);
    let label = RoleColumn::resolve(source, mappings, roles::EVENT_LABEL);
    let event_id = RoleColumn::resolve(source, mappings, roles::EVENT_ID);
    let category = RoleColumn::resolve(source, mappings, roles::CATEGORY);
    let description = RoleColumn::resolve(source, mappings, roles::DESCRIPTION);

    let mut events = Vec::new();
    let mut skipped = 0usize;
    for (index, row) in source.parsed_data.iter().enumerate() {
        let Some(start_at) = parse_date(start.value(row)) else {
            skipped += 1;
            continue;
        };
        let end_at = end
            .and_then(|column| parse_date(column.value(row)))
            .filter(|end_at| *end_at >= start_at);
        let id = optional_text(event_id, row).unwrap_or_else(|| format!("event-{index}"));
        events.push(TimelineEvent {
            label: optional_text(label, row).unwrap_or_else(|| id.clone()),
            id,
            start: start_at,
            end: end_at,
            category: optional_text(category, row),
            description: optional_text(description, row),
        });
    }
    if skipped > 0 {
        tracing::debug!(skipped, "timeline rows with an unparsable start were skipped");
    }

    events.sort_by_key(|event| event.start);
    events
}
