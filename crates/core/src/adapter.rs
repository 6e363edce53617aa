//! Turns the backend's stage map into an ordered list of [`Stage`]s.
//!
//! The trials store keys stages by number (`"1"`, `"2"`, …). Depending on how
//! the realtime database serializes them the payload arrives either as an
//! object or as an array with a leading `null`. Both shapes are accepted.
//!
//! Ordering never depends on map iteration: an explicit `order` field wins,
//! then a numeric key (or array index), then the key text. Entries that are
//! `null` or not objects are skipped, and malformed fields degrade to empty
//! values instead of failing.

use serde_json::{Map, Value};

use crate::model::{Stage, StageLabelStyle, Task};

/// Sort key for one raw descriptor. Derived `Ord` gives the precedence
/// explicit order < numeric key < textual key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum SortKey {
    Explicit(u64),
    Numeric(u64),
    Text(String),
}

struct RawStage<'a> {
    key: SortKey,
    seq: usize,
    body: &'a Map<String, Value>,
}

/// Adapts a stage payload into ordered stages labelled with `style`.
#[must_use]
pub fn adapt_stages(raw: &Value, style: StageLabelStyle) -> Vec<Stage> {
    let mut entries: Vec<RawStage<'_>> = match raw {
        Value::Object(map) => map
            .iter()
            .enumerate()
            .filter_map(|(seq, (key, value))| {
                let body = value.as_object()?;
                let fallback = key
                    .trim()
                    .parse::<u64>()
                    .map_or_else(|_| SortKey::Text(key.clone()), SortKey::Numeric);
                Some(RawStage {
                    key: explicit_order(body).unwrap_or(fallback),
                    seq,
                    body,
                })
            })
            .collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .filter_map(|(index, value)| {
                let body = value.as_object()?;
                Some(RawStage {
                    key: explicit_order(body).unwrap_or(SortKey::Numeric(index as u64)),
                    seq: index,
                    body,
                })
            })
            .collect(),
        _ => Vec::new(),
    };

    entries.sort_by(|a, b| a.key.cmp(&b.key).then(a.seq.cmp(&b.seq)));

    entries
        .into_iter()
        .enumerate()
        .map(|(position, entry)| build_stage(position, entry.body, style))
        .collect()
}

fn explicit_order(body: &Map<String, Value>) -> Option<SortKey> {
    let order = body.get("order")?;
    order
        .as_u64()
        .or_else(|| order.as_str().and_then(|s| s.trim().parse().ok()))
        .map(SortKey::Explicit)
}

fn build_stage(position: usize, body: &Map<String, Value>, style: StageLabelStyle) -> Stage {
    let title = text_field(body, "name")
        .or_else(|| text_field(body, "title"))
        .unwrap_or_else(|| format!("Stage {}", position + 1));
    let subtitle = text_field(body, "summary")
        .or_else(|| text_field(body, "subtitle"))
        .unwrap_or_default();

    let tasks = body
        .get("checklist")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(checklist_task)
                .collect()
        })
        .unwrap_or_default();

    Stage {
        position,
        label: style.label(position),
        title,
        subtitle,
        duration: text_field(body, "duration"),
        tasks,
    }
}

fn checklist_task(item: &str) -> Task {
    Task::new(item).with_description(format!("Complete: {item}"))
}

fn text_field(body: &Map<String, Value>, field: &str) -> Option<String> {
    body.get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}
