//! Table descriptions synthesized from the set of column names.

use indexmap::IndexSet;

use super::dictionary::has_pipeline_prefix;
use super::naming::{clean_name, is_identifier_segment, segments};

/// A kind of column that says something about a table's contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) enum Signal {
    Identifier,
    Name,
    Date,
    Amount,
    Status,
}

impl Signal {
    const ALL: [Signal; 5] = [
        Signal::Identifier,
        Signal::Name,
        Signal::Date,
        Signal::Amount,
        Signal::Status,
    ];

    fn phrase(self) -> &'static str {
        match self {
            Signal::Identifier => "identifiers",
            Signal::Name => "names",
            Signal::Date => "dates",
            Signal::Amount => "amounts",
            Signal::Status => "status information",
        }
    }

    fn fires(self, lower: &str, segs: &[String]) -> bool {
        match self {
            Signal::Identifier => segs.iter().any(|s| s == "key" || is_identifier_segment(s)),
            Signal::Name => lower.contains("name"),
            Signal::Date => lower.contains("date"),
            Signal::Amount => lower.contains("amount") || segs.iter().any(|s| s == "amt"),
            Signal::Status => lower.contains("status") || lower.contains("state"),
        }
    }

    /// What is left of a segment once the token that triggered this signal
    /// is removed, or `None` when the segment did not trigger it.
    fn strip(self, segment: &str) -> Option<String> {
        match self {
            Signal::Identifier if segment == "key" => Some(String::new()),
            Signal::Identifier if is_identifier_segment(segment) => {
                segment.strip_suffix("id").map(str::to_string)
            }
            Signal::Name if segment.contains("name") => Some(segment.replacen("name", "", 1)),
            Signal::Date if segment.contains("date") => Some(segment.replacen("date", "", 1)),
            Signal::Amount if segment == "amt" => Some(String::new()),
            Signal::Amount if segment.contains("amount") => Some(segment.replacen("amount", "", 1)),
            _ => None,
        }
    }
}

/// What one column contributes to the table description.
#[derive(Debug, Default)]
struct ColumnSignals {
    fired: Vec<Signal>,
    entity: Option<String>,
}

fn column_signals(column: &str) -> ColumnSignals {
    let lower = column.to_lowercase();
    if has_pipeline_prefix(&lower) {
        return ColumnSignals::default();
    }

    let segs = segments(column);
    let fired: Vec<Signal> = Signal::ALL
        .into_iter()
        .filter(|signal| signal.fires(&lower, &segs))
        .collect();

    let entity = fired
        .iter()
        .find(|s| **s != Signal::Status)
        .and_then(|signal| {
            let rest: Vec<String> = segs
                .iter()
                .filter_map(|seg| match signal.strip(seg) {
                    Some(remainder) => (!remainder.is_empty()).then_some(remainder),
                    None => Some(seg.clone()),
                })
                .collect();
            let fragment = rest.join("_");
            (fragment.chars().count() > 2).then_some(fragment)
        });

    ColumnSignals { fired, entity }
}

/// Build the table sentence from its column names.
///
/// Returns an empty string when no entity was found and the table name
/// has no readable content, leaving the fallback to the caller.
pub(crate) fn describe<S: AsRef<str>>(table_name: &str, columns: &[S]) -> String {
    let mut buckets: IndexSet<Signal> = IndexSet::new();
    let mut entities: IndexSet<String> = IndexSet::new();

    for column in columns {
        let signals = column_signals(column.as_ref());
        buckets.extend(signals.fired);
        if let Some(fragment) = signals.entity {
            entities.insert(clean_name(&fragment));
        }
    }

    let mut description = if (1..=3).contains(&entities.len()) {
        let listed: Vec<&str> = entities.iter().map(String::as_str).collect();
        format!("Contains information about {}", listed.join(", "))
    } else {
        let subject = clean_name(table_name);
        if subject.trim().is_empty() {
            return String::new();
        }
        format!("Contains information related to {}", subject.trim())
    };

    buckets.sort();
    match buckets.len() {
        0 => {}
        1..=3 => {
            let phrases: Vec<&str> = buckets.iter().map(|s| s.phrase()).collect();
            description.push_str(" including ");
            description.push_str(&phrases.join(", "));
        }
        _ => description.push_str(" including various attributes and metrics"),
    }

    description
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entities_and_details() {
        assert_eq!(
            describe("orders", &["customer_id", "customer_name", "order_date"]),
            "Contains information about Customer, Order including identifiers, names, dates"
        );
    }

    #[test]
    fn test_no_signals_keeps_base_sentence() {
        assert_eq!(
            describe("web_events", &["payload", "referrer"]),
            "Contains information related to Web events"
        );
    }

    #[test]
    fn test_too_many_entities_fall_back() {
        let columns = ["customer_id", "store_id", "product_id", "region_id"];
        assert_eq!(
            describe("facts", &columns),
            "Contains information related to Facts including identifiers"
        );
    }

    #[test]
    fn test_four_buckets_collapse() {
        let columns = ["id", "first_name", "date", "total_amount"];
        assert_eq!(
            describe("ledger", &columns),
            "Contains information about First, Total including various attributes and metrics"
        );
    }

    #[test]
    fn test_pipeline_columns_are_ignored() {
        let columns = ["dbt_scd_id", "dbt_valid_from", "adt_hash_key", "status"];
        assert_eq!(
            describe("snap_accounts", &columns),
            "Contains information related to Snap accounts including status information"
        );
    }

    #[test]
    fn test_one_column_fires_several_buckets() {
        let signals = column_signals("ship_date_id");
        assert_eq!(signals.fired, vec![Signal::Identifier, Signal::Date]);
        assert_eq!(signals.entity.as_deref(), Some("ship_date"));
    }

    #[test]
    fn test_single_word_columns_keep_their_entity() {
        assert_eq!(
            describe("users", &["username", "email"]),
            "Contains information about User including names"
        );
        assert_eq!(
            describe("people", &["birthdate", "shipdate"]),
            "Contains information about Birth, Ship including dates"
        );
        assert_eq!(
            describe("ledger", &["totalamount", "USERID"]),
            "Contains information about Total, User including identifiers, amounts"
        );
    }

    #[test]
    fn test_camel_case_columns() {
        let signals = column_signals("CustomerId");
        assert_eq!(signals.fired, vec![Signal::Identifier]);
        assert_eq!(signals.entity.as_deref(), Some("customer"));
        assert!(column_signals("paid").fired.is_empty());
    }

    #[test]
    fn test_blank_table_name_without_entities_is_empty() {
        assert_eq!(describe("", &["payload"]), "");
        assert_eq!(describe("__", &["customer_id", "store_id", "product_id", "region_id"]), "");
        assert_eq!(
            describe("", &["customer_id"]),
            "Contains information about Customer including identifiers"
        );
    }

    #[test]
    fn test_short_fragments_dropped() {
        assert_eq!(column_signals("id").entity, None);
        assert_eq!(column_signals("pk_id").entity, None);
        assert_eq!(column_signals("date").entity, None);
    }
}
