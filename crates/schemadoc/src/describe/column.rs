//! Column description rules.
//!
//! Rules are tried in a fixed priority order and the first one that
//! produces a sentence wins. Each rule looks only at the column's name,
//! declared type and sample profile.

use serde::{Deserialize, Serialize};

use crate::schema::SampleProfile;

use super::dictionary::pipeline_description;
use super::naming::{clean_name, is_identifier_segment, segments};

/// Everything a rule may look at, computed once per column.
#[derive(Debug)]
pub(crate) struct ColumnFacts<'a> {
    pub lower: String,
    pub segments: Vec<String>,
    pub declared_type: &'a str,
    pub profile: &'a SampleProfile,
    pub clean: String,
}

impl<'a> ColumnFacts<'a> {
    pub fn new(name: &str, declared_type: &'a str, profile: &'a SampleProfile) -> Self {
        Self {
            lower: name.to_lowercase(),
            segments: segments(name),
            declared_type,
            profile,
            clean: clean_name(name),
        }
    }

    fn last_segment_is(&self, candidates: &[&str]) -> bool {
        self.segments
            .last()
            .is_some_and(|last| candidates.contains(&last.as_str()))
    }

    fn contains_any(&self, needles: &[&str]) -> bool {
        needles.iter().any(|n| self.lower.contains(n))
    }
}

/// A naming-pattern rule in the description cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRule {
    /// Known loader/snapshot columns with hand-written sentences.
    PipelineMetadata,
    /// A name segment is `id` or ends in it (`USERID`, `CustomerId`).
    Identifier,
    /// Name mentions a date.
    Temporal,
    /// Monetary amounts.
    Amount,
    /// Counts and quantities.
    Quantity,
    /// Boolean flags.
    Flag,
    /// Fallback on the declared column type.
    DeclaredType,
    /// The readable name on its own.
    CleanedName,
}

impl ColumnRule {
    /// All rules in priority order.
    pub const CASCADE: [ColumnRule; 8] = [
        ColumnRule::PipelineMetadata,
        ColumnRule::Identifier,
        ColumnRule::Temporal,
        ColumnRule::Amount,
        ColumnRule::Quantity,
        ColumnRule::Flag,
        ColumnRule::DeclaredType,
        ColumnRule::CleanedName,
    ];

    /// Apply this rule, or `None` when it does not match.
    pub(crate) fn apply(self, name: &str, facts: &ColumnFacts<'_>) -> Option<String> {
        match self {
            ColumnRule::PipelineMetadata => pipeline_description(name).map(str::to_string),
            ColumnRule::Identifier => identifier(facts),
            ColumnRule::Temporal => temporal(facts),
            ColumnRule::Amount => amount(facts),
            ColumnRule::Quantity => quantity(facts),
            ColumnRule::Flag => flag(facts),
            ColumnRule::DeclaredType => declared_type(facts),
            ColumnRule::CleanedName => Some(facts.clean.clone()),
        }
    }
}

/// Run the cascade and report which rule produced the sentence.
pub(crate) fn describe(name: &str, declared_type: &str, profile: &SampleProfile) -> (ColumnRule, String) {
    let facts = ColumnFacts::new(name, declared_type, profile);
    for rule in ColumnRule::CASCADE {
        if let Some(text) = rule.apply(name, &facts) {
            return (rule, text);
        }
    }
    // CleanedName always matches.
    (ColumnRule::CleanedName, facts.clean)
}

fn identifier(facts: &ColumnFacts<'_>) -> Option<String> {
    if !facts.segments.iter().any(|s| is_identifier_segment(s)) {
        return None;
    }
    let lower = facts.lower.as_str();
    let text = if lower.starts_with("pk_") || lower.starts_with("primary_") {
        format!("Primary identifier for {}", facts.clean)
    } else if lower.starts_with("fk_") || lower.starts_with("foreign_") {
        format!("Foreign key reference to {}", facts.clean)
    } else {
        format!("Identifier for {}", facts.clean)
    };
    Some(text)
}

fn temporal(facts: &ColumnFacts<'_>) -> Option<String> {
    if !facts.lower.contains("date") && !facts.last_segment_is(&["dt"]) {
        return None;
    }
    let text = if facts.contains_any(&["create", "insert"]) {
        "Date when the record was created".to_string()
    } else if facts.contains_any(&["update", "modify"]) {
        "Date when the record was last updated".to_string()
    } else if facts.lower.contains("valid_from") {
        "Date from which this record is valid".to_string()
    } else if facts.lower.contains("valid_to") {
        "Date until which this record is valid".to_string()
    } else if facts.lower.contains("birth") {
        "Date of birth".to_string()
    } else {
        format!("Date associated with {}", facts.clean)
    };
    Some(text)
}

fn amount(facts: &ColumnFacts<'_>) -> Option<String> {
    if !facts.lower.contains("amount") && !facts.last_segment_is(&["amt"]) {
        return None;
    }
    let mut text = format!("Monetary amount for {}", facts.clean);
    if let Some(range) = facts.profile.numeric_range {
        text.push_str(&format!(" (ranges from {:.2} to {:.2})", range.min, range.max));
    }
    Some(text)
}

fn quantity(facts: &ColumnFacts<'_>) -> Option<String> {
    facts
        .contains_any(&["count", "qty", "quantity"])
        .then(|| format!("Count or quantity of {}", facts.clean))
}

fn flag(facts: &ColumnFacts<'_>) -> Option<String> {
    if !facts.lower.starts_with("is_") && !facts.last_segment_is(&["flag", "flg"]) {
        return None;
    }
    let mut text = format!("Flag indicating {}", facts.clean);
    if !facts.profile.frequent_values.is_empty() {
        let values: Vec<&str> = facts.profile.frequent_value_strings().collect();
        text.push_str(&format!(" (possible values: {})", values.join(", ")));
    }
    Some(text)
}

/// Broad family of a declared warehouse type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TypeFamily {
    Text,
    Numeric,
    Temporal,
    Boolean,
}

impl TypeFamily {
    /// Classify a declared type such as `VARCHAR(16777216)` or `NUMBER(38,0)`.
    pub fn of(declared_type: &str) -> Option<TypeFamily> {
        let base = declared_type
            .split('(')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase();
        if base.is_empty() {
            return None;
        }
        let has = |needles: &[&str]| needles.iter().any(|n| base.contains(n));

        if has(&["char", "string", "text"]) {
            Some(TypeFamily::Text)
        } else if has(&["int", "number", "numeric", "decimal", "float", "double", "real"]) {
            Some(TypeFamily::Numeric)
        } else if has(&["date", "time"]) {
            Some(TypeFamily::Temporal)
        } else if has(&["bool"]) {
            Some(TypeFamily::Boolean)
        } else {
            None
        }
    }
}

fn declared_type(facts: &ColumnFacts<'_>) -> Option<String> {
    let text = match TypeFamily::of(facts.declared_type)? {
        TypeFamily::Text => {
            let mut text = format!("Text field containing {}", facts.clean);
            let examples = &facts.profile.frequent_values;
            if !examples.is_empty() && examples.len() <= 3 {
                let values: Vec<&str> = facts.profile.frequent_value_strings().collect();
                text.push_str(&format!(" (e.g., {})", values.join(", ")));
            }
            text
        }
        TypeFamily::Numeric => format!("Numeric value representing {}", facts.clean),
        TypeFamily::Temporal => format!("Date/time value for {}", facts.clean),
        TypeFamily::Boolean => format!("Boolean flag indicating {}", facts.clean),
    };
    Some(text)
}
