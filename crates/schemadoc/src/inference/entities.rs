//! Named-entity extraction over sampled column text.
//!
//! The analyzer only needs entity *labels* and their frequency, so the
//! default extractor is a rule-based recognizer: compiled patterns for
//! numeric expressions and small gazetteers for places, organisations
//! and given names. Recognizers run in priority order and each character
//! belongs to at most one entity.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Entity classification label, using the common NER tag names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityLabel {
    /// People, including fictional.
    Person,
    /// Companies, agencies, institutions.
    Org,
    /// Countries, cities, states.
    Gpe,
    /// Absolute or relative dates.
    Date,
    /// Times smaller than a day.
    Time,
    /// Monetary values.
    Money,
    /// Percentages.
    Percent,
    /// Numerals that do not fall under another type.
    Cardinal,
}

impl EntityLabel {
    /// The tag name (e.g. `"GPE"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityLabel::Person => "PERSON",
            EntityLabel::Org => "ORG",
            EntityLabel::Gpe => "GPE",
            EntityLabel::Date => "DATE",
            EntityLabel::Time => "TIME",
            EntityLabel::Money => "MONEY",
            EntityLabel::Percent => "PERCENT",
            EntityLabel::Cardinal => "CARDINAL",
        }
    }
}

impl fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recognized entity span (byte offsets into the analyzed text).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub label: EntityLabel,
    pub text: String,
    pub start: usize,
    pub end: usize,
}

/// Capability that finds named entities in free text.
///
/// Implementations are constructed once and shared across analyzer calls,
/// so they must be thread-safe.
pub trait EntityExtractor: Send + Sync {
    /// Extract entities from `text`, ordered by position.
    fn extract(&self, text: &str) -> Vec<Entity>;
}

/// Extractor that never finds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEntityExtractor;

impl EntityExtractor for NoopEntityExtractor {
    fn extract(&self, _text: &str) -> Vec<Entity> {
        Vec::new()
    }
}

// =============================================================================
// GAZETTEERS
// =============================================================================

const GPE_NAMES: &[&str] = &[
    // Countries
    "United States", "USA", "U.S.", "United Kingdom", "UK", "Canada", "Mexico", "Brazil",
    "Argentina", "Chile", "Colombia", "Peru", "France", "Germany", "Spain", "Portugal",
    "Italy", "Netherlands", "Belgium", "Switzerland", "Austria", "Sweden", "Norway",
    "Denmark", "Finland", "Ireland", "Poland", "Greece", "Turkey", "Russia", "Ukraine",
    "China", "Japan", "India", "Pakistan", "Indonesia", "Singapore", "Australia",
    "New Zealand", "South Africa", "Nigeria", "Kenya", "Egypt", "Israel",
    "Saudi Arabia", "South Korea", "Vietnam", "Thailand", "Philippines",
    // US states
    "Alabama", "Alaska", "Arizona", "Arkansas", "California", "Colorado", "Connecticut",
    "Delaware", "Florida", "Georgia", "Hawaii", "Idaho", "Illinois", "Indiana", "Iowa",
    "Kansas", "Kentucky", "Louisiana", "Maine", "Maryland", "Massachusetts", "Michigan",
    "Minnesota", "Mississippi", "Missouri", "Montana", "Nebraska", "Nevada",
    "New Hampshire", "New Jersey", "New Mexico", "New York", "North Carolina",
    "North Dakota", "Ohio", "Oklahoma", "Oregon", "Pennsylvania", "Rhode Island",
    "South Carolina", "South Dakota", "Tennessee", "Texas", "Utah", "Vermont", "Virginia",
    "Washington", "West Virginia", "Wisconsin", "Wyoming",
    // Cities
    "New York City", "Los Angeles", "Chicago", "Houston", "Phoenix", "Philadelphia",
    "San Antonio", "San Diego", "Dallas", "San Francisco", "Seattle", "Boston", "Denver",
    "Atlanta", "Miami", "Toronto", "Vancouver", "Montreal", "London", "Paris", "Berlin",
    "Madrid", "Barcelona", "Rome", "Milan", "Amsterdam", "Brussels", "Zurich", "Vienna",
    "Stockholm", "Oslo", "Copenhagen", "Dublin", "Lisbon", "Prague", "Warsaw", "Moscow",
    "Istanbul", "Dubai", "Mumbai", "Delhi", "Bangalore", "Beijing", "Shanghai",
    "Hong Kong", "Tokyo", "Osaka", "Seoul", "Sydney", "Melbourne", "Auckland",
    "Johannesburg", "Cairo", "Lagos", "Nairobi", "Sao Paulo", "Buenos Aires",
    "Mexico City",
];

const GIVEN_NAMES: &[&str] = &[
    "James", "John", "Robert", "Michael", "William", "David", "Richard", "Joseph",
    "Thomas", "Charles", "Daniel", "Matthew", "Anthony", "Mark", "Steven", "Paul",
    "Andrew", "Joshua", "Kevin", "Brian", "George", "Peter", "Alice", "Bob", "Carol",
    "Mary", "Patricia", "Jennifer", "Linda", "Elizabeth", "Barbara", "Susan", "Jessica",
    "Sarah", "Karen", "Nancy", "Lisa", "Betty", "Margaret", "Sandra", "Emily", "Emma",
    "Olivia", "Sophia", "Maria", "Anna", "Laura", "Julia", "Hannah", "Rachel",
];

const ORG_SUFFIXES: &str = "Inc|Incorporated|Corp|Corporation|LLC|LLP|Ltd|Limited|Co|Company|\
    Group|Holdings|Bank|Partners|Associates|Foundation|Association|Institute|University|\
    College|Hospital|Agency|Systems|Technologies|GmbH|AG|SA|PLC|plc";

const MONTHS: &str = "Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|June?|July?|\
    Aug(?:ust)?|Sep(?:t(?:ember)?)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?";

// =============================================================================
// LAZY STATIC PATTERNS
// =============================================================================

static MONEY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:[$€£¥]\s?\d[\d,]*(?:\.\d+)?(?:\s?(?:[kKmM]\b|bn\b|thousand\b|million\b|billion\b))?)|(?:\b\d[\d,]*(?:\.\d+)?\s?(?:USD|EUR|GBP|JPY|CAD|AUD|dollars|euros|pounds)\b)",
    )
    .unwrap()
});

static PERCENT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d+(?:\.\d+)?\s?(?:%|percent\b|pct\b)").unwrap());

static DATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\b\d{{4}}-\d{{2}}-\d{{2}}\b|\b\d{{1,2}}/\d{{1,2}}/\d{{2,4}}\b|\b(?:{m})\.?\s+\d{{1,2}}(?:st|nd|rd|th)?(?:,?\s+\d{{4}})?\b|\b\d{{1,2}}\s+(?:{m})\.?(?:\s+\d{{4}})?\b|\b(?:{m})\s+\d{{4}}\b|\b(?:Monday|Tuesday|Wednesday|Thursday|Friday|Saturday|Sunday|yesterday|today|tomorrow)\b|\b(?:19|20)\d{{2}}\b",
        m = MONTHS
    ))
    .unwrap()
});

static TIME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\d{1,2}:\d{2}(?::\d{2})?(?:\s?[AaPp]\.?[Mm]\b\.?)?|\b\d{1,2}\s?(?:am|pm|AM|PM)\b")
        .unwrap()
});

static ORG_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\b(?:[A-Z][\w&'-]*\s+)*[A-Z][\w&'-]*,?\s+(?:{s})\b\.?|\b(?:University|Bank|Institute|College|Department|Ministry) of(?:\s+[A-Z][a-z]+)+",
        s = ORG_SUFFIXES
    ))
    .unwrap()
});

static PERSON_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let given = GIVEN_NAMES.join("|");
    Regex::new(&format!(
        r"\b(?:Mr|Mrs|Ms|Miss|Dr|Prof|Sir|Dame)\.?\s+[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*|\b(?:{})(?:\s+[A-Z][a-z]+(?:-[A-Z][a-z]+)?)?\b",
        given
    ))
    .unwrap()
});

static GPE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let mut names: Vec<&str> = GPE_NAMES.to_vec();
    // Longest first so "New York City" wins over "New York".
    names.sort_by_key(|n| std::cmp::Reverse(n.len()));
    let alternation = names
        .iter()
        .map(|n| regex::escape(n))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"\b(?:{})(?:\b|$|\s)", alternation)).unwrap()
});

static CARDINAL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b\d+(?:,\d{3})*(?:\.\d+)?\b|\b(?i:one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve|twenty|hundred|thousand|million|billion)\b",
    )
    .unwrap()
});

/// Default rule-based extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternEntityExtractor;

impl PatternEntityExtractor {
    /// Create a new extractor. Patterns are compiled on first use.
    pub fn new() -> Self {
        Self
    }

    /// Recognizers in priority order.
    fn recognizers() -> [(EntityLabel, &'static Regex); 8] {
        [
            (EntityLabel::Money, &*MONEY_PATTERN),
            (EntityLabel::Percent, &*PERCENT_PATTERN),
            (EntityLabel::Date, &*DATE_PATTERN),
            (EntityLabel::Time, &*TIME_PATTERN),
            (EntityLabel::Org, &*ORG_PATTERN),
            (EntityLabel::Person, &*PERSON_PATTERN),
            (EntityLabel::Gpe, &*GPE_PATTERN),
            (EntityLabel::Cardinal, &*CARDINAL_PATTERN),
        ]
    }
}

impl EntityExtractor for PatternEntityExtractor {
    fn extract(&self, text: &str) -> Vec<Entity> {
        let mut entities: Vec<Entity> = Vec::new();

        for (label, pattern) in Self::recognizers() {
            for m in pattern.find_iter(text) {
                let span = m.as_str().trim_end();
                if span.is_empty() {
                    continue;
                }
                let (start, end) = (m.start(), m.start() + span.len());
                let overlaps = entities.iter().any(|e| start < e.end && e.start < end);
                if !overlaps {
                    entities.push(Entity {
                        label,
                        text: span.to_string(),
                        start,
                        end,
                    });
                }
            }
        }

        entities.sort_by_key(|e| e.start);
        entities
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(text: &str) -> Vec<(EntityLabel, String)> {
        PatternEntityExtractor::new()
            .extract(text)
            .into_iter()
            .map(|e| (e.label, e.text))
            .collect()
    }

    #[test]
    fn test_money_and_percent() {
        let found = labels("paid $1,200.50 with 15% discount");
        assert_eq!(
            found,
            vec![
                (EntityLabel::Money, "$1,200.50".to_string()),
                (EntityLabel::Percent, "15%".to_string()),
            ]
        );
    }

    #[test]
    fn test_iso_date_is_not_cardinal() {
        let found = labels("2024-01-15");
        assert_eq!(found, vec![(EntityLabel::Date, "2024-01-15".to_string())]);
    }

    #[test]
    fn test_places_prefer_longest_name() {
        let found = labels("Offices in New York City and Paris");
        assert!(found.contains(&(EntityLabel::Gpe, "New York City".to_string())));
        assert!(found.contains(&(EntityLabel::Gpe, "Paris".to_string())));
    }

    #[test]
    fn test_organisation_suffix() {
        let found = labels("Acme Widgets Inc shipped it");
        assert_eq!(found[0], (EntityLabel::Org, "Acme Widgets Inc".to_string()));
    }

    #[test]
    fn test_person_with_honorific_and_given_name() {
        let found = labels("Dr. Watson met Mary Jones");
        assert!(found.contains(&(EntityLabel::Person, "Dr. Watson".to_string())));
        assert!(found.contains(&(EntityLabel::Person, "Mary Jones".to_string())));
    }

    #[test]
    fn test_spans_never_overlap() {
        let entities = PatternEntityExtractor::new()
            .extract("Bank of America paid $5 million on March 3, 2021 at 10:30 AM in Boston");
        for (i, a) in entities.iter().enumerate() {
            for b in entities.iter().skip(i + 1) {
                assert!(a.end <= b.start, "{:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_noop_extractor() {
        assert!(NoopEntityExtractor.extract("Paris, France").is_empty());
    }
}
