//! Statistical and textual profiling of column samples.

use std::hash::Hash;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::schema::{EntityCount, NumericRange, SampleProfile, SampleValue, ValueCount, ValueKind};

use super::entities::{EntityExtractor, PatternEntityExtractor};

/// Limits applied while profiling a sample.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Maximum characters of concatenated text handed to entity extraction.
    pub max_text_chars: usize,
    /// Number of frequent values to keep.
    pub top_values: usize,
    /// Number of entity labels to keep.
    pub top_entities: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_text_chars: 10_000,
            top_values: 5,
            top_entities: 3,
        }
    }
}

/// Running min/max/mean over coerced numeric values.
#[derive(Debug, Clone)]
struct NumericAccumulator {
    count: usize,
    sum: f64,
    min: f64,
    max: f64,
}

impl NumericAccumulator {
    fn new() -> Self {
        Self {
            count: 0,
            sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    fn add(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    fn finish(self) -> Option<NumericRange> {
        (self.count > 0).then(|| NumericRange {
            min: self.min,
            max: self.max,
            mean: self.sum / self.count as f64,
            observations: self.count,
        })
    }
}

/// Computes a [`SampleProfile`] from sampled column values.
///
/// The entity extractor is injected so callers can share one instance
/// across threads, or substitute a stub in tests.
#[derive(Clone)]
pub struct SampleAnalyzer {
    config: AnalyzerConfig,
    extractor: Arc<dyn EntityExtractor>,
}

impl SampleAnalyzer {
    /// Create an analyzer with the default rule-based entity extractor.
    pub fn new() -> Self {
        Self::with_config(AnalyzerConfig::default())
    }

    /// Create an analyzer with custom limits.
    pub fn with_config(config: AnalyzerConfig) -> Self {
        Self {
            config,
            extractor: Arc::new(PatternEntityExtractor::new()),
        }
    }

    /// Replace the entity extractor.
    pub fn with_extractor(mut self, extractor: impl EntityExtractor + 'static) -> Self {
        self.extractor = Arc::new(extractor);
        self
    }

    /// Share an existing entity extractor.
    pub fn with_shared_extractor(mut self, extractor: Arc<dyn EntityExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Analyze a sample. Never fails; missing signals leave fields empty.
    pub fn analyze(&self, samples: &[SampleValue]) -> SampleProfile {
        if samples.is_empty() {
            return SampleProfile::empty();
        }

        let dominant_type = Self::dominant_type(samples);

        let mut profile = SampleProfile {
            dominant_type,
            sample_size: samples.len(),
            ..SampleProfile::default()
        };

        if dominant_type == ValueKind::Text {
            let strings: Vec<String> = samples.iter().map(|v| v.to_string()).collect();
            profile.frequent_values = self.frequent_values(&strings);
            profile.entity_categories = self.entity_categories(&strings);
        } else {
            profile.numeric_range = Self::numeric_range(samples);
        }

        debug!(
            dominant = %profile.dominant_type,
            size = profile.sample_size,
            numeric = profile.numeric_range.is_some(),
            frequent = profile.frequent_values.len(),
            entities = profile.entity_categories.len(),
            "Profiled sample"
        );

        profile
    }

    /// Most frequent value kind; ties go to the kind seen first.
    fn dominant_type(samples: &[SampleValue]) -> ValueKind {
        let counts = tally(samples.iter().map(SampleValue::kind));
        rank(counts, 1)
            .into_iter()
            .next()
            .map(|(kind, _)| kind)
            .unwrap_or(ValueKind::Unknown)
    }

    /// Min/max/mean over every value that coerces to `f64`.
    fn numeric_range(samples: &[SampleValue]) -> Option<NumericRange> {
        let mut acc = NumericAccumulator::new();
        for value in samples.iter().filter(|v| v.kind().is_numeric()) {
            match value.as_f64() {
                Some(n) => acc.add(n),
                None => trace!(value = %value, "Skipping non-coercible numeric value"),
            }
        }
        acc.finish()
    }

    fn frequent_values(&self, strings: &[String]) -> Vec<ValueCount> {
        let counts = tally(strings.iter().map(String::as_str));
        rank(counts, self.config.top_values)
            .into_iter()
            .map(|(value, count)| ValueCount {
                value: value.to_string(),
                count,
            })
            .collect()
    }

    fn entity_categories(&self, strings: &[String]) -> Vec<EntityCount> {
        let joined = strings.join(" ");
        let text = truncate_chars(&joined, self.config.max_text_chars);
        if text.is_empty() {
            return Vec::new();
        }

        let entities = self.extractor.extract(text);
        let counts = tally(entities.iter().map(|e| e.label.as_str()));
        rank(counts, self.config.top_entities)
            .into_iter()
            .map(|(label, count)| EntityCount {
                label: label.to_string(),
                count,
            })
            .collect()
    }
}

impl Default for SampleAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SampleAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SampleAnalyzer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Count occurrences, remembering first-seen order.
fn tally<K: Hash + Eq>(items: impl Iterator<Item = K>) -> IndexMap<K, usize> {
    let mut counts = IndexMap::new();
    for item in items {
        *counts.entry(item).or_insert(0) += 1;
    }
    counts
}

/// Top `n` entries by count. The sort is stable, so equal counts keep
/// their first-seen order.
fn rank<K>(counts: IndexMap<K, usize>, n: usize) -> Vec<(K, usize)> {
    let mut ranked: Vec<(K, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(n);
    ranked
}

/// Prefix of at most `max` characters, cut on a char boundary.
fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::entities::{Entity, EntityLabel};

    /// Labels every whitespace-separated word that starts with an uppercase letter.
    struct CapitalizedWords(EntityLabel);

    impl EntityExtractor for CapitalizedWords {
        fn extract(&self, text: &str) -> Vec<Entity> {
            let mut offset = 0;
            let mut found = Vec::new();
            for word in text.split(' ') {
                if word.chars().next().is_some_and(char::is_uppercase) {
                    found.push(Entity {
                        label: self.0,
                        text: word.to_string(),
                        start: offset,
                        end: offset + word.len(),
                    });
                }
                offset += word.len() + 1;
            }
            found
        }
    }

    fn text(values: &[&str]) -> Vec<SampleValue> {
        values.iter().map(|v| SampleValue::from(*v)).collect()
    }

    #[test]
    fn test_empty_sample() {
        let profile = SampleAnalyzer::new().analyze(&[]);
        assert_eq!(profile, SampleProfile::empty());
    }

    #[test]
    fn test_numeric_range() {
        let samples = vec![
            SampleValue::Integer(5),
            SampleValue::Float(2.5),
            SampleValue::Decimal("10.75".into()),
        ];
        let profile = SampleAnalyzer::new().analyze(&samples);

        assert_eq!(profile.dominant_type, ValueKind::Decimal);
        let range = profile.numeric_range.unwrap();
        assert_eq!(range.min, 2.5);
        assert_eq!(range.max, 10.75);
        assert_eq!(range.observations, 3);
        assert!(profile.frequent_values.is_empty());
    }

    #[test]
    fn test_bad_decimal_is_skipped() {
        let samples = vec![
            SampleValue::Decimal("1,000.00".into()),
            SampleValue::Decimal("3.00".into()),
            SampleValue::Integer(1),
        ];
        let range = SampleAnalyzer::new().analyze(&samples).numeric_range.unwrap();
        assert_eq!(range.observations, 2);
        assert_eq!(range.min, 1.0);
        assert_eq!(range.max, 3.0);
    }

    #[test]
    fn test_dominant_type_tie_goes_to_first_seen() {
        let samples = vec![
            SampleValue::Boolean(true),
            SampleValue::Integer(1),
            SampleValue::Integer(2),
            SampleValue::Boolean(false),
        ];
        let profile = SampleAnalyzer::new().analyze(&samples);
        assert_eq!(profile.dominant_type, ValueKind::Boolean);
        // Numeric values on a non-text column still yield a range.
        assert_eq!(profile.numeric_range.unwrap().max, 2.0);
    }

    #[test]
    fn test_frequent_values_ranked_with_stable_ties() {
        let samples = text(&["b", "a", "c", "a", "b", "d", "e", "f"]);
        let profile = SampleAnalyzer::new()
            .with_extractor(crate::inference::NoopEntityExtractor)
            .analyze(&samples);

        let values: Vec<&str> = profile.frequent_value_strings().collect();
        assert_eq!(values, vec!["b", "a", "c", "d", "e"]);
        assert_eq!(profile.frequent_values[0].count, 2);
    }

    #[test]
    fn test_text_profile_never_has_numeric_range() {
        let mut samples = text(&["x", "y", "z"]);
        samples.push(SampleValue::Integer(42));
        let profile = SampleAnalyzer::new().analyze(&samples);

        assert_eq!(profile.dominant_type, ValueKind::Text);
        assert!(profile.numeric_range.is_none());
        assert!(profile.frequent_value_strings().any(|v| v == "42"));
    }

    #[test]
    fn test_entity_categories_use_injected_extractor() {
        let samples = text(&["Paris office", "Berlin office", "remote"]);
        let profile = SampleAnalyzer::new()
            .with_extractor(CapitalizedWords(EntityLabel::Gpe))
            .analyze(&samples);

        assert_eq!(
            profile.entity_categories,
            vec![EntityCount {
                label: "GPE".into(),
                count: 2
            }]
        );
    }

    #[test]
    fn test_text_is_truncated_before_extraction() {
        let config = AnalyzerConfig {
            max_text_chars: 5,
            ..AnalyzerConfig::default()
        };
        let samples = text(&["Ab", "Cd", "Ef"]);
        let profile = SampleAnalyzer::with_config(config)
            .with_extractor(CapitalizedWords(EntityLabel::Person))
            .analyze(&samples);

        // "Ab Cd Ef" truncated to "Ab Cd"
        assert_eq!(profile.entity_categories[0].count, 2);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }
}
