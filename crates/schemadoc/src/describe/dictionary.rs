//! Static lookup tables used by the description rules.

/// Columns added by loading and snapshot tooling, with fixed descriptions.
/// Matched case-insensitively against the full column name.
pub static PIPELINE_COLUMNS: &[(&str, &str)] = &[
    (
        "adt_load_date",
        "Audit load date used for record identification across the data pipeline",
    ),
    (
        "adt_file_source",
        "Audit file source used for record identification across the data pipeline",
    ),
    (
        "adt_hash_key",
        "Hash key used for record identification across the data pipeline",
    ),
    (
        "dbt_scd_id",
        "SCD type 2 identifier, used for tracking different versions of each record",
    ),
    (
        "dbt_updated_at",
        "SCD type 2 updated timestamp, indicating when the record was last modified",
    ),
    (
        "dbt_valid_from",
        "SCD type 2 validity start timestamp, indicating since when the record was valid",
    ),
    (
        "dbt_valid_to",
        "SCD type 2 validity end timestamp, indicating until when the record was valid",
    ),
    ("record_sk", "Unique key identifier for each record"),
];

/// Name prefixes that mark pipeline metadata columns.
pub static PIPELINE_PREFIXES: &[&str] = &["dbt_", "adt_"];

/// Whole-word abbreviations expanded when cleaning names.
pub static ABBREVIATIONS: &[(&str, &str)] = &[
    ("adt", "audit"),
    ("anb", "account number"),
    ("sk", "surrogate key"),
    ("pk", "primary key"),
    ("fk", "foreign key"),
    ("id", "identifier"),
    ("scd", "slowly changing dimension"),
    ("dob", "date of birth"),
    ("ssn", "social security number"),
    ("num", "number"),
    ("amt", "amount"),
    ("qty", "quantity"),
    ("addr", "address"),
    ("tel", "telephone"),
];

/// Ordinary words ending in `id` that never name an identifier column.
pub static NON_IDENTIFIER_WORDS: &[&str] = &[
    "acid", "android", "avoid", "covid", "fluid", "grid", "humid", "hybrid", "invalid",
    "lipid", "liquid", "lucid", "maid", "overpaid", "paid", "postpaid", "prepaid", "raid",
    "rapid", "rigid", "said", "solid", "squid", "steroid", "thyroid", "unpaid", "valid",
    "vivid", "void",
];

/// Fixed description for a pipeline metadata column, if `name` is one.
pub fn pipeline_description(name: &str) -> Option<&'static str> {
    PIPELINE_COLUMNS
        .iter()
        .find(|(column, _)| column.eq_ignore_ascii_case(name))
        .map(|(_, description)| *description)
}

/// Expansion for a single lower-case word.
pub fn expand_abbreviation(word: &str) -> Option<&'static str> {
    ABBREVIATIONS
        .iter()
        .find(|(abbr, _)| *abbr == word)
        .map(|(_, expansion)| *expansion)
}

/// True when the lower-cased name carries a pipeline metadata prefix.
pub fn has_pipeline_prefix(lower_name: &str) -> bool {
    PIPELINE_PREFIXES.iter().any(|p| lower_name.starts_with(p))
}
