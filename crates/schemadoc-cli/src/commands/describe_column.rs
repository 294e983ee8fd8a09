//! Describe-column command - print the description for one column.

use colored::Colorize;
use schemadoc::input::parse_cell;
use schemadoc::{DescriptionSynthesizer, SampleAnalyzer, SampleValue};

pub fn run(
    name: String,
    declared_type: String,
    samples: Vec<String>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let values: Vec<SampleValue> = samples.iter().filter_map(|s| parse_cell(s)).collect();
    let profile = SampleAnalyzer::new().analyze(&values);

    let (rule, description) =
        DescriptionSynthesizer::new().describe_column_with_rule(&name, &declared_type, &profile);

    if verbose {
        println!("{} {:?}", "Rule:".yellow().bold(), rule);
        println!("{} {}", "Dominant type:".yellow().bold(), profile.dominant_type);
        if let Some(range) = profile.numeric_range {
            println!(
                "{} {} .. {} (mean {:.2})",
                "Range:".yellow().bold(),
                range.min,
                range.max,
                range.mean
            );
        }
        if !profile.frequent_values.is_empty() {
            let values: Vec<&str> = profile.frequent_value_strings().collect();
            println!("{} {}", "Frequent:".yellow().bold(), values.join(", "));
        }
        for entity in &profile.entity_categories {
            println!("{} {} x{}", "Entity:".yellow().bold(), entity.label, entity.count);
        }
        println!();
    }

    println!("{}", description);
    Ok(())
}
