//! Describe-table command - print the description for a table.

use schemadoc::DescriptionSynthesizer;

pub fn run(name: String, columns: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let columns: Vec<&str> = columns.iter().map(|c| c.trim()).filter(|c| !c.is_empty()).collect();
    if columns.is_empty() {
        return Err("At least one column name is required".into());
    }

    println!("{}", DescriptionSynthesizer::new().describe_table_columns(&name, &columns));
    Ok(())
}
