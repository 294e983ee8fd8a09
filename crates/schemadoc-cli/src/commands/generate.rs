//! Generate command - document a schema and write schema.yml.

use colored::Colorize;
use schemadoc::config::{SnowflakeConfig, TestsConfig, resolve_output_path};
use schemadoc::{CsvSource, DocGenerator, GeneratorConfig, SchemaSource, SchemaWriter, SnowflakeSource};
use tracing::{info, warn};

use crate::cli::{GenerateArgs, SourceKind};

pub fn run(args: GenerateArgs, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    if args.env_file.exists() {
        dotenvy::from_path_override(&args.env_file)?;
        info!(path = %args.env_file.display(), "Loaded environment variables");
    } else {
        warn!(path = %args.env_file.display(), "Environment file not found");
    }

    let tests = TestsConfig::load(&args.tests_config)?;

    let (source, schema) = match args.source {
        SourceKind::Snowflake => {
            let mut config = SnowflakeConfig::from_env()?;
            if let Some(schema) = &args.schema {
                config.schema = schema.clone();
            }
            let schema = config.schema.clone();
            (Box::new(SnowflakeSource::connect(config)?) as Box<dyn SchemaSource>, schema)
        }
        SourceKind::Csv => {
            let dir = args
                .csv_dir
                .as_ref()
                .ok_or("--csv-dir is required with --source csv")?;
            let source = CsvSource::open(dir)?;
            let schema = args.schema.clone().unwrap_or_else(|| source.schema().to_string());
            (Box::new(source) as Box<dyn SchemaSource>, schema)
        }
    };

    let output_path = resolve_output_path(args.output.as_deref())?;

    println!(
        "{} {} {}",
        "Documenting".cyan().bold(),
        schema.white(),
        format!("({})", source.name()).dimmed()
    );

    let tables = source.list_tables(&schema)?;
    if tables.is_empty() {
        println!("{}", format!("No tables found in schema {}", schema).yellow());
        return Ok(());
    }

    let generator = DocGenerator::with_config(GeneratorConfig {
        sample_size: args.sample_size,
        prefer_existing_comments: !args.ignore_comments,
    })
    .with_tests(tests);
    let doc = generator.generate(source.as_ref(), &schema, &tables)?;

    if verbose {
        println!();
        for model in &doc.models {
            println!("{}", model.name.yellow().bold());
            for column in &model.columns {
                println!("  {:24} {}", column.name, column.description.dimmed());
            }
        }
        println!();
    }

    SchemaWriter::new().write_file(&doc, &output_path)?;

    println!(
        "{} {} models, {} columns -> {}",
        "Wrote".green().bold(),
        doc.models.len().to_string().white().bold(),
        doc.column_count().to_string().white().bold(),
        output_path.display()
    );

    Ok(())
}
