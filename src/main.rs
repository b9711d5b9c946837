//! metscreation - fill in default-display metadata of a record file

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use metscreation::{
    MetsCreationStep, Process, RecordStore, Ruleset, Step, StepConfig, StepPlugin,
    StructureNode, XmlFileStore,
};

#[derive(Parser)]
#[command(name = "metscreation")]
#[command(version, about = "Create default-display metadata in a record", long_about = None)]
#[command(after_help = "EXAMPLES:
    metscreation -r ruleset.json meta.xml          Populate defaults in place
    metscreation -r ruleset.json -l en meta.xml    Use English display rules
    metscreation -r ruleset.json -i meta.xml       Show the structure tree")]
struct Cli {
    /// Record file (XML)
    #[arg(value_name = "RECORD")]
    record: String,

    /// Ruleset file (JSON)
    #[arg(short, long, value_name = "FILE")]
    ruleset: String,

    /// Language the display rules are evaluated in
    #[arg(short, long, default_value = metscreation::step::DEFAULT_LANGUAGE)]
    language: String,

    /// Show the record's structure without modifying it
    #[arg(short, long)]
    info: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.quiet);

    let ruleset = match Ruleset::load(&cli.ruleset) {
        Ok(ruleset) => ruleset,
        Err(e) => {
            eprintln!("error: {}: {e}", cli.ruleset);
            return ExitCode::FAILURE;
        }
    };

    if cli.info {
        return match show_info(&cli.record, &ruleset, &cli.language) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("error: {e}");
                ExitCode::FAILURE
            }
        };
    }

    let process = Process::new(cli.record.clone(), XmlFileStore::new(&cli.record), ruleset);
    let mut plugin = MetsCreationStep::new(StepConfig {
        language: cli.language,
    });
    plugin.initialize(Step::new(metscreation::step::PLUGIN_NAME, process), String::new());

    if plugin.execute() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn init_logging(quiet: bool) {
    let default = if quiet { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn show_info(path: &str, ruleset: &Ruleset, language: &str) -> metscreation::Result<()> {
    let record = XmlFileStore::new(path).read_record()?;

    println!("File: {path}");
    if !record.id.is_empty() {
        println!("Identifier: {}", record.id);
    }
    println!("Structure nodes: {}", record.node_count());
    print_node(&record.root, ruleset, language, 0);

    Ok(())
}

fn print_node(node: &StructureNode, ruleset: &Ruleset, language: &str, depth: usize) {
    let indent = "  ".repeat(depth);
    println!("{indent}{}", ruleset.struct_label(&node.node_type, language));

    for field in &node.metadata {
        println!(
            "{indent}  {}: {}",
            ruleset.metadata_label(&field.field_type, language),
            field.value
        );
    }
    for person in &node.persons {
        let name = [person.family_name.as_str(), person.given_name.as_str()]
            .iter()
            .filter(|s| !s.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "{indent}  {}: {name}",
            ruleset.metadata_label(&person.role, language)
        );
    }
    for group in &node.groups {
        println!("{indent}  [{}]", ruleset.group_label(&group.group_type, language));
        for field in &group.fields {
            println!(
                "{indent}    {}: {}",
                ruleset.metadata_label(&field.field_type, language),
                field.value
            );
        }
    }

    for child in &node.children {
        print_node(child, ruleset, language, depth + 1);
    }
}
