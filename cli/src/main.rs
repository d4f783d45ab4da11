//! docfill CLI - document template filling tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;

use docfill::{
    load_file, parse_template, Docfill, FillOptions, JsonRecord, MappingSet, Record,
};

#[derive(Parser)]
#[command(name = "docfill")]
#[command(version)]
#[command(about = "Fill document templates from JSON records", long_about = None)]
struct Cli {
    /// Template document
    #[arg(value_name = "TEMPLATE")]
    template: Option<PathBuf>,

    /// Record data (JSON object or array of objects)
    #[arg(value_name = "DATA")]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill a template from records
    Fill {
        /// Template document
        #[arg(value_name = "TEMPLATE")]
        template: PathBuf,

        /// Record data (JSON object or array of objects)
        #[arg(value_name = "DATA")]
        data: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Field mapping file
        #[arg(short, long, value_name = "FILE", env = "DOCFILL_MAPPINGS")]
        mappings: Option<PathBuf>,

        /// Separator for values from to-many links
        #[arg(long, default_value = ", ")]
        separator: String,

        /// Do not insert page breaks between records
        #[arg(long)]
        no_page_breaks: bool,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Output plain text instead of JSON
        #[arg(long, conflicts_with = "compact")]
        text: bool,
    },

    /// List the field placeholders used by a template
    Scan {
        /// Template document
        #[arg(value_name = "TEMPLATE")]
        template: PathBuf,

        /// Output as JSON array
        #[arg(long)]
        json: bool,
    },

    /// Show template structure
    Info {
        /// Template document
        #[arg(value_name = "TEMPLATE")]
        template: PathBuf,
    },

    /// Create mappings for newly discovered placeholders
    Sync {
        /// Template document
        #[arg(value_name = "TEMPLATE")]
        template: PathBuf,

        /// Field mapping file (defaults to <TEMPLATE>.mappings.json)
        #[arg(short, long, value_name = "FILE", env = "DOCFILL_MAPPINGS")]
        mappings: Option<PathBuf>,
    },

    /// Show resolved mapping values for the first record
    Preview {
        /// Field mapping file
        #[arg(value_name = "MAPPINGS")]
        mappings: PathBuf,

        /// Record data (JSON object or array of objects)
        #[arg(value_name = "DATA")]
        data: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Fill {
            template,
            data,
            output,
            mappings,
            separator,
            no_page_breaks,
            compact,
            text,
        }) => {
            let options = FillOptions::new()
                .with_separator(separator)
                .with_page_breaks(!no_page_breaks);
            cmd_fill(
                &template,
                &data,
                output.as_deref(),
                mappings.as_deref(),
                options,
                compact,
                text,
            )
        }
        Some(Commands::Scan { template, json }) => cmd_scan(&template, json),
        Some(Commands::Info { template }) => cmd_info(&template),
        Some(Commands::Sync { template, mappings }) => cmd_sync(&template, mappings.as_deref()),
        Some(Commands::Preview { mappings, data }) => cmd_preview(&mappings, &data),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => match (cli.template, cli.data) {
            (Some(template), Some(data)) => cmd_fill(
                &template,
                &data,
                None,
                None,
                FillOptions::default(),
                false,
                false,
            ),
            _ => {
                println!("{}", "Usage: docfill <TEMPLATE> <DATA>".yellow());
                println!("       docfill --help for more information");
                Ok(())
            }
        },
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn read_records(path: &Path) -> Result<Vec<Record>, Box<dyn std::error::Error>> {
    let data = fs::read(path)?;
    Ok(JsonRecord::records_from_slice(&data)?)
}

fn default_mappings_path(template: &Path) -> PathBuf {
    let stem = template.file_stem().unwrap_or_default().to_string_lossy();
    template.with_file_name(format!("{}.mappings.json", stem))
}

fn cmd_fill(
    template: &Path,
    data: &Path,
    output: Option<&Path>,
    mappings: Option<&Path>,
    options: FillOptions,
    compact: bool,
    text: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let records = read_records(data)?;
    log::debug!("Read {} record(s) from {}", records.len(), data.display());

    let mut builder = Docfill::new().with_options(options);
    if let Some(path) = mappings {
        builder = builder.load_mappings(path)?;
    }
    if compact {
        builder = builder.compact();
    }

    let result = builder.fill_file(template, &records)?;
    let rendered = if text {
        result.to_text()
    } else {
        result.to_json()?
    };

    if let Some(path) = output {
        fs::write(path, &rendered)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", rendered);
    }

    if result.stats.has_errors() {
        eprintln!(
            "{} {} placeholder(s) could not be resolved",
            "Warning:".yellow().bold(),
            result.stats.errors
        );
    }

    Ok(())
}

fn cmd_scan(template: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let placeholders = docfill::scan_file(template)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&placeholders)?);
    } else {
        for path in &placeholders {
            println!("{}", path);
        }
    }

    Ok(())
}

fn cmd_info(template: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let doc = load_file(template)?;
    let info = parse_template(&doc);

    println!("{}", "Template Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), template.display());
    if let Some(ref title) = doc.metadata.title {
        println!("{}: {}", "Title".bold(), title);
    }
    if let Some(ref author) = doc.metadata.author {
        println!("{}: {}", "Author".bold(), author);
    }
    println!("{}: {}", "Paragraphs".bold(), info.structure.paragraph_count);
    println!("{}: {}", "Tables".bold(), info.structure.table_count);
    println!("{}: {}", "Sections".bold(), info.structure.section_count);
    println!("{}: {}", "Fields".bold(), info.field_count);

    if !info.structure.tables.is_empty() {
        println!();
        println!("{}", "Tables".cyan().bold());
        println!("{}", "─".repeat(40).dimmed());
        for table in &info.structure.tables {
            let loops = if table.has_loop {
                format!("loop: {}", table.loop_fields.join(", "))
            } else {
                "no loop".to_string()
            };
            println!(
                "  #{} {}x{} ({})",
                table.index + 1,
                table.row_count,
                table.col_count,
                loops.dimmed()
            );
        }
    }

    Ok(())
}

fn cmd_sync(template: &Path, mappings: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let path = mappings
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_mappings_path(template));

    let mut set = if path.exists() {
        MappingSet::load(&path)?
    } else {
        MappingSet::new()
    };

    let placeholders = docfill::scan_file(template)?;
    let created = set.sync(&placeholders);
    set.save(&path)?;

    println!(
        "{} {} field placeholders, {} new mapping(s)",
        "Found".green(),
        placeholders.len(),
        created
    );
    println!("{} {}", "Saved to".green(), path.display());

    Ok(())
}

fn cmd_preview(mappings: &Path, data: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let set = MappingSet::load(mappings)?;
    let records = read_records(data)?;
    let record = records.first().ok_or(docfill::Error::NoRecords)?;

    for (path, value) in set.preview(record.as_ref()) {
        println!("{} {}", format!("{}:", path).bold(), value);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "docfill".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Document template filling tool");
    println!();
    println!("License: MIT");
}
