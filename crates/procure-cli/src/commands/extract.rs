//! Extract command - pre-fill a procurement request from a vendor offer.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use procure_core::{
    DocumentTextExtractor, ExtractionOrchestrator, Intake, OpenAiModel, Prefill, Record,
    form_defaults, validate_form,
};

use super::load_config;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Vendor offer (PDF)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Print the extracted document text without calling the model
    #[arg(long)]
    text_only: bool,

    /// Show which extraction stage produced the record
    #[arg(long)]
    show_stage: bool,

    /// Validate the pre-filled record and report issues
    #[arg(long)]
    validate: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output, one row per order line
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());
    let data = fs::read(&args.input)?;

    if args.text_only {
        let text = DocumentTextExtractor::new(config.pdf.max_pages).extract(&data);
        if text.is_empty() {
            eprintln!("{} No text could be extracted", style("!").yellow());
        }
        return write_output(&args, &text);
    }

    let model = OpenAiModel::from_config(&config.llm)?;
    let orchestrator = Arc::new(ExtractionOrchestrator::new(Arc::new(model), &config));
    let intake = Intake::new(orchestrator, &config);

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Extracting offer data...");

    let prefill = intake
        .prefill(&data, &form_defaults(&config.extraction))
        .await;

    pb.finish_and_clear();

    if args.validate {
        report_validation(&prefill.record);
    }

    let output = format_record(&prefill.record, args.format)?;
    write_output(&args, &output)?;

    if args.show_stage {
        show_stage(&prefill);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn write_output(args: &ExtractArgs, output: &str) -> anyhow::Result<()> {
    if let Some(output_path) = &args.output {
        fs::write(output_path, output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }
    Ok(())
}

fn show_stage(prefill: &Prefill) {
    let stage = match prefill.stage {
        Some(stage) => stage.to_string(),
        None => "none (no document text, form defaults kept)".to_string(),
    };
    eprintln!("{} Extraction stage: {}", style("ℹ").blue(), stage);
}

fn report_validation(record: &Record) {
    let issues = validation_issues(record);
    if issues.is_empty() {
        eprintln!("{} Record is valid", style("✓").green());
    } else {
        eprintln!("{}", style("Validation issues:").yellow());
        for issue in &issues {
            eprintln!("  - {}", issue);
        }
    }
}

/// Schema failure or consistency warnings for a pre-filled record.
fn validation_issues(record: &Record) -> Vec<String> {
    match validate_form(record) {
        Ok(data) => data.consistency_issues(),
        Err(e) => vec![e.to_string()],
    }
}

fn format_record(record: &Record, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Csv => format_csv(record),
        OutputFormat::Text => Ok(format_text(record)),
    }
}

/// Flat CSV row: request fields repeated for every order line.
#[derive(Serialize)]
struct CsvRow<'a> {
    requestor_name: String,
    title: String,
    vendor_name: String,
    vat_id: String,
    total_cost: String,
    department: String,
    commodity_group: String,
    line_description: &'a str,
    line_unit_price: &'a str,
    line_amount: &'a str,
    line_unit: &'a str,
    line_total_price: &'a str,
}

fn format_csv(record: &Record) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let lines: Vec<[String; 5]> = match record.get("order_lines") {
        Some(Value::Array(lines)) => lines
            .iter()
            .map(|line| {
                ["description", "unit_price", "amount", "unit", "total_price"]
                    .map(|key| cell(line.get(key)))
            })
            .collect(),
        _ => Vec::new(),
    };
    let empty: [String; 5] = Default::default();
    let rows: Vec<&[String; 5]> = if lines.is_empty() {
        vec![&empty]
    } else {
        lines.iter().collect()
    };

    for line in rows {
        wtr.serialize(CsvRow {
            requestor_name: cell(record.get("requestor_name")),
            title: cell(record.get("title")),
            vendor_name: cell(record.get("vendor_name")),
            vat_id: cell(record.get("vat_id")),
            total_cost: cell(record.get("total_cost")),
            department: cell(record.get("department")),
            commodity_group: cell(record.get("commodity_group")),
            line_description: &line[0],
            line_unit_price: &line[1],
            line_amount: &line[2],
            line_unit: &line[3],
            line_total_price: &line[4],
        })?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(record: &Record) -> String {
    let mut output = String::new();

    output.push_str(&format!("Title: {}\n", cell(record.get("title"))));
    output.push_str(&format!("Requestor: {}\n", cell(record.get("requestor_name"))));
    output.push_str(&format!("Department: {}\n", cell(record.get("department"))));
    output.push('\n');

    output.push_str("Vendor:\n");
    output.push_str(&format!("  {}\n", cell(record.get("vendor_name"))));
    output.push_str(&format!("  VAT ID: {}\n", cell(record.get("vat_id"))));
    output.push('\n');

    let group = cell(record.get("commodity_group"));
    if !group.is_empty() {
        output.push_str(&format!("Commodity group: {}\n", group));
    }
    let description = cell(record.get("extracted_description_text"));
    if !description.is_empty() {
        output.push_str(&format!("Description: {}\n", description));
    }

    if let Some(Value::Array(lines)) = record.get("order_lines") {
        if !lines.is_empty() {
            output.push_str("\nOrder lines:\n");
        }
        for (i, line) in lines.iter().enumerate() {
            output.push_str(&format!(
                "  {}. {} - {} {} x {} = {}\n",
                i + 1,
                cell(line.get("description")),
                cell(line.get("amount")),
                cell(line.get("unit")),
                cell(line.get("unit_price")),
                cell(line.get("total_price")),
            ));
        }
    }

    output.push_str(&format!("\nTotal cost: {}\n", cell(record.get("total_cost"))));

    output
}

/// Render a record value for display; repaired records may hold any JSON type.
fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
