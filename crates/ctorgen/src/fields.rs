use crate::prelude::{eprintln, print, println, *};
use crate::source::{LocatedStruct, SourceFile, TargetArgs};
use colored::Colorize;
use ctorgen_core::constructor::{analyze, StructAnalysis};
use serde::Serialize;

#[derive(Debug, Clone, clap::ValueEnum, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human readable text
    Text,
    /// JSON with structured data
    Json,
}

#[derive(Debug, clap::Args)]
pub struct FieldsOptions {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Output format: text or json (default: text)
    #[arg(long, env = "CTORGEN_OUTPUT", default_value = "text")]
    pub output: OutputFormat,

    /// Output as JSON (alias for --output json)
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
pub struct FieldsOutput {
    pub file: String,
    pub line: usize,
    #[serde(flatten)]
    pub analysis: StructAnalysis,
}

pub fn run(options: FieldsOptions, global: crate::Global) -> Result<()> {
    let source = SourceFile::read(&options.target.file)?;
    let located = source.locate(&options.target.locator())?;

    if global.verbose {
        eprintln!(
            "Found struct {} at line {}",
            located.decl.name,
            located.line()
        );
    }

    let output = fields_data(&options.target, &located);

    if options.json || matches!(options.output, OutputFormat::Json) {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print!("{}", format_fields_text(&output));
    }

    Ok(())
}

pub fn fields_data(target: &TargetArgs, located: &LocatedStruct) -> FieldsOutput {
    FieldsOutput {
        file: target.file.display().to_string(),
        line: located.line(),
        analysis: analyze(&located.decl),
    }
}

fn format_fields_text(output: &FieldsOutput) -> String {
    let analysis = &output.analysis;
    let mut text = format!(
        "{} ({}, {} field{}) {}\n",
        analysis.name.bold(),
        analysis.shape,
        analysis.fields.len(),
        if analysis.fields.len() == 1 { "" } else { "s" },
        format!("{}:{}", output.file, output.line).as_str().dimmed()
    );

    for field in &analysis.fields {
        text.push_str(&format!("{:>3}. {}\n", field.position + 1, field.label()));
    }

    text
}
