use crate::fields::OutputFormat;
use crate::insert::{self, Caret, Insertion};
use crate::prelude::{eprintln, println, *};
use crate::prompt::TerminalPresenter;
use crate::source::{LocatedStruct, SourceFile, TargetArgs};
use ctorgen_core::constructor::{
    GeneratedConstructor, Pipeline, Script, ScriptedPresenter, SelectionPresenter, Stage,
};
use serde::Serialize;

#[derive(Debug, clap::Args)]
pub struct GenerateOptions {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Take every field as a parameter without prompting
    #[arg(long, conflicts_with_all = ["none", "select"])]
    pub all: bool,

    /// Take no field as a parameter without prompting
    #[arg(long, conflicts_with = "select")]
    pub none: bool,

    /// Comma-separated field names to take as parameters, without prompting
    #[arg(long, value_delimiter = ',')]
    pub select: Option<Vec<String>>,

    /// Print the generated impl block instead of editing the file
    #[arg(long)]
    pub dry_run: bool,

    /// Output format: text or json (default: text)
    #[arg(long, env = "CTORGEN_OUTPUT", default_value = "text")]
    pub output: OutputFormat,

    /// Output as JSON (alias for --output json)
    #[arg(long)]
    pub json: bool,
}

impl GenerateOptions {
    /// Canned selection from the command line, if one was given.
    pub fn script(&self) -> Option<Script> {
        if self.all {
            Some(Script::All)
        } else if self.none {
            Some(Script::None)
        } else {
            self.select.clone().map(Script::Names)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GenerateOutput {
    pub file: String,
    pub stage: Stage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constructor: Option<GeneratedConstructor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caret: Option<Caret>,
}

pub fn run(options: GenerateOptions, global: crate::Global) -> Result<()> {
    run_with(&options, &global, TerminalPresenter::stdio)?;
    Ok(())
}

/// Run the command, asking `interactive` for a presenter when no selection
/// was given on the command line.
pub fn run_with<P, F>(
    options: &GenerateOptions,
    global: &crate::Global,
    interactive: F,
) -> Result<GenerateOutput>
where
    P: SelectionPresenter,
    F: FnOnce(&str) -> P,
{
    let path = &options.target.file;
    let source = SourceFile::read(path)?;
    let located = source.locate(&options.target.locator())?;
    log::info!("generating constructor for {} ({})", located.decl.name, path.display());

    if global.verbose {
        eprintln!(
            "Found struct {} at line {}",
            located.decl.name,
            located.line()
        );
    }

    let mut pipeline = Pipeline::new(&located.decl);
    match options.script() {
        Some(script) => {
            let mut presenter = ScriptedPresenter::new(script);
            pipeline.negotiate(&mut presenter)?;
            if !pipeline.analysis().fields.is_empty() {
                presenter.finish()?;
            }
        }
        None => {
            let mut presenter = interactive(&located.decl.name);
            pipeline.negotiate(&mut presenter)?;
        }
    }

    let as_json = options.json || matches!(options.output, OutputFormat::Json);
    let file = path.display().to_string();

    if pipeline.stage() == Stage::Cancelled {
        log::info!("selection cancelled, {} left unchanged", file);
        let output = GenerateOutput {
            file,
            stage: Stage::Cancelled,
            constructor: None,
            caret: None,
        };
        if as_json {
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            eprintln!("Cancelled; {} left unchanged", output.file);
        }
        return Ok(output);
    }

    let generated = pipeline.emit()?;

    if options.dry_run {
        if !as_json {
            println!("{}", insert::indent_block(&generated.impl_block, &located.indent));
        }
        let output = GenerateOutput {
            file,
            stage: pipeline.stage(),
            constructor: Some(generated),
            caret: None,
        };
        if as_json {
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        return Ok(output);
    }

    let insertion = insertion_for(&source, &located, &generated);
    insert::apply(path, source.text(), &insertion)?;
    pipeline.mark_inserted()?;

    if !as_json {
        println!(
            "Inserted constructor for {} at {}:{}:{}",
            generated.struct_name, file, insertion.caret.line, insertion.caret.column
        );
    }
    let output = GenerateOutput {
        file,
        stage: pipeline.stage(),
        constructor: Some(generated),
        caret: Some(insertion.caret),
    };
    if as_json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    }

    Ok(output)
}

/// New file contents with the generated impl placed after the struct.
pub fn insertion_for(
    source: &SourceFile,
    located: &LocatedStruct,
    generated: &GeneratedConstructor,
) -> Insertion {
    let block = insert::indent_block(&generated.impl_block, &located.indent);
    let offset = insert::insertion_point(source.text(), located.end_byte);
    insert::splice_after(source.text(), offset, &block)
}
