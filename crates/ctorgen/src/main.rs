use crate::prelude::*;
use clap::Parser;

mod error;
mod fields;
mod generate;
mod insert;
mod prelude;
mod prompt;
mod source;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Generate `new` constructors for Rust structs"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Whether to display additional information.
    #[clap(long, env = "CTORGEN_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// List the constructor parameter candidates of a struct
    Fields(crate::fields::FieldsOptions),

    /// Generate a constructor and insert it after the struct
    Generate(crate::generate::GenerateOptions),
}

fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Fields(options) => crate::fields::run(options, app.global),
        SubCommands::Generate(options) => crate::generate::run(options, app.global),
    }
}
