mod cmd;
mod completions;
mod logging;
mod prompt;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::engine::ArgValueCompleter;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "docfill",
    version,
    about = "Fill document templates from validated, schema-driven prompts"
)]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate configuration and print resolved settings
    Doctor,

    /// List templates discovered under templates_dir
    ListTemplates,

    /// Load and validate a template schema without prompting
    Check(CheckArgs),

    /// Collect values for a template and render the document
    Fill(FillArgs),

    /// Spell a number or dotted identifier out in words
    Words(WordsArgs),

    /// Print shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Logical template name
    #[arg(add = ArgValueCompleter::new(completions::complete_templates))]
    pub template: String,
}

#[derive(Debug, Args)]
pub struct FillArgs {
    /// Logical template name; chosen interactively when omitted
    #[arg(add = ArgValueCompleter::new(completions::complete_templates))]
    pub template: Option<String>,

    /// Output file path (defaults to <output_dir>/<template>_<timestamp>.<ext>)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Print the collected values as JSON instead of rendering
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct WordsArgs {
    /// Integer, decimal or dotted identifier such as 12.345
    #[arg(allow_hyphen_values = true)]
    pub value: String,

    /// Language: ru or en (defaults to the configured language)
    #[arg(long)]
    pub lang: Option<String>,

    /// Read the value as a decimal number rather than an identifier
    #[arg(long)]
    pub decimal: bool,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    pub shell: clap_complete::Shell,
}

fn main() {
    clap_complete::CompleteEnv::with_factory(Cli::command).complete();

    if let Err(e) = color_eyre::install() {
        eprintln!("failed to install error reporting: {e}");
    }

    let cli = Cli::parse();

    match cli.command {
        Commands::Doctor => cmd::doctor::run(cli.config.as_deref(), cli.profile.as_deref()),
        Commands::ListTemplates => {
            cmd::list_templates::run(cli.config.as_deref(), cli.profile.as_deref())
        }
        Commands::Check(args) => {
            cmd::check::run(cli.config.as_deref(), cli.profile.as_deref(), &args)
        }
        Commands::Fill(args) => {
            cmd::fill::run(cli.config.as_deref(), cli.profile.as_deref(), &args)
        }
        Commands::Words(args) => {
            cmd::words::run(cli.config.as_deref(), cli.profile.as_deref(), &args)
        }
        Commands::Completions(args) => {
            let mut command = Cli::command();
            clap_complete::generate(args.shell, &mut command, "docfill", &mut std::io::stdout());
        }
    }

    logging::flush();
}
