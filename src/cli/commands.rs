use crate::config::InspectionOptions;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Inspects .NET solutions and projects for NuGet dependencies
#[derive(Parser, Debug)]
#[command(
    name = "nuget-inspector",
    about = "Inspects .NET solutions and projects for NuGet dependencies",
    version,
    long_about = "nuget-inspector reads solution and project files, picks the most \
                  authoritative dependency manifest for every project and prints the \
                  resulting package graph."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(
        short = 'v',
        long,
        global = true,
        help = "Verbose per-project logging"
    )]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Inspect a solution, project or directory",
        long_about = "Resolves the NuGet packages of a solution's member projects, of a \
                      single project, or of every solution (else project) directly inside \
                      a directory.\n\n\
                      Examples:\n  \
                      nuget-inspector inspect\n  \
                      nuget-inspector inspect src/App.sln\n  \
                      nuget-inspector inspect src/App.sln --excluded-modules '.*\\.Tests$'\n  \
                      nuget-inspector inspect src/Web/Web.csproj --format human"
    )]
    Inspect(InspectArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct InspectArgs {
    #[arg(
        value_name = "TARGET",
        help = "Solution, project or directory (defaults to current directory)"
    )]
    pub target: Option<PathBuf>,

    #[arg(long, value_name = "DIR", help = "Output directory recorded in results")]
    pub output_directory: Option<PathBuf>,

    #[arg(
        long,
        value_name = "LIST",
        help = "Comma-separated project names or patterns to include"
    )]
    pub included_modules: Option<String>,

    #[arg(
        long,
        value_name = "LIST",
        help = "Comma-separated project names or patterns to exclude"
    )]
    pub excluded_modules: Option<String>,

    #[arg(long, help = "Continue past projects that fail to inspect")]
    pub ignore_failure: bool,

    #[arg(long, value_name = "URL", help = "Package repository URL")]
    pub packages_repo_url: Option<String>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "json",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

impl InspectArgs {
    /// Layers the command-line values over `base` (usually read from the
    /// environment); flags only ever switch behavior on.
    pub fn to_options(&self, base: InspectionOptions, verbose: bool) -> InspectionOptions {
        InspectionOptions {
            target_path: Some(self.target.clone().unwrap_or_else(|| PathBuf::from("."))),
            output_directory: self.output_directory.clone().or(base.output_directory),
            included_modules: self.included_modules.clone().or(base.included_modules),
            excluded_modules: self.excluded_modules.clone().or(base.excluded_modules),
            ignore_failure: self.ignore_failure || base.ignore_failure,
            verbose: verbose || base.verbose,
            packages_repo_url: self.packages_repo_url.clone().or(base.packages_repo_url),
            ..base
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}
