use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use lingo_tools::bilingual::{self, BilingualOptions, Labels};
use lingo_tools::flatten::{
    ConflictPolicy, DEFAULT_SEPARATOR, FlattenOptions, SeparatorPolicy, UnflattenOptions,
};
use lingo_tools::io::{JsonStyle, QuoteStyle, RenderOptions, YamlStyle};
use lingo_tools::sync::{self, ConvertOptions};
use lingo_tools::{Result, ToolError};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_logging(cli.verbose).and_then(|()| run(cli)) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| ToolError::Logging(err.to_string()))
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Convert(args) => execute_convert(args),
        Command::Merge(args) => execute_merge(args),
        Command::Split(args) => execute_split(args),
    }
}

fn execute_convert(args: ConvertArgs) -> Result<()> {
    require_input(&args.input)?;

    let options = ConvertOptions {
        render: args.render.to_options(4),
        flatten: FlattenOptions {
            separator: DEFAULT_SEPARATOR,
            separator_in_keys: separator_policy(args.allow_separator_in_keys),
        },
        unflatten: args.keys.unflatten_options(),
        sheet_name: args.sheet,
    };
    sync::convert(&args.input, &args.output, &options)
}

fn execute_merge(args: MergeArgs) -> Result<()> {
    require_input(&args.first)?;
    require_input(&args.second)?;

    let options = BilingualOptions {
        labels: args.labels.into(),
        sheet_name: args.sheet,
        flatten: FlattenOptions {
            separator: DEFAULT_SEPARATOR,
            separator_in_keys: separator_policy(args.allow_separator_in_keys),
        },
        unflatten: UnflattenOptions::default(),
    };
    sync::trees_to_excel(&args.first, &args.second, &args.output, &options)
}

fn execute_split(args: SplitArgs) -> Result<()> {
    require_input(&args.input)?;

    let options = BilingualOptions {
        labels: args.labels.into(),
        sheet_name: args
            .sheet
            .clone()
            .unwrap_or_else(|| bilingual::DEFAULT_SHEET.to_string()),
        flatten: FlattenOptions::default(),
        unflatten: args.keys.unflatten_options(),
    };
    let render = args.render.to_options(2);
    sync::excel_to_trees(
        &args.input,
        &args.first,
        &args.second,
        args.sheet.as_deref(),
        &options,
        &render,
    )
}

fn require_input(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(ToolError::MissingInput(path.to_path_buf()))
    }
}

fn separator_policy(allow: bool) -> SeparatorPolicy {
    if allow {
        SeparatorPolicy::Allow
    } else {
        SeparatorPolicy::Reject
    }
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Convert translation files between JSON, YAML, and Excel."
)]
struct Cli {
    /// Log progress to stderr (overrides RUST_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert one document; the operation follows the file extensions.
    Convert(ConvertArgs),
    /// Merge two language documents into one translation sheet.
    Merge(MergeArgs),
    /// Split a translation sheet into two language documents.
    Split(SplitArgs),
}

#[derive(clap::Args)]
struct ConvertArgs {
    /// Input file path (.json, .yaml, .yml, or .xlsx).
    #[arg(long)]
    input: PathBuf,

    /// Output file path (.json, .yaml, .yml, or .xlsx).
    #[arg(long)]
    output: PathBuf,

    /// Sheet to write, or to read instead of the first sheet.
    #[arg(long)]
    sheet: Option<String>,

    #[command(flatten)]
    render: RenderArgs,

    #[command(flatten)]
    keys: KeyArgs,

    /// Keep mapping keys that contain the separator instead of failing.
    #[arg(long)]
    allow_separator_in_keys: bool,
}

#[derive(clap::Args)]
struct MergeArgs {
    /// Document holding the first language.
    #[arg(long)]
    first: PathBuf,

    /// Document holding the second language.
    #[arg(long)]
    second: PathBuf,

    /// Spreadsheet to write.
    #[arg(long)]
    output: PathBuf,

    /// Name of the sheet to write.
    #[arg(long, default_value = bilingual::DEFAULT_SHEET)]
    sheet: String,

    #[command(flatten)]
    labels: LabelArgs,

    /// Keep mapping keys that contain the separator instead of failing.
    #[arg(long)]
    allow_separator_in_keys: bool,
}

#[derive(clap::Args)]
struct SplitArgs {
    /// Spreadsheet to read.
    #[arg(long)]
    input: PathBuf,

    /// Document to write for the first language.
    #[arg(long)]
    first: PathBuf,

    /// Document to write for the second language.
    #[arg(long)]
    second: PathBuf,

    /// Sheet to read instead of the first sheet.
    #[arg(long)]
    sheet: Option<String>,

    #[command(flatten)]
    labels: LabelArgs,

    #[command(flatten)]
    render: RenderArgs,

    #[command(flatten)]
    keys: KeyArgs,
}

#[derive(clap::Args)]
struct LabelArgs {
    /// Column header of the first language.
    #[arg(long, default_value = bilingual::FIRST_LABEL)]
    first_label: String,

    /// Column header of the second language.
    #[arg(long, default_value = bilingual::SECOND_LABEL)]
    second_label: String,
}

impl From<LabelArgs> for Labels {
    fn from(args: LabelArgs) -> Self {
        Labels {
            first: args.first_label,
            second: args.second_label,
        }
    }
}

#[derive(clap::Args)]
struct RenderArgs {
    /// Spaces per JSON indentation level.
    #[arg(long)]
    indent: Option<usize>,

    /// Escape non-ASCII characters in JSON output.
    #[arg(long)]
    ascii: bool,

    /// Quoting of YAML string scalars.
    #[arg(long, value_enum, default_value_t = YamlQuotes::Single)]
    yaml_style: YamlQuotes,
}

impl RenderArgs {
    fn to_options(&self, default_indent: usize) -> RenderOptions {
        RenderOptions {
            json: JsonStyle {
                indent: self.indent.unwrap_or(default_indent),
                escape_non_ascii: self.ascii,
            },
            yaml: YamlStyle {
                quotes: self.yaml_style.into(),
                ..YamlStyle::default()
            },
        }
    }
}

#[derive(clap::Args)]
struct KeyArgs {
    /// How to resolve a key that nests under a value, e.g. `a` and `a.b`.
    #[arg(long, value_enum, default_value_t = ConflictMode::Overwrite)]
    on_conflict: ConflictMode,

    /// Split keys at most this many times; the rest stays in the leaf key.
    #[arg(long)]
    max_depth: Option<usize>,
}

impl KeyArgs {
    fn unflatten_options(&self) -> UnflattenOptions {
        UnflattenOptions {
            separator: DEFAULT_SEPARATOR,
            max_depth: self.max_depth,
            on_conflict: self.on_conflict.into(),
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum YamlQuotes {
    Single,
    Plain,
}

impl From<YamlQuotes> for QuoteStyle {
    fn from(kind: YamlQuotes) -> Self {
        match kind {
            YamlQuotes::Single => QuoteStyle::Single,
            YamlQuotes::Plain => QuoteStyle::Plain,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ConflictMode {
    Overwrite,
    Reject,
}

impl From<ConflictMode> for ConflictPolicy {
    fn from(kind: ConflictMode) -> Self {
        match kind {
            ConflictMode::Overwrite => ConflictPolicy::Overwrite,
            ConflictMode::Reject => ConflictPolicy::Reject,
        }
    }
}
