use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use textflow_cli::commands::hyphenate_ops::{self, HyphenateOptions};
use textflow_cli::commands::{config_ops, pattern_ops, SessionSource};
use textflow_cli::pattern_file::PatternFormat;
use textflow_cli::trace_init::init_tracing;
use textflow_core::config::DebugLevel;

#[derive(Parser)]
#[command(name = "textflow", about = "Soft-hyphenation tool")]
struct Cli {
    /// Log as JSON lines on stderr (filter with TEXTFLOW_LOG)
    #[arg(long, global = true)]
    log_json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct SourceArgs {
    /// Pattern file (list or SQL dump); repeat to layer files in order
    #[arg(short, long = "patterns", required = true)]
    patterns: Vec<PathBuf>,
    /// Pattern file format
    #[arg(long, value_enum, default_value = "auto")]
    format: PatternFormat,
    /// Language for list lines that carry none
    #[arg(long)]
    default_language: Option<String>,
    /// Settings TOML (default: embedded settings)
    #[arg(long)]
    settings: Option<PathBuf>,
    /// JSON file used as the shared word cache
    #[arg(long)]
    cache: Option<PathBuf>,
}

impl From<SourceArgs> for SessionSource {
    fn from(a: SourceArgs) -> Self {
        SessionSource {
            patterns: a.patterns,
            format: a.format,
            default_language: a.default_language,
            settings: a.settings,
            cache: a.cache,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Insert soft hyphens into a file or stdin
    Hyphenate {
        /// Input file (default: stdin)
        input: Option<String>,
        #[command(flatten)]
        source: SourceArgs,
        /// Language code (default: settings language.default)
        #[arg(short, long)]
        language: Option<String>,
        /// Only touch text between tags, comments and scripts
        #[arg(long)]
        preserve_structure: bool,
        /// Marker: off (soft hyphen), text, obvious
        #[arg(long, default_value = "off")]
        debug: DebugLevel,
        /// Print status and cache counters to stderr
        #[arg(long)]
        stats: bool,
    },
    /// Show the break points of words
    Inspect {
        /// Words to inspect
        #[arg(required = true)]
        words: Vec<String>,
        #[command(flatten)]
        source: SourceArgs,
        /// Language code
        #[arg(short, long)]
        language: Option<String>,
        /// JSON output
        #[arg(long)]
        json: bool,
    },
    /// Inspect or convert pattern files
    Patterns {
        #[command(subcommand)]
        action: PatternsAction,
    },
    /// Export or validate settings TOML
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
enum PatternsAction {
    /// Per-language pattern counts
    Info {
        /// Pattern file
        file: String,
        #[arg(long, value_enum, default_value = "auto")]
        format: PatternFormat,
        /// Language for list lines that carry none
        #[arg(long)]
        default_language: Option<String>,
        /// JSON output
        #[arg(long)]
        json: bool,
    },
    /// Rewrite a pattern file (e.g. an SQL dump) as a `language pattern` list
    Convert {
        /// Input pattern file
        input: String,
        /// Output file (default: stdout)
        output: Option<String>,
        #[arg(long, value_enum, default_value = "auto")]
        format: PatternFormat,
        /// Language for list lines that carry none
        #[arg(long)]
        default_language: Option<String>,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print the default settings TOML
    Export,
    /// Validate a custom settings TOML file
    Validate {
        /// Path to the TOML file
        file: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match cli.command {
        Command::Hyphenate {
            input,
            source,
            language,
            preserve_structure,
            debug,
            stats,
        } => {
            let opts = HyphenateOptions {
                language,
                preserve_structure,
                debug,
                stats,
            };
            hyphenate_ops::hyphenate_cmd(input.as_deref(), &source.into(), &opts);
        }
        Command::Inspect {
            words,
            source,
            language,
            json,
        } => hyphenate_ops::inspect_cmd(&words, &source.into(), language.as_deref(), json),
        Command::Patterns { action } => match action {
            PatternsAction::Info {
                file,
                format,
                default_language,
                json,
            } => pattern_ops::info_cmd(&file, format, default_language.as_deref(), json),
            PatternsAction::Convert {
                input,
                output,
                format,
                default_language,
            } => pattern_ops::convert_cmd(
                &input,
                output.as_deref(),
                format,
                default_language.as_deref(),
            ),
        },
        Command::Settings { action } => match action {
            SettingsAction::Export => config_ops::settings_export(),
            SettingsAction::Validate { file } => config_ops::settings_validate(&file),
        },
    }
}
