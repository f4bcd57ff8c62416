use crate::io::output;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sigmap")]
#[command(about = "PHP class hierarchy and method signature compatibility checker", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a codebase for incompatible method overrides
    Scan {
        /// Directory or file to scan
        path: PathBuf,

        /// Output format (defaults to the config value, then terminal)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Configuration file (defaults to the nearest .sigmap.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Treat PATH as a JSON array of class records instead of sources
        #[arg(long = "input-json")]
        input_json: bool,

        /// Exit with status 1 when any discrepancy is reported
        #[arg(long)]
        strict: bool,

        /// Additional glob patterns to skip
        #[arg(long, value_delimiter = ',')]
        ignore: Option<Vec<String>>,

        /// Parse and analyze on a single thread
        #[arg(long = "no-parallel")]
        no_parallel: bool,

        /// Color mode for terminal output
        #[arg(long, value_enum, default_value = "auto")]
        color: ColorChoice,

        /// Suppress progress output
        #[arg(short, long)]
        quiet: bool,

        /// Increase log verbosity (-v info, -vv debug, -vvv trace)
        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,
    },
    /// Write a default .sigmap.toml in the current directory
    Init {
        /// Overwrite an existing configuration file
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl From<OutputFormat> for output::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => Self::Json,
            OutputFormat::Markdown => Self::Markdown,
            OutputFormat::Terminal => Self::Terminal,
        }
    }
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_input_flags() {
        let cli = Cli::parse_from([
            "sigmap",
            "scan",
            "classes.json",
            "--input-json",
            "--no-parallel",
            "--color",
            "never",
            "-q",
        ]);

        match cli.command {
            Commands::Scan {
                input_json,
                no_parallel,
                color,
                quiet,
                ..
            } => {
                assert!(input_json);
                assert!(no_parallel);
                assert!(quiet);
                assert_eq!(color, ColorChoice::Never);
            }
            _ => panic!("Expected Scan command"),
        }
    }

    #[test]
    fn test_format_flag_maps_onto_writer_format() {
        let formats = [OutputFormat::Json, OutputFormat::Markdown, OutputFormat::Terminal];
        let mapped: Vec<crate::io::output::OutputFormat> =
            formats.into_iter().map(Into::into).collect();
        assert_eq!(
            mapped,
            vec![
                crate::io::output::OutputFormat::Json,
                crate::io::output::OutputFormat::Markdown,
                crate::io::output::OutputFormat::Terminal,
            ]
        );
    }

    #[test]
    fn test_cli_parsing_scan_command() {
        let args = vec![
            "sigmap",
            "scan",
            "/test/path",
            "--format",
            "json",
            "--strict",
            "--ignore",
            "vendor/**,tests/**",
            "-vv",
        ];

        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Scan {
                path,
                format,
                strict,
                ignore,
                verbosity,
                color,
                ..
            } => {
                assert_eq!(path, PathBuf::from("/test/path"));
                assert_eq!(format, Some(OutputFormat::Json));
                assert!(strict);
                assert_eq!(
                    ignore,
                    Some(vec!["vendor/**".to_string(), "tests/**".to_string()])
                );
                assert_eq!(verbosity, 2);
                assert_eq!(color, ColorChoice::Auto);
            }
            _ => panic!("Expected Scan command"),
        }
    }

    #[test]
    fn test_cli_parsing_init_command() {
        let cli = Cli::parse_from(vec!["sigmap", "init", "--force"]);

        match cli.command {
            Commands::Init { force } => assert!(force),
            _ => panic!("Expected Init command"),
        }
    }

    #[test]
    fn test_scan_defaults() {
        let cli = Cli::parse_from(vec!["sigmap", "scan", "."]);

        match cli.command {
            Commands::Scan {
                format,
                output,
                config,
                input_json,
                no_parallel,
                ..
            } => {
                assert_eq!(format, None);
                assert_eq!(output, None);
                assert_eq!(config, None);
                assert!(!input_json);
                assert!(!no_parallel);
            }
            _ => panic!("Expected Scan command"),
        }
    }
}
