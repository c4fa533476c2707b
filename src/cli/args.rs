//! Command-line argument parsing for apidrift.
//!
//! This module handles parsing command-line arguments and determining
//! which CLI command to execute.

use std::path::PathBuf;

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Compare two spec files
    Analyze(AnalyzeArgs),
    /// Unusable arguments, with the reason
    Invalid(String),
}

/// Arguments of an analysis run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzeArgs {
    /// Previous spec version
    pub old_path: PathBuf,
    /// Proposed spec version
    pub new_path: PathBuf,
    /// Service base URL overriding the environment
    pub base_url: Option<String>,
}

/// Parse command-line arguments and return the appropriate command.
///
/// `--version` and `--help` win over everything else. An analysis needs
/// exactly two positional spec paths.
///
/// # Examples
///
/// ```
/// use apidrift::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["apidrift".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    let mut args = args.skip(1);
    let mut paths: Vec<PathBuf> = Vec::new();
    let mut base_url = None;
    let mut invalid = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-V" => return CliCommand::Version,
            "--help" | "-h" => return CliCommand::Help,
            "--url" => match args.next() {
                Some(url) => base_url = Some(url),
                None => {
                    invalid.get_or_insert_with(|| "--url requires a value".to_string());
                }
            },
            other if other.starts_with("--url=") => {
                base_url = Some(other["--url=".len()..].to_string());
            }
            other if other.starts_with('-') && other.len() > 1 => {
                invalid.get_or_insert_with(|| format!("Unknown option: {}", other));
            }
            other => paths.push(PathBuf::from(other)),
        }
    }

    if let Some(reason) = invalid {
        return CliCommand::Invalid(reason);
    }

    match paths.len() {
        0 => CliCommand::Help,
        2 => {
            let new_path = paths.pop().unwrap_or_default();
            let old_path = paths.pop().unwrap_or_default();
            CliCommand::Analyze(AnalyzeArgs {
                old_path,
                new_path,
                base_url,
            })
        }
        n => CliCommand::Invalid(format!("Expected 2 spec files, got {}", n)),
    }
}
