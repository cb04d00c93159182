use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "license-listgen",
    about = "Generate the license list outputs (text, templates, HTML, JSON, RDF, table of contents) from license XML files or a TOML bundle",
    version
)]
pub struct Cli {
    /// Directory of license XML files, or a .toml license bundle
    pub input: PathBuf,

    /// Output directory for the generated results (created when absent)
    pub output_dir: PathBuf,

    /// Version of the license list [default: from the bundle, else unknown]
    #[arg(value_name = "VERSION")]
    pub list_version: Option<String>,

    /// Release date of the license list [default: from the bundle, else unknown]
    pub release_date: Option<String>,

    /// Directory of reference license texts to test the generated licenses against
    pub test_dir: Option<PathBuf>,

    /// File or comma separated list of warnings to ignore
    pub ignored_warnings: Option<String>,

    /// Config file [default: ./.license-listgen/config.toml, fallback ~/.config/license-listgen/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// FSF license data (JSON) used to flag libre licenses
    #[arg(long, value_name = "FILE")]
    pub fsf_data: Option<PathBuf>,

    /// Also list ignored warnings
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print summary line
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_arguments() {
        let cli = Cli::try_parse_from([
            "license-listgen",
            "src",
            "out",
            "3.21",
            "2023-06-18",
            "tests",
            "a,b",
        ])
        .unwrap();
        assert_eq!(cli.input, PathBuf::from("src"));
        assert_eq!(cli.list_version.as_deref(), Some("3.21"));
        assert_eq!(cli.test_dir, Some(PathBuf::from("tests")));
        assert_eq!(cli.ignored_warnings.as_deref(), Some("a,b"));
    }

    #[test]
    fn test_optional_positionals_and_flags() {
        let cli = Cli::try_parse_from(["license-listgen", "-q", "list.toml", "out"]).unwrap();
        assert!(cli.quiet);
        assert!(cli.list_version.is_none());
        assert!(cli.test_dir.is_none());
    }

    #[test]
    fn test_list_version_positional_and_version_flag_coexist() {
        let cli = Cli::try_parse_from(["license-listgen", "in", "out", "3.21"]).unwrap();
        assert_eq!(cli.list_version.as_deref(), Some("3.21"));

        let err = Cli::try_parse_from(["license-listgen", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_command_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_missing_output_dir_is_rejected() {
        assert!(Cli::try_parse_from(["license-listgen", "list.toml"]).is_err());
    }
}
