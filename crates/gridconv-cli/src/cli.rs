use clap::{Parser, Subcommand, ValueHint};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Batch converter between MATPOWER cases and pandapower models", long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info", global = true)]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert <DATASET>/matpower/*.m (with shunts/ and names/ side-cars)
    /// into <DATASET>_pandapower/*.json
    Import {
        /// Dataset directory holding matpower/, shunts/ and optionally names/
        #[arg(value_hint = ValueHint::DirPath)]
        dataset: PathBuf,
    },
    /// Convert <DATASET>/*.json models into <DATASET>_matpower/
    Export {
        /// Directory of pandapower JSON models
        #[arg(value_hint = ValueHint::DirPath)]
        dataset: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn log_level_is_global() {
        let cli = Cli::parse_from(["gridconv", "import", "data", "--log-level", "debug"]);
        assert_eq!(cli.log_level, tracing::Level::DEBUG);
        assert!(matches!(cli.command, Commands::Import { .. }));
    }
}
