use crate::config::toml_config::TomlConfig;
use crate::config::ClientSettings;
use crate::http::base_url::BuildMode;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "pdq")]
#[command(about = "Manage jsondata / output datasets and trigger batch calculations")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Use the development proxy (`<dev server>/api`)
    #[arg(long, global = true)]
    pub dev: bool,

    /// Hostname used to pick the production API host
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Skip base URL resolution and talk to this URL directly
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Overall request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Open a screen by path (`/`, `/jsondata`, `/output`)
    Open { path: String },

    /// Input datasets
    #[command(subcommand)]
    Jsondata(JsonDataCommand),

    /// Calculation results
    #[command(subcommand)]
    Output(DatasetCommand),

    /// Batch calculation
    #[command(subcommand)]
    Calculate(CalculateCommand),
}

#[derive(Debug, Clone, Subcommand)]
pub enum DatasetCommand {
    /// List dataset files
    List,
    /// Show one dataset file
    Get {
        file: String,
        /// Print the raw JSON instead of a table
        #[arg(long)]
        raw: bool,
    },
    /// Replace a dataset file with the JSON object read from a file (`-` for stdin)
    Update {
        file: String,
        #[arg(long)]
        data: PathBuf,
    },
    /// Add a year or a country
    Add {
        file: String,
        #[command(flatten)]
        selector: EntrySelector,
        /// JSON value; plain text is sent as a string
        #[arg(long)]
        value: String,
    },
    /// Delete a year or a country
    Delete {
        file: String,
        #[command(flatten)]
        selector: EntrySelector,
    },
    /// Download the dataset as an Excel workbook
    Export {
        file: String,
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum JsonDataCommand {
    #[command(flatten)]
    Common(DatasetCommand),
    /// Upload an Excel workbook into a dataset file
    Import { file: String, excel: PathBuf },
}

#[derive(Debug, Clone, Args)]
pub struct EntrySelector {
    #[arg(long)]
    pub year: Option<String>,
    #[arg(long)]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum CalculateCommand {
    /// Start the batch calculation
    Run {
        /// Poll the status endpoint afterwards
        #[arg(long)]
        wait: bool,
        #[arg(long, default_value = "2")]
        interval: u64,
        #[arg(long, default_value = "30")]
        attempts: u32,
    },
    /// Show the calculation status
    Status,
}

impl CliConfig {
    /// 合併設定檔與命令列參數，命令列優先
    pub fn settings(&self) -> Result<ClientSettings> {
        let file_config = match &self.config {
            Some(path) => {
                let config = TomlConfig::from_file(path)?;
                config.validate()?;
                config
            }
            None => TomlConfig::default(),
        };

        let mut settings = ClientSettings::from_file_config(&file_config);
        if self.dev {
            settings.base_url.mode = BuildMode::Development;
        }
        if let Some(host) = &self.host {
            settings.base_url.hostname = host.clone();
        }
        if let Some(url) = &self.base_url {
            settings.base_url.override_url = Some(url.clone());
        }
        if let Some(timeout) = self.timeout {
            settings.timeout = Duration::from_secs(timeout);
        }
        settings.verbose |= self.verbose;
        settings.json_logs |= self.json_logs;

        settings.validate()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_delete_with_year() {
        let cli = CliConfig::parse_from(["pdq", "jsondata", "delete", "gdp.json", "--year", "2020"]);
        match cli.command {
            Command::Jsondata(JsonDataCommand::Common(DatasetCommand::Delete { file, selector })) => {
                assert_eq!(file, "gdp.json");
                assert_eq!(selector.year.as_deref(), Some("2020"));
                assert!(selector.country.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_output_has_no_import() {
        assert!(CliConfig::try_parse_from(["pdq", "output", "import", "gdp.json", "a.xlsx"]).is_err());
        assert!(CliConfig::try_parse_from(["pdq", "jsondata", "import", "gdp.json", "a.xlsx"]).is_ok());
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = CliConfig::parse_from(["pdq", "--host", "intranet", "--timeout", "5", "calculate", "status"]);
        let settings = cli.settings().unwrap();
        assert_eq!(settings.resolved_base_url(), "http://10.3.35.21:8010/api");
        assert_eq!(settings.timeout, Duration::from_secs(5));

        let cli = CliConfig::parse_from(["pdq", "open", "/", "--dev"]);
        assert_eq!(cli.settings().unwrap().resolved_base_url(), "http://localhost:8080/api");
    }

    #[test]
    fn test_invalid_base_url_flag() {
        let cli = CliConfig::parse_from(["pdq", "--base-url", "/api", "jsondata", "list"]);
        assert!(cli.settings().is_err());
    }
}
