use clap::Parser;
use pdq_client::api::PollOptions;
use pdq_client::app::views;
use pdq_client::config::cli::{CalculateCommand, Command, DatasetCommand, JsonDataCommand};
use pdq_client::utils::notify::ConsoleNotifier;
use pdq_client::{Application, CliConfig, ClientError, DatasetApi, Result};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 合併設定檔與命令列參數
    let settings = match config.settings() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    let app = match Application::bootstrap(settings, Arc::new(ConsoleNotifier)) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };
    app.install_global_handlers();

    if let Err(e) = run(&app, config.command).await {
        let exit_code = app.handle_failure(&e);
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run(app: &Application, command: Command) -> Result<()> {
    let client = app.client();
    match command {
        Command::Open { path } => {
            println!("{}", app.open(&path).await?);
        }
        Command::Jsondata(JsonDataCommand::Common(command)) => {
            run_dataset(app, &client.jsondata(), command).await?;
        }
        Command::Jsondata(JsonDataCommand::Import { file, excel }) => {
            let report = client.jsondata().import_excel_file(&file, &excel).await?;
            println!("{}", views::render_import_report(&report));
        }
        Command::Output(command) => {
            run_dataset(app, &client.output(), command).await?;
        }
        Command::Calculate(CalculateCommand::Run {
            wait,
            interval,
            attempts,
        }) => {
            let started = client.calculate().trigger_batch().await?;
            println!("{}", views::render_calculation(&started));
            if wait {
                let options = PollOptions {
                    interval: Duration::from_secs(interval),
                    max_attempts: attempts,
                };
                let status = client.calculate().wait_for_status(options).await?;
                println!("{}", views::render_calculation(&status));
            }
        }
        Command::Calculate(CalculateCommand::Status) => {
            let status = client.calculate().status().await?;
            println!("{}", views::render_calculation(&status));
        }
    }
    Ok(())
}

async fn run_dataset(app: &Application, api: &dyn DatasetApi, command: DatasetCommand) -> Result<()> {
    let notifier = app.client().notifier();
    match command {
        DatasetCommand::List => {
            let files = api.list_files().await?;
            println!("{}", views::render_file_list(&api.kind().to_string(), &files));
        }
        DatasetCommand::Get { file, raw } => {
            let content = api.get_file(&file).await?;
            if raw {
                println!("{}", serde_json::to_string_pretty(&content.data)?);
            } else {
                println!("{}", views::render_dataset(&content));
            }
        }
        DatasetCommand::Update { file, data } => {
            let data = read_data_object(&data)?;
            let response = api.update_file(&file, data).await?;
            notifier.success(&response.message);
        }
        DatasetCommand::Add {
            file,
            selector,
            value,
        } => {
            let value = serde_json::from_str(&value).unwrap_or(serde_json::Value::String(value));
            let response = api
                .add_entry(
                    &file,
                    selector.year.as_deref(),
                    selector.country.as_deref(),
                    value,
                )
                .await?;
            notifier.success(&response.message);
        }
        DatasetCommand::Delete { file, selector } => {
            let response = api
                .delete_entry(&file, selector.year.as_deref(), selector.country.as_deref())
                .await?;
            notifier.success(&response.message);
        }
        DatasetCommand::Export { file, out } => {
            let workbook = api.export_excel(&file).await?;
            let path = workbook.save_to(&out)?;
            notifier.success(&format!("Saved {}", path.display()));
        }
    }
    Ok(())
}

/// 讀取 JSON 物件，`-` 代表 stdin
fn read_data_object(path: &Path) -> Result<serde_json::Map<String, serde_json::Value>> {
    let content = if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        std::fs::read_to_string(path)?
    };

    let value: serde_json::Value = serde_json::from_str(&content).map_err(|e| ClientError::InvalidArgument {
        message: format!("{} is not valid JSON: {}", path.display(), e),
    })?;

    match value {
        serde_json::Value::Object(map) => Ok(map),
        _ => Err(ClientError::InvalidArgument {
            message: format!("{} does not contain a JSON object", path.display()),
        }),
    }
}
