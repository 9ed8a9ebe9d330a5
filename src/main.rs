//! ftpdeploy CLI - incremental FTP deployments driven by a YAML step list
//!
//! Usage: ftpdeploy [--config ftp-deploy.yml] [--fresh] [--act] [--dry-run]

use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use ftpdeploy::config::{config_to_json, ConfigWarning};
use ftpdeploy::domain::ports::DeployEventSink;
use ftpdeploy::infrastructure::JsonEventSink;
use ftpdeploy::presentation::{create_connector, create_uploader, Cli};
use ftpdeploy::{load_deploy_file, DeployError, DeployPipeline};

mod ui;

use ui::console::ConsoleEventSink;
use ui::terminal::{detect_capabilities, resolve_theme};
use ui::theme::{colors, Icon};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            ui::error::print_error(&err, cli.json);
            let code = err
                .downcast_ref::<DeployError>()
                .map(DeployError::exit_code)
                .unwrap_or(1);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn run(cli: &Cli) -> Result<u8> {
    let loaded = load_deploy_file(&cli.config)?;
    report_warnings(&loaded.warnings, cli);

    if cli.print_config {
        println!("{}", config_to_json(&loaded.document)?);
        return Ok(0);
    }

    let cancel = Arc::new(AtomicBool::new(false));
    let cancel_flag = cancel.clone();
    ctrlc::set_handler(move || {
        cancel_flag.store(true, Ordering::SeqCst);
    })
    .context("Error setting Ctrl+C handler")?;

    let sink: Arc<dyn DeployEventSink> = if cli.json {
        Arc::new(JsonEventSink::stdout())
    } else {
        let theme = resolve_theme(cli.color, detect_capabilities());
        Arc::new(ConsoleEventSink::stdout(theme, cli.log_files))
    };

    let connector = create_connector();
    let uploader = create_uploader(&loaded.document.config);
    let outcome = DeployPipeline::new(&loaded.document, &connector, &uploader)
        .with_event_sink(sink)
        .with_cancel_flag(cancel)
        .run(cli.run_flags())?;

    Ok(u8::try_from(outcome.exit_code()).unwrap_or(1))
}

fn report_warnings(warnings: &[ConfigWarning], cli: &Cli) {
    if warnings.is_empty() {
        return;
    }
    let caps = detect_capabilities();
    let theme = resolve_theme(cli.color, caps);

    for warning in warnings {
        let message = format!("unknown key '{}' ({})", warning.key, warning.path);
        if cli.json {
            let _ = ui::json::emit(serde_json::json!({
                "event": "warning",
                "key": warning.key,
                "path": warning.path,
                "file": warning.file.display().to_string(),
                "line": warning.line,
            }));
            continue;
        }
        let location = match warning.line {
            Some(line) => format!("{}:{}", warning.file.display(), line),
            None => warning.file.display().to_string(),
        };
        eprintln!(
            "{}",
            theme.paint(
                &format!("{} {}: {}", theme.icon(Icon::Warning), location, message),
                colors::WARNING
            )
        );
    }
}
