use ftpdeploy::{DeployError, ErrorKind};

use super::terminal::detect_capabilities;
use super::theme::{colors, Icon, Theme};

/// One-line fix suggestion for errors that have an obvious remedy
fn fix_hint(err: &DeployError) -> Option<&'static str> {
    match err {
        DeployError::ConfigNotFound(_) => {
            Some("Create ftp-deploy.yml in the current directory or pass --config <file>.")
        }
        DeployError::UnknownProjectType(_) => Some("Set config.project_type to iis or laravel."),
        DeployError::InvalidCredentials { .. } => {
            Some("Check config.ssh.username and config.ssh.password.")
        }
        DeployError::ListingMismatch { .. } => {
            Some("Retry the deploy; the remote directory changed while it was being listed.")
        }
        _ => None,
    }
}

fn title(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Configuration => "configuration error",
        ErrorKind::Integrity => "remote data error",
        ErrorKind::Transport => "deploy failed",
        ErrorKind::Io => "file system error",
        ErrorKind::Interrupted => "interrupted",
    }
}

pub fn format_error_with(err: &anyhow::Error, theme: Theme) -> String {
    let Some(deploy) = err.downcast_ref::<DeployError>() else {
        return format!(
            "{}\n",
            theme.paint(
                &format!("{} {}", theme.icon(Icon::Error), err),
                colors::ERROR
            )
        );
    };

    let mut out = theme.paint(
        &format!(
            "{} {}: {}",
            theme.icon(Icon::Error),
            title(deploy.kind()),
            deploy
        ),
        colors::ERROR,
    );
    out.push('\n');
    if let Some(hint) = fix_hint(deploy) {
        out.push_str(&theme.paint(&format!("FIX: {}", hint), colors::DIM));
        out.push('\n');
    }
    out
}

pub fn print_error(err: &anyhow::Error, json: bool) {
    if json {
        let mut output = serde_json::json!({
            "event": "error",
            "message": err.to_string(),
        });
        if let Some(deploy) = err.downcast_ref::<DeployError>() {
            output["exit_code"] = deploy.exit_code().into();
        }
        let _ = super::json::emit(output);
        return;
    }

    let caps = detect_capabilities();
    let theme = Theme::new(caps.supports_color, caps.supports_unicode);
    eprint!("{}", format_error_with(err, theme));
}
