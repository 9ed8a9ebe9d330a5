//! Deploy file loading and validation
//!
//! Order of work: `${env.*}` substitution on the text, YAML parse, unknown
//! key collection with `serde_ignored`, then validation of `config` and of
//! every step (references, `{{n}}` arguments, predefined parameters).

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde_yaml_ng::Value;

use crate::domain::entities::{PredefinedStep, ShellStep, Step};
use crate::domain::value_objects::{ConfigWarning, ProjectType};
use crate::error::{DeployError, DeployResult};

use super::env::{substitute_env, EnvSource};
use super::types::{
    DeployConfig, DeployDocument, FtpConfig, RawCommand, RawConfig, RawDocument, RawPredefined,
    RawShell, RawStep, SshConfig,
};

/// Default deploy file name, relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "ftp-deploy.yml";

const OBSOLETE_NO_DEPLOYER: &str =
    "no more need to save last uploaded files locally! (just remove this step)";

/// Removed predefined methods and how to migrate away from them
const OBSOLETE_METHODS: [(&str, &str); 5] = [
    ("local:prepare_deployer", OBSOLETE_NO_DEPLOYER),
    ("local:copy_files_to_deployer", OBSOLETE_NO_DEPLOYER),
    ("local:save_deployer_status_tmp", OBSOLETE_NO_DEPLOYER),
    (
        "local:find_new_files",
        "please use \"server:find_new_files\" instead",
    ),
    (
        "local:upload_files",
        "please use \"server:upload_files\" instead",
    ),
];

static ARG_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(\d+)\}\}").expect("argument placeholder regex"));

/// A validated deploy file plus non-fatal warnings
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub document: DeployDocument,
    pub warnings: Vec<ConfigWarning>,
}

/// Load and validate a deploy file; `.env` is read from the same directory
pub fn load_deploy_file(path: &Path) -> DeployResult<LoadedConfig> {
    if !path.is_file() {
        return Err(DeployError::ConfigNotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let env = EnvSource::load(dir).map_err(|e| DeployError::invalid_config(path, e))?;
    parse_deploy_document(&content, path, &env)
}

/// Parse deploy file content; `file` is only used for messages
pub fn parse_deploy_document(
    content: &str,
    file: &Path,
    env: &EnvSource,
) -> DeployResult<LoadedConfig> {
    let substituted =
        substitute_env(content, env).map_err(|e| DeployError::invalid_config(file, e))?;

    let root: Value = serde_yaml_ng::from_str(&substituted)
        .map_err(|e| DeployError::invalid_config(file, e.to_string()))?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let raw: RawDocument = serde_ignored::deserialize(root.clone(), |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| DeployError::invalid_config(file, e.to_string()))?;

    let (Some(raw_config), Some(raw_steps)) = (raw.config, raw.steps) else {
        return Err(DeployError::invalid_config(
            file,
            "config or steps is not set in your yaml file!",
        ));
    };

    let config = validate_config(raw_config, file)?;

    let steps = raw_steps
        .iter()
        .enumerate()
        .map(|(i, value)| parse_step(i + 1, value, &root, &config))
        .collect::<DeployResult<Vec<_>>>()?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                line: find_line_number(content, &key),
                key,
                path: path_str,
                file: file.to_path_buf(),
            }
        })
        .collect();

    Ok(LoadedConfig {
        document: DeployDocument { config, steps },
        warnings,
    })
}

/// Resolved configuration as pretty JSON, passwords omitted
pub fn config_to_json(document: &DeployDocument) -> DeployResult<String> {
    serde_json::to_string_pretty(document)
        .map_err(|e| DeployError::invalid_config("<print-config>", e.to_string()))
}

fn required(value: Option<String>, key: &str, file: &Path) -> DeployResult<String> {
    value.ok_or_else(|| DeployError::invalid_config(file, format!("{} is not set!", key)))
}

fn validate_config(raw: RawConfig, file: &Path) -> DeployResult<DeployConfig> {
    let project_type: ProjectType =
        required(raw.project_type, "config.project_type", file)?.parse()?;
    let host = required(raw.host, "config.host", file)?;
    let target_basepath = required(raw.target_basepath, "config.target_basepath", file)?;

    let raw_ftp = raw
        .ftp
        .ok_or_else(|| DeployError::invalid_config(file, "config.ftp is not set!"))?;
    let ftp = FtpConfig {
        username: required(raw_ftp.username, "config.ftp.username", file)?,
        password: required(raw_ftp.password, "config.ftp.password", file)?,
        base_path: required(raw_ftp.base_path, "config.ftp.base_path", file)?,
    };

    let ssh = match raw.ssh {
        Some(raw_ssh) => Some(SshConfig {
            username: required(raw_ssh.username, "config.ssh.username", file)?,
            password: required(raw_ssh.password, "config.ssh.password", file)?,
        }),
        None => None,
    };

    let ignores = raw
        .ignores
        .into_iter()
        .map(|p| p.replace("\\*", "*"))
        .collect();

    Ok(DeployConfig {
        project_type,
        host,
        source_basepath: normalize_source_path(raw.source_basepath.as_deref().unwrap_or(".")),
        target_basepath,
        ftp,
        ssh,
        dist_dirs: raw.dist_dirs,
        ignores,
    })
}

/// Normalize `source_basepath`: `.`, `./*`, `*` and empty mean the working
/// directory; trailing `*` and `/` are dropped
pub fn normalize_source_path(raw: &str) -> PathBuf {
    let mut path = raw.trim().replace('\\', "/");
    if matches!(path.as_str(), "" | "." | "./" | "./*" | "*") {
        return PathBuf::from(".");
    }
    if path.ends_with('*') {
        path.pop();
    }
    while path.len() > 1 && path.ends_with('/') {
        path.pop();
    }
    if let Some(rest) = path.strip_prefix("./") {
        if !rest.is_empty() {
            path = rest.to_string();
        }
    }
    PathBuf::from(path)
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    for (i, line) in content.lines().enumerate() {
        if line.contains(needle) {
            return Some(i + 1);
        }
    }
    None
}

fn describe_value(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "<step>".to_string())
}

fn parse_step(
    index: usize,
    value: &Value,
    root: &Value,
    config: &DeployConfig,
) -> DeployResult<Step> {
    let step_error = |message: String| DeployError::InvalidStep {
        index,
        step: describe_value(value),
        message,
    };

    let mut unknown: Vec<String> = Vec::new();
    let raw: RawStep = serde_ignored::deserialize(value.clone(), |p| {
        unknown.push(p.to_string());
    })
    .map_err(|e| step_error(e.to_string()))?;

    if let Some(key) = unknown.first() {
        return Err(step_error(format!("unknown key: {}", key)));
    }

    match (raw.predefined, raw.shell, raw.log) {
        (Some(predefined), None, None) => parse_predefined(predefined, root).map_err(step_error),
        (None, Some(shell), None) => parse_shell(shell, root, config).map_err(step_error),
        (None, None, Some(log)) => Ok(Step::Log(log.into_message())),
        _ => Err(step_error(
            "only these step types are available: 'log', 'shell', 'predefined' (exactly one per step)"
                .to_string(),
        )),
    }
}

fn parse_predefined(raw: RawPredefined, root: &Value) -> Result<Step, String> {
    let (method, mut params) = match raw {
        RawPredefined::Name(name) => (name, Default::default()),
        RawPredefined::Call { method, params } => (method, params),
    };

    if let Some((_, hint)) = OBSOLETE_METHODS.iter().find(|(name, _)| *name == method) {
        return Err(format!("Obsolete method \"{}\": {}", method, hint));
    }

    let mut take = |key: &str| -> Result<Value, String> {
        let raw = params
            .remove(key)
            .ok_or_else(|| format!("{}.{} is not set!", method, key))?;
        resolve_reference(&raw, root).ok_or_else(|| {
            format!(
                "\"{}.{}\" has \"{}\" as argument but it doesn't exist in yaml!",
                method,
                key,
                scalar_to_string(&raw).unwrap_or_default()
            )
        })
    };

    let step = match method.as_str() {
        "local:sleep" => {
            let ms = take("ms")?;
            PredefinedStep::Sleep {
                ms: parse_millis(&ms).ok_or_else(|| format!("{}.ms must be a number!", method))?,
            }
        }
        "server:restart_iis_site" => {
            let pool = take("pool")?;
            let site = take("site")?;
            PredefinedStep::RestartIisSite {
                pool: scalar_to_string(&pool)
                    .ok_or_else(|| format!("{}.pool must be a string!", method))?,
                site: scalar_to_string(&site)
                    .ok_or_else(|| format!("{}.site must be a string!", method))?,
            }
        }
        other => PredefinedStep::from_name(other)
            .ok_or_else(|| format!("\"{}\" is not a valid predefined function", other))?,
    };

    if let Some(extra) = params.keys().next() {
        return Err(format!("Unknown key: {}.{}!", method, extra));
    }
    Ok(Step::Predefined(step))
}

fn parse_millis(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => {
            let s = s.trim();
            if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
                s.parse().ok()
            } else {
                None
            }
        }
        _ => None,
    }
}

fn parse_shell(raw: RawShell, root: &Value, config: &DeployConfig) -> Result<Step, String> {
    let mut command = match raw.command {
        RawCommand::Plain(cmd) => cmd,
        RawCommand::PerPlatform { windows, other } => {
            let windows_target = if raw.ssh {
                config.project_type.is_windows()
            } else {
                cfg!(windows)
            };
            if windows_target {
                windows
            } else {
                other
            }
        }
    };

    let mut args = Vec::new();
    for arg in raw.args.iter().filter(|a| !is_blank(a)) {
        let resolved = resolve_reference(arg, root).ok_or_else(|| {
            format!(
                "\"{}\" has \"{}\" as argument but it doesn't exist in config!",
                command,
                scalar_to_string(arg).unwrap_or_default()
            )
        })?;
        let position = args.len();
        let arg = scalar_to_string(&resolved).ok_or_else(|| {
            format!("argument {} of \"{}\" is not a scalar", position, command)
        })?;
        args.push(arg);
    }
    if !args.is_empty() || ARG_PLACEHOLDER.is_match(&command) {
        command = format_arguments(&command, &args)?;
    }

    let message = raw
        .message
        .map(|m| m.replace("${command}", &command));

    Ok(Step::Shell(ShellStep {
        command,
        message,
        ssh: raw.ssh,
        on_error: raw.on_error,
        suppress_stdout: raw.ignore_stdout,
    }))
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Replace `{{n}}` with `args[n]`
pub fn format_arguments(command: &str, args: &[String]) -> Result<String, String> {
    let mut missing = None;
    let out = ARG_PLACEHOLDER.replace_all(command, |caps: &regex::Captures<'_>| {
        let index: Option<usize> = caps.get(1).and_then(|m| m.as_str().parse().ok());
        match index.and_then(|i| args.get(i)) {
            Some(arg) => arg.clone(),
            None => {
                missing.get_or_insert_with(|| caps[0].to_string());
                String::new()
            }
        }
    });
    match missing {
        Some(placeholder) => Err(format!(
            "\"{}\" uses {} but only {} argument(s) are given",
            command,
            placeholder,
            args.len()
        )),
        None => Ok(out.into_owned()),
    }
}

/// Resolve a `${dotted.path}` reference against the YAML document;
/// anything else is returned unchanged
pub fn resolve_reference(value: &Value, root: &Value) -> Option<Value> {
    let Value::String(raw) = value else {
        return Some(value.clone());
    };
    let trimmed = raw.trim();
    let Some(path) = trimmed
        .strip_prefix("${")
        .and_then(|rest| rest.strip_suffix('}'))
    else {
        return Some(value.clone());
    };

    let mut current = root;
    for segment in path.split('.') {
        current = match current {
            Value::Mapping(map) => map.get(segment)?,
            Value::Sequence(seq) => seq.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    match current {
        Value::Null => None,
        found => Some(found.clone()),
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
