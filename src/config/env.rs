//! `${env.NAME}` placeholder substitution
//!
//! Values come from the `.env` file next to the deploy file first, then from
//! the process environment. The process environment is never modified.

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

static ENV_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{env\.([A-Za-z0-9_.]+)\}").expect("env placeholder regex")
});

/// Variables available to `${env.NAME}`
#[derive(Debug, Default, Clone)]
pub struct EnvSource {
    dotenv: HashMap<String, String>,
}

impl EnvSource {
    /// Read `<dir>/.env` if it exists
    pub fn load(dir: &Path) -> Result<Self, String> {
        let path = dir.join(".env");
        if !path.is_file() {
            return Ok(Self::default());
        }
        let iter = dotenvy::from_path_iter(&path)
            .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
        let mut dotenv = HashMap::new();
        for item in iter {
            let (key, value) =
                item.map_err(|e| format!("cannot parse {}: {}", path.display(), e))?;
            dotenv.insert(key, value);
        }
        Ok(Self { dotenv })
    }

    /// Source backed by explicit values only
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            dotenv: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.dotenv
            .get(key)
            .cloned()
            .or_else(|| std::env::var(key).ok())
    }
}

/// Replace every `${env.NAME}` outside comment lines
///
/// Returns the name of the first variable that is not defined anywhere.
pub fn substitute_env(content: &str, env: &EnvSource) -> Result<String, String> {
    let mut out = String::with_capacity(content.len());
    for (i, line) in content.split_inclusive('\n').enumerate() {
        if line.trim_start().starts_with('#') {
            out.push_str(line);
            continue;
        }
        let mut last = 0;
        for caps in ENV_PLACEHOLDER.captures_iter(line) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let value = env.get(name.as_str()).ok_or_else(|| {
                format!(
                    "\"{}\" (line {}) is not found in .env file or environment",
                    whole.as_str(),
                    i + 1
                )
            })?;
            out.push_str(&line[last..whole.start()]);
            out.push_str(&value);
            last = whole.end();
        }
        out.push_str(&line[last..]);
    }
    Ok(out)
}
