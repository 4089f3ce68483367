use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Default, Validate, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    #[validate]
    pub staging: Staging,

    #[serde(default)]
    #[validate]
    pub executor: Executor,

    #[serde(default)]
    #[validate]
    pub screen: Screen,
}

#[derive(Debug, Clone, Validate, Serialize, Deserialize)]
pub struct Staging {
    /// directory shared by all invocations; entries are namespaced by name
    pub root: PathBuf,
}

#[derive(Debug, Clone, Validate, Serialize, Deserialize)]
pub struct Executor {
    /// wall-clock bound per test case, milliseconds; a question's own time
    /// limit takes precedence when present
    #[validate(range(min = 100, max = 60000))]
    #[serde(default = "default_case_time_limit")]
    pub case_time_limit: u64,

    /// wall-clock bound for one compiler run, milliseconds
    #[validate(range(min = 1000, max = 120000))]
    #[serde(default = "default_compile_time_limit")]
    pub compile_time_limit: u64,

    #[serde(default)]
    #[validate]
    pub toolchain: Toolchain,
}

#[derive(Debug, Clone, Validate, Serialize, Deserialize)]
pub struct Toolchain {
    pub gcc: PathBuf,
    pub gxx: PathBuf,
    pub go: PathBuf,
    pub javac: PathBuf,
    pub java: PathBuf,
    pub node: PathBuf,
    pub python3: PathBuf,
}

#[derive(Debug, Clone, Validate, Serialize, Deserialize)]
pub struct Screen {
    /// reject flagged submissions before staging; false downgrades the
    /// screen to advisory logging
    pub enforce: bool,

    /// additional denied imports, keyed by language tag
    #[serde(default)]
    pub extra_imports: HashMap<String, Vec<String>>,
}

fn default_case_time_limit() -> u64 {
    2000
}

fn default_compile_time_limit() -> u64 {
    10000
}

impl Default for Staging {
    fn default() -> Self {
        Self {
            root: PathBuf::from("staging"),
        }
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self {
            case_time_limit: default_case_time_limit(),
            compile_time_limit: default_compile_time_limit(),
            toolchain: Toolchain::default(),
        }
    }
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            gcc: PathBuf::from("gcc"),
            gxx: PathBuf::from("g++"),
            go: PathBuf::from("go"),
            javac: PathBuf::from("javac"),
            java: PathBuf::from("java"),
            node: PathBuf::from("node"),
            python3: PathBuf::from("python3"),
        }
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self {
            enforce: true,
            extra_imports: HashMap::new(),
        }
    }
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Config> {
        let content = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_toml_falls_back_to_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.executor.case_time_limit, 2000);
        assert_eq!(config.executor.toolchain.python3, PathBuf::from("python3"));
        assert!(config.screen.enforce);
        config.validate().unwrap();
    }

    #[test]
    fn sections_override_defaults() {
        let config: Config = toml::from_str(
            r#"
            [staging]
            root = "/tmp/judge"

            [executor]
            case_time_limit = 1500

            [executor.toolchain]
            gcc = "/usr/bin/gcc"
            gxx = "/usr/bin/g++"
            go = "/usr/local/go/bin/go"
            javac = "javac"
            java = "java"
            node = "node"
            python3 = "/usr/bin/python3"

            [screen]
            enforce = false
            extra_imports = { py = ["turtle"] }
            "#,
        )
        .unwrap();

        assert_eq!(config.staging.root, PathBuf::from("/tmp/judge"));
        assert_eq!(config.executor.case_time_limit, 1500);
        assert_eq!(config.executor.compile_time_limit, 10000);
        assert!(!config.screen.enforce);
        assert_eq!(config.screen.extra_imports["py"], vec!["turtle"]);
        config.validate().unwrap();
    }

    #[test]
    fn out_of_range_time_limit_is_rejected() {
        let config: Config = toml::from_str("[executor]\ncase_time_limit = 5\n").unwrap();
        assert!(config.validate().is_err());
    }
}
