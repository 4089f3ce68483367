use super::*;

use once_cell::sync::Lazy;
use regex::Regex;

pub struct JavaScript;

static JS_RISKY: &[&str] = &[
    "fs",
    "child_process",
    "net",
    "http",
    "https",
    "os",
    "path",
    "dns",
    "vm",
    "cluster",
    "process",
    "worker_threads",
    "ws",
    "axios",
    "request",
    "puppeteer",
];

/// `fs` covers `fs`, `node:fs` and `fs/promises`
fn covers_specifier(specifier: &str, risky: &str) -> bool {
    let specifier = specifier.strip_prefix("node:").unwrap_or(specifier);
    specifier == risky
        || (specifier.len() > risky.len()
            && specifier.starts_with(risky)
            && specifier.as_bytes()[risky.len()] == b'/')
}

impl Language for JavaScript {
    fn tag(&self) -> &str {
        "js"
    }

    fn needs_compile(&self) -> bool {
        false
    }

    fn src_ext(&self) -> &str {
        "js"
    }

    fn artifact_path(&self, src: &Path) -> PathBuf {
        src.to_path_buf()
    }

    fn compile_cmd(&self, _toolchain: &Toolchain, _src: &Path) -> Option<CmdLine> {
        None
    }

    fn run_cmd(&self, toolchain: &Toolchain, artifact: &Path) -> CmdLine {
        let mut cmd = CmdLine::new(&toolchain.node);
        cmd.arg(artifact);
        cmd
    }

    fn risky_imports(&self) -> &'static [&'static str] {
        JS_RISKY
    }

    fn find_risky_import(&self, code: &str, denylist: &[&str]) -> Option<String> {
        static IMPORT_RE: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r#"(?m)^\s*import\s+(?:[^'"]*?\s+from\s+)?['"]([^'"]+)['"]"#).unwrap()
        });
        static REQUIRE_RE: Lazy<Regex> =
            Lazy::new(|| Regex::new(r#"require\s*\(\s*['"]([^'"]+)['"]\s*\)"#).unwrap());

        for re in [&IMPORT_RE, &REQUIRE_RE] {
            for caps in re.captures_iter(code) {
                if let Some(risky) = denylist.iter().find(|risky| covers_specifier(&caps[1], **risky)) {
                    return Some((*risky).to_owned());
                }
            }
        }
        None
    }
}
