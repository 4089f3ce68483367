use super::*;

use once_cell::sync::Lazy;
use regex::Regex;

pub struct Python;

static PY_RISKY: &[&str] = &[
    "os",
    "sys",
    "subprocess",
    "socket",
    "shutil",
    "ctypes",
    "threading",
    "multiprocessing",
    "pickle",
    "http.server",
    "ftplib",
    "telnetlib",
    "asyncio",
    "ssl",
    "requests",
    "paramiko",
    "sqlite3",
    "inspect",
];

impl Language for Python {
    fn tag(&self) -> &str {
        "py"
    }

    fn needs_compile(&self) -> bool {
        false
    }

    fn src_ext(&self) -> &str {
        "py"
    }

    fn artifact_path(&self, src: &Path) -> PathBuf {
        src.to_path_buf()
    }

    fn compile_cmd(&self, _toolchain: &Toolchain, _src: &Path) -> Option<CmdLine> {
        None
    }

    fn run_cmd(&self, toolchain: &Toolchain, artifact: &Path) -> CmdLine {
        let mut cmd = CmdLine::new(&toolchain.python3);
        cmd.arg(artifact);
        cmd
    }

    fn risky_imports(&self) -> &'static [&'static str] {
        PY_RISKY
    }

    fn find_risky_import(&self, code: &str, denylist: &[&str]) -> Option<String> {
        static IMPORT_RE: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"(?m)^\s*(?:import|from)\s+(.+)$").unwrap());

        for caps in IMPORT_RE.captures_iter(code) {
            for part in caps[1].split(',') {
                // first token of "os.path as p" / "os import path"
                let module = part.trim().split_whitespace().next().unwrap_or("");
                if let Some(risky) = denylist.iter().find(|risky| covers_module(module, **risky)) {
                    return Some((*risky).to_owned());
                }
            }
        }
        None
    }
}
