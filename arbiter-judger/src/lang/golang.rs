use super::*;

use once_cell::sync::Lazy;
use regex::Regex;

pub struct Go;

static GO_RISKY: &[&str] = &[
    "os",
    "os/exec",
    "os/signal",
    "os/user",
    "syscall",
    "unsafe",
    "net",
    "net/http",
    "net/rpc",
    "net/smtp",
    "net/mail",
    "io/ioutil",
    "path/filepath",
    "reflect",
    "runtime/debug",
    "log/syslog",
    "crypto/tls",
    "database/sql",
    "debug/elf",
    "debug/pe",
    "debug/macho",
];

impl Language for Go {
    fn tag(&self) -> &str {
        "go"
    }

    fn needs_compile(&self) -> bool {
        true
    }

    fn src_ext(&self) -> &str {
        "go"
    }

    fn artifact_path(&self, src: &Path) -> PathBuf {
        src.with_extension("out")
    }

    fn compile_cmd(&self, toolchain: &Toolchain, src: &Path) -> Option<CmdLine> {
        let mut cmd = CmdLine::new(&toolchain.go);
        cmd.arg("build")
            .arg("-o")
            .arg(self.artifact_path(src))
            .arg(src);
        Some(cmd)
    }

    fn run_cmd(&self, _toolchain: &Toolchain, artifact: &Path) -> CmdLine {
        CmdLine::new(artifact)
    }

    fn risky_imports(&self) -> &'static [&'static str] {
        GO_RISKY
    }

    fn find_risky_import(&self, code: &str, denylist: &[&str]) -> Option<String> {
        static BLOCK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"import\s*\(([^)]*)\)").unwrap());
        static SINGLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"import\s+"([^"]+)""#).unwrap());
        static PATH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#""([^"]+)""#).unwrap());

        for caps in BLOCK_RE.captures_iter(code) {
            for path in PATH_RE.captures_iter(&caps[1]) {
                if let Some(risky) = denylist.iter().find(|risky| **risky == &path[1]) {
                    return Some((*risky).to_owned());
                }
            }
        }
        for caps in SINGLE_RE.captures_iter(code) {
            if let Some(risky) = denylist.iter().find(|risky| **risky == &caps[1]) {
                return Some((*risky).to_owned());
            }
        }
        None
    }
}
