use super::*;

use once_cell::sync::Lazy;
use regex::Regex;

pub struct CCpp {
    pub cpp: bool,
}

static C_RISKY: &[&str] = &[
    "stdlib.h",
    "unistd.h",
    "fcntl.h",
    "signal.h",
    "dirent.h",
    "pthread.h",
    "sys/types.h",
    "sys/stat.h",
    "sys/socket.h",
    "netinet/in.h",
    "arpa/inet.h",
];

static CPP_RISKY: &[&str] = &[
    "fstream",
    "cstdlib",
    "cstdio",
    "csignal",
    "thread",
    "mutex",
    "future",
    "atomic",
    "condition_variable",
    "unistd.h",
    "signal.h",
    "dirent.h",
    "pwd.h",
    "grp.h",
    "sys/types.h",
    "sys/stat.h",
    "sys/socket.h",
    "netinet/in.h",
    "arpa/inet.h",
];

impl CCpp {
    fn compiler<'a>(&self, toolchain: &'a Toolchain) -> &'a Path {
        if self.cpp {
            &toolchain.gxx
        } else {
            &toolchain.gcc
        }
    }
}

impl Language for CCpp {
    fn tag(&self) -> &str {
        if self.cpp {
            "cpp"
        } else {
            "c"
        }
    }

    fn needs_compile(&self) -> bool {
        true
    }

    fn src_ext(&self) -> &str {
        if self.cpp {
            "cpp"
        } else {
            "c"
        }
    }

    fn artifact_path(&self, src: &Path) -> PathBuf {
        src.with_extension("out")
    }

    fn compile_cmd(&self, toolchain: &Toolchain, src: &Path) -> Option<CmdLine> {
        let mut cmd = CmdLine::new(self.compiler(toolchain));
        cmd.arg(src).arg("-o").arg(self.artifact_path(src));
        // https://stackoverflow.com/questions/5419366/why-do-i-have-to-explicitly-link-with-libm
        if !self.cpp {
            cmd.arg("-lm");
        }
        Some(cmd)
    }

    fn run_cmd(&self, _toolchain: &Toolchain, artifact: &Path) -> CmdLine {
        CmdLine::new(artifact)
    }

    fn risky_imports(&self) -> &'static [&'static str] {
        if self.cpp {
            CPP_RISKY
        } else {
            C_RISKY
        }
    }

    fn find_risky_import(&self, code: &str, denylist: &[&str]) -> Option<String> {
        static INCLUDE_RE: Lazy<Regex> =
            Lazy::new(|| Regex::new(r#"#\s*include\s*["<]([^">]+)[">]"#).unwrap());

        for caps in INCLUDE_RE.captures_iter(code) {
            let header = caps[1].trim();
            if denylist.iter().any(|risky| *risky == header) {
                return Some(header.to_owned());
            }
        }
        None
    }
}
