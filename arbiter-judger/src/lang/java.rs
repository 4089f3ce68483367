use super::*;

use once_cell::sync::Lazy;
use regex::Regex;

pub struct Java;

static JAVA_RISKY: &[&str] = &[
    "java.lang.Runtime",
    "java.lang.Process",
    "java.lang.ProcessBuilder",
    "java.io.File",
    "java.io.FileInputStream",
    "java.io.FileOutputStream",
    "java.nio.file.Files",
    "java.nio.file.Paths",
    "java.net.Socket",
    "java.net.ServerSocket",
    "java.net.URL",
    "java.net.HttpURLConnection",
    "java.util.zip.ZipFile",
    "java.util.zip.ZipInputStream",
    "java.util.concurrent.ExecutorService",
    "java.util.concurrent.Executors",
    "java.sql.Connection",
    "java.sql.DriverManager",
    "java.sql.PreparedStatement",
];

impl Language for Java {
    fn tag(&self) -> &str {
        "java"
    }

    fn needs_compile(&self) -> bool {
        true
    }

    fn src_ext(&self) -> &str {
        "java"
    }

    fn binds_file_stem(&self) -> bool {
        true
    }

    fn artifact_path(&self, src: &Path) -> PathBuf {
        src.with_extension("class")
    }

    fn compile_cmd(&self, toolchain: &Toolchain, src: &Path) -> Option<CmdLine> {
        let mut cmd = CmdLine::new(&toolchain.javac);
        cmd.arg("-encoding").arg("UTF-8").arg(src);
        Some(cmd)
    }

    fn run_cmd(&self, toolchain: &Toolchain, artifact: &Path) -> CmdLine {
        let class_dir = artifact.parent().unwrap_or_else(|| Path::new("."));
        let class_name = artifact.file_stem().unwrap_or_default();

        let mut cmd = CmdLine::new(&toolchain.java);
        cmd.arg("-Xms64m")
            .arg("-Xmx512m")
            .arg("-cp")
            .arg(class_dir)
            .arg(class_name);
        cmd
    }

    fn risky_imports(&self) -> &'static [&'static str] {
        JAVA_RISKY
    }

    fn find_risky_import(&self, code: &str, denylist: &[&str]) -> Option<String> {
        static IMPORT_RE: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"(?m)^\s*import\s+(?:static\s+)?([A-Za-z0-9_.$]+)\s*;").unwrap());

        for caps in IMPORT_RE.captures_iter(code) {
            if let Some(risky) = denylist.iter().find(|risky| **risky == &caps[1]) {
                return Some((*risky).to_owned());
            }
        }
        None
    }
}
