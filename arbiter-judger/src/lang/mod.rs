pub mod c_cpp;
pub mod golang;
pub mod java;
pub mod javascript;
pub mod python;

use crate::config::Toolchain;

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

pub use self::c_cpp::CCpp;
pub use self::golang::Go;
pub use self::java::Java;
pub use self::javascript::JavaScript;
pub use self::python::Python;

/// A spawnable command line. Plain data until the executor turns it into a
/// process, so dispatch stays free of process handling.
#[derive(Debug, Clone)]
pub struct CmdLine {
    pub bin: PathBuf,
    pub args: Vec<OsString>,
}

impl CmdLine {
    pub fn new(bin: impl Into<PathBuf>) -> Self {
        Self {
            bin: bin.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(&mut self, a: impl AsRef<OsStr>) -> &mut Self {
        self.args.push(a.as_ref().to_os_string());
        self
    }
}

/// One supported language. The registry below is the single source of
/// truth: build, execution, cleanup, rendering and the import screen all
/// dispatch through this trait, so adding a language means one module and
/// one registry row.
pub trait Language: Send + Sync {
    /// tag used by requests and template maps
    fn tag(&self) -> &str;

    fn needs_compile(&self) -> bool;

    /// extension of the staged source file
    fn src_ext(&self) -> &str;

    /// the staged file's stem must be a bare type identifier and is bound
    /// into the rendered source
    fn binds_file_stem(&self) -> bool {
        false
    }

    /// path of the runnable artifact produced from `src`; the source itself
    /// for interpreted languages
    fn artifact_path(&self, src: &Path) -> PathBuf;

    /// every file one invocation may leave on disk
    fn cleanup_targets(&self, src: &Path) -> Vec<PathBuf> {
        let mut targets = vec![src.to_path_buf()];
        let artifact = self.artifact_path(src);
        if artifact != src {
            targets.push(artifact);
        }
        targets
    }

    /// compiler invocation, `None` for interpreted languages
    fn compile_cmd(&self, toolchain: &Toolchain, src: &Path) -> Option<CmdLine>;

    /// subprocess used to run one test case
    fn run_cmd(&self, toolchain: &Toolchain, artifact: &Path) -> CmdLine;

    /// default denylist for the risky-import screen
    fn risky_imports(&self) -> &'static [&'static str];

    /// first denied import used by `code`, if any
    fn find_risky_import(&self, code: &str, denylist: &[&str]) -> Option<String>;
}

static LANGUAGES: [&dyn Language; 6] = [
    &CCpp { cpp: false },
    &CCpp { cpp: true },
    &Go,
    &Java,
    &JavaScript,
    &Python,
];

pub fn from_tag(tag: &str) -> Option<&'static dyn Language> {
    LANGUAGES.iter().copied().find(|lang| lang.tag() == tag)
}

pub fn supported_tags() -> Vec<&'static str> {
    LANGUAGES.iter().map(|lang| lang.tag()).collect()
}

/// dotted-module containment: `os` covers `os` and `os.path`, not `osmium`
pub(crate) fn covers_module(module: &str, risky: &str) -> bool {
    module == risky
        || (module.len() > risky.len()
            && module.starts_with(risky)
            && module.as_bytes()[risky.len()] == b'.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_resolves_every_supported_tag() {
        for tag in ["c", "cpp", "go", "java", "js", "py"] {
            let lang = from_tag(tag).unwrap();
            assert_eq!(lang.tag(), tag);
        }
        assert!(from_tag("brainfuck").is_none());
    }

    #[test]
    fn interpreted_languages_have_no_compile_step() {
        let toolchain = Toolchain::default();
        for tag in supported_tags() {
            let lang = from_tag(tag).unwrap();
            assert_eq!(
                lang.needs_compile(),
                lang.compile_cmd(&toolchain, Path::new("/tmp/x.src")).is_some(),
                "{}",
                tag
            );
        }
    }

    #[test]
    fn cleanup_covers_source_and_artifact() {
        let src = Path::new("/tmp/stage/sub_1.c");
        let targets = from_tag("c").unwrap().cleanup_targets(src);
        assert_eq!(targets.len(), 2);
        assert!(targets.contains(&src.to_path_buf()));
        assert!(targets.contains(&PathBuf::from("/tmp/stage/sub_1.out")));

        let src = Path::new("/tmp/stage/sub_2.py");
        let targets = from_tag("py").unwrap().cleanup_targets(src);
        assert_eq!(targets, vec![src.to_path_buf()]);
    }

    #[test]
    fn module_containment_is_dotted() {
        assert!(covers_module("os", "os"));
        assert!(covers_module("os.path", "os"));
        assert!(!covers_module("osmium", "os"));
    }
}
