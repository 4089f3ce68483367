use crate::config::Config;
use crate::lang::Language;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rand::Rng;
use tracing::{debug, warn};
use uuid::Uuid;

/// Produces collision-free stems for staged files. Injected so tests can
/// pin exact paths; the production source is random.
pub trait StemSource: Send + Sync {
    /// `ident` demands a stem usable as a bare type identifier
    fn next_stem(&self, ident: bool) -> String;
}

pub struct RandomStems;

impl StemSource for RandomStems {
    fn next_stem(&self, ident: bool) -> String {
        if ident {
            let mut rng = rand::thread_rng();
            format!(
                "Main{}{}",
                rng.gen_range(0..10000_u32),
                rng.gen_range(0..10000_u32)
            )
        } else {
            format!("sub_{}", Uuid::new_v4().to_simple())
        }
    }
}

/// The staging directory shared by all invocations. Entries are namespaced
/// by stem, so concurrent invocations need no coordination.
pub struct Workspace {
    root: PathBuf,
    stems: Box<dyn StemSource>,
}

impl Workspace {
    pub fn new(config: &Config) -> io::Result<Self> {
        Self::with_stems(config, Box::new(RandomStems))
    }

    pub fn with_stems(config: &Config, stems: Box<dyn StemSource>) -> io::Result<Self> {
        let root = config.staging.root.clone();
        if !root.exists() {
            fs::create_dir_all(&root)?;
        }
        Ok(Self { root, stems })
    }

    /// Reserves a stem and the source path it implies for one invocation.
    pub fn allocate(&self, lang: &dyn Language) -> (String, PathBuf) {
        let stem = self.stems.next_stem(lang.binds_file_stem());
        let path = self.root.join(format!("{}.{}", stem, lang.src_ext()));
        (stem, path)
    }

    pub fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        fs::write(path, content)
    }
}

/// Best-effort removal of everything one invocation may have left on disk.
/// Failures are logged, never escalated into a verdict.
pub fn cleanup(lang: &dyn Language, src: &Path) {
    for target in lang.cleanup_targets(src) {
        match fs::remove_file(&target) {
            Ok(()) => debug!(path = %target.display(), "removed staged file"),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => warn!(%err, path = %target.display(), "failed to remove staged file"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Staging;
    use crate::lang;

    struct FixedStems(&'static str);

    impl StemSource for FixedStems {
        fn next_stem(&self, _ident: bool) -> String {
            self.0.to_owned()
        }
    }

    fn test_config() -> Config {
        Config {
            staging: Staging {
                root: std::env::temp_dir()
                    .join(format!("arbiter-ws-{}", Uuid::new_v4().to_simple())),
            },
            ..Config::default()
        }
    }

    #[test]
    fn allocates_injected_stem_under_root() {
        let config = test_config();
        let ws = Workspace::with_stems(&config, Box::new(FixedStems("probe"))).unwrap();
        let lang = lang::from_tag("py").unwrap();

        let (stem, path) = ws.allocate(lang);
        assert_eq!(stem, "probe");
        assert_eq!(path, config.staging.root.join("probe.py"));

        let _ = fs::remove_dir_all(&config.staging.root);
    }

    #[test]
    fn random_java_stems_are_identifiers() {
        let stem = RandomStems.next_stem(true);
        assert!(stem.starts_with("Main"));
        assert!(stem.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn cleanup_removes_staged_source_and_tolerates_missing_artifact() {
        let config = test_config();
        let ws = Workspace::new(&config).unwrap();
        let lang = lang::from_tag("c").unwrap();

        let (_, path) = ws.allocate(lang);
        ws.write(&path, "int main() { return 0; }").unwrap();
        assert!(path.exists());

        // the .out artifact never existed; cleanup must not care
        cleanup(lang, &path);
        assert!(!path.exists());
        assert_eq!(fs::read_dir(&config.staging.root).unwrap().count(), 0);

        let _ = fs::remove_dir_all(&config.staging.root);
    }
}
