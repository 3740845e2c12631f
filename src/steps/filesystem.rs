//! Filesystem operation steps.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::{template, FilesystemOperation, FilesystemStep, StepMeta};
use crate::runner::{ExitStatus, RunContext};
use crate::ui::UserInterface;

use super::{PipelineStep, StepExecutor, StepKind, StepOutcome};

impl PipelineStep for FilesystemStep {
    const KIND: StepKind = StepKind::Filesystem;

    fn meta(&self) -> &StepMeta {
        &self.meta
    }

    fn render(&self, environment: &str) -> Self {
        Self {
            meta: self.meta.clone(),
            operation: self.operation,
            source: template::replace(&self.source, environment),
            destination: template::replace(&self.destination, environment),
        }
    }

    fn describe(&self) -> String {
        match self.operation {
            FilesystemOperation::Directory => format!("{} {}", self.operation, self.destination),
            _ => format!(
                "{} {} -> {}",
                self.operation, self.source, self.destination
            ),
        }
    }
}

/// Performs directory, symlink and mirror operations.
///
/// Relative paths are resolved against the project root.
#[derive(Debug, Clone)]
pub struct FilesystemExecutor {
    root: PathBuf,
}

impl FilesystemExecutor {
    /// Executor resolving relative paths against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    fn apply(&self, step: &FilesystemStep) -> io::Result<()> {
        let destination = self.resolve(&step.destination);
        match step.operation {
            FilesystemOperation::Directory => create_directory(&destination),
            FilesystemOperation::Symlink => {
                create_symlink(&self.resolve(&step.source), &destination)
            }
            FilesystemOperation::Mirror => mirror(&self.resolve(&step.source), &destination),
        }
    }
}

impl StepExecutor for FilesystemExecutor {
    type Step = FilesystemStep;

    fn execute(
        &self,
        step: &FilesystemStep,
        ctx: &RunContext,
        _ui: &mut dyn UserInterface,
    ) -> StepOutcome {
        let step = step.render(&ctx.requested_environment);
        debug!("Filesystem {}", step.describe());

        match self.apply(&step) {
            Ok(()) => StepOutcome::success(),
            Err(e) => {
                warn!("{} failed: {}", step.describe(), e);
                StepOutcome::failure(ExitStatus::Failure, e.to_string())
            }
        }
    }
}

/// Create `path` and its parents; an existing directory is fine.
pub fn create_directory(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)
}

/// Make `link` a symbolic link pointing at `target`.
///
/// The parent of `link` is created if missing. A link that already points
/// at `target` is left alone; a link pointing elsewhere is replaced. Any
/// other existing entry at `link` is an error.
pub fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    if let Some(parent) = link.parent() {
        fs::create_dir_all(parent)?;
    }

    match fs::symlink_metadata(link) {
        Ok(meta) if meta.file_type().is_symlink() => {
            if fs::read_link(link)? == target {
                return Ok(());
            }
            remove_link(link)?;
        }
        Ok(_) => {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} exists and is not a symlink", link.display()),
            ));
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    symlink(target, link)
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    if target.is_dir() {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    }
}

#[cfg(unix)]
fn remove_link(link: &Path) -> io::Result<()> {
    fs::remove_file(link)
}

#[cfg(windows)]
fn remove_link(link: &Path) -> io::Result<()> {
    fs::remove_file(link).or_else(|_| fs::remove_dir(link))
}

/// Copy `source` into `destination` recursively, overwriting files that
/// already exist. Entries only present in `destination` are kept.
pub fn mirror(source: &Path, destination: &Path) -> io::Result<()> {
    let meta = fs::symlink_metadata(source).map_err(|e| {
        io::Error::new(
            e.kind(),
            format!("cannot mirror {}: {}", source.display(), e),
        )
    })?;

    if meta.file_type().is_symlink() {
        let target = fs::read_link(source)?;
        if fs::symlink_metadata(destination).is_ok() {
            remove_link(destination)?;
        }
        return symlink(&target, destination);
    }

    if meta.is_file() {
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(source, destination)?;
        return Ok(());
    }

    fs::create_dir_all(destination)?;
    for entry in fs::read_dir(source)? {
        let entry = entry?;
        mirror(&entry.path(), &destination.join(entry.file_name()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use tempfile::TempDir;

    fn fs_step(operation: FilesystemOperation, source: &str, destination: &str) -> FilesystemStep {
        FilesystemStep {
            meta: StepMeta::new(["dev", "prod"]),
            operation,
            source: source.into(),
            destination: destination.into(),
        }
    }

    fn run(root: &Path, step: &FilesystemStep, env: &str) -> StepOutcome {
        let mut ui = MockUI::new();
        let ctx = RunContext::new(env, false);
        FilesystemExecutor::new(root).execute(step, &ctx, &mut ui)
    }

    #[test]
    fn describe_includes_paths() {
        let step = fs_step(FilesystemOperation::Symlink, "shared/{{ env }}.env", ".env");
        assert_eq!(step.label("prod"), "symlink shared/prod.env -> .env");
        let dir = fs_step(FilesystemOperation::Directory, "", "var/cache");
        assert_eq!(dir.describe(), "directory var/cache");
    }

    #[test]
    fn directory_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let step = fs_step(FilesystemOperation::Directory, "", "var/cache/{{ env }}");

        assert!(run(temp.path(), &step, "dev").status.is_success());
        assert!(run(temp.path(), &step, "dev").status.is_success());
        assert!(temp.path().join("var/cache/dev").is_dir());
    }

    #[test]
    fn directory_over_file_fails() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("var"), "").unwrap();
        let step = fs_step(FilesystemOperation::Directory, "", "var/cache");

        let outcome = run(temp.path(), &step, "dev");
        assert_eq!(outcome.status, ExitStatus::Failure);
        assert!(outcome.message.is_some());
    }

    #[cfg(unix)]
    #[test]
    fn symlink_creates_parent_and_link() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("shared")).unwrap();
        fs::write(temp.path().join("shared/prod.env"), "A=1").unwrap();
        let step = fs_step(
            FilesystemOperation::Symlink,
            "shared/{{ env }}.env",
            "config/.env",
        );

        assert!(run(temp.path(), &step, "prod").status.is_success());

        let link = temp.path().join("config/.env");
        assert_eq!(
            fs::read_link(&link).unwrap(),
            temp.path().join("shared/prod.env")
        );
        assert_eq!(fs::read_to_string(&link).unwrap(), "A=1");
    }

    #[cfg(unix)]
    #[test]
    fn symlink_replaces_stale_link() {
        let temp = TempDir::new().unwrap();
        let link = temp.path().join("current");
        std::os::unix::fs::symlink(temp.path().join("old"), &link).unwrap();
        let step = fs_step(FilesystemOperation::Symlink, "releases/2", "current");

        assert!(run(temp.path(), &step, "dev").status.is_success());
        assert_eq!(fs::read_link(&link).unwrap(), temp.path().join("releases/2"));
        assert!(run(temp.path(), &step, "dev").status.is_success());
    }

    #[test]
    fn symlink_refuses_to_replace_real_file() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".env"), "keep").unwrap();
        let step = fs_step(FilesystemOperation::Symlink, "shared/.env", ".env");

        let outcome = run(temp.path(), &step, "dev");
        assert_eq!(outcome.status, ExitStatus::Failure);
        assert!(outcome.message.unwrap().contains("not a symlink"));
        assert_eq!(fs::read_to_string(temp.path().join(".env")).unwrap(), "keep");
    }

    #[test]
    fn mirror_copies_tree_and_overwrites() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("assets");
        fs::create_dir_all(src.join("css")).unwrap();
        fs::write(src.join("css/app.css"), "new").unwrap();
        fs::write(src.join("robots.txt"), "deny").unwrap();

        let dest = temp.path().join("public");
        fs::create_dir_all(dest.join("css")).unwrap();
        fs::write(dest.join("css/app.css"), "old").unwrap();
        fs::write(dest.join("extra.txt"), "kept").unwrap();

        let step = fs_step(FilesystemOperation::Mirror, "assets", "public");
        assert!(run(temp.path(), &step, "dev").status.is_success());

        assert_eq!(fs::read_to_string(dest.join("css/app.css")).unwrap(), "new");
        assert_eq!(fs::read_to_string(dest.join("robots.txt")).unwrap(), "deny");
        assert_eq!(fs::read_to_string(dest.join("extra.txt")).unwrap(), "kept");
    }

    #[test]
    fn mirror_missing_source_fails_with_message() {
        let temp = TempDir::new().unwrap();
        let step = fs_step(FilesystemOperation::Mirror, "nowhere", "public");

        let outcome = run(temp.path(), &step, "dev");
        assert_eq!(outcome.status, ExitStatus::Failure);
        assert!(outcome.message.unwrap().contains("cannot mirror"));
        assert!(!temp.path().join("public").exists());
    }
}
