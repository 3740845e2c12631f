//! Built-in validators.

use std::path::Path;

use serde_yaml::{Mapping, Value};

use crate::error::Result;

use super::{ValidationTarget, Validator};

/// Permissions `filepath_perms` expects when no `perms` parameter is given.
pub const DEFAULT_PERMS: &str = "0777";

/// Every builtin validator.
pub fn all() -> Vec<Box<dyn Validator>> {
    vec![
        Box::new(Exists),
        Box::new(IsFile),
        Box::new(IsDir),
        Box::new(IsReadable),
        Box::new(IsExecutable),
        Box::new(IsAbsolutePath),
        Box::new(FilepathPerms),
    ]
}

/// `exists`: the path exists (file, directory or anything else).
pub struct Exists;

impl Validator for Exists {
    fn name(&self) -> &'static str {
        "exists"
    }

    fn title(&self) -> &'static str {
        "File - Directory Exists"
    }

    fn validate(&self, _parameters: &Mapping, target: &ValidationTarget<'_>) -> Result<bool> {
        Ok(target.require(self.name())?.exists())
    }
}

/// `is_file`: the path is a regular file.
pub struct IsFile;

impl Validator for IsFile {
    fn name(&self) -> &'static str {
        "is_file"
    }

    fn title(&self) -> &'static str {
        "Is File"
    }

    fn validate(&self, _parameters: &Mapping, target: &ValidationTarget<'_>) -> Result<bool> {
        Ok(target.require(self.name())?.is_file())
    }
}

/// `is_dir`: the path is a directory.
pub struct IsDir;

impl Validator for IsDir {
    fn name(&self) -> &'static str {
        "is_dir"
    }

    fn title(&self) -> &'static str {
        "Is Directory"
    }

    fn validate(&self, _parameters: &Mapping, target: &ValidationTarget<'_>) -> Result<bool> {
        Ok(target.require(self.name())?.is_dir())
    }
}

/// `is_readable`: the current user may read the path.
pub struct IsReadable;

impl Validator for IsReadable {
    fn name(&self) -> &'static str {
        "is_readable"
    }

    fn title(&self) -> &'static str {
        "Is Readable"
    }

    fn validate(&self, _parameters: &Mapping, target: &ValidationTarget<'_>) -> Result<bool> {
        Ok(access::readable(&target.require(self.name())?))
    }
}

/// `is_executable`: the current user may execute (or enter) the path.
pub struct IsExecutable;

impl Validator for IsExecutable {
    fn name(&self) -> &'static str {
        "is_executable"
    }

    fn title(&self) -> &'static str {
        "Is Executable"
    }

    fn validate(&self, _parameters: &Mapping, target: &ValidationTarget<'_>) -> Result<bool> {
        Ok(access::executable(&target.require(self.name())?))
    }
}

/// `is_absolute_path`: the configured path string is absolute.
///
/// Inspects the string itself, not the resolved path.
pub struct IsAbsolutePath;

impl Validator for IsAbsolutePath {
    fn name(&self) -> &'static str {
        "is_absolute_path"
    }

    fn title(&self) -> &'static str {
        "Is Absolute Path"
    }

    fn validate(&self, _parameters: &Mapping, target: &ValidationTarget<'_>) -> Result<bool> {
        target.require(self.name())?;
        Ok(Path::new(target.path).is_absolute())
    }
}

/// `filepath_perms`: the last four octal digits of the mode equal `perms`.
pub struct FilepathPerms;

impl Validator for FilepathPerms {
    fn name(&self) -> &'static str {
        "filepath_perms"
    }

    fn title(&self) -> &'static str {
        "File - Directory Permissions"
    }

    fn validate(&self, parameters: &Mapping, target: &ValidationTarget<'_>) -> Result<bool> {
        let path = target.require(self.name())?;
        let expected = expected_perms(parameters);
        Ok(mode_string(&path).is_some_and(|actual| actual == expected))
    }
}

/// The `perms` parameter as four octal digits.
///
/// YAML reads an unquoted `0775` as the integer 775, so numbers are taken
/// digit for digit and left-padded.
fn expected_perms(parameters: &Mapping) -> String {
    let raw = match parameters.get("perms") {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => DEFAULT_PERMS.to_string(),
    };
    format!("{:0>4}", raw)
}

/// Last four octal digits of the mode of `path`.
#[cfg(unix)]
pub fn mode_string(path: &Path) -> Option<String> {
    use std::os::unix::fs::PermissionsExt;

    let mode = std::fs::metadata(path).ok()?.permissions().mode();
    Some(format!("{:04o}", mode & 0o7777))
}

#[cfg(not(unix))]
pub fn mode_string(path: &Path) -> Option<String> {
    let meta = std::fs::metadata(path).ok()?;
    Some(if meta.permissions().readonly() { "0555" } else { "0777" }.to_string())
}

#[cfg(unix)]
mod access {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;
    use std::path::Path;

    fn check(path: &Path, mode: libc::c_int) -> bool {
        let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
            return false;
        };
        // SAFETY: c_path is a valid NUL-terminated string for the duration of the call.
        unsafe { libc::access(c_path.as_ptr(), mode) == 0 }
    }

    pub fn readable(path: &Path) -> bool {
        check(path, libc::R_OK)
    }

    pub fn executable(path: &Path) -> bool {
        check(path, libc::X_OK)
    }
}

#[cfg(not(unix))]
mod access {
    use std::path::Path;

    pub fn readable(path: &Path) -> bool {
        if path.is_dir() {
            std::fs::read_dir(path).is_ok()
        } else {
            std::fs::File::open(path).is_ok()
        }
    }

    pub fn executable(path: &Path) -> bool {
        path.is_dir()
            || path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| matches!(e.to_ascii_lowercase().as_str(), "exe" | "bat" | "cmd"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeckhandError;
    use std::fs;
    use tempfile::TempDir;

    fn check(validator: &dyn Validator, path: &str, root: &Path) -> bool {
        validator
            .validate(&Mapping::new(), &ValidationTarget::new(path, root))
            .unwrap()
    }

    fn perms(value: Value) -> Mapping {
        let mut map = Mapping::new();
        map.insert(Value::from("perms"), value);
        map
    }

    #[test]
    fn exists_file_and_dir() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("var")).unwrap();
        fs::write(temp.path().join("app.env"), "").unwrap();

        assert!(check(&Exists, "var", temp.path()));
        assert!(check(&Exists, "app.env", temp.path()));
        assert!(!check(&Exists, "missing", temp.path()));

        assert!(check(&IsDir, "var", temp.path()));
        assert!(!check(&IsDir, "app.env", temp.path()));
        assert!(check(&IsFile, "app.env", temp.path()));
        assert!(!check(&IsFile, "var", temp.path()));
    }

    #[test]
    fn absolute_path_inspects_configured_string() {
        let temp = TempDir::new().unwrap();
        assert!(!check(&IsAbsolutePath, "var/log", temp.path()));
        assert!(check(&IsAbsolutePath, &temp.path().to_string_lossy(), temp.path()));
    }

    #[test]
    fn every_builtin_rejects_empty_path() {
        let temp = TempDir::new().unwrap();
        for validator in all() {
            let err = validator
                .validate(&Mapping::new(), &ValidationTarget::new("", temp.path()))
                .unwrap_err();
            assert!(
                matches!(err, DeckhandError::ValidatorArgument { .. }),
                "{} accepted an empty path",
                validator.name()
            );
        }
    }

    #[test]
    fn expected_perms_pads_numbers() {
        assert_eq!(expected_perms(&Mapping::new()), "0777");
        assert_eq!(expected_perms(&perms(Value::from("0640"))), "0640");
        assert_eq!(expected_perms(&perms(Value::from(775))), "0775");
    }

    #[cfg(unix)]
    #[test]
    fn filepath_perms_compares_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let file = temp.path().join("run.sh");
        fs::write(&file, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&file, fs::Permissions::from_mode(0o750)).unwrap();

        let target = ValidationTarget::new("run.sh", temp.path());
        assert!(FilepathPerms
            .validate(&perms(Value::from("0750")), &target)
            .unwrap());
        assert!(!FilepathPerms
            .validate(&perms(Value::from("0755")), &target)
            .unwrap());
        assert!(!FilepathPerms.validate(&Mapping::new(), &target).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn filepath_perms_missing_path_is_false() {
        let temp = TempDir::new().unwrap();
        assert!(!check(&FilepathPerms, "missing", temp.path()));
    }

    #[cfg(unix)]
    #[test]
    fn readable_and_executable_follow_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let script = temp.path().join("deploy.sh");
        fs::write(&script, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        let data = temp.path().join("data.txt");
        fs::write(&data, "x").unwrap();
        fs::set_permissions(&data, fs::Permissions::from_mode(0o644)).unwrap();

        assert!(check(&IsReadable, "deploy.sh", temp.path()));
        assert!(check(&IsExecutable, "deploy.sh", temp.path()));
        assert!(check(&IsReadable, "data.txt", temp.path()));
        assert!(!check(&IsExecutable, "data.txt", temp.path()));
        assert!(!check(&IsReadable, "missing", temp.path()));
    }
}
