//! Validation steps and the facts reported about each checked path.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Local};

use crate::config::{template, StepMeta, ValidationRule, ValidationStep};

use super::{PipelineStep, StepKind};

impl PipelineStep for ValidationStep {
    const KIND: StepKind = StepKind::Validation;

    fn meta(&self) -> &StepMeta {
        &self.meta
    }

    fn render(&self, environment: &str) -> Self {
        Self {
            meta: self.meta.clone(),
            path: template::replace(&self.path, environment),
            kind: self.kind,
            validations: self
                .validations
                .iter()
                .map(|rule| ValidationRule {
                    name: template::replace(&rule.name, environment),
                    parameters: template::replace_mapping(&rule.parameters, environment),
                })
                .collect(),
        }
    }

    fn describe(&self) -> String {
        format!("{} {}", self.kind, self.path)
    }
}

/// What the filesystem says about a validated path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathFacts {
    pub exists: bool,
    /// Raw mode bits including the file type, when the path exists.
    pub mode: Option<u32>,
    pub modified: Option<DateTime<Local>>,
}

/// Shown in place of facts about a path that does not exist.
pub const NOT_AVAILABLE: &str = "NOT AVAILABLE";

impl PathFacts {
    /// Inspect `path` without following a final symlink.
    pub fn inspect(path: &Path) -> Self {
        match fs::symlink_metadata(path) {
            Ok(meta) => Self {
                exists: true,
                mode: Some(raw_mode(&meta)),
                modified: meta.modified().ok().map(DateTime::<Local>::from),
            },
            Err(_) => Self {
                exists: false,
                mode: None,
                modified: None,
            },
        }
    }

    /// Last four octal digits of the mode, e.g. `0755`.
    pub fn octal(&self) -> String {
        match self.mode {
            Some(mode) => format!("{:04o}", mode & 0o7777),
            None => NOT_AVAILABLE.to_string(),
        }
    }

    /// `ls -l` style mode, e.g. `drwxr-xr-x`.
    pub fn symbolic(&self) -> String {
        match self.mode {
            Some(mode) => symbolic_mode(mode),
            None => NOT_AVAILABLE.to_string(),
        }
    }

    /// Modification time as `YYYY-MM-DD HH:MM:SS`.
    pub fn modified_display(&self) -> String {
        match self.modified {
            Some(time) => time.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => NOT_AVAILABLE.to_string(),
        }
    }
}

#[cfg(unix)]
fn raw_mode(meta: &fs::Metadata) -> u32 {
    use std::os::unix::fs::MetadataExt;
    meta.mode()
}

#[cfg(not(unix))]
fn raw_mode(meta: &fs::Metadata) -> u32 {
    let kind = if meta.file_type().is_symlink() {
        0o120000
    } else if meta.is_dir() {
        0o040000
    } else {
        0o100000
    };
    let perms = if meta.permissions().readonly() { 0o555 } else { 0o777 };
    kind | perms
}

/// Render mode bits the way `ls -l` does.
pub fn symbolic_mode(mode: u32) -> String {
    let kind = match mode & 0o170000 {
        0o140000 => 's',
        0o120000 => 'l',
        0o100000 => '-',
        0o060000 => 'b',
        0o040000 => 'd',
        0o020000 => 'c',
        0o010000 => 'p',
        _ => 'u',
    };

    let bit = |mask: u32, c: char| if mode & mask != 0 { c } else { '-' };
    let exec = |x: u32, special: u32, set: char| match (mode & x != 0, mode & special != 0) {
        (true, true) => set,
        (false, true) => set.to_ascii_uppercase(),
        (true, false) => 'x',
        (false, false) => '-',
    };

    [
        kind,
        bit(0o400, 'r'),
        bit(0o200, 'w'),
        exec(0o100, 0o4000, 's'),
        bit(0o040, 'r'),
        bit(0o020, 'w'),
        exec(0o010, 0o2000, 's'),
        bit(0o004, 'r'),
        bit(0o002, 'w'),
        exec(0o001, 0o1000, 't'),
    ]
    .iter()
    .collect()
}
