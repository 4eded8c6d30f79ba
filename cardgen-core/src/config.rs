//! Run configuration, built once by the entry point and passed down.

use std::env;
use std::path::{Path, PathBuf};

use crate::geometry::Generation;

pub const DEFAULT_OUTPUT_DIR: &str = "outputs";
pub const OUTPUT_ROOT_VAR: &str = "OUTPUT_ROOT";
pub const LOCALE_VAR: &str = "LOCALE";

/// Which language column body text prefers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    Default,
    Ru,
}

impl Locale {
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("ru") {
            Locale::Ru
        } else {
            Locale::Default
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub project_root: PathBuf,
    pub output_root: PathBuf,
    pub public_root: PathBuf,
    pub data_dir: PathBuf,
    pub fonts_dir: PathBuf,
    pub locale: Locale,
    /// Drop rows with a non-empty `Addon` column.
    pub ignore_addon_records: bool,
    pub generation: Generation,
}

impl Config {
    /// Read `OUTPUT_ROOT` and `LOCALE` from the process environment.
    pub fn from_env(project_root: &Path) -> Self {
        let output_root = env::var(OUTPUT_ROOT_VAR).ok();
        let locale = env::var(LOCALE_VAR).ok();
        Self::resolve(project_root, output_root.as_deref(), locale.as_deref())
    }

    pub fn resolve(project_root: &Path, output_root: Option<&str>, locale: Option<&str>) -> Self {
        let output_root = match output_root.map(str::trim) {
            Some(dir) if !dir.is_empty() => project_root.join(dir),
            _ => project_root.join(DEFAULT_OUTPUT_DIR),
        };
        Config {
            project_root: project_root.to_path_buf(),
            output_root,
            public_root: project_root.join("public"),
            data_dir: project_root.join("data"),
            fonts_dir: project_root.join("fonts"),
            locale: locale.map(Locale::parse).unwrap_or_default(),
            ignore_addon_records: false,
            generation: Generation::default(),
        }
    }

    pub fn output_path(&self, segment: &str) -> PathBuf {
        self.output_root.join(segment)
    }

    pub fn misc_dir(&self) -> PathBuf {
        self.output_path("misc")
    }

    pub fn atlases_dir(&self) -> PathBuf {
        self.output_path("atlases")
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.output_path("templates")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        let cfg = Config::resolve(Path::new("/proj"), None, None);
        assert_eq!(cfg.output_root, Path::new("/proj/outputs"));
        assert_eq!(cfg.public_root, Path::new("/proj/public"));
        assert_eq!(cfg.locale, Locale::Default);
        assert!(!cfg.ignore_addon_records);
        assert_eq!(cfg.misc_dir(), Path::new("/proj/outputs/misc"));
    }

    #[test]
    fn output_root_is_relative_to_project_unless_absolute() {
        let cfg = Config::resolve(Path::new("/proj"), Some("build/out"), None);
        assert_eq!(cfg.output_root, Path::new("/proj/build/out"));
        let cfg = Config::resolve(Path::new("/proj"), Some("/tmp/cards"), None);
        assert_eq!(cfg.output_root, Path::new("/tmp/cards"));
        let cfg = Config::resolve(Path::new("/proj"), Some("  "), None);
        assert_eq!(cfg.output_root, Path::new("/proj/outputs"));
    }

    #[test]
    fn locale_is_case_insensitive() {
        assert_eq!(Locale::parse("RU"), Locale::Ru);
        assert_eq!(Locale::parse("ru"), Locale::Ru);
        assert_eq!(Locale::parse("default"), Locale::Default);
        assert_eq!(Locale::parse("en"), Locale::Default);
    }
}
