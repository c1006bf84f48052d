//! Layered `section -> option -> value` configuration.
//!
//! Files use the `.kattisrc` INI layout:
//!
//! ```text
//! [user]
//! username: alice
//! token: 0123abcd
//!
//! [site]
//! hostname: open.kattis.com
//! ```
//!
//! A file whose name ends in `.json` is read as a JSON object of objects
//! with the same shape instead.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::debug;
use regex::Regex;

use crate::error::{Error, Result};

pub const SITE: &str = "site";
pub const USER: &str = "user";
pub const HOSTNAME: &str = "hostname";
pub const DEFAULT_HOSTNAME: &str = "open.kattis.com";
pub const CONFIG_FILENAME: &str = ".kattisrc";
pub const SYSTEM_CONFIG: &str = "/usr/local/etc/kattisrc";

type Sections = BTreeMap<String, BTreeMap<String, String>>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    sections: Sections,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the system-wide file (if any) and then every readable file in
    /// `paths`, later files overriding earlier ones.
    ///
    /// Fails unless at least one of `paths` was read.
    pub fn load<I, P>(paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        Self::load_with_system(Some(Path::new(SYSTEM_CONFIG)), paths)
    }

    pub fn load_with_system<I, P>(system: Option<&Path>, paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut cfg = Self::new();

        if let Some(system) = system {
            if system.is_file() {
                cfg.read_file(system)?;
            }
        }

        let mut tried = vec![];
        let mut found = false;
        for p in paths {
            let p = p.as_ref();
            found |= cfg.read_file(p)?;
            tried.push(p.to_path_buf());
        }

        if !found {
            return Err(Error::ConfigNotFound { paths: tried });
        }

        if !cfg.has_option(SITE, HOSTNAME) {
            cfg.set(SITE, HOSTNAME, DEFAULT_HOSTNAME);
        }

        Ok(cfg)
    }

    /// `~/.kattisrc`, then `.kattisrc` beside the running executable, then
    /// beside the executable with symlinks resolved.
    pub fn default_paths() -> Vec<PathBuf> {
        let mut dirs = vec![];
        if let Some(base) = directories::BaseDirs::new() {
            dirs.push(base.home_dir().to_path_buf());
        }
        if let Ok(exe) = std::env::current_exe() {
            if let Some(d) = exe.parent() {
                dirs.push(d.to_path_buf());
            }
            if let Ok(real) = exe.canonicalize() {
                if let Some(d) = real.parent() {
                    dirs.push(d.to_path_buf());
                }
            }
        }
        dirs.into_iter().map(|d| d.join(CONFIG_FILENAME)).collect()
    }

    // Returns false if the file can not be opened at all.
    fn read_file(&mut self, path: &Path) -> Result<bool> {
        let text = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                return Err(Error::ConfigParse {
                    path: path.to_path_buf(),
                    line: 0,
                    message: e.to_string(),
                });
            }
            Err(e) => {
                debug!("skipping config file {}: {}", path.display(), e);
                return Ok(false);
            }
        };

        debug!("reading config file {}", path.display());
        if path.extension().map_or(false, |e| e == "json") {
            self.merge_json(path, &text)?;
        } else {
            self.merge_ini(path, &text)?;
        }
        Ok(true)
    }

    fn merge_json(&mut self, path: &Path, text: &str) -> Result<()> {
        let v: Sections = serde_json::from_str(text).map_err(|e| Error::ConfigParse {
            path: path.to_path_buf(),
            line: e.line(),
            message: e.to_string(),
        })?;
        for (section, options) in v {
            for (option, value) in options {
                self.set(&section, &option, value);
            }
        }
        Ok(())
    }

    fn merge_ini(&mut self, path: &Path, text: &str) -> Result<()> {
        let section_re = Regex::new(r"^\[(?P<name>[^\]]+)\]\s*$").unwrap();
        let option_re = Regex::new(r"^(?P<option>.*?)\s*[=:]\s*(?P<value>.*)$").unwrap();

        let parse_error = |line: usize, message: &str| Error::ConfigParse {
            path: path.to_path_buf(),
            line,
            message: message.to_string(),
        };

        let mut section: Option<String> = None;
        // The option a continuation line would extend.
        let mut last: Option<String> = None;

        for (i, raw) in text.lines().enumerate() {
            let lineno = i + 1;
            let trimmed = raw.trim();

            if trimmed.is_empty() {
                last = None;
                continue;
            }
            if trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }

            let indented = raw.starts_with(|c: char| c.is_whitespace());
            if indented {
                if let (Some(s), Some(o)) = (&section, &last) {
                    if let Some(v) = self.sections.get_mut(s).and_then(|m| m.get_mut(o)) {
                        v.push('\n');
                        v.push_str(trimmed);
                    }
                    continue;
                }
            }

            if let Some(caps) = section_re.captures(trimmed) {
                let name = caps["name"].to_string();
                self.sections.entry(name.clone()).or_default();
                section = Some(name);
                last = None;
                continue;
            }

            let current = match &section {
                Some(s) => s.clone(),
                None => return Err(parse_error(lineno, "option outside of any section")),
            };

            let caps = match option_re.captures(trimmed) {
                Some(c) => c,
                None => return Err(parse_error(lineno, "expected `option = value`")),
            };
            let option = caps["option"].trim().to_lowercase();
            if option.is_empty() {
                return Err(parse_error(lineno, "empty option name"));
            }
            self.set(&current, &option, caps["value"].trim());
            last = Some(option);
        }

        Ok(())
    }

    pub fn has_option(&self, section: &str, option: &str) -> bool {
        self.get(section, option).is_some()
    }

    pub fn get(&self, section: &str, option: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|m| m.get(&option.to_lowercase()))
            .map(String::as_str)
    }

    pub fn get_or<'a>(&'a self, section: &str, option: &str, default: &'a str) -> &'a str {
        self.get(section, option).unwrap_or(default)
    }

    pub fn require(&self, section: &str, option: &str) -> Result<&str> {
        self.get(section, option).ok_or_else(|| Error::MissingOption {
            section: section.to_string(),
            option: option.to_string(),
        })
    }

    pub fn set<V: ToString>(&mut self, section: &str, option: &str, value: V) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(option.to_lowercase(), value.to_string());
    }
}

/// Parse INI text, with `site.hostname` defaulted like [`Config::load`].
impl FromStr for Config {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut cfg = Self::new();
        cfg.merge_ini(Path::new("<string>"), s)?;
        if !cfg.has_option(SITE, HOSTNAME) {
            cfg.set(SITE, HOSTNAME, DEFAULT_HOSTNAME);
        }
        Ok(cfg)
    }
}
