use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

const PROJECT_CONFIG_NAME: &str = ".kwtallyrc";

/// Configuration file handler for kwtally
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub defaults: Option<String>,
}

impl ConfigFile {
    /// Find project-level .kwtallyrc by walking up directory tree
    pub fn find_project_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::find_project_config_from(&current)
    }

    pub fn find_project_config_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let config_path = current.join(PROJECT_CONFIG_NAME);
            if config_path.is_file() {
                return Some(config_path);
            }
            if !current.pop() {
                // Reached filesystem root
                break;
            }
        }
        None
    }

    /// Get list of user config file locations in order of preference
    pub fn get_user_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. <config dir>/kwtally/config.ini (XDG_CONFIG_HOME, APPDATA, ...)
        // 2. ~/.kwtallyrc
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("kwtally").join("config.ini"));
        }
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(PROJECT_CONFIG_NAME));
        }

        paths
    }

    /// Load configuration with proper precedence: project > user > defaults
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        // First, load user config files (lowest precedence)
        if let Some(path) = Self::get_user_config_paths()
            .into_iter()
            .find(|p| p.is_file())
        {
            config = Self::merge_configs(config, Self::load_from_path(&path)?);
        }

        // Then, load project config (higher precedence)
        if let Some(project_path) = Self::find_project_config() {
            config = Self::merge_configs(config, Self::load_from_path(&project_path)?);
        }

        Ok(config)
    }

    /// Load configuration with optional custom config file path
    pub fn load_with_custom_path(custom_path: Option<&str>) -> Result<Self> {
        match custom_path {
            Some(path) => Self::load_from_path(Path::new(path)),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Ok(Self::parse_ini_content(&content))
    }

    /// Parse INI content from string
    fn parse_ini_content(content: &str) -> Self {
        let mut defaults = None;
        let mut current_section = String::new();

        for line in content.lines() {
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') {
                current_section = line[1..line.len() - 1].to_string();
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                // Only root-level `defaults` is understood; everything else is ignored
                if current_section.is_empty() && key.trim() == "defaults" {
                    defaults = Some(value.trim().to_string());
                }
            }
        }

        Self { defaults }
    }

    /// Merge two configuration objects, with the second taking precedence
    fn merge_configs(base: Self, overlay: Self) -> Self {
        Self {
            defaults: overlay.defaults.or(base.defaults),
        }
    }

    /// Insert the configured default arguments right after the program name,
    /// so anything given on the real command line overrides them
    pub fn apply_defaults(&self, raw_args: &[String]) -> Result<Vec<String>> {
        let Some(defaults) = &self.defaults else {
            return Ok(raw_args.to_vec());
        };

        let extra = shell_words::split(defaults)
            .with_context(|| format!("Invalid defaults in config file: {}", defaults))?;

        let mut args = Vec::with_capacity(raw_args.len() + extra.len());
        args.extend(raw_args.first().cloned());
        args.extend(extra);
        args.extend(raw_args.iter().skip(1).cloned());
        Ok(args)
    }

    /// Describe configuration sources and the active defaults
    pub fn describe_config(custom_path: Option<&str>) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Configuration precedence: CLI > project {} > user config > defaults\n",
            PROJECT_CONFIG_NAME
        );

        let project_config_path = Self::find_project_config();
        let user_config_paths = Self::get_user_config_paths();

        match Self::load_with_custom_path(custom_path) {
            Ok(config) => match &config.defaults {
                Some(defaults) => {
                    let _ = writeln!(out, "Active defaults:\n  defaults = {}", defaults);
                }
                None => {
                    let _ = writeln!(out, "No defaults configured.");
                }
            },
            Err(e) => {
                let _ = writeln!(out, "Error loading configuration: {:#}", e);
            }
        }

        let _ = writeln!(out, "\nConfiguration search locations (in precedence order):");
        if let Some(path) = custom_path {
            let _ = writeln!(out, "  Custom: {}", path);
        }
        match &project_config_path {
            Some(path) => {
                let _ = writeln!(out, "  1. Project: {} (found)", path.display());
            }
            None => {
                let _ = writeln!(
                    out,
                    "  1. Project: {} (searched up directory tree, not found)",
                    PROJECT_CONFIG_NAME
                );
            }
        }
        for (i, path) in user_config_paths.iter().enumerate() {
            let status = if path.is_file() { "(found)" } else { "(not found)" };
            let _ = writeln!(out, "  {}. User: {} {}", i + 2, path.display(), status);
        }

        let _ = writeln!(out, "\nExample configuration file ({}):", PROJECT_CONFIG_NAME);
        let _ = writeln!(out, "# Default arguments applied to every kwtally command");
        let _ = writeln!(out, "defaults = --keywords error,warn,timeout --threads 4 --stats");
        out
    }
}
