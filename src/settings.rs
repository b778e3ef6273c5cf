use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
    sync::RwLock,
    time::Duration,
};

pub const ENV_DB_PATH: &str = "INTERVIEW_DB_PATH";
pub const ENV_JWT_SECRET: &str = "JWT_SECRET_KEY";
pub const ENV_JWT_ALGORITHM: &str = "JWT_ALGORITHM";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AuthSettings {
    pub jwt_secret: Option<String>,
    pub jwt_algorithm: String,
    /// Accept `token_<id>` credentials without a signature.
    pub allow_demo_tokens: bool,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            jwt_algorithm: "HS256".into(),
            allow_demo_tokens: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CaptureSettings {
    /// Time between frames; also the duration credited to each sample.
    pub interval_ms: u64,
    /// Upper bound for decoding and analyzing one frame.
    pub timeout_ms: u64,
}

impl CaptureSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            interval_ms: 2_000,
            timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub database_path: PathBuf,
    pub auth: AuthSettings,
    pub capture: CaptureSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("interviews.sqlite3"),
            auth: AuthSettings::default(),
            capture: CaptureSettings::default(),
        }
    }
}

impl Settings {
    /// Overlay values from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_DB_PATH).filter(|v| !v.is_empty()) {
            self.database_path = PathBuf::from(path);
        }
        if let Some(secret) = lookup(ENV_JWT_SECRET).filter(|v| !v.is_empty()) {
            self.auth.jwt_secret = Some(secret);
        }
        if let Some(algorithm) = lookup(ENV_JWT_ALGORITHM).filter(|v| !v.is_empty()) {
            self.auth.jwt_algorithm = algorithm;
        }
    }
}

/// Settings persisted as pretty JSON. A missing file means defaults.
/// Environment overrides are applied to what callers read, never written back.
pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<Settings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = read_settings(&path)?;

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> Settings {
        let mut settings = match self.data.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        settings.apply_env();
        settings
    }

    pub fn update_capture(&self, capture: CaptureSettings) -> Result<()> {
        let mut guard = match self.data.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.capture = capture;
        self.persist(&guard)
    }

    fn persist(&self, data: &Settings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

fn read_settings(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings from {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse settings in {}", path.display()))
}
