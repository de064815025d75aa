//! Layered settings: built-in defaults, optional settings file, environment.

use std::path::Path;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::SettingsError;
use crate::parser::classify::{Keywords, DEFAULT_COMPANY_INDICATORS, DEFAULT_DESIGNATION_KEYWORDS};

const SETTINGS_FILE: &str = "profile_extract";
const ENV_PREFIX: &str = "PROFILE_EXTRACT";
const LIST_KEYS: &[&str] = &["designation_keywords", "company_indicators", "image_extensions"];
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tif", "tiff", "webp"];

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub designation_keywords: Vec<String>,
    pub company_indicators: Vec<String>,
    pub image_extensions: Vec<String>,
    pub workers: usize,
    pub tesseract_cmd: String,
    pub ocr_lang: String,
}

impl Settings {
    pub fn keywords(&self) -> Keywords {
        Keywords {
            designation: self.designation_keywords.clone(),
            company: self.company_indicators.clone(),
        }
    }
}

/// Load settings. An explicit `path` must exist; otherwise a
/// `profile_extract.{toml,json,yaml,..}` in the working directory is used
/// when present.
pub fn load(path: Option<&Path>) -> Result<Settings, SettingsError> {
    let file = match path {
        Some(p) => File::from(p).required(true),
        None => File::with_name(SETTINGS_FILE).required(false),
    };

    let env = LIST_KEYS.iter().fold(
        Environment::with_prefix(ENV_PREFIX)
            .try_parsing(true)
            .list_separator(","),
        |env, key| env.with_list_parse_key(key),
    );

    let settings: Settings = Config::builder()
        .set_default("designation_keywords", to_strings(DEFAULT_DESIGNATION_KEYWORDS))?
        .set_default("company_indicators", to_strings(DEFAULT_COMPANY_INDICATORS))?
        .set_default("image_extensions", to_strings(IMAGE_EXTENSIONS))?
        .set_default("workers", default_workers() as i64)?
        .set_default("tesseract_cmd", "tesseract")?
        .set_default("ocr_lang", "eng")?
        .add_source(file)
        .add_source(env)
        .build()?
        .try_deserialize()?;

    validate(&settings)?;
    Ok(settings)
}

fn validate(settings: &Settings) -> Result<(), SettingsError> {
    if settings.workers == 0 {
        return Err(SettingsError::Invalid {
            key: "workers",
            reason: "must be at least 1".into(),
        });
    }
    if settings.designation_keywords.iter().all(|k| k.trim().is_empty()) {
        return Err(SettingsError::Invalid {
            key: "designation_keywords",
            reason: "at least one keyword is required".into(),
        });
    }
    if settings.tesseract_cmd.trim().is_empty() {
        return Err(SettingsError::Invalid {
            key: "tesseract_cmd",
            reason: "must not be empty".into(),
        });
    }
    Ok(())
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
