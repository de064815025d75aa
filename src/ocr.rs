use std::path::Path;
use std::process::Command;

use crate::config::Settings;
use crate::error::OcrError;

/// Source of raw page text for one input file.
/// Implementations are shared across worker threads.
pub trait OcrProvider: Send + Sync {
    fn extract_text(&self, path: &Path) -> Result<String, OcrError>;
}

/// Shells out to the `tesseract` binary: `<cmd> <image> stdout -l <lang>`.
pub struct TesseractCli {
    command: String,
    lang: String,
}

impl TesseractCli {
    pub fn new(command: impl Into<String>, lang: impl Into<String>) -> Self {
        TesseractCli {
            command: command.into(),
            lang: lang.into(),
        }
    }
}

impl OcrProvider for TesseractCli {
    fn extract_text(&self, path: &Path) -> Result<String, OcrError> {
        let output = Command::new(&self.command)
            .arg(path)
            .arg("stdout")
            .arg("-l")
            .arg(&self.lang)
            .output()
            .map_err(|source| OcrError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(OcrError::Failed {
                command: self.command.clone(),
                path: path.to_path_buf(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| OcrError::Encoding(path.to_path_buf()))
    }
}

/// Reads text that was already extracted, one file per page.
pub struct TextFileProvider;

impl OcrProvider for TextFileProvider {
    fn extract_text(&self, path: &Path) -> Result<String, OcrError> {
        std::fs::read_to_string(path).map_err(|source| OcrError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// In-process libtesseract, for machines without the CLI on PATH.
#[cfg(feature = "native-ocr")]
pub struct NativeTesseract {
    lang: String,
}

#[cfg(feature = "native-ocr")]
impl NativeTesseract {
    pub fn new(lang: impl Into<String>) -> Self {
        NativeTesseract { lang: lang.into() }
    }
}

#[cfg(feature = "native-ocr")]
impl OcrProvider for NativeTesseract {
    fn extract_text(&self, path: &Path) -> Result<String, OcrError> {
        let native = |message: String| OcrError::Native {
            path: path.to_path_buf(),
            message,
        };
        let path_str = path
            .to_str()
            .ok_or_else(|| native("path is not valid UTF-8".into()))?;

        let mut tess = tesseract::Tesseract::new(None, Some(&self.lang))
            .map_err(|e| native(format!("{e:?}")))?
            .set_image(path_str)
            .map_err(|e| native(format!("{e:?}")))?;

        tess.get_text().map_err(|e| native(format!("{e:?}")))
    }
}

/// Image OCR backend for `run`, chosen at build time.
pub fn image_provider(settings: &Settings) -> Box<dyn OcrProvider> {
    #[cfg(feature = "native-ocr")]
    {
        Box::new(NativeTesseract::new(settings.ocr_lang.clone()))
    }
    #[cfg(not(feature = "native-ocr"))]
    {
        Box::new(TesseractCli::new(
            settings.tesseract_cmd.clone(),
            settings.ocr_lang.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_provider_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.txt");
        std::fs::write(&path, "John Smith\nSenior Engineer\n").unwrap();
        let text = TextFileProvider.extract_text(&path).unwrap();
        assert_eq!(text, "John Smith\nSenior Engineer\n");
    }

    #[test]
    fn text_provider_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = TextFileProvider
            .extract_text(&dir.path().join("missing.txt"))
            .unwrap_err();
        assert!(matches!(err, OcrError::Io { .. }));
    }

    #[test]
    fn missing_tesseract_binary_is_a_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("card.png");
        std::fs::write(&path, b"not really a png").unwrap();
        let cli = TesseractCli::new("profile-extract-no-such-ocr-binary", "eng");
        let err = cli.extract_text(&path).unwrap_err();
        assert!(matches!(err, OcrError::Spawn { .. }), "{err}");
    }
}
