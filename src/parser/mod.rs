pub mod classify;
pub mod normalize;
pub mod segment;

use serde::{Deserialize, Serialize};

use classify::Classifier;

/// One profile card. Column names match the output table header.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Designation")]
    pub designation: String,
    #[serde(rename = "Company")]
    pub company: String,
}

/// Two-pass pipeline: raw OCR text → cleaned lines → records.
pub fn process_page(classifier: &Classifier, raw: &str) -> Vec<Record> {
    let lines = normalize::clean_lines(raw);
    segment::segment(classifier, &lines)
}

// ── Tests ──
