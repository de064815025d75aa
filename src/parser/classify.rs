use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Job-title vocabulary, matched as lowercase substrings.
pub const DEFAULT_DESIGNATION_KEYWORDS: &[&str] = &[
    "manager", "managing", "director", "engineer", "developer", "head", "lead",
    "officer", "chief", "ceo", "cfo", "founder", "president", "vp", "consultant",
    "analyst", "architect", "specialist", "executive", "associate", "owner",
    "administrator", "designer", "coordinator", "advisor", "adviser",
    "principal", "senior", "recruiter", "scientist", "strategist", "supervisor",
    "representative", "researcher", "professor", "accountant", "attorney",
    "chairman", "secretary", "trainee",
];

/// Organisational-suffix vocabulary, matched as lowercase substrings.
pub const DEFAULT_COMPANY_INDICATORS: &[&str] = &[
    " inc", "inc.", "ltd", "llc", "llp", "corp", "company", "technologies",
    "technology", "solutions", "services", "systems", "group", "pvt", "limited",
    "consulting", "labs", "software", "enterprises", "industries",
    "international", "global", "partners", "bank of", "banking", "university",
    "institute", "holdings", "ventures", "capital", "gmbh", "plc", "foundation", "agency",
    "studio", "infotech", "digital", "networks",
];

/// Lines this short are never designations, whatever they contain.
const MIN_DESIGNATION_CHARS: usize = 4;

/// The two keyword sets that drive classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keywords {
    pub designation: Vec<String>,
    pub company: Vec<String>,
}

impl Default for Keywords {
    fn default() -> Self {
        Keywords {
            designation: DEFAULT_DESIGNATION_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            company: DEFAULT_COMPANY_INDICATORS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Decides whether a cleaned line reads as a job title or an organisation.
///
/// Built once per run and shared read-only between worker threads.
#[derive(Debug, Clone)]
pub struct Classifier {
    designation_keywords: Vec<String>,
    company_indicators: Vec<String>,
}

impl Default for Classifier {
    fn default() -> Self {
        Classifier::new(Keywords::default())
    }
}

impl Classifier {
    /// Lowercases the keyword sets and drops blank or repeated entries.
    /// A blank entry would match every line.
    pub fn new(keywords: Keywords) -> Self {
        Classifier {
            designation_keywords: prepare(keywords.designation),
            company_indicators: prepare(keywords.company),
        }
    }

    pub fn designation_keywords(&self) -> &[String] {
        &self.designation_keywords
    }

    pub fn company_indicators(&self) -> &[String] {
        &self.company_indicators
    }

    /// Substring match against the title vocabulary, so "Engineering Lead"
    /// and "Leadership Coach" both qualify.
    pub fn is_designation(&self, line: &str) -> bool {
        if line.chars().count() < MIN_DESIGNATION_CHARS {
            return false;
        }
        let lower = line.to_lowercase();
        self.designation_keywords
            .iter()
            .any(|kw| lower.contains(kw.as_str()))
    }

    pub fn has_company_indicator(&self, line: &str) -> bool {
        let lower = line.to_lowercase();
        self.company_indicators
            .iter()
            .any(|ind| lower.contains(ind.as_str()))
    }

    /// Whether a line looks like an organisation name.
    ///
    /// Short runs of title-case words ("John Doe") are treated as personal
    /// names before anything else is checked. Past that, an indicator
    /// substring wins, then a capitalisation-density fallback for longer
    /// lines that are not themselves job titles.
    pub fn is_company_likely(&self, line: &str) -> bool {
        let words: Vec<&str> = line.split_whitespace().collect();

        if words.len() <= 2
            && words
                .iter()
                .filter(|w| is_alphabetic_word(w))
                .all(|w| is_title_case(w))
        {
            return false;
        }

        if self.has_company_indicator(line) {
            return true;
        }

        if words.len() <= 2 || !starts_uppercase(words[0]) {
            return false;
        }

        let capitalized = words
            .iter()
            .filter(|w| starts_uppercase(w) || is_title_case(w))
            .count();
        capitalized * 2 >= words.len() && !self.is_designation(line)
    }
}

fn prepare(keywords: Vec<String>) -> Vec<String> {
    keywords
        .into_iter()
        .map(|k| k.to_lowercase())
        .filter(|k| !k.trim().is_empty())
        .unique()
        .collect()
}

fn starts_uppercase(word: &str) -> bool {
    word.chars().next().is_some_and(|c| c.is_uppercase())
}

fn is_alphabetic_word(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| c.is_alphabetic())
}

/// Uppercase letters only after uncased characters, lowercase letters only
/// after cased ones, and at least one cased letter ("O'Neil", "Acme").
fn is_title_case(word: &str) -> bool {
    let mut prev_cased = false;
    let mut any_cased = false;
    for c in word.chars() {
        if c.is_uppercase() {
            if prev_cased {
                return false;
            }
            prev_cased = true;
            any_cased = true;
        } else if c.is_lowercase() {
            if !prev_cased {
                return false;
            }
            prev_cased = true;
            any_cased = true;
        } else {
            prev_cased = false;
        }
    }
    any_cased
}
