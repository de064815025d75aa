use super::classify::Classifier;
use super::normalize::Line;
use super::Record;

/// Line starts no record.
const SKIP: usize = 1;
/// Designation with nothing usable after it.
const DESIGNATION_ONLY: usize = 1;
/// Designation followed by its company line.
const DESIGNATION_AND_COMPANY: usize = 2;
/// Two merged designation lines plus the company slot after them,
/// whether or not that slot was taken.
const MERGED_DESIGNATION: usize = 3;

#[derive(Debug)]
enum State {
    Scanning,
    AfterDesignation { at: usize },
    AfterMergedDesignation { at: usize, designation: String },
}

/// Group cleaned lines into (name, designation, company) records.
///
/// Single forward pointer, never moves back. A record starts at every
/// designation line the scan lands on; the name is only ever the line right
/// before it and the company only ever the line right after the designation.
pub fn segment(classifier: &Classifier, lines: &[Line]) -> Vec<Record> {
    let mut records = Vec::new();
    let mut i = 0;
    let mut state = State::Scanning;

    loop {
        state = match state {
            State::Scanning => {
                let Some(line) = lines.get(i) else {
                    break;
                };
                if classifier.is_designation(&line.text) {
                    State::AfterDesignation { at: i }
                } else {
                    i += SKIP;
                    State::Scanning
                }
            }

            State::AfterDesignation { at } => {
                let designation = &lines[at].text;
                match lines.get(at + 1) {
                    // "Product Owner" / "Practice Head" on two lines
                    Some(next)
                        if classifier.is_designation(&next.text)
                            && !classifier.is_company_likely(&next.text) =>
                    {
                        State::AfterMergedDesignation {
                            at,
                            designation: format!("{} {}", designation, next.text),
                        }
                    }
                    Some(next) if is_company_candidate(classifier, &next.text) => {
                        records.push(Record {
                            name: name_before(classifier, lines, at),
                            designation: designation.clone(),
                            company: next.text.clone(),
                        });
                        i = at + DESIGNATION_AND_COMPANY;
                        State::Scanning
                    }
                    _ => {
                        records.push(Record {
                            name: name_before(classifier, lines, at),
                            designation: designation.clone(),
                            company: String::new(),
                        });
                        i = at + DESIGNATION_ONLY;
                        State::Scanning
                    }
                }
            }

            State::AfterMergedDesignation { at, designation } => {
                let company = lines
                    .get(at + 2)
                    .filter(|l| is_company_candidate(classifier, &l.text))
                    .map(|l| l.text.clone())
                    .unwrap_or_default();
                records.push(Record {
                    name: name_before(classifier, lines, at),
                    designation,
                    company,
                });
                i = at + MERGED_DESIGNATION;
                State::Scanning
            }
        };
    }

    records
}

/// After a title, almost anything that is not another title is the employer.
fn is_company_candidate(classifier: &Classifier, text: &str) -> bool {
    classifier.is_company_likely(text) || !classifier.is_designation(text)
}

fn name_before(classifier: &Classifier, lines: &[Line], at: usize) -> String {
    at.checked_sub(1)
        .and_then(|prev| lines.get(prev))
        .filter(|l| {
            !classifier.is_designation(&l.text) && !classifier.has_company_indicator(&l.text)
        })
        .map(|l| l.text.clone())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(texts: &[&str]) -> Vec<Line> {
        texts
            .iter()
            .enumerate()
            .map(|(index, t)| Line {
                index,
                text: t.to_string(),
            })
            .collect()
    }

    fn run(texts: &[&str]) -> Vec<Record> {
        segment(&Classifier::default(), &lines(texts))
    }

    fn record(name: &str, designation: &str, company: &str) -> Record {
        Record {
            name: name.into(),
            designation: designation.into(),
            company: company.into(),
        }
    }

    #[test]
    fn name_designation_company() {
        let records = run(&["John Smith", "Senior Engineer", "Acme Corp Inc."]);
        assert_eq!(records, vec![record("John Smith", "Senior Engineer", "Acme Corp Inc.")]);
    }

    #[test]
    fn two_part_designation_is_merged() {
        let records = run(&["Jane Doe", "Product Owner", "Practice Head", "Globex Solutions Ltd"]);
        assert_eq!(
            records,
            vec![record("Jane Doe", "Product Owner Practice Head", "Globex Solutions Ltd")]
        );
    }

    #[test]
    fn lone_designation() {
        assert_eq!(run(&["Senior Manager"]), vec![record("", "Senior Manager", "")]);
    }

    #[test]
    fn no_designation_no_records() {
        assert!(run(&["Photos from the weekend", "Beach cleanup crew"]).is_empty());
        assert!(run(&[]).is_empty());
    }

    #[test]
    fn designation_at_end_keeps_name() {
        assert_eq!(
            run(&["Welcome", "Bob Stone", "Director"]),
            vec![record("Bob Stone", "Director", "")]
        );
    }

    #[test]
    fn company_like_designation_is_not_merged() {
        let records = run(&["Ann Lee", "Senior Consultant", "Lead Generation Solutions"]);
        assert_eq!(
            records,
            vec![record("Ann Lee", "Senior Consultant", "Lead Generation Solutions")]
        );
    }

    #[test]
    fn two_word_firm_after_title_is_the_company() {
        let records = run(&["Ann Lee", "Senior Associate", "Accel Partners"]);
        assert_eq!(records, vec![record("Ann Lee", "Senior Associate", "Accel Partners")]);
    }

    #[test]
    fn surname_ending_in_banks_is_kept_as_name() {
        assert_eq!(
            run(&["Vincent Banks", "Senior Engineer", "Acme Corp Inc."]),
            vec![record("Vincent Banks", "Senior Engineer", "Acme Corp Inc.")]
        );
        assert_eq!(
            run(&["Tom Fairbanks", "Director", "Bank of America"]),
            vec![record("Tom Fairbanks", "Director", "Bank of America")]
        );
    }

    #[test]
    fn merged_designation_without_company() {
        assert_eq!(
            run(&["Jane Doe", "Product Owner", "Practice Head"]),
            vec![record("Jane Doe", "Product Owner Practice Head", "")]
        );
    }

    #[test]
    fn merged_jump_skips_unclaimed_slot() {
        // "Senior Manager" is neither company-like nor a non-designation, so it
        // is not the company, and the three-line jump steps over it.
        let records = run(&[
            "Jane Doe",
            "Product Owner",
            "Practice Head",
            "Senior Manager",
            "Bob Ray",
        ]);
        assert_eq!(records, vec![record("Jane Doe", "Product Owner Practice Head", "")]);
    }

    #[test]
    fn name_rejected_when_it_looks_like_a_company() {
        let records = run(&["Initech Software", "QA Lead", "Initech Software"]);
        assert_eq!(records, vec![record("", "QA Lead", "Initech Software")]);
    }

    #[test]
    fn name_is_only_the_previous_line() {
        let records = run(&["Dr", "Jane", "Doe", "Senior Manager", "Globex"]);
        assert_eq!(records, vec![record("Doe", "Senior Manager", "Globex")]);
    }

    #[test]
    fn consecutive_cards_in_order() {
        let records = run(&[
            "John Smith",
            "Senior Engineer",
            "Acme Corp Inc.",
            "Jane Doe",
            "Product Owner",
            "Practice Head",
            "Globex Solutions Ltd",
            "Bob Stone",
            "Director",
            "Initech",
        ]);
        assert_eq!(
            records,
            vec![
                record("John Smith", "Senior Engineer", "Acme Corp Inc."),
                record("Jane Doe", "Product Owner Practice Head", "Globex Solutions Ltd"),
                record("Bob Stone", "Director", "Initech"),
            ]
        );
    }

    #[test]
    fn designations_always_carry_a_keyword() {
        let classifier = Classifier::default();
        let md = std::fs::read_to_string("tests/fixtures/noisy_cards.txt").unwrap();
        let cleaned = crate::parser::normalize::clean_lines(&md);
        let records = segment(&classifier, &cleaned);
        assert!(!records.is_empty());
        for r in &records {
            assert!(r.designation.chars().count() > 3);
            let lower = r.designation.to_lowercase();
            assert!(
                classifier
                    .designation_keywords()
                    .iter()
                    .any(|kw| lower.contains(kw.as_str())),
                "no keyword in {:?}",
                r.designation
            );
        }
    }

    #[test]
    fn records_follow_line_order() {
        let classifier = Classifier::default();
        let md = std::fs::read_to_string("tests/fixtures/speaker_grid.txt").unwrap();
        let cleaned = crate::parser::normalize::clean_lines(&md);
        let records = segment(&classifier, &cleaned);
        let positions: Vec<usize> = records
            .iter()
            .map(|r| {
                let first = r.designation.split(' ').next().unwrap_or_default();
                cleaned
                    .iter()
                    .position(|l| l.text.starts_with(first) && classifier.is_designation(&l.text))
                    .unwrap()
            })
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{:?}", positions);
    }
}
