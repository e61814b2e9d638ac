//! Focused document selection for large multi-file tenders.
//!
//! Pulls out the passages that usually answer qualification questions
//! (technical and financial criteria, joint ventures, commercial clauses)
//! and puts them ahead of the raw files. When enough passages are found they
//! replace the files entirely.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tender_store::FileTexts;
use tracing::debug;

use crate::combine::{FILE_SEPARATOR, combine_file_texts};

/// Characters of context kept on each side of a criteria keyword.
pub const CONTEXT_SIZE: usize = 500;
/// Above this many files only the largest ones are kept.
pub const MAX_FILES_TO_PROCESS: usize = 5;
pub const TOP_FILES_TO_USE: usize = 5;
/// Separates the extracted passages from the raw files that follow them.
pub const CHUNK_SEPARATOR: &str = "\n\n==========\n\n";

const MIN_PARAGRAPH_CHARS: usize = 50;
const MIN_FILE_CHARS: usize = 100;
const MIN_SECTION_CHARS: usize = 20;
const DEDUP_PREFIX_CHARS: usize = 100;

/// Paragraph categories, in the order their passages are emitted.
const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "technical",
        &[
            "technical qualification",
            "technical criteria",
            "technical requirement",
            "similar work",
            "work experience",
            "project experience",
            "completion certificate",
            "work order",
            "technical capacity",
            "technical capability",
            "eligible works",
            "qualification requirement",
            "technical eligibility",
        ],
    ),
    (
        "financial",
        &[
            "turnover",
            "financial qualification",
            "financial criteria",
            "financial requirement",
            "annual turnover",
            "average annual turnover",
            "financial capacity",
            "financial capability",
            "net worth",
            "liquid asset",
            "solvency",
            "working capital",
            "financial statement",
            "balance sheet",
            "profit and loss",
            "financial position",
            "financial standing",
            "financial strength",
            "revenue",
        ],
    ),
    (
        "joint_venture",
        &[
            "joint venture",
            "jv ",
            "consortium",
            "jv criteria",
            "jv requirement",
            "lead member",
            "lead partner",
            "jv agreement",
            "jv formation",
        ],
    ),
    (
        "commercial_clauses",
        &[
            "earnest money",
            "emd",
            "bid security",
            "performance security",
            "security deposit",
            "retention money",
            "defect liability",
            "completion period",
        ],
    ),
];

/// Specific clauses searched across files, most common terms first.
const CRITERIA_TERMS: &[(&str, &[&str])] = &[
    (
        "turnover",
        &[
            "turnover",
            "annual turnover",
            "average annual turnover",
            "financial turnover",
            "revenue",
        ],
    ),
    (
        "emd_submission",
        &[
            "earnest money deposit",
            "emd",
            "bid security",
            "mode of emd",
            "emd submission",
        ],
    ),
    (
        "completion_period",
        &[
            "completion period",
            "contract period",
            "time of completion",
            "project timeline",
        ],
    ),
    (
        "performance_security",
        &[
            "performance security",
            "performance guarantee",
            "performance bond",
        ],
    ),
    (
        "security_deposit",
        &[
            "security deposit",
            "retention money",
            "retention amount",
            "withheld amount",
        ],
    ),
    (
        "defect_liability",
        &[
            "defect liability",
            "defect liability period",
            "maintenance period",
            "warranty period",
        ],
    ),
    (
        "mobilization_advance",
        &[
            "mobilization advance",
            "mobilisation advance",
            "advance payment",
        ],
    ),
    (
        "solvency_working_capital",
        &[
            "solvency",
            "working capital",
            "bank solvency",
            "credit facility",
        ],
    ),
    (
        "liquid_asset",
        &["liquid asset", "cash flow", "liquidity", "liquid fund"],
    ),
    (
        "price_variation",
        &[
            "price variation",
            "price adjustment",
            "escalation clause",
            "price escalation",
        ],
    ),
    (
        "incentive_bonus",
        &[
            "incentive",
            "bonus clause",
            "early completion bonus",
            "performance bonus",
        ],
    ),
];

static PARAGRAPH_SPLIT: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").ok());

/// Focused document block; single strings and missing text behave as in
/// [`combine_file_texts`].
pub fn focused_text(texts: &FileTexts) -> String {
    match texts {
        FileTexts::PerFile(files) => select(files),
        other => combine_file_texts(other),
    }
}

fn select(files: &[(String, String)]) -> String {
    let mut relevant = categorized_paragraphs(files);
    relevant.extend(criteria_sections(files));

    let mut seen = HashSet::new();
    let unique: Vec<&str> = relevant
        .into_iter()
        .filter(|chunk| seen.insert(*chunk))
        .collect();

    if unique.len() >= TOP_FILES_TO_USE {
        debug!(chunks = unique.len(), "using criteria passages only");
        return unique[..unique.len().min(TOP_FILES_TO_USE * 2)].join(FILE_SEPARATOR);
    }

    let mut selected: Vec<&str> = files.iter().map(|(_, text)| text.as_str()).collect();
    if selected.len() > MAX_FILES_TO_PROCESS {
        // stable: equal sizes keep stored order
        selected.sort_by_key(|text| std::cmp::Reverse(text.chars().count()));
        selected.truncate(TOP_FILES_TO_USE);
    }
    debug!(
        chunks = unique.len(),
        files = selected.len(),
        "supplementing passages with files"
    );

    let body = selected.join(FILE_SEPARATOR);
    if unique.is_empty() {
        body
    } else {
        format!("{}{CHUNK_SEPARATOR}{body}", unique.join(FILE_SEPARATOR))
    }
}

/// Paragraphs that mention any category keyword, grouped by category.
fn categorized_paragraphs(files: &[(String, String)]) -> Vec<&str> {
    let mut tagged: Vec<(&str, Vec<&'static str>)> = Vec::new();
    for (_, content) in files {
        if char_len(content.trim()) < MIN_FILE_CHARS {
            continue;
        }
        for paragraph in split_paragraphs(content) {
            if char_len(paragraph) < MIN_PARAGRAPH_CHARS {
                continue;
            }
            tagged.push((paragraph, categories_of(paragraph)));
        }
    }

    CATEGORY_KEYWORDS
        .iter()
        .flat_map(|(category, _)| {
            tagged
                .iter()
                .filter(move |(_, cats)| cats.contains(category))
                .map(|(p, _)| *p)
        })
        .collect()
}

/// Keyword windows around specific clauses, de-duplicated per clause.
fn criteria_sections(files: &[(String, String)]) -> Vec<&str> {
    let valid: Vec<(&str, String)> = files
        .iter()
        .filter(|(_, text)| char_len(text.trim()) > MIN_FILE_CHARS)
        .map(|(_, text)| (text.as_str(), text.to_ascii_lowercase()))
        .collect();
    if valid.is_empty() {
        return Vec::new();
    }

    let mut out = Vec::new();
    for (_, terms) in CRITERIA_TERMS {
        let mut seen_keys = HashSet::new();
        for term in *terms {
            for (text, lower) in &valid {
                let Some(section) = section_around(*text, lower, term) else {
                    continue;
                };
                if char_len(section) <= MIN_SECTION_CHARS {
                    continue;
                }
                if seen_keys.insert(dedup_key(section)) {
                    out.push(section);
                }
            }
        }
    }
    out
}

fn categories_of(paragraph: &str) -> Vec<&'static str> {
    if char_len(paragraph.trim()) < 10 {
        return Vec::new();
    }
    let lower = paragraph.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(category, _)| *category)
        .collect()
}

fn split_paragraphs(content: &str) -> Vec<&str> {
    let parts: Vec<&str> = match PARAGRAPH_SPLIT.as_ref() {
        Some(re) => re.split(content).collect(),
        None => vec![content],
    };
    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// First occurrence of `keyword` with [`CONTEXT_SIZE`] characters either side,
/// widened to sentence boundaries. `lower` is `text` ASCII-lowercased, so byte
/// offsets line up.
fn section_around<'a>(text: &'a str, lower: &str, keyword: &str) -> Option<&'a str> {
    let pos = lower.find(keyword)?;
    let start = chars_back(text, pos, CONTEXT_SIZE);
    let end = chars_forward(text, pos + keyword.len(), CONTEXT_SIZE);
    let start = sentence_start(text, start);
    let end = sentence_end(text, end);
    Some(text[start..end].trim())
}

fn chars_back(text: &str, pos: usize, n: usize) -> usize {
    text[..pos]
        .char_indices()
        .rev()
        .take(n)
        .last()
        .map_or(pos, |(i, _)| i)
}

fn chars_forward(text: &str, pos: usize, n: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(n)
        .map_or(text.len(), |(i, _)| pos + i)
}

/// Start of the sentence containing `pos`; the text start when there is none.
fn sentence_start(text: &str, pos: usize) -> usize {
    if pos == 0 {
        return 0;
    }
    let head = &text[..pos];
    [". ", ".\n", "\n\n"]
        .iter()
        .filter_map(|b| head.rfind(b))
        .max()
        .map_or(0, |b| b + 2)
}

/// Just past the terminator of the sentence at `pos`; `pos` if none follows.
fn sentence_end(text: &str, pos: usize) -> usize {
    if pos >= text.len() {
        return pos;
    }
    let tail = &text[pos..];
    [". ", ".\n", "\n\n"]
        .iter()
        .filter_map(|b| tail.find(b))
        .min()
        .map_or(pos, |b| pos + b + 1)
}

fn dedup_key(section: &str) -> String {
    section
        .chars()
        .take(DEDUP_PREFIX_CHARS)
        .collect::<String>()
        .to_lowercase()
        .trim()
        .to_string()
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TURNOVER: &str =
        "The bidder shall have an average annual turnover of INR 5 crore in the last three years.";
    const EMD: &str =
        "Earnest money deposit of INR 2 lakh shall be submitted through online mode only.";
    const JOINT: &str =
        "The joint venture shall have a lead member holding at least fifty one percent share.";
    const WORK: &str =
        "Similar work experience of three completed projects of the same nature is required.";
    const SECURITY: &str =
        "Performance security of five percent of the contract value is payable on award.";
    const SITE: &str =
        "The site is located near the northern railway station and is accessible by road.";

    fn files(entries: Vec<(&str, String)>) -> Vec<(String, String)> {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn paragraphs_split_on_blank_lines() {
        assert_eq!(split_paragraphs("a\n \n b\n\n\nc\nd"), vec!["a", "b", "c\nd"]);
    }

    #[test]
    fn sentence_boundaries() {
        assert_eq!(sentence_start("One. Two three", 8), 5);
        assert_eq!(sentence_start("no boundary here", 9), 0);
        assert_eq!(sentence_end("One two. Three", 2), 8);
        assert_eq!(sentence_end("no boundary", 3), 3);
    }

    #[test]
    fn window_widens_to_surrounding_sentences_only() {
        let text = format!(
            "{}. {}. The turnover must exceed five crore. {}. {}",
            "a".repeat(600),
            "b".repeat(600),
            "c".repeat(600),
            "d".repeat(600)
        );
        let lower = text.to_ascii_lowercase();
        let section = section_around(&text, &lower, "turnover").unwrap();
        assert!(section.starts_with('b'));
        assert!(section.ends_with("c."));
        assert!(!section.contains('a'));
    }

    #[test]
    fn enough_passages_replace_files() {
        let doc = [TURNOVER, EMD, JOINT, WORK, SECURITY, SITE].join("\n\n");
        let out = focused_text(&FileTexts::PerFile(files(vec![("a.pdf", doc)])));
        // technical first, then financial
        assert!(out.starts_with(&format!("{WORK}{FILE_SEPARATOR}{TURNOVER}")));
        assert!(!out.contains(CHUNK_SEPARATOR));
    }

    #[test]
    fn few_passages_are_prepended_to_largest_files() {
        let f0 = format!("{TURNOVER}\n\n{SITE}");
        let z = |n: usize| "z".repeat(n);
        let input = files(vec![
            ("f0", f0.clone()),
            ("f1", z(400)),
            ("f2", z(10)),
            ("f3", z(350)),
            ("f4", z(300)),
            ("f5", z(260)),
            ("f6", z(240)),
        ]);
        let out = focused_text(&FileTexts::PerFile(input));

        let expected = format!(
            "{TURNOVER}{FILE_SEPARATOR}{f0}{CHUNK_SEPARATOR}{}",
            [z(400), z(350), z(300), z(260), z(240)].join(FILE_SEPARATOR)
        );
        assert_eq!(out, expected);
    }

    #[test]
    fn no_passages_keeps_all_files_in_order() {
        let input = files(vec![("b", SITE.to_string()), ("a", "short".to_string())]);
        assert_eq!(
            focused_text(&FileTexts::PerFile(input)),
            format!("{SITE}{FILE_SEPARATOR}short")
        );
    }

    #[test]
    fn single_text_is_untouched() {
        assert_eq!(focused_text(&FileTexts::Single("S".into())), "S");
        assert_eq!(focused_text(&FileTexts::Missing), "");
    }
}
