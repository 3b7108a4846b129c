//! Cross-domain tagging between coding and productivity knowledge.

use mnemos_core::Record;
use serde::{Deserialize, Serialize};

use crate::ranking::ScoredRecord;

/// Keyword families and the tags they imply. Matching is on lowercased
/// substrings, so `"deploy"` also matches `"redeployed"`.
const KEYWORD_TAGS: &[(&[&str], &[&str])] = &[
    (&["docker", "deploy"], &["@computer context", "deployment task"]),
    (&["tdd", "test"], &["testing methodology", "quality practice"]),
    (&["python"], &["python project", "@computer development"]),
    (&["task", "project"], &["gtd workflow"]),
    (&["review"], &["retrospective", "continuous improvement"]),
];

const PRODUCTIVITY_WORDS: [&str; 4] = ["task", "project", "review", "weekly"];
const CODING_WORDS: [&str; 4] = ["code", "python", "docker", "test"];

/// Knowledge domain a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Coding,
    Productivity,
    General,
}

impl Domain {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Coding => "coding",
            Self::Productivity => "productivity",
            Self::General => "general",
        }
    }
}

/// A record whose cross-reference tags matched a topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossDomainLink {
    pub scored: ScoredRecord,
    pub matched_tags: Vec<String>,
    pub domains: Vec<Domain>,
}

/// Tags for `text`, in family order, without duplicates.
pub fn detect_cross_references(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut tags: Vec<String> = Vec::new();
    for (keywords, family_tags) in KEYWORD_TAGS {
        if keywords.iter().any(|k| lowered.contains(k)) {
            for tag in family_tags.iter() {
                if !tags.iter().any(|t| t == tag) {
                    tags.push((*tag).to_string());
                }
            }
        }
    }
    tags
}

fn searchable_text(record: &Record) -> String {
    let mut text = record.content.to_lowercase();
    if let Some(title) = &record.title {
        text.push(' ');
        text.push_str(&title.to_lowercase());
    }
    for tag in &record.metadata.cross_references {
        text.push(' ');
        text.push_str(&tag.to_lowercase());
    }
    text
}

/// Domains of a record from its source tag and content. Never empty.
pub fn identify_domains(record: &Record) -> Vec<Domain> {
    let mut domains = Vec::new();
    let source = record.source.to_lowercase();
    if source.contains("claude_code") {
        domains.push(Domain::Coding);
    }
    if source.contains("gtd") {
        domains.push(Domain::Productivity);
    }

    let text = searchable_text(record);
    if PRODUCTIVITY_WORDS.iter().any(|w| text.contains(w))
        && !domains.contains(&Domain::Productivity)
    {
        domains.push(Domain::Productivity);
    }
    if CODING_WORDS.iter().any(|w| text.contains(w)) && !domains.contains(&Domain::Coding) {
        domains.push(Domain::Coding);
    }

    if domains.is_empty() {
        domains.push(Domain::General);
    }
    domains
}

/// Tags matching `topic` exactly or by substring, ignoring case.
pub fn matching_tags(tags: &[String], topic: &str) -> Vec<String> {
    let topic = topic.trim().to_lowercase();
    if topic.is_empty() {
        return Vec::new();
    }
    tags.iter()
        .filter(|tag| {
            let tag = tag.to_lowercase();
            tag == topic || tag.contains(&topic)
        })
        .cloned()
        .collect()
}
