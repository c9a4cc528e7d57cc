// src/services/classifier.rs
use std::sync::LazyLock;

use rand::RngCore;
use rand::seq::SliceRandom;
use regex::Regex;

pub const GREETING_WORDS: [&str; 5] = ["hello", "hi", "hey", "greetings", "howdy"];

pub const GREETING_REPLIES: [&str; 3] = [
    "Hi there! How can I help with your DIY project today?",
    "Hey! What DIY project are you working on?",
    "Hey! Looking for DIY advice? I'm here to help!",
];

pub const OFF_TOPIC_REPLY: &str = "I'm designed to help specifically with DIY projects and home improvements. Could you ask something related to building, making, fixing, or creating?";

const CANNED_RESPONSES: [(&str, &str); 5] = [
    (
        "how can you help",
        "I can help you with:\n\n1. Step-by-step project instructions\n2. Tool recommendations\n3. Material lists\n4. Safety tips\n5. Troubleshooting advice\n\nWhat project are you working on?",
    ),
    (
        "what can you do",
        "I'm your DIY expert! I can guide you through:\n\n- Home improvements\n- Crafts and decor\n- Furniture building\n- Repairs and maintenance\n- Woodworking projects\n\nJust ask about any DIY project you have in mind!",
    ),
    (
        "what projects",
        "I can help with all kinds of DIY projects:\n\n- **Home repairs**: Fixing leaks, patching walls, electrical work\n- **Furniture**: Building or refinishing pieces\n- **Crafts**: Decorations, gifts, upcycling\n- **Gardening**: Planters, irrigation, landscaping\n- **Electronics**: Basic circuits, smart home setups\n\nWhat are you interested in making?",
    ),
    (
        "tools",
        "I can help with tools in several ways:\n\n1. Recommend the right tools for specific projects\n2. Explain safe tool usage techniques\n3. Suggest budget-friendly alternatives\n4. Provide tool maintenance tips\n\n**Safety reminder**: Always wear appropriate protective equipment!",
    ),
    (
        "materials",
        "For materials guidance, I can:\n\n- Help choose optimal materials for durability and function\n- Estimate quantities needed for your project\n- Suggest cost-effective alternatives\n- Explain proper material handling\n- Recommend where to source quality supplies",
    ),
];

const DIY_KEYWORDS: [&str; 40] = [
    "diy", "project", "repair", "install", "renovat", "woodwork", "furniture", "shelf",
    "cabinet", "drill", "hammer", "screw", "nail", "sand", "paint", "varnish", "stain",
    "glue", "plank", "lumber", "plywood", "wood", "tile", "grout", "caulk", "plumbing",
    "pipe", "faucet", "leak", "wiring", "circuit", "solder", "garden", "planter", "craft",
    "upcycl", "decor", "insulat", "drywall", "workbench",
];

static TOPIC_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(how to|make|build|create|fix)").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Greeting,
    CommonQuestion,
    OffTopic,
    OnTopic,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Greeting => "greeting",
            MessageKind::CommonQuestion => "common_question",
            MessageKind::OffTopic => "off_topic",
            MessageKind::OnTopic => "on_topic",
        }
    }
}

/// Outcome of classifying one utterance. Only `OnTopic` lacks a local reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Greeting(String),
    CommonQuestion(String),
    OffTopic(String),
    OnTopic,
}

impl Classification {
    pub fn kind(&self) -> MessageKind {
        match self {
            Classification::Greeting(_) => MessageKind::Greeting,
            Classification::CommonQuestion(_) => MessageKind::CommonQuestion,
            Classification::OffTopic(_) => MessageKind::OffTopic,
            Classification::OnTopic => MessageKind::OnTopic,
        }
    }

    pub fn response(&self) -> Option<&str> {
        match self {
            Classification::Greeting(r)
            | Classification::CommonQuestion(r)
            | Classification::OffTopic(r) => Some(r),
            Classification::OnTopic => None,
        }
    }

    pub fn into_response(self) -> Option<String> {
        match self {
            Classification::Greeting(r)
            | Classification::CommonQuestion(r)
            | Classification::OffTopic(r) => Some(r),
            Classification::OnTopic => None,
        }
    }
}

/// Trigger phrases mapped to fixed replies. Lookup returns the first trigger
/// in insertion order, so the table is a list rather than a map.
#[derive(Debug, Clone, Default)]
pub struct CannedResponseTable {
    entries: Vec<(String, String)>,
}

impl CannedResponseTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, trigger: impl Into<String>, response: impl Into<String>) -> Self {
        self.entries
            .push((trigger.into().to_lowercase(), response.into()));
        self
    }

    /// `lower` must already be lower-cased.
    pub fn lookup(&self, lower: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(trigger, _)| lower.contains(trigger.as_str()))
            .map(|(_, response)| response.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct KeywordSet {
    keywords: Vec<String>,
}

impl KeywordSet {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.into().to_lowercase())
                .collect(),
        }
    }

    pub fn matches(&self, lower: &str) -> bool {
        self.keywords.iter().any(|k| lower.contains(k.as_str()))
    }
}

#[derive(Debug, Clone)]
pub struct Classifier {
    greetings: Vec<String>,
    greeting_replies: Vec<String>,
    canned: CannedResponseTable,
    keywords: KeywordSet,
    refusal: String,
}

impl Default for Classifier {
    fn default() -> Self {
        let canned = CANNED_RESPONSES
            .iter()
            .fold(CannedResponseTable::new(), |table, (trigger, response)| {
                table.with_entry(*trigger, *response)
            });

        Self {
            greetings: GREETING_WORDS.iter().map(|s| s.to_string()).collect(),
            greeting_replies: GREETING_REPLIES.iter().map(|s| s.to_string()).collect(),
            canned,
            keywords: KeywordSet::new(DIY_KEYWORDS),
            refusal: OFF_TOPIC_REPLY.to_string(),
        }
    }
}

impl Classifier {
    pub fn new(canned: CannedResponseTable, keywords: KeywordSet) -> Self {
        Self {
            canned,
            keywords,
            ..Self::default()
        }
    }

    pub fn is_greeting(&self, lower: &str) -> bool {
        self.greetings.iter().any(|g| lower.contains(g.as_str()))
    }

    pub fn is_diy_related(&self, utterance: &str) -> bool {
        self.keywords.matches(&utterance.to_lowercase()) || TOPIC_PATTERN.is_match(utterance)
    }

    /// Checks run greeting, then canned table, then topicality; the first
    /// hit decides.
    pub fn classify(&self, utterance: &str, rng: &mut dyn RngCore) -> Classification {
        let lower = utterance.to_lowercase();

        if self.is_greeting(&lower) {
            let reply = self
                .greeting_replies
                .choose(rng)
                .cloned()
                .unwrap_or_default();
            return Classification::Greeting(reply);
        }

        if let Some(response) = self.canned.lookup(&lower) {
            return Classification::CommonQuestion(response.to_string());
        }

        if !self.is_diy_related(utterance) {
            return Classification::OffTopic(self.refusal.clone());
        }

        Classification::OnTopic
    }
}
