use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

/// Three-tier neutrality rating. The thresholds in `Weights` are the stable
/// contract; the labels are display text carried by `get_rating_info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Rating {
    #[serde(rename = "neutral")]
    Neutral,
    #[serde(rename = "mostly neutral")]
    MostlyNeutral,
    #[serde(rename = "not neutral")]
    NotNeutral,
}

impl Rating {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Neutral => "neutral",
            Rating::MostlyNeutral => "mostly neutral",
            Rating::NotNeutral => "not neutral",
        }
    }

    fn for_score(score: i32) -> Self {
        if score >= W.rating_neutral_min {
            Rating::Neutral
        } else if score >= W.rating_mostly_neutral_min {
            Rating::MostlyNeutral
        } else {
            Rating::NotNeutral
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display metadata for a rating tier.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RatingInfo {
    pub label: &'static str,
    pub color: &'static str,
    pub emoji: &'static str,
    pub description: &'static str,
}

/// Output of a pluggable sentiment scorer.
#[derive(Debug, Clone, Serialize)]
pub struct SentimentReport {
    pub score: f64,
    pub comparative: f64,
    pub positive: Vec<String>,
    pub negative: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub score: i32,
    pub rating: Rating,
    pub reasons: Vec<String>,
    pub bias_score: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<SentimentReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_npov_violations: Option<bool>,
}

impl AnalysisResult {
    fn invalid_input() -> Self {
        AnalysisResult {
            score: 0,
            rating: Rating::NotNeutral,
            reasons: vec!["Invalid text input".to_string()],
            bias_score: 0,
            sentiment: None,
            has_npov_violations: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanKind {
    Positive,
    Negative,
    Normal,
}

/// One contiguous piece of the input. Concatenating `text` over the returned
/// spans in order reproduces the input exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighlightSpan {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: SpanKind,
}

// ---------------------------------------------------------------------------
// Weights
// ---------------------------------------------------------------------------

struct Weights {
    sentiment_trigger: f64,
    sentiment_weight: f64,
    sentiment_cap: f64,
    comparative_trigger: f64,
    comparative_weight: f64,
    comparative_cap: f64,
    negative_term_weight: f64,
    positive_term_weight: f64,
    persuasive_term_weight: f64,
    superlative_term_weight: f64,
    neutral_indicator_credit: f64,
    repetition_weight: f64,
    repetition_min_word_len: usize,
    repetition_min_count: usize,
    repetition_reason_min: usize,
    repetition_reason_cap: usize,
    npov_word_weight: f64,
    npov_reason_cap: usize,
    editorial_voice_weight: f64,
    unattributed_claim_weight: f64,
    advocacy_weight: f64,
    score_min: i32,
    score_max: i32,
    rating_neutral_min: i32,
    rating_mostly_neutral_min: i32,
}

static W: Weights = Weights {
    sentiment_trigger: 2.0,
    sentiment_weight: 3.0,
    sentiment_cap: 25.0,
    comparative_trigger: 0.1,
    comparative_weight: 10.0,
    comparative_cap: 15.0,
    negative_term_weight: 15.0,
    positive_term_weight: 12.0,
    persuasive_term_weight: 10.0,
    superlative_term_weight: 8.0,
    neutral_indicator_credit: 5.0,
    repetition_weight: 3.0,
    repetition_min_word_len: 3,
    repetition_min_count: 2,
    repetition_reason_min: 2,
    repetition_reason_cap: 3,
    npov_word_weight: 8.0,
    npov_reason_cap: 5,
    editorial_voice_weight: 10.0,
    unattributed_claim_weight: 7.0,
    advocacy_weight: 6.0,
    score_min: 0,
    score_max: 100,
    rating_neutral_min: 90,
    rating_mostly_neutral_min: 80,
};

// ---------------------------------------------------------------------------
// Analyzer lexicons
// ---------------------------------------------------------------------------
// The analyzer, highlighter, and rewriter each carry their own purpose-tuned
// word lists. They overlap but are not meant to be identical.

static NEGATIVE_TERMS: &[&str] = &[
    "reject",
    "oppose",
    "dangerous",
    "harmful",
    "threat",
    "crisis",
    "fail",
    "disaster",
    "corrupt",
    "waste",
    "unfair",
    "unjust",
    "attack",
    "destroy",
    "eliminate",
    "ban",
    "restrict",
    "limit",
    "reduce",
    "cut",
    "slash",
];

static POSITIVE_TERMS: &[&str] = &[
    "fast-track",
    "fast",
    "modernize",
    "increase",
    "improve",
    "enhance",
    "boost",
    "expand",
    "build more",
    "better",
    "best",
    "excellent",
    "great",
    "success",
    "win",
    "protect",
    "secure",
    "strengthen",
    "empower",
];

static PERSUASIVE_TERMS: &[&str] = &[
    "must",
    "should",
    "need to",
    "have to",
    "critical",
    "essential",
    "urgent",
    "immediate",
    "now",
    "quickly",
    "rapidly",
    "immediately",
];

static SUPERLATIVE_TERMS: &[&str] = &[
    "most", "best", "worst", "greatest", "lowest", "highest", "largest", "smallest", "biggest",
    "fastest", "slowest",
];

// Hedging/conditional phrasing that marks a sentence as descriptive rather
// than persuasive. Matches reduce the bias score and emit no reason.
static NEUTRAL_INDICATORS: &[&str] = &[
    "would",
    "could",
    "may",
    "might",
    "proposal",
    "would allow",
    "would create",
    "would make",
    "would change",
    "would move",
    "would require",
];

// Words-to-watch list for the extended rule set: value judgments, advocacy,
// unattributed-claim lead-ins, editorializing, absolutes, emotional language.
static NPOV_WATCH_TERMS: &[&str] = &[
    "obviously",
    "clearly",
    "undoubtedly",
    "certainly",
    "definitely",
    "undeniably",
    "of course",
    "naturally",
    "evidently",
    "plainly",
    "manifestly",
    "should",
    "must",
    "ought to",
    "needs to",
    "has to",
    "requires that",
    "important",
    "significant",
    "crucial",
    "vital",
    "essential",
    "critical",
    "everyone knows",
    "it is known",
    "widely recognized",
    "commonly accepted",
    "experts agree",
    "scientists say",
    "studies show",
    "so-called",
    "alleged",
    "claimed",
    "purported",
    "supposed",
    "unfortunately",
    "fortunately",
    "sadly",
    "tragically",
    "ironically",
    "interestingly",
    "surprisingly",
    "shockingly",
    "amazingly",
    "better",
    "worse",
    "best",
    "worst",
    "superior",
    "inferior",
    "more effective",
    "less effective",
    "improved",
    "degraded",
    "always",
    "never",
    "all",
    "none",
    "every",
    "no one",
    "everyone",
    "completely",
    "totally",
    "entirely",
    "absolutely",
    "terrible",
    "awful",
    "horrible",
    "disgusting",
    "outrageous",
    "shocking",
    "wonderful",
    "amazing",
    "fantastic",
    "brilliant",
    "perfect",
];

// First/second person pronouns: editorial voice instead of neutral third
// person. Matched as whole words against the original-case text.
static EDITORIAL_PRONOUNS: &[&str] = &["we", "our", "us", "you", "your", "i", "my", "me"];

// ---------------------------------------------------------------------------
// Compiled patterns
// ---------------------------------------------------------------------------

fn term_regex(term: &str) -> Regex {
    let escaped = regex::escape(term);
    // Multi-word phrases match as literal substrings; single words are
    // anchored on word boundaries.
    let pattern = if term.contains(' ') {
        format!("(?i){escaped}")
    } else {
        format!(r"(?i)\b{escaped}\b")
    };
    Regex::new(&pattern).unwrap()
}

static EDITORIAL_PRONOUN_RES: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    EDITORIAL_PRONOUNS
        .iter()
        .map(|w| (*w, Regex::new(&format!(r"(?i)\b{w}\b")).unwrap()))
        .collect()
});

static UNATTRIBUTED_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)\b(studies?|research|experts?|scientists?|scholars?)\s+(show|prove|demonstrate|indicate|suggest|find)").unwrap(),
        Regex::new(r"(?i)\b(it is|this is)\s+(known|understood|recognized|accepted|believed)").unwrap(),
        Regex::new(r"(?i)\b(widely|generally|commonly)\s+(known|accepted|recognized|believed)").unwrap(),
    ]
});

static ADVOCACY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)\b(should|must|ought to|needs to)\s+(be|do|have|make)").unwrap(),
        Regex::new(r"(?i)\b(it is|this is)\s+(important|critical|essential|crucial|vital)")
            .unwrap(),
    ]
});

static NON_WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w]").unwrap());

// ---------------------------------------------------------------------------
// Highlighter lexicons
// ---------------------------------------------------------------------------
// Display-tuned lists: broader than the analyzer's, including phrases that
// only matter for marking up proposal boilerplate.

static HIGHLIGHT_POSITIVE: &[&str] = &[
    "fast-track",
    "fast track",
    "fast",
    "modernize",
    "increase",
    "improve",
    "enhance",
    "boost",
    "expand",
    "build more",
    "better",
    "best",
    "excellent",
    "great",
    "success",
    "win",
    "protect",
    "secure",
    "strengthen",
    "empower",
    "create",
    "consolidate",
    "consolidated",
    "digital",
    "simplify",
    "simplifies",
    "delivering",
    "maintain",
    "significantly reducing",
    "reducing",
    "more affordable",
    "significantly",
    "faster",
    "fast tracks",
    "fast tracks applications",
];

static HIGHLIGHT_NEGATIVE: &[&str] = &[
    "reject",
    "oppose",
    "dangerous",
    "harmful",
    "threat",
    "crisis",
    "fail",
    "disaster",
    "corrupt",
    "waste",
    "unfair",
    "unjust",
    "attack",
    "destroy",
    "eliminate",
    "ban",
    "restrict",
    "limit",
    "reduce",
    "cut",
    "slash",
    "longer review",
    "leaves",
    "subject to",
    "unchanged",
    "separate",
    "least",
    "leaves affordable",
    "leaves these",
    "leaves in place",
    "longer",
    "rejects",
    "reject or change",
];

static HIGHLIGHT_POSITIVE_RES: Lazy<Vec<Regex>> =
    Lazy::new(|| HIGHLIGHT_POSITIVE.iter().map(|t| term_regex(t)).collect());

static HIGHLIGHT_NEGATIVE_RES: Lazy<Vec<Regex>> =
    Lazy::new(|| HIGHLIGHT_NEGATIVE.iter().map(|t| term_regex(t)).collect());

// ---------------------------------------------------------------------------
// Rewriter rules
// ---------------------------------------------------------------------------
// Order is significant: multi-word phrases come before the single words they
// overlap with, so "fast track" is consumed before "fast" can fire.

static REWRITE_RULES: &[(&str, &str)] = &[
    ("fast track", "expedite the review process for"),
    ("fast-track", "expedite the review process for"),
    ("significantly reducing", "reducing"),
    ("build more", "allow for additional"),
    ("longer review", "standard review process"),
    ("leaves affordable", "maintains affordable"),
    ("leaves these", "maintains these"),
    ("leaves in place", "maintains"),
    ("reject or change", "not approve or modify"),
    ("more affordable", "affordable"),
    ("significantly", ""),
    ("fast", "expedited"),
    ("modernize", "update"),
    ("increase", "modify to allow for additional"),
    ("improve", "modify"),
    ("enhance", "modify"),
    ("boost", "modify to allow for"),
    ("expand", "modify to allow for additional"),
    ("better", "different"),
    ("best", "one option"),
    ("excellent", ""),
    ("great", ""),
    ("success", "outcome"),
    ("win", "outcome"),
    ("protect", "address"),
    ("secure", "establish"),
    ("strengthen", "modify"),
    ("empower", "allow"),
    ("create", "establish"),
    ("creates", "establishes"),
    ("consolidate", "combine"),
    ("consolidated", "combined"),
    ("digital", "electronic"),
    ("simplify", "streamline"),
    ("simplifies", "streamlines"),
    ("delivering", "providing"),
    ("reject", "not approve"),
    ("rejects", "does not approve"),
    ("oppose", "not support"),
    ("dangerous", "concerning"),
    ("harmful", "potentially problematic"),
    ("threat", "concern"),
    ("crisis", "challenge"),
    ("fail", "not succeed"),
    ("disaster", "significant problem"),
    ("corrupt", "problematic"),
    ("waste", "inefficient use of"),
    ("unfair", "potentially inequitable"),
    ("unjust", "potentially inequitable"),
    ("attack", "address"),
    ("destroy", "remove"),
    ("eliminate", "remove"),
    ("ban", "prohibit"),
    ("restrict", "limit"),
    ("limit", "establish parameters for"),
    ("reduce", "decrease"),
    ("cut", "reduce"),
    ("slash", "reduce"),
    ("leaves", "maintains"),
    ("unchanged", "as currently established"),
    ("separate", "distinct"),
    ("least", "fewest"),
    ("longer", "standard"),
    ("must", "would"),
    ("should", "would"),
    ("need to", "would"),
    ("have to", "would"),
    ("critical", "important"),
    ("essential", "important"),
    ("urgent", "timely"),
    ("immediate", "prompt"),
    ("now", ""),
    ("quickly", "in a timely manner"),
    ("rapidly", "in a timely manner"),
    ("immediately", "promptly"),
];

static REWRITE_RES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    REWRITE_RULES
        .iter()
        .map(|(pattern, replacement)| (term_regex(pattern), *replacement))
        .collect()
});

static WS_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static DOT_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.\.+").unwrap());

static COMMA_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r",,+").unwrap());

static SPACE_BEFORE_DOT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+\.").unwrap());

static SPACE_BEFORE_COMMA_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+,").unwrap());

// Replacements can stack the same connective twice ("would would"). The regex
// crate has no backreferences, so each word gets its own pattern.
static DUPLICATE_WORD_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    ["would", "maintains", "establishes"]
        .iter()
        .map(|w| Regex::new(&format!(r"(?i)\b({w})\s+{w}\b")).unwrap())
        .collect()
});

// ---------------------------------------------------------------------------
// Sentiment scorer
// ---------------------------------------------------------------------------

/// Pluggable sentiment capability. The analyzer consumes the report and
/// degrades gracefully when no scorer is configured.
pub trait SentimentScorer: Send + Sync {
    fn analyze(&self, text: &str) -> SentimentReport;
}

static SENTIMENT_LEXICON: &[(&str, i32)] = &[
    // Positive signals
    ("amazing", 4),
    ("benefit", 2),
    ("benefits", 2),
    ("best", 3),
    ("better", 2),
    ("boost", 2),
    ("brilliant", 4),
    ("empower", 2),
    ("enhance", 2),
    ("excellent", 3),
    ("fantastic", 4),
    ("good", 3),
    ("great", 3),
    ("improve", 2),
    ("improved", 2),
    ("improves", 2),
    ("perfect", 3),
    ("progress", 2),
    ("protect", 1),
    ("secure", 2),
    ("strengthen", 2),
    ("success", 2),
    ("support", 2),
    ("thriving", 3),
    ("victory", 3),
    ("win", 4),
    ("wonderful", 4),
    // Negative signals
    ("attack", -2),
    ("awful", -3),
    ("bad", -3),
    ("ban", -2),
    ("corrupt", -3),
    ("crisis", -3),
    ("dangerous", -2),
    ("destroy", -3),
    ("disaster", -2),
    ("fail", -2),
    ("failure", -2),
    ("harm", -2),
    ("harmful", -2),
    ("horrible", -3),
    ("outrageous", -3),
    ("problem", -2),
    ("reject", -1),
    ("restrict", -2),
    ("shocking", -2),
    ("terrible", -3),
    ("threat", -2),
    ("tragic", -2),
    ("unfair", -2),
    ("unjust", -2),
    ("waste", -1),
    ("worst", -3),
];

static SENTIMENT_WEIGHTS: Lazy<HashMap<&'static str, i32>> =
    Lazy::new(|| SENTIMENT_LEXICON.iter().copied().collect());

fn is_negator(token: &str) -> bool {
    matches!(
        token,
        "not"
            | "no"
            | "never"
            | "cannot"
            | "without"
            | "isn't"
            | "wasn't"
            | "aren't"
            | "won't"
            | "can't"
            | "don't"
            | "doesn't"
    )
}

/// Built-in weighted-word-list scorer. A negator within the previous three
/// tokens inverts the sign of a matched word.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordListSentiment;

impl SentimentScorer for WordListSentiment {
    fn analyze(&self, text: &str) -> SentimentReport {
        let tokens: Vec<String> = text
            .split(|c: char| !c.is_alphanumeric() && c != '\'')
            .filter(|t| !t.is_empty())
            .map(|t| t.to_ascii_lowercase())
            .collect();

        let mut score = 0i32;
        let mut positive = Vec::new();
        let mut negative = Vec::new();

        for i in 0..tokens.len() {
            let base = match SENTIMENT_WEIGHTS.get(tokens[i].as_str()) {
                Some(&w) => w,
                None => continue,
            };
            let negated = (1..=3).any(|k| i >= k && is_negator(&tokens[i - k]));
            let adjusted = if negated { -base } else { base };
            score += adjusted;
            if adjusted > 0 {
                positive.push(tokens[i].clone());
            } else {
                negative.push(tokens[i].clone());
            }
        }

        let comparative = if tokens.is_empty() {
            0.0
        } else {
            f64::from(score) / tokens.len() as f64
        };

        SentimentReport {
            score: f64::from(score),
            comparative,
            positive,
            negative,
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Substring hits for one lexicon category: total occurrence count across
/// all terms (what the weights multiply) plus the distinct terms that
/// matched (what the reason text lists).
struct CategoryHits {
    occurrences: usize,
    terms: Vec<&'static str>,
}

fn category_hits(lower: &str, terms: &[&'static str]) -> CategoryHits {
    let mut occurrences = 0;
    let mut matched = Vec::new();
    for term in terms {
        let count = lower.matches(*term).count();
        if count > 0 {
            occurrences += count;
            matched.push(*term);
        }
    }
    CategoryHits {
        occurrences,
        terms: matched,
    }
}

/// Cleaned tokens (word chars only, length > `repetition_min_word_len`) that
/// appear more than `repetition_min_count` times, in first-occurrence order.
fn repeated_words(lower: &str) -> Vec<String> {
    let tokens: Vec<String> = lower
        .split_whitespace()
        .map(|t| NON_WORD_RE.replace_all(t, "").into_owned())
        .filter(|t| t.chars().count() > W.repetition_min_word_len)
        .collect();

    let mut frequency: HashMap<&str, usize> = HashMap::new();
    for token in &tokens {
        *frequency.entry(token.as_str()).or_insert(0) += 1;
    }

    let mut repeated = Vec::new();
    for token in &tokens {
        if frequency[token.as_str()] > W.repetition_min_count && !repeated.contains(token) {
            repeated.push(token.clone());
        }
    }
    repeated
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn replace_preserving_case(re: &Regex, text: &str, replacement: &str) -> String {
    re.replace_all(text, |caps: &Captures| {
        let matched = &caps[0];
        let first_is_upper = matched.chars().next().is_some_and(|c| c.is_uppercase());
        if first_is_upper && !replacement.is_empty() {
            capitalize_first(replacement)
        } else {
            replacement.to_string()
        }
    })
    .into_owned()
}

// ---------------------------------------------------------------------------
// Analyzer
// ---------------------------------------------------------------------------

/// Neutrality analyzer over a fixed rule table. Base mode runs the lexical
/// rules only; `extended` adds the NPOV rule set; an optional sentiment
/// scorer enables the sentiment rules.
#[derive(Default)]
pub struct Analyzer {
    sentiment: Option<Box<dyn SentimentScorer>>,
    extended: bool,
}

impl Analyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sentiment(mut self, scorer: Box<dyn SentimentScorer>) -> Self {
        self.sentiment = Some(scorer);
        self
    }

    pub fn extended(mut self, on: bool) -> Self {
        self.extended = on;
        self
    }

    pub fn analyze(&self, text: &str) -> AnalysisResult {
        if text.is_empty() {
            return AnalysisResult::invalid_input();
        }

        let lower = text.to_lowercase();
        let mut bias = 0.0f64;
        let mut reasons: Vec<String> = Vec::new();

        // 1. Sentiment magnitude and comparative (only with a scorer)
        let mut sentiment_report = None;
        if let Some(scorer) = &self.sentiment {
            let report = scorer.analyze(text);
            let magnitude = report.score.abs();
            if magnitude > W.sentiment_trigger {
                let leaning = if report.score > 0.0 {
                    "positive"
                } else {
                    "negative"
                };
                bias += (magnitude * W.sentiment_weight).min(W.sentiment_cap);
                reasons.push(format!(
                    "Sentiment analysis indicates {leaning} sentiment (score: {})",
                    report.score
                ));
            }
            if report.comparative.abs() > W.comparative_trigger {
                bias += (report.comparative.abs() * W.comparative_weight).min(W.comparative_cap);
            }
            sentiment_report = Some(report);
        }

        // 2. Loaded-language categories: every occurrence counts toward the
        // weight; reasons list the distinct terms that matched.
        let negative = category_hits(&lower, NEGATIVE_TERMS);
        if negative.occurrences > 0 {
            bias += negative.occurrences as f64 * W.negative_term_weight;
            reasons.push(format!(
                "Contains negative/loaded language: {}",
                negative.terms.join(", ")
            ));
        }

        let positive = category_hits(&lower, POSITIVE_TERMS);
        if positive.occurrences > 0 {
            bias += positive.occurrences as f64 * W.positive_term_weight;
            reasons.push(format!(
                "Contains positive/loaded language: {}",
                positive.terms.join(", ")
            ));
        }

        let persuasive = category_hits(&lower, PERSUASIVE_TERMS);
        if persuasive.occurrences > 0 {
            bias += persuasive.occurrences as f64 * W.persuasive_term_weight;
            reasons.push(format!(
                "Contains persuasive language: {}",
                persuasive.terms.join(", ")
            ));
        }

        let superlatives = category_hits(&lower, SUPERLATIVE_TERMS);
        if superlatives.occurrences > 0 {
            bias += superlatives.occurrences as f64 * W.superlative_term_weight;
            reasons.push(format!(
                "Contains superlatives: {}",
                superlatives.terms.join(", ")
            ));
        }

        // 3. Neutral framing reduces the bias score, silently
        let neutral = category_hits(&lower, NEUTRAL_INDICATORS);
        bias -= neutral.occurrences as f64 * W.neutral_indicator_credit;

        // 4. Repetition as emphasis
        let repeated = repeated_words(&lower);
        if !repeated.is_empty() {
            bias += repeated.len() as f64 * W.repetition_weight;
            if repeated.len() > W.repetition_reason_min {
                let shown: Vec<&str> = repeated
                    .iter()
                    .take(W.repetition_reason_cap)
                    .map(String::as_str)
                    .collect();
                reasons.push(format!(
                    "Excessive repetition of words: {}",
                    shown.join(", ")
                ));
            }
        }

        // 5. Extended NPOV rule set
        let mut has_npov_violations = None;
        if self.extended {
            let mut flagged = false;

            let npov = category_hits(&lower, NPOV_WATCH_TERMS);
            if npov.occurrences > 0 {
                bias += npov.occurrences as f64 * W.npov_word_weight;
                flagged = true;
                let shown: Vec<&str> = npov.terms.iter().take(W.npov_reason_cap).copied().collect();
                reasons.push(format!(
                    "Wikipedia NPOV: Contains value judgment language: {}",
                    shown.join(", ")
                ));
            }

            let mut pronoun_hits = 0;
            let mut pronouns: Vec<&str> = Vec::new();
            for (word, re) in EDITORIAL_PRONOUN_RES.iter() {
                let count = re.find_iter(text).count();
                if count > 0 {
                    pronoun_hits += count;
                    pronouns.push(*word);
                }
            }
            if pronoun_hits > 0 {
                bias += pronoun_hits as f64 * W.editorial_voice_weight;
                flagged = true;
                reasons.push(format!(
                    "Wikipedia NPOV: Uses editorial voice ({}) instead of neutral third person",
                    pronouns.join(", ")
                ));
            }

            let unattributed: usize = UNATTRIBUTED_PATTERNS
                .iter()
                .map(|re| re.find_iter(text).count())
                .sum();
            if unattributed > 0 {
                bias += unattributed as f64 * W.unattributed_claim_weight;
                flagged = true;
                reasons.push(
                    "Wikipedia NPOV: Contains unattributed claims that should be attributed \
                     to sources"
                        .to_string(),
                );
            }

            let advocacy: usize = ADVOCACY_PATTERNS
                .iter()
                .map(|re| re.find_iter(text).count())
                .sum();
            if advocacy > 0 {
                bias += advocacy as f64 * W.advocacy_weight;
                flagged = true;
                reasons.push(
                    "Wikipedia NPOV: Contains advocacy language (telling the reader what to \
                     think)"
                        .to_string(),
                );
            }

            has_npov_violations = Some(flagged);
        }

        let score =
            ((f64::from(W.score_max) - bias).round() as i32).clamp(W.score_min, W.score_max);
        let rating = Rating::for_score(score);

        if reasons.is_empty() {
            reasons.push("Language appears relatively neutral and factual".to_string());
        }

        AnalysisResult {
            score,
            rating,
            reasons,
            bias_score: bias.round() as i32,
            sentiment: sentiment_report,
            has_npov_violations,
        }
    }
}

/// Analyze with the default configuration: base rule set, no sentiment scorer.
pub fn analyze(text: &str) -> AnalysisResult {
    Analyzer::new().analyze(text)
}

// ---------------------------------------------------------------------------
// Rating info
// ---------------------------------------------------------------------------

static NEUTRAL_INFO: RatingInfo = RatingInfo {
    label: "Neutral",
    color: "#3b82f6",
    emoji: "\u{2713}",
    description: "Language is factual and unbiased",
};

static MOSTLY_NEUTRAL_INFO: RatingInfo = RatingInfo {
    label: "Mostly Neutral",
    color: "#f59e0b",
    emoji: "\u{2192}",
    description: "Generally neutral with some minor bias indicators",
};

static NOT_NEUTRAL_INFO: RatingInfo = RatingInfo {
    label: "Not Neutral",
    color: "#ef4444",
    emoji: "\u{26a0}",
    description: "Contains loaded language or persuasive framing",
};

/// Display metadata for a rating string. Unknown values fall back to the
/// most-neutral tier so the lookup never fails.
pub fn get_rating_info(rating: &str) -> &'static RatingInfo {
    match rating {
        "neutral" => &NEUTRAL_INFO,
        "mostly neutral" => &MOSTLY_NEUTRAL_INFO,
        "not neutral" => &NOT_NEUTRAL_INFO,
        _ => &NEUTRAL_INFO,
    }
}

// ---------------------------------------------------------------------------
// Highlighter
// ---------------------------------------------------------------------------

/// Partition `text` into positive/negative/normal spans for display.
pub fn highlight(text: &str) -> Vec<HighlightSpan> {
    if text.is_empty() {
        return vec![HighlightSpan {
            text: text.to_string(),
            kind: SpanKind::Normal,
        }];
    }

    // Collect every occurrence of every pattern, positive lexicon first.
    // The stable sort keeps scan order for matches at equal start positions,
    // so ties favor the earlier lexicon.
    let mut matches: Vec<(usize, usize, SpanKind)> = Vec::new();
    for re in HIGHLIGHT_POSITIVE_RES.iter() {
        for m in re.find_iter(text) {
            matches.push((m.start(), m.end(), SpanKind::Positive));
        }
    }
    for re in HIGHLIGHT_NEGATIVE_RES.iter() {
        for m in re.find_iter(text) {
            matches.push((m.start(), m.end(), SpanKind::Negative));
        }
    }
    matches.sort_by_key(|&(start, _, _)| start);

    // Greedy first-wins overlap resolution.
    let mut accepted: Vec<(usize, usize, SpanKind)> = Vec::new();
    for candidate in matches {
        let overlaps = accepted
            .iter()
            .any(|&(start, end, _)| candidate.0 < end && candidate.1 > start);
        if !overlaps {
            accepted.push(candidate);
        }
    }

    let mut spans = Vec::new();
    let mut cursor = 0;
    for (start, end, kind) in accepted {
        if start > cursor {
            spans.push(HighlightSpan {
                text: text[cursor..start].to_string(),
                kind: SpanKind::Normal,
            });
        }
        spans.push(HighlightSpan {
            text: text[start..end].to_string(),
            kind,
        });
        cursor = end;
    }
    if cursor < text.len() {
        spans.push(HighlightSpan {
            text: text[cursor..].to_string(),
            kind: SpanKind::Normal,
        });
    }

    if spans.is_empty() {
        spans.push(HighlightSpan {
            text: text.to_string(),
            kind: SpanKind::Normal,
        });
    }
    spans
}

// ---------------------------------------------------------------------------
// Rewriter
// ---------------------------------------------------------------------------

/// Substitute loaded terms with neutral alternatives and tidy the result.
pub fn rewrite(text: &str) -> String {
    if text.is_empty() {
        return text.to_string();
    }

    let mut out = text.to_string();
    for (re, replacement) in REWRITE_RES.iter() {
        out = replace_preserving_case(re, &out, replacement);
    }

    // Cleanup passes, in order: whitespace runs, punctuation runs, stray
    // space before punctuation, stacked connectives.
    out = WS_RUN_RE.replace_all(&out, " ").trim().to_string();
    out = DOT_RUN_RE.replace_all(&out, ".").into_owned();
    out = COMMA_RUN_RE.replace_all(&out, ",").into_owned();
    out = SPACE_BEFORE_DOT_RE.replace_all(&out, ".").into_owned();
    out = SPACE_BEFORE_COMMA_RE.replace_all(&out, ",").into_owned();
    for re in DUPLICATE_WORD_RES.iter() {
        out = re
            .replace_all(&out, |caps: &Captures| caps[1].to_string())
            .into_owned();
    }

    // If the replacements deleted every character, keep the input rather
    // than returning an empty suggestion.
    if out.is_empty() {
        return text.to_string();
    }
    capitalize_first(&out)
}
