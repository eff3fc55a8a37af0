//! Keyword-based news scoring.
//!
//! Headlines are scored against fixed word lists, tagged with a category and
//! the NSE symbols of the companies they mention. No language model, no
//! network: everything here is a pure function of the text.
//!
//! Keywords of three letters or fewer ("ai", "sbi", "buy") only match whole
//! words; longer keywords match anywhere in the lowercased text.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::signals::SignalVote;

/// Scores above this are positive, below its negation negative.
pub const SENTIMENT_THRESHOLD: f64 = 0.1;

const SENTIMENT_POSITIVE: &[&str] = &[
    "good", "great", "excellent", "positive", "bullish", "strong", "growth", "profit", "gain",
    "increase", "high", "up", "rise", "surge", "boom", "success", "achieve", "beat", "exceed",
    "outperform", "robust",
];

const SENTIMENT_NEGATIVE: &[&str] = &[
    "bad", "terrible", "negative", "bearish", "weak", "decline", "loss", "fall", "drop", "down",
    "crash", "plunge", "fail", "miss", "underperform", "concern", "worry", "risk", "threat",
    "challenge", "struggle",
];

const IMPACT_POSITIVE: &[&str] = &[
    "growth", "profit", "gain", "rise", "increase", "bullish", "positive", "strong", "boost",
    "surge", "rally", "upgrade", "buy", "outperform",
];

const IMPACT_NEGATIVE: &[&str] = &[
    "loss", "decline", "fall", "drop", "bearish", "negative", "weak", "crash", "plunge",
    "downgrade", "sell", "underperform", "concern",
];

const COMPANIES: &[(&str, &str)] = &[
    ("reliance", "RELIANCE.NS"),
    ("tcs", "TCS.NS"),
    ("infosys", "INFY.NS"),
    ("hdfc", "HDFCBANK.NS"),
    ("wipro", "WIPRO.NS"),
    ("icici", "ICICIBANK.NS"),
    ("sbi", "SBIN.NS"),
    ("bharti", "BHARTIARTL.NS"),
    ("adani", "ADANIENT.NS"),
    ("tata", "TATAMOTORS.NS"),
];

const STOP_WORDS: &[&str] = &[
    "said", "says", "will", "with", "from", "this", "that", "they", "their", "company", "market",
    "stock", "share", "price",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn from_score(score: f64) -> Self {
        if score > SENTIMENT_THRESHOLD {
            Sentiment::Positive
        } else if score < -SENTIMENT_THRESHOLD {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Sentiment::Positive => "Positive",
            Sentiment::Neutral => "Neutral",
            Sentiment::Negative => "Negative",
        };
        f.pad(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    pub sentiment: Sentiment,
    /// (positive - negative) / (positive + negative), in [-1, 1].
    pub score: f64,
    pub positive: usize,
    pub negative: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketImpact {
    pub impact: SignalVote,
    /// positive - negative keyword count.
    pub score: i32,
    pub positive: usize,
    pub negative: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewsCategory {
    Earnings,
    MergerAcquisition,
    MarketNews,
    PolicyRegulation,
    Technology,
    BankingFinance,
    Energy,
    Auto,
    PharmaHealthcare,
    RealEstate,
    General,
}

impl NewsCategory {
    /// Checked in this order; the first match wins.
    const RULES: [(NewsCategory, &'static [&'static str]); 10] = [
        (
            NewsCategory::Earnings,
            &["earnings", "profit", "revenue", "quarterly", "annual", "results"],
        ),
        (
            NewsCategory::MergerAcquisition,
            &["merger", "acquisition", "takeover", "buyout", "deal"],
        ),
        (
            NewsCategory::MarketNews,
            &["market", "trading", "index", "nifty", "sensex", "exchange"],
        ),
        (
            NewsCategory::PolicyRegulation,
            &["policy", "regulation", "government", "rbi", "sebi", "ministry"],
        ),
        (
            NewsCategory::Technology,
            &["technology", "digital", "ai", "automation", "tech", "innovation"],
        ),
        (
            NewsCategory::BankingFinance,
            &["bank", "finance", "loan", "credit", "npa", "deposit"],
        ),
        (
            NewsCategory::Energy,
            &["oil", "gas", "renewable", "solar", "energy", "power"],
        ),
        (
            NewsCategory::Auto,
            &["auto", "car", "vehicle", "automobile", "ev", "electric"],
        ),
        (
            NewsCategory::PharmaHealthcare,
            &["pharma", "drug", "medicine", "healthcare", "hospital"],
        ),
        (
            NewsCategory::RealEstate,
            &["real estate", "property", "housing", "construction", "builder"],
        ),
    ];

    pub fn label(self) -> &'static str {
        match self {
            NewsCategory::Earnings => "Earnings",
            NewsCategory::MergerAcquisition => "Merger & Acquisition",
            NewsCategory::MarketNews => "Market News",
            NewsCategory::PolicyRegulation => "Policy & Regulation",
            NewsCategory::Technology => "Technology",
            NewsCategory::BankingFinance => "Banking & Finance",
            NewsCategory::Energy => "Energy",
            NewsCategory::Auto => "Auto",
            NewsCategory::PharmaHealthcare => "Pharma & Healthcare",
            NewsCategory::RealEstate => "Real Estate",
            NewsCategory::General => "General",
        }
    }
}

impl fmt::Display for NewsCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// One article: a headline plus an optional summary paragraph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub headline: String,
    #[serde(default)]
    pub summary: String,
}

impl NewsItem {
    pub fn headline(headline: impl Into<String>) -> Self {
        Self {
            headline: headline.into(),
            summary: String::new(),
        }
    }

    fn text(&self) -> String {
        format!("{} {}", self.headline, self.summary)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedItem {
    pub item: NewsItem,
    pub sentiment: SentimentScore,
    pub impact: MarketImpact,
    pub category: NewsCategory,
    pub symbols: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentCounts {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl SentimentCounts {
    fn add(&mut self, sentiment: Sentiment) {
        match sentiment {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Neutral => self.neutral += 1,
            Sentiment::Negative => self.negative += 1,
        }
    }
}

/// Aggregate view of a batch of articles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsDigest {
    pub total: usize,
    pub distribution: SentimentCounts,
    pub categories: BTreeMap<NewsCategory, usize>,
    pub average_score: f64,
    pub overall: Sentiment,
    pub impact: SignalVote,
    /// Most mentioned symbols, at most five, by count then symbol.
    pub top_symbols: Vec<(String, usize)>,
    pub items: Vec<AnalyzedItem>,
}

/// Whitespace tokens, lowercased, with surrounding punctuation removed.
fn words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect()
}

fn mentions(lower: &str, words: &[String], keyword: &str) -> bool {
    if keyword.len() <= 3 {
        words.iter().any(|w| w == keyword)
    } else {
        lower.contains(keyword)
    }
}

fn count_mentions(lower: &str, words: &[String], keywords: &[&str]) -> usize {
    keywords
        .iter()
        .filter(|k| mentions(lower, words, k))
        .count()
}

/// Word-level sentiment: each token counts once against the word lists.
pub fn score_text(text: &str) -> SentimentScore {
    let mut positive = 0;
    let mut negative = 0;
    for word in words(text) {
        if SENTIMENT_POSITIVE.contains(&word.as_str()) {
            positive += 1;
        } else if SENTIMENT_NEGATIVE.contains(&word.as_str()) {
            negative += 1;
        }
    }

    let total = positive + negative;
    let score = if total == 0 {
        0.0
    } else {
        (positive as f64 - negative as f64) / total as f64
    };

    SentimentScore {
        sentiment: Sentiment::from_score(score),
        score,
        positive,
        negative,
    }
}

/// Market-moving keyword balance. Each keyword counts once however often it
/// appears.
pub fn market_impact(text: &str) -> MarketImpact {
    let lower = text.to_lowercase();
    let tokens = words(text);
    let positive = count_mentions(&lower, &tokens, IMPACT_POSITIVE);
    let negative = count_mentions(&lower, &tokens, IMPACT_NEGATIVE);
    let score = positive as i32 - negative as i32;

    MarketImpact {
        impact: SignalVote::from_value(score),
        score,
        positive,
        negative,
    }
}

pub fn categorize(text: &str) -> NewsCategory {
    let lower = text.to_lowercase();
    let tokens = words(text);
    NewsCategory::RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| mentions(&lower, &tokens, k)))
        .map_or(NewsCategory::General, |(category, _)| *category)
}

/// NSE symbols of the companies named in the text, sorted and deduplicated.
pub fn mentioned_symbols(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let tokens = words(text);
    let mut symbols: Vec<String> = COMPANIES
        .iter()
        .filter(|(name, _)| mentions(&lower, &tokens, name))
        .map(|(_, symbol)| symbol.to_string())
        .collect();
    symbols.sort();
    symbols.dedup();
    symbols
}

pub fn analyze_item(item: &NewsItem) -> AnalyzedItem {
    let text = item.text();
    AnalyzedItem {
        item: item.clone(),
        sentiment: score_text(&text),
        impact: market_impact(&text),
        category: categorize(&text),
        symbols: mentioned_symbols(&text),
    }
}

pub fn analyze_batch(items: &[NewsItem]) -> NewsDigest {
    let analyzed: Vec<AnalyzedItem> = items.iter().map(analyze_item).collect();

    let mut distribution = SentimentCounts::default();
    let mut categories = BTreeMap::new();
    let mut symbol_counts: HashMap<&str, usize> = HashMap::new();
    let mut total_score = 0.0;

    for a in &analyzed {
        distribution.add(a.sentiment.sentiment);
        *categories.entry(a.category).or_insert(0) += 1;
        for s in &a.symbols {
            *symbol_counts.entry(s.as_str()).or_insert(0) += 1;
        }
        total_score += a.sentiment.score;
    }

    let average_score = if analyzed.is_empty() {
        0.0
    } else {
        total_score / analyzed.len() as f64
    };
    let overall = Sentiment::from_score(average_score);
    let impact = match overall {
        Sentiment::Positive => SignalVote::Bullish,
        Sentiment::Neutral => SignalVote::Neutral,
        Sentiment::Negative => SignalVote::Bearish,
    };

    let top_symbols = top_counts(symbol_counts, 5);

    NewsDigest {
        total: analyzed.len(),
        distribution,
        categories,
        average_score,
        overall,
        impact,
        top_symbols,
        items: analyzed,
    }
}

/// Most frequent 4+ letter words across the headlines, stop words excluded.
pub fn trending_topics(headlines: &[&str], limit: usize) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let lowered: Vec<String> = headlines.iter().map(|h| h.to_lowercase()).collect();

    for headline in &lowered {
        for token in headline.split(|c: char| !(c.is_alphanumeric() || c == '_')) {
            if token.len() >= 4
                && token.chars().all(|c| c.is_ascii_alphabetic())
                && !STOP_WORDS.contains(&token)
            {
                *counts.entry(token).or_insert(0) += 1;
            }
        }
    }

    top_counts(counts, limit)
}

/// Highest counts first; ties broken alphabetically.
fn top_counts(counts: HashMap<&str, usize>, limit: usize) -> Vec<(String, usize)> {
    let mut ranked: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(k, n)| (k.to_string(), n))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(limit);
    ranked
}
