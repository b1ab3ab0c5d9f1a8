use std::collections::HashSet;

use indexmap::IndexMap;

/// Keywords searched for when none are configured.
pub const DEFAULT_KEYWORDS: [&str; 4] = ["Python", "Java", "SQL", "JavaScript"];

/// English stop-words removed before counting.
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't",
    "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn",
    "wouldn't",
];

/// Splits raw text into lowercase tokens.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Word tokenizer that keeps `+` and `#` so names like `c++` and `c#` survive.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordTokenizer;

impl Tokenizer for WordTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.split(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'))
            .filter(|token| !token.is_empty())
            .map(str::to_lowercase)
            .collect()
    }
}

/// Keyword → occurrence count in keyword-list order. Never holds a zero.
pub type KeywordCounts = IndexMap<String, usize>;

pub struct KeywordAnalyzer {
    keywords: Vec<String>,
    stop_words: HashSet<String>,
    tokenizer: Box<dyn Tokenizer>,
}

impl KeywordAnalyzer {
    pub fn new(keywords: Vec<String>) -> Self {
        Self::with_tokenizer(keywords, Box::new(WordTokenizer))
    }

    pub fn with_tokenizer(keywords: Vec<String>, tokenizer: Box<dyn Tokenizer>) -> Self {
        let stop_words = ENGLISH_STOP_WORDS
            .iter()
            .map(|word| word.to_string())
            .collect();

        Self {
            keywords,
            stop_words,
            tokenizer,
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn analyze(&self, text: &str) -> KeywordCounts {
        let tokens: Vec<String> = self
            .tokenizer
            .tokenize(text)
            .into_iter()
            .filter(|token| !self.stop_words.contains(token))
            .collect();

        let mut counts = KeywordCounts::new();
        for keyword in &self.keywords {
            let needle = keyword.to_lowercase();
            let count = tokens.iter().filter(|token| **token == needle).count();
            if count > 0 {
                counts.insert(keyword.clone(), count);
            }
        }
        counts
    }
}

impl Default for KeywordAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect())
    }
}

impl std::fmt::Debug for KeywordAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeywordAnalyzer")
            .field("keywords", &self.keywords)
            .field("stop_words", &self.stop_words.len())
            .finish_non_exhaustive()
    }
}
