use std::collections::{HashMap, HashSet};
use std::fmt;

use once_cell::sync::Lazy;

/// Characters removed by the default sanitizer.
pub const DEFAULT_BLOCKED_CHARS: &[char] = &['\'', '"', '`', ';', '\\'];

/// Keywords and comment markers removed by the default sanitizer.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "UNION", "SELECT", "INSERT", "UPDATE", "DELETE", "DROP", "ALTER", "CREATE", "EXEC", "EXECUTE",
    "SCRIPT", "--", "/*", "*/",
];

static DEFAULT_SANITIZER: Lazy<Sanitizer> =
    Lazy::new(|| Sanitizer::new(SanitizerConfig::default()));

/// Cleans text with the default configuration.
///
/// Shorthand for `Sanitizer::default().sanitize(input)`.
///
/// ```
/// assert_eq!(query_guard::sanitize("Normal Company Name"), "Normal Company Name");
/// assert_eq!(query_guard::sanitize(None), "");
/// ```
pub fn sanitize<'a>(input: impl Into<Option<&'a str>>) -> String {
    DEFAULT_SANITIZER.sanitize(input)
}

/// Escapes single quotes and backslashes with a backslash.
///
/// This is the classic escaping for a value placed between single quotes.
/// The backslash is escaped too, otherwise an input ending in `\` would turn
/// the closing quote into an escaped one. Prefer binding; this exists for
/// callers stuck with a literal.
///
/// ```
/// assert_eq!(query_guard::escape_quotes("O'Reilly"), "O\\'Reilly");
/// assert_eq!(query_guard::escape_quotes("x\\' OR 1=1"), "x\\\\\\' OR 1=1");
/// ```
pub fn escape_quotes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\'' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// What the sanitizer strips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizerConfig {
    blocked_chars: Vec<char>,
    keywords: Vec<String>,
}

impl SanitizerConfig {
    /// Creates a configuration with the given characters and keywords.
    ///
    /// Empty keywords are ignored.
    pub fn new<C, K, S>(blocked_chars: C, keywords: K) -> Self
    where
        C: IntoIterator<Item = char>,
        K: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            blocked_chars: blocked_chars.into_iter().collect(),
            keywords: keywords
                .into_iter()
                .map(Into::into)
                .filter(|k: &String| !k.is_empty())
                .collect(),
        }
    }

    /// Adds one more keyword.
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        let keyword = keyword.into();
        if !keyword.is_empty() {
            self.keywords.push(keyword);
        }
        self
    }

    /// Adds one more blocked character.
    pub fn with_blocked_char(mut self, c: char) -> Self {
        self.blocked_chars.push(c);
        self
    }

    /// Returns the blocked characters.
    pub fn blocked_chars(&self) -> &[char] {
        &self.blocked_chars
    }

    /// Returns the keywords.
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_BLOCKED_CHARS.iter().copied(),
            DEFAULT_KEYWORDS.iter().copied(),
        )
    }
}

/// Something [`Sanitizer::find_blocked`] found in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Blocked {
    /// A blocked character
    Char(char),
    /// A blocked keyword, as configured
    Keyword(String),
}

impl fmt::Display for Blocked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Blocked::Char(c) => write!(f, "blocked character {:?}", c),
            Blocked::Keyword(k) => write!(f, "blocked keyword {:?}", k),
        }
    }
}

/// Lowercases one character, keeping it as is when its lowercase form is
/// more than one character long.
fn fold(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

/// Case-folded keyword lookup tables.
#[derive(Debug, Clone, Default)]
struct KeywordSet {
    // Folded keyword to its configured spelling
    whole: HashMap<Vec<char>, String>,
    // Every proper prefix of a folded keyword
    prefixes: HashSet<Vec<char>>,
    // Distinct keyword lengths, longest first
    lengths: Vec<usize>,
}

impl KeywordSet {
    fn new(keywords: &[String]) -> Self {
        let mut set = Self::default();
        for keyword in keywords {
            let folded: Vec<char> = keyword.chars().map(fold).collect();
            for end in 1..folded.len() {
                set.prefixes.insert(folded[..end].to_vec());
            }
            set.lengths.push(folded.len());
            set.whole.entry(folded).or_insert_with(|| keyword.clone());
        }
        set.lengths.sort_unstable_by(|a, b| b.cmp(a));
        set.lengths.dedup();
        set
    }

    fn is_empty(&self) -> bool {
        self.whole.is_empty()
    }

    fn contains(&self, text: &[char]) -> bool {
        self.whole.contains_key(text)
    }

    /// Returns `true` if `text` could still grow into a longer keyword.
    fn extends(&self, text: &[char]) -> bool {
        self.prefixes.contains(text)
    }

    /// Length of the longest keyword `text` ends with.
    fn longest_suffix(&self, text: &[char]) -> Option<usize> {
        self.lengths
            .iter()
            .copied()
            .find(|&len| len <= text.len() && self.contains(&text[text.len() - len..]))
    }

    /// The longest keyword `text` starts with, with its length.
    fn longest_prefix(&self, text: &[char]) -> Option<(usize, &str)> {
        self.lengths.iter().find_map(|&len| {
            let head = text.get(..len)?;
            self.whole.get(head).map(|k| (len, k.as_str()))
        })
    }
}

/// Single-pass keyword remover.
///
/// Kept characters go onto a stack. After each push the top of the stack is
/// checked against the keywords, and a match is popped off. Popping exposes
/// the characters before it to the next check, so `DRDROPOP` loses both
/// `DROP`s without rescanning the text.
///
/// A match that is the start of a longer keyword (`EXEC` in `EXECUTE`) is
/// held until the longer one either completes or fails.
struct Scrubber<'k> {
    keywords: &'k KeywordSet,
    out: Vec<char>,
    folded: Vec<char>,
    // Start of a held match
    held: Option<usize>,
}

impl<'k> Scrubber<'k> {
    fn new(keywords: &'k KeywordSet, capacity: usize) -> Self {
        Self {
            keywords,
            out: Vec::with_capacity(capacity),
            folded: Vec::with_capacity(capacity),
            held: None,
        }
    }

    fn push(&mut self, c: char) {
        self.out.push(c);
        self.folded.push(fold(c));
        match self.held {
            Some(start) => self.resolve_held(start),
            None => self.check_top(),
        }
    }

    fn check_top(&mut self) {
        let Some(len) = self.keywords.longest_suffix(&self.folded) else {
            return;
        };
        let start = self.folded.len() - len;
        if self.keywords.extends(&self.folded[start..]) {
            self.held = Some(start);
        } else {
            self.truncate(start);
        }
    }

    fn resolve_held(&mut self, start: usize) {
        let held = &self.folded[start..];
        if self.keywords.extends(held) {
            return;
        }
        if self.keywords.contains(held) {
            self.held = None;
            self.truncate(start);
        } else {
            self.release(start);
        }
    }

    // Drops the longest keyword at `start` and replays what followed it.
    fn release(&mut self, start: usize) {
        self.held = None;
        // A held match always starts with a keyword
        let skip = self
            .keywords
            .longest_prefix(&self.folded[start..])
            .map_or(1, |(len, _)| len);
        let tail = self.out.split_off(start);
        self.folded.truncate(start);
        for c in tail.into_iter().skip(skip) {
            self.push(c);
        }
    }

    fn truncate(&mut self, len: usize) {
        self.out.truncate(len);
        self.folded.truncate(len);
    }

    fn finish(mut self) -> String {
        while let Some(start) = self.held {
            self.release(start);
        }
        self.out.into_iter().collect()
    }
}

/// Best-effort text filter for when neither whitelisting nor binding is
/// possible.
///
/// This is a fallback, not a defence to rely on. Prefer the
/// [`Validator`](crate::Validator) for names and the
/// [`Binder`](crate::Binder) for values.
///
/// # Algorithm
///
/// 1. Absent or empty input becomes `""`.
/// 2. Every blocked character is removed (`'`, `"`, `` ` ``, `;`, `\` by default).
/// 3. Every keyword is removed case-insensitively wherever it occurs, not only
///    at word boundaries. Text that closes up around a removed keyword is
///    checked again, so `DRDROPOP` does not reassemble into `DROP`. Where two
///    keywords start at the same place the longer one is removed.
/// 4. Leading and trailing whitespace is trimmed.
///
/// All of this is one pass over the input. The work per character is bounded
/// by the keyword lengths, so the cost stays linear however deeply keywords
/// are nested.
///
/// # Known weaknesses
///
/// - A keyword list cannot name every dangerous token of every dialect.
/// - Substring removal corrupts legitimate text: `"Reunion Ltd"` becomes
///   `"Re Ltd"`. Callers that would rather reject such input can check
///   [`find_blocked`](Self::find_blocked) first.
///
/// # Examples
///
/// ```
/// use query_guard::Sanitizer;
///
/// let sanitizer = Sanitizer::default();
/// let cleaned = sanitizer.sanitize("test'; DROP TABLE Account; --");
///
/// assert!(!cleaned.contains('\''));
/// assert!(!cleaned.contains(';'));
/// assert!(!cleaned.to_uppercase().contains("DROP"));
/// ```
#[derive(Debug, Clone)]
pub struct Sanitizer {
    config: SanitizerConfig,
    keywords: KeywordSet,
}

impl Sanitizer {
    /// Creates a sanitizer from a configuration.
    pub fn new(config: SanitizerConfig) -> Self {
        let keywords = KeywordSet::new(&config.keywords);
        Self { config, keywords }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SanitizerConfig {
        &self.config
    }

    /// Cleans `input`. Never fails.
    pub fn sanitize<'a>(&self, input: impl Into<Option<&'a str>>) -> String {
        let input = match input.into() {
            Some(s) if !s.is_empty() => s,
            _ => return String::new(),
        };

        let kept = input
            .chars()
            .filter(|c| !self.config.blocked_chars.contains(c));
        let cleaned: String = if self.keywords.is_empty() {
            kept.collect()
        } else {
            let mut scrubber = Scrubber::new(&self.keywords, input.len());
            kept.for_each(|c| scrubber.push(c));
            scrubber.finish()
        };

        let trimmed = cleaned.trim();
        if trimmed.len() != input.len() {
            tracing::debug!(
                input_len = input.len(),
                output_len = trimmed.len(),
                "sanitizer removed content"
            );
        }
        trimmed.to_string()
    }

    /// Reports the first blocked character or keyword in `text`, if any.
    ///
    /// Characters are checked before keywords, matching the order in which
    /// [`sanitize`](Self::sanitize) removes them.
    pub fn find_blocked(&self, text: &str) -> Option<Blocked> {
        if let Some(c) = text
            .chars()
            .find(|c| self.config.blocked_chars.contains(c))
        {
            return Some(Blocked::Char(c));
        }
        let folded: Vec<char> = text.chars().map(fold).collect();
        (0..folded.len()).find_map(|start| {
            self.keywords
                .longest_prefix(&folded[start..])
                .map(|(_, keyword)| Blocked::Keyword(keyword.to_string()))
        })
    }

    /// Returns `true` if `text` would come out of [`sanitize`](Self::sanitize)
    /// only trimmed.
    pub fn is_clean(&self, text: &str) -> bool {
        self.find_blocked(text).is_none()
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        DEFAULT_SANITIZER.clone()
    }
}
