//! Tokenizer for a single `Set-Cookie` header value.
//!
//! The grammar is the permissive one browsers actually implement rather than
//! the one in the RFCs: a bare value is a nameless cookie, quotes are kept
//! verbatim, and `;` always ends a value.

/// Longest `Set-Cookie` line we are willing to parse.
pub const MAX_COOKIE_SIZE: usize = 4096;

/// Number of name/value pairs parsed from one line, including the cookie's
/// own pair. The rest of the line is ignored.
pub const MAX_PAIRS: usize = 16;

const PATH: &str = "path";
const DOMAIN: &str = "domain";
const EXPIRES: &str = "expires";
const MAX_AGE: &str = "max-age";
const SECURE: &str = "secure";
const HTTP_ONLY: &str = "httponly";

const TERMINATORS: &[char] = &['\n', '\r', '\0'];

fn is_whitespace(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// A parsed, but not yet validated, `Set-Cookie` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCookie {
    pairs: Vec<(String, String)>,
    path_index: Option<usize>,
    domain_index: Option<usize>,
    expires_index: Option<usize>,
    max_age_index: Option<usize>,
    secure_index: Option<usize>,
    http_only_index: Option<usize>,
    too_large: bool,
}

impl ParsedCookie {
    pub fn new(cookie_line: &str) -> Self {
        let mut parsed = Self {
            pairs: Vec::new(),
            path_index: None,
            domain_index: None,
            expires_index: None,
            max_age_index: None,
            secure_index: None,
            http_only_index: None,
            too_large: false,
        };

        if cookie_line.len() > MAX_COOKIE_SIZE {
            tracing::debug!(size = cookie_line.len(), "not parsing cookie, too large");
            parsed.too_large = true;
            return parsed;
        }

        parsed.pairs = parse_pairs(cookie_line);
        parsed.setup_attributes();
        parsed
    }

    fn setup_attributes(&mut self) {
        // Pair 0 is the cookie itself. Later duplicates override earlier ones.
        for (i, (key, _)) in self.pairs.iter().enumerate().skip(1) {
            let slot = match key.as_str() {
                PATH => &mut self.path_index,
                DOMAIN => &mut self.domain_index,
                EXPIRES => &mut self.expires_index,
                MAX_AGE => &mut self.max_age_index,
                SECURE => &mut self.secure_index,
                HTTP_ONLY => &mut self.http_only_index,
                _ => continue,
            };
            *slot = Some(i);
        }
    }

    /// A line is valid when it produced at least one pair and was within the
    /// size limit.
    pub fn is_valid(&self) -> bool {
        !self.pairs.is_empty()
    }

    /// Whether the line was rejected for exceeding [`MAX_COOKIE_SIZE`].
    pub fn is_too_large(&self) -> bool {
        self.too_large
    }

    pub fn name(&self) -> &str {
        self.pairs.first().map_or("", |(name, _)| name.as_str())
    }

    pub fn value(&self) -> &str {
        self.pairs.first().map_or("", |(_, value)| value.as_str())
    }

    fn attribute(&self, index: Option<usize>) -> Option<&str> {
        index.map(|i| self.pairs[i].1.as_str())
    }

    pub fn has_path(&self) -> bool {
        self.path_index.is_some()
    }

    pub fn path(&self) -> Option<&str> {
        self.attribute(self.path_index)
    }

    pub fn has_domain(&self) -> bool {
        self.domain_index.is_some()
    }

    pub fn domain(&self) -> Option<&str> {
        self.attribute(self.domain_index)
    }

    pub fn has_expires(&self) -> bool {
        self.expires_index.is_some()
    }

    pub fn expires(&self) -> Option<&str> {
        self.attribute(self.expires_index)
    }

    pub fn has_max_age(&self) -> bool {
        self.max_age_index.is_some()
    }

    pub fn max_age(&self) -> Option<&str> {
        self.attribute(self.max_age_index)
    }

    pub fn is_secure(&self) -> bool {
        self.secure_index.is_some()
    }

    pub fn is_http_only(&self) -> bool {
        self.http_only_index.is_some()
    }

    /// Number of pairs after the cookie's own, recognized or not. Empty
    /// segments (`;;`) count too.
    pub fn number_of_attributes(&self) -> usize {
        self.pairs.len().saturating_sub(1)
    }

    /// All pairs in the order they appeared; attribute keys are lower-cased.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }
}

fn parse_pairs(cookie_line: &str) -> Vec<(String, String)> {
    let line = match cookie_line.find(TERMINATORS) {
        Some(end) => &cookie_line[..end],
        None => cookie_line,
    };

    let mut pairs = Vec::new();
    let mut rest = line;

    while pairs.len() < MAX_PAIRS {
        rest = rest.trim_start_matches(is_whitespace);
        if rest.is_empty() {
            break;
        }

        let pair_num = pairs.len();
        let token_len = rest.find(&[';', '='][..]).unwrap_or(rest.len());
        let has_equals = rest[token_len..].starts_with('=');

        let (mut key, value_start) = if has_equals {
            (rest[..token_len].trim_end_matches(is_whitespace).to_string(), token_len + 1)
        } else if pair_num == 0 {
            // A lone value on the first pair is a nameless cookie.
            (String::new(), 0)
        } else {
            // A lone token on an attribute is a name without a value.
            (rest[..token_len].trim_end_matches(is_whitespace).to_string(), token_len)
        };

        let after_key = rest[value_start..].trim_start_matches(is_whitespace);
        let value_len = after_key.find(';').unwrap_or(after_key.len());
        let value = after_key[..value_len].trim_end_matches(is_whitespace).to_string();

        if pair_num != 0 {
            key.make_ascii_lowercase();
        }
        pairs.push((key, value));

        rest = &after_key[value_len..];
        // Step over the ';' separator.
        rest = rest.strip_prefix(';').unwrap_or(rest);
    }

    pairs
}
