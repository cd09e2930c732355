//! EasyList-format block list parsing.
//!
//! Only network rules that name a whole host are kept: `||host^` rules,
//! hosts-file lines and bare domain lines. Everything else (cosmetic filters,
//! path patterns, allow rules) is skipped. Parsing never fails; a line that
//! does not fit one of the recognized shapes contributes nothing.

use std::collections::HashSet;

/// What a single list line contributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// `||domain^...`
    BlockRule(String),
    /// `0.0.0.0 domain` or `127.0.0.1 domain`
    HostsEntry(String),
    /// `domain` or `||domain` without a path.
    PlainDomain(String),
    Skip,
}

impl LineKind {
    pub fn domain(&self) -> Option<&str> {
        match self {
            LineKind::BlockRule(d) | LineKind::HostsEntry(d) | LineKind::PlainDomain(d) => Some(d),
            LineKind::Skip => None,
        }
    }
}

/// Parses a whole list into its set of blocked domains.
pub fn parse(text: &str) -> HashSet<String> {
    text.lines()
        .map(classify_line)
        .filter_map(|kind| kind.domain().map(str::to_string))
        .collect()
}

/// Classifies one raw line. Recognized domains come back already cleaned.
pub fn classify_line(raw: &str) -> LineKind {
    let line = raw.trim();
    if line.is_empty() || line.starts_with('!') || line.starts_with("@@") {
        return LineKind::Skip;
    }

    if let Some(candidate) = block_rule_domain(line) {
        return clean_domain(candidate).map_or(LineKind::Skip, LineKind::BlockRule);
    }

    if let Some(candidate) = hosts_entry_domain(line) {
        return clean_domain(candidate).map_or(LineKind::Skip, LineKind::HostsEntry);
    }

    if !line.contains('/') {
        let bare = line.strip_prefix("||").unwrap_or(line);
        if looks_like_domain(bare) {
            return clean_domain(bare).map_or(LineKind::Skip, LineKind::PlainDomain);
        }
    }

    LineKind::Skip
}

/// `||` followed by at least one char outside `^ / * :`, then `^`.
fn block_rule_domain(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("||")?;
    let end = rest.find(|c: char| matches!(c, '^' | '/' | '*' | ':'))?;
    if end == 0 || !rest[end..].starts_with('^') {
        return None;
    }
    Some(&rest[..end])
}

fn hosts_entry_domain(line: &str) -> Option<&str> {
    let rest = line
        .strip_prefix("0.0.0.0")
        .or_else(|| line.strip_prefix("127.0.0.1"))?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let candidate = rest.trim_start();
    if looks_like_domain(candidate) {
        Some(candidate)
    } else {
        None
    }
}

/// Chars in `[a-z0-9.-]` (any case), with a final label of two or more
/// letters preceded by at least one char.
fn looks_like_domain(s: &str) -> bool {
    if !s
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        return false;
    }
    match s.rfind('.') {
        Some(dot) if dot > 0 => {
            let tld = &s[dot + 1..];
            tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
        }
        _ => false,
    }
}

/// Strips surrounding dots and lowercases; rejects leftovers with wildcards or separators.
pub fn clean_domain(value: &str) -> Option<String> {
    let trimmed = value.trim_matches('.').to_lowercase();
    if trimmed.is_empty() || trimmed.contains('*') || trimmed.contains('^') {
        return None;
    }
    Some(trimmed)
}
