use chrono::{Datelike, Duration, Local, NaiveDate};
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;

use crate::types::{BoardTree, Card};

/// A card matched by a query, with where it lives.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardHit {
    pub workspace_id: String,
    pub board_id: String,
    pub board_title: String,
    pub list_id: String,
    pub list_title: String,
    pub card_id: String,
    pub card_title: String,
    pub position: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueFilter {
    Any,
    None,
    Overdue,
    Today,
    Week,
}

#[derive(Debug)]
enum SearchTerm {
    Text(String),
    Tag(String),
    Board(String),
    List(String),
    Assignee(String),
    IsDone(bool),
    Due(DueFilter),
    DueDate(NaiveDate),
    Regex(Regex),
}

#[derive(Debug)]
struct ParsedTerm {
    negate: bool,
    term: SearchTerm,
}

/// A compiled card query. All terms must match; `-term` negates one.
///
/// Syntax: free text, `"quoted phrase"`, `#tag`, `@member`, `board:`,
/// `list:`/`col:`, `is:done|open`, `due:any|none|overdue|today|week|YYYY-MM-DD`
/// and `/regex/`.
#[derive(Debug)]
pub struct SearchQuery {
    terms: Vec<ParsedTerm>,
    today: NaiveDate,
}

struct CardContext<'a> {
    board_title: &'a str,
    list_title: &'a str,
    card: &'a Card,
}

impl SearchQuery {
    pub fn parse(raw_query: &str) -> Self {
        Self::parse_at(raw_query, Local::now().date_naive())
    }

    /// Parse with an explicit "today", for date-relative filters.
    pub fn parse_at(raw_query: &str, today: NaiveDate) -> Self {
        let terms = split_query_tokens(raw_query.trim())
            .into_iter()
            .filter_map(|token| parse_token(&token))
            .collect();
        Self { terms, today }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    fn matches(&self, ctx: &CardContext<'_>) -> bool {
        self.terms.iter().all(|parsed| {
            let matched = self.matches_term(&parsed.term, ctx);
            matched != parsed.negate
        })
    }

    fn matches_term(&self, term: &SearchTerm, ctx: &CardContext<'_>) -> bool {
        let card = ctx.card;
        match term {
            SearchTerm::Text(value) => {
                contains_text(&card.title, value)
                    || card
                        .description
                        .as_deref()
                        .map(|d| contains_text(d, value))
                        .unwrap_or(false)
            }
            SearchTerm::Tag(value) => card_tags(card).iter().any(|tag| tag == value),
            SearchTerm::Board(value) => contains_text(ctx.board_title, value),
            SearchTerm::List(value) => contains_text(ctx.list_title, value),
            SearchTerm::Assignee(value) => card
                .assignees
                .iter()
                .any(|member| normalize_for_search(member) == *value),
            SearchTerm::IsDone(done) => card.is_complete() == *done,
            SearchTerm::Due(filter) => self.matches_due(*filter, card),
            SearchTerm::DueDate(date) => card.due_date == Some(*date),
            SearchTerm::Regex(regex) => {
                regex.is_match(&card.title)
                    || card
                        .description
                        .as_deref()
                        .map(|d| regex.is_match(d))
                        .unwrap_or(false)
            }
        }
    }

    fn matches_due(&self, filter: DueFilter, card: &Card) -> bool {
        let week_start =
            self.today - Duration::days(self.today.weekday().num_days_from_monday() as i64);
        let week_end = week_start + Duration::days(6);
        match filter {
            DueFilter::Any => card.due_date.is_some(),
            DueFilter::None => card.due_date.is_none(),
            DueFilter::Overdue => card.is_overdue(self.today),
            DueFilter::Today => card.due_date == Some(self.today),
            DueFilter::Week => card
                .due_date
                .map(|d| d >= week_start && d <= week_end)
                .unwrap_or(false),
        }
    }
}

/// Every card in the tree matching `query`, in tree order.
/// An empty query matches nothing.
pub fn search_cards(tree: &BoardTree, query: &SearchQuery) -> Vec<CardHit> {
    if query.is_empty() {
        return Vec::new();
    }

    let mut hits = Vec::new();
    for workspace in &tree.workspaces {
        for board in &workspace.boards {
            for list in &board.lists {
                for card in &list.cards {
                    let ctx = CardContext {
                        board_title: &board.title,
                        list_title: &list.title,
                        card,
                    };
                    if query.matches(&ctx) {
                        hits.push(CardHit {
                            workspace_id: workspace.id.clone(),
                            board_id: board.id.clone(),
                            board_title: board.title.clone(),
                            list_id: list.id.clone(),
                            list_title: list.title.clone(),
                            card_id: card.id.clone(),
                            card_title: card.title.clone(),
                            position: card.position,
                        });
                    }
                }
            }
        }
    }
    hits
}

fn split_query_tokens(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in input.chars() {
        if ch == '"' {
            in_quotes = !in_quotes;
            if !in_quotes && !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            continue;
        }
        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            continue;
        }
        current.push(ch);
    }

    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn parse_token(raw_token: &str) -> Option<ParsedTerm> {
    let token = raw_token.trim();
    let (negate, token) = match token.strip_prefix('-') {
        Some(rest) if !rest.is_empty() => (true, rest),
        _ => (false, token),
    };
    if token.is_empty() {
        return None;
    }

    let term = if token.starts_with('#') {
        SearchTerm::Tag(normalize_for_search(token))
    } else if let Some(member) = token.strip_prefix('@') {
        SearchTerm::Assignee(normalize_for_search(member))
    } else if token.len() > 2 && token.starts_with('/') && token.ends_with('/') {
        match Regex::new(&token[1..token.len() - 1]) {
            Ok(regex) => SearchTerm::Regex(regex),
            Err(_) => SearchTerm::Text(normalize_for_search(token)),
        }
    } else if let Some(term) = parse_keyed(token) {
        term
    } else {
        SearchTerm::Text(normalize_for_search(token))
    };

    Some(ParsedTerm { negate, term })
}

fn parse_keyed(token: &str) -> Option<SearchTerm> {
    let (key, value) = token.split_once(':')?;
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    match key.to_ascii_lowercase().as_str() {
        "board" => Some(SearchTerm::Board(normalize_for_search(value))),
        "list" | "col" | "column" => Some(SearchTerm::List(normalize_for_search(value))),
        "is" => match value.to_ascii_lowercase().as_str() {
            "done" | "complete" => Some(SearchTerm::IsDone(true)),
            "open" | "todo" => Some(SearchTerm::IsDone(false)),
            _ => None,
        },
        "due" => match value.to_ascii_lowercase().as_str() {
            "any" => Some(SearchTerm::Due(DueFilter::Any)),
            "none" => Some(SearchTerm::Due(DueFilter::None)),
            "overdue" => Some(SearchTerm::Due(DueFilter::Overdue)),
            "today" => Some(SearchTerm::Due(DueFilter::Today)),
            "week" => Some(SearchTerm::Due(DueFilter::Week)),
            other => NaiveDate::parse_from_str(other, "%Y-%m-%d")
                .ok()
                .map(SearchTerm::DueDate),
        },
        "re" | "regex" => Regex::new(value).ok().map(SearchTerm::Regex),
        _ => None,
    }
}

/// Lowercases, NFD-decomposes and strips combining marks, so "resume"
/// matches "résumé".
fn normalize_for_search(value: &str) -> String {
    value
        .to_lowercase()
        .nfd()
        .filter(|c| !unicode_normalization::char::is_combining_mark(*c))
        .collect()
}

fn contains_text(haystack: &str, needle: &str) -> bool {
    normalize_for_search(haystack).contains(needle)
}

fn hash_tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:^|\s)(#[^\s#@]+)").expect("valid hash tag regex"))
}

/// Normalized `#tags` found in a card's title and description.
fn card_tags(card: &Card) -> Vec<String> {
    let mut tags = Vec::new();
    let sources = std::iter::once(card.title.as_str()).chain(card.description.as_deref());
    for text in sources {
        for captures in hash_tag_regex().captures_iter(text) {
            if let Some(raw) = captures.get(1) {
                let tag = normalize_for_search(
                    raw.as_str()
                        .trim_end_matches(|c: char| ",.;:)".contains(c)),
                );
                if !tags.contains(&tag) {
                    tags.push(tag);
                }
            }
        }
    }
    tags
}
