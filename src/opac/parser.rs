//! OPAC search-result parser
//!
//! The search result page carries the bibliographic record as a two-column
//! table (`table#td`) of Chinese field labels and values. The markup is
//! externally dictated and treated as untrusted: everything here is
//! best-effort, and only the absence of the table itself (a format change
//! or an error page) aborts the parse.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashMap;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static PUBDATE: Lazy<Regex> = Lazy::new(|| Regex::new(r",\s*(\d{4})").unwrap());
static PUBLISHER: Lazy<Regex> = Lazy::new(|| Regex::new(r":\s*(.+?)\s*,").unwrap());
static TAG_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-—–&]+").unwrap());
static AUTHOR_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[;&]").unwrap());

/// Field labels used by the NLC record table
const LABEL_TITLE: &str = "题名与责任";
const LABEL_AUTHOR: &str = "著者";
const LABEL_PUBLICATION: &str = "出版项";
const LABEL_SUBJECT: &str = "主题";
const LABEL_CLASS: &str = "中图分类号";
const LABEL_COLLATION: &str = "载体形态项";
const LABEL_ABSTRACT: &str = "内容提要";

/// Intermediate parser output, consumed immediately by the normalizer.
///
/// Missing source fields stay empty; the record is never rejected here for
/// incompleteness.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawMetadata {
    /// Title/responsibility line, falling back to the ISBN itself
    pub title: String,
    /// Subject terms followed by synthesized classification, publisher and
    /// year tags, in that order
    pub tags: Vec<String>,
    /// Abstract text
    pub comments: String,
    pub publisher: String,
    /// 4-digit publication year as found in the publication line
    pub pubdate: String,
    pub authors: Vec<String>,
    pub isbn: String,
    /// Verbatim format/collation line, e.g. "208页 ; 23cm"
    pub pages: String,
}

/// Collapse whitespace runs (including non-breaking spaces) to single
/// spaces and trim.
fn clean_string(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

/// Parse the OPAC result markup into a [`RawMetadata`].
///
/// Returns `None` only when the result table is missing entirely.
pub fn parse(html: &str, isbn: &str) -> Option<RawMetadata> {
    let document = Html::parse_document(html);
    let table_selector = Selector::parse("table#td").ok()?;
    let row_selector = Selector::parse("tr").ok()?;
    let cell_selector = Selector::parse("td.td1").ok()?;

    // Structural marker; its absence means the markup changed or the OPAC
    // returned an error page.
    let table = document.select(&table_selector).next()?;

    let mut data: HashMap<String, String> = HashMap::new();
    let mut prev_label = String::new();

    for row in table.select(&row_selector) {
        let cells: Vec<_> = row.select(&cell_selector).collect();
        if cells.len() != 2 {
            continue;
        }
        let label = clean_string(&cells[0].text().collect::<String>());
        let value = clean_string(&cells[1].text().collect::<String>());
        if label.is_empty() && value.is_empty() {
            continue;
        }
        if !label.is_empty() {
            data.insert(label.clone(), value);
            prev_label = label;
        } else if !prev_label.is_empty() {
            // Continuation row: the table sometimes wraps a long value over
            // several rows with an empty label cell. Heuristic over
            // inconsistent markup; may misattribute text if the layout
            // changes.
            if let Some(existing) = data.get_mut(&prev_label) {
                existing.push('\n');
                existing.push_str(&value);
            }
        }
    }

    let pub_info = data.get(LABEL_PUBLICATION).cloned().unwrap_or_default();
    let pubdate = PUBDATE
        .captures(&pub_info)
        .map(|c| c[1].to_string())
        .unwrap_or_default();
    let publisher = PUBLISHER
        .captures(&pub_info)
        .map(|c| c[1].to_string())
        .unwrap_or_default();

    let mut tags: Vec<String> = Vec::new();
    if let Some(subject) = data.get(LABEL_SUBJECT) {
        tags.extend(
            TAG_SPLIT
                .split(subject)
                .map(clean_string)
                .filter(|t| !t.is_empty()),
        );
    }
    if let Some(class_num) = data.get(LABEL_CLASS) {
        let class_num = clean_string(class_num);
        if !class_num.is_empty() {
            tags.push(format!("中图分类:{}", class_num));
        }
    }
    if !publisher.is_empty() {
        tags.push(format!("出版社:{}", publisher));
    }
    if !pubdate.is_empty() {
        tags.push(format!("出版年:{}", pubdate));
    }

    let authors = data
        .get(LABEL_AUTHOR)
        .map(|text| {
            AUTHOR_SPLIT
                .split(text)
                .map(clean_string)
                .filter(|a| !a.is_empty())
                .collect()
        })
        .unwrap_or_default();

    Some(RawMetadata {
        title: data
            .get(LABEL_TITLE)
            .map(|t| clean_string(t))
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| isbn.to_string()),
        tags,
        comments: data.get(LABEL_ABSTRACT).cloned().unwrap_or_default(),
        publisher,
        pubdate,
        authors,
        isbn: isbn.to_string(),
        pages: data.get(LABEL_COLLATION).cloned().unwrap_or_default(),
    })
}
