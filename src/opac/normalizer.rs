//! Raw metadata to book record normalization
//!
//! Maps the loose OPAC fields onto the fixed `books` schema: splits the
//! title/responsibility line, joins authors, derives the classification
//! facets from the tag sequence and truncates everything to its column
//! limit. Character-based truncation, since the source is mostly CJK text.

use crate::models::book::{limits, Book};
use crate::opac::parser::RawMetadata;

/// Truncate to at most `max` characters.
fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Extract the translator name from a title/responsibility tail of the
/// form "... / 著者名著;译者名译". Best-effort: empty on any miss.
fn extract_translator(title: &str) -> String {
    let responsibility = match title.split_once(" / ") {
        Some((_, r)) => r,
        None => return String::new(),
    };
    let tail = match responsibility.rsplit_once(';') {
        Some((_, t)) => t,
        None => return String::new(),
    };
    match tail.split_once('译') {
        Some((name, _)) => name.trim().to_string(),
        None => String::new(),
    }
}

/// Parse the page count from a collation line such as "208页 ; 23cm" or
/// "208 pages ; 23cm". The leading integer only counts when a page marker
/// follows it; a bare dimension like "23cm" is not a page count. 0 when
/// absent or unparseable.
fn parse_page_count(pages: &str) -> i32 {
    let trimmed = pages.trim_start();
    let digits: String = trimmed
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return 0;
    }
    let rest = trimmed[digits.len()..].trim_start();
    if rest.starts_with('页') || rest.starts_with("page") {
        digits.parse().unwrap_or(0)
    } else {
        0
    }
}

fn parse_publish_year(pubdate: &str) -> Option<i32> {
    let year: i32 = pubdate.trim().parse().ok()?;
    (1800..=2100).contains(&year).then_some(year)
}

/// Normalize parsed metadata into a storage-ready [`Book`].
///
/// Returns `None` when the ISBN or title end up empty: the record is then
/// considered insufficient, which callers surface as an acquisition
/// failure rather than storing a husk.
pub fn normalize(meta: &RawMetadata) -> Option<Book> {
    // Everything before " / " is the title proper; the rest is the
    // responsibility statement.
    let title = meta
        .title
        .split(" / ")
        .next()
        .unwrap_or(&meta.title)
        .to_string();

    let translator = extract_translator(&meta.title);

    let tag = |i: usize| meta.tags.get(i).map(String::as_str).unwrap_or("");
    // The 4th tag is the synthesized "中图分类:<code>" entry
    let opac_nlc_class = meta
        .tags
        .get(3)
        .and_then(|t| t.rsplit(':').next())
        .map(str::trim)
        .unwrap_or("");

    let book = Book {
        isbn: meta.isbn.clone(),
        title: truncate(&title, limits::TITLE),
        author: truncate(&meta.authors.join("；"), limits::AUTHOR),
        translator: truncate(&translator, limits::TRANSLATOR),
        genre: truncate(tag(0), limits::GENRE),
        country: truncate(tag(1), limits::COUNTRY),
        era: truncate(tag(2), limits::ERA),
        opac_nlc_class: truncate(opac_nlc_class, limits::OPAC_NLC_CLASS),
        publisher: truncate(&meta.publisher, limits::PUBLISHER),
        publish_year: parse_publish_year(&meta.pubdate),
        page: parse_page_count(&meta.pages),
        // Covers come from a separate upload flow, never from the OPAC
        cover_url: String::new(),
        description: truncate(&meta.comments, limits::DESCRIPTION),
    };

    if book.isbn.is_empty() || book.title.is_empty() {
        return None;
    }
    Some(book)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> RawMetadata {
        RawMetadata {
            title: "活着 / 余华著".to_string(),
            tags: vec![
                "长篇小说".to_string(),
                "中国".to_string(),
                "当代".to_string(),
                "中图分类:I247.57".to_string(),
                "出版社:作家出版社".to_string(),
                "出版年:2012".to_string(),
            ],
            comments: "一部关于生存的小说".to_string(),
            publisher: "作家出版社".to_string(),
            pubdate: "2012".to_string(),
            authors: vec!["余华".to_string(), "张三".to_string()],
            isbn: "9787506365437".to_string(),
            pages: "208页 ; 23cm".to_string(),
        }
    }

    #[test]
    fn maps_all_fields() {
        let book = normalize(&meta()).unwrap();
        assert_eq!(book.isbn, "9787506365437");
        assert_eq!(book.title, "活着");
        assert_eq!(book.author, "余华；张三");
        assert_eq!(book.translator, "");
        assert_eq!(book.genre, "长篇小说");
        assert_eq!(book.country, "中国");
        assert_eq!(book.era, "当代");
        assert_eq!(book.opac_nlc_class, "I247.57");
        assert_eq!(book.publisher, "作家出版社");
        assert_eq!(book.publish_year, Some(2012));
        assert_eq!(book.page, 208);
        assert_eq!(book.cover_url, "");
        assert_eq!(book.description, "一部关于生存的小说");
    }

    #[test]
    fn empty_title_fails_normalization() {
        let mut m = meta();
        m.title = String::new();
        assert_eq!(normalize(&m), None);
    }

    #[test]
    fn empty_isbn_fails_normalization() {
        let mut m = meta();
        m.isbn = String::new();
        assert_eq!(normalize(&m), None);
    }

    #[test]
    fn long_title_truncates_to_100_chars() {
        let mut m = meta();
        m.title = "甲".repeat(150);
        let book = normalize(&m).unwrap();
        assert_eq!(book.title.chars().count(), 100);
        assert_eq!(book.title, "甲".repeat(100));
    }

    #[test]
    fn tag_positions_map_to_facets() {
        let mut m = meta();
        m.tags = vec![
            "Fiction".to_string(),
            "France".to_string(),
            "Modern".to_string(),
            "Class:TS201".to_string(),
        ];
        let book = normalize(&m).unwrap();
        assert_eq!(book.genre, "Fiction");
        assert_eq!(book.country, "France");
        assert_eq!(book.era, "Modern");
        assert_eq!(book.opac_nlc_class, "TS201");
    }

    #[test]
    fn missing_tags_degrade_to_empty() {
        let mut m = meta();
        m.tags = vec!["长篇小说".to_string()];
        let book = normalize(&m).unwrap();
        assert_eq!(book.genre, "长篇小说");
        assert_eq!(book.country, "");
        assert_eq!(book.era, "");
        assert_eq!(book.opac_nlc_class, "");
    }

    #[test]
    fn translator_extracted_from_responsibility_tail() {
        let mut m = meta();
        m.title = "百年孤独 / (哥伦比亚)马尔克斯著;范晔译".to_string();
        let book = normalize(&m).unwrap();
        assert_eq!(book.title, "百年孤独");
        assert_eq!(book.translator, "范晔");
    }

    #[test]
    fn no_translator_without_responsibility_statement() {
        let mut m = meta();
        m.title = "活着".to_string();
        let book = normalize(&m).unwrap();
        assert_eq!(book.translator, "");
    }

    #[test]
    fn translator_pattern_miss_yields_empty() {
        let mut m = meta();
        // Tail lacks the 译 marker
        m.title = "某书 / 张三著;李四校".to_string();
        assert_eq!(normalize(&m).unwrap().translator, "");
    }

    #[test]
    fn page_count_handles_western_collation() {
        let mut m = meta();
        m.pages = "208 pages ; 23cm".to_string();
        assert_eq!(normalize(&m).unwrap().page, 208);
        m.pages = "精装".to_string();
        assert_eq!(normalize(&m).unwrap().page, 0);
        m.pages = String::new();
        assert_eq!(normalize(&m).unwrap().page, 0);
    }

    #[test]
    fn leading_integer_without_page_marker_is_not_a_page_count() {
        let mut m = meta();
        // A dimensions-only collation line must not be read as 23 pages
        m.pages = "23cm".to_string();
        assert_eq!(normalize(&m).unwrap().page, 0);
        m.pages = "3册 ; 21cm".to_string();
        assert_eq!(normalize(&m).unwrap().page, 0);
    }

    #[test]
    fn publish_year_outside_bounds_is_dropped() {
        let mut m = meta();
        m.pubdate = "1573".to_string();
        assert_eq!(normalize(&m).unwrap().publish_year, None);
        m.pubdate = "not-a-year".to_string();
        assert_eq!(normalize(&m).unwrap().publish_year, None);
    }
}
