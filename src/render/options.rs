//! Rendering options and page selection.

use std::ops::RangeInclusive;

use crate::error::{Error, Result};

/// Separator inserted between the Markdown of two non-empty pages.
pub const PAGE_SEPARATOR: &str = "\n\n---\n\n";

/// Options for joining rendered pages.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Text placed between two non-empty pages
    pub page_separator: String,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page separator.
    pub fn with_page_separator(mut self, separator: impl Into<String>) -> Self {
        self.page_separator = separator.into();
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            page_separator: PAGE_SEPARATOR.to_string(),
        }
    }
}

/// Which pages to convert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// All pages
    #[default]
    All,
    /// A range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Specific pages (1-indexed)
    Pages(Vec<u32>),
    /// Sorted, non-overlapping ranges (inclusive, 1-indexed)
    Ranges(Vec<RangeInclusive<u32>>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
            PageSelection::Ranges(ranges) => ranges.iter().any(|r| r.contains(&page)),
        }
    }

    /// Number of selected pages past the end of a `page_count`-page document.
    pub fn beyond(&self, page_count: u32) -> u64 {
        let past = |r: &RangeInclusive<u32>| {
            let first = u64::from(*r.start()).max(u64::from(page_count) + 1);
            (u64::from(*r.end()) + 1).saturating_sub(first)
        };
        match self {
            PageSelection::All => 0,
            PageSelection::Range(range) => past(range),
            PageSelection::Pages(pages) => {
                pages.iter().filter(|&&p| p > page_count).count() as u64
            }
            PageSelection::Ranges(ranges) => ranges.iter().map(past).sum(),
        }
    }

    /// Selected page numbers of a document with `page_count` pages, in
    /// ascending order.
    pub fn resolve(&self, page_count: u32) -> Vec<u32> {
        (1..=page_count).filter(|&p| self.includes(p)).collect()
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10").
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.is_empty() || s == "all" {
            return Ok(PageSelection::All);
        }

        if !s.contains(',') {
            if let Some((start, end)) = s.split_once('-') {
                let (start, end) = (parse_page(start, s)?, parse_page(end, s)?);
                return range(start, end, s).map(PageSelection::Range);
            }
        }

        let mut parts = Vec::new();
        for part in s.split(',') {
            let part = match part.split_once('-') {
                Some((start, end)) => range(parse_page(start, s)?, parse_page(end, s)?, s)?,
                None => {
                    let page = parse_page(part, s)?;
                    page..=page
                }
            };
            parts.push(part);
        }

        parts.sort_unstable_by_key(|r| *r.start());
        let mut ranges: Vec<RangeInclusive<u32>> = Vec::with_capacity(parts.len());
        for part in parts {
            match ranges.last_mut() {
                Some(last) if *part.start() <= last.end().saturating_add(1) => {
                    let end = (*last.end()).max(*part.end());
                    *last = *last.start()..=end;
                }
                _ => ranges.push(part),
            }
        }
        Ok(PageSelection::Ranges(ranges))
    }
}

fn parse_page(part: &str, whole: &str) -> Result<u32> {
    match part.trim().parse::<u32>() {
        Ok(0) | Err(_) => Err(Error::InvalidPageRange(whole.to_string())),
        Ok(page) => Ok(page),
    }
}

fn range(start: u32, end: u32, whole: &str) -> Result<RangeInclusive<u32>> {
    if start > end {
        return Err(Error::InvalidPageRange(whole.to_string()));
    }
    Ok(start..=end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_separator() {
        assert_eq!(RenderOptions::default().page_separator, "\n\n---\n\n");
        let opts = RenderOptions::new().with_page_separator("\n\n");
        assert_eq!(opts.page_separator, "\n\n");
    }

    #[test]
    fn test_parse_all() {
        assert_eq!(PageSelection::parse("").unwrap(), PageSelection::All);
        assert_eq!(PageSelection::parse("all").unwrap(), PageSelection::All);
    }

    #[test]
    fn test_parse_range() {
        let sel = PageSelection::parse("2-4").unwrap();
        assert_eq!(sel, PageSelection::Range(2..=4));
        assert_eq!(sel.resolve(10), vec![2, 3, 4]);
        assert_eq!(sel.resolve(3), vec![2, 3]);
    }

    #[test]
    fn test_parse_list() {
        let sel = PageSelection::parse("5, 1,3-4,3").unwrap();
        assert_eq!(sel, PageSelection::Ranges(vec![1..=1, 3..=5]));
        assert!(sel.includes(4));
        assert!(!sel.includes(2));
        assert_eq!(sel.resolve(4), vec![1, 3, 4]);
    }

    #[test]
    fn test_parse_huge_range_is_not_expanded() {
        let sel = PageSelection::parse("2,1-4000000000").unwrap();
        assert_eq!(sel, PageSelection::Ranges(vec![1..=4_000_000_000]));
        assert_eq!(sel.resolve(3), vec![1, 2, 3]);
        assert_eq!(sel.beyond(3), 3_999_999_997);
    }

    #[test]
    fn test_beyond_counts_pages_past_the_end() {
        assert_eq!(PageSelection::All.beyond(3), 0);
        assert_eq!(PageSelection::Range(2..=4).beyond(10), 0);
        assert_eq!(PageSelection::Range(2..=6).beyond(3), 3);
        assert_eq!(PageSelection::Range(5..=6).beyond(3), 2);
        assert_eq!(PageSelection::Range(1..=u32::MAX).beyond(0), u64::from(u32::MAX));
        assert_eq!(PageSelection::Pages(vec![3, 7, 9]).beyond(5), 2);
        assert_eq!(PageSelection::parse("1,4-5,9").unwrap().beyond(4), 2);
    }

    #[test]
    fn test_parse_invalid() {
        for bad in ["x", "0", "3-1", "1,,2", "1-b"] {
            assert!(
                matches!(PageSelection::parse(bad), Err(Error::InvalidPageRange(_))),
                "{bad}"
            );
        }
    }
}
