//! Validated page link graph.

use std::collections::{HashMap, HashSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{LinkGraphError, LinkGraphResult};

/// Internal links of one page.
///
/// Field names follow the camelCase shape crawlers and CMS exports use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageLinkData {
    /// Page URL; must be non-blank and unique within a graph.
    pub url: String,
    /// URLs this page links to.
    pub internal_links_to: Vec<String>,
    /// URLs of pages linking to this page.
    #[serde(default)]
    pub internal_links_from: Vec<String>,
}

impl PageLinkData {
    /// A page with outgoing links and no recorded backlinks.
    pub fn new<S: Into<String>>(url: S, links_to: Vec<String>) -> Self {
        Self {
            url: url.into(),
            internal_links_to: links_to,
            internal_links_from: Vec::new(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum GraphDocument {
    Pages(Vec<PageLinkData>),
    Wrapped { pages: Vec<PageLinkData> },
}

/// A set of pages with non-blank, unique URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinkGraph {
    pages: Vec<PageLinkData>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl LinkGraph {
    /// Validate page records into a graph.
    pub fn new(pages: Vec<PageLinkData>) -> LinkGraphResult<Self> {
        let mut index = HashMap::with_capacity(pages.len());
        for (i, page) in pages.iter().enumerate() {
            if page.url.trim().is_empty() {
                return Err(LinkGraphError::EmptyUrl { index: i });
            }
            if index.insert(page.url.clone(), i).is_some() {
                return Err(LinkGraphError::DuplicateUrl(page.url.clone()));
            }
        }
        Ok(Self { pages, index })
    }

    /// Parse and validate a JSON document.
    ///
    /// Accepts either an array of pages or an object with a `pages` array.
    pub fn from_json(json: &str) -> LinkGraphResult<Self> {
        let pages = match serde_json::from_str::<GraphDocument>(json) {
            Ok(GraphDocument::Pages(pages) | GraphDocument::Wrapped { pages }) => pages,
            // Re-parse strictly so the error names the offending field.
            Err(_) => serde_json::from_str::<Vec<PageLinkData>>(json)?,
        };
        Self::new(pages)
    }

    /// Fill each page's `internal_links_from` from the other pages'
    /// `internal_links_to`, keeping any backlinks already recorded.
    #[must_use]
    pub fn with_inferred_backlinks(mut self) -> Self {
        let mut inferred: Vec<Vec<String>> = vec![Vec::new(); self.pages.len()];
        for page in &self.pages {
            for target in &page.internal_links_to {
                if let Some(&i) = self.index.get(target) {
                    inferred[i].push(page.url.clone());
                }
            }
        }
        for (page, sources) in self.pages.iter_mut().zip(inferred) {
            let mut seen: HashSet<String> = page.internal_links_from.iter().cloned().collect();
            for source in sources {
                if seen.insert(source.clone()) {
                    page.internal_links_from.push(source);
                }
            }
        }
        self
    }

    /// Pages in input order.
    pub fn pages(&self) -> &[PageLinkData] {
        &self.pages
    }

    /// Look up a page by exact URL.
    pub fn get(&self, url: &str) -> Option<&PageLinkData> {
        self.index.get(url).map(|&i| &self.pages[i])
    }

    /// Position of a page in input order.
    pub fn position(&self, url: &str) -> Option<usize> {
        self.index.get(url).copied()
    }

    /// Number of pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether the graph has no pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_array() {
        let graph = LinkGraph::from_json(
            r#"[{"url":"/","internalLinksTo":["/a"],"internalLinksFrom":[]},
                {"url":"/a","internalLinksTo":[]}]"#,
        )
        .unwrap();
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.get("/").unwrap().internal_links_to, vec!["/a"]);
        assert!(graph.get("/a").unwrap().internal_links_from.is_empty());
    }

    #[test]
    fn parses_wrapped_document() {
        let graph =
            LinkGraph::from_json(r#"{"pages":[{"url":"/","internalLinksTo":[]}]}"#).unwrap();
        assert_eq!(graph.position("/"), Some(0));
    }

    #[test]
    fn missing_field_is_parse_error() {
        let err = LinkGraph::from_json(r#"[{"url":"/"}]"#).unwrap_err();
        assert!(matches!(err, LinkGraphError::Parse(_)));
        assert!(err.to_string().contains("internalLinksTo"), "{err}");
    }

    #[test]
    fn rejects_blank_and_duplicate_urls() {
        let blank = LinkGraph::new(vec![
            PageLinkData::new("/", vec![]),
            PageLinkData::new("  ", vec![]),
        ]);
        assert!(matches!(blank, Err(LinkGraphError::EmptyUrl { index: 1 })));

        let dup = LinkGraph::new(vec![
            PageLinkData::new("/a", vec![]),
            PageLinkData::new("/a", vec![]),
        ]);
        assert!(matches!(dup, Err(LinkGraphError::DuplicateUrl(url)) if url == "/a"));
    }

    #[test]
    fn infers_backlinks_without_duplicates() {
        let mut about = PageLinkData::new("/about", vec![]);
        about.internal_links_from = vec!["/".to_string()];
        let graph = LinkGraph::new(vec![
            PageLinkData::new("/", vec!["/about".to_string(), "/blog".to_string()]),
            about,
            PageLinkData::new("/blog", vec!["/about".to_string(), "/external".to_string()]),
        ])
        .unwrap()
        .with_inferred_backlinks();

        assert_eq!(graph.get("/about").unwrap().internal_links_from, vec!["/", "/blog"]);
        assert_eq!(graph.get("/blog").unwrap().internal_links_from, vec!["/"]);
        assert!(graph.get("/").unwrap().internal_links_from.is_empty());
    }
}
