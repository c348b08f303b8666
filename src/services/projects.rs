// src/services/projects.rs

//! HTML extraction for the index and detail pages.
//!
//! Both functions are synchronous: `scraper::Html` is not `Send`, so the
//! document is parsed and dropped before the caller awaits anything.

use scraper::{ElementRef, Html};
use url::Url;

use crate::models::CompiledSelectors;
use crate::utils::{normalize_whitespace, resolve_href};

/// A project anchor found on the index page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLink {
    pub name: String,
    pub url: String,
}

/// Extract every project anchor from the index page.
///
/// Hrefs are resolved against the document's `<base href>` when present,
/// otherwise against `page_url`. Anchors without a usable href are skipped.
pub fn parse_project_links(
    html: &str,
    page_url: &Url,
    selectors: &CompiledSelectors,
) -> Vec<ProjectLink> {
    let document = Html::parse_document(html);
    let base = document
        .select(&selectors.document_base)
        .next()
        .and_then(|el| el.value().attr("href"))
        .and_then(|href| page_url.join(href.trim()).ok())
        .unwrap_or_else(|| page_url.clone());
    let mut links = Vec::new();

    for anchor in document.select(&selectors.project_link) {
        let name = element_text(&anchor, selectors);
        let href = anchor.value().attr("href").unwrap_or("");

        match resolve_href(&base, href) {
            Some(url) => links.push(ProjectLink { name, url }),
            None => log::debug!("Skipping project anchor '{}' with href {:?}", name, href),
        }
    }
    links
}

/// Extract the team lists from a detail page.
///
/// A team list is the element immediately following a heading whose text
/// contains the configured keyword, provided it has the configured tag.
/// Lists are returned in document order, one entry per list.
pub fn parse_team_lists(html: &str, selectors: &CompiledSelectors) -> Vec<Vec<String>> {
    let document = Html::parse_document(html);

    document
        .select(&selectors.team_heading)
        .filter(|heading| {
            heading
                .text()
                .collect::<String>()
                .contains(&selectors.team_heading_text)
        })
        .filter_map(|heading| heading.next_siblings().find_map(ElementRef::wrap))
        .filter(|list| list.value().name() == selectors.team_list_tag)
        .map(|list| {
            list.select(&selectors.team_member)
                .map(|item| element_text(&item, selectors))
                .collect()
        })
        .collect()
}

/// Text content of a node, verbatim unless normalisation is enabled.
fn element_text(element: &ElementRef<'_>, selectors: &CompiledSelectors) -> String {
    let text = element.text().collect::<String>();
    if selectors.normalize_text {
        normalize_whitespace(&text)
    } else {
        text
    }
}
