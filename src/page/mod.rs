//! Results page adapter.
//!
//! [`ScholarPage`] owns the parsed HTML document. It enumerates result
//! blocks as [`ArticleBlock`]s and appends rendered fragments into a
//! block's output slot, addressed by the slot's [`SlotId`].

use ego_tree::{NodeId, Tree};
use scraper::{ElementRef, Html, Node, Selector};

use crate::config::SelectorConfig;
use crate::render::DisplayFragment;

/// Handle to a block's output slot element in the page tree.
///
/// Node ids stay valid while fragments are appended, so a handle taken at
/// enumeration time still addresses the same element when a lookup
/// completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(NodeId);

/// One search result read from the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleBlock {
    /// Position among the page's result blocks
    pub index: usize,

    /// Title text, including any leading "[HTML]"-style tag
    pub title: String,

    /// Target of the title link, if the result has one
    pub url: Option<String>,

    /// Where fragments for this block are appended
    pub slot: SlotId,
}

/// Compiled selectors for the page structure
#[derive(Debug, Clone)]
pub struct PageSelectors {
    block: Selector,
    title: Selector,
    link: Selector,
    slot: Selector,
}

impl PageSelectors {
    pub fn from_config(config: &SelectorConfig) -> Result<Self, PageError> {
        Ok(Self {
            block: parse_selector("block", &config.block)?,
            title: parse_selector("title", &config.title)?,
            link: parse_selector("link", &config.link)?,
            slot: parse_selector("slot", &config.slot)?,
        })
    }
}

fn parse_selector(kind: &'static str, css: &str) -> Result<Selector, PageError> {
    Selector::parse(css).map_err(|e| PageError::Selector {
        kind,
        selector: css.to_string(),
        message: e.to_string(),
    })
}

/// A parsed search results page
#[derive(Debug, Clone)]
pub struct ScholarPage {
    document: Html,
    selectors: PageSelectors,
}

impl ScholarPage {
    /// Parse a results page
    pub fn parse(html: &str, selectors: &SelectorConfig) -> Result<Self, PageError> {
        Ok(Self::with_selectors(
            html,
            PageSelectors::from_config(selectors)?,
        ))
    }

    pub fn with_selectors(html: &str, selectors: PageSelectors) -> Self {
        Self {
            document: Html::parse_document(html),
            selectors,
        }
    }

    /// Enumerate the result blocks currently on the page, in page order.
    ///
    /// Blocks without an output slot are skipped.
    pub fn blocks(&self) -> Vec<ArticleBlock> {
        let mut blocks = Vec::new();

        for (index, block) in self.document.select(&self.selectors.block).enumerate() {
            let Some(slot) = block.select(&self.selectors.slot).next() else {
                tracing::warn!(index, "Result block has no output slot, skipping");
                continue;
            };

            let title = block
                .select(&self.selectors.title)
                .next()
                .map(|t| t.text().collect::<String>().trim().to_string())
                .unwrap_or_default();

            let url = block
                .select(&self.selectors.link)
                .next()
                .and_then(|a| a.value().attr("href"))
                .map(|href| href.trim().to_string())
                .filter(|href| !href.is_empty());

            blocks.push(ArticleBlock {
                index,
                title,
                url,
                slot: SlotId(slot.id()),
            });
        }

        blocks
    }

    /// Append a fragment after the existing children of a slot
    pub fn append(&mut self, slot: SlotId, fragment: &DisplayFragment) -> Result<(), PageError> {
        if self.document.tree.get(slot.0).is_none() {
            return Err(PageError::UnknownSlot);
        }

        let parsed = Html::parse_fragment(&fragment.to_html());
        graft(&mut self.document.tree, slot.0, parsed.root_element());
        Ok(())
    }

    /// Serialize the (possibly augmented) document
    pub fn html(&self) -> String {
        self.document.html()
    }

    pub fn document(&self) -> &Html {
        &self.document
    }
}

/// Copy the children of `source` under `parent`, recursively.
fn graft(tree: &mut Tree<Node>, parent: NodeId, source: ElementRef<'_>) {
    for child in source.children() {
        let Some(mut target) = tree.get_mut(parent) else {
            return;
        };
        let id = target.append(child.value().clone()).id();

        if let Some(element) = ElementRef::wrap(child) {
            graft(tree, id, element);
        }
    }
}

/// Page adapter errors
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("Invalid {kind} selector '{selector}': {message}")]
    Selector {
        kind: &'static str,
        selector: String,
        message: String,
    },

    #[error("Slot does not belong to this page")]
    UnknownSlot,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Provenance, ResolutionOutcome};
    use crate::render::Renderer;

    const PAGE: &str = r#"<!DOCTYPE html>
<html><body><div id="gs_res_ccl_mid">
<div class="gs_r gs_or gs_scl" data-cid="a">
  <div class="gs_ri">
    <h3 class="gs_rt"><a href="https://www.ncbi.nlm.nih.gov/pmc/articles/PMC1234567/">Open access paper</a></h3>
    <div class="gs_a">A Author - Journal, 2020</div>
  </div>
</div>
<div class="gs_r gs_or gs_scl" data-cid="b">
  <div class="gs_ri">
    <h3 class="gs_rt"><span class="gs_ctc">[HTML]</span> <a href=" https://www.nature.com/articles/s41586-020-1234-5 ">Nature paper</a></h3>
  </div>
</div>
<div class="gs_r gs_or gs_scl" data-cid="c">
  <div class="gs_ri">
    <h3 class="gs_rt"><span class="gs_ct1">[CITATION]</span> A Study of Things.</h3>
  </div>
</div>
<div class="gs_r gs_or gs_scl" data-cid="d">
  <h3 class="gs_rt"><a href="https://example.org/x">No slot here</a></h3>
</div>
</div></body></html>"#;

    fn page() -> ScholarPage {
        ScholarPage::parse(PAGE, &SelectorConfig::default()).unwrap()
    }

    fn slot_html(page: &ScholarPage, cid: &str) -> String {
        let selector = Selector::parse(&format!("div[data-cid='{}'] .gs_ri", cid)).unwrap();
        page.document()
            .select(&selector)
            .next()
            .map(|e| e.inner_html())
            .unwrap_or_default()
    }

    #[test]
    fn test_enumerates_blocks_with_slots() {
        let blocks = page().blocks();
        assert_eq!(blocks.len(), 3);

        assert_eq!(blocks[0].index, 0);
        assert_eq!(blocks[0].title, "Open access paper");
        assert_eq!(
            blocks[0].url.as_deref(),
            Some("https://www.ncbi.nlm.nih.gov/pmc/articles/PMC1234567/")
        );

        assert_eq!(blocks[1].title, "[HTML] Nature paper");
        assert_eq!(
            blocks[1].url.as_deref(),
            Some("https://www.nature.com/articles/s41586-020-1234-5")
        );

        assert_eq!(blocks[2].title, "[CITATION] A Study of Things.");
        assert_eq!(blocks[2].url, None);
    }

    #[test]
    fn test_append_keeps_existing_content() {
        let mut page = page();
        let blocks = page.blocks();
        let renderer = Renderer::new("https://pubmed.ncbi.nlm.nih.gov");

        let resolved = renderer.render(
            &ResolutionOutcome::Resolved {
                pmid: "12345678".to_string(),
            },
            Provenance::ByIdentifier,
        );
        page.append(blocks[1].slot, &resolved).unwrap();

        let slot = slot_html(&page, "b");
        assert!(slot.contains("Nature paper"));
        assert!(slot.contains(r#"<ul class="by-id"><li>PMID: 12345678</li>"#));
        assert!(slot.trim_end().ends_with("</ul>"));

        assert!(!slot_html(&page, "a").contains("<ul"));
        assert!(!slot_html(&page, "c").contains("<ul"));
    }

    #[test]
    fn test_append_twice_preserves_order() {
        let mut page = page();
        let slot = page.blocks()[2].slot;
        let renderer = Renderer::new("https://pubmed.ncbi.nlm.nih.gov");

        page.append(
            slot,
            &renderer.render(&ResolutionOutcome::Unresolved, Provenance::ByTitle),
        )
        .unwrap();
        page.append(
            slot,
            &renderer.render(
                &ResolutionOutcome::Resolved {
                    pmid: "1".to_string(),
                },
                Provenance::ByTitle,
            ),
        )
        .unwrap();

        let html = slot_html(&page, "c");
        let notice = html.find("No or multiple matched records").unwrap();
        let record = html.find("PMID: 1").unwrap();
        assert!(notice < record);
        assert!(page.html().contains("PMID: 1"));
    }

    #[test]
    fn test_invalid_selector() {
        let selectors = SelectorConfig {
            block: "div[".to_string(),
            ..SelectorConfig::default()
        };
        let err = ScholarPage::parse(PAGE, &selectors).unwrap_err();
        assert!(matches!(err, PageError::Selector { kind: "block", .. }));
    }

    #[test]
    fn test_page_without_results() {
        let page = ScholarPage::parse("<html><body></body></html>", &SelectorConfig::default())
            .unwrap();
        assert!(page.blocks().is_empty());
    }
}
