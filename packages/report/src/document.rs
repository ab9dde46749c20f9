//! HTML document loading and document-order navigation.
//!
//! Disclosures mix full-width and half-width characters freely, so the raw
//! text is NFKC-normalized before it is parsed. Everything downstream only
//! ever sees the normalized form.
//!
//! The heuristics in this crate walk the document the way a reader scans a
//! page: "the nearest cell before this text", "the next row after this
//! cell". [`Document::preceding`] and [`Document::following`] answer those
//! questions in document (pre-)order, where an ancestor counts as preceding
//! its descendants.

use std::borrow::Cow;
use std::path::Path;
use std::sync::LazyLock;

use ego_tree::NodeRef;
use scraper::{ElementRef, Html, Node, Selector};
use unicode_normalization::UnicodeNormalization;

use crate::ReportError;

pub(crate) static TABLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("valid table selector"));
pub(crate) static ROW_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").expect("valid tr selector"));
pub(crate) static CELL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td").expect("valid td selector"));
pub(crate) static MERGED_CELL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td[colspan]").expect("valid merged cell selector"));

/// Attribute holding a cell's column span.
pub const COLSPAN: &str = "colspan";
/// Attribute holding a cell's row span.
pub const ROWSPAN: &str = "rowspan";

/// A parsed, NFKC-normalized HTML document.
pub struct Document {
    html: Html,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("tables", &self.tables().len())
            .finish_non_exhaustive()
    }
}

impl Document {
    /// Normalizes `text` and parses it as an HTML document.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let normalized = text.nfkc().collect::<String>();
        Self {
            html: Html::parse_document(&normalized),
        }
    }

    /// Reads and parses the document at `path`.
    ///
    /// Returns `Ok(None)` when nothing exists at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Io`] if the file exists but cannot be read, or
    /// [`ReportError::Decode`] if its bytes are neither UTF-8 nor Shift_JIS.
    pub fn load(path: &Path) -> Result<Option<Self>, ReportError> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("{} does not exist", path.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let text = decode(&bytes).ok_or_else(|| ReportError::Decode {
            path: path.display().to_string(),
        })?;

        log::debug!("Read {} bytes of text from {}", text.len(), path.display());

        Ok(Some(Self::parse(&text)))
    }

    /// All `<table>` elements in document order.
    #[must_use]
    pub fn tables(&self) -> Vec<ElementRef<'_>> {
        self.html.select(&TABLE_SELECTOR).collect()
    }

    /// The nearest `tag` element whose start tag comes before `anchor`.
    ///
    /// Ancestors of `anchor` are candidates.
    #[must_use]
    pub fn preceding<'a>(&'a self, anchor: ElementRef<'a>, tag: &str) -> Option<ElementRef<'a>> {
        let node = self.html.tree.get(anchor.id())?;
        find_tag(nodes_before(node), tag)
    }

    /// The nearest `tag` element whose start tag comes after `anchor`.
    ///
    /// Descendants of `anchor` are candidates.
    #[must_use]
    pub fn following<'a>(&'a self, anchor: ElementRef<'a>, tag: &str) -> Option<ElementRef<'a>> {
        let node = self.html.tree.get(anchor.id())?;
        find_tag(nodes_after(node), tag)
    }

    /// Finds the first text node under `scope` whose trimmed content equals
    /// `text`, then returns the nearest `tag` element before it.
    ///
    /// The element containing the text node is the first candidate.
    #[must_use]
    pub fn preceding_text<'a>(
        &'a self,
        scope: ElementRef<'a>,
        text: &str,
        tag: &str,
    ) -> Option<ElementRef<'a>> {
        // Compared trimmed: marker cells carry layout whitespace around the text.
        let anchor = scope.descendants().find(|node| {
            node.value()
                .as_text()
                .is_some_and(|content| content.trim() == text)
        })?;

        let node = self.html.tree.get(anchor.id())?;
        find_tag(nodes_before(node), tag)
    }
}

/// Nodes before `node` in reverse document order, ending at the root.
fn nodes_before<'a>(node: NodeRef<'a, Node>) -> impl Iterator<Item = NodeRef<'a, Node>> {
    std::iter::successors(Some(node), |node| match node.prev_sibling() {
        Some(sibling) => sibling.last_children().last().or(Some(sibling)),
        None => node.parent(),
    })
    .skip(1)
}

/// Nodes after `node` in document order, starting with its descendants.
fn nodes_after<'a>(node: NodeRef<'a, Node>) -> impl Iterator<Item = NodeRef<'a, Node>> {
    std::iter::successors(Some(node), |node| {
        node.first_child().or_else(|| {
            std::iter::once(*node)
                .chain(node.ancestors())
                .find_map(|ancestor| ancestor.next_sibling())
        })
    })
    .skip(1)
}

fn find_tag<'a>(
    nodes: impl Iterator<Item = NodeRef<'a, Node>>,
    tag: &str,
) -> Option<ElementRef<'a>> {
    nodes
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == tag)
}

/// Decodes raw bytes as UTF-8 (honoring a BOM), falling back to Shift_JIS.
fn decode(bytes: &[u8]) -> Option<Cow<'_, str>> {
    if let Some((encoding, bom_len)) = encoding_rs::Encoding::for_bom(bytes) {
        return encoding
            .decode_without_bom_handling_and_without_replacement(&bytes[bom_len..]);
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return Some(Cow::Borrowed(text));
    }

    log::debug!("Input is not UTF-8, decoding as Shift_JIS");
    encoding_rs::SHIFT_JIS.decode_without_bom_handling_and_without_replacement(bytes)
}

/// Typed accessors over a table cell (or any element).
pub trait CellNode {
    /// Whether the element carries `name` at all, whatever its value.
    fn has_attribute(&self, name: &str) -> bool;

    /// The raw value of attribute `name`.
    fn attribute(&self, name: &str) -> Option<&str>;

    /// Attribute `name` parsed as a span count (`colspan`, `rowspan`).
    fn span(&self, name: &str) -> Option<usize> {
        self.attribute(name)?.trim().parse().ok()
    }

    /// Concatenated text of the element and its descendants.
    fn text_content(&self) -> String;

    /// Text with every whitespace character removed.
    fn normalized_text(&self) -> String {
        crate::patterns::strip_whitespace(&self.text_content())
    }
}

impl CellNode for ElementRef<'_> {
    fn has_attribute(&self, name: &str) -> bool {
        self.value().attr(name).is_some()
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.value().attr(name)
    }

    fn text_content(&self) -> String {
        self.text().collect()
    }
}
