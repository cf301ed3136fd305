//! Structural lookup over the page tree
//!
//! Selector text is parsed with scraper's CSS grammar and matched by the
//! `selectors` engine directly against the node arena. The
//! `#document` node is not an element as far as matching is concerned, so
//! `:root` is the top-level element and no combinator ever reaches past it.
//!
//! ```rust
//! use page_tree::Selector;
//!
//! let selector: Selector = ".subtitle.ytmusic-player-bar > yt-formatted-string".parse().unwrap();
//! assert_eq!(selector.as_str(), ".subtitle.ytmusic-player-bar > yt-formatted-string");
//! ```

use std::str::FromStr;

use cssparser::{Parser as CssParser, ParserInput};
use scraper::error::SelectorErrorKind;
use scraper::selector::{CssLocalName, CssString, NonTSPseudoClass, Parser, PseudoElement, Simple};
use selectors::attr::{AttrSelectorOperation, CaseSensitivity, NamespaceConstraint};
use selectors::bloom::BloomFilter;
use selectors::matching::{
    self, ElementSelectorFlags, MatchingContext, MatchingForInvalidation, MatchingMode,
    NeedsSelectorFlags, QuirksMode, SelectorCaches,
};
use selectors::parser::{ParseRelative, SelectorImpl};
use selectors::{Element, OpaqueElement, SelectorList};

use crate::error::SelectorError;
use crate::node::{ElementData, NodeData, NodeId};

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// A compiled selector (or comma-separated selector list)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    list: SelectorList<Simple>,
}

impl Selector {
    /// Compile selector text
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        if source.trim().is_empty() {
            return Err(SelectorError::Empty);
        }

        let mut input = ParserInput::new(source);
        let mut parser = CssParser::new(&mut input);
        let list = SelectorList::parse(&Parser, &mut parser, ParseRelative::No).map_err(|err| {
            SelectorError::Invalid {
                selector: source.to_string(),
                reason: SelectorErrorKind::from(err).to_string(),
            }
        })?;

        Ok(Self {
            source: source.to_string(),
            list,
        })
    }

    /// Original selector text
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Connected elements matching this selector, in document order
    pub(crate) fn select(&self, nodes: &[NodeData], first_only: bool) -> Vec<NodeId> {
        let mut caches = SelectorCaches::default();
        let mut context = MatchingContext::new(
            MatchingMode::Normal,
            None,
            &mut caches,
            QuirksMode::NoQuirks,
            NeedsSelectorFlags::No,
            MatchingForInvalidation::No,
        );

        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = nodes[NodeId::ROOT.0].children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if let Some(element) = ArenaElement::new(nodes, id) {
                if matching::matches_selector_list(&self.list, &element, &mut context) {
                    found.push(id);
                    if first_only {
                        break;
                    }
                }
            }
            stack.extend(nodes[id.0].children.iter().rev().copied());
        }
        found
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Selector::parse(s)
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

/// An element node in the arena, as seen by the `selectors` engine
#[derive(Clone, Copy)]
pub(crate) struct ArenaElement<'a> {
    nodes: &'a [NodeData],
    id: NodeId,
    data: &'a ElementData,
}

impl<'a> ArenaElement<'a> {
    /// `None` for text nodes and the document node
    pub(crate) fn new(nodes: &'a [NodeData], id: NodeId) -> Option<Self> {
        if id == NodeId::ROOT {
            return None;
        }
        let data = nodes.get(id.0)?.as_element()?;
        Some(Self { nodes, id, data })
    }

    fn siblings(&self) -> &'a [NodeId] {
        self.nodes[self.id.0]
            .parent
            .map(|parent| self.nodes[parent.0].children.as_slice())
            .unwrap_or_default()
    }

    fn position(&self) -> Option<usize> {
        self.siblings().iter().position(|id| *id == self.id)
    }

    fn first_element<I>(&self, ids: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a NodeId>,
    {
        ids.into_iter().find_map(|id| Self::new(self.nodes, *id))
    }
}

impl std::fmt::Debug for ArenaElement<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{}> {}", self.data.tag, self.id)
    }
}

impl Element for ArenaElement<'_> {
    type Impl = Simple;

    fn opaque(&self) -> OpaqueElement {
        OpaqueElement::new(&self.nodes[self.id.0])
    }

    fn parent_element(&self) -> Option<Self> {
        let parent = self.nodes[self.id.0].parent?;
        Self::new(self.nodes, parent)
    }

    fn parent_node_is_shadow_root(&self) -> bool {
        false
    }

    fn containing_shadow_host(&self) -> Option<Self> {
        None
    }

    fn is_pseudo_element(&self) -> bool {
        false
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        let pos = self.position()?;
        self.first_element(self.siblings()[..pos].iter().rev())
    }

    fn next_sibling_element(&self) -> Option<Self> {
        let pos = self.position()?;
        self.first_element(&self.siblings()[pos + 1..])
    }

    fn first_element_child(&self) -> Option<Self> {
        self.first_element(&self.nodes[self.id.0].children)
    }

    fn is_html_element_in_html_document(&self) -> bool {
        true
    }

    fn has_local_name(&self, local_name: &<Simple as SelectorImpl>::BorrowedLocalName) -> bool {
        self.data.tag.eq_ignore_ascii_case(&local_name.0)
    }

    fn has_namespace(&self, ns: &<Simple as SelectorImpl>::BorrowedNamespaceUrl) -> bool {
        ns.is_empty() || &**ns == HTML_NAMESPACE
    }

    fn is_same_type(&self, other: &Self) -> bool {
        self.data.tag.eq_ignore_ascii_case(&other.data.tag)
    }

    // Attributes carry no namespace
    fn attr_matches(
        &self,
        _ns: &NamespaceConstraint<&<Simple as SelectorImpl>::NamespaceUrl>,
        local_name: &CssLocalName,
        operation: &AttrSelectorOperation<&CssString>,
    ) -> bool {
        self.data
            .attributes
            .iter()
            .any(|(name, value)| name.as_str() == &*local_name.0 && operation.eval_str(value))
    }

    fn match_non_ts_pseudo_class(
        &self,
        _pc: &NonTSPseudoClass,
        _context: &mut MatchingContext<'_, Self::Impl>,
    ) -> bool {
        false
    }

    fn match_pseudo_element(
        &self,
        _pe: &PseudoElement,
        _context: &mut MatchingContext<'_, Self::Impl>,
    ) -> bool {
        false
    }

    fn apply_selector_flags(&self, _flags: ElementSelectorFlags) {}

    fn is_link(&self) -> bool {
        matches!(self.data.tag.as_str(), "a" | "area") && self.data.attribute("href").is_some()
    }

    fn is_html_slot_element(&self) -> bool {
        false
    }

    fn has_id(&self, id: &CssLocalName, case_sensitivity: CaseSensitivity) -> bool {
        self.data
            .attribute("id")
            .is_some_and(|value| case_sensitivity.eq(id.0.as_bytes(), value.as_bytes()))
    }

    fn has_class(&self, name: &CssLocalName, case_sensitivity: CaseSensitivity) -> bool {
        self.data.attribute("class").is_some_and(|classes| {
            classes
                .split_whitespace()
                .any(|class| case_sensitivity.eq(name.0.as_bytes(), class.as_bytes()))
        })
    }

    fn has_custom_state(&self, _name: &CssLocalName) -> bool {
        false
    }

    fn imported_part(&self, _name: &CssLocalName) -> Option<CssLocalName> {
        None
    }

    fn is_part(&self, _name: &CssLocalName) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        !self.nodes[self.id.0].children.iter().any(|child| {
            let node = &self.nodes[child.0];
            node.as_element().is_some() || node.as_text().is_some_and(|text| !text.is_empty())
        })
    }

    fn is_root(&self) -> bool {
        self.nodes[self.id.0].parent == Some(NodeId::ROOT)
    }

    fn add_element_unique_hashes(&self, _filter: &mut BloomFilter) -> bool {
        false
    }
}
