//! Declarative element construction
//!
//! ```rust
//! use page_tree::{Document, ElementSpec};
//!
//! let doc = Document::new();
//! let slider = doc
//!     .insert(doc.root(), ElementSpec::new("tp-yt-paper-slider").id("volume-slider").attr("value", "40"))
//!     .unwrap();
//! assert_eq!(doc.attribute(slider, "value").as_deref(), Some("40"));
//! ```

/// Description of an element subtree to be instantiated in a `Document`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementSpec {
    pub(crate) tag: String,
    pub(crate) attributes: Vec<(String, String)>,
    pub(crate) properties: Vec<(String, String)>,
    pub(crate) text: Option<String>,
    pub(crate) children: Vec<ElementSpec>,
}

impl ElementSpec {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    /// Append to the `class` attribute
    pub fn class(mut self, classes: impl AsRef<str>) -> Self {
        let classes = classes.as_ref();
        match self.attributes.iter_mut().find(|(n, _)| n == "class") {
            Some((_, existing)) => {
                existing.push(' ');
                existing.push_str(classes);
            }
            None => self.attributes.push(("class".to_string(), classes.to_string())),
        }
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name, value)),
        }
        self
    }

    pub fn property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.push((name.into(), value.into()));
        self
    }

    /// Text content, placed before any child elements
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn child(mut self, child: ElementSpec) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = ElementSpec>) -> Self {
        self.children.extend(children);
        self
    }
}
