use dk_core::KitError;
use dk_core::KitResult;
use dk_dom::Document;
use dk_dom::Element;
use std::fmt;

/// Where a mounted tree is attached in the host document.
#[derive(Debug, Clone, PartialEq)]
pub enum Anchor {
    /// Looked up with `get_element_by_id` at mount time.
    Id(String),
    Element(Element),
}

impl Anchor {
    /// Resolves to a connected element of `document`.
    pub fn resolve(&self, document: &Document) -> KitResult<Element> {
        match self {
            Self::Id(id) => document.get_element_by_id(id).ok_or_else(|| {
                KitError::configuration(
                    "builder.anchor_missing",
                    format!("no element with id `{id}` in the document"),
                )
            }),
            Self::Element(element) => {
                if !document.owns(element) {
                    return Err(KitError::configuration(
                        "builder.anchor_foreign",
                        format!("anchor {self} belongs to another document"),
                    ));
                }
                if !element.is_connected() {
                    return Err(KitError::configuration(
                        "builder.anchor_detached",
                        format!("anchor {self} is not connected to the document"),
                    ));
                }
                Ok(element.clone())
            }
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "#{id}"),
            Self::Element(element) => write!(f, "<{}> #{}", element.tag_name(), element.node_id()),
        }
    }
}

impl From<&str> for Anchor {
    fn from(value: &str) -> Self {
        Self::Id(value.to_owned())
    }
}

impl From<String> for Anchor {
    fn from(value: String) -> Self {
        Self::Id(value)
    }
}

impl From<Element> for Anchor {
    fn from(value: Element) -> Self {
        Self::Element(value)
    }
}

impl From<&Element> for Anchor {
    fn from(value: &Element) -> Self {
        Self::Element(value.clone())
    }
}
