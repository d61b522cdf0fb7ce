//! Component tree nodes.
//!
//! A [`ComponentNode`] owns one native element, its style declarations, its
//! marker classes and its children. Nothing is rendered until a tree builder
//! visits the node; the scoped class name is assigned on that first visit.
//!
//! ```
//! use dk_component::ComponentNode;
//! use dk_dom::Document;
//!
//! let doc = Document::new();
//! let title = ComponentNode::new(&doc, "Title", "h1")
//!     .with_style([("fontSize", 30)])
//!     .with_content("Hello");
//! let button = ComponentNode::new(&doc, "Button", "button")
//!     .with_style([("backgroundColor", "red")])
//!     .with_hover_style([("filter", "brightness(125%)")])
//!     .with_content(title);
//! assert_eq!(button.children().len(), 1);
//! ```

use dk_css::Channel;
use dk_css::StyleModel;
use dk_css::StyleValue;
use dk_dom::Document;
use dk_dom::Element;
use dk_dom::Event;
use dk_dom::EventKind;
use indexmap::IndexSet;

/// Value accepted by [`ComponentNode::set_content`].
#[derive(Debug)]
pub enum Content {
    /// Replaces the node's own text.
    Text(String),
    /// Appended as the last child.
    Component(ComponentNode),
}

impl From<&str> for Content {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Content {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<ComponentNode> for Content {
    fn from(value: ComponentNode) -> Self {
        Self::Component(value)
    }
}

/// One unit of the component tree.
#[derive(Debug)]
pub struct ComponentNode {
    kind: String,
    assigned_name: Option<String>,
    styles: StyleModel,
    marker_classes: IndexSet<String>,
    element: Element,
    children: Vec<ComponentNode>,
}

impl ComponentNode {
    /// Creates a node of variant `kind` backed by a new `<tag_name>` element.
    ///
    /// `kind` prefixes the generated class name, so it should be a valid CSS
    /// identifier start such as `Button` or `Title`.
    pub fn new(document: &Document, kind: impl Into<String>, tag_name: &str) -> Self {
        Self {
            kind: kind.into(),
            assigned_name: None,
            styles: StyleModel::new(),
            marker_classes: IndexSet::new(),
            element: document.create_element(tag_name),
            children: Vec::new(),
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn assigned_name(&self) -> Option<&str> {
        self.assigned_name.as_deref()
    }

    /// Stores the scoped class name issued by a tree builder.
    ///
    /// The first assignment sticks; returns false if a name was already set.
    pub fn assign_name(&mut self, name: impl Into<String>) -> bool {
        if self.assigned_name.is_some() {
            return false;
        }
        self.assigned_name = Some(name.into());
        true
    }

    pub fn styles(&self) -> &StyleModel {
        &self.styles
    }

    pub fn marker_classes(&self) -> &IndexSet<String> {
        &self.marker_classes
    }

    pub fn text(&self) -> Option<String> {
        self.element.text_content()
    }

    pub fn children(&self) -> &[ComponentNode] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [ComponentNode] {
        &mut self.children
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    /// Number of nodes in this subtree, the node itself included.
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(ComponentNode::subtree_len)
            .sum::<usize>()
    }

    pub fn is_connected(&self) -> bool {
        self.element.is_connected()
    }

    pub fn set_style<I, K, V>(&mut self, properties: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<StyleValue>,
    {
        self.styles.set(Channel::Default, properties);
        self
    }

    pub fn set_hover_style<I, K, V>(&mut self, properties: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<StyleValue>,
    {
        self.styles.set(Channel::Hover, properties);
        self
    }

    pub fn set_channel_style<I, K, V>(&mut self, channel: Channel, properties: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<StyleValue>,
    {
        self.styles.set(channel, properties);
        self
    }

    /// Text replaces the displayed text; a component is appended as a child.
    pub fn set_content(&mut self, content: impl Into<Content>) -> &mut Self {
        match content.into() {
            Content::Text(text) => self.element.set_text_content(text),
            Content::Component(child) => self.children.push(child),
        }
        self
    }

    pub fn set_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.element.set_text_content(text);
        self
    }

    pub fn append_child(&mut self, child: ComponentNode) -> &mut Self {
        self.children.push(child);
        self
    }

    pub fn add_class_name(&mut self, name: &str) -> &mut Self {
        if !name.is_empty() && self.marker_classes.insert(name.to_owned()) {
            self.element.add_class(name);
        }
        self
    }

    pub fn add_class_names<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) -> &mut Self {
        for name in names {
            self.add_class_name(name);
        }
        self
    }

    /// Removes a marker class. The scoped class name is not a marker and is
    /// never removed this way.
    pub fn remove_class_name(&mut self, name: &str) -> &mut Self {
        if self.marker_classes.shift_remove(name) {
            self.element.remove_class(name);
        }
        self
    }

    pub fn remove_class_names<'a>(
        &mut self,
        names: impl IntoIterator<Item = &'a str>,
    ) -> &mut Self {
        for name in names {
            self.remove_class_name(name);
        }
        self
    }

    /// Registers one more click listener; earlier listeners stay registered.
    pub fn set_click_handler(&mut self, callback: impl Fn(&Event) + 'static) -> &mut Self {
        self.element.add_event_listener(EventKind::Click, callback);
        self
    }

    /// Detaches the native element from the document.
    ///
    /// The node keeps its name and the stylesheet keeps its rules.
    pub fn remove_from_document(&self) -> bool {
        self.element.remove()
    }

    pub fn with_style<I, K, V>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<StyleValue>,
    {
        self.set_style(properties);
        self
    }

    pub fn with_hover_style<I, K, V>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<StyleValue>,
    {
        self.set_hover_style(properties);
        self
    }

    pub fn with_channel_style<I, K, V>(mut self, channel: Channel, properties: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<StyleValue>,
    {
        self.set_channel_style(channel, properties);
        self
    }

    pub fn with_content(mut self, content: impl Into<Content>) -> Self {
        self.set_content(content);
        self
    }

    pub fn with_child(mut self, child: ComponentNode) -> Self {
        self.append_child(child);
        self
    }

    pub fn with_class_name(mut self, name: &str) -> Self {
        self.add_class_name(name);
        self
    }

    pub fn with_click_handler(mut self, callback: impl Fn(&Event) + 'static) -> Self {
        self.set_click_handler(callback);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::ComponentNode;
    use dk_css::Channel;
    use dk_css::StyleValue;
    use dk_css::declarations;
    use dk_dom::Document;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn text_content_overwrites_previous_text() {
        let doc = Document::new();
        let node = ComponentNode::new(&doc, "Title", "h1")
            .with_content("first")
            .with_content("second");
        assert_eq!(node.text().as_deref(), Some("second"));
        assert!(node.children().is_empty());
    }

    #[test]
    fn component_content_accumulates_children() {
        let doc = Document::new();
        let mut list = ComponentNode::new(&doc, "List", "ul");
        list.set_content(ComponentNode::new(&doc, "Item", "li"))
            .set_content("caption")
            .set_content(ComponentNode::new(&doc, "Item", "li"));

        assert_eq!(list.children().len(), 2);
        assert_eq!(list.text().as_deref(), Some("caption"));
        assert_eq!(list.subtree_len(), 3);
    }

    #[test]
    fn marker_classes_are_idempotent() {
        let doc = Document::new();
        let mut node = ComponentNode::new(&doc, "Button", "button");
        node.add_class_name("primary").add_class_name("primary");
        assert_eq!(node.marker_classes().len(), 1);
        assert_eq!(node.element().class_list(), vec!["primary".to_owned()]);

        node.remove_class_name("absent");
        assert_eq!(node.marker_classes().len(), 1);

        node.add_class_names(["wide", "rounded"])
            .remove_class_names(["primary", "wide"]);
        let markers: Vec<&str> = node.marker_classes().iter().map(String::as_str).collect();
        assert_eq!(markers, vec!["rounded"]);
        assert_eq!(node.element().class_list(), vec!["rounded".to_owned()]);
    }

    #[test]
    fn scoped_name_is_not_a_marker() {
        let doc = Document::new();
        let mut node = ComponentNode::new(&doc, "Button", "button");
        assert!(node.assign_name("Button_abc123"));
        assert!(!node.assign_name("Button_zzz999"));
        assert_eq!(node.assigned_name(), Some("Button_abc123"));

        node.element().add_class("Button_abc123");
        node.remove_class_name("Button_abc123");
        assert!(node.element().has_class("Button_abc123"));
    }

    #[test]
    fn styles_land_in_their_channels() {
        let doc = Document::new();
        let node = ComponentNode::new(&doc, "Button", "button")
            .with_style(declarations!["padding" => "4px 8px", "borderRadius" => 4])
            .with_hover_style([("filter", "brightness(125%)")])
            .with_channel_style(Channel::pseudo("focus"), [("outline", "none")]);

        assert_eq!(
            node.styles().get(&Channel::Default, "borderRadius"),
            Some(&StyleValue::Number(4.0))
        );
        assert!(!node.styles().is_empty(&Channel::Hover));
        assert_eq!(
            node.styles().serialize(&Channel::pseudo("focus")),
            "\toutline: none;"
        );
    }

    #[test]
    fn click_handlers_stack() {
        let doc = Document::new();
        let clicks = Rc::new(Cell::new(0_u32));
        let first = Rc::clone(&clicks);
        let second = Rc::clone(&clicks);
        let node = ComponentNode::new(&doc, "Button", "button")
            .with_click_handler(move |_| first.set(first.get() + 1))
            .with_click_handler(move |event| {
                event.prevent_default();
                second.set(second.get() + 10);
            });

        assert_eq!(node.element().dispatch_click(), 2);
        assert_eq!(clicks.get(), 11);
    }

    #[test]
    fn remove_from_document_detaches_element() {
        let doc = Document::new();
        let node = ComponentNode::new(&doc, "Panel", "div");
        assert!(!node.remove_from_document());
        assert!(doc.body().append_child(node.element()).is_ok());
        assert!(node.is_connected());
        assert!(node.remove_from_document());
        assert!(!node.is_connected());
    }
}
