use crate::DocumentInner;
use crate::MutationRecord;
use crate::NodeId;
use crate::event::Event;
use crate::event::EventKind;
use crate::html;
use dk_core::KitError;
use dk_core::KitResult;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::rc::Weak;

type Callback = Rc<dyn Fn(&Event)>;

/// Handle to one native node. Clones refer to the same node.
#[derive(Clone)]
pub struct Element {
    data: Rc<ElementData>,
}

struct ElementData {
    node_id: NodeId,
    tag_name: String,
    owner: Weak<DocumentInner>,
    attributes: RefCell<Vec<(String, String)>>,
    classes: RefCell<Vec<String>>,
    text: RefCell<Option<String>>,
    children: RefCell<Vec<Element>>,
    parent: RefCell<Weak<ElementData>>,
    listeners: RefCell<Vec<(EventKind, Callback)>>,
}

impl Element {
    pub(crate) fn detached(owner: Weak<DocumentInner>, node_id: NodeId, tag_name: &str) -> Self {
        Self {
            data: Rc::new(ElementData {
                node_id,
                tag_name: tag_name.trim().to_ascii_lowercase(),
                owner,
                attributes: RefCell::new(Vec::new()),
                classes: RefCell::new(Vec::new()),
                text: RefCell::new(None),
                children: RefCell::new(Vec::new()),
                parent: RefCell::new(Weak::new()),
                listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Links a child without checks or records. Document bootstrap only.
    pub(crate) fn link_child(&self, child: &Element) {
        *child.data.parent.borrow_mut() = Rc::downgrade(&self.data);
        self.data.children.borrow_mut().push(child.clone());
    }

    pub(crate) fn owner_ptr(&self) -> *const DocumentInner {
        self.data.owner.as_ptr()
    }

    pub fn node_id(&self) -> NodeId {
        self.data.node_id
    }

    pub fn tag_name(&self) -> &str {
        &self.data.tag_name
    }

    pub fn set_attribute(&self, name: &str, value: impl Into<String>) {
        let value = value.into();
        if name.eq_ignore_ascii_case("class") {
            let requested: Vec<String> = value.split_whitespace().map(str::to_owned).collect();
            for existing in self.class_list() {
                if !requested.contains(&existing) {
                    self.remove_class(&existing);
                }
            }
            for class in &requested {
                self.add_class(class);
            }
            return;
        }

        let mut attributes = self.data.attributes.borrow_mut();
        match attributes.iter_mut().find(|(existing, _)| existing == name) {
            Some((_, slot)) => *slot = value,
            None => attributes.push((name.to_owned(), value)),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        if name.eq_ignore_ascii_case("class") {
            let classes = self.data.classes.borrow();
            return (!classes.is_empty()).then(|| classes.join(" "));
        }

        self.data
            .attributes
            .borrow()
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.clone())
    }

    pub fn set_id(&self, id: impl Into<String>) {
        self.set_attribute("id", id);
    }

    pub fn id(&self) -> Option<String> {
        self.attribute("id")
    }

    /// Adds a class token. Returns false if it was already present.
    pub fn add_class(&self, class: &str) -> bool {
        if class.is_empty() {
            return false;
        }

        {
            let mut classes = self.data.classes.borrow_mut();
            if classes.iter().any(|existing| existing == class) {
                return false;
            }
            classes.push(class.to_owned());
        }

        self.record(MutationRecord::ClassAdded {
            target: self.node_id(),
            class: class.to_owned(),
        });
        true
    }

    /// Removes a class token. Returns false if it was absent.
    pub fn remove_class(&self, class: &str) -> bool {
        {
            let mut classes = self.data.classes.borrow_mut();
            let Some(position) = classes.iter().position(|existing| existing == class) else {
                return false;
            };
            classes.remove(position);
        }

        self.record(MutationRecord::ClassRemoved {
            target: self.node_id(),
            class: class.to_owned(),
        });
        true
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.data.classes.borrow().iter().any(|existing| existing == class)
    }

    pub fn class_list(&self) -> Vec<String> {
        self.data.classes.borrow().clone()
    }

    /// Replaces the element's own text. Child elements are left in place.
    pub fn set_text_content(&self, text: impl Into<String>) {
        *self.data.text.borrow_mut() = Some(text.into());
        self.record(MutationRecord::TextChanged {
            target: self.node_id(),
        });
    }

    pub fn text_content(&self) -> Option<String> {
        self.data.text.borrow().clone()
    }

    /// Appends `child` as the last child.
    ///
    /// A node has at most one parent: a child that is already attached must be
    /// removed explicitly before it can move.
    pub fn append_child(&self, child: &Element) -> KitResult<()> {
        if child.owner_ptr() != self.owner_ptr() {
            return Err(KitError::usage(
                "dom.wrong_document",
                format!(
                    "<{}> #{} belongs to another document",
                    child.tag_name(),
                    child.node_id()
                ),
            ));
        }

        if let Some(parent) = child.parent() {
            return Err(KitError::usage(
                "dom.already_attached",
                format!(
                    "<{}> #{} is already a child of <{}> #{}",
                    child.tag_name(),
                    child.node_id(),
                    parent.tag_name(),
                    parent.node_id()
                ),
            ));
        }

        if child.contains(self) {
            return Err(KitError::usage(
                "dom.hierarchy_cycle",
                format!(
                    "<{}> #{} cannot be appended inside its own subtree",
                    child.tag_name(),
                    child.node_id()
                ),
            ));
        }

        *child.data.parent.borrow_mut() = Rc::downgrade(&self.data);
        self.data.children.borrow_mut().push(child.clone());
        self.record(MutationRecord::ChildAppended {
            parent: self.node_id(),
            child: child.node_id(),
        });
        Ok(())
    }

    pub fn remove_child(&self, child: &Element) -> KitResult<()> {
        {
            let mut children = self.data.children.borrow_mut();
            let Some(position) = children.iter().position(|candidate| candidate == child) else {
                return Err(KitError::usage(
                    "dom.not_a_child",
                    format!(
                        "<{}> #{} is not a child of <{}> #{}",
                        child.tag_name(),
                        child.node_id(),
                        self.tag_name(),
                        self.node_id()
                    ),
                ));
            };
            children.remove(position);
        }

        *child.data.parent.borrow_mut() = Weak::new();
        self.record(MutationRecord::ChildRemoved {
            parent: self.node_id(),
            child: child.node_id(),
        });
        Ok(())
    }

    /// Detaches this element from its parent. Returns false if it had none.
    pub fn remove(&self) -> bool {
        match self.parent() {
            Some(parent) => parent.remove_child(self).is_ok(),
            None => false,
        }
    }

    pub fn parent(&self) -> Option<Element> {
        self.data
            .parent
            .borrow()
            .upgrade()
            .map(|data| Element { data })
    }

    pub fn children(&self) -> Vec<Element> {
        self.data.children.borrow().clone()
    }

    /// True if `other` is this element or one of its descendants.
    pub fn contains(&self, other: &Element) -> bool {
        let mut cursor = Some(other.clone());
        while let Some(node) = cursor {
            if node == *self {
                return true;
            }
            cursor = node.parent();
        }
        false
    }

    /// True if the element is reachable from its document's root.
    pub fn is_connected(&self) -> bool {
        let Some(owner) = self.data.owner.upgrade() else {
            return false;
        };
        owner.root.contains(self)
    }

    pub fn add_event_listener(&self, kind: EventKind, callback: impl Fn(&Event) + 'static) {
        self.data
            .listeners
            .borrow_mut()
            .push((kind, Rc::new(callback)));
    }

    pub fn listener_count(&self, kind: &EventKind) -> usize {
        self.data
            .listeners
            .borrow()
            .iter()
            .filter(|(registered, _)| registered == kind)
            .count()
    }

    /// Runs matching listeners on this element, then bubbles to its ancestors.
    ///
    /// Returns how many listeners were invoked.
    pub fn dispatch_event(&self, event: &Event) -> usize {
        let mut invoked = 0_usize;
        let mut cursor = Some(self.clone());

        while let Some(node) = cursor {
            let callbacks: Vec<Callback> = node
                .data
                .listeners
                .borrow()
                .iter()
                .filter(|(kind, _)| *kind == *event.kind())
                .map(|(_, callback)| Rc::clone(callback))
                .collect();

            event.set_current_target(node.node_id());
            for callback in callbacks {
                callback(event);
                invoked = invoked.saturating_add(1);
            }

            if event.propagation_stopped() {
                break;
            }
            cursor = node.parent();
        }

        invoked
    }

    pub fn dispatch_click(&self) -> usize {
        self.dispatch_event(&Event::new(EventKind::Click, self.node_id()))
    }

    pub fn outer_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        let tag = self.tag_name();
        out.push('<');
        out.push_str(tag);

        for (name, value) in self.data.attributes.borrow().iter() {
            html::push_attribute(out, name, value);
        }
        if let Some(classes) = self.attribute("class") {
            html::push_attribute(out, "class", &classes);
        }
        out.push('>');

        if let Some(text) = self.data.text.borrow().as_deref() {
            if html::is_raw_text_tag(tag) {
                out.push_str(text);
            } else {
                html::push_escaped_text(out, text);
            }
        }

        for child in self.children() {
            child.write_html(out);
        }

        out.push_str("</");
        out.push_str(tag);
        out.push('>');
    }

    fn record(&self, record: MutationRecord) {
        if let Some(owner) = self.data.owner.upgrade() {
            owner.record(record);
        }
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }
}

impl Eq for Element {}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("node_id", &self.data.node_id)
            .field("tag_name", &self.data.tag_name)
            .field("classes", &*self.data.classes.borrow())
            .field("children", &self.data.children.borrow().len())
            .finish()
    }
}
