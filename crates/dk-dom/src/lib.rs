//! In-memory host document: elements, id anchors, listeners and mutation records.

mod element;
mod event;
mod html;

pub use element::Element;
pub use event::Event;
pub use event::EventKind;

use std::cell::Cell;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::rc::Weak;

/// ID used to address nodes of one document.
pub type NodeId = u64;

const ROOT_NODE_ID: NodeId = 1;
const HEAD_NODE_ID: NodeId = 2;
const BODY_NODE_ID: NodeId = 3;

/// Change observed on an element owned by a live document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationRecord {
    ChildAppended { parent: NodeId, child: NodeId },
    ChildRemoved { parent: NodeId, child: NodeId },
    TextChanged { target: NodeId },
    ClassAdded { target: NodeId, class: String },
    ClassRemoved { target: NodeId, class: String },
}

/// Handle to a host document. Clones refer to the same document.
#[derive(Clone)]
pub struct Document {
    inner: Rc<DocumentInner>,
}

pub(crate) struct DocumentInner {
    next_node_id: Cell<NodeId>,
    root: Element,
    head: Element,
    body: Element,
    mutations: RefCell<Vec<MutationRecord>>,
}

impl DocumentInner {
    pub(crate) fn record(&self, record: MutationRecord) {
        self.mutations.borrow_mut().push(record);
    }
}

impl Document {
    /// Creates `<html><head></head><body></body></html>`.
    pub fn new() -> Self {
        let inner = Rc::new_cyclic(|owner: &Weak<DocumentInner>| {
            let root = Element::detached(owner.clone(), ROOT_NODE_ID, "html");
            let head = Element::detached(owner.clone(), HEAD_NODE_ID, "head");
            let body = Element::detached(owner.clone(), BODY_NODE_ID, "body");
            root.link_child(&head);
            root.link_child(&body);

            DocumentInner {
                next_node_id: Cell::new(BODY_NODE_ID + 1),
                root,
                head,
                body,
                mutations: RefCell::new(Vec::new()),
            }
        });

        Self { inner }
    }

    /// Creates a detached element owned by this document.
    pub fn create_element(&self, tag_name: &str) -> Element {
        let node_id = self.inner.next_node_id.get();
        self.inner.next_node_id.set(node_id.saturating_add(1));
        Element::detached(Rc::downgrade(&self.inner), node_id, tag_name)
    }

    pub fn root(&self) -> Element {
        self.inner.root.clone()
    }

    pub fn head(&self) -> Element {
        self.inner.head.clone()
    }

    pub fn body(&self) -> Element {
        self.inner.body.clone()
    }

    /// Finds a connected element by its `id` attribute, in document order.
    pub fn get_element_by_id(&self, id: &str) -> Option<Element> {
        if id.is_empty() {
            return None;
        }

        let mut stack = vec![self.root()];
        while let Some(element) = stack.pop() {
            if element.id().as_deref() == Some(id) {
                return Some(element);
            }
            stack.extend(element.children().into_iter().rev());
        }

        None
    }

    /// Returns true if `element` was created by this document.
    pub fn owns(&self, element: &Element) -> bool {
        element.owner_ptr() == Rc::as_ptr(&self.inner)
    }

    /// Drains the mutation records collected so far, oldest first.
    pub fn take_mutations(&self) -> Vec<MutationRecord> {
        std::mem::take(&mut *self.inner.mutations.borrow_mut())
    }

    pub fn pending_mutations(&self) -> usize {
        self.inner.mutations.borrow().len()
    }

    pub fn to_html(&self) -> String {
        self.inner.root.outer_html()
    }

    pub fn ptr_eq(&self, other: &Document) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Document {}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("next_node_id", &self.inner.next_node_id.get())
            .field("pending_mutations", &self.pending_mutations())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::Document;
    use super::MutationRecord;

    #[test]
    fn new_document_has_head_and_body() {
        let doc = Document::new();
        assert_eq!(doc.to_html(), "<html><head></head><body></body></html>");
        assert!(doc.head().is_connected());
        assert!(doc.body().is_connected());
        assert_eq!(doc.pending_mutations(), 0);
    }

    #[test]
    fn finds_only_connected_elements_by_id() {
        let doc = Document::new();
        let app = doc.create_element("div");
        app.set_id("app");
        assert!(doc.get_element_by_id("app").is_none());

        assert!(doc.body().append_child(&app).is_ok());
        let found = doc.get_element_by_id("app");
        assert_eq!(found, Some(app.clone()));

        assert!(app.remove());
        assert!(doc.get_element_by_id("app").is_none());
    }

    #[test]
    fn records_child_list_changes_in_order() {
        let doc = Document::new();
        let outer = doc.create_element("div");
        let inner = doc.create_element("span");

        assert!(outer.append_child(&inner).is_ok());
        assert!(doc.body().append_child(&outer).is_ok());
        assert!(outer.remove_child(&inner).is_ok());

        assert_eq!(
            doc.take_mutations(),
            vec![
                MutationRecord::ChildAppended {
                    parent: outer.node_id(),
                    child: inner.node_id(),
                },
                MutationRecord::ChildAppended {
                    parent: doc.body().node_id(),
                    child: outer.node_id(),
                },
                MutationRecord::ChildRemoved {
                    parent: outer.node_id(),
                    child: inner.node_id(),
                },
            ]
        );
        assert_eq!(doc.pending_mutations(), 0);
    }

    #[test]
    fn ownership_is_per_document() {
        let first = Document::new();
        let second = Document::new();
        let element = first.create_element("p");
        assert!(first.owns(&element));
        assert!(!second.owns(&element));
        assert_ne!(first, second);
        assert_eq!(first.clone(), first);
    }

    #[test]
    fn node_ids_are_unique_per_document() {
        let doc = Document::new();
        let a = doc.create_element("div");
        let b = doc.create_element("div");
        assert_ne!(a.node_id(), b.node_id());
        assert_ne!(a.node_id(), doc.body().node_id());
    }
}
