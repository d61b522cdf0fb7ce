//! Mounts component trees into a host document.
//!
//! [`TreeBuilder`] walks each tree depth-first. Every node gets a scoped class
//! name from the [`NameRegistry`], its style channels are written to the
//! shared [`StyleSheetSink`], and its element is attached under its parent
//! once the node's own subtree is complete.
//!
//! ```
//! use dk_builder::BuilderConfig;
//! use dk_builder::TreeBuilder;
//! use dk_component::ComponentNode;
//! use dk_dom::Document;
//!
//! # fn main() -> Result<(), dk_core::KitError> {
//! let doc = Document::new();
//! let app = doc.create_element("div");
//! app.set_id("app");
//! doc.body().append_child(&app)?;
//!
//! let mut button = ComponentNode::new(&doc, "Button", "button")
//!     .with_style([("color", "red")])
//!     .with_content("Go");
//! let mut builder = TreeBuilder::with_config(&doc, BuilderConfig::seeded(1))?;
//! let summary = builder.mount("app", &mut button)?;
//!
//! assert_eq!(summary.components, 1);
//! assert!(builder.sink().text().contains("\tcolor: red;"));
//! # Ok(())
//! # }
//! ```

mod anchor;
mod config;
mod names;
mod sink;

pub use anchor::Anchor;
pub use config::BuilderConfig;
pub use config::DEFAULT_MAX_NAME_ATTEMPTS;
pub use config::DEFAULT_SUFFIX_LEN;
pub use config::MAX_SUFFIX_LEN;
pub use names::NameRegistry;
pub use sink::StyleSheetSink;

use dk_component::ComponentNode;
use dk_core::KitError;
use dk_core::KitResult;
use dk_css::Channel;
use dk_dom::Document;
use dk_dom::Element;

/// Counts reported by one successful mount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MountSummary {
    /// Nodes visited, top-level nodes included.
    pub components: usize,
    /// One per visited node, even when the default channel is empty.
    pub default_rules: usize,
    /// Hover and other pseudo-channel rules.
    pub variant_rules: usize,
    /// Names drawn during this mount. Re-mounted nodes keep their names.
    pub names_issued: usize,
}

impl MountSummary {
    pub fn rules(&self) -> usize {
        self.default_rules + self.variant_rules
    }
}

/// Owns the name registry and stylesheet of one document.
#[derive(Debug)]
pub struct TreeBuilder {
    document: Document,
    config: BuilderConfig,
    names: NameRegistry,
    sink: StyleSheetSink,
}

impl TreeBuilder {
    pub fn new(document: &Document) -> Self {
        let config = BuilderConfig::default();
        Self {
            document: document.clone(),
            names: NameRegistry::from_valid(&config),
            sink: StyleSheetSink::new(document),
            config,
        }
    }

    pub fn with_config(document: &Document, config: BuilderConfig) -> KitResult<Self> {
        let names = NameRegistry::new(&config)?;
        Ok(Self {
            document: document.clone(),
            names,
            sink: StyleSheetSink::new(document),
            config,
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    pub fn names(&self) -> &NameRegistry {
        &self.names
    }

    pub fn sink(&self) -> &StyleSheetSink {
        &self.sink
    }

    /// Mounts a single tree under `anchor`. See [`TreeBuilder::mount_all`].
    pub fn mount(
        &mut self,
        anchor: impl Into<Anchor>,
        node: &mut ComponentNode,
    ) -> KitResult<MountSummary> {
        self.mount_all(anchor, std::slice::from_mut(node))
    }

    /// Mounts each tree of `nodes` under `anchor`, in order.
    ///
    /// The anchor and every node are checked, and every missing name is
    /// drawn, before anything is changed. A failed mount leaves the document,
    /// the registry and the stylesheet untouched.
    pub fn mount_all(
        &mut self,
        anchor: impl Into<Anchor>,
        nodes: &mut [ComponentNode],
    ) -> KitResult<MountSummary> {
        let anchor = anchor.into();
        let target = anchor.resolve(&self.document)?;
        for node in nodes.iter() {
            self.check_tree(node, None, &target)?;
        }

        let mut kinds = Vec::new();
        for node in nodes.iter() {
            collect_unnamed(node, &mut kinds);
        }
        let mut fresh = self.names.generate_all(&kinds)?.into_iter();

        tracing::debug!(anchor = %anchor, roots = nodes.len(), "mounting component trees");

        if self.sink.mount_into(&self.document.head())? {
            tracing::debug!("stylesheet attached to <head>");
        }

        let mut summary = MountSummary::default();
        for node in nodes.iter_mut() {
            self.build_node(node, &mut fresh, &mut summary)?;
            target.append_child(node.element())?;
        }
        self.sink.flush();

        tracing::debug!(
            anchor = %anchor,
            components = summary.components,
            rules = summary.rules(),
            names_issued = summary.names_issued,
            "mount complete"
        );
        Ok(summary)
    }

    fn check_tree(
        &self,
        node: &ComponentNode,
        parent: Option<&Element>,
        anchor: &Element,
    ) -> KitResult<()> {
        let element = node.element();
        if !self.document.owns(element) {
            return Err(KitError::usage(
                "builder.foreign_component",
                format!("{} was created for another document", describe(node)),
            ));
        }

        if element.contains(anchor) {
            return Err(KitError::usage(
                "builder.anchor_inside_tree",
                format!("{} contains the mount anchor", describe(node)),
            ));
        }

        match (parent, element.parent()) {
            (None, Some(_)) => {
                return Err(KitError::usage(
                    "builder.already_mounted",
                    format!(
                        "{} is still attached; remove it before mounting again",
                        describe(node)
                    ),
                ));
            }
            (Some(expected), Some(actual)) if actual != *expected => {
                return Err(KitError::usage(
                    "builder.child_attached_elsewhere",
                    format!(
                        "{} is attached to <{}> #{} outside its component parent",
                        describe(node),
                        actual.tag_name(),
                        actual.node_id()
                    ),
                ));
            }
            _ => {}
        }

        node.children()
            .iter()
            .try_for_each(|child| self.check_tree(child, Some(element), anchor))
    }

    /// Emits rules for `node` and its subtree and attaches children.
    ///
    /// Unnamed nodes take the next entry of `fresh`, which holds one name per
    /// unnamed node in pre-order.
    fn build_node(
        &mut self,
        node: &mut ComponentNode,
        fresh: &mut impl Iterator<Item = String>,
        summary: &mut MountSummary,
    ) -> KitResult<()> {
        let name = match node.assigned_name() {
            Some(name) => name.to_owned(),
            None => {
                let name = fresh.next().ok_or_else(|| {
                    KitError::usage(
                        "builder.unnamed_component",
                        format!("{} has no name drawn for it", describe(node)),
                    )
                })?;
                node.assign_name(name.clone());
                summary.names_issued += 1;
                name
            }
        };

        let styles = node.styles();
        self.sink
            .append_rule(&format!(".{name}"), &styles.serialize(&Channel::Default));
        summary.default_rules += 1;
        for channel in styles.variant_channels() {
            self.sink.append_rule(
                &format!(".{name}{}", channel.selector_suffix()),
                &styles.serialize(channel),
            );
            summary.variant_rules += 1;
        }

        node.element().add_class(&name);
        summary.components += 1;
        tracing::trace!(kind = node.kind(), name = %name, "component built");

        let element = node.element().clone();
        for child in node.children_mut() {
            self.build_node(child, fresh, summary)?;
            if child.element().parent().as_ref() != Some(&element) {
                element.append_child(child.element())?;
            }
        }

        Ok(())
    }
}

/// Pushes the kind of every unnamed node of the subtree, in pre-order.
fn collect_unnamed<'a>(node: &'a ComponentNode, kinds: &mut Vec<&'a str>) {
    if node.assigned_name().is_none() {
        kinds.push(node.kind());
    }
    for child in node.children() {
        collect_unnamed(child, kinds);
    }
}

fn describe(node: &ComponentNode) -> String {
    match node.assigned_name() {
        Some(name) => format!("component `{}` ({name})", node.kind()),
        None => format!("component `{}`", node.kind()),
    }
}

#[cfg(test)]
mod tests;
