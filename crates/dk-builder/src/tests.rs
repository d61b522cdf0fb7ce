use crate::Anchor;
use crate::BuilderConfig;
use crate::MountSummary;
use crate::TreeBuilder;
use dk_component::ComponentNode;
use dk_css::Channel;
use dk_dom::Document;
use dk_dom::Element;
use dk_dom::MutationRecord;
use pretty_assertions::assert_eq;
use std::cell::Cell;
use std::rc::Rc;

fn document_with_app() -> (Document, Element) {
    let doc = Document::new();
    let app = doc.create_element("div");
    app.set_id("app");
    assert!(doc.body().append_child(&app).is_ok());
    doc.take_mutations();
    (doc, app)
}

fn builder(doc: &Document) -> TreeBuilder {
    TreeBuilder::with_config(doc, BuilderConfig::seeded(0x5eed)).unwrap_or_else(|_| unreachable!())
}

fn name_of(node: &ComponentNode) -> String {
    node.assigned_name().unwrap_or_default().to_owned()
}

fn appended(doc: &Document) -> Vec<(u64, u64)> {
    doc.take_mutations()
        .into_iter()
        .filter_map(|record| match record {
            MutationRecord::ChildAppended { parent, child } => Some((parent, child)),
            _ => None,
        })
        .collect()
}

fn assert_every_node_carries_its_name(node: &ComponentNode) {
    let name = node.assigned_name();
    assert!(name.is_some(), "{} was not named", node.kind());
    assert!(node.element().has_class(name.unwrap_or_default()));
    for child in node.children() {
        assert_eq!(child.element().parent().as_ref(), Some(node.element()));
        assert_every_node_carries_its_name(child);
    }
}

#[test]
fn nested_button_gets_its_own_scoped_class() {
    let (doc, app) = document_with_app();
    let mut builder = builder(&doc);
    let mut root = ComponentNode::new(&doc, "div", "div")
        .with_child(ComponentNode::new(&doc, "button", "button").with_style([("color", "red")]));

    assert!(builder.mount("app", &mut root).is_ok());
    let child = &root.children()[0];
    let child_name = name_of(child);
    assert!(child_name.starts_with("button_"));
    assert_ne!(child_name, name_of(&root));

    let descendant = app.children()[0].children()[0].clone();
    assert_eq!(&descendant, child.element());
    assert!(descendant.has_class(&child_name));
    assert!(!descendant.has_class(&name_of(&root)));
    assert!(builder
        .sink()
        .text()
        .contains(&format!(".{child_name} {{\n\tcolor: red;\n}}\n")));
}

#[test]
fn exhausted_names_leave_no_partial_mount() {
    let (doc, app) = document_with_app();
    let config = BuilderConfig {
        suffix_len: 1,
        ..BuilderConfig::seeded(21)
    };
    let mut builder = TreeBuilder::with_config(&doc, config).unwrap_or_else(|_| unreachable!());
    let mut root = ComponentNode::new(&doc, "Root", "div");
    for _ in 0..70 {
        root.append_child(ComponentNode::new(&doc, "A", "span").with_style([("color", "red")]));
    }

    let err = builder
        .mount("app", &mut root)
        .map_err(|err| (err.is_configuration(), err.code()));
    assert_eq!(err, Err((true, "names.retry_exhausted")));

    assert_eq!(builder.sink().text(), "");
    assert_eq!(builder.sink().rule_count(), 0);
    assert!(!builder.sink().is_mounted());
    assert!(builder.names().is_empty());
    assert!(root.element().children().is_empty());
    assert!(app.children().is_empty());
    assert_eq!(root.assigned_name(), None);
    assert!(root.children().iter().all(|child| child.assigned_name().is_none()));
    assert_eq!(doc.pending_mutations(), 0);
}

#[test]
fn one_mount_writes_the_stylesheet_once() {
    let (doc, _app) = document_with_app();
    let mut builder = builder(&doc);
    let mut root = ComponentNode::new(&doc, "List", "ul");
    for _ in 0..200 {
        root.append_child(ComponentNode::new(&doc, "Item", "li").with_style([("margin", 0)]));
    }

    assert!(builder.mount("app", &mut root).is_ok());
    let style_id = builder.sink().element().node_id();
    let writes = doc
        .take_mutations()
        .into_iter()
        .filter(|record| *record == MutationRecord::TextChanged { target: style_id })
        .count();
    assert_eq!(writes, 1);
    assert_eq!(
        builder.sink().element().text_content().as_deref(),
        Some(builder.sink().text())
    );
}

#[test]
fn single_node_gets_scoped_rule_and_class() {
    let (doc, app) = document_with_app();
    let mut builder = builder(&doc);
    let mut title = ComponentNode::new(&doc, "Title", "h1")
        .with_style([("color", "red")])
        .with_content("Hello");

    let summary = builder.mount("app", &mut title);
    assert_eq!(
        summary,
        Ok(MountSummary {
            components: 1,
            default_rules: 1,
            variant_rules: 0,
            names_issued: 1,
        })
    );

    let name = name_of(&title);
    assert!(name.starts_with("Title_"));
    assert_eq!(builder.sink().text(), format!(".{name} {{\n\tcolor: red;\n}}\n"));
    assert!(title.element().has_class(&name));
    assert_eq!(app.children(), vec![title.element().clone()]);
    assert!(builder.sink().is_mounted());
    assert_eq!(doc.head().children(), vec![builder.sink().element().clone()]);
}

#[test]
fn empty_default_channel_still_emits_a_block() {
    let (doc, _app) = document_with_app();
    let mut builder = builder(&doc);
    let mut plain = ComponentNode::new(&doc, "div", "div");

    assert!(builder.mount("app", &mut plain).is_ok());
    let name = name_of(&plain);
    assert_eq!(builder.sink().text(), format!(".{name} {{\n\n}}\n"));
}

#[test]
fn hover_rule_uses_hover_declarations() {
    let (doc, _app) = document_with_app();
    let mut builder = builder(&doc);
    let mut button = ComponentNode::new(&doc, "Button", "button")
        .with_style([("backgroundColor", "red"), ("fontSize", "20px")])
        .with_hover_style([("filter", "brightness(125%)")]);

    assert!(builder.mount("app", &mut button).is_ok());
    let name = name_of(&button);
    assert_eq!(
        builder.sink().text(),
        format!(
            ".{name} {{\n\tbackground-color: red;\n\tfont-size: 20px;\n}}\n\
             .{name}:hover {{\n\tfilter: brightness(125%);\n}}\n"
        )
    );
}

#[test]
fn pseudo_channels_follow_hover() {
    let (doc, _app) = document_with_app();
    let mut builder = builder(&doc);
    let mut input = ComponentNode::new(&doc, "Field", "input")
        .with_channel_style(Channel::pseudo("focus"), [("outline", "none")])
        .with_hover_style([("opacity", "0.9")])
        .with_style([("padding", 4)]);

    let summary = builder.mount("app", &mut input);
    assert_eq!(summary.map(|s| s.variant_rules), Ok(2));

    let name = name_of(&input);
    let selectors: Vec<String> = builder
        .sink()
        .rules()
        .into_iter()
        .map(|rule| rule.selector)
        .collect();
    assert_eq!(
        selectors,
        vec![
            format!(".{name}"),
            format!(".{name}:hover"),
            format!(".{name}:focus"),
        ]
    );
}

#[test]
fn children_attach_before_their_parent() {
    let (doc, app) = document_with_app();
    let mut builder = builder(&doc);
    let leaf = ComponentNode::new(&doc, "Item", "li");
    let leaf_id = leaf.element().node_id();
    let list = ComponentNode::new(&doc, "List", "ul").with_child(leaf);
    let list_id = list.element().node_id();
    let footer = ComponentNode::new(&doc, "Footer", "footer");
    let footer_id = footer.element().node_id();
    let mut roots = vec![list, footer];

    assert!(builder.mount_all("app", &mut roots).is_ok());
    assert_eq!(
        appended(&doc),
        vec![
            (doc.head().node_id(), builder.sink().element().node_id()),
            (list_id, leaf_id),
            (app.node_id(), list_id),
            (app.node_id(), footer_id),
        ]
    );
}

#[test]
fn stylesheet_has_one_block_per_node_plus_hover_blocks() {
    let (doc, _app) = document_with_app();
    let mut builder = builder(&doc);
    let mut root = ComponentNode::new(&doc, "Card", "section");
    for idx in 0..5 {
        let mut item = ComponentNode::new(&doc, "Row", "div").with_style([("order", idx)]);
        if idx % 2 == 0 {
            item.set_hover_style([("color", "blue")]);
        }
        root.append_child(item.with_child(ComponentNode::new(&doc, "Cell", "span")));
    }

    let summary = builder.mount("app", &mut root).unwrap_or_default();
    assert_eq!(summary.components, 11);
    assert_eq!(summary.default_rules, 11);
    assert_eq!(summary.variant_rules, 3);

    assert_every_node_carries_its_name(&root);

    let rules = builder.sink().rules();
    assert_eq!(rules.len(), 14);
    assert_eq!(builder.sink().rule_count(), 14);
    assert_eq!(
        rules.iter().filter(|rule| rule.selector.ends_with(":hover")).count(),
        3
    );
    assert_eq!(builder.names().len(), 11);
}

#[test]
fn missing_anchor_changes_nothing() {
    let (doc, _app) = document_with_app();
    let mut builder = builder(&doc);
    let mut node = ComponentNode::new(&doc, "Button", "button").with_style([("color", "red")]);

    let err = builder
        .mount("nope", &mut node)
        .map_err(|err| (err.is_configuration(), err.code()));
    assert_eq!(err, Err((true, "builder.anchor_missing")));
    assert_eq!(builder.sink().text(), "");
    assert!(!builder.sink().is_mounted());
    assert!(builder.names().is_empty());
    assert_eq!(node.assigned_name(), None);
    assert_eq!(doc.pending_mutations(), 0);
}

#[test]
fn foreign_component_aborts_before_any_mutation() {
    let (doc, _app) = document_with_app();
    let other = Document::new();
    let mut builder = builder(&doc);
    let mut parent = ComponentNode::new(&doc, "Panel", "div")
        .with_child(ComponentNode::new(&doc, "Ok", "p"))
        .with_child(ComponentNode::new(&other, "Stray", "p"));

    let err = builder
        .mount("app", &mut parent)
        .map_err(|err| (err.is_usage(), err.code()));
    assert_eq!(err, Err((true, "builder.foreign_component")));
    assert!(builder.names().is_empty());
    assert_eq!(builder.sink().rule_count(), 0);
    assert_eq!(doc.pending_mutations(), 0);
}

#[test]
fn anchor_inside_the_tree_is_rejected() {
    let (doc, _app) = document_with_app();
    let mut builder = builder(&doc);
    let slot = ComponentNode::new(&doc, "Slot", "div");
    slot.element().set_id("slot");
    assert!(doc.body().append_child(slot.element()).is_ok());
    let mut parent = ComponentNode::new(&doc, "Panel", "div").with_child(slot);

    let err = builder.mount("slot", &mut parent).map_err(|err| err.code());
    assert_eq!(err, Err("builder.anchor_inside_tree"));
}

#[test]
fn child_attached_elsewhere_is_rejected() {
    let (doc, _app) = document_with_app();
    let mut builder = builder(&doc);
    let stray_parent = doc.create_element("div");
    let child = ComponentNode::new(&doc, "Item", "li");
    assert!(stray_parent.append_child(child.element()).is_ok());
    let mut list = ComponentNode::new(&doc, "List", "ul").with_child(child);

    let err = builder.mount("app", &mut list).map_err(|err| err.code());
    assert_eq!(err, Err("builder.child_attached_elsewhere"));
}

#[test]
fn remount_after_removal_reuses_names_and_appends_rules() {
    let (doc, app) = document_with_app();
    let mut builder = builder(&doc);
    let mut button = ComponentNode::new(&doc, "Button", "button")
        .with_style([("color", "red")])
        .with_child(ComponentNode::new(&doc, "Label", "span"));

    assert!(builder.mount("app", &mut button).is_ok());
    let first_name = name_of(&button);

    let err = builder.mount("app", &mut button).map_err(|err| err.code());
    assert_eq!(err, Err("builder.already_mounted"));

    assert!(button.remove_from_document());
    assert!(app.children().is_empty());
    button.set_style([("color", "green")]);

    let summary = builder.mount(&app, &mut button).unwrap_or_default();
    assert_eq!(summary.names_issued, 0);
    assert_eq!(summary.components, 2);
    assert_eq!(name_of(&button), first_name);
    assert_eq!(builder.names().len(), 2);
    assert_eq!(builder.sink().rule_count(), 4);

    let colors: Vec<String> = builder
        .sink()
        .rules()
        .into_iter()
        .filter(|rule| rule.selector == format!(".{first_name}"))
        .filter_map(|rule| rule.declaration("color").map(str::to_owned))
        .collect();
    assert_eq!(colors, vec!["red".to_owned(), "green".to_owned()]);
    assert_eq!(button.element().class_list(), vec![first_name]);
}

#[test]
fn stylesheet_is_mounted_once_across_mounts() {
    let (doc, _app) = document_with_app();
    let mut builder = builder(&doc);
    let mut first = ComponentNode::new(&doc, "A", "div");
    let mut second = ComponentNode::new(&doc, "B", "div");

    assert!(builder.mount("app", &mut first).is_ok());
    assert!(builder.mount(Anchor::Id("app".to_owned()), &mut second).is_ok());
    assert_eq!(doc.head().children().len(), 1);
    assert_ne!(first.assigned_name(), second.assigned_name());
}

#[test]
fn marker_classes_and_handlers_survive_mounting() {
    let (doc, app) = document_with_app();
    let mut builder = builder(&doc);
    let clicks = Rc::new(Cell::new(0_u32));
    let seen = Rc::clone(&clicks);
    let mut button = ComponentNode::new(&doc, "Button", "button")
        .with_class_name("primary")
        .with_click_handler(move |_| seen.set(seen.get() + 1))
        .with_content(ComponentNode::new(&doc, "Title", "h1").with_content("Go"));

    assert!(builder.mount("app", &mut button).is_ok());
    let name = name_of(&button);
    assert_eq!(
        button.element().class_list(),
        vec!["primary".to_owned(), name.clone()]
    );

    let label = button.children()[0].element().clone();
    assert_eq!(label.dispatch_click(), 1);
    assert_eq!(clicks.get(), 1);

    let html = app.outer_html();
    assert!(html.contains(&format!("class=\"primary {name}\"")));
    assert!(html.contains(">Go</h1>"));
}

#[test]
fn invalid_config_is_a_configuration_error() {
    let doc = Document::new();
    let config = BuilderConfig {
        suffix_len: 0,
        ..BuilderConfig::default()
    };
    let err = TreeBuilder::with_config(&doc, config).map(|_| ()).map_err(|err| err.code());
    assert_eq!(err, Err("config.suffix_len_invalid"));
    assert_eq!(TreeBuilder::new(&doc).config(), &BuilderConfig::default());
}

#[test]
fn empty_mount_is_a_no_op_summary() {
    let (doc, _app) = document_with_app();
    let mut builder = builder(&doc);
    let summary = builder.mount_all("app", &mut []);
    assert_eq!(summary, Ok(MountSummary::default()));
}
