//! Prop updates committed through a diffing pass.

mod common;

use common::Fixture;
use native_reconciler::headless::{MainContext, ObjectId};
use native_reconciler::{
    Callback, HostConfig, PlatformLoop, PropMap, PropValue, Reconciler, VirtualNode, props,
};
use std::cell::Cell;
use std::rc::Rc;

fn styled_box(style: PropMap) -> VirtualNode {
    VirtualNode::new("adw-application-window")
        .child(VirtualNode::new("gtk-box").prop("style", style).text("hi"))
}

fn inner_box(fx: &Fixture) -> ObjectId {
    fx.toolkit.borrow().find_all("GtkBox")[0]
}

#[test]
fn test_style_shrinks_to_remaining_declarations() {
    let fx = Fixture::new();
    let mut reconciler = fx.reconciler();
    let mut container = reconciler.create_container(&fx.app);

    let before = props([
        ("color", PropValue::from("red")),
        ("padding", PropValue::Int(40)),
    ]);
    reconciler
        .update_container(&styled_box(before), &mut container)
        .unwrap();
    let target = inner_box(&fx);
    {
        let toolkit = fx.toolkit.borrow();
        let declarations: Vec<_> = toolkit.stylesheet(target).unwrap().declarations().collect();
        assert_eq!(declarations, ["color: red;", "padding: 40px;"]);
        assert_eq!(toolkit.live_providers(), 1);
    }

    reconciler
        .update_container(&styled_box(props([("color", "red")])), &mut container)
        .unwrap();

    let toolkit = fx.toolkit.borrow();
    let declarations: Vec<_> = toolkit.stylesheet(target).unwrap().declarations().collect();
    assert_eq!(declarations, ["color: red;"]);
    assert_eq!(toolkit.live_providers(), 1);
}

#[test]
fn test_repeated_style_updates_never_leak_providers() {
    let fx = Fixture::new();
    let mut reconciler = fx.reconciler();
    let mut container = reconciler.create_container(&fx.app);

    for k in 0..10_i64 {
        let style = props([("marginTop", PropValue::Int(k)), ("color", PropValue::from("blue"))]);
        reconciler
            .update_container(&styled_box(style), &mut container)
            .unwrap();

        let toolkit = fx.toolkit.borrow();
        assert_eq!(toolkit.live_providers(), 1, "after update {k}");
        assert!(toolkit.stylesheet(inner_box(&fx)).is_some());
    }
}

#[test]
fn test_unchanged_render_commits_nothing() {
    let fx = Fixture::new();
    let mut adapter = fx.adapter();
    let old = props([
        ("label", PropValue::from("ok")),
        ("sensitive", PropValue::Bool(true)),
        ("xalign", PropValue::Float(f64::NAN)),
    ]);
    let new = old.clone();
    let label = adapter
        .create_instance("gtk-label", &old, &fx.app, &())
        .unwrap();

    assert!(adapter.prepare_update(&label, "gtk-label", &old, &new).is_none());
}

#[test]
fn test_signal_props_are_never_diffed() {
    let fx = Fixture::new();
    let mut adapter = fx.adapter();
    let old = props([
        ("onClicked", PropValue::from(Callback::new(|_| {}))),
        ("onNotify:label", PropValue::from(Callback::new(|_| {}))),
        ("label", PropValue::from("a")),
    ]);
    let new = props([
        ("onClicked", PropValue::from(Callback::new(|_| {}))),
        ("label", PropValue::from("a")),
    ]);
    let button = adapter
        .create_instance("gtk-button", &old, &fx.app, &())
        .unwrap();

    assert!(adapter.prepare_update(&button, "gtk-button", &old, &new).is_none());
    let toolkit = fx.toolkit.borrow();
    let settable = &toolkit.object(button).unwrap().props;
    assert!(!settable.contains_key("onClicked"));
    assert!(!settable.contains_key("onNotify:label"));
}

#[test]
fn test_handler_swap_after_creation_is_ignored() {
    let fx = Fixture::new();
    let mut reconciler = fx.reconciler();
    let mut container = reconciler.create_container(&fx.app);
    let first_hits = Rc::new(Cell::new(0));
    let second_hits = Rc::new(Cell::new(0));

    let handler = |hits: &Rc<Cell<i32>>| {
        let hits = Rc::clone(hits);
        Callback::new(move |_| hits.set(hits.get() + 1))
    };
    let tree = |callback: Callback| {
        VirtualNode::new("adw-application-window")
            .child(VirtualNode::new("gtk-button").prop("onClicked", callback))
    };

    reconciler
        .update_container(&tree(handler(&first_hits)), &mut container)
        .unwrap();
    reconciler
        .update_container(&tree(handler(&second_hits)), &mut container)
        .unwrap();

    let button = fx.toolkit.borrow().find_all("GtkButton")[0];
    fx.toolkit.borrow_mut().emit(button, "clicked", Vec::new());
    let mut context = MainContext::new(Rc::clone(&fx.toolkit));
    context.iterate_once();

    assert_eq!(first_hits.get(), 1);
    assert_eq!(second_hits.get(), 0);
}

#[test]
fn test_removed_props_return_to_unset_values() {
    let fx = Fixture::new();
    let mut reconciler = fx.reconciler();
    let mut container = reconciler.create_container(&fx.app);

    let with = VirtualNode::new("adw-application-window").child(
        VirtualNode::new("gtk-label")
            .prop("label", "x")
            .prop("wrap", true)
            .prop("tooltipText", "tip")
            .prop("xalign", 0.0),
    );
    let without = VirtualNode::new("adw-application-window")
        .child(VirtualNode::new("gtk-label").prop("label", "x"));

    reconciler.update_container(&with, &mut container).unwrap();
    reconciler.update_container(&without, &mut container).unwrap();

    let toolkit = fx.toolkit.borrow();
    let label = toolkit.find_all("GtkLabel")[0];
    assert!(toolkit.property(label, "wrap").unwrap().eq_value(&false.into()));
    assert!(toolkit.property(label, "tooltipText").unwrap().is_null());
    assert!(toolkit.property(label, "xalign").unwrap().eq_value(&PropValue::Float(0.5)));
    assert!(toolkit.property(label, "label").unwrap().eq_value(&"x".into()));
}

#[test]
fn test_tree_from_json() {
    let fx = Fixture::new();
    let mut reconciler = fx.reconciler();
    let mut container = reconciler.create_container(&fx.app);

    let tree = VirtualNode::from_json(
        r#"{
            "type": "adw-application-window",
            "props": { "title": "Json" },
            "children": [
                { "type": "gtk-box", "props": { "spacing": 6, "style": { "fontSize": 18 } },
                  "children": ["first", { "type": "gtk-label", "props": { "label": "second" } }] }
            ]
        }"#,
    )
    .unwrap();
    reconciler.update_container(&tree, &mut container).unwrap();

    let window = container.root_instance().unwrap();
    assert_eq!(fx.visible_text(window), ["first", "second"]);
    let toolkit = fx.toolkit.borrow();
    assert!(toolkit.property(window, "title").unwrap().eq_value(&"Json".into()));
    let declarations: Vec<_> = toolkit
        .stylesheet(inner_box(&fx))
        .unwrap()
        .declarations()
        .collect();
    assert_eq!(declarations, ["font-size: 18px;"]);
}
