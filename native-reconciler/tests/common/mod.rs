//! Shared fixtures: a headless toolkit and a small positional diffing
//! algorithm driving the host adapter the way a real one would.

#![allow(dead_code)]

use native_reconciler::headless::{Application, ClassRegistry, HeadlessToolkit, ObjectId};
use native_reconciler::{
    Adapter, AdapterConfig, HostConfig, Name, PropMap, Reconciler, Result, SharedToolkit,
    VirtualChild, VirtualNode,
};
use std::rc::Rc;

pub type TestAdapter = Adapter<HeadlessToolkit, Rc<ClassRegistry>>;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

pub struct Fixture {
    pub toolkit: SharedToolkit<HeadlessToolkit>,
    pub registry: Rc<ClassRegistry>,
    pub app: Application,
}

impl Fixture {
    pub fn new() -> Self {
        init_tracing();
        let registry = Rc::new(ClassRegistry::gtk());
        Self {
            toolkit: HeadlessToolkit::shared(Rc::clone(&registry)),
            registry,
            app: Application::new("org.example.Test"),
        }
    }

    pub fn adapter(&self) -> TestAdapter {
        Adapter::new(
            Rc::clone(&self.toolkit),
            Rc::clone(&self.registry),
            &AdapterConfig::default(),
        )
    }

    pub fn reconciler(&self) -> TreeReconciler {
        TreeReconciler {
            adapter: self.adapter(),
        }
    }

    /// Visible label texts under `id`, depth first.
    pub fn visible_text(&self, id: ObjectId) -> Vec<String> {
        let toolkit = self.toolkit.borrow();
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            if !toolkit.is_visible(id) {
                continue;
            }
            if toolkit.class_name(id) == Some("GtkLabel") {
                if let Some(text) = toolkit.property(id, "label").and_then(|v| v.as_str()) {
                    out.push(text.to_string());
                }
            }
            stack.extend(toolkit.children(id).into_iter().rev());
        }
        out
    }
}

/// What the diffing algorithm remembers about a committed child.
#[derive(Debug)]
pub enum Mounted {
    Element {
        kind: Name,
        props: PropMap,
        instance: ObjectId,
        children: Vec<Mounted>,
    },
    Text {
        text: String,
        instance: ObjectId,
    },
}

impl Mounted {
    pub fn instance(&self) -> ObjectId {
        match self {
            Mounted::Element { instance, .. } | Mounted::Text { instance, .. } => *instance,
        }
    }
}

#[derive(Debug)]
pub struct Container {
    pub app: Application,
    pub root: Option<Mounted>,
}

impl Container {
    pub fn root_instance(&self) -> Option<ObjectId> {
        self.root.as_ref().map(Mounted::instance)
    }
}

/// Position-matched diffing: same index and same type means update,
/// anything else means replace.
pub struct TreeReconciler {
    pub adapter: TestAdapter,
}

impl TreeReconciler {
    fn mount(&mut self, app: &Application, child: &VirtualChild) -> Result<Mounted> {
        match child {
            VirtualChild::Text(text) => {
                let instance = self.adapter.create_text_instance(text, app, &())?;
                Ok(Mounted::Text {
                    text: text.clone(),
                    instance,
                })
            }
            VirtualChild::Element(node) => {
                let instance = self
                    .adapter
                    .create_instance(&node.kind, &node.props, app, &())?;
                let mut children = Vec::with_capacity(node.children.len());
                for child in &node.children {
                    let mounted = self.mount(app, child)?;
                    self.adapter
                        .append_initial_child(&instance, &mounted.instance())?;
                    children.push(mounted);
                }
                self.adapter
                    .finalize_initial_children(&instance, &node.kind, &node.props, app, &());
                Ok(Mounted::Element {
                    kind: node.kind.clone(),
                    props: node.props.clone(),
                    instance,
                    children,
                })
            }
        }
    }

    /// `false` when `next` cannot be patched into `mounted`.
    fn patch(
        &mut self,
        app: &Application,
        mounted: &mut Mounted,
        next: &VirtualChild,
    ) -> Result<bool> {
        match (mounted, next) {
            (Mounted::Text { text, instance }, VirtualChild::Text(next)) => {
                if text != next {
                    self.adapter.commit_text_update(instance, text, next)?;
                    *text = next.clone();
                }
                Ok(true)
            }
            (
                Mounted::Element {
                    kind,
                    props,
                    instance,
                    children,
                },
                VirtualChild::Element(node),
            ) if *kind == node.kind => {
                let payload = self
                    .adapter
                    .prepare_update(instance, kind, props, &node.props);
                if let Some(payload) = payload {
                    self.adapter
                        .commit_update(instance, payload, kind, props, &node.props)?;
                }
                *props = node.props.clone();
                let parent = *instance;
                self.patch_children(app, parent, children, &node.children)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn patch_children(
        &mut self,
        app: &Application,
        parent: ObjectId,
        mounted: &mut Vec<Mounted>,
        next: &[VirtualChild],
    ) -> Result<()> {
        for (i, child) in next.iter().enumerate() {
            if i < mounted.len() {
                if !self.patch(app, &mut mounted[i], child)? {
                    let fresh = self.mount(app, child)?;
                    let stale = std::mem::replace(&mut mounted[i], fresh);
                    self.adapter
                        .insert_before(&parent, &mounted[i].instance(), &stale.instance())?;
                    self.adapter.remove_child(&parent, &stale.instance())?;
                }
            } else {
                let fresh = self.mount(app, child)?;
                self.adapter.append_child(&parent, &fresh.instance())?;
                mounted.push(fresh);
            }
        }
        if mounted.len() > next.len() {
            for stale in mounted.drain(next.len()..) {
                self.adapter.remove_child(&parent, &stale.instance())?;
            }
        }
        Ok(())
    }
}

impl Reconciler for TreeReconciler {
    type Root = Application;
    type Container = Container;

    fn create_container(&mut self, root: &Application) -> Container {
        Container {
            app: root.clone(),
            root: None,
        }
    }

    fn update_container(&mut self, tree: &VirtualNode, container: &mut Container) -> Result<()> {
        let app = container.app.clone();
        let next = VirtualChild::Element(tree.clone());
        self.adapter.prepare_for_commit(&app);

        let patched = match container.root.as_mut() {
            Some(root) => self.patch(&app, root, &next)?,
            None => false,
        };
        if !patched {
            let fresh = self.mount(&app, &next)?;
            if let Some(stale) = container.root.take() {
                self.adapter
                    .remove_child_from_container(&app, &stale.instance())?;
            }
            self.adapter
                .append_child_to_container(&app, &fresh.instance())?;
            container.root = Some(fresh);
        }

        self.adapter.reset_after_commit(&app);
        Ok(())
    }
}
