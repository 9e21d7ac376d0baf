//! In-memory widget toolkit with GTK-like container behavior.
//!
//! Runs without a display. Used to drive the adapter and the execution loop
//! end to end, and to inspect the resulting native tree.

pub mod events;
pub mod main_context;
pub mod object;
pub mod registry;

pub use events::{EventQueue, PlatformEvent};
pub use main_context::MainContext;
pub use object::{NativeObject, ObjectArena, ObjectId, ProviderId};
pub use registry::{ClassRegistry, ClassSpec, Layout};

use crate::class::ClassDescriptor;
use crate::error::NativeError;
use crate::names::signal_base;
use crate::native::{LifecycleEvent, LifecycleEvents, NativeToolkit, SharedToolkit};
use crate::style::Stylesheet;
use crate::value::{Callback, Name, PropMap, PropValue};
use object::AttachedProvider;
use smallvec::SmallVec;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Class used for text children.
pub const LABEL_CLASS: &str = "GtkLabel";

/// Application object owning the top-level windows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Application {
    pub id: Name,
}

impl Application {
    pub fn new(id: impl Into<Name>) -> Self {
        Self { id: id.into() }
    }
}

#[derive(Debug)]
pub struct HeadlessToolkit {
    registry: Rc<ClassRegistry>,
    objects: ObjectArena,
    /// Loaded and not yet discarded.
    providers: HashMap<ProviderId, Stylesheet>,
    next_provider: u32,
    windows: Vec<ObjectId>,
    active_window: Option<ObjectId>,
    events: EventQueue,
    lifecycle: LifecycleEvents,
}

impl HeadlessToolkit {
    pub fn new(registry: Rc<ClassRegistry>) -> Self {
        Self {
            registry,
            objects: ObjectArena::new(),
            providers: HashMap::new(),
            next_provider: 0,
            windows: Vec::new(),
            active_window: None,
            events: EventQueue::new(),
            lifecycle: LifecycleEvents::new(),
        }
    }

    pub fn shared(registry: Rc<ClassRegistry>) -> SharedToolkit<Self> {
        Rc::new(RefCell::new(Self::new(registry)))
    }

    pub fn registry(&self) -> &Rc<ClassRegistry> {
        &self.registry
    }

    pub fn object(&self, id: ObjectId) -> Option<&NativeObject> {
        self.objects.get(id)
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn class_name(&self, id: ObjectId) -> Option<&str> {
        self.object(id).map(|o| o.class.name())
    }

    pub fn property(&self, id: ObjectId, name: &str) -> Option<&PropValue> {
        self.object(id)?.props.get(name)
    }

    pub fn children(&self, id: ObjectId) -> Vec<ObjectId> {
        self.objects.children(id).to_vec()
    }

    pub fn visible_children(&self, id: ObjectId) -> Vec<ObjectId> {
        self.objects
            .children(id)
            .iter()
            .copied()
            .filter(|c| self.is_visible(*c))
            .collect()
    }

    pub fn is_visible(&self, id: ObjectId) -> bool {
        self.object(id).is_some_and(|o| o.visible)
    }

    /// Objects of `class`, in creation order.
    pub fn find_all(&self, class: &str) -> Vec<ObjectId> {
        self.objects
            .iter()
            .filter(|(_, o)| o.class.name() == class)
            .map(|(id, _)| id)
            .collect()
    }

    pub fn stylesheet(&self, id: ObjectId) -> Option<&Stylesheet> {
        let attached = self.object(id)?.provider.as_ref()?;
        self.providers.get(&attached.id)
    }

    pub fn provider_priority(&self, id: ObjectId) -> Option<u32> {
        Some(self.object(id)?.provider.as_ref()?.priority)
    }

    /// Providers loaded and never discarded, attached or not.
    pub fn live_providers(&self) -> usize {
        self.providers.len()
    }

    pub fn windows(&self) -> &[ObjectId] {
        &self.windows
    }

    pub fn active_window(&self) -> Option<ObjectId> {
        self.active_window
    }

    /// Queue a signal emission for the next main-context iteration.
    pub fn emit(&mut self, object: ObjectId, signal: &str, args: Vec<PropValue>) {
        self.events.push(PlatformEvent::Emit {
            object,
            signal: signal.into(),
            args,
        });
    }

    /// Queue a user close request for the next main-context iteration.
    pub fn close_window(&mut self, window: ObjectId) {
        self.events.push(PlatformEvent::CloseWindow { window });
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    fn take_events(&mut self) -> Vec<PlatformEvent> {
        self.events.take()
    }

    fn take_lifecycle(&mut self) -> LifecycleEvents {
        std::mem::take(&mut self.lifecycle)
    }

    /// Handlers for `signal`. A handler for `notify` also receives every
    /// `notify::<detail>` emission.
    fn handlers_for(&self, object: ObjectId, signal: &str) -> SmallVec<[Callback; 2]> {
        let base = signal_base(signal);
        self.object(object)
            .map(|o| {
                o.handlers
                    .iter()
                    .filter(|(name, _)| name.as_str() == signal || name.as_str() == base)
                    .map(|(_, handler)| handler.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn finish_close(&mut self, window: ObjectId) {
        let Some(pos) = self.windows.iter().position(|w| *w == window) else {
            return;
        };
        self.windows.remove(pos);
        if let Some(object) = self.objects.get_mut(window) {
            object.visible = false;
        }
        if self.active_window == Some(window) {
            self.active_window = self.windows.last().copied();
        }
        tracing::debug!("window {:?} closed", window);
        self.lifecycle.push(LifecycleEvent::WindowRemoved);
    }

    fn spec_of(&self, class: &str) -> Result<&ClassSpec, NativeError> {
        self.registry
            .get(class)
            .ok_or_else(|| NativeError::UnknownClass(class.into()))
    }

    fn get(&self, id: ObjectId) -> Result<&NativeObject, NativeError> {
        self.objects
            .get(id)
            .ok_or_else(|| NativeError::UnknownObject(format!("{id:?}")))
    }

    fn get_mut(&mut self, id: ObjectId) -> Result<&mut NativeObject, NativeError> {
        self.objects
            .get_mut(id)
            .ok_or_else(|| NativeError::UnknownObject(format!("{id:?}")))
    }

    fn check_property(class: &ClassDescriptor, property: &str) -> Result<(), NativeError> {
        if class.has_property(property) {
            Ok(())
        } else {
            Err(NativeError::UnknownProperty {
                class: class.name().into(),
                property: property.into(),
            })
        }
    }

    fn build(&mut self, class: &str, props: PropMap) -> Result<ObjectId, NativeError> {
        let spec = self.spec_of(class)?;
        for name in props.keys() {
            Self::check_property(&spec.descriptor, name)?;
        }

        let mut merged = spec.defaults.clone();
        merged.extend(props);
        let mut object = NativeObject::new(Rc::clone(&spec.descriptor), merged);
        object.visible = spec.layout != Layout::Window;
        Ok(self.objects.create(object))
    }

    fn append(&mut self, parent: ObjectId, child: ObjectId, slot: Option<Name>) {
        let already = self.objects.parent(child) == Some(parent)
            && self.get(child).is_ok_and(|c| c.slot == slot);
        if !already {
            self.objects.attach(parent, child, usize::MAX, slot);
        }
    }
}

impl NativeToolkit for HeadlessToolkit {
    type Object = ObjectId;
    type Provider = ProviderId;
    type Root = Application;

    fn construct(
        &mut self,
        class: &ClassDescriptor,
        props: PropMap,
    ) -> Result<ObjectId, NativeError> {
        self.build(class.name(), props)
    }

    fn create_label(&mut self, text: &str) -> Result<ObjectId, NativeError> {
        let mut props = PropMap::new();
        props.insert("label".into(), text.into());
        self.build(LABEL_CLASS, props)
    }

    fn set_label(&mut self, label: &ObjectId, text: &str) -> Result<(), NativeError> {
        self.set_property(label, "label", &text.into())
    }

    fn descriptor(&self, object: &ObjectId) -> Rc<ClassDescriptor> {
        match self.object(*object) {
            Some(o) => Rc::clone(&o.class),
            None => Rc::new(ClassDescriptor::new("GObject")),
        }
    }

    fn set_property(
        &mut self,
        object: &ObjectId,
        name: &str,
        value: &PropValue,
    ) -> Result<(), NativeError> {
        let target = self.get_mut(*object)?;
        Self::check_property(&target.class, name)?;

        let changed = !target.props.get(name).is_some_and(|old| old.eq_value(value));
        target.props.insert(name.into(), value.clone());

        let detail = format!("notify::{name}");
        if changed && !self.handlers_for(*object, &detail).is_empty() {
            self.emit(*object, &detail, vec![value.clone()]);
        }
        Ok(())
    }

    fn reset_property(&mut self, object: &ObjectId, name: &str) -> Result<(), NativeError> {
        let class = self.get(*object)?.class.name().to_owned();
        let unset = self.spec_of(&class)?.default_value(name);
        self.set_property(object, name, &unset)
    }

    fn connect(
        &mut self,
        object: &ObjectId,
        signal: &str,
        handler: Callback,
    ) -> Result<(), NativeError> {
        let target = self.get_mut(*object)?;
        if !target.class.has_signal(signal) {
            return Err(NativeError::UnknownSignal {
                class: target.class.name().into(),
                signal: signal.into(),
            });
        }
        target.handlers.push((signal.into(), handler));
        Ok(())
    }

    fn set_role(&mut self, object: &ObjectId, role: Option<Name>) {
        if let Some(o) = self.objects.get_mut(*object) {
            o.role = role;
        }
    }

    fn role(&self, object: &ObjectId) -> Option<Name> {
        self.object(*object)?.role.clone()
    }

    fn add_child(
        &mut self,
        parent: &ObjectId,
        child: &ObjectId,
        role: Option<&str>,
    ) -> Result<(), NativeError> {
        let (parent, child) = (*parent, *child);
        let class = self.get(parent)?.class.name().to_owned();

        let mut ancestor = Some(parent);
        while let Some(id) = ancestor {
            if id == child {
                return Err(NativeError::WouldCycle {
                    parent: format!("{parent:?}"),
                    child: format!("{child:?}"),
                });
            }
            ancestor = self.objects.parent(id);
        }
        let layout = self.spec_of(&class)?.layout.clone();

        match layout {
            Layout::Leaf => return Err(NativeError::NotAContainer(class)),
            Layout::Linear => self.append(parent, child, None),
            Layout::Single | Layout::Window => {
                if self.objects.parent(child) != Some(parent) {
                    for previous in self.children(parent) {
                        self.objects.detach(previous);
                    }
                    self.append(parent, child, None);
                }
            }
            Layout::Wrapped { wrapper } => {
                let child_class = self.get(child)?.class.name().to_owned();
                if child_class == wrapper.as_str() {
                    self.append(parent, child, None);
                } else {
                    let current = self.objects.parent(child);
                    let wrapped_here = current.is_some_and(|w| {
                        self.objects.parent(w) == Some(parent)
                            && self.object(w).is_some_and(|o| o.wrapper)
                    });
                    if !wrapped_here {
                        let row = self.build(&wrapper, PropMap::new())?;
                        if let Some(o) = self.objects.get_mut(row) {
                            o.wrapper = true;
                        }
                        tracing::trace!("{:?} wraps {:?} in {:?}", parent, child, row);
                        self.append(parent, row, None);
                        self.append(row, child, None);
                    }
                }
            }
            Layout::Slotted { slots, default } => {
                let slot = role.map(Name::from).or(default);
                match slot {
                    Some(slot) if slots.contains(&slot) => self.append(parent, child, Some(slot)),
                    other => {
                        return Err(NativeError::UnsupportedRole {
                            class: class.into(),
                            role: other.unwrap_or_default(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    fn parent(&self, object: &ObjectId) -> Option<ObjectId> {
        self.objects.parent(*object)
    }

    fn insert_before(
        &mut self,
        parent: &ObjectId,
        child: &ObjectId,
        sibling: &ObjectId,
    ) -> Result<(), NativeError> {
        let (parent, child, sibling) = (*parent, *child, *sibling);
        for id in [child, sibling] {
            if self.objects.parent(id) != Some(parent) {
                return Err(NativeError::NotAChild {
                    parent: format!("{parent:?}"),
                    child: format!("{id:?}"),
                });
            }
        }
        if child == sibling {
            return Ok(());
        }

        let slot = self.get(child)?.slot.clone();
        self.objects.detach(child);
        let index = self
            .objects
            .children(parent)
            .iter()
            .position(|c| *c == sibling)
            .unwrap_or(usize::MAX);
        self.objects.attach(parent, child, index, slot);
        Ok(())
    }

    fn set_visible(&mut self, object: &ObjectId, visible: bool) {
        if let Some(o) = self.objects.get_mut(*object) {
            o.visible = visible;
        }
    }

    fn present(&mut self, root: &Application, window: &ObjectId) -> Result<(), NativeError> {
        let window = *window;
        self.get_mut(window)?.visible = true;
        if !self.windows.contains(&window) {
            tracing::debug!("{} presents window {:?}", root.id, window);
            self.windows.push(window);
            self.lifecycle.push(LifecycleEvent::WindowAdded);
        }
        self.active_window = Some(window);
        Ok(())
    }

    fn insert_top_level_before(
        &mut self,
        root: &Application,
        window: &ObjectId,
        sibling: &ObjectId,
    ) -> Result<(), NativeError> {
        let position = |w: &ObjectId| self.windows.iter().position(|x| x == w);
        let (Some(from), Some(_)) = (position(window), position(sibling)) else {
            return Err(NativeError::NotAChild {
                parent: root.id.to_string(),
                child: format!("{window:?}"),
            });
        };

        self.windows.remove(from);
        let to = self
            .windows
            .iter()
            .position(|x| x == sibling)
            .unwrap_or(self.windows.len());
        self.windows.insert(to, *window);
        Ok(())
    }

    fn style_provider(&self, object: &ObjectId) -> Option<ProviderId> {
        Some(self.object(*object)?.provider.as_ref()?.id)
    }

    fn load_provider(&mut self, sheet: &Stylesheet) -> Result<ProviderId, NativeError> {
        if !sheet.as_str().contains('{') {
            return Err(NativeError::Stylesheet(sheet.to_string()));
        }
        let id = ProviderId(self.next_provider);
        self.next_provider += 1;
        self.providers.insert(id, sheet.clone());
        Ok(id)
    }

    fn attach_provider(&mut self, object: &ObjectId, provider: ProviderId, priority: u32) {
        if let Some(o) = self.objects.get_mut(*object) {
            o.provider = Some(AttachedProvider {
                id: provider,
                priority,
            });
        }
    }

    fn detach_provider(&mut self, object: &ObjectId, provider: &ProviderId) {
        if let Some(o) = self.objects.get_mut(*object) {
            if o.provider.as_ref().is_some_and(|p| p.id == *provider) {
                o.provider = None;
            }
        }
        self.providers.remove(provider);
    }
}
