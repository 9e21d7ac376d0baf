//! Seams to the native toolkit: the widget tree and its event loop.

use crate::class::ClassDescriptor;
use crate::error::NativeError;
use crate::style::Stylesheet;
use crate::value::{Callback, Name, PropMap, PropValue};
use smallvec::SmallVec;
use std::cell::RefCell;
use std::fmt::Debug;
use std::rc::Rc;

/// Shared toolkit handle. Single-threaded; never held across a handler call.
pub type SharedToolkit<T> = Rc<RefCell<T>>;

/// Native widget tree operations the host adapter relies on.
///
/// Objects are handles: cloning one never clones the native object, and
/// equality is object identity. Parent/child links belong to the toolkit.
pub trait NativeToolkit {
    type Object: Clone + PartialEq + Debug;
    type Provider: Clone + PartialEq + Debug;
    /// Application-level container that owns top-level surfaces.
    type Root: Debug;

    fn construct(
        &mut self,
        class: &ClassDescriptor,
        props: PropMap,
    ) -> Result<Self::Object, NativeError>;

    /// Label-equivalent object for text children.
    fn create_label(&mut self, text: &str) -> Result<Self::Object, NativeError>;

    fn set_label(&mut self, label: &Self::Object, text: &str) -> Result<(), NativeError>;

    fn descriptor(&self, object: &Self::Object) -> Rc<ClassDescriptor>;

    fn set_property(
        &mut self,
        object: &Self::Object,
        name: &str,
        value: &PropValue,
    ) -> Result<(), NativeError>;

    /// Restore the class-defined unset value.
    fn reset_property(&mut self, object: &Self::Object, name: &str) -> Result<(), NativeError>;

    fn connect(
        &mut self,
        object: &Self::Object,
        signal: &str,
        handler: Callback,
    ) -> Result<(), NativeError>;

    fn set_role(&mut self, object: &Self::Object, role: Option<Name>);

    fn role(&self, object: &Self::Object) -> Option<Name>;

    /// Container-aware insertion. `role` selects a toolkit-specific slot and
    /// the toolkit may interpose wrapper objects between parent and child.
    fn add_child(
        &mut self,
        parent: &Self::Object,
        child: &Self::Object,
        role: Option<&str>,
    ) -> Result<(), NativeError>;

    fn parent(&self, object: &Self::Object) -> Option<Self::Object>;

    /// Move `child` right before `sibling`; both are direct children of `parent`.
    fn insert_before(
        &mut self,
        parent: &Self::Object,
        child: &Self::Object,
        sibling: &Self::Object,
    ) -> Result<(), NativeError>;

    fn set_visible(&mut self, object: &Self::Object, visible: bool);

    /// Make `window` the active top-level surface of `root` and show it.
    fn present(&mut self, root: &Self::Root, window: &Self::Object) -> Result<(), NativeError>;

    fn insert_top_level_before(
        &mut self,
        root: &Self::Root,
        window: &Self::Object,
        sibling: &Self::Object,
    ) -> Result<(), NativeError>;

    fn style_provider(&self, object: &Self::Object) -> Option<Self::Provider>;

    fn load_provider(&mut self, sheet: &Stylesheet) -> Result<Self::Provider, NativeError>;

    fn attach_provider(&mut self, object: &Self::Object, provider: Self::Provider, priority: u32);

    /// Detach and discard.
    fn detach_provider(&mut self, object: &Self::Object, provider: &Self::Provider);
}

/// Application-level notifications surfaced by one loop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    WindowAdded,
    WindowRemoved,
}

pub type LifecycleEvents = SmallVec<[LifecycleEvent; 2]>;

/// The native platform's event loop.
pub trait PlatformLoop {
    /// Dispatch one batch of pending input/redraw/timer events without
    /// blocking. Handlers run during this call and may enqueue new commits.
    fn iterate_once(&mut self) -> LifecycleEvents;

    /// Application-level notifications raised since the last call, without
    /// dispatching any input. Polled while the loop is stopped.
    fn poll_lifecycle(&mut self) -> LifecycleEvents {
        LifecycleEvents::new()
    }

    fn has_active_window(&self) -> bool;
}
