use crate::class::ClassDescriptor;
use crate::value::{Callback, Name, PropMap};
use smallvec::SmallVec;
use std::fmt;
use std::rc::Rc;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u32);

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProviderId(pub u32);

impl fmt::Debug for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "provider#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct AttachedProvider {
    pub id: ProviderId,
    pub priority: u32,
}

/// One live object in the headless widget tree.
#[derive(Debug, Clone)]
pub struct NativeObject {
    pub class: Rc<ClassDescriptor>,
    pub props: PropMap,
    pub parent: Option<ObjectId>,
    pub children: Vec<ObjectId>,
    /// Slot within a role-slotted parent.
    pub slot: Option<Name>,
    pub role: Option<Name>,
    pub visible: bool,
    pub provider: Option<AttachedProvider>,
    pub handlers: SmallVec<[(Name, Callback); 2]>,
    /// Interposed by a container rather than created by the adapter.
    pub wrapper: bool,
}

impl NativeObject {
    pub fn new(class: Rc<ClassDescriptor>, props: PropMap) -> Self {
        Self {
            class,
            props,
            parent: None,
            children: Vec::new(),
            slot: None,
            role: None,
            visible: true,
            provider: None,
            handlers: SmallVec::new(),
            wrapper: false,
        }
    }
}

/// Objects are never freed: the adapter hides instead of destroying, so ids
/// stay valid for the toolkit's lifetime.
#[derive(Debug, Default)]
pub struct ObjectArena {
    objects: Vec<NativeObject>,
}

impl ObjectArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, object: NativeObject) -> ObjectId {
        let id = ObjectId(self.objects.len() as u32);
        self.objects.push(object);
        id
    }

    pub fn get(&self, id: ObjectId) -> Option<&NativeObject> {
        self.objects.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut NativeObject> {
        self.objects.get_mut(id.0 as usize)
    }

    pub fn parent(&self, id: ObjectId) -> Option<ObjectId> {
        self.get(id)?.parent
    }

    pub fn children(&self, id: ObjectId) -> &[ObjectId] {
        self.get(id).map(|o| o.children.as_slice()).unwrap_or(&[])
    }

    /// Unlink `child` from its current parent, if any.
    pub fn detach(&mut self, child: ObjectId) {
        let Some(parent) = self.parent(child) else {
            return;
        };
        if let Some(parent) = self.get_mut(parent) {
            parent.children.retain(|c| *c != child);
        }
        if let Some(child) = self.get_mut(child) {
            child.parent = None;
            child.slot = None;
        }
    }

    /// Link `child` under `parent` at `index` (clamped to the end).
    pub fn attach(&mut self, parent: ObjectId, child: ObjectId, index: usize, slot: Option<Name>) {
        self.detach(child);
        if let Some(p) = self.get_mut(parent) {
            let index = index.min(p.children.len());
            p.children.insert(index, child);
        }
        if let Some(c) = self.get_mut(child) {
            c.parent = Some(parent);
            c.slot = slot;
        }
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &NativeObject)> {
        self.objects
            .iter()
            .enumerate()
            .map(|(i, o)| (ObjectId(i as u32), o))
    }
}
