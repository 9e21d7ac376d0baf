use crate::names::{derive_signal_name, signal_base};
use crate::value::Name;
use std::collections::HashSet;
use std::rc::Rc;
use thiserror::Error;

pub const DEFAULT_EVENT_PREFIX: &str = "on";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown element type `{tag}` (no native class `{class}`)")]
pub struct UnknownType {
    pub tag: Name,
    pub class: Name,
}

/// What the native toolkit knows about one class: which props it accepts and
/// which signals it emits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDescriptor {
    name: Name,
    properties: HashSet<Name>,
    signals: HashSet<Name>,
    event_prefix: Name,
}

impl ClassDescriptor {
    pub fn new(name: impl Into<Name>) -> Self {
        Self {
            name: name.into(),
            properties: HashSet::new(),
            signals: HashSet::new(),
            event_prefix: DEFAULT_EVENT_PREFIX.into(),
        }
    }

    pub fn with_properties<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Name>,
    {
        self.properties.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_signals<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Name>,
    {
        self.signals.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_event_prefix(mut self, prefix: impl Into<Name>) -> Self {
        self.event_prefix = prefix.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.properties.contains(name)
    }

    pub fn has_signal(&self, name: &str) -> bool {
        self.signals.contains(signal_base(name))
    }

    /// The signal `prop` subscribes to on this class, if any.
    ///
    /// Both conditions must hold: the prop follows this class's event prefix
    /// convention, and the derived signal exists in this class's signal set.
    /// A prop that is a signal on one class can be a plain property on another.
    pub fn signal_for_prop(&self, prop: &str) -> Option<Name> {
        let signal = derive_signal_name(prop, &self.event_prefix)?;
        self.has_signal(&signal).then_some(signal)
    }

    pub fn is_signal_prop(&self, prop: &str) -> bool {
        self.signal_for_prop(prop).is_some()
    }
}

/// Registry lookup from element tag to native class.
pub trait TypeResolver {
    fn resolve(&self, tag: &str) -> Result<Rc<ClassDescriptor>, UnknownType>;
}

impl<R: TypeResolver + ?Sized> TypeResolver for Rc<R> {
    fn resolve(&self, tag: &str) -> Result<Rc<ClassDescriptor>, UnknownType> {
        (**self).resolve(tag)
    }
}
