//! Keeps a declarative element tree in sync with a live native widget tree.
//!
//! [`host::Adapter`] implements the host contract a tree-diffing algorithm
//! drives; [`event_loop::ExecutionLoop`] interleaves that work with the native
//! toolkit's event processing on one thread. [`headless`] is an in-memory
//! toolkit for running both without a display.

pub mod class;
pub mod config;
pub mod error;
pub mod event_loop;
pub mod headless;
pub mod host;
pub mod logging;
pub mod names;
pub mod native;
pub mod scheduler;
pub mod style;
pub mod value;
pub mod vnode;

pub use class::{ClassDescriptor, TypeResolver, UnknownType};
pub use config::{AdapterConfig, Config, LoopConfig};
pub use error::{NativeError, ReconcileError, Result};
pub use event_loop::{ExecutionLoop, LoopHandle, LoopState, Reconciler};
pub use host::{Adapter, HostConfig, UpdatePayload};
pub use native::{LifecycleEvent, NativeToolkit, PlatformLoop, SharedToolkit};
pub use style::{CssStyleCompiler, StyleCompiler, StyleError, Stylesheet};
pub use value::{Callback, Name, PropMap, PropValue, props};
pub use vnode::{VirtualChild, VirtualNode};
