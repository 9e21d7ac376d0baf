use super::ancestry::sibling_pair;
use super::{HostConfig, UpdatePayload};
use crate::class::TypeResolver;
use crate::config::AdapterConfig;
use crate::error::{NativeError, ReconcileError, Result};
use crate::native::{NativeToolkit, SharedToolkit};
use crate::style::{CssStyleCompiler, StyleCompiler, compile_style_prop};
use crate::value::{Callback, Name, PropMap, PropValue};
use smallvec::SmallVec;
use std::time::Duration;

const CHILDREN: &str = "children";
const STYLE: &str = "style";
const ROLE: &str = "role";

/// Host adapter that applies a diffing algorithm's commits to native objects.
///
/// Holds no shadow tree: every structural question is asked of the toolkit.
///
/// Event handler props are bound once, when the instance is created. Passing
/// a different handler on a later render has no effect; callers that need to
/// swap behavior must do so inside a stable callback.
pub struct Adapter<T, R, S = CssStyleCompiler>
where
    T: NativeToolkit,
    R: TypeResolver,
    S: StyleCompiler,
{
    toolkit: SharedToolkit<T>,
    resolver: R,
    styles: S,
    style_priority: u32,
}

impl<T, R> Adapter<T, R>
where
    T: NativeToolkit,
    R: TypeResolver,
{
    pub fn new(toolkit: SharedToolkit<T>, resolver: R, config: &AdapterConfig) -> Self {
        Self::with_style_compiler(
            toolkit,
            resolver,
            CssStyleCompiler::with_length_unit(config.length_unit.clone()),
            config,
        )
    }
}

impl<T, R, S> Adapter<T, R, S>
where
    T: NativeToolkit,
    R: TypeResolver,
    S: StyleCompiler,
{
    pub fn with_style_compiler(
        toolkit: SharedToolkit<T>,
        resolver: R,
        styles: S,
        config: &AdapterConfig,
    ) -> Self {
        Self {
            toolkit,
            resolver,
            styles,
            style_priority: config.style_priority,
        }
    }

    pub fn toolkit(&self) -> &SharedToolkit<T> {
        &self.toolkit
    }

    /// Compile `style` and make it the only provider attached to `object`.
    ///
    /// Compilation happens first; on failure the previous provider stays.
    fn update_style(&self, object: &T::Object, style: &PropValue) -> Result<()> {
        let sheet = compile_style_prop(&self.styles, style)?;

        let mut toolkit = self.toolkit.borrow_mut();
        let provider = toolkit.load_provider(&sheet)?;
        if let Some(previous) = toolkit.style_provider(object) {
            toolkit.detach_provider(object, &previous);
        }
        tracing::trace!(?object, declarations = sheet.declarations().count(), "replace style provider");
        toolkit.attach_provider(object, provider, self.style_priority);
        Ok(())
    }

    fn add_child(&self, parent: &T::Object, child: &T::Object) -> Result<()> {
        let mut toolkit = self.toolkit.borrow_mut();
        let role = toolkit.role(child);
        toolkit.add_child(parent, child, role.as_deref())?;
        Ok(())
    }

    /// Position `child` before `before` by acting on the ancestors that share
    /// a native parent. `None` as the parent means both are top-level.
    fn reorder(
        &self,
        root: Option<&T::Root>,
        child: &T::Object,
        before: &T::Object,
    ) -> Result<()> {
        let mut toolkit = self.toolkit.borrow_mut();
        let pair = sibling_pair(child, before, |object| toolkit.parent(object)).map_err(|err| {
            ReconcileError::OrderingInvariantViolation {
                child: format!("{:?}", err.child),
                before: format!("{:?}", err.before),
            }
        })?;

        tracing::trace!(?pair, "resolved sibling pair");
        match (pair.parent, root) {
            (Some(parent), _) => toolkit.insert_before(&parent, &pair.child, &pair.before)?,
            (None, Some(root)) => {
                toolkit.insert_top_level_before(root, &pair.child, &pair.before)?
            }
            (None, None) => {
                return Err(ReconcileError::OrderingInvariantViolation {
                    child: format!("{:?}", child),
                    before: format!("{:?}", before),
                });
            }
        }
        Ok(())
    }

    fn set_role(&self, object: &T::Object, role: &PropValue) -> Result<()> {
        let role = parse_role(role)?;
        self.toolkit.borrow_mut().set_role(object, role);
        Ok(())
    }
}

fn parse_role(role: &PropValue) -> Result<Option<Name>> {
    match role {
        PropValue::Null => Ok(None),
        PropValue::String(role) => Ok(Some(role.clone())),
        other => Err(NativeError::InvalidValue {
            property: ROLE.into(),
            message: format!("expected a string, got {}", other.kind()),
        }
        .into()),
    }
}

impl<T, R, S> HostConfig for Adapter<T, R, S>
where
    T: NativeToolkit,
    R: TypeResolver,
    S: StyleCompiler,
{
    type Instance = T::Object;
    type Container = T::Root;
    type HostContext = ();
    type PublicInstance = T::Object;
    type TimeoutHandle = ();

    const SUPPORTS_MUTATION: bool = true;
    const IS_PRIMARY_RENDERER: bool = true;

    fn create_instance(
        &mut self,
        ty: &str,
        props: &PropMap,
        _root: &Self::Container,
        _context: &Self::HostContext,
    ) -> Result<Self::Instance> {
        let class = self.resolver.resolve(ty)?;

        let mut style = None;
        let mut role = None;
        let mut properties = PropMap::with_capacity(props.len());
        let mut signals: SmallVec<[(Name, Callback); 2]> = SmallVec::new();

        for (name, value) in props {
            match name.as_str() {
                CHILDREN => {}
                STYLE => style = Some(value),
                ROLE => role = parse_role(value)?,
                _ => match class.signal_for_prop(name) {
                    Some(signal) => match value {
                        PropValue::Callback(handler) => signals.push((signal, handler.clone())),
                        PropValue::Null => {}
                        other => {
                            return Err(NativeError::InvalidValue {
                                property: name.clone(),
                                message: format!("signal handler must be a callback, got {}", other.kind()),
                            }
                            .into());
                        }
                    },
                    None => {
                        properties.insert(name.clone(), value.clone());
                    }
                },
            }
        }

        // Validate everything before constructing so a bad prop leaves no
        // orphan object.
        let sheet = match style {
            Some(style) if !style.is_null() => Some(compile_style_prop(&self.styles, style)?),
            _ => None,
        };

        tracing::debug!(
            "create {} as {} ({} props, {} signals)",
            ty,
            class.name(),
            properties.len(),
            signals.len()
        );

        let mut toolkit = self.toolkit.borrow_mut();
        let object = toolkit.construct(&class, properties)?;
        if role.is_some() {
            toolkit.set_role(&object, role);
        }
        if let Some(sheet) = sheet {
            let provider = toolkit.load_provider(&sheet)?;
            toolkit.attach_provider(&object, provider, self.style_priority);
        }
        for (signal, handler) in signals {
            toolkit.connect(&object, &signal, handler)?;
        }
        drop(toolkit);

        Ok(object)
    }

    fn create_text_instance(
        &mut self,
        text: &str,
        _root: &Self::Container,
        _context: &Self::HostContext,
    ) -> Result<Self::Instance> {
        Ok(self.toolkit.borrow_mut().create_label(text)?)
    }

    fn append_initial_child(
        &mut self,
        parent: &Self::Instance,
        child: &Self::Instance,
    ) -> Result<()> {
        self.add_child(parent, child)
    }

    /// Required by contract, unused by this host: nothing runs at mount time.
    fn finalize_initial_children(
        &mut self,
        _instance: &Self::Instance,
        _ty: &str,
        _props: &PropMap,
        _root: &Self::Container,
        _context: &Self::HostContext,
    ) -> bool {
        false
    }

    /// Text is always a separate label child.
    fn should_set_text_content(&self, _ty: &str, _props: &PropMap) -> bool {
        false
    }

    fn get_root_host_context(&self, _root: &Self::Container) -> Self::HostContext {}

    fn get_child_host_context(
        &self,
        _parent: &Self::HostContext,
        _ty: &str,
        _root: &Self::Container,
    ) -> Self::HostContext {
    }

    fn get_public_instance(&self, instance: &Self::Instance) -> Self::PublicInstance {
        instance.clone()
    }

    fn prepare_for_commit(&mut self, _root: &Self::Container) {}

    fn reset_after_commit(&mut self, _root: &Self::Container) {}

    fn prepare_portal_mount(&mut self, _root: &Self::Container) {}

    fn append_child(&mut self, parent: &Self::Instance, child: &Self::Instance) -> Result<()> {
        self.add_child(parent, child)
    }

    fn append_child_to_container(
        &mut self,
        root: &Self::Container,
        child: &Self::Instance,
    ) -> Result<()> {
        tracing::debug!("present {:?} on {:?}", child, root);
        self.toolkit.borrow_mut().present(root, child)?;
        Ok(())
    }

    fn insert_before(
        &mut self,
        parent: &Self::Instance,
        child: &Self::Instance,
        before: &Self::Instance,
    ) -> Result<()> {
        self.add_child(parent, child)?;
        self.reorder(None, child, before)
    }

    fn insert_in_container_before(
        &mut self,
        root: &Self::Container,
        child: &Self::Instance,
        before: &Self::Instance,
    ) -> Result<()> {
        self.toolkit.borrow_mut().present(root, child)?;
        self.reorder(Some(root), child, before)
    }

    /// Removal hides: the object stays resident in the native tree.
    fn remove_child(&mut self, _parent: &Self::Instance, child: &Self::Instance) -> Result<()> {
        self.toolkit.borrow_mut().set_visible(child, false);
        Ok(())
    }

    fn remove_child_from_container(
        &mut self,
        _root: &Self::Container,
        child: &Self::Instance,
    ) -> Result<()> {
        self.toolkit.borrow_mut().set_visible(child, false);
        Ok(())
    }

    fn prepare_update(
        &mut self,
        instance: &Self::Instance,
        _ty: &str,
        old_props: &PropMap,
        new_props: &PropMap,
    ) -> Option<UpdatePayload> {
        let class = self.toolkit.borrow().descriptor(instance);
        let diffable = |name: &str| name != CHILDREN && !class.is_signal_prop(name);

        let mut payload = UpdatePayload::default();
        for (name, value) in new_props {
            if !diffable(name) {
                continue;
            }
            if old_props.get(name).is_some_and(|old| old.eq_value(value)) {
                continue;
            }
            payload.updated_props.insert(name.clone(), value.clone());
        }
        for name in old_props.keys() {
            if diffable(name) && !new_props.contains_key(name) {
                payload.removed_props.insert(name.clone());
            }
        }

        if payload.is_empty() {
            None
        } else {
            Some(payload)
        }
    }

    fn commit_update(
        &mut self,
        instance: &Self::Instance,
        payload: UpdatePayload,
        _ty: &str,
        _prev_props: &PropMap,
        _next_props: &PropMap,
    ) -> Result<()> {
        tracing::trace!(
            ?instance,
            updated = payload.updated_props.len(),
            removed = payload.removed_props.len(),
            "commit update"
        );

        for (name, value) in &payload.updated_props {
            match name.as_str() {
                STYLE => self.update_style(instance, value)?,
                ROLE => self.set_role(instance, value)?,
                _ => self
                    .toolkit
                    .borrow_mut()
                    .set_property(instance, name, value)?,
            }
        }
        for name in &payload.removed_props {
            match name.as_str() {
                STYLE => self.update_style(instance, &PropValue::Null)?,
                ROLE => self.toolkit.borrow_mut().set_role(instance, None),
                _ => self.toolkit.borrow_mut().reset_property(instance, name)?,
            }
        }
        Ok(())
    }

    fn commit_text_update(
        &mut self,
        text: &Self::Instance,
        _old_text: &str,
        new_text: &str,
    ) -> Result<()> {
        self.toolkit.borrow_mut().set_label(text, new_text)?;
        Ok(())
    }

    fn commit_mount(&mut self, _instance: &Self::Instance, _ty: &str, _props: &PropMap) {}

    fn reset_text_content(&mut self, _instance: &Self::Instance) {}

    fn hide_instance(&mut self, instance: &Self::Instance) {
        self.toolkit.borrow_mut().set_visible(instance, false);
    }

    fn hide_text_instance(&mut self, text: &Self::Instance) {
        self.toolkit.borrow_mut().set_visible(text, false);
    }

    fn unhide_instance(&mut self, instance: &Self::Instance, _props: &PropMap) {
        self.toolkit.borrow_mut().set_visible(instance, true);
    }

    fn unhide_text_instance(&mut self, text: &Self::Instance, _content: &str) {
        self.toolkit.borrow_mut().set_visible(text, true);
    }

    /// Native destruction is the toolkit's business.
    fn detach_deleted_instance(&mut self, _instance: &Self::Instance) {}

    fn clear_container(&mut self, _root: &Self::Container) {}

    /// Required by contract, unused by this host. Every mutation already runs
    /// synchronously inside one native loop iteration.
    fn schedule_timeout(
        &mut self,
        _callback: Box<dyn FnOnce()>,
        _delay: Duration,
    ) -> Self::TimeoutHandle {
    }

    /// Required by contract, unused by this host.
    fn cancel_timeout(&mut self, _handle: Self::TimeoutHandle) {}
}
