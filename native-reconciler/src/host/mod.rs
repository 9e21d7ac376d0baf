//! The host contract a tree-diffing algorithm drives, and its native
//! implementation.

pub mod adapter;
pub mod ancestry;

pub use adapter::Adapter;
pub use ancestry::{NestedObjects, SiblingPair, sibling_pair};

use crate::error::Result;
use crate::value::{Name, PropMap};
use indexmap::IndexSet;
use std::time::Duration;

/// Computed by `prepare_update`, consumed by `commit_update` within one commit.
#[derive(Debug, Clone, Default)]
pub struct UpdatePayload {
    pub updated_props: PropMap,
    pub removed_props: IndexSet<Name>,
}

impl UpdatePayload {
    pub fn is_empty(&self) -> bool {
        self.updated_props.is_empty() && self.removed_props.is_empty()
    }
}

/// Operations a diffing/scheduling algorithm invokes, in commit order, on the
/// host it renders into.
///
/// Text children are host instances too: `create_text_instance` returns the
/// same instance type, so the child operations accept either.
pub trait HostConfig {
    type Instance: Clone;
    type Container;
    type HostContext: Clone;
    type PublicInstance;
    type TimeoutHandle;

    const SUPPORTS_MUTATION: bool;
    const IS_PRIMARY_RENDERER: bool;

    fn create_instance(
        &mut self,
        ty: &str,
        props: &PropMap,
        root: &Self::Container,
        context: &Self::HostContext,
    ) -> Result<Self::Instance>;

    fn create_text_instance(
        &mut self,
        text: &str,
        root: &Self::Container,
        context: &Self::HostContext,
    ) -> Result<Self::Instance>;

    fn append_initial_child(
        &mut self,
        parent: &Self::Instance,
        child: &Self::Instance,
    ) -> Result<()>;

    fn finalize_initial_children(
        &mut self,
        instance: &Self::Instance,
        ty: &str,
        props: &PropMap,
        root: &Self::Container,
        context: &Self::HostContext,
    ) -> bool;

    fn should_set_text_content(&self, ty: &str, props: &PropMap) -> bool;

    fn get_root_host_context(&self, root: &Self::Container) -> Self::HostContext;

    fn get_child_host_context(
        &self,
        parent: &Self::HostContext,
        ty: &str,
        root: &Self::Container,
    ) -> Self::HostContext;

    fn get_public_instance(&self, instance: &Self::Instance) -> Self::PublicInstance;

    fn prepare_for_commit(&mut self, root: &Self::Container);

    fn reset_after_commit(&mut self, root: &Self::Container);

    fn prepare_portal_mount(&mut self, root: &Self::Container);

    fn append_child(&mut self, parent: &Self::Instance, child: &Self::Instance) -> Result<()>;

    fn append_child_to_container(
        &mut self,
        root: &Self::Container,
        child: &Self::Instance,
    ) -> Result<()>;

    fn insert_before(
        &mut self,
        parent: &Self::Instance,
        child: &Self::Instance,
        before: &Self::Instance,
    ) -> Result<()>;

    fn insert_in_container_before(
        &mut self,
        root: &Self::Container,
        child: &Self::Instance,
        before: &Self::Instance,
    ) -> Result<()>;

    fn remove_child(&mut self, parent: &Self::Instance, child: &Self::Instance) -> Result<()>;

    fn remove_child_from_container(
        &mut self,
        root: &Self::Container,
        child: &Self::Instance,
    ) -> Result<()>;

    /// `None` means nothing to commit for this instance.
    fn prepare_update(
        &mut self,
        instance: &Self::Instance,
        ty: &str,
        old_props: &PropMap,
        new_props: &PropMap,
    ) -> Option<UpdatePayload>;

    fn commit_update(
        &mut self,
        instance: &Self::Instance,
        payload: UpdatePayload,
        ty: &str,
        prev_props: &PropMap,
        next_props: &PropMap,
    ) -> Result<()>;

    fn commit_text_update(
        &mut self,
        text: &Self::Instance,
        old_text: &str,
        new_text: &str,
    ) -> Result<()>;

    fn commit_mount(&mut self, instance: &Self::Instance, ty: &str, props: &PropMap);

    fn reset_text_content(&mut self, instance: &Self::Instance);

    fn hide_instance(&mut self, instance: &Self::Instance);

    fn hide_text_instance(&mut self, text: &Self::Instance);

    fn unhide_instance(&mut self, instance: &Self::Instance, props: &PropMap);

    fn unhide_text_instance(&mut self, text: &Self::Instance, content: &str);

    fn detach_deleted_instance(&mut self, instance: &Self::Instance);

    fn clear_container(&mut self, root: &Self::Container);

    fn schedule_timeout(
        &mut self,
        callback: Box<dyn FnOnce()>,
        delay: Duration,
    ) -> Self::TimeoutHandle;

    fn cancel_timeout(&mut self, handle: Self::TimeoutHandle);
}
