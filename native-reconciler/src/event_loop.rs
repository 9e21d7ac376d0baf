//! Cooperative execution loop: native event processing and deferred work
//! interleaved on one thread.
//!
//! Each tick runs exactly one native iteration and then re-enqueues itself as
//! an ordinary deferred task, so work deferred in the meantime runs before the
//! next tick. Nothing here blocks for longer than one step.

use crate::config::LoopConfig;
use crate::error::Result;
use crate::native::{LifecycleEvent, PlatformLoop};
use crate::scheduler::{Deferred, Scheduler, TaskId};
use crate::vnode::VirtualNode;
use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Loop state shared with whoever needs to observe it.
#[derive(Debug, Default)]
pub struct LoopState {
    running: Cell<bool>,
    ticks: Cell<u64>,
}

impl LoopState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// Native iterations performed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks.get()
    }

    fn set_running(&self, running: bool) {
        self.running.set(running);
    }

    fn count_tick(&self) {
        self.ticks.set(self.ticks.get() + 1);
    }
}

pub type LoopHandle = Rc<LoopState>;

/// The diffing algorithm as seen by the loop: it owns containers and commits
/// virtual trees into them through a host adapter.
pub trait Reconciler {
    type Root;
    type Container;

    fn create_container(&mut self, root: &Self::Root) -> Self::Container;

    fn update_container(
        &mut self,
        tree: &VirtualNode,
        container: &mut Self::Container,
    ) -> Result<()>;
}

pub struct ExecutionLoop<P: PlatformLoop> {
    platform: P,
    state: LoopHandle,
    scheduler: Scheduler,
    config: LoopConfig,
    /// Only one tick may be queued at a time.
    pending_tick: Option<TaskId>,
    now: Instant,
}

impl<P: PlatformLoop> ExecutionLoop<P> {
    pub fn new(platform: P, config: LoopConfig) -> Self {
        Self::with_handle(platform, LoopHandle::default(), config)
    }

    pub fn with_handle(platform: P, state: LoopHandle, config: LoopConfig) -> Self {
        Self {
            platform,
            state,
            scheduler: Scheduler::new(),
            config,
            pending_tick: None,
            now: Instant::now(),
        }
    }

    pub fn handle(&self) -> LoopHandle {
        Rc::clone(&self.state)
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    /// Create the container, perform the initial commit and start ticking.
    ///
    /// Calling this again after the loop stopped restarts it.
    pub fn startup<R: Reconciler>(
        &mut self,
        reconciler: &mut R,
        root: &R::Root,
        tree: &VirtualNode,
    ) -> Result<R::Container> {
        let mut container = reconciler.create_container(root);
        reconciler.update_container(tree, &mut container)?;
        tracing::debug!("initial commit done for <{}>", tree.kind);
        self.resume();
        Ok(container)
    }

    /// Set running and make sure a tick is queued.
    pub fn resume(&mut self) {
        if !self.state.is_running() {
            tracing::debug!("execution loop running");
        }
        self.state.set_running(true);
        if self.pending_tick.is_none() {
            self.schedule_tick();
        }
    }

    /// The loop clock: the instant passed to the latest `run_once`, or
    /// construction time before the first one.
    pub fn now(&self) -> Instant {
        self.now
    }

    /// Schedule `f` to run `delay` after the loop clock (see [`Self::now`]).
    /// Zero-delay work queued before the next tick runs before it.
    pub fn defer(&mut self, delay: Duration, f: impl FnOnce() + 'static) -> TaskId {
        self.defer_at(self.now + delay, f)
    }

    /// Schedule `f` for an absolute `wake_time`.
    pub fn defer_at(&mut self, wake_time: Instant, f: impl FnOnce() + 'static) -> TaskId {
        self.scheduler.schedule(Deferred::Call(Box::new(f)), wake_time)
    }

    pub fn cancel(&mut self, id: TaskId) -> bool {
        self.scheduler.cancel(id)
    }

    /// React to an application-level notification.
    pub fn handle_lifecycle(&mut self, event: LifecycleEvent) {
        match event {
            LifecycleEvent::WindowRemoved => {
                if self.state.is_running() && !self.platform.has_active_window() {
                    tracing::debug!("last window closed, execution loop stopped");
                    self.state.set_running(false);
                    if let Some(id) = self.pending_tick.take() {
                        self.scheduler.cancel(id);
                    }
                }
            }
            LifecycleEvent::WindowAdded => {
                if !self.state.is_running() {
                    self.resume();
                }
            }
        }
    }

    /// Run everything due at `now`. Returns the number of tasks run.
    pub fn run_once(&mut self, now: Instant) -> usize {
        self.now = now;

        if !self.state.is_running() {
            for event in self.platform.poll_lifecycle() {
                self.handle_lifecycle(event);
            }
        }

        let mut ran = 0;
        for id in self.scheduler.tick(now) {
            let Some(task) = self.scheduler.take_pending(id) else {
                continue;
            };
            match task {
                Deferred::Tick => {
                    if self.pending_tick == Some(id) {
                        self.pending_tick = None;
                    }
                    self.tick();
                }
                Deferred::Call(f) => f(),
            }
            ran += 1;
        }
        ran
    }

    /// Drive the loop on the wall clock until it stops and no deferred work
    /// remains.
    pub fn run(&mut self) {
        self.run_once(Instant::now());
        while self.state.is_running() || self.scheduler.has_pending() {
            let now = Instant::now();
            let sleep = self
                .scheduler
                .next_wake_time()
                .map(|wake| wake.saturating_duration_since(now))
                .unwrap_or(self.config.max_idle_sleep)
                .min(self.config.max_idle_sleep);
            if !sleep.is_zero() {
                std::thread::sleep(sleep);
            }
            self.run_once(Instant::now());
        }
    }

    fn tick(&mut self) {
        if !self.state.is_running() {
            return;
        }

        let events = self.platform.iterate_once();
        self.state.count_tick();
        for event in events {
            self.handle_lifecycle(event);
        }

        if self.state.is_running() && self.pending_tick.is_none() {
            self.schedule_tick();
        }
    }

    fn schedule_tick(&mut self) {
        let id = self
            .scheduler
            .schedule(Deferred::Tick, self.now + self.config.tick_delay);
        tracing::trace!(task = id, "tick queued");
        self.pending_tick = Some(id);
    }
}
