use super::{HeadlessToolkit, PlatformEvent};
use crate::native::{LifecycleEvents, PlatformLoop, SharedToolkit};

/// Event loop of the headless toolkit.
///
/// Handlers are called with no toolkit borrow held, so they are free to
/// commit new renders through an adapter sharing the same toolkit.
#[derive(Debug, Clone)]
pub struct MainContext {
    toolkit: SharedToolkit<HeadlessToolkit>,
}

impl MainContext {
    pub fn new(toolkit: SharedToolkit<HeadlessToolkit>) -> Self {
        Self { toolkit }
    }

    pub fn toolkit(&self) -> &SharedToolkit<HeadlessToolkit> {
        &self.toolkit
    }

    fn dispatch(&self, event: PlatformEvent) {
        match event {
            PlatformEvent::Emit {
                object,
                signal,
                args,
            } => {
                let handlers = self.toolkit.borrow().handlers_for(object, &signal);
                tracing::trace!("{:?} emits {} to {} handlers", object, signal, handlers.len());
                for handler in handlers {
                    handler.call(&args);
                }
            }
            PlatformEvent::CloseWindow { window } => {
                self.toolkit.borrow_mut().finish_close(window);
            }
        }
    }
}

impl PlatformLoop for MainContext {
    fn iterate_once(&mut self) -> LifecycleEvents {
        let batch = self.toolkit.borrow_mut().take_events();
        for event in batch {
            self.dispatch(event);
        }
        self.toolkit.borrow_mut().take_lifecycle()
    }

    fn poll_lifecycle(&mut self) -> LifecycleEvents {
        self.toolkit.borrow_mut().take_lifecycle()
    }

    fn has_active_window(&self) -> bool {
        let toolkit = self.toolkit.borrow();
        toolkit.windows().iter().any(|w| toolkit.is_visible(*w))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::TypeResolver;
    use crate::headless::{Application, ClassRegistry};
    use crate::native::{LifecycleEvent, NativeToolkit};
    use crate::value::{Callback, PropMap, PropValue};
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_handler_may_mutate_toolkit() {
        let toolkit = HeadlessToolkit::shared(Rc::new(ClassRegistry::gtk()));
        let (button, label) = {
            let mut tk = toolkit.borrow_mut();
            let class = tk.registry().resolve("gtk-button").unwrap();
            let button = tk.construct(&class, PropMap::new()).unwrap();
            let label = tk.create_label("0").unwrap();
            (button, label)
        };

        let inner = Rc::clone(&toolkit);
        let on_click = Callback::new(move |_| {
            inner.borrow_mut().set_label(&label, "1").unwrap();
        });
        toolkit.borrow_mut().connect(&button, "clicked", on_click).unwrap();
        toolkit.borrow_mut().emit(button, "clicked", Vec::new());

        let mut context = MainContext::new(Rc::clone(&toolkit));
        context.iterate_once();

        let tk = toolkit.borrow();
        assert!(tk.property(label, "label").unwrap().eq_value(&"1".into()));
    }

    #[test]
    fn test_events_raised_by_handlers_wait_for_next_iteration() {
        let toolkit = HeadlessToolkit::shared(Rc::new(ClassRegistry::gtk()));
        let label = toolkit.borrow_mut().create_label("a").unwrap();
        let seen = Rc::new(Cell::new(0));

        let inner = Rc::clone(&toolkit);
        let counter = Rc::clone(&seen);
        let handler = Callback::new(move |args: &[PropValue]| {
            counter.set(counter.get() + 1);
            if args.first().and_then(PropValue::as_str) == Some("b") {
                inner.borrow_mut().set_label(&label, "c").unwrap();
            }
        });
        toolkit
            .borrow_mut()
            .connect(&label, "notify::label", handler)
            .unwrap();
        toolkit.borrow_mut().set_label(&label, "b").unwrap();

        let mut context = MainContext::new(Rc::clone(&toolkit));
        context.iterate_once();
        assert_eq!(seen.get(), 1);
        assert_eq!(toolkit.borrow().pending_events(), 1);

        context.iterate_once();
        assert_eq!(seen.get(), 2);
    }

    #[test]
    fn test_close_window_reports_removal() {
        let toolkit = HeadlessToolkit::shared(Rc::new(ClassRegistry::gtk()));
        let app = Application::new("test");
        let window = {
            let mut tk = toolkit.borrow_mut();
            let class = tk.registry().resolve("adw-application-window").unwrap();
            let window = tk.construct(&class, PropMap::new()).unwrap();
            tk.present(&app, &window).unwrap();
            window
        };
        let mut context = MainContext::new(Rc::clone(&toolkit));

        assert_eq!(context.iterate_once().as_slice(), &[LifecycleEvent::WindowAdded]);
        assert!(context.has_active_window());

        toolkit.borrow_mut().close_window(window);
        assert_eq!(context.iterate_once().as_slice(), &[LifecycleEvent::WindowRemoved]);
        assert!(!context.has_active_window());
        assert!(!toolkit.borrow().is_visible(window));
    }
}
