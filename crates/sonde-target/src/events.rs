use std::cell::RefCell;
use std::rc::Rc;

/// Lifecycle event emitted by the debugger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    /// The target resumed its execution.
    Resumed,

    /// A new target binary was loaded (new session or process attachment).
    NewTarget,
}

/// Trait for reacting to debugger lifecycle events.
pub trait LifecycleListener {
    /// Handles the given event.
    fn on_event(&mut self, event: LifecycleEvent);
}

impl<L: LifecycleListener + ?Sized> LifecycleListener for &mut L {
    fn on_event(&mut self, event: LifecycleEvent) {
        (**self).on_event(event);
    }
}

impl<L: LifecycleListener + ?Sized> LifecycleListener for Box<L> {
    fn on_event(&mut self, event: LifecycleEvent) {
        (**self).on_event(event);
    }
}

impl<L: LifecycleListener + ?Sized> LifecycleListener for Rc<RefCell<L>> {
    fn on_event(&mut self, event: LifecycleEvent) {
        self.borrow_mut().on_event(event);
    }
}

/// Single-threaded publish/subscribe bus of lifecycle events.
///
/// Listeners are notified in subscription order.
#[derive(Default)]
pub struct EventBus<'a> {
    listeners: Vec<Box<dyn LifecycleListener + 'a>>,
}

impl<'a> EventBus<'a> {
    /// Creates a bus without any listener.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new listener.
    pub fn subscribe(&mut self, listener: impl LifecycleListener + 'a) {
        self.listeners.push(Box::new(listener));
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Whether no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Notifies every listener of the given event.
    pub fn publish(&mut self, event: LifecycleEvent) {
        tracing::trace!(?event, listeners = self.listeners.len(), "publish");

        for listener in self.listeners.iter_mut() {
            listener.on_event(event);
        }
    }
}
