use gloo_timers::callback::Timeout;
use std::cell::RefCell;
use std::rc::Rc;

use crate::domain::timeline::Debouncer;

struct Inner<T> {
    debouncer: RefCell<Debouncer<T>>,
    timeout: RefCell<Option<Timeout>>,
    handler: Box<dyn Fn(T)>,
}

/// Browser debounce: every `schedule` replaces the pending value and
/// restarts the timer; the handler sees only the last value.
pub struct DebouncedCallback<T: 'static> {
    inner: Rc<Inner<T>>,
}

impl<T: 'static> Clone for DebouncedCallback<T> {
    fn clone(&self) -> Self {
        Self { inner: Rc::clone(&self.inner) }
    }
}

impl<T: 'static> DebouncedCallback<T> {
    pub fn new(delay_ms: u64, handler: impl Fn(T) + 'static) -> Self {
        Self {
            inner: Rc::new(Inner {
                debouncer: RefCell::new(Debouncer::new(delay_ms)),
                timeout: RefCell::new(None),
                handler: Box::new(handler),
            }),
        }
    }

    pub fn schedule(&self, value: T) {
        let delay = {
            let mut debouncer = self.inner.debouncer.borrow_mut();
            debouncer.push(now_ms(), value);
            debouncer.delay_ms()
        };
        arm(&self.inner, delay);
    }

    pub fn cancel(&self) {
        self.inner.debouncer.borrow_mut().cancel();
        if let Some(timeout) = self.inner.timeout.borrow_mut().take() {
            timeout.cancel();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.inner.debouncer.borrow().is_pending()
    }
}

fn arm<T: 'static>(inner: &Rc<Inner<T>>, delay_ms: u64) {
    let weak = Rc::downgrade(inner);
    let timeout = Timeout::new(delay_ms.min(u32::MAX as u64) as u32, move || {
        let Some(inner) = weak.upgrade() else {
            return;
        };
        let now = now_ms();
        let ready = inner.debouncer.borrow_mut().poll(now);
        match ready {
            Some(value) => (inner.handler)(value),
            None => {
                // timer fired a little early relative to Date::now; the running
                // timeout must not be cancelled from inside its own callback
                if let Some(current) = inner.timeout.borrow_mut().take() {
                    let _ = current.forget();
                }
                let remaining = inner.debouncer.borrow().deadline().map(|deadline| deadline.saturating_sub(now));
                if let Some(remaining) = remaining {
                    arm(&inner, remaining.max(1));
                }
            }
        }
    });
    if let Some(previous) = inner.timeout.borrow_mut().replace(timeout) {
        previous.cancel();
    }
}

fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}
