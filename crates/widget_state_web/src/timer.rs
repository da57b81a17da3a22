//! `window.setTimeout` timer host.

use std::{rc::Rc, time::Duration};

use widget_state::TimerHost;

use crate::bridge;

/// Handle for a task scheduled by [`BrowserTimerHost`]. Dropping it clears the timeout.
pub struct BrowserTimeout {
    _guard: Option<bridge::TimeoutGuard>,
}

#[derive(Clone, Default)]
/// Timer host backed by `window.setTimeout`.
///
/// Outside `wasm32` there is no event loop to run tasks, so scheduling reports an error and
/// the task is dropped.
pub struct BrowserTimerHost {
    reporter: Option<Rc<dyn Fn(&str)>>,
}

impl BrowserTimerHost {
    /// Creates a timer host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the callback that receives scheduling failures.
    pub fn with_error_reporter(mut self, reporter: impl Fn(&str) + 'static) -> Self {
        self.reporter = Some(Rc::new(reporter));
        self
    }
}

impl TimerHost for BrowserTimerHost {
    type Handle = BrowserTimeout;

    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Self::Handle {
        match bridge::set_timeout(delay, task) {
            Ok(guard) => BrowserTimeout {
                _guard: Some(guard),
            },
            Err(err) => {
                if let Some(reporter) = &self.reporter {
                    reporter(&err);
                }
                BrowserTimeout { _guard: None }
            }
        }
    }

    fn cancel(&self, handle: Self::Handle) {
        drop(handle);
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[test]
    fn host_build_reports_instead_of_scheduling() {
        let errors = Rc::new(RefCell::new(Vec::<String>::new()));
        let host = {
            let errors = Rc::clone(&errors);
            BrowserTimerHost::new()
                .with_error_reporter(move |err| errors.borrow_mut().push(err.to_string()))
        };

        let handle = host.schedule(Duration::from_millis(10), Box::new(|| {}));
        host.cancel(handle);

        assert_eq!(errors.borrow().len(), 1);
    }
}
