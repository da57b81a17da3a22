mod dialogs;
mod feedback;
mod filters;
mod home;

use std::time::Duration;

use widget_state::TimerHost;
use widget_state_web::BrowserTimerHost;

pub use dialogs::DialogsPage;
pub use feedback::FeedbackPage;
pub use filters::FiltersPage;
pub use home::HomePage;

/// Stand-in for a network round trip in the demos.
///
/// Resolves immediately when no timer is available.
pub(crate) async fn simulated_latency(ms: u64) {
    let (done, waiting) = futures::channel::oneshot::channel::<()>();
    let _timeout = BrowserTimerHost::new().schedule(
        Duration::from_millis(ms),
        Box::new(move || {
            let _ = done.send(());
        }),
    );
    let _ = waiting.await;
}
