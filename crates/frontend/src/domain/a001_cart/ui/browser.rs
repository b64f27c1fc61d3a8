//! Browser-backed ports: prompts, reload, timers and toasts

use gloo_timers::callback::Timeout;
use std::time::Duration;

use crate::domain::a001_cart::ports::{Dialogs, Navigator, Notifier, Scheduler};
use crate::shared::toast::{Notice, ToastService};

pub struct BrowserDialogs;

impl Dialogs for BrowserDialogs {
    fn confirm(&self, message: &str) -> bool {
        web_sys::window()
            .and_then(|w| w.confirm_with_message(message).ok())
            .unwrap_or(false)
    }

    fn alert(&self, message: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }
}

pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn reload(&self) {
        let result = web_sys::window().map(|w| w.location().reload());
        if let Some(Err(err)) = result {
            log::error!("Page reload failed: {:?}", err);
        }
    }
}

/// `setTimeout` scheduling; timers are never cancelled
pub struct TimerScheduler;

impl Scheduler for TimerScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        Timeout::new(millis, task).forget();
    }
}

pub struct ToastNotifier(pub ToastService);

impl Notifier for ToastNotifier {
    fn notify(&self, notice: &Notice) {
        self.0.push(notice.clone());
    }
}
