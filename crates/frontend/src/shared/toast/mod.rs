//! Non-blocking notifications
//!
//! `ToastService` keeps the visible toasts in a signal; `ToastHost` renders
//! them into the fixed container mounted at boot. Each toast dismisses
//! itself after the configured lifetime.

use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use std::time::Duration;

/// Severity of a notification; maps onto the storefront's `bg-*` classes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Danger,
}

impl NoticeLevel {
    pub fn css_suffix(&self) -> &'static str {
        match self {
            NoticeLevel::Success => "success",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Danger,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ToastEntry {
    id: u64,
    notice: Notice,
}

#[derive(Clone, Copy)]
pub struct ToastService {
    items: RwSignal<Vec<ToastEntry>>,
    next_id: RwSignal<u64>,
    lifetime_ms: u32,
}

impl ToastService {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            items: RwSignal::new(Vec::new()),
            next_id: RwSignal::new(1),
            lifetime_ms: u32::try_from(lifetime.as_millis()).unwrap_or(u32::MAX),
        }
    }

    pub fn push(&self, notice: Notice) -> u64 {
        let id = self.next_id.get_untracked();
        self.next_id.set(id + 1);
        self.items.update(|items| items.push(ToastEntry { id, notice }));

        let svc = *self;
        Timeout::new(self.lifetime_ms, move || svc.dismiss(id)).forget();
        id
    }

    pub fn dismiss(&self, id: u64) {
        self.items.update(|items| items.retain(|t| t.id != id));
    }
}

#[component]
pub fn ToastHost(service: ToastService) -> impl IntoView {
    view! {
        <For
            each=move || service.items.get()
            key=|entry| entry.id
            children=move |entry| {
                let id = entry.id;
                let class = format!(
                    "toast show align-items-center border-0 bg-{}",
                    entry.notice.level.css_suffix()
                );
                view! {
                    <div class=class role="alert" aria-live="assertive" aria-atomic="true">
                        <div class="d-flex">
                            <div class="toast-body text-white">{entry.notice.message}</div>
                            <button
                                type="button"
                                class="btn-close btn-close-white me-2 m-auto"
                                aria-label="Kapat"
                                on:click=move |_| service.dismiss(id)
                            ></button>
                        </div>
                    </div>
                }
            }
        />
    }
}
