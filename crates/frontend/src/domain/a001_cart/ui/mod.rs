pub mod browser;
pub mod dom;
pub mod events;
pub mod markup;

pub use browser::{BrowserDialogs, BrowserNavigator, TimerScheduler, ToastNotifier};
pub use dom::{bind_cart_page, DomCartView};
pub use events::install_cart_handlers;
