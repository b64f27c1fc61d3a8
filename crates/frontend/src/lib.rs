pub mod app;
pub mod domain;
pub mod shared;

use wasm_bindgen::prelude::*;

use crate::shared::config::{load_config, CartConfig};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    let (config, config_error) = match load_config() {
        Ok(config) => (config, None),
        Err(err) => (CartConfig::default(), Some(err)),
    };

    // initializes logging using the `log` crate
    _ = console_log::init_with_level(config.logging.level());
    if let Some(err) = config_error {
        log::warn!("Ignoring invalid cart configuration: {}", err);
    }

    if let Err(err) = app::boot(config) {
        log::error!("Cart sync failed to start: {:?}", err);
    }
}
