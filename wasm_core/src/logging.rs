//! `log` backend for the tools. In the browser records go to the devtools
//! console; native builds (tests, benches) use env_logger.

use std::sync::Once;

use crate::error::ToolError;

static INIT: Once = Once::new();

/// Installs the logger once. Safe to call from every entry point.
pub fn init_logging() {
    INIT.call_once(install);
}

/// Logs a failed tool invocation before the error is handed back to the page.
pub fn report_failure(tool: &str, err: &ToolError) {
    log::warn!("{tool} failed: {err}");
}

#[cfg(target_arch = "wasm32")]
fn install() {
    static LOGGER: console::ConsoleLogger = console::ConsoleLogger;
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(log::LevelFilter::Info);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn install() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .is_test(cfg!(test))
        .try_init();
}

#[cfg(target_arch = "wasm32")]
mod console {
    use log::{Level, Log, Metadata, Record};
    use wasm_bindgen::prelude::*;

    #[wasm_bindgen]
    extern "C" {
        #[wasm_bindgen(js_namespace = console, js_name = debug)]
        fn console_debug(message: &str);
        #[wasm_bindgen(js_namespace = console, js_name = info)]
        fn console_info(message: &str);
        #[wasm_bindgen(js_namespace = console, js_name = warn)]
        fn console_warn(message: &str);
        #[wasm_bindgen(js_namespace = console, js_name = error)]
        fn console_error(message: &str);
    }

    pub(super) struct ConsoleLogger;

    impl Log for ConsoleLogger {
        fn enabled(&self, metadata: &Metadata) -> bool {
            metadata.level() <= log::max_level()
        }

        fn log(&self, record: &Record) {
            if !self.enabled(record.metadata()) {
                return;
            }
            let line = format!("[{}] {}", record.target(), record.args());
            match record.level() {
                Level::Error => console_error(&line),
                Level::Warn => console_warn(&line),
                Level::Info => console_info(&line),
                Level::Debug | Level::Trace => console_debug(&line),
            }
        }

        fn flush(&self) {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_logging_is_idempotent() {
        init_logging();
        init_logging();
        report_failure("test", &ToolError::invalid("boom"));
    }
}
