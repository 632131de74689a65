//! Routes `tracing` output to the browser console.

use std::io;

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;
use wasm_bindgen::JsValue;

/// Buffers one formatted event and hands it to `console.log` on drop.
pub struct ConsoleWriter {
    buf: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.buf.is_empty() {
            let line = String::from_utf8_lossy(&self.buf);
            web_sys::console::log_1(&JsValue::from_str(line.trim_end()));
            self.buf.clear();
        }
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let _ = io::Write::flush(self);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Console;

impl<'a> MakeWriter<'a> for Console {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter { buf: Vec::new() }
    }
}

/// Install the panic hook and a console subscriber. `directives` uses
/// `EnvFilter` syntax, e.g. `"info"` or `"pulse_player=debug"`.
pub fn init(directives: &str) {
    console_error_panic_hook::set_once();
    let filter = EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new("info"));
    // the clock is unavailable on wasm32-unknown-unknown
    let _ = tracing_subscriber::fmt()
        .with_writer(Console)
        .with_ansi(false)
        .without_time()
        .with_env_filter(filter)
        .try_init();
}
