use std::io;

mod app;

fn main() -> io::Result<()> {
    // RUST_LOG controls verbosity; engine debug lines come through the
    // log bridge.
    tracing_subscriber::fmt::init();

    app::run()
}
