use tracing::Level;

/// Debug mode logs every sample; otherwise startup and failures only.
pub fn max_level(debug: bool) -> Level {
    if debug {
        Level::DEBUG
    } else {
        Level::INFO
    }
}

pub fn init(debug: bool) {
    // try_init: a second call (tests) must not panic
    let _ = tracing_subscriber::fmt()
        .with_max_level(max_level(debug))
        .with_target(false)
        .try_init();
}
