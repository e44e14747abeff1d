use dmxbridge::{
    arguments,
    logger::{self, LogTag},
    run,
};

/// Main entry point for the DMX bridge
///
/// Samples an Art-Net feed and streams the configured channel window to
/// every connected WebSocket client. Runs until interrupted.
#[tokio::main]
async fn main() {
    logger::init();

    if arguments::is_help_requested() {
        arguments::print_help();
        std::process::exit(0);
    }

    logger::info(LogTag::System, "DMX bridge starting up...");

    match run::run().await {
        Ok(()) => {
            logger::info(LogTag::System, "DMX bridge stopped");
        }
        Err(e) => {
            logger::error(LogTag::System, &format!("DMX bridge failed: {}", e));
            std::process::exit(1);
        }
    }
}
