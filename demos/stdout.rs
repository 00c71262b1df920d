//! Emit a few events as GELF lines on stdout.
//!
//! Run with: `cargo run --example stdout_gelf`

use gelf_formatter::{FormatterConfig, GelfLayer};
use tracing_subscriber::layer::SubscriberExt;

fn main() {
    let config = FormatterConfig::default()
        .allow_reserved(["target", "line"])
        .ignore(["internal_state"]);

    let subscriber = tracing_subscriber::registry().with(GelfLayer::stdout(config));
    tracing::subscriber::set_global_default(subscriber).expect("set global subscriber");

    tracing::info!(user = "alice", "login accepted");
    tracing::warn!(attempts = 3, internal_state = "cooldown", "login throttled");
    tracing::error!(user = "mallory", "login rejected");
}
