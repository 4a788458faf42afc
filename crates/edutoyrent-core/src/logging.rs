// SPDX-License-Identifier: AGPL-3.0
// EduToyRent Core - Tracing setup for frontends

use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber, honoring `RUST_LOG`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init() {
    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = "edutoyrent_core=info".parse() {
        filter = filter.add_directive(directive);
    }

    if tracing_subscriber::fmt().with_env_filter(filter).try_init().is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}
