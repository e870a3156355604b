use anyhow::Context;
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*, reload};

type FilterLayer = reload::Layer<EnvFilter, Registry>;

/// Swaps the global level filter when debug mode is toggled at runtime.
///
/// An explicit `RUST_LOG` pins the filter; toggles are then ignored.
#[derive(Clone)]
pub struct FilterHandle {
    inner: reload::Handle<EnvFilter, Registry>,
    pinned: bool,
}

impl FilterHandle {
    pub fn set_debug(&self, enabled: bool) -> anyhow::Result<()> {
        if self.pinned {
            return Ok(());
        }
        self.inner
            .reload(EnvFilter::new(level(enabled)))
            .context("failed to reload tracing filter")
    }
}

pub fn init(json: bool, debug_mode: bool) -> anyhow::Result<FilterHandle> {
    let (filter, handle) = filter_layer(debug_mode, std::env::var(EnvFilter::DEFAULT_ENV).ok());
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(fmt::layer().json().with_target(false)).try_init()
    } else {
        registry.with(fmt::layer().with_target(false)).try_init()
    }
    .context("failed to install tracing subscriber")?;

    Ok(handle)
}

fn filter_layer(debug_mode: bool, env_directives: Option<String>) -> (FilterLayer, FilterHandle) {
    let pinned = env_directives.as_deref().and_then(|d| EnvFilter::try_new(d).ok());
    let is_pinned = pinned.is_some();
    let filter = pinned.unwrap_or_else(|| EnvFilter::new(level(debug_mode)));

    let (layer, inner) = reload::Layer::new(filter);
    (
        layer,
        FilterHandle {
            inner,
            pinned: is_pinned,
        },
    )
}

fn level(debug_mode: bool) -> &'static str {
    if debug_mode { "debug" } else { "info" }
}


#[cfg(test)]
mod tests {
    use super::{testing::current, *};

    #[test]
    fn toggling_debug_reloads_the_level() {
        let (_layer, handle) = filter_layer(false, None);
        assert_eq!(current(&handle), "info");

        handle.set_debug(true).expect("reload");
        assert_eq!(current(&handle), "debug");

        handle.set_debug(false).expect("reload");
        assert_eq!(current(&handle), "info");
    }

    #[test]
    fn rust_log_pins_the_filter() {
        let (_layer, handle) = filter_layer(false, Some("warn".into()));

        handle.set_debug(true).expect("pinned toggle is a no-op");
        assert_eq!(current(&handle), "warn");
    }

    #[test]
    fn unparseable_rust_log_falls_back_to_the_setting() {
        let (_layer, handle) = filter_layer(true, Some("relay=loudest".into()));
        assert_eq!(current(&handle), "debug");

        handle.set_debug(false).expect("reload");
        assert_eq!(current(&handle), "info");
    }
}
