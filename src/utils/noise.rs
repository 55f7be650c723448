//! Suppression of known benign third-party warnings.
//!
//! One pattern set is shared by every interception point: the panic hook,
//! the logging pipeline, the notifier and the top-level error report.

use crate::utils::error::{ClientError, Result};
use regex::Regex;
use std::any::Any;
use std::fmt;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

pub const DEFAULT_NOISE_PATTERN: &str = "ResizeObserver";

#[derive(Debug, Clone)]
pub struct NoiseFilter {
    pattern: Option<Regex>,
}

impl NoiseFilter {
    /// 所有樣式皆不分大小寫
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parts: Vec<String> = patterns
            .into_iter()
            .map(|p| p.as_ref().trim().to_string())
            .filter(|p| !p.is_empty())
            .map(|p| format!("(?:{})", p))
            .collect();

        if parts.is_empty() {
            return Ok(Self { pattern: None });
        }

        let joined = format!("(?i){}", parts.join("|"));
        let pattern = Regex::new(&joined).map_err(|e| ClientError::InvalidConfigValueError {
            field: "notifications.suppress_patterns".to_string(),
            value: joined.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            pattern: Some(pattern),
        })
    }

    pub fn disabled() -> Self {
        Self { pattern: None }
    }

    pub fn is_noise(&self, text: &str) -> bool {
        self.pattern
            .as_ref()
            .map(|re| re.is_match(text))
            .unwrap_or(false)
    }

    /// Checks the error and its whole source chain.
    pub fn is_noise_error(&self, err: &(dyn std::error::Error + 'static)) -> bool {
        let mut current = Some(err);
        while let Some(e) = current {
            if self.is_noise(&e.to_string()) {
                return true;
            }
            current = e.source();
        }
        false
    }
}

impl Default for NoiseFilter {
    fn default() -> Self {
        Self {
            pattern: Regex::new(&format!("(?i){}", DEFAULT_NOISE_PATTERN)).ok(),
        }
    }
}

pub fn panic_payload_text(payload: &(dyn Any + Send)) -> Option<&str> {
    if let Some(s) = payload.downcast_ref::<&str>() {
        Some(s)
    } else {
        payload.downcast_ref::<String>().map(String::as_str)
    }
}

/// 包裝既有的 panic hook，吞掉符合樣式的 panic 訊息
pub fn install_panic_hook(filter: NoiseFilter) {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        if let Some(text) = panic_payload_text(info.payload()) {
            if filter.is_noise(text) {
                return;
            }
        }
        previous(info);
    }));
}

/// Drops `warn`/`error` events whose recorded fields match the noise pattern.
pub struct NoiseSuppressionLayer {
    filter: NoiseFilter,
}

impl NoiseSuppressionLayer {
    pub fn new(filter: NoiseFilter) -> Self {
        Self { filter }
    }
}

impl<S: Subscriber> Layer<S> for NoiseSuppressionLayer {
    fn event_enabled(&self, event: &Event<'_>, _ctx: Context<'_, S>) -> bool {
        if *event.metadata().level() > Level::WARN {
            return true;
        }
        let mut collector = TextCollector::default();
        event.record(&mut collector);
        !self.filter.is_noise(&collector.text)
    }
}

#[derive(Default)]
struct TextCollector {
    text: String,
}

impl TextCollector {
    fn push(&mut self, value: &str) {
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(value);
    }
}

impl Visit for TextCollector {
    fn record_str(&mut self, _field: &Field, value: &str) {
        self.push(value);
    }

    fn record_error(&mut self, _field: &Field, value: &(dyn std::error::Error + 'static)) {
        let mut current = Some(value);
        while let Some(e) = current {
            self.push(&e.to_string());
            current = e.source();
        }
    }

    fn record_debug(&mut self, _field: &Field, value: &dyn fmt::Debug) {
        self.push(&format!("{:?}", value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tracing_subscriber::layer::SubscriberExt;

    #[derive(Debug)]
    struct Wrapped {
        source: std::io::Error,
    }

    impl fmt::Display for Wrapped {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("render failed")
        }
    }

    impl std::error::Error for Wrapped {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.source)
        }
    }

    struct CountingLayer {
        count: Arc<AtomicUsize>,
    }

    impl<S: Subscriber> Layer<S> for CountingLayer {
        fn on_event(&self, _event: &Event<'_>, _ctx: Context<'_, S>) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_default_pattern_is_case_insensitive() {
        let filter = NoiseFilter::default();
        assert!(filter.is_noise("ResizeObserver loop limit exceeded"));
        assert!(filter.is_noise("resizeobserver loop completed with undelivered notifications"));
        assert!(!filter.is_noise("disk full"));
    }

    #[test]
    fn test_custom_patterns() {
        let filter = NoiseFilter::new(["ResizeObserver", "  ", "benign-\\d+"]).unwrap();
        assert!(filter.is_noise("BENIGN-42 happened"));
        assert!(!filter.is_noise("benign-x"));

        assert!(NoiseFilter::new(["("]).is_err());
        assert!(!NoiseFilter::new(Vec::<String>::new()).unwrap().is_noise("ResizeObserver"));
    }

    #[test]
    fn test_source_chain_is_checked() {
        let err = Wrapped {
            source: std::io::Error::other("ResizeObserver loop limit exceeded"),
        };
        assert!(NoiseFilter::default().is_noise_error(&err));
        assert!(!NoiseFilter::disabled().is_noise_error(&err));
    }

    #[test]
    fn test_panic_payload_text() {
        let payload: Box<dyn Any + Send> = Box::new("static message");
        assert_eq!(panic_payload_text(payload.as_ref()), Some("static message"));

        let payload: Box<dyn Any + Send> = Box::new(String::from("owned message"));
        assert_eq!(panic_payload_text(payload.as_ref()), Some("owned message"));

        let payload: Box<dyn Any + Send> = Box::new(7_u32);
        assert_eq!(panic_payload_text(payload.as_ref()), None);
    }

    #[test]
    fn test_layer_drops_matching_warnings_only() {
        let count = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry()
            .with(NoiseSuppressionLayer::new(NoiseFilter::default()))
            .with(CountingLayer {
                count: count.clone(),
            });

        tracing::subscriber::with_default(subscriber, || {
            tracing::error!("ResizeObserver loop limit exceeded");
            tracing::warn!(reason = "resizeobserver", "layout warning");
            tracing::error!("disk full");
            tracing::info!("ResizeObserver info passes through");
        });

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_panic_hook_swallows_noise_only() {
        let original = std::panic::take_hook();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        std::panic::set_hook(Box::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        install_panic_hook(NoiseFilter::default());

        let noise = std::panic::catch_unwind(|| panic!("ResizeObserver loop limit exceeded"));
        let real = std::panic::catch_unwind(|| panic!("real failure"));

        let _ = std::panic::take_hook();
        std::panic::set_hook(original);

        assert!(noise.is_err());
        assert!(real.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
