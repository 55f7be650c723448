use crate::domain::ports::Notifier;
use crate::utils::noise::NoiseFilter;
use std::sync::{Arc, Mutex};

/// 終端機提示：錯誤寫到 stderr
#[derive(Debug, Clone, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn error(&self, message: &str) {
        eprintln!("❌ {}", message);
    }

    fn success(&self, message: &str) {
        println!("✅ {}", message);
    }
}

/// Keeps every notification in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryNotifier {
    errors: Arc<Mutex<Vec<String>>>,
    successes: Arc<Mutex<Vec<String>>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn successes(&self) -> Vec<String> {
        self.successes.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl Notifier for MemoryNotifier {
    fn error(&self, message: &str) {
        if let Ok(mut errors) = self.errors.lock() {
            errors.push(message.to_string());
        }
    }

    fn success(&self, message: &str) {
        if let Ok(mut successes) = self.successes.lock() {
            successes.push(message.to_string());
        }
    }
}

pub struct FilteredNotifier {
    inner: Arc<dyn Notifier>,
    filter: NoiseFilter,
}

impl FilteredNotifier {
    pub fn new(inner: Arc<dyn Notifier>, filter: NoiseFilter) -> Self {
        Self { inner, filter }
    }
}

impl Notifier for FilteredNotifier {
    fn error(&self, message: &str) {
        if self.filter.is_noise(message) {
            tracing::trace!("Suppressed notification: {}", message);
            return;
        }
        self.inner.error(message);
    }

    fn success(&self, message: &str) {
        self.inner.success(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filtered_notifier_drops_noise() {
        let memory = MemoryNotifier::new();
        let notifier = FilteredNotifier::new(Arc::new(memory.clone()), NoiseFilter::default());

        notifier.error("ResizeObserver loop limit exceeded");
        notifier.error("disk full");
        notifier.success("saved");

        assert_eq!(memory.errors(), vec!["disk full".to_string()]);
        assert_eq!(memory.successes(), vec!["saved".to_string()]);
    }
}
