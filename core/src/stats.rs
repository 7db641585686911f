//! Statistics
//!
//! A small global registry of counters that any crate in the workspace can
//! register into through the `stat_*` macros. Counters are cheap atomic
//! increments at runtime; the registry is only touched when a component
//! registers itself or when the final report is printed.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// A registered statistic.
enum Stat {
    /// A plain counter.
    Counter(&'static AtomicU64),

    /// A ratio of two counters reported as a percentage.
    Percent(&'static AtomicU64, &'static AtomicU64),
}

lazy_static! {
    /// The global statistics registry keyed by "Category/Title".
    static ref REGISTRY: Mutex<BTreeMap<&'static str, Stat>> = Mutex::new(BTreeMap::new());
}

/// Register a counter under the given title. Registering the same title more
/// than once is a no-op.
///
/// * `title`   - The "Category/Title" for the counter.
/// * `counter` - The counter.
pub fn register_counter(title: &'static str, counter: &'static AtomicU64) {
    let mut registry = REGISTRY.lock().unwrap();
    registry.entry(title).or_insert(Stat::Counter(counter));
}

/// Register a percentage statistic under the given title.
///
/// * `title` - The "Category/Title" for the statistic.
/// * `num`   - The numerator counter.
/// * `denom` - The denominator counter.
pub fn register_percent(title: &'static str, num: &'static AtomicU64, denom: &'static AtomicU64) {
    let mut registry = REGISTRY.lock().unwrap();
    registry.entry(title).or_insert(Stat::Percent(num, denom));
}

/// Print all registered statistics grouped by category.
pub fn print_stats() {
    let registry = REGISTRY.lock().unwrap();

    let mut category = "";
    for (title, stat) in registry.iter() {
        let (cat, name) = match title.split_once('/') {
            Some((c, n)) => (c, n),
            None => ("", *title),
        };
        if cat != category {
            println!("{cat}");
            category = cat;
        }
        match stat {
            Stat::Counter(c) => {
                println!("    {:<42} {}", name, c.load(Ordering::Relaxed));
            }
            Stat::Percent(num, denom) => {
                let n = num.load(Ordering::Relaxed);
                let d = denom.load(Ordering::Relaxed);
                if d > 0 {
                    println!("    {:<42} {} / {} ({:.2}%)", name, n, d, 100.0 * n as f64 / d as f64);
                }
            }
        }
    }
}

/// Declares a counter statistic and a function registering it.
#[macro_export]
macro_rules! stat_counter {
    ($title: literal, $name: ident, $register: ident) => {
        pub static $name: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(0);

        #[allow(dead_code)]
        pub(crate) fn $register() {
            $crate::stats::register_counter($title, &$name);
        }
    };
}

/// Declares a percentage statistic (numerator / denominator) and a function
/// registering it.
#[macro_export]
macro_rules! stat_percent {
    ($title: literal, $num: ident, $denom: ident, $register: ident) => {
        pub static $num: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(0);
        pub static $denom: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(0);

        #[allow(dead_code)]
        pub(crate) fn $register() {
            $crate::stats::register_percent($title, &$num, &$denom);
        }
    };
}

/// Increment a statistic counter.
#[macro_export]
macro_rules! stat_inc {
    ($name: ident, $value: expr) => {
        $name.fetch_add($value, std::sync::atomic::Ordering::Relaxed);
    };
}

/// Declares a `register_stats()` function calling all listed registration
/// functions. Components call `register_stats()` from their constructors.
#[macro_export]
macro_rules! stat_register_fns {
    ($($register: ident),+ $(,)?) => {
        pub(crate) fn register_stats() {
            $($register();)+
        }
    };
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    #[test]
    fn register_is_idempotent() {
        register_counter("Test/Counter", &TEST_COUNTER);
        register_counter("Test/Counter", &TEST_COUNTER);
        TEST_COUNTER.fetch_add(2, Ordering::Relaxed);
        assert_eq!(TEST_COUNTER.load(Ordering::Relaxed), 2);
    }
}
