use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Scoped profiler recording cumulative time and call count per section.
pub struct Profiler {
    sections: HashMap<&'static str, (Duration, u64)>,
}

impl Profiler {
    pub fn new() -> Self {
        Self {
            sections: HashMap::new(),
        }
    }

    pub fn finish(&mut self, guard: &SectionGuard) {
        let entry = self.sections.entry(guard.name).or_default();
        entry.0 += guard.start.elapsed();
        entry.1 += 1;
    }

    pub fn report(&self) -> Vec<(&'static str, Duration, u64)> {
        let mut v: Vec<_> = self
            .sections
            .iter()
            .map(|(name, (dur, calls))| (*name, *dur, *calls))
            .collect();
        v.sort_by(|a, b| b.1.cmp(&a.1));
        v
    }

    pub fn clear(&mut self) {
        self.sections.clear();
    }
}

impl Default for Profiler {
    fn default() -> Self {
        Self::new()
    }
}

pub struct SectionGuard {
    name: &'static str,
    start: Instant,
}

/// Start a profiling section; the guard reports into the global profiler on drop.
pub fn start(name: &'static str) -> SectionGuard {
    SectionGuard {
        name,
        start: Instant::now(),
    }
}

#[cfg(feature = "profiling")]
impl Drop for SectionGuard {
    fn drop(&mut self) {
        crate::PROFILER.lock().finish(self);
    }
}

/// Profile a scope only when the `profiling` feature is enabled.
#[macro_export]
macro_rules! profile_scope {
    ($name:expr) => {
        #[cfg(feature = "profiling")]
        let _guard = $crate::profiler::start($name);
    };
}
