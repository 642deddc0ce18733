use anyhow::{Context, Result};
use dashmap::DashMap;
use once_cell::sync::Lazy;
use regex::Regex;

// Entries are immutable once inserted and never evicted. Racing
// first-compiles of the same pattern may both compile; last writer wins and
// both compiled values match identically.
static PATTERN_CACHE: Lazy<DashMap<String, Regex>> = Lazy::new(DashMap::new);

/// Look up a compiled pattern, compiling and storing on miss. A compile
/// failure is reported to the caller and leaves the cache untouched.
pub fn compile_cached(pattern: &str) -> Result<Regex> {
    if let Some(re) = PATTERN_CACHE.get(pattern) {
        return Ok(re.clone());
    }
    let re = Regex::new(pattern).with_context(|| format!("compile pattern {pattern:?}"))?;
    tracing::debug!(pattern, "compiled regex for bridge cache");
    PATTERN_CACHE.insert(pattern.to_string(), re.clone());
    Ok(re)
}

#[cfg(test)]
pub(crate) fn cached_patterns() -> usize {
    PATTERN_CACHE.len()
}
