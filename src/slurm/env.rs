//! `export KEY=VALUE` line editing

use indexmap::IndexMap;
use log::debug;

use super::patterns;
use super::SlurmScript;

impl SlurmScript {
    /// Environment variables from `export KEY=VALUE` lines, top-to-bottom,
    /// last occurrence of a key winning.
    pub fn env_vars(&self) -> IndexMap<String, String> {
        let mut env = IndexMap::new();

        for line in &self.lines {
            if let Some(caps) = patterns::EXPORT_RE.captures(line.trim()) {
                env.insert(caps[1].to_string(), caps[2].to_string());
            }
        }
        debug!("extracted environment: {:?}", env);
        env
    }

    /// Add or update an `export KEY=VALUE` line.
    ///
    /// The first line exporting `key` is replaced in place; without one the
    /// new line goes after the last export line, or at the very end when the
    /// script has none.
    pub fn set_env_var(&mut self, key: &str, value: &str) {
        debug!("setting env var {}={}", key, value);
        let pattern = patterns::export_line_re(key);
        let new_line = format!("export {}={}", key, value);

        let mut last_export_idx = None;
        for idx in 0..self.lines.len() {
            let stripped = self.lines[idx].trim();
            if stripped.starts_with("export ") {
                last_export_idx = Some(idx);
            }
            if pattern.is_match(stripped) {
                self.lines[idx] = new_line;
                return;
            }
        }

        let insert_at = match last_export_idx {
            Some(idx) => idx + 1,
            None => self.lines.len(),
        };
        self.lines.insert(insert_at, new_line);
    }

    /// Remove every line exporting `key`.
    pub fn unset_env_var(&mut self, key: &str) {
        debug!("unsetting env var {}", key);
        let pattern = patterns::export_line_re(key);
        self.lines.retain(|line| !pattern.is_match(line.trim()));
    }
}
