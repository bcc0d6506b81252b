//! #SBATCH directive editing

use indexmap::IndexMap;
use log::debug;

use super::patterns::{self, SBATCH_PREFIX};
use super::SlurmScript;

impl SlurmScript {
    /// List all directives top-to-bottom.
    ///
    /// Later occurrences of the same name overwrite earlier ones in the
    /// result; bare directives map to `None`. (Listing is last-write-wins
    /// while [`set_directive`](Self::set_directive) updates the first
    /// occurrence, a long-standing quirk kept on purpose.)
    pub fn list_directives(&self) -> IndexMap<String, Option<String>> {
        let mut directives = IndexMap::new();

        for line in &self.lines {
            if let Some(caps) = patterns::DIRECTIVE_RE.captures(line.trim()) {
                directives.insert(
                    caps[1].to_string(),
                    caps.get(2).map(|m| m.as_str().to_string()),
                );
            }
        }
        debug!("extracted directives: {:?}", directives);
        directives
    }

    /// Add or update a directive.
    ///
    /// Only the first line matching `name` is replaced, even when duplicates
    /// exist further down. Without a match the canonical line is inserted
    /// after the last existing directive line, or after the shebang when
    /// there is none.
    pub fn set_directive(&mut self, name: &str, value: Option<&str>) {
        debug!("setting directive {}={:?}", name, value);
        let pattern = patterns::directive_line_re(name);
        let new_line = match value {
            Some(value) => format!("{} --{}={}", SBATCH_PREFIX, name, value),
            None => format!("{} --{}", SBATCH_PREFIX, name),
        };

        let mut last_directive_idx = None;
        for idx in 0..self.lines.len() {
            let stripped = self.lines[idx].trim();
            if stripped.starts_with(SBATCH_PREFIX) {
                last_directive_idx = Some(idx);
            }
            if pattern.is_match(stripped) {
                self.lines[idx] = new_line;
                return;
            }
        }

        let insert_at = match last_directive_idx {
            Some(idx) => idx + 1,
            None => self.first_index_after_shebang(),
        };
        self.lines.insert(insert_at, new_line);
    }

    /// Remove every directive line matching `name`, wherever it sits.
    pub fn remove_directive(&mut self, name: &str) {
        debug!("removing directive {}", name);
        let pattern = patterns::directive_line_re(name);
        self.lines.retain(|line| !pattern.is_match(line.trim()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_directives_ordered() {
        let script = SlurmScript::from_text(
            "#!/bin/bash\n#SBATCH --nodes=1\n#SBATCH --time=24:00:00\n#SBATCH --exclusive",
        );
        let directives = script.list_directives();
        let names: Vec<&str> = directives.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["nodes", "time", "exclusive"]);
        assert_eq!(directives["nodes"], Some("1".to_string()));
        assert_eq!(directives["exclusive"], None);
    }

    #[test]
    fn test_list_directives_last_write_wins() {
        let script =
            SlurmScript::from_text("#SBATCH --time=01:00:00\n#SBATCH --time=02:00:00");
        let directives = script.list_directives();
        assert_eq!(directives.len(), 1);
        assert_eq!(directives["time"], Some("02:00:00".to_string()));
    }

    #[test]
    fn test_set_directive_replaces_first_match_only() {
        let mut script =
            SlurmScript::from_text("#SBATCH --time=01:00:00\n#SBATCH --time=02:00:00");
        script.set_directive("time", Some("03:00:00"));
        assert_eq!(script.lines()[0], "#SBATCH --time=03:00:00");
        assert_eq!(script.lines()[1], "#SBATCH --time=02:00:00");
    }

    #[test]
    fn test_set_directive_inserts_after_last_directive() {
        let mut script = SlurmScript::from_text("#!/bin/bash\n#SBATCH --nodes=1");
        script.set_directive("time", Some("01:00:00"));
        assert_eq!(script.lines()[2], "#SBATCH --time=01:00:00");
    }

    #[test]
    fn test_set_directive_without_existing_goes_after_shebang() {
        let mut script = SlurmScript::from_text("#!/bin/bash\nsrun vasp_std");
        script.set_directive("nodes", Some("2"));
        assert_eq!(script.lines()[1], "#SBATCH --nodes=2");
    }

    #[test]
    fn test_set_directive_on_empty_script() {
        let mut script = SlurmScript::from_lines(Vec::new());
        script.set_directive("nodes", Some("1"));
        assert_eq!(script.lines(), ["#SBATCH --nodes=1"]);
    }

    #[test]
    fn test_set_directive_idempotent() {
        let mut script = SlurmScript::from_text("#!/bin/bash\n#SBATCH --nodes=1");
        let before = script.line_count();
        script.set_directive("time", Some("24:00:00"));
        script.set_directive("time", Some("24:00:00"));

        let directives = script.list_directives();
        assert_eq!(directives["time"], Some("24:00:00".to_string()));
        assert_eq!(
            script
                .lines()
                .iter()
                .filter(|l| l.contains("--time"))
                .count(),
            1
        );
        assert!(script.line_count() <= before + 1);
    }

    #[test]
    fn test_set_bare_directive() {
        let mut script = SlurmScript::new();
        script.set_directive("exclusive", None);
        assert_eq!(script.lines()[1], "#SBATCH --exclusive");
    }

    #[test]
    fn test_remove_directive_removes_all_occurrences() {
        let mut script = SlurmScript::from_text(
            "#SBATCH --time=01:00:00\n#SBATCH --nodes=1\n#SBATCH --time=02:00:00",
        );
        script.remove_directive("time");
        assert_eq!(script.lines(), ["#SBATCH --nodes=1"]);
    }

    #[test]
    fn test_remove_unknown_directive_is_noop() {
        let mut script = SlurmScript::from_text("#SBATCH --nodes=1");
        script.remove_directive("time");
        assert_eq!(script.line_count(), 1);
    }
}
