//! `module <action> <name>` line editing

use log::debug;

use super::{ModulePosition, SlurmScript};

fn is_module_line(line: &str) -> bool {
    line.trim().starts_with("module ")
}

impl SlurmScript {
    /// List all module lines, trimmed, top-to-bottom.
    pub fn list_modules(&self) -> Vec<String> {
        let modules: Vec<String> = self
            .lines
            .iter()
            .filter(|line| is_module_line(line))
            .map(|line| line.trim().to_string())
            .collect();
        debug!("found module lines: {:?}", modules);
        modules
    }

    /// Insert a `module <action> <name>` line at the requested position.
    ///
    /// Falls back to appending when the requested anchor does not exist.
    pub fn add_module(&mut self, action: &str, name: &str, position: ModulePosition) {
        let new_line = format!("module {} {}", action, name);
        debug!("adding module line {:?} (position={:?})", new_line, position);

        match position {
            ModulePosition::End => self.lines.push(new_line),
            ModulePosition::AfterLastModule => match self.find_last_matching(is_module_line) {
                Some(idx) => self.lines.insert(idx + 1, new_line),
                None => self.lines.push(new_line),
            },
            ModulePosition::AfterShebang => {
                let idx = self.first_index_after_shebang();
                self.lines.insert(idx, new_line);
            }
        }
    }

    /// Remove every module line containing `name_substring`.
    pub fn remove_module(&mut self, name_substring: &str) {
        debug!("removing module lines containing {:?}", name_substring);
        self.lines
            .retain(|line| !(is_module_line(line) && line.contains(name_substring)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_modules() {
        let script =
            SlurmScript::from_text("#!/bin/bash\nmodule purge\n  module load vasp/6.4.2\nsrun x");
        assert_eq!(script.list_modules(), ["module purge", "module load vasp/6.4.2"]);
    }

    #[test]
    fn test_add_module_after_last_module() {
        let mut script = SlurmScript::from_text("#!/bin/bash\nmodule purge\nsrun x");
        script.add_module("load", "vasp/6.4.2", ModulePosition::AfterLastModule);
        assert_eq!(script.lines()[2], "module load vasp/6.4.2");
    }

    #[test]
    fn test_add_module_falls_back_to_append() {
        let mut script = SlurmScript::from_text("#!/bin/bash\nsrun x");
        script.add_module("load", "vasp", ModulePosition::AfterLastModule);
        assert_eq!(script.lines().last().map(String::as_str), Some("module load vasp"));
    }

    #[test]
    fn test_add_module_after_shebang() {
        let mut script = SlurmScript::from_text("#!/bin/bash\nsrun x");
        script.add_module("load", "vasp", ModulePosition::AfterShebang);
        assert_eq!(script.lines()[1], "module load vasp");
    }

    #[test]
    fn test_add_module_at_top_without_shebang() {
        let mut script = SlurmScript::from_text("srun x");
        script.add_module("load", "vasp", ModulePosition::AfterShebang);
        assert_eq!(script.lines()[0], "module load vasp");
    }

    #[test]
    fn test_add_module_at_end() {
        let mut script = SlurmScript::from_text("#!/bin/bash\nmodule purge\nsrun x");
        script.add_module("load", "vasp", ModulePosition::End);
        assert_eq!(script.lines().last().map(String::as_str), Some("module load vasp"));
    }

    #[test]
    fn test_remove_module_by_substring() {
        let mut script =
            SlurmScript::from_text("module purge\nmodule load vasp/6.4.2\nmodule load fftw");
        script.remove_module("vasp");
        assert_eq!(script.lines(), ["module purge", "module load fftw"]);
    }

    #[test]
    fn test_remove_module_ignores_non_module_lines() {
        let mut script = SlurmScript::from_text("srun vasp_std\nmodule load vasp");
        script.remove_module("vasp");
        assert_eq!(script.lines(), ["srun vasp_std"]);
    }
}
