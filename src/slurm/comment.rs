//! Comment annotation

use log::debug;

use super::{CommentPosition, SlurmScript, Which};

impl SlurmScript {
    /// Add a full-line `# text` comment at the end, or at the top (after
    /// the shebang when one exists).
    pub fn add_comment(&mut self, text: &str, position: CommentPosition) {
        let line = format!("# {}", text);
        debug!("adding comment {:?} ({:?})", line, position);
        match position {
            CommentPosition::End => self.lines.push(line),
            CommentPosition::Top => {
                let idx = self.first_index_after_shebang();
                self.lines.insert(idx, line);
            }
        }
    }

    /// Insert `# text` immediately above lines starting with `command `.
    pub fn add_comment_above_command(&mut self, command: &str, text: &str, which: Which) {
        debug!(
            "adding comment above command {:?}: {:?} (which={:?})",
            command, text, which
        );
        self.insert_comment_above(
            |line| {
                line.trim()
                    .strip_prefix(command)
                    .map_or(false, |rest| rest.starts_with(' '))
            },
            text,
            which,
        );
    }

    /// Insert `# text` immediately above lines containing `substring`.
    pub fn add_comment_above_line_containing(
        &mut self,
        substring: &str,
        text: &str,
        which: Which,
    ) {
        debug!(
            "adding comment above lines containing {:?}: {:?} (which={:?})",
            substring, text, which
        );
        self.insert_comment_above(|line| line.contains(substring), text, which);
    }

    fn insert_comment_above<F>(&mut self, matches: F, text: &str, which: Which)
    where
        F: Fn(&str) -> bool,
    {
        let comment_line = format!("# {}", text);

        let mut targets: Vec<usize> = self
            .lines
            .iter()
            .enumerate()
            .filter(|(_, line)| matches(line))
            .map(|(idx, _)| idx)
            .collect();
        if which == Which::First {
            targets.truncate(1);
        }

        // Insert back-to-front so earlier indices stay valid.
        for idx in targets.into_iter().rev() {
            self.lines.insert(idx, comment_line.clone());
        }
    }
}
