//! Body command editing: shell-aware tokenization, option rewriting and
//! option-order normalization.

use std::collections::HashSet;

use log::debug;

use super::{BodyPosition, SlurmScript, Which};
use crate::error::{Error, Result};

/// True when the trimmed line starts with `<command> ` (command name plus a
/// following space).
fn is_command_line(stripped: &str, command: &str) -> bool {
    stripped
        .strip_prefix(command)
        .map_or(false, |rest| rest.starts_with(' '))
}

/// Split a command line the way an interactive shell would: quoted
/// substrings form single tokens, unquoted whitespace separates them.
/// Unbalanced quoting is a hard failure that aborts the edit.
fn tokenize(line: &str) -> Result<Vec<String>> {
    shlex::split(line).ok_or_else(|| Error::Tokenize {
        line: line.to_string(),
    })
}

/// Update or insert an option in a tokenized command.
///
/// Handles both `cmd --flag value prog` and `cmd --flag=value prog`. A bare
/// `flag` token followed by a non-option token keeps the space-separated
/// style; anything else is rewritten to `flag=value`. A missing flag is
/// inserted as `flag=value` before the first non-option token after the
/// command name, or appended when every token is an option.
fn set_option_tokens(tokens: &mut Vec<String>, flag: &str, value: &str) {
    let flag_eq = format!("{}=", flag);

    if let Some(idx) = tokens
        .iter()
        .position(|tok| tok == flag || tok.starts_with(&flag_eq))
    {
        if tokens[idx] == flag && idx + 1 < tokens.len() && !tokens[idx + 1].starts_with('-') {
            tokens[idx + 1] = value.to_string();
        } else {
            tokens[idx] = format!("{}={}", flag, value);
        }
        return;
    }

    let mut insert_pos = tokens.len();
    for (idx, tok) in tokens.iter().enumerate().skip(1) {
        if !tok.starts_with('-') {
            insert_pos = idx;
            break;
        }
    }
    tokens.insert(insert_pos, format!("{}={}", flag, value));
}

impl SlurmScript {
    /// Append or prepend a body command line.
    pub fn add_body_command(&mut self, command: &str, position: BodyPosition) {
        debug!("adding body command {:?} ({:?})", command, position);
        match position {
            BodyPosition::End => self.lines.push(command.to_string()),
            BodyPosition::Top => self.lines.insert(0, command.to_string()),
        }
    }

    /// List body commands starting with `prefix` plus a space, trimmed.
    pub fn list_commands(&self, prefix: &str) -> Vec<String> {
        let commands: Vec<String> = self
            .lines
            .iter()
            .map(|line| line.trim())
            .filter(|stripped| is_command_line(stripped, prefix))
            .map(str::to_string)
            .collect();
        debug!("commands with prefix {:?}: {:?}", prefix, commands);
        commands
    }

    /// Update or add an option on lines starting with `command`.
    ///
    /// `Which::First` stops after the first matching line; `Which::All`
    /// rewrites every one. Edited lines are rebuilt by joining tokens with
    /// single spaces.
    pub fn set_option_on_command(
        &mut self,
        command: &str,
        flag: &str,
        value: &str,
        which: Which,
    ) -> Result<()> {
        debug!(
            "setting option {}={} on command {:?} (which={:?})",
            flag, value, command, which
        );

        for idx in 0..self.lines.len() {
            let stripped = self.lines[idx].trim().to_string();
            if !is_command_line(&stripped, command) {
                continue;
            }

            let mut tokens = tokenize(&stripped)?;
            set_option_tokens(&mut tokens, flag, value);
            self.lines[idx] = tokens.join(" ");

            if which == Which::First {
                break;
            }
        }
        Ok(())
    }

    /// Update or add an option on the `occurrence`-th (zero-based) line
    /// starting with `command`, ignoring all others.
    pub fn set_option_on_command_at(
        &mut self,
        command: &str,
        occurrence: usize,
        flag: &str,
        value: &str,
    ) -> Result<()> {
        debug!(
            "setting option {}={} on command {:?}, occurrence={}",
            flag, value, command, occurrence
        );
        let mut seen = 0;

        for idx in 0..self.lines.len() {
            let stripped = self.lines[idx].trim().to_string();
            if !is_command_line(&stripped, command) {
                continue;
            }

            if seen == occurrence {
                let mut tokens = tokenize(&stripped)?;
                set_option_tokens(&mut tokens, flag, value);
                self.lines[idx] = tokens.join(" ");
                return Ok(());
            }
            seen += 1;
        }
        Ok(())
    }

    /// Normalize long-option order on matching command lines.
    ///
    /// Tokens split into command name, a leading run of option tokens and
    /// the positional rest. `--name=value` options named in
    /// `preferred_order` move to the front in that order; all other option
    /// tokens (bare flags included) keep their relative order behind them;
    /// positionals stay last, untouched. `occurrence` limits the rewrite to
    /// one matching line; `None` rewrites them all.
    pub fn normalize_command_options(
        &mut self,
        command: &str,
        preferred_order: &[&str],
        occurrence: Option<usize>,
    ) -> Result<()> {
        debug!(
            "normalizing options for command {:?}, preferred_order={:?}, occurrence={:?}",
            command, preferred_order, occurrence
        );
        let mut seen = 0;

        for idx in 0..self.lines.len() {
            let stripped = self.lines[idx].trim().to_string();
            if !is_command_line(&stripped, command) {
                continue;
            }
            if let Some(target) = occurrence {
                if seen != target {
                    seen += 1;
                    continue;
                }
            }

            let tokens = tokenize(&stripped)?;
            if tokens.is_empty() {
                seen += 1;
                continue;
            }

            let mut options: Vec<String> = Vec::new();
            let mut rest_start = tokens.len();
            for (pos, tok) in tokens.iter().enumerate().skip(1) {
                if tok.starts_with('-') {
                    options.push(tok.clone());
                } else {
                    rest_start = pos;
                    break;
                }
            }

            let long_name = |opt: &str| -> Option<String> {
                if opt.starts_with("--") {
                    opt.split_once('=').map(|(name, _)| name.to_string())
                } else {
                    None
                }
            };

            let mut used: HashSet<String> = HashSet::new();
            let mut reordered: Vec<String> = Vec::new();

            for name in preferred_order {
                // Duplicate names resolve to the last occurrence, matching
                // the last-write-wins listing rule.
                if let Some(opt) = options
                    .iter()
                    .rfind(|opt| long_name(opt.as_str()).as_deref() == Some(*name))
                {
                    reordered.push(opt.clone());
                    used.insert((*name).to_string());
                }
            }
            for opt in &options {
                if let Some(name) = long_name(opt) {
                    if used.contains(&name) {
                        continue;
                    }
                }
                reordered.push(opt.clone());
            }

            let mut rebuilt = vec![tokens[0].clone()];
            rebuilt.extend(reordered);
            rebuilt.extend(tokens[rest_start..].iter().cloned());
            self.lines[idx] = rebuilt.join(" ");

            seen += 1;
            if let Some(target) = occurrence {
                if seen > target {
                    break;
                }
            }
        }
        Ok(())
    }
}
