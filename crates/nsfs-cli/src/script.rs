// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Line-oriented command scripts replayed against a namespace

use anyhow::{Result, anyhow, bail};
use nsfs_core::{Entry, Namespace};
use serde_json::json;
use std::io::Write;

/// Walk-through of the basic operations, run by `nsfs demo`
pub const DEMO_SCRIPT: &str = "\
# Build the initial tree from full paths
mkdir-p /home
mkdir-p /home/user
touch-p /home/user/file1.txt
touch-p /home/user/file2.txt
pwd
ls

cd /home/user
pwd
ls
cd /home
ls

# Navigation to a missing directory leaves the current directory unchanged
cd /home/newNonExistentPath
pwd

cd /home/user
mkdir desktop
cd /home/user/desktop
touch desktopfile1.txt
touch desktopfile2.txt
ls
write desktopfile1.txt This is the content of desktopfile1.txt.
cat desktopfile1.txt
mv desktopfile1.txt desktopFolder1/desktopfile1.txt
find desktopfile2.txt

cd /home/user
rmdir desktop
ls

ln-s symlink1 /home/user/file1.txt
readlink symlink1
write file1.txt This is the content of file1.txt.
ln hardlink1.txt file1.txt
cat hardlink1.txt
empty /home/user
stats
";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Plaintext,
    Json,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScriptCommand {
    Mkdir(String),
    MkdirP(String),
    Touch(String),
    TouchP(String),
    Cd(String),
    Pwd,
    Ls,
    Rmdir(String),
    Rm(String),
    Write { name: String, content: String },
    Cat(String),
    Mv { name: String, path: String },
    Find(String),
    LnS { name: String, target: String },
    Ln { new_name: String, existing: String },
    Readlink(String),
    Empty(String),
    Stats,
}

impl ScriptCommand {
    /// Parse one script line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim_start();
        let args: Vec<&str> = rest.split_whitespace().collect();

        let one = |args: &[&str]| -> Result<String> {
            match args {
                [arg] => Ok(arg.to_string()),
                _ => Err(anyhow!("`{verb}` takes exactly one argument")),
            }
        };
        let two = |args: &[&str]| -> Result<(String, String)> {
            match args {
                [a, b] => Ok((a.to_string(), b.to_string())),
                _ => Err(anyhow!("`{verb}` takes exactly two arguments")),
            }
        };
        let none = |args: &[&str]| -> Result<()> {
            if args.is_empty() {
                Ok(())
            } else {
                Err(anyhow!("`{verb}` takes no arguments"))
            }
        };

        let command = match verb {
            "mkdir" => Self::Mkdir(one(&args)?),
            "mkdir-p" => Self::MkdirP(one(&args)?),
            "touch" => Self::Touch(one(&args)?),
            "touch-p" => Self::TouchP(one(&args)?),
            "cd" => Self::Cd(one(&args)?),
            "pwd" => {
                none(&args)?;
                Self::Pwd
            }
            "ls" => {
                none(&args)?;
                Self::Ls
            }
            "rmdir" => Self::Rmdir(one(&args)?),
            "rm" => Self::Rm(one(&args)?),
            "write" => {
                if rest.is_empty() {
                    bail!("`write` takes a name and optional content");
                }
                let (name, content) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                Self::Write {
                    name: name.to_string(),
                    content: content.trim_start().to_string(),
                }
            }
            "cat" => Self::Cat(one(&args)?),
            "mv" => {
                let (name, path) = two(&args)?;
                Self::Mv { name, path }
            }
            "find" => Self::Find(one(&args)?),
            "ln-s" => {
                let (name, target) = two(&args)?;
                Self::LnS { name, target }
            }
            "ln" => {
                let (new_name, existing) = two(&args)?;
                Self::Ln { new_name, existing }
            }
            "readlink" => Self::Readlink(one(&args)?),
            "empty" => Self::Empty(one(&args)?),
            "stats" => {
                none(&args)?;
                Self::Stats
            }
            other => bail!("unknown command `{other}`"),
        };
        Ok(Some(command))
    }
}

/// Outcome of a whole script
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScriptSummary {
    pub executed: usize,
    pub failed: usize,
}

pub struct ScriptRunner<W: Write> {
    namespace: Namespace,
    out: W,
    format: OutputFormat,
}

impl<W: Write> ScriptRunner<W> {
    pub fn new(namespace: Namespace, out: W, format: OutputFormat) -> Self {
        Self {
            namespace,
            out,
            format,
        }
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    #[cfg(test)]
    pub fn into_inner(self) -> (Namespace, W) {
        (self.namespace, self.out)
    }

    /// Run every line of `script`. A failing line is reported and skipped.
    /// Only errors writing the output abort the run.
    pub fn run_script(&mut self, script: &str) -> std::io::Result<ScriptSummary> {
        let mut summary = ScriptSummary::default();
        for (index, line) in script.lines().enumerate() {
            let line_no = index + 1;
            let command = match ScriptCommand::parse(line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(err) => {
                    summary.failed += 1;
                    self.report_failure(line_no, &err)?;
                    continue;
                }
            };
            summary.executed += 1;
            tracing::debug!(line = line_no, ?command, "executing");
            if let Err(err) = self.execute(&command) {
                if err.downcast_ref::<std::io::Error>().is_some() {
                    return Err(std::io::Error::other(err.to_string()));
                }
                summary.failed += 1;
                self.report_failure(line_no, &err)?;
            }
        }
        Ok(summary)
    }

    fn report_failure(&mut self, line: usize, err: &anyhow::Error) -> std::io::Result<()> {
        tracing::info!(line, error = %err, "script line failed");
        match self.format {
            OutputFormat::Plaintext => writeln!(self.out, "error: line {line}: {err:#}"),
            OutputFormat::Json => writeln!(
                self.out,
                "{}",
                json!({ "line": line, "error": format!("{err:#}") })
            ),
        }
    }

    pub fn execute(&mut self, command: &ScriptCommand) -> Result<()> {
        let ns = &mut self.namespace;
        match command {
            ScriptCommand::Mkdir(name) => ns.create_directory(name)?,
            ScriptCommand::MkdirP(path) => ns.create_directory_full_path(path)?,
            ScriptCommand::Touch(name) => ns.create_file(name)?,
            ScriptCommand::TouchP(path) => ns.create_file_full_path(path)?,
            ScriptCommand::Cd(path) => ns.change_directory(path)?,
            ScriptCommand::Pwd => {
                let path = ns.current_path();
                self.emit(&path, json!({ "path": path }))?;
            }
            ScriptCommand::Ls => {
                let entries = ns.list_current_directory();
                self.emit_entries(&entries)?;
            }
            ScriptCommand::Rmdir(name) => {
                if !ns.remove_directory(name) {
                    bail!("no directory named `{name}` in {}", ns.current_path());
                }
            }
            ScriptCommand::Rm(name) => {
                if !ns.remove_file(name) {
                    bail!("no file named `{name}` in {}", ns.current_path());
                }
            }
            ScriptCommand::Write { name, content } => {
                if !ns.write_file(name, content) {
                    bail!("no file named `{name}` in {}", ns.current_path());
                }
            }
            ScriptCommand::Cat(name) => {
                let Some(content) = ns.get_file_contents(name).map(str::to_string) else {
                    bail!("no file named `{name}` in {}", ns.current_path());
                };
                self.emit(&content, json!({ "name": name, "content": content }))?;
            }
            ScriptCommand::Mv { name, path } => {
                if !ns.move_file(name, path) {
                    bail!("cannot move `{name}` to `{path}`");
                }
            }
            ScriptCommand::Find(name) => {
                let entries = ns.find_items_by_name(name);
                self.emit_entries(&entries)?;
            }
            ScriptCommand::LnS { name, target } => ns.create_symlink(name, target)?,
            ScriptCommand::Ln { new_name, existing } => {
                if !ns.create_hard_link(new_name, existing)? {
                    tracing::info!(
                        new_name = %new_name,
                        existing = %existing,
                        "hard link skipped, source is not a known file"
                    );
                }
            }
            ScriptCommand::Readlink(name) => {
                let Some(target) = ns.read_link(name).map(str::to_string) else {
                    bail!("no symlink named `{name}` in {}", ns.current_path());
                };
                self.emit(&target, json!({ "name": name, "target": target }))?;
            }
            ScriptCommand::Empty(path) => {
                let empty = ns.is_empty(path)?;
                self.emit(&empty.to_string(), json!({ "path": path, "empty": empty }))?;
            }
            ScriptCommand::Stats => {
                let stats = ns.stats();
                let text = format!(
                    "directories={} files={} symlinks={} link-entries={} stale-link-entries={}",
                    stats.directories,
                    stats.files,
                    stats.symlinks,
                    stats.link_entries,
                    stats.stale_link_entries
                );
                self.emit(&text, serde_json::to_value(&stats)?)?;
            }
        }
        Ok(())
    }

    fn emit(&mut self, text: &str, value: serde_json::Value) -> Result<()> {
        match self.format {
            OutputFormat::Plaintext => writeln!(self.out, "{text}")?,
            OutputFormat::Json => writeln!(self.out, "{value}")?,
        }
        Ok(())
    }

    fn emit_entries(&mut self, entries: &[Entry]) -> Result<()> {
        match self.format {
            OutputFormat::Plaintext => {
                for entry in entries {
                    writeln!(self.out, "{}\t{}", entry.kind, entry.name)?;
                }
            }
            OutputFormat::Json => writeln!(self.out, "{}", serde_json::to_string(entries)?)?,
        }
        Ok(())
    }
}
