//! Storage layer: an append-only JSONL log of task list snapshots.

use crate::id::ListId;
use crate::list::TaskList;
use eyre::{Context, Result};
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Storage directory name.
pub const STORE_DIR: &str = ".todograph";

/// JSONL file holding task list snapshots.
const LISTS_FILE: &str = "lists.jsonl";

/// Something that can hand the manager its task lists at start-up.
pub trait TaskListSource {
    /// Load every task list, in the order lists were first recorded.
    fn load_lists(&self) -> Result<Vec<TaskList>>;
}

/// Something that can persist a task list.
pub trait TaskListSink {
    fn save_list(&mut self, list: &TaskList) -> Result<()>;
}

/// Storage handle for reading/writing task lists.
#[derive(Debug)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    /// Initialize storage in the given directory.
    pub fn init(root: &Path) -> Result<Self> {
        let store_dir = root.join(STORE_DIR);
        fs::create_dir_all(&store_dir).context("Failed to create .todograph directory")?;

        let lists_path = store_dir.join(LISTS_FILE);
        if !lists_path.exists() {
            File::create(&lists_path).context("Failed to create lists.jsonl")?;
        }

        log::debug!("Initialized storage at {}", store_dir.display());
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Open existing storage.
    pub fn open(root: &Path) -> Result<Self> {
        let store_dir = root.join(STORE_DIR);
        if !store_dir.exists() {
            eyre::bail!("No .todograph directory found. Run 'td init' first.");
        }

        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    fn lists_path(&self) -> PathBuf {
        self.root.join(STORE_DIR).join(LISTS_FILE)
    }

    /// Append a full snapshot of a list to the JSONL file.
    pub fn append_list(&mut self, list: &TaskList) -> Result<()> {
        let lists_path = self.lists_path();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&lists_path)
            .context("Failed to open lists.jsonl for append")?;

        let json = serde_json::to_string(list).context("Failed to serialize task list")?;
        writeln!(file, "{}", json).context("Failed to write to lists.jsonl")?;
        file.sync_all().context("Failed to sync lists.jsonl")?;

        log::debug!("Saved list {} ({} tasks)", list.id(), list.len());
        Ok(())
    }

    /// Read all lists; the last snapshot of each list id wins.
    ///
    /// Unreadable or unparseable lines are skipped with a warning.
    pub fn read_lists(&self) -> Result<Vec<TaskList>> {
        let lists_path = self.lists_path();
        let mut order: Vec<ListId> = Vec::new();
        let mut lists: HashMap<ListId, TaskList> = HashMap::new();

        if !lists_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&lists_path).context("Failed to open lists.jsonl")?;
        let reader = BufReader::new(file);

        for (index, line) in reader.lines().enumerate() {
            let line_no = index + 1;
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    log::warn!("Failed to read line {}: {}", line_no, e);
                    continue;
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<TaskList>(&line) {
                Ok(list) => {
                    if !lists.contains_key(list.id()) {
                        order.push(list.id().clone());
                    }
                    lists.insert(list.id().clone(), list);
                }
                Err(e) => {
                    log::warn!("Failed to parse task list at line {}: {}", line_no, e);
                }
            }
        }

        Ok(order.into_iter().filter_map(|id| lists.remove(&id)).collect())
    }

    /// Rewrite the log keeping only the latest snapshot of each list.
    ///
    /// Returns the number of lines dropped.
    pub fn compact(&mut self) -> Result<usize> {
        let lists_path = self.lists_path();
        let before = count_lines(&lists_path)?;
        let lists = self.read_lists()?;

        let tmp_path = lists_path.with_extension("jsonl.tmp");
        {
            let file = File::create(&tmp_path).context("Failed to create temporary lists file")?;
            let mut writer = BufWriter::new(file);
            for list in &lists {
                let json = serde_json::to_string(list).context("Failed to serialize task list")?;
                writeln!(writer, "{}", json).context("Failed to write temporary lists file")?;
            }
            let file = writer.into_inner().context("Failed to flush temporary lists file")?;
            file.sync_all().context("Failed to sync temporary lists file")?;
        }
        fs::rename(&tmp_path, &lists_path).context("Failed to replace lists.jsonl")?;

        let dropped = before.saturating_sub(lists.len());
        log::info!("Compacted lists.jsonl: {} lines dropped", dropped);
        Ok(dropped)
    }
}

impl TaskListSource for Storage {
    fn load_lists(&self) -> Result<Vec<TaskList>> {
        self.read_lists()
    }
}

impl TaskListSink for Storage {
    fn save_list(&mut self, list: &TaskList) -> Result<()> {
        self.append_list(list)
    }
}

fn count_lines(path: &Path) -> Result<usize> {
    if !path.exists() {
        return Ok(0);
    }
    let file = File::open(path).context("Failed to open file for line count")?;
    Ok(BufReader::new(file).lines().count())
}
