use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

/// One row in the picker pane.
#[derive(Clone, Debug)]
pub struct PickerItem {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    pub size: u64,
}

/// The manual file-selection path: a small directory browser standing in
/// for the form's file input. Enter on a regular file hands the path to
/// the form, the same event a drop produces.
pub struct FilePicker {
    pub current_dir: PathBuf,
    pub items: Vec<PickerItem>,
    pub selected_index: usize,
    pub show_hidden: bool,
}

impl FilePicker {
    pub fn new() -> Result<Self> {
        let current_dir = std::env::current_dir()?;
        let mut picker = Self {
            current_dir,
            items: Vec::new(),
            selected_index: 0,
            show_hidden: false,
        };
        picker.refresh()?;
        Ok(picker)
    }

    pub fn refresh(&mut self) -> Result<()> {
        self.items = self.read_directory(&self.current_dir)?;
        self.items.sort_by(|a, b| match (a.is_dir, b.is_dir) {
            (true, false) => std::cmp::Ordering::Less,
            (false, true) => std::cmp::Ordering::Greater,
            _ => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        });
        self.selected_index = self.selected_index.min(self.items.len().saturating_sub(1));
        Ok(())
    }

    fn read_directory(&self, path: &Path) -> Result<Vec<PickerItem>> {
        let mut items = Vec::new();

        if let Some(parent) = path.parent() {
            items.push(PickerItem {
                name: "..".to_string(),
                path: parent.to_path_buf(),
                is_dir: true,
                size: 0,
            });
        }

        for entry in fs::read_dir(path)? {
            let entry = entry?;
            let metadata = entry.metadata()?;
            let name = entry.file_name().to_string_lossy().to_string();

            if !self.show_hidden && name.starts_with('.') {
                continue;
            }

            items.push(PickerItem {
                name,
                path: entry.path(),
                is_dir: metadata.is_dir(),
                size: metadata.len(),
            });
        }

        Ok(items)
    }

    /// Enter on the selected item: descend into directories, return the
    /// path for regular files.
    pub fn enter_selected(&mut self) -> Result<Option<PathBuf>> {
        let Some(item) = self.items.get(self.selected_index) else {
            return Ok(None);
        };
        if item.is_dir {
            self.current_dir = item.path.clone();
            self.selected_index = 0;
            self.refresh()?;
            Ok(None)
        } else {
            Ok(Some(item.path.clone()))
        }
    }

    pub fn go_to_parent(&mut self) -> Result<()> {
        if let Some(parent) = self.current_dir.parent() {
            self.current_dir = parent.to_path_buf();
            self.selected_index = 0;
            self.refresh()?;
        }
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                if self.selected_index > 0 {
                    self.selected_index -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected_index + 1 < self.items.len() {
                    self.selected_index += 1;
                }
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.go_to_parent()?;
            }
            KeyCode::Char('.') => {
                self.show_hidden = !self.show_hidden;
                self.refresh()?;
            }
            _ => {}
        }
        Ok(())
    }

    pub fn format_size(size: u64) -> String {
        if size >= 1_048_576 {
            format!("{:.1}M", size as f64 / 1_048_576.0)
        } else if size >= 1024 {
            format!("{:.0}K", size as f64 / 1024.0)
        } else {
            format!("{size}B")
        }
    }
}
