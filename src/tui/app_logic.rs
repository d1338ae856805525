use super::app_state::{AppMode, InputLine};
use crate::config::Config;
use crate::tree_model::{EntryId, FileTree, VisibleRow};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, warn};

pub struct TuiApp {
    pub(super) tree: FileTree,
    pub(super) config: Config,
    /// Entry under the cursor; kept as an id so folding does not move it
    pub(super) current: Option<EntryId>,
    pub(super) scroll_offset: usize,
    pub(super) quit: bool,
    pub(super) confirmed: bool,
    pub(super) mode: AppMode,
    pub(super) input: InputLine,
    pub(super) status: String,
    pub(super) list_viewport_height: usize,
}

impl TuiApp {
    pub fn new(tree: FileTree, config: Config) -> Self {
        let current = tree.root();
        TuiApp {
            tree,
            config,
            current,
            scroll_offset: 0,
            quit: false,
            confirmed: false,
            mode: AppMode::Normal,
            input: InputLine::default(),
            status: "Ready".to_string(),
            list_viewport_height: 0, // Will be updated by ui_renderer
        }
    }

    pub fn into_parts(self) -> (FileTree, Config) {
        (self.tree, self.config)
    }

    pub(super) fn rows(&self) -> Vec<VisibleRow> {
        self.tree.visible_rows()
    }

    fn current_position(&self, rows: &[VisibleRow]) -> Option<usize> {
        let current = self.current?;
        rows.iter().position(|row| row.id == current)
    }

    pub(super) fn move_selection(&mut self, delta: i32) {
        let rows = self.rows();
        if rows.is_empty() {
            return;
        }
        let new_pos = match self.current_position(&rows) {
            Some(pos) => (pos as i32 + delta).rem_euclid(rows.len() as i32) as usize,
            None if delta > 0 => 0,
            None => rows.len() - 1,
        };
        self.current = Some(rows[new_pos].id);
        self.ensure_selection_is_visible_in_viewport();
    }

    pub(super) fn toggle_current_check(&mut self) {
        if let Some(id) = self.current {
            self.tree.toggle_checked(id);
        }
    }

    /// Check or uncheck the current entry together with its known subtree,
    /// following the current entry's new state.
    pub(super) fn toggle_current_recursive(&mut self) {
        if let Some(id) = self.current {
            let checked = !self.tree.entry(id).check.is_checked();
            self.tree.set_checked_recursive(id, checked);
        }
    }

    pub(super) fn toggle_current_expansion(&mut self) {
        let Some(id) = self.current else {
            return;
        };
        let options = self.config.list_options();
        let before = self.tree.len();
        self.tree.toggle_open(id, &options, self.config.lazy_mode);
        if self.tree.len() != before {
            debug!("Loaded {} new entries", self.tree.len() - before);
        }
        self.ensure_selection_is_visible_in_viewport();
    }

    pub(super) fn select_all(&mut self) {
        self.tree.select_all();
        self.status = "Selected all loaded items".to_string();
    }

    pub(super) fn deselect_all(&mut self) {
        self.tree.deselect_all();
        self.status = "Deselected all items".to_string();
    }

    /// Rebuild the tree from disk with the current options. Selection is
    /// dropped along with the old tree.
    pub(super) fn reload(&mut self) {
        let Some(root) = self.tree.root() else {
            return;
        };
        let root_path = self.tree.full_path(root);
        match FileTree::open_root(&root_path, &self.config.list_options(), self.config.lazy_mode)
        {
            Ok(tree) => {
                self.current = tree.root();
                self.tree = tree;
                self.scroll_offset = 0;
            }
            Err(e) => {
                warn!("Reload of {} failed: {}", root_path.display(), e);
                self.status = format!("Error: {}", e);
            }
        }
    }

    pub(super) fn toggle_hidden(&mut self) {
        self.config.hide_hidden = !self.config.hide_hidden;
        self.reload();
        self.status = if self.config.hide_hidden {
            "Hiding hidden files".to_string()
        } else {
            "Showing hidden files".to_string()
        };
    }

    fn apply_filter_input(&mut self) {
        let pattern = self.input.text.clone();
        match self.config.set_extension_filter(&pattern) {
            Ok(()) => {
                self.reload();
                self.status = if pattern.trim().is_empty() {
                    "Extension filter cleared".to_string()
                } else {
                    format!("Extension filter set to {}", pattern.trim())
                };
            }
            Err(e) => self.status = e.to_string(),
        }
    }

    fn apply_max_size_input(&mut self) {
        let parsed = self.input.text.trim().parse::<u64>();
        match parsed {
            Ok(kib) => match self.config.set_max_file_size(kib.saturating_mul(1024)) {
                Ok(()) => self.status = format!("Maximum file size set to {}KB", kib),
                Err(e) => self.status = e.to_string(),
            },
            Err(_) => self.status = format!("Not a number: {}", self.input.text.trim()),
        }
    }

    pub(super) fn ensure_selection_is_visible_in_viewport(&mut self) {
        let rows = self.rows();
        if rows.is_empty() {
            self.scroll_offset = 0;
            return;
        }

        // A folded ancestor hides the current entry: move up to the nearest
        // visible ancestor.
        let mut pos = self.current_position(&rows);
        let mut candidate = self.current;
        while pos.is_none() {
            candidate = candidate.and_then(|id| self.tree.entry(id).parent);
            match candidate {
                Some(id) => pos = rows.iter().position(|row| row.id == id),
                None => break,
            }
        }
        let pos = pos.unwrap_or(0);
        self.current = Some(rows[pos].id);

        if self.list_viewport_height == 0 {
            return;
        }
        let list_height = self.list_viewport_height;
        if pos < self.scroll_offset {
            self.scroll_offset = pos;
        } else if pos >= self.scroll_offset + list_height {
            self.scroll_offset = pos + 1 - list_height;
        }
        if rows.len() <= list_height {
            self.scroll_offset = 0;
        } else {
            self.scroll_offset = self.scroll_offset.min(rows.len() - list_height);
        }
    }

    // --- Event handling sub-methods ---
    pub(super) fn handle_normal_mode_input(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Char('y') => {
                self.confirmed = true;
                self.quit = true;
            }
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Char(' ') => self.toggle_current_check(),
            KeyCode::Char('r') => self.toggle_current_recursive(),
            KeyCode::Char('o') | KeyCode::Tab | KeyCode::Enter => self.toggle_current_expansion(),
            KeyCode::Char('a') => {
                if key_event.modifiers.is_empty() || key_event.modifiers == KeyModifiers::CONTROL {
                    self.select_all();
                }
            }
            KeyCode::Char('d') => {
                if key_event.modifiers.is_empty() || key_event.modifiers == KeyModifiers::CONTROL {
                    self.deselect_all();
                }
            }
            KeyCode::Char('h') => self.toggle_hidden(),
            KeyCode::Char('/') => {
                self.input = InputLine::with_text(self.config.filter_pattern());
                self.mode = AppMode::EditingFilter;
            }
            KeyCode::Char('m') => {
                self.input = InputLine::with_text(&(self.config.max_file_size / 1024).to_string());
                self.mode = AppMode::EditingMaxSize;
            }
            _ => {}
        }
    }

    pub(super) fn handle_editing_mode_input(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Enter => {
                match self.mode {
                    AppMode::EditingFilter => self.apply_filter_input(),
                    AppMode::EditingMaxSize => self.apply_max_size_input(),
                    AppMode::Normal => {}
                }
                self.mode = AppMode::Normal;
            }
            KeyCode::Esc => self.mode = AppMode::Normal,
            KeyCode::Char(c) => self.input.insert(c),
            KeyCode::Backspace => self.input.backspace(),
            KeyCode::Left => self.input.left(),
            KeyCode::Right => self.input.right(),
            _ => {}
        }
    }
}
