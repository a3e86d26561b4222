//! The input field's single editable line.

/// Text typed into the input field, with a cursor.
///
/// The cursor is stored as a byte offset that always sits on a char
/// boundary, so Vietnamese diacritics and emoji edit as whole characters.
#[derive(Debug, Clone, Default)]
pub struct TextInputState {
    content: String,
    at: usize,
}

impl TextInputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Number of characters before the cursor.
    pub fn cursor(&self) -> usize {
        self.content[..self.at].chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Hand over the typed text and start again from an empty line.
    pub fn take(&mut self) -> String {
        self.at = 0;
        std::mem::take(&mut self.content)
    }

    /// Type one character. Line breaks are dropped.
    pub fn insert(&mut self, ch: char) {
        if matches!(ch, '\n' | '\r') {
            return;
        }
        self.content.insert(self.at, ch);
        self.at += ch.len_utf8();
    }

    /// Insert pasted text at the cursor with its line breaks flattened to
    /// spaces.
    pub fn insert_str(&mut self, pasted: &str) {
        let flat: String = pasted
            .chars()
            .filter(|&ch| ch != '\r')
            .map(|ch| if ch == '\n' { ' ' } else { ch })
            .collect();
        self.content.insert_str(self.at, &flat);
        self.at += flat.len();
    }

    pub fn backspace(&mut self) {
        if let Some(ch) = self.before_cursor() {
            self.at -= ch.len_utf8();
            self.content.remove(self.at);
        }
    }

    pub fn delete(&mut self) {
        if self.after_cursor().is_some() {
            self.content.remove(self.at);
        }
    }

    pub fn move_left(&mut self) {
        if let Some(ch) = self.before_cursor() {
            self.at -= ch.len_utf8();
        }
    }

    pub fn move_right(&mut self) {
        if let Some(ch) = self.after_cursor() {
            self.at += ch.len_utf8();
        }
    }

    pub fn move_home(&mut self) {
        self.at = 0;
    }

    pub fn move_end(&mut self) {
        self.at = self.content.len();
    }

    fn before_cursor(&self) -> Option<char> {
        self.content[..self.at].chars().next_back()
    }

    fn after_cursor(&self) -> Option<char> {
        self.content[self.at..].chars().next()
    }
}
