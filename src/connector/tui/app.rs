use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::application::{ChatBackend, Completion, Conversation, PendingRequest, ScrollController};

/// Set by the conversation after each transcript change and consumed by the
/// renderer, which then jumps to the bottom of the transcript.
#[derive(Debug, Default)]
pub struct TranscriptScroll {
    follow: AtomicBool,
}

impl TranscriptScroll {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take_request(&self) -> bool {
        self.follow.swap(false, Ordering::SeqCst)
    }
}

impl ScrollController for TranscriptScroll {
    fn scroll_to_latest(&self) {
        self.follow.store(true, Ordering::SeqCst);
    }
}

/// Single-line editor. The cursor counts characters, not bytes.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputBuffer {
    text: String,
    cursor: usize,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.text.insert(at, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index(self.cursor);
            self.text.remove(at);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.char_count() {
            let at = self.byte_index(self.cursor);
            self.text.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }
}

/// State of the full-screen chat: the conversation plus everything that only
/// matters to the terminal (input line, scroll offset, animation).
pub struct ChatApp {
    conversation: Conversation,
    input: InputBuffer,
    scroll: Arc<TranscriptScroll>,
    offset: u16,
    page_height: u16,
    animation_frame: u8,
    should_quit: bool,
}

impl ChatApp {
    pub fn new(backend: ChatBackend) -> Self {
        let scroll = Arc::new(TranscriptScroll::new());
        let conversation = Conversation::new(backend).with_scroll_controller(scroll.clone());
        Self {
            conversation,
            input: InputBuffer::new(),
            scroll,
            offset: 0,
            page_height: 0,
            animation_frame: 0,
            should_quit: false,
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn input(&self) -> &InputBuffer {
        &self.input
    }

    pub fn offset(&self) -> u16 {
        self.offset
    }

    pub fn animation_frame(&self) -> u8 {
        self.animation_frame
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Apply a key press. Returns the request to run when the key submitted
    /// the input line.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<PendingRequest> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') | KeyCode::Char('d') if ctrl => self.should_quit = true,
            KeyCode::Enter => return self.submit_input(),
            KeyCode::Up => self.scroll_up(1),
            KeyCode::Down => self.scroll_down(1),
            KeyCode::PageUp => self.scroll_up(self.half_page()),
            KeyCode::PageDown => self.scroll_down(self.half_page()),
            _ if !self.conversation.is_available() => {}
            KeyCode::Char(c) if !ctrl => self.input.insert(c),
            KeyCode::Backspace => self.input.backspace(),
            KeyCode::Delete => self.input.delete(),
            KeyCode::Left => self.input.move_left(),
            KeyCode::Right => self.input.move_right(),
            KeyCode::Home => self.input.move_home(),
            KeyCode::End => self.input.move_end(),
            _ => {}
        }
        None
    }

    /// Hand the input line to the conversation. The line is cleared only when
    /// the submission is accepted.
    pub fn submit_input(&mut self) -> Option<PendingRequest> {
        let request = self.conversation.begin(self.input.text())?;
        self.input.clear();
        Some(request)
    }

    pub fn on_completion(&mut self, completion: Completion) {
        self.conversation.settle(completion);
    }

    /// Advance the "Thinking" animation.
    pub fn tick(&mut self) {
        if self.conversation.is_pending() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        } else {
            self.animation_frame = 0;
        }
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.offset = self.offset.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.offset = self.offset.saturating_add(lines);
    }

    /// Called by the renderer once the transcript height is known. Follows the
    /// newest entry when the conversation asked for it, else clamps the manual
    /// offset.
    pub(super) fn resolve_offset(&mut self, total_lines: u16, visible_lines: u16) -> u16 {
        self.page_height = visible_lines;
        let max_offset = total_lines.saturating_sub(visible_lines);
        self.offset = if self.scroll.take_request() {
            max_offset
        } else {
            self.offset.min(max_offset)
        };
        self.offset
    }

    fn half_page(&self) -> u16 {
        (self.page_height / 2).max(1)
    }
}
