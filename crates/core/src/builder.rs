const INDENT_UNIT: &str = "    ";

/// Line-oriented SQL text builder with four-space indentation. Local to a
/// single generation pass; never shared.
#[derive(Debug)]
pub struct SqlBuilder {
    buffer: String,
    depth: usize,
    at_line_start: bool,
}

impl SqlBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            depth: 0,
            at_line_start: true,
        }
    }

    pub fn append(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if text.is_empty() {
            return;
        }
        if self.at_line_start {
            for _ in 0..self.depth {
                self.buffer.push_str(INDENT_UNIT);
            }
            self.at_line_start = false;
        }
        self.buffer.push_str(text);
    }

    pub fn append_line(&mut self, text: impl AsRef<str>) {
        self.append(text);
        self.newline();
    }

    pub fn newline(&mut self) {
        self.buffer.push('\n');
        self.at_line_start = true;
    }

    pub fn indent(&mut self) {
        self.depth += 1;
    }

    pub fn outdent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Returns the accumulated text and resets the builder for the next
    /// statement.
    pub fn take(&mut self) -> String {
        self.depth = 0;
        self.at_line_start = true;
        std::mem::take(&mut self.buffer)
    }
}

impl Default for SqlBuilder {
    fn default() -> Self {
        Self::new()
    }
}
