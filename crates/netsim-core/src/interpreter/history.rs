// ── Command history ──

/// Commands typed in one session, oldest first, with a recall cursor
/// for up/down navigation.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<String>,
    cursor: Option<usize>,
    /// 0 = unbounded.
    limit: usize,
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: None,
            limit,
        }
    }

    /// Record a command and reset the recall cursor.
    pub fn push(&mut self, line: &str) {
        self.entries.push(line.to_owned());
        if self.limit > 0 && self.entries.len() > self.limit {
            let excess = self.entries.len() - self.limit;
            self.entries.drain(..excess);
        }
        self.cursor = None;
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Step back in time. Sticks at the oldest entry.
    pub fn recall_older(&mut self) -> Option<&str> {
        let last = self.entries.len().checked_sub(1)?;
        let idx = match self.cursor {
            None => last,
            Some(i) => i.saturating_sub(1),
        };
        self.cursor = Some(idx);
        self.entries.get(idx).map(String::as_str)
    }

    /// Step forward. Past the newest entry the cursor leaves history and
    /// `None` means "empty input line".
    pub fn recall_newer(&mut self) -> Option<&str> {
        let next = self.cursor? + 1;
        if next < self.entries.len() {
            self.cursor = Some(next);
            self.entries.get(next).map(String::as_str)
        } else {
            self.cursor = None;
            None
        }
    }
}
