//! Presentation state shared between components

/// Pane that currently receives key input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Prompt,
    Result,
    Gallery,
    History,
}

impl Focus {
    pub fn all() -> [Focus; 4] {
        [Focus::Prompt, Focus::Result, Focus::Gallery, Focus::History]
    }

    pub fn name(&self) -> &str {
        match self {
            Focus::Prompt => "Prompt",
            Focus::Result => "Result",
            Focus::Gallery => "Gallery",
            Focus::History => "History",
        }
    }

    pub fn next(&self) -> Focus {
        let all = Self::all();
        let idx = all.iter().position(|f| f == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    pub fn previous(&self) -> Focus {
        let all = Self::all();
        let idx = all.iter().position(|f| f == self).unwrap_or(0);
        all[(idx + all.len() - 1) % all.len()]
    }
}
