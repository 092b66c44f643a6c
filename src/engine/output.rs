use serde::Serialize;

/// The uniform result of one command. This is the only thing a front end sees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult {
    pub success: bool,
    pub message: String,
    pub counts_as_move: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_change: Option<i32>,
}

impl CommandResult {
    pub fn ok(message: impl Into<String>, counts_as_move: bool) -> Self {
        CommandResult {
            success: true,
            message: message.into(),
            counts_as_move,
            score_change: None,
        }
    }

    pub fn fail(message: impl Into<String>, counts_as_move: bool) -> Self {
        CommandResult {
            success: false,
            message: message.into(),
            counts_as_move,
            score_change: None,
        }
    }

    pub fn with_score(mut self, delta: i32) -> Self {
        self.score_change = if delta == 0 { None } else { Some(delta) };
        self
    }

    /// Score delta, zero when nothing was awarded.
    pub fn score_delta(&self) -> i32 {
        self.score_change.unwrap_or(0)
    }
}

/// What a successful handler hands back to the dispatcher.
#[derive(Debug, Default)]
pub(crate) struct Outcome {
    lines: Vec<String>,
    pub score: i32,
}

impl Outcome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn said(s: impl Into<String>) -> Self {
        let mut out = Self::new();
        out.say(s);
        out
    }

    pub fn say(&mut self, s: impl Into<String>) {
        let s = s.into();
        if !s.trim().is_empty() {
            self.lines.push(s);
        }
    }

    pub fn scored(&mut self, delta: i32) {
        self.score += delta;
    }

    pub fn message(&self) -> String {
        self.lines.join("\n")
    }
}
