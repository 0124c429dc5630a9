//! Asking the user things
//!
//! Prompts are request/response: the workflow awaits the answer, and the
//! answer is either a selection or an explicit [`Choice::Cancelled`].

use async_trait::async_trait;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

/// The user's answer to a pick prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice<T> {
    Selected(T),
    Cancelled,
}

impl<T> Choice<T> {
    pub fn selected(self) -> Option<T> {
        match self {
            Choice::Selected(value) => Some(value),
            Choice::Cancelled => None,
        }
    }
}

/// One labeled option in a pick list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickItem<T> {
    pub label: String,
    pub value: T,
}

impl<T> PickItem<T> {
    pub fn new(label: impl Into<String>, value: T) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

impl PickItem<String> {
    /// An option whose label is its value
    pub fn plain(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
        }
    }
}

/// Presents choices and confirmations to the user
#[async_trait]
pub trait UserPromptProvider: Send + Sync {
    /// Show `labels` in order; resolve to the index picked, or cancelled
    async fn pick_one(&self, prompt: &str, labels: &[String]) -> Choice<usize>;

    /// Ask a yes/no question; `false` covers both "no" and dismissal
    async fn confirm(&self, title: &str, message: &str) -> bool;
}

/// Pick a value from labeled options.
///
/// An index outside the list counts as a cancellation.
pub async fn pick<T>(
    provider: &dyn UserPromptProvider,
    prompt: &str,
    items: Vec<PickItem<T>>,
) -> Choice<T> {
    let labels: Vec<String> = items.iter().map(|item| item.label.clone()).collect();

    match provider.pick_one(prompt, &labels).await {
        Choice::Selected(index) => items
            .into_iter()
            .nth(index)
            .map_or(Choice::Cancelled, |item| Choice::Selected(item.value)),
        Choice::Cancelled => Choice::Cancelled,
    }
}

/// [`UserPromptProvider`] that reads answers line by line from a terminal
pub struct TerminalPrompt<R = BufReader<Stdin>> {
    lines: Mutex<Lines<R>>,
}

impl TerminalPrompt {
    /// Prompt on stdout, answer on stdin
    pub fn stdin() -> Self {
        Self::from_reader(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin> TerminalPrompt<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            lines: Mutex::new(reader.lines()),
        }
    }

    /// Next answer line, or `None` at end of input
    async fn read_answer(&self) -> Option<String> {
        let mut lines = self.lines.lock().await;
        match lines.next_line().await {
            Ok(Some(line)) => Some(line.trim().to_string()),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Failed to read answer: {}", e);
                None
            }
        }
    }
}

fn show(text: &str) {
    let mut stdout = std::io::stdout();
    // A closed stdout just means nobody sees the question
    let _ = write!(stdout, "{}", text);
    let _ = stdout.flush();
}

/// Turn a typed answer into a pick: a 1-based number or an exact label
pub fn parse_pick(answer: &str, labels: &[String]) -> Choice<usize> {
    let answer = answer.trim();

    if let Ok(number) = answer.parse::<usize>() {
        if (1..=labels.len()).contains(&number) {
            return Choice::Selected(number - 1);
        }
        return Choice::Cancelled;
    }

    labels
        .iter()
        .position(|label| label == answer)
        .map_or(Choice::Cancelled, Choice::Selected)
}

/// `y` or `yes`, any case
pub fn parse_confirm(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[async_trait]
impl<R> UserPromptProvider for TerminalPrompt<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn pick_one(&self, prompt: &str, labels: &[String]) -> Choice<usize> {
        let mut text = format!("{}\n", prompt);
        for (i, label) in labels.iter().enumerate() {
            text.push_str(&format!("  {}) {}\n", i + 1, label));
        }
        text.push_str("Choice (empty to cancel): ");
        show(&text);

        match self.read_answer().await {
            Some(answer) => parse_pick(&answer, labels),
            None => Choice::Cancelled,
        }
    }

    async fn confirm(&self, title: &str, message: &str) -> bool {
        show(&format!("{}\n{}\nProceed? [y/N] ", title, message));

        self.read_answer()
            .await
            .map(|answer| parse_confirm(&answer))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    struct Scripted(Choice<usize>);

    #[async_trait]
    impl UserPromptProvider for Scripted {
        async fn pick_one(&self, _prompt: &str, _labels: &[String]) -> Choice<usize> {
            self.0
        }

        async fn confirm(&self, _title: &str, _message: &str) -> bool {
            true
        }
    }

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_pick() {
        let options = labels(&["origin", "upstream"]);
        assert_eq!(parse_pick("1", &options), Choice::Selected(0));
        assert_eq!(parse_pick(" 2 ", &options), Choice::Selected(1));
        assert_eq!(parse_pick("upstream", &options), Choice::Selected(1));
        assert_eq!(parse_pick("0", &options), Choice::Cancelled);
        assert_eq!(parse_pick("3", &options), Choice::Cancelled);
        assert_eq!(parse_pick("", &options), Choice::Cancelled);
    }

    #[test]
    fn test_parse_confirm() {
        assert!(parse_confirm("y"));
        assert!(parse_confirm("YES"));
        assert!(!parse_confirm(""));
        assert!(!parse_confirm("no"));
    }

    #[tokio::test]
    async fn test_pick_maps_index_to_value() {
        let items = vec![PickItem::new("first", 10), PickItem::new("second", 20)];
        let choice = pick(&Scripted(Choice::Selected(1)), "?", items).await;
        assert_eq!(choice, Choice::Selected(20));
    }

    #[tokio::test]
    async fn test_pick_out_of_range_is_cancelled() {
        let items = vec![PickItem::plain("origin")];
        let choice = pick(&Scripted(Choice::Selected(5)), "?", items).await;
        assert_eq!(choice, Choice::Cancelled);
    }

    #[tokio::test]
    async fn test_terminal_prompt_reads_answers_in_order() {
        let prompt = TerminalPrompt::from_reader(Cursor::new(b"2\ny\n".to_vec()));
        let options = labels(&["origin", "upstream"]);

        assert_eq!(prompt.pick_one("Remote?", &options).await, Choice::Selected(1));
        assert!(prompt.confirm("Publish", "Push it?").await);
        // Input exhausted
        assert!(!prompt.confirm("Again", "Push it?").await);
        assert_eq!(prompt.pick_one("Remote?", &options).await, Choice::Cancelled);
    }
}
