use colored::*;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::cli::{OutputFormat, OutputFormatter};
use crate::engine::Engine;

const PATH_PROMPT: &str = "Enter the path to your CSV file: ";
const EXIT_COMMANDS: [&str; 3] = ["exit", "quit", "q"];

/// What the read loop should do after a line was handled
#[derive(Debug, Clone, PartialEq)]
pub enum ReplAction {
    /// Leave the loop
    Exit,
    /// Nothing to do, prompt again
    Empty,
    /// Rendered query result
    Output(String),
    /// Rendered error message; the loop continues
    Error(String),
}

/// Check whether a line ends the interactive session
pub fn is_exit_command(line: &str) -> bool {
    let line = line.trim();
    EXIT_COMMANDS.iter().any(|command| line.eq_ignore_ascii_case(command))
}

/// Interactive query session over one engine
pub struct ReplSession {
    engine: Engine,
    format: OutputFormat,
}

impl ReplSession {
    pub fn new(engine: Engine, format: OutputFormat) -> Self {
        Self { engine, format }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Handle one input line; query text is passed to the engine unmodified
    pub fn handle_line(&self, line: &str) -> ReplAction {
        if line.trim().is_empty() {
            return ReplAction::Empty;
        }
        if is_exit_command(line) {
            return ReplAction::Exit;
        }

        match self.engine.execute_query(line) {
            Ok(result) => ReplAction::Output(OutputFormatter::format_result(&result, self.format)),
            Err(e) => ReplAction::Error(OutputFormatter::format_error(&e)),
        }
    }

    /// Load a dataset, returning the message to show the user
    pub async fn load_dataset(&mut self, path: &Path) -> Result<String, String> {
        match self.engine.load(path).await {
            Ok(summary) => Ok(OutputFormatter::format_success(&summary.to_string())),
            Err(e) => Err(OutputFormatter::format_error(&e)),
        }
    }

    /// Run the interactive loop until the user exits
    pub async fn run(&mut self, initial_file: Option<PathBuf>) -> anyhow::Result<()> {
        let mut rl = DefaultEditor::new()?;
        let history_file = self.engine.config().repl.history_file.clone();
        if let Some(ref path) = history_file {
            if rl.load_history(path).is_err() {
                debug!("no history loaded from {}", path.display());
            }
        }

        println!("{}", "Welcome to minisql".bold());

        let mut loaded = match initial_file {
            Some(path) => self.report_load(&path).await,
            None => false,
        };

        while !loaded {
            match rl.readline(PATH_PROMPT) {
                Ok(input) => {
                    let input = input.trim();
                    if input.is_empty() {
                        println!("Please provide a valid file path.");
                        continue;
                    }
                    loaded = self.report_load(Path::new(input)).await;
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    println!("\nExiting...");
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            }
        }

        println!("Ready for queries. Type your SQL or 'exit' to quit.");

        let prompt = self.engine.config().repl.prompt.clone();
        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = rl.add_history_entry(line.as_str());
                    }

                    match self.handle_line(&line) {
                        ReplAction::Exit => {
                            println!("Thank you for using minisql!");
                            break;
                        }
                        ReplAction::Empty => {}
                        ReplAction::Output(output) => println!("{}", output),
                        ReplAction::Error(message) => eprintln!("{}", message),
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    println!("\nExiting...");
                    break;
                }
                Err(e) => {
                    Self::save_history(&mut rl, history_file.as_deref());
                    return Err(e.into());
                }
            }
        }

        Self::save_history(&mut rl, history_file.as_deref());
        Ok(())
    }

    async fn report_load(&mut self, path: &Path) -> bool {
        match self.load_dataset(path).await {
            Ok(message) => {
                println!("{}", message);
                true
            }
            Err(message) => {
                eprintln!("{}", message);
                false
            }
        }
    }

    fn save_history(rl: &mut DefaultEditor, path: Option<&Path>) {
        if let Some(path) = path {
            if let Err(e) = rl.save_history(path) {
                debug!("failed to save history to {}: {}", path.display(), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::types::Dataset;

    fn session() -> ReplSession {
        let mut engine = Engine::default();
        engine.set_dataset(Dataset::new(
            "USERS",
            vec!["id", "name"],
            vec![vec!["1", "Al"], vec!["2", "Bo"]],
        ));
        ReplSession::new(engine, OutputFormat::Plain)
    }

    #[test]
    fn test_exit_commands() {
        assert!(is_exit_command("exit"));
        assert!(is_exit_command("  QUIT "));
        assert!(is_exit_command("Q"));
        assert!(!is_exit_command("SELECT * FROM q"));
    }

    #[test]
    fn test_handle_line() {
        let session = session();

        assert_eq!(session.handle_line("   "), ReplAction::Empty);
        assert_eq!(session.handle_line("exit"), ReplAction::Exit);
        assert_eq!(
            session.handle_line("SELECT name FROM USERS WHERE id = 2"),
            ReplAction::Output("name\n----\nBo".to_string())
        );
        assert_eq!(
            session.handle_line("SELECT COUNT(*) FROM USERS"),
            ReplAction::Output("COUNT(*): 2".to_string())
        );
    }

    #[test]
    fn test_handle_line_reports_errors_and_continues() {
        let session = session();

        match session.handle_line("SELECT age FROM USERS") {
            ReplAction::Error(message) => assert!(message.contains("Column 'age' not found")),
            other => panic!("Expected error, got {:?}", other),
        }
        assert!(matches!(session.handle_line("SELECT * FROM USERS"), ReplAction::Output(_)));
    }

    #[test]
    fn test_handle_line_without_dataset() {
        let session = ReplSession::new(Engine::default(), OutputFormat::Plain);

        match session.handle_line("SELECT * FROM T") {
            ReplAction::Error(message) => assert!(message.contains("No data loaded")),
            other => panic!("Expected error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_load_dataset_missing_file() {
        let mut session = ReplSession::new(Engine::default(), OutputFormat::Plain);

        let message = session.load_dataset(Path::new("/nonexistent/file.csv")).await.unwrap_err();
        assert!(message.contains("File not found"));
        assert!(session.engine().dataset().is_none());
    }
}
