use std::io::{self, BufRead, Write};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;

/// Source of interactive input
pub trait Prompt {
    /// Ask for a secret without echoing it
    fn password(&mut self, label: &str) -> io::Result<String>;

    /// Ask for a line of visible input
    fn line(&mut self, label: &str) -> io::Result<String>;
}

/// Prompts on the controlling terminal
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn password(&mut self, label: &str) -> io::Result<String> {
        print_label(label)?;
        let result = read_hidden();
        println!();
        result
    }

    fn line(&mut self, label: &str) -> io::Result<String> {
        print_label(label)?;
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "no input"));
        }
        Ok(line)
    }
}

fn print_label(label: &str) -> io::Result<()> {
    let mut stdout = io::stdout();
    write!(stdout, "{}", label)?;
    stdout.flush()
}

/// Keeps the terminal in raw mode until dropped
struct RawModeGuard;

impl RawModeGuard {
    fn acquire() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

#[derive(Debug, PartialEq, Eq)]
enum KeyAction {
    Continue,
    Submit,
    Cancel,
}

fn handle_key(input: &mut String, key: KeyEvent) -> KeyAction {
    if key.kind != KeyEventKind::Press {
        return KeyAction::Continue;
    }
    match key.code {
        KeyCode::Enter => KeyAction::Submit,
        KeyCode::Char('c') | KeyCode::Char('d')
            if key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            KeyAction::Cancel
        }
        KeyCode::Char(c)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            input.push(c);
            KeyAction::Continue
        }
        KeyCode::Backspace => {
            input.pop();
            KeyAction::Continue
        }
        _ => KeyAction::Continue,
    }
}

fn read_hidden() -> io::Result<String> {
    let _guard = RawModeGuard::acquire()?;
    let mut input = String::new();

    loop {
        if let Event::Key(key) = event::read()? {
            match handle_key(&mut input, key) {
                KeyAction::Submit => return Ok(input),
                KeyAction::Cancel => {
                    return Err(io::Error::new(io::ErrorKind::Interrupted, "input cancelled"))
                }
                KeyAction::Continue => {}
            }
        }
    }
}
