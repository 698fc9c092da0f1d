use std::borrow::Cow;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use crossterm::style::Stylize;
use reedline::{
    default_emacs_keybindings, ColumnarMenu, DefaultCompleter, Emacs, FileBackedHistory, KeyCode, KeyModifiers, MenuBuilder, Prompt,
    PromptEditMode, PromptHistorySearch, Reedline, ReedlineEvent, ReedlineMenu, Signal, ValidationResult, Validator,
};
use tracing::{info, warn};

use crate::interpreter::value::Value;
use crate::interpreter::Interpreter;
use crate::reader::{lexer, parser};

const BANNER: &str = "Cumunisp Version 0.0.0.0.1";
const HISTORY_SIZE: usize = 1_000;
const HISTORY_FILE: &str = ".cumunisp_history";
const COMPLETION_MENU: &str = "completion_menu";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Text,
    Json,
}

pub fn render(value: &Value, output: Output) -> Result<String, serde_json::Error> {
    match output {
        Output::Text => Ok(value.to_string()),
        Output::Json => serde_json::to_string(value),
    }
}

/// Evaluates each expression in order in one session, printing every result.
pub fn run_batch(exprs: &[String], output: Output) -> Result<ExitCode, Box<dyn Error>> {
    let mut interp = Interpreter::new();
    let mut code = ExitCode::SUCCESS;
    for expr in exprs {
        match interp.execute(expr) {
            Ok(value) => println!("{}", render(&value, output)?),
            Err(e) => {
                eprintln!("{}", e);
                code = ExitCode::FAILURE;
            }
        }
    }
    Ok(code)
}

struct ReplPrompt;

impl Prompt for ReplPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> { Cow::Borrowed("cumunisp") }

    fn render_prompt_right(&self) -> Cow<'_, str> { Cow::Borrowed("") }

    fn render_prompt_indicator(&self, _prompt_mode: PromptEditMode) -> Cow<'_, str> { Cow::Borrowed("> ") }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> { Cow::Borrowed("... ") }

    fn render_prompt_history_search_indicator(&self, _history_search: PromptHistorySearch) -> Cow<'_, str> { Cow::Borrowed("(search) ") }
}

/// Keeps reading lines while a `(` or `{` is left open.
struct BalancedValidator;

impl Validator for BalancedValidator {
    fn validate(&self, line: &str) -> ValidationResult {
        match lexer::tokenize(line) {
            Ok(tokens) if parser::open_depth(&tokens) > 0 => ValidationResult::Incomplete,
            _ => ValidationResult::Complete,
        }
    }
}

fn history_path(configured: Option<PathBuf>) -> Option<PathBuf> {
    configured.or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(HISTORY_FILE)))
}

fn create_editor(interp: &Interpreter, history: Option<PathBuf>) -> Reedline {
    let words = interp.env().names().map(String::from).collect();
    let completer = Box::new(DefaultCompleter::new_with_wordlen(words, 1));
    let menu = Box::new(ColumnarMenu::default().with_name(COMPLETION_MENU));

    let mut keybindings = default_emacs_keybindings();
    keybindings.add_binding(
        KeyModifiers::NONE,
        KeyCode::Tab,
        ReedlineEvent::UntilFound(vec![ReedlineEvent::Menu(COMPLETION_MENU.to_string()), ReedlineEvent::MenuNext]),
    );

    let editor = Reedline::create()
        .with_validator(Box::new(BalancedValidator))
        .with_completer(completer)
        .with_menu(ReedlineMenu::EngineCompleter(menu))
        .with_edit_mode(Box::new(Emacs::new(keybindings)));

    let path = match history_path(history) {
        Some(path) => path,
        None => return editor,
    };
    match FileBackedHistory::with_file(HISTORY_SIZE, path.clone()) {
        Ok(history) => editor.with_history(Box::new(history)),
        Err(e) => {
            warn!("history disabled, cannot open {}: {}", path.display(), e);
            editor
        }
    }
}

fn print_env(interp: &Interpreter) {
    if interp.env().is_empty() {
        println!("(no bindings)");
    }
    for (name, value) in interp.env().iter() {
        println!("{} = {}", name, value);
    }
}

fn print_result(value: &Value, output: Output) -> Result<(), serde_json::Error> {
    let text = render(value, output)?;
    match value {
        Value::Error(_) => println!("{}", text.red()),
        _ => println!("{}", text),
    }
    Ok(())
}

pub fn run(history: Option<PathBuf>, output: Output) -> Result<ExitCode, Box<dyn Error>> {
    let mut interp = Interpreter::new();
    let mut editor = create_editor(&interp, history);

    println!("{}", BANNER);
    println!("Press Ctrl+c to Exit\n");

    loop {
        match editor.read_line(&ReplPrompt)? {
            Signal::Success(line) => {
                let line = line.trim();
                match line {
                    "" => continue,
                    ":q" | ":quit" => break,
                    ":env" => print_env(&interp),
                    _ => match interp.execute(line) {
                        Ok(value) => print_result(&value, output)?,
                        Err(e) => eprintln!("{}", e.to_string().red()),
                    },
                }
            }
            Signal::CtrlC | Signal::CtrlD => break,
        }
    }

    info!("session ended with {} binding(s)", interp.env().len());
    Ok(ExitCode::SUCCESS)
}
