use crate::utils::{print_rules, print_stats};
use std::io::{self, BufRead, Write};
use std::sync::{Arc, Mutex};
use subtext_core::{Result, RuleStore, SubtextError};

/// Run the operator shell until `exit`, EOF, or an unrecoverable stdin error.
/// The listener thread keeps firing replacements the whole time; the shared
/// store lock keeps the two sides consistent.
pub fn run_shell(store: &Arc<Mutex<RuleStore>>) -> Result<()> {
    print_banner();

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            // EOF behaves like `exit`
            break;
        }
        if !dispatch(&line, store) {
            break;
        }
    }

    Ok(())
}

fn print_banner() {
    println!("subtext started!");
    println!("Commands:");
    println!("  add <trigger> <replacement> - Add a new replacement rule");
    println!("  remove <trigger> - Remove a replacement rule");
    println!("  list - List all replacement rules");
    println!("  stats - Show usage statistics");
    println!("  exit - Exit the program");
}

/// Handle one command line. Returns false when the shell should stop.
fn dispatch(line: &str, store: &Arc<Mutex<RuleStore>>) -> bool {
    let parts = split_command(line);
    if parts.is_empty() {
        return true;
    }

    match parts[0] {
        "exit" => return false,
        "list" => print_rules(&store.lock().unwrap()),
        "stats" => print_stats(&store.lock().unwrap()),
        "add" if parts.len() == 3 => {
            let (trigger, text) = (parts[1], parts[2]);
            match store
                .lock()
                .unwrap()
                .add(trigger.to_string(), text.to_string())
            {
                Ok(()) => println!("Added replacement: '{}' -> '{}'", trigger, text),
                Err(e) => println!("Error: {}", e),
            }
        }
        "remove" if parts.len() == 2 => {
            let trigger = parts[1];
            match store.lock().unwrap().remove(trigger) {
                Ok(()) => println!("Removed replacement for '{}'", trigger),
                Err(SubtextError::RuleNotFound(t)) => {
                    println!("No replacement found for '{}'", t)
                }
                Err(e) => println!("Error: {}", e),
            }
        }
        _ => println!("Invalid command!"),
    }

    true
}

/// Split a command line with at most two splits, so the third token keeps its
/// internal whitespace: `add sig Best regards` -> ["add", "sig", "Best regards"].
fn split_command(line: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut rest = line.trim();

    for _ in 0..2 {
        if rest.is_empty() {
            return parts;
        }
        match rest.find(char::is_whitespace) {
            Some(idx) => {
                parts.push(&rest[..idx]);
                rest = rest[idx..].trim_start();
            }
            None => {
                parts.push(rest);
                return parts;
            }
        }
    }

    if !rest.is_empty() {
        parts.push(rest);
    }
    parts
}
