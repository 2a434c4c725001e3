use crate::cli::Commands;
use crate::shell::run_shell;
use crate::utils::{print_rules, print_stats};
use std::process;
use std::sync::{Arc, Mutex};
use subtext_core::{ensure_config_dir, get_db_file_path, InjectionFlag, Result, RuleStore, SubtextError};
use subtext_daemon::start_keyboard_listener;

pub fn handle_command(command: Option<Commands>) -> Result<()> {
    match command {
        Some(command) => handle_subcommand(command),
        None => run_replacer(),
    }
}

fn handle_subcommand(command: Commands) -> Result<()> {
    match command {
        Commands::Add { trigger, text } => {
            let mut store = load_store()?;
            store.add(trigger.clone(), text.clone())?;
            println!("Added replacement: '{}' -> '{}'", trigger, text);
            Ok(())
        }
        Commands::Remove { trigger } => {
            let mut store = load_store()?;
            store.remove(&trigger)?;
            println!("Removed replacement for '{}'", trigger);
            Ok(())
        }
        Commands::List => {
            print_rules(&load_store()?);
            Ok(())
        }
        Commands::Stats => {
            print_stats(&load_store()?);
            Ok(())
        }
    }
}

fn load_store() -> Result<RuleStore> {
    ensure_config_dir()?;
    RuleStore::load(get_db_file_path())
}

/// The default mode: start the keyboard listener thread and hand the main
/// thread to the operator shell. Both sides share one store behind a mutex.
fn run_replacer() -> Result<()> {
    let store = Arc::new(Mutex::new(load_store()?));
    let running = Arc::new(Mutex::new(true));
    let injection = InjectionFlag::new();

    // Ctrl-C behaves like the `exit` command.
    {
        let running = Arc::clone(&running);
        ctrlc::set_handler(move || {
            *running.lock().unwrap() = false;
            println!("\nExiting...");
            process::exit(0);
        })
        .map_err(|e| {
            SubtextError::Other(format!("Failed to install interrupt handler: {}", e))
        })?;
    }

    let _listener = start_keyboard_listener(Arc::clone(&store), Arc::clone(&running), injection);

    run_shell(&store)?;

    // The listener callback goes quiet once the flag drops; the blocked
    // rdev hook itself is torn down with the process.
    *running.lock().unwrap() = false;
    println!("Exiting...");
    Ok(())
}
