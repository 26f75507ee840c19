use std::error::Error;
use std::io::{self, BufRead, Write};

use clap::Subcommand;
use sifferlek_core::storage::FileMedium;
use sifferlek_core::ProgressStore;

#[derive(Subcommand)]
pub enum ProgressAction {
    /// Show the stored player progress as JSON
    Show,
    /// Show the most-missed facts, worst first
    Missed {
        /// Maximum number of facts to list
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Erase all stored progress
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(action: ProgressAction) -> Result<(), Box<dyn Error>> {
    let mut store = ProgressStore::new(FileMedium::open()?);

    match action {
        ProgressAction::Show => {
            let progress = store.load();
            println!("{}", serde_json::to_string_pretty(&progress)?);
        }
        ProgressAction::Missed { limit } => {
            let progress = store.load();
            let mut facts: Vec<(&String, &u32)> = progress.missed_facts.iter().collect();
            facts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
            if facts.is_empty() {
                println!("Inga missade tal ännu.");
                return Ok(());
            }
            for (fact, count) in facts.into_iter().take(limit) {
                println!("{count:>4}  {fact}");
            }
        }
        ProgressAction::Reset { yes } => {
            if !yes {
                print!("Radera all sparad progression? (j/n) ");
                io::stdout().flush()?;
                let mut line = String::new();
                io::stdin().lock().read_line(&mut line)?;
                if !matches!(line.trim().to_lowercase().as_str(), "j" | "ja") {
                    println!("Avbrutet.");
                    return Ok(());
                }
            }
            store.clear();
            println!("Progression raderad.");
        }
    }
    Ok(())
}
