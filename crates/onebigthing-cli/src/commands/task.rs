use chrono::{DateTime, FixedOffset};
use clap::Subcommand;
use onebigthing_core::Config;

use crate::context::{open_store, print_json, tracker, CliResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Set today's one big thing
    Set {
        /// What you want to get done today
        text: String,
    },
    /// Show today's task
    Show,
    /// Mark today's task as done
    Done,
    /// Mark today's task as not done
    Undo,
}

pub fn run(action: TaskAction, config: &Config, now: DateTime<FixedOffset>) -> CliResult {
    let mut tracker = tracker(open_store()?, config);

    match action {
        TaskAction::Set { text } => {
            let task = tracker.set_task(&text, now)?;
            print_json(&task)?;
        }
        TaskAction::Show => match tracker.current_task(now)? {
            Some(task) => print_json(&task)?,
            None => {
                eprintln!("no task set for {}", now.date_naive());
                println!("null");
            }
        },
        TaskAction::Done => {
            let update = tracker.complete_task(true, now)?;
            print_json(&update)?;
        }
        TaskAction::Undo => {
            let update = tracker.complete_task(false, now)?;
            print_json(&update)?;
        }
    }
    Ok(())
}
