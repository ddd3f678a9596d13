use onebigthing_core::Config;

use crate::context::{open_store, tracker, CliResult};

pub fn run(yes: bool, config: &Config) -> CliResult {
    if !yes {
        return Err("refusing to erase task data without --yes".into());
    }
    let mut tracker = tracker(open_store()?, config);
    tracker.reset()?;
    println!("all task data erased");
    Ok(())
}
