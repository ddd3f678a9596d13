use clap::Subcommand;
use onebigthing_core::{Config, UpgradeOutcome};

use crate::context::{manager, open_store, print_json, runtime, CliResult};

#[derive(Subcommand)]
pub enum SubscriptionAction {
    /// Show the current tier
    Status,
    /// Purchase the premium package
    Upgrade,
    /// Re-read entitlements from the source
    Refresh,
    /// Drop back to the free tier and revoke local entitlements
    Reset,
}

pub fn run(action: SubscriptionAction, config: &Config) -> CliResult {
    let manager = manager(open_store()?, config);
    let rt = runtime()?;

    match action {
        SubscriptionAction::Status => {
            rt.block_on(manager.initialize());
            print_json(&manager.state())?;
        }
        SubscriptionAction::Upgrade => {
            rt.block_on(manager.initialize());
            match rt.block_on(manager.upgrade_to_premium())? {
                UpgradeOutcome::Upgraded => println!("upgraded to {}", manager.status()),
                UpgradeOutcome::NotEntitled => {
                    return Err("purchase completed but premium is not active".into());
                }
                UpgradeOutcome::Cancelled => println!("upgrade cancelled"),
            }
        }
        SubscriptionAction::Refresh => {
            rt.block_on(manager.initialize());
            let status = rt.block_on(manager.refresh_subscription_status())?;
            println!("{status}");
        }
        SubscriptionAction::Reset => {
            manager.source().revoke_all()?;
            manager.reset_to_free()?;
            println!("{}", manager.status());
        }
    }
    Ok(())
}
