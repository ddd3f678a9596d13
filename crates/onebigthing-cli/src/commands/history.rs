use chrono::{DateTime, FixedOffset};
use clap::Subcommand;
use onebigthing_core::{Config, DailyTask, FilterOptions, HistoryPager, SubscriptionStatus};
use serde::Serialize;

use crate::context::{current_status, open_store, print_json, tracker, CliResult};

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List past tasks visible to the current tier, newest first
    List {
        /// Do not restrict free users to the current week
        #[arg(long)]
        all: bool,
        /// Page to show, starting at 1
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Summary of everything stored, regardless of tier
    Preview,
}

#[derive(Serialize)]
struct HistoryPage<'a> {
    status: SubscriptionStatus,
    page: usize,
    has_more: bool,
    tasks: &'a [DailyTask],
}

pub fn run(action: HistoryAction, config: &Config, now: DateTime<FixedOffset>) -> CliResult {
    let store = open_store()?;
    match action {
        HistoryAction::List { all, page } => {
            if page == 0 {
                return Err("--page starts at 1".into());
            }
            let status = current_status(store.clone(), config)?;
            let mut tracker = tracker(store, config);
            let options = FilterOptions {
                limit_to_current_week: !all,
            };
            let visible = tracker.visible_history(status, options, now)?;

            let page_size = config.history.page_size.max(1);
            let mut pager = HistoryPager::new(page_size);
            pager.preload(&visible);
            for _ in 1..page {
                if pager.load_more(&visible) == 0 {
                    break;
                }
            }
            let start = ((page - 1) * page_size).min(pager.loaded().len());
            print_json(&HistoryPage {
                status,
                page,
                has_more: pager.has_more(),
                tasks: &pager.loaded()[start..],
            })?;

            if tracker.free_tier_limit_reached(status, now)? {
                eprintln!("free tier shows the current week only; upgrade to see full history");
            }
        }
        HistoryAction::Preview => {
            let tracker = tracker(store, config);
            print_json(&tracker.preview()?)?;
        }
    }
    Ok(())
}
