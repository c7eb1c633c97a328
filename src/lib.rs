//! Personal writing progress tracker. Log how many words you wrote for a project on a given day,
//! then look at totals over rolling windows, per project averages and a per day chart.
//!

pub mod aggregate;
pub mod cli;
pub mod intake;
pub mod storage;
pub mod utils;
pub mod view;
