mod goal;
mod helpers;
mod log;
mod meal;
mod summary;

pub(crate) use goal::{cmd_goal_set, cmd_goal_show};
pub(crate) use log::cmd_log;
pub(crate) use meal::{cmd_delete, cmd_meals, cmd_show};
pub(crate) use summary::cmd_summary;
