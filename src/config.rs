use std::env;

use crate::input;
use crate::search;

pub const LOG_KEY: &str = "ISH_LOG";
pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
	pub search_path: String,
	pub log_filter: String,
	pub max_line: usize,
}

impl Config {
	pub fn from_env() -> Config {
		Config {
			search_path: env::var(search::PATH_KEY).unwrap_or_else(|_| search::DEFAULT_PATH.to_string()),
			log_filter: env::var(LOG_KEY).unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string()),
			max_line: input::MAX_LINE,
		}
	}
}
