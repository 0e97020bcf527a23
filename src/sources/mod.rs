use crate::model::AppRecord;
use anyhow::Result;

pub trait Source {
    fn scan(&self) -> Result<Vec<AppRecord>>;
}

pub mod desktop;
pub mod history;
