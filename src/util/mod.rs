pub mod format;
pub mod parse;
pub mod snowflake;
pub mod time;
