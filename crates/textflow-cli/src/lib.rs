pub mod commands;
pub mod json_cache;
pub mod pattern_file;
pub mod trace_init;
