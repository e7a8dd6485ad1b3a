pub mod assign;
pub mod clip;
pub mod commands;
pub mod config;
pub mod feature;
pub mod service;
pub mod tile;
pub mod tilejson;
pub mod utils;
