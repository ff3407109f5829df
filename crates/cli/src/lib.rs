//! Speedway CLI library: the subcommands behind the `speedway` binary

pub mod commands;
