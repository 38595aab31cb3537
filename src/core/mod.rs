//! Core types shared by every command

pub mod config;
pub mod error;
