//! homestead - farm task agenda
//!
//! Tasks live in a remote relational store when one is configured and in a
//! local JSON file otherwise. [`repository::TaskRepository`] is the single
//! entry point for reading and writing them; everything else derives views
//! from what it returns.

pub mod board;
pub mod calendar;
pub mod commands;
pub mod config;
pub mod error;
pub mod filters;
pub mod mapper;
pub mod models;
pub mod remote;
pub mod repository;
pub mod seasonal;
pub mod storage;

pub use error::{Error, Result};
