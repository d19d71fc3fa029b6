//! Swing library.
//!
//! A small social posting site: members sign up, write posts with tags,
//! like posts and discuss them in comment threads.

#![allow(clippy::needless_raw_string_hashes)]

pub mod auth;
pub mod components;
pub mod config;
pub mod content;
pub mod db;
pub mod web;
