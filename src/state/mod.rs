//! State management module
//!
//! This module contains the core data structures for the application:
//! - Storyboard: the file-backed storyboard document
//! - Scene / VideoRecord / ImageRecord: scene rows and generated candidates
//! - MediaSource: classified media references

mod media;
mod storyboard;

pub use media::*;
pub use storyboard::*;
