#![allow(dead_code)]

pub mod eventually;
pub mod recording_display;
pub mod scripted_validator;

pub use eventually::eventually;
pub use recording_display::{DisplayEvent, RecordingDisplay};
pub use scripted_validator::ScriptedValidator;
