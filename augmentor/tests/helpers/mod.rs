//! Shared fixtures for augmentor integration tests

#![allow(dead_code)]

pub mod audio_generator;
