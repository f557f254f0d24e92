// src/core/mod.rs

pub mod arpabet;
pub mod lexicon;
pub mod normalizer;
pub mod pipeline;
pub mod rules;
pub mod types;
pub mod validator;
