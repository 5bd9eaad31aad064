pub mod app;
pub mod compare;
pub mod mix;
pub mod note;
pub mod render;
pub mod score;
pub mod synth;
pub mod wave;
