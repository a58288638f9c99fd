#[path = "../helpers/mod.rs"]
mod helpers;

mod instancing;
mod validation;
