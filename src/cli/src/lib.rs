//! dockgen CLI - render Dockerfiles and .dockerignore files.

pub mod commands;
pub mod output;
