pub mod aggregate;
pub mod app;
pub mod catalog;
pub mod charts;
pub mod color;
pub mod domain;
pub mod error;
pub mod labels;
pub mod nbia;
pub mod output;
pub mod selection;
pub mod tui;
