pub mod context;
pub mod renderer;
pub mod styling;
pub mod widgets;
