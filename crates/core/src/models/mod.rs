pub mod bucket;
pub mod chart;
pub mod geometry;
pub mod record;
pub mod settings;
pub mod share;
