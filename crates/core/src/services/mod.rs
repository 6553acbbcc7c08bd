pub mod bucketing_service;
pub mod calendar;
pub mod chart_service;
pub mod currency_service;
pub mod geometry_service;
pub mod record_normalizer;
pub mod share_service;
