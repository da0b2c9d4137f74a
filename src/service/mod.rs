pub mod color_policy;
pub mod date_utils;
pub mod details;
pub mod overview;
pub mod prediction_service;
pub mod sync_controller;
