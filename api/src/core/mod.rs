pub mod app_state;
pub mod exam_catalog;
