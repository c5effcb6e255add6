pub mod ask_form;
pub mod ask_route;
