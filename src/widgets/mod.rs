pub mod card;
pub mod chrome;
pub mod editor;
pub mod form;
pub mod model_list;
pub mod schema_tabs;
pub mod status_bar;
