pub mod design;
pub mod indices;
pub mod layout;
