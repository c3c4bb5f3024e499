pub mod me;
pub mod shops;
