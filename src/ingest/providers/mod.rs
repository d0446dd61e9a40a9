pub mod realty;
