pub mod driver;
pub mod linkedin;
