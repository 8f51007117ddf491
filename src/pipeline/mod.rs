pub mod extraction;
pub mod labs;
