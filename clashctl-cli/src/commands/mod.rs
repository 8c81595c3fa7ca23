pub mod lifecycle;
pub mod mode;
pub mod proxy;
pub mod update;
