pub mod sentinel5p;

pub use sentinel5p::Sentinel5Product;
