pub mod faddeeva;

pub use faddeeva::faddeeva_w;
