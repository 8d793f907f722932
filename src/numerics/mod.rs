pub mod special;

pub use special::faddeeva_w;
