pub mod generic;

pub use self::generic::GenericParse;
