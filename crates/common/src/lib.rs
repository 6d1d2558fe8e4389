// quire-common: shared domain types for the Quire document backend

pub mod types;
