pub mod cards;
pub mod selection;
pub mod vec_set;
