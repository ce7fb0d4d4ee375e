pub mod catalog;
pub mod load;
pub mod row;
pub mod series;
pub mod sheet;
