// Domain layer - Pure data types and computations
pub mod catalog;
pub mod regression;
pub mod series;
pub mod time_axis;
pub mod views;
