pub mod cluster;
pub mod controls;
pub mod grid;
pub mod helpers;
pub mod light_curve;
pub mod menu_bar;
pub mod overlay;
pub mod standard;
pub mod status;
pub mod viewport;
