pub mod map_loader;
