pub mod mesh;
pub mod shapes;
pub mod vertex;
