pub mod build_kubernetes;
pub mod cluster;
pub mod kubernetes;
